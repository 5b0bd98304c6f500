//! Derived display fields.
//!
//! List and get results carry flat, human-readable fields computed from the
//! base row and its joined relations (`branch_name`, `contact_name`, the
//! inflow/outflow split of a register amount, ...). A relation that is
//! absent yields an empty string, never an error.

use std::collections::BTreeMap;

use crate::query::StoredRow;
use crate::record::{FieldValue, Record};
use crate::resource::{DerivedField, DisplayRule, ResourceDescriptor};

/// Flatten a fetched row into its output record.
pub fn shape(resource: &ResourceDescriptor, row: StoredRow) -> Record {
    shape_with(resource.derived.iter(), row)
}

/// Flatten a fetched row, computing each of `derived` in order.
pub fn shape_with<'a>(
    derived: impl IntoIterator<Item = &'a DerivedField>,
    row: StoredRow,
) -> Record {
    let StoredRow {
        mut record,
        relations,
    } = row;

    for field in derived {
        let value = derive(&field.rule, &record, &relations);
        record.insert(field.name, value);
    }
    record
}

fn derive(
    rule: &DisplayRule,
    record: &Record,
    relations: &BTreeMap<&'static str, Record>,
) -> FieldValue {
    match *rule {
        DisplayRule::RelationField { relation, field } => FieldValue::Text(
            relations
                .get(relation)
                .map(|r| r.value(field))
                .filter(|v| !v.is_null())
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
        DisplayRule::Joined { fields, separator } => FieldValue::Text(join_non_empty(
            fields.iter().map(|f| record.text(f)),
            separator,
        )),
        DisplayRule::ContactName { relation } => FieldValue::Text(
            relations
                .get(relation)
                .map(contact_display_name)
                .unwrap_or_default(),
        ),
        DisplayRule::InstructorName { relation } => FieldValue::Text(
            relations
                .get(relation)
                .map(instructor_display_name)
                .unwrap_or_default(),
        ),
        DisplayRule::VehicleInfo { relation } => FieldValue::Text(
            relations.get(relation).map(vehicle_info).unwrap_or_default(),
        ),
        DisplayRule::Inflow { amount } => {
            let amount = record.decimal(amount).unwrap_or(0.0);
            FieldValue::Decimal(if amount >= 0.0 { amount } else { 0.0 })
        }
        DisplayRule::Outflow { amount } => {
            let amount = record.decimal(amount).unwrap_or(0.0);
            FieldValue::Decimal(if amount < 0.0 { -amount } else { 0.0 })
        }
    }
}

/// Join the non-blank parts with `separator`.
pub fn join_non_empty<'a>(
    parts: impl IntoIterator<Item = Option<&'a str>>,
    separator: &str,
) -> String {
    parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Company name, else "first last", else nick name.
pub fn contact_display_name(contact: &Record) -> String {
    if let Some(company) = contact.text("company").map(str::trim).filter(|s| !s.is_empty()) {
        return company.to_string();
    }

    let name = join_non_empty([contact.text("first_name"), contact.text("last_name")], " ");
    if !name.is_empty() {
        return name;
    }

    contact
        .text("nick_name")
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

/// Nick name, else "first last".
pub fn instructor_display_name(instructor: &Record) -> String {
    match instructor.text("nick_name").map(str::trim) {
        Some(nick) if !nick.is_empty() => nick.to_string(),
        _ => join_non_empty(
            [instructor.text("first_name"), instructor.text("last_name")],
            " ",
        ),
    }
}

/// "color brand model (plate)", skipping missing parts.
pub fn vehicle_info(vehicle: &Record) -> String {
    let description = join_non_empty(
        [
            vehicle.text("color"),
            vehicle.text("brand"),
            vehicle.text("model"),
        ],
        " ",
    );

    match vehicle.text("plate_number").map(str::trim) {
        Some(plate) if !plate.is_empty() && description.is_empty() => format!("({plate})"),
        Some(plate) if !plate.is_empty() => format!("{description} ({plate})"),
        _ => description,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
