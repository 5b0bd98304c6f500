//! Translate filter criteria and write payloads into store operations.
//!
//! Planning is pure: it validates and coerces caller input against a
//! [`ResourceDescriptor`] and produces the conditions, ordering and window
//! of a [`RecordQuery`], or the column values of a write.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::filters::{FilterValue, ListFilters, SortDirection};
use crate::query::{Condition, RecordQuery};
use crate::record::{FieldKind, FieldValue, Record};
use crate::resource::{FilterMode, FilterSpec, ResourceDescriptor};
use crate::types::DbId;

/// Column every table uses as its primary key and final tie-breaker.
pub const ID_COLUMN: &str = "id";

const BRANCH_COLUMN: &str = "branch_id";

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Query over `resource` with its relations and fixed predicates applied.
pub fn base_query(resource: &'static ResourceDescriptor) -> RecordQuery {
    let mut query =
        RecordQuery::new(resource.table, resource.fields).with_relations(resource.relations);
    query.conditions.extend(fixed_conditions(resource));
    query
}

/// Plan one page of a list call.
///
/// Rules apply in order: equality filters, branch scoping, text search,
/// date range, then ordering (requested column, resource tie-breaker, id)
/// and the page window.
pub fn plan_list(
    resource: &'static ResourceDescriptor,
    filters: &ListFilters,
    authorized_branch_ids: Option<&[DbId]>,
) -> Result<RecordQuery, CoreError> {
    filters.validate()?;

    let mut query = base_query(resource);

    for (param, value) in &filters.fields {
        if value.is_all() {
            continue;
        }
        match resource.filter(param) {
            Some(spec) => {
                if let Some(condition) = filter_condition(resource, spec, value)? {
                    query.conditions.push(condition);
                }
            }
            None => {
                tracing::trace!(resource = resource.name, param = %param, "Ignoring undeclared filter");
            }
        }
    }

    query
        .conditions
        .extend(branch_condition(resource, &filters.branch_id, authorized_branch_ids)?);

    if let Some(term) = filters.search_term() {
        if !resource.searchable.is_empty() {
            query.conditions.push(Condition::Contains {
                columns: resource.searchable,
                term: term.to_string(),
            });
        }
    }

    query
        .conditions
        .extend(date_conditions(resource, filters.date_from, filters.date_to));

    let column = resource.sort_column(filters.sort.as_deref())?;
    let direction = filters
        .sort_direction
        .unwrap_or(resource.default_sort.direction);
    query = query.order_by(column, direction);

    if let Some(secondary) = resource.secondary_sort {
        if secondary.column != column {
            query = query.order_by(secondary.column, secondary.direction);
        }
    }
    if column != ID_COLUMN {
        query = query.order_by(ID_COLUMN, SortDirection::Asc);
    }

    Ok(query.window(filters.items, filters.offset()))
}

/// Conditions selecting a single row by primary key.
pub fn id_conditions(resource: &'static ResourceDescriptor, id: DbId) -> Vec<Condition> {
    let mut conditions = vec![Condition::Eq {
        column: ID_COLUMN,
        value: FieldValue::Integer(id),
    }];
    conditions.extend(fixed_conditions(resource));
    conditions
}

/// Conditions selecting every row whose primary key is in `ids`.
pub fn ids_conditions(resource: &'static ResourceDescriptor, ids: &[DbId]) -> Vec<Condition> {
    let mut conditions = vec![Condition::In {
        column: ID_COLUMN,
        values: ids.iter().copied().map(FieldValue::Integer).collect(),
    }];
    conditions.extend(fixed_conditions(resource));
    conditions
}

/// Branch restriction for a branch-scoped resource.
///
/// A concrete `branch_id` wins over the authorized list; `All` with a
/// non-empty authorized list restricts to those branches.
pub fn branch_condition(
    resource: &ResourceDescriptor,
    branch_id: &FilterValue,
    authorized_branch_ids: Option<&[DbId]>,
) -> Result<Option<Condition>, CoreError> {
    if !resource.branch_scoped {
        return Ok(None);
    }

    match branch_id {
        FilterValue::Value(value) => {
            let value = coerce(FieldKind::Integer, BRANCH_COLUMN, value.clone())?;
            Ok(Some(Condition::Eq {
                column: BRANCH_COLUMN,
                value,
            }))
        }
        FilterValue::All => Ok(authorized_branch_ids
            .filter(|ids| !ids.is_empty())
            .map(|ids| Condition::In {
                column: BRANCH_COLUMN,
                values: ids.iter().copied().map(FieldValue::Integer).collect(),
            })),
    }
}

/// Inclusive date range on the resource's date column, if it has one.
pub fn date_conditions(
    resource: &ResourceDescriptor,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<Condition> {
    let Some(column) = resource.date_field else {
        return Vec::new();
    };

    let mut conditions = Vec::new();
    if let Some(from) = from {
        conditions.push(Condition::Gte {
            column,
            value: FieldValue::Date(from),
        });
    }
    if let Some(to) = to {
        conditions.push(Condition::Lte {
            column,
            value: FieldValue::Date(to),
        });
    }
    conditions
}

fn fixed_conditions(resource: &ResourceDescriptor) -> impl Iterator<Item = Condition> + '_ {
    resource.fixed.iter().map(|fixed| Condition::Eq {
        column: fixed.column,
        value: FieldValue::Text(fixed.value.to_string()),
    })
}

fn filter_condition(
    resource: &ResourceDescriptor,
    spec: &FilterSpec,
    value: &FilterValue,
) -> Result<Option<Condition>, CoreError> {
    let FilterValue::Value(value) = value else {
        return Ok(None);
    };
    let kind = resource
        .field(spec.column)
        .map_or(FieldKind::Text, |f| f.kind);

    let condition = match spec.mode {
        FilterMode::Exact => Some(Condition::Eq {
            column: spec.column,
            value: coerce(kind, spec.param, value.clone())?,
        }),
        FilterMode::ActiveFlag => {
            let active = match value {
                FieldValue::Bool(b) => *b,
                other => other.as_text().is_some_and(|s| s.trim() == "A"),
            };
            Some(Condition::Eq {
                column: spec.column,
                value: FieldValue::Bool(active),
            })
        }
        FilterMode::AnyOf => {
            let raw = value.to_string();
            let values = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| coerce(kind, spec.param, FieldValue::from(s)))
                .collect::<Result<Vec<_>, _>>()?;
            (!values.is_empty()).then_some(Condition::In {
                column: spec.column,
                values,
            })
        }
    };

    Ok(condition)
}

fn coerce(kind: FieldKind, name: &str, value: FieldValue) -> Result<FieldValue, CoreError> {
    kind.coerce(value)
        .map_err(|msg| CoreError::invalid(format!("invalid value for {name}: {msg}")))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Column values for inserting `input` into `resource`.
///
/// Only writable columns are kept, under their canonical names when the
/// caller used an alias; fixed predicates and defaults are applied.
pub fn prepare_create(
    resource: &ResourceDescriptor,
    input: &Record,
) -> Result<Record, CoreError> {
    let mut values = writable_values(resource, input)?;

    if let Some(rule) = resource.signed_amount {
        let inflow = amount_input(input, rule.inflow)?.unwrap_or(0.0);
        let outflow = amount_input(input, rule.outflow)?.unwrap_or(0.0);
        values.insert(rule.target, FieldValue::Decimal(inflow - outflow));
    }

    for fixed in resource.fixed {
        values.insert(fixed.column, FieldValue::Text(fixed.value.to_string()));
    }

    for (column, default) in resource.defaults {
        if values.value(column).is_null() {
            values.insert(*column, default.to_value());
        }
    }

    Ok(values)
}

/// Column values for a partial update of `resource` from `input`.
///
/// Fixed predicate columns cannot be changed. A signed amount is recomputed
/// only when the caller supplies one of its inputs.
pub fn prepare_update(
    resource: &ResourceDescriptor,
    input: &Record,
) -> Result<Record, CoreError> {
    let mut values = writable_values(resource, input)?;

    if let Some(rule) = resource.signed_amount {
        if input.contains(rule.inflow) || input.contains(rule.outflow) {
            let inflow = amount_input(input, rule.inflow)?.unwrap_or(0.0);
            let outflow = amount_input(input, rule.outflow)?.unwrap_or(0.0);
            values.insert(rule.target, FieldValue::Decimal(inflow - outflow));
        }
    }

    for fixed in resource.fixed {
        values.remove(fixed.column);
    }

    Ok(values)
}

fn writable_values(resource: &ResourceDescriptor, input: &Record) -> Result<Record, CoreError> {
    let mut values = Record::new();
    let mut ignored = 0usize;

    for (name, value) in input.iter() {
        let name = name.as_str();
        let column = resource.column_name(name);
        if column != name && input.contains(column) {
            ignored += 1;
            continue;
        }
        match resource.field(column) {
            Some(spec) if spec.writable => {
                values.insert(spec.name, coerce(spec.kind, spec.name, value.clone())?);
            }
            _ => ignored += 1,
        }
    }

    if ignored > 0 {
        tracing::debug!(resource = resource.name, ignored, "Ignored non-writable input fields");
    }
    Ok(values)
}

fn amount_input(input: &Record, name: &str) -> Result<Option<f64>, CoreError> {
    match input.get(name) {
        None => Ok(None),
        Some(value) => Ok(coerce(FieldKind::Decimal, name, value.clone())?.as_f64()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::query::OrderBy;
    use crate::resource::{CONTACTS, EMPLOYEES, LOOKUPS, REGISTERS, SCHEDULES, SERVICES};

    #[test]
    fn list_window_uses_zero_based_offset() {
        let query = plan_list(&CONTACTS, &ListFilters::new(3, 10), None).unwrap();
        let window = query.window.unwrap();
        assert_eq!((window.limit, window.offset), (10, 20));
    }

    #[test]
    fn all_sentinel_adds_no_condition() {
        let filters = ListFilters::default().with_field("status", "All");
        let query = plan_list(&CONTACTS, &filters, None).unwrap();
        assert!(query.conditions.is_empty());
    }

    #[test]
    fn status_filter_maps_to_its_column() {
        let filters = ListFilters::default().with_field("status", "A");
        let query = plan_list(&CONTACTS, &filters, None).unwrap();
        assert_eq!(
            query.conditions,
            vec![Condition::Eq {
                column: "contact_status",
                value: FieldValue::from("A"),
            }]
        );
    }

    #[test]
    fn undeclared_filters_are_ignored() {
        let filters = ListFilters::default().with_field("favourite_colour", "red");
        let query = plan_list(&CONTACTS, &filters, None).unwrap();
        assert!(query.conditions.is_empty());
    }

    #[test]
    fn concrete_branch_wins_over_authorized_list() {
        let filters = ListFilters::default().with_branch(7);
        let query = plan_list(&CONTACTS, &filters, Some(&[2, 5])).unwrap();
        assert_eq!(
            query.conditions,
            vec![Condition::Eq {
                column: "branch_id",
                value: FieldValue::Integer(7),
            }]
        );
    }

    #[test]
    fn all_branches_restricts_to_authorized_list() {
        let query = plan_list(&CONTACTS, &ListFilters::default(), Some(&[2, 5])).unwrap();
        assert_eq!(
            query.conditions,
            vec![Condition::In {
                column: "branch_id",
                values: vec![FieldValue::Integer(2), FieldValue::Integer(5)],
            }]
        );
    }

    #[test]
    fn empty_authorized_list_means_unrestricted() {
        let query = plan_list(&CONTACTS, &ListFilters::default(), Some(&[])).unwrap();
        assert!(query.conditions.is_empty());
    }

    #[test]
    fn unscoped_resources_ignore_branch_filters() {
        let filters = ListFilters::default().with_branch(3);
        let query = plan_list(&SERVICES, &filters, Some(&[1])).unwrap();
        assert!(query.conditions.is_empty());
    }

    #[test]
    fn non_numeric_branch_is_invalid() {
        let mut filters = ListFilters::default();
        filters.branch_id = FilterValue::parse("north");
        assert_matches!(
            plan_list(&CONTACTS, &filters, None),
            Err(CoreError::InvalidArgument(_))
        );
    }

    #[test]
    fn fixed_predicates_always_apply() {
        let query = plan_list(&EMPLOYEES, &ListFilters::default(), None).unwrap();
        assert_eq!(
            query.conditions,
            vec![Condition::Eq {
                column: "contact_type",
                value: FieldValue::from("EMPLOYEE"),
            }]
        );
    }

    #[test]
    fn search_targets_declared_columns() {
        let filters = ListFilters::default().with_search("  anto ");
        let query = plan_list(&CONTACTS, &filters, None).unwrap();
        assert_eq!(
            query.conditions,
            vec![Condition::Contains {
                columns: CONTACTS.searchable,
                term: "anto".into(),
            }]
        );
    }

    #[test]
    fn default_ordering_ends_with_id() {
        let query = plan_list(&CONTACTS, &ListFilters::default(), None).unwrap();
        assert_eq!(
            query.order,
            vec![
                OrderBy {
                    column: "created_at",
                    direction: SortDirection::Desc,
                },
                OrderBy {
                    column: "id",
                    direction: SortDirection::Asc,
                },
            ]
        );
    }

    #[test]
    fn lookup_tie_breaker_skipped_when_sorting_by_it() {
        let by_category = plan_list(&LOOKUPS, &ListFilters::default(), None).unwrap();
        let columns: Vec<_> = by_category.order.iter().map(|o| o.column).collect();
        assert_eq!(columns, ["category", "list_order", "id"]);

        let filters = ListFilters::default().sorted_by("list_order", SortDirection::Desc);
        let by_order = plan_list(&LOOKUPS, &filters, None).unwrap();
        let columns: Vec<_> = by_order.order.iter().map(|o| o.column).collect();
        assert_eq!(columns, ["list_order", "id"]);
    }

    #[test]
    fn active_flag_filter_maps_to_boolean() {
        let filters = ListFilters::default().with_field("status", "I");
        let query = plan_list(&LOOKUPS, &filters, None).unwrap();
        assert_eq!(
            query.conditions,
            vec![Condition::Eq {
                column: "is_active",
                value: FieldValue::Bool(false),
            }]
        );
    }

    #[test]
    fn any_of_filter_splits_values() {
        let filters = ListFilters::default().with_field("transaction_status", "C, R");
        let query = plan_list(&REGISTERS, &filters, None).unwrap();
        assert_eq!(
            query.conditions,
            vec![Condition::In {
                column: "transaction_status",
                values: vec![FieldValue::from("C"), FieldValue::from("R")],
            }]
        );
    }

    #[test]
    fn date_range_is_inclusive_on_date_field() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1);
        let to = NaiveDate::from_ymd_opt(2024, 1, 31);
        let filters = ListFilters::default().between(from, to);
        let query = plan_list(&REGISTERS, &filters, None).unwrap();
        assert_eq!(query.conditions.len(), 2);
        assert_matches!(query.conditions[0], Condition::Gte { column: "date", .. });
        assert_matches!(query.conditions[1], Condition::Lte { column: "date", .. });
    }

    #[test]
    fn create_keeps_writable_fields_and_applies_defaults() {
        let input = Record::new()
            .with("first_name", "Ana")
            .with("branch_id", "2")
            .with("id", 999_i64)
            .with("created_at", "2020-01-01T00:00:00Z")
            .with("favourite_colour", "red");

        let values = prepare_create(&CONTACTS, &input).unwrap();

        assert_eq!(values.text("first_name"), Some("Ana"));
        assert_eq!(values.int("branch_id"), Some(2));
        assert_eq!(values.text("contact_status"), Some("A"));
        assert!(!values.contains("id"));
        assert!(!values.contains("created_at"));
        assert!(!values.contains("favourite_colour"));
    }

    #[test]
    fn create_forces_fixed_predicates() {
        let input = Record::new().with("contact_type", "STUDENT");
        let values = prepare_create(&EMPLOYEES, &input).unwrap();
        assert_eq!(values.text("contact_type"), Some("EMPLOYEE"));
    }

    #[test]
    fn create_rejects_uncoercible_values() {
        let input = Record::new().with("branch_id", "main");
        assert_matches!(
            prepare_create(&CONTACTS, &input),
            Err(CoreError::InvalidArgument(_))
        );
    }

    #[test]
    fn register_amount_is_inflow_minus_outflow() {
        let input = Record::new()
            .with("inflow", 0_i64)
            .with("outflow", 250.5)
            .with("amount", 1_000_000_i64);

        let values = prepare_create(&REGISTERS, &input).unwrap();

        assert_eq!(values.decimal("amount"), Some(-250.5));
        assert_eq!(values.text("transaction_status"), Some("U"));
        assert!(!values.contains("inflow"));
    }

    #[test]
    fn update_is_partial_and_keeps_amount_without_flows() {
        let input = Record::new().with("memo", "fuel");
        let values = prepare_update(&REGISTERS, &input).unwrap();
        assert_eq!(values, Record::new().with("memo", "fuel"));
    }

    #[test]
    fn update_cannot_change_fixed_columns() {
        let input = Record::new()
            .with("contact_type", "STUDENT")
            .with("nick_name", "Jo");
        let values = prepare_update(&EMPLOYEES, &input).unwrap();
        assert_eq!(values, Record::new().with("nick_name", "Jo"));
    }

    #[test]
    fn schedule_aliases_write_canonical_columns() {
        let input = Record::new()
            .with("start", "2024-05-01T09:00:00Z")
            .with("end", "2024-05-01T10:00:00Z");

        let values = prepare_create(&SCHEDULES, &input).unwrap();

        assert_matches!(values.value("start_time"), FieldValue::Timestamp(_));
        assert_matches!(values.value("end_time"), FieldValue::Timestamp(_));
        assert!(!values.contains("start"));
        assert_eq!(values.text("status"), Some("confirmed"));
    }

    #[test]
    fn canonical_column_wins_over_its_alias() {
        let input = Record::new()
            .with("start", "2024-05-01T09:00:00Z")
            .with("start_time", "2024-05-01T13:00:00Z");

        let values = prepare_update(&SCHEDULES, &input).unwrap();

        assert_matches!(
            values.value("start_time"),
            FieldValue::Timestamp(t) if t.to_rfc3339() == "2024-05-01T13:00:00+00:00"
        );
    }
}
