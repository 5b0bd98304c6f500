//! Unpaginated exports of registers, students and requisitions.
//!
//! Rows are scoped and shaped exactly like `list`; rendering them into a
//! spreadsheet is left to the caller.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ResourceService;
use crate::error::CoreError;
use crate::filters::{FilterValue, SortDirection};
use crate::planner::{self, ID_COLUMN};
use crate::record::{parse_date, Record};
use crate::resource::{
    DerivedField, DisplayRule, ResourceDescriptor, SortKey, REGISTERS, REQUISITIONS, STUDENTS,
};
use crate::shaping;
use crate::types::DbId;

const STUDENT_ADDRESS: DerivedField = DerivedField {
    name: "address",
    rule: DisplayRule::Joined {
        fields: &["address1", "address2"],
        separator: ", ",
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Registers,
    Students,
    Requisitions,
}

impl ExportKind {
    pub fn resource(self) -> &'static ResourceDescriptor {
        match self {
            ExportKind::Registers => &REGISTERS,
            ExportKind::Students => &STUDENTS,
            ExportKind::Requisitions => &REQUISITIONS,
        }
    }

    fn sort(self) -> SortKey {
        match self {
            ExportKind::Registers | ExportKind::Requisitions => SortKey::desc("date"),
            ExportKind::Students => SortKey::asc("last_name"),
        }
    }

    /// Student exports cover every student regardless of dates.
    fn applies_date_range(self) -> bool {
        !matches!(self, ExportKind::Students)
    }

    fn extra_fields(self) -> &'static [DerivedField] {
        match self {
            ExportKind::Students => &[STUDENT_ADDRESS],
            _ => &[],
        }
    }
}

impl FromStr for ExportKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registers" => Ok(ExportKind::Registers),
            "students" => Ok(ExportKind::Students),
            "requisitions" => Ok(ExportKind::Requisitions),
            other => Err(CoreError::UnknownResource(format!("export {other}"))),
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource().name)
    }
}

/// Criteria accepted by [`ResourceService::export`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportFilters {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub branch_id: FilterValue,
}

impl ExportFilters {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, CoreError> {
        let date = |name: &str| -> Result<Option<NaiveDate>, CoreError> {
            match params.get(name).map(|s| s.trim()).filter(|s| !s.is_empty()) {
                None => Ok(None),
                Some(raw) => parse_date(raw).map(Some).ok_or_else(|| {
                    CoreError::invalid(format!("{name} must be a YYYY-MM-DD date, got '{raw}'"))
                }),
            }
        };

        let filters = Self {
            date_from: date("date_from")?,
            date_to: date("date_to")?,
            branch_id: params
                .get("branch_id")
                .map_or(FilterValue::All, |raw| FilterValue::parse(raw)),
        };

        if let (Some(from), Some(to)) = (filters.date_from, filters.date_to) {
            if from > to {
                return Err(CoreError::invalid(format!(
                    "date_from ({from}) is after date_to ({to})"
                )));
            }
        }
        Ok(filters)
    }
}

impl ResourceService {
    /// Every row of `kind` matching `filters`, shaped for export.
    pub async fn export(
        &self,
        kind: ExportKind,
        filters: &ExportFilters,
        authorized_branch_ids: Option<&[DbId]>,
    ) -> Result<Vec<Record>, CoreError> {
        let resource = kind.resource();
        let sort = kind.sort();

        let mut query = planner::base_query(resource);
        query
            .conditions
            .extend(planner::branch_condition(resource, &filters.branch_id, authorized_branch_ids)?);
        if kind.applies_date_range() {
            query.conditions.extend(planner::date_conditions(
                resource,
                filters.date_from,
                filters.date_to,
            ));
        }
        let query = query
            .order_by(sort.column, sort.direction)
            .order_by(ID_COLUMN, SortDirection::Asc);

        let rows = self.store.select(&query).await?;
        let data: Vec<Record> = rows
            .into_iter()
            .map(|row| {
                shaping::shape_with(resource.derived.iter().chain(kind.extra_fields()), row)
            })
            .collect();

        tracing::info!(export = %kind, rows = data.len(), "Export generated");

        Ok(data)
    }
}
