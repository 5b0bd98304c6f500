//! Filter criteria accepted by list operations.
//!
//! Criteria usually arrive as a flat string map (the query string of a list
//! request). [`ListFilters::from_params`] splits the reserved keys (paging,
//! sort, search, branch, date range) from the resource-specific equality
//! filters, which stay untyped until the planner coerces them against the
//! resource descriptor.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::record::{parse_date, FieldValue};
use crate::types::DbId;

/// Sentinel meaning "no constraint" for any equality filter.
pub const ALL: &str = "All";

/// Page size used when a request does not specify `items`.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page a single list call may request.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Query keys with a fixed meaning; everything else is an equality filter.
const RESERVED_KEYS: &[&str] = &[
    "page",
    "items",
    "sort",
    "sortDirection",
    "sort_direction",
    "search",
    "branch_id",
    "date_from",
    "date_to",
];

// ---------------------------------------------------------------------------
// SortDirection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Anything other than `asc` sorts descending.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// FilterValue
// ---------------------------------------------------------------------------

/// An equality filter: either the `All` sentinel or a concrete value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FilterValue {
    #[default]
    All,
    Value(FieldValue),
}

impl FilterValue {
    /// Parse a raw query-string value. Empty strings and `All` mean no constraint.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == ALL {
            FilterValue::All
        } else {
            FilterValue::Value(FieldValue::Text(raw.to_string()))
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }
}

impl From<FieldValue> for FilterValue {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Null => FilterValue::All,
            FieldValue::Text(s) if s == ALL => FilterValue::All,
            other => FilterValue::Value(other),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FieldValue::from(value).into()
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FieldValue::from(value).into()
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FieldValue::from(value).into()
    }
}

// ---------------------------------------------------------------------------
// ListFilters
// ---------------------------------------------------------------------------

/// Criteria for a single list call.
#[derive(Debug, Clone, PartialEq)]
pub struct ListFilters {
    /// 1-based page number.
    pub page: i64,
    /// Page size.
    pub items: i64,
    pub sort: Option<String>,
    /// Requested direction; the resource default applies when unset.
    pub sort_direction: Option<SortDirection>,
    pub search: Option<String>,
    pub branch_id: FilterValue,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Resource-specific equality filters, keyed by filter name.
    pub fields: BTreeMap<String, FilterValue>,
}

impl Default for ListFilters {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

impl ListFilters {
    pub fn new(page: i64, items: i64) -> Self {
        Self {
            page,
            items,
            sort: None,
            sort_direction: None,
            search: None,
            branch_id: FilterValue::All,
            date_from: None,
            date_to: None,
            fields: BTreeMap::new(),
        }
    }

    /// Build criteria from a flat string map such as a request query string.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, CoreError> {
        let mut filters = Self::default();

        if let Some(page) = params.get("page") {
            filters.page = parse_i64("page", page)?;
        }
        if let Some(items) = params.get("items") {
            filters.items = parse_i64("items", items)?;
        }

        filters.sort = params
            .get("sort")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        if let Some(dir) = params.get("sortDirection").or_else(|| params.get("sort_direction")) {
            filters.sort_direction = Some(SortDirection::parse(dir));
        }

        filters.search = params.get("search").cloned();

        if let Some(branch) = params.get("branch_id") {
            filters.branch_id = FilterValue::parse(branch);
        }

        filters.date_from = params
            .get("date_from")
            .map(|s| parse_date_param("date_from", s))
            .transpose()?
            .flatten();
        filters.date_to = params
            .get("date_to")
            .map(|s| parse_date_param("date_to", s))
            .transpose()?
            .flatten();

        for (key, value) in params {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                filters.fields.insert(key.clone(), FilterValue::parse(value));
            }
        }

        Ok(filters)
    }

    /// Reject malformed pagination input.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.page < 1 {
            return Err(CoreError::invalid(format!(
                "page must be at least 1, got {}",
                self.page
            )));
        }
        if self.items < 1 {
            return Err(CoreError::invalid(format!(
                "items must be at least 1, got {}",
                self.items
            )));
        }
        if self.items > MAX_PAGE_SIZE {
            return Err(CoreError::invalid(format!(
                "items must not exceed {MAX_PAGE_SIZE}, got {}",
                self.items
            )));
        }
        if (self.page - 1).checked_mul(self.items).is_none() {
            return Err(CoreError::invalid(format!(
                "page {} is out of range for {} items per page",
                self.page, self.items
            )));
        }
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(CoreError::invalid(format!(
                    "date_from ({from}) is after date_to ({to})"
                )));
            }
        }
        Ok(())
    }

    /// Zero-based row offset of the current page.
    ///
    /// Saturates for pages that [`validate`](Self::validate) rejects.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.items)
    }

    /// The trimmed search term, if any.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    // -- builders -----------------------------------------------------------

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_branch(mut self, branch_id: DbId) -> Self {
        self.branch_id = FilterValue::Value(FieldValue::Integer(branch_id));
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(field.into());
        self.sort_direction = Some(direction);
        self
    }

    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }
}

fn parse_i64(name: &str, raw: &str) -> Result<i64, CoreError> {
    raw.trim()
        .parse()
        .map_err(|_| CoreError::invalid(format!("{name} must be an integer, got '{raw}'")))
}

fn parse_date_param(name: &str, raw: &str) -> Result<Option<NaiveDate>, CoreError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_date(raw)
        .map(Some)
        .ok_or_else(|| CoreError::invalid(format!("{name} must be a YYYY-MM-DD date, got '{raw}'")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
