//! Backing-store query model.
//!
//! A [`RecordQuery`] is the store-neutral form of a single read: conditions,
//! ordering, an optional window, and the relations to resolve alongside each
//! row. Both the in-memory store and the PostgreSQL store execute exactly
//! these semantics.

use std::collections::BTreeMap;

use crate::filters::SortDirection;
use crate::record::{FieldValue, Record};
use crate::resource::{FieldSpec, Relation};

/// A predicate on a base-table column.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq {
        column: &'static str,
        value: FieldValue,
    },
    NotEq {
        column: &'static str,
        value: FieldValue,
    },
    In {
        column: &'static str,
        values: Vec<FieldValue>,
    },
    /// Case-insensitive substring match on any of `columns`.
    Contains {
        columns: &'static [&'static str],
        term: String,
    },
    Gte {
        column: &'static str,
        value: FieldValue,
    },
    Lte {
        column: &'static str,
        value: FieldValue,
    },
}

impl Condition {
    /// Evaluate against an in-memory row.
    ///
    /// Null never satisfies a comparison, mirroring SQL three-valued logic.
    pub fn matches(&self, row: &Record) -> bool {
        match self {
            Condition::Eq { column, value } => {
                let current = row.value(column);
                !current.is_null() && current.compare(value).is_eq()
            }
            Condition::NotEq { column, value } => {
                let current = row.value(column);
                !current.is_null() && !current.compare(value).is_eq()
            }
            Condition::In { column, values } => {
                let current = row.value(column);
                !current.is_null() && values.iter().any(|v| current.compare(v).is_eq())
            }
            Condition::Contains { columns, term } => {
                let needle = term.to_lowercase();
                columns.iter().any(|column| {
                    row.text(column)
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                })
            }
            Condition::Gte { column, value } => {
                let current = row.value(column);
                !current.is_null() && current.compare(value).is_ge()
            }
            Condition::Lte { column, value } => {
                let current = row.value(column);
                !current.is_null() && current.compare(value).is_le()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: SortDirection,
}

/// `LIMIT` / `OFFSET` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: i64,
    pub offset: i64,
}

/// A read against one base table.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordQuery {
    pub table: &'static str,
    /// Column kinds of the base table, used for typed binding and decoding.
    pub fields: &'static [FieldSpec],
    pub relations: &'static [Relation],
    pub conditions: Vec<Condition>,
    pub order: Vec<OrderBy>,
    pub window: Option<Window>,
}

impl RecordQuery {
    pub fn new(table: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self {
            table,
            fields,
            relations: &[],
            conditions: Vec::new(),
            order: Vec::new(),
            window: None,
        }
    }

    pub fn with_relations(mut self, relations: &'static [Relation]) -> Self {
        self.relations = relations;
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn order_by(mut self, column: &'static str, direction: SortDirection) -> Self {
        self.order.push(OrderBy { column, direction });
        self
    }

    pub fn window(mut self, limit: i64, offset: i64) -> Self {
        self.window = Some(Window { limit, offset });
        self
    }
}

/// A fetched base row plus its resolved relations.
///
/// A relation whose foreign key is null or dangling is absent from the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredRow {
    pub record: Record,
    pub relations: BTreeMap<&'static str, Record>,
}

impl StoredRow {
    pub fn new(record: Record) -> Self {
        Self {
            record,
            relations: BTreeMap::new(),
        }
    }

    pub fn relation(&self, name: &str) -> Option<&Record> {
        self.relations.get(name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
