//! In-process [`RecordStore`] backed by ordered maps.
//!
//! Executes the same query semantics as the PostgreSQL store: conditions via
//! [`Condition::matches`], ordering via [`FieldValue::compare`] (nulls last
//! ascending, first descending), then the window. Ids and the
//! `created_at` / `updated_at` timestamps are assigned by the store.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{RecordStore, StoreError};
use crate::filters::SortDirection;
use crate::query::{Condition, OrderBy, RecordQuery, StoredRow};
use crate::record::{FieldValue, Record};
use crate::resource::{FieldSpec, Relation};
use crate::types::DbId;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<DbId, Record>,
    last_id: DbId,
}

impl Table {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    fn matching<'a>(
        &'a self,
        conditions: &'a [Condition],
    ) -> impl Iterator<Item = &'a Record> + 'a {
        self.rows
            .values()
            .filter(move |row| conditions.iter().all(|c| c.matches(row)))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixture rows into `table`, returning their ids.
    ///
    /// Rows keep an explicit integer `id` when they carry one; otherwise the
    /// next id is assigned. Missing timestamps are set to now.
    pub async fn seed(&self, table: &str, rows: impl IntoIterator<Item = Record>) -> Vec<DbId> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(table.to_string()).or_default();
        let now = FieldValue::Timestamp(Utc::now());

        rows.into_iter()
            .map(|mut row| {
                let id = match row.int("id") {
                    Some(id) => {
                        table.last_id = table.last_id.max(id);
                        id
                    }
                    None => table.next_id(),
                };
                row.insert("id", id);
                for column in ["created_at", "updated_at"] {
                    if !row.contains(column) {
                        row.insert(column, now.clone());
                    }
                }
                table.rows.insert(id, row);
                id
            })
            .collect()
    }

    /// Raw row lookup, bypassing every resource rule.
    pub async fn row(&self, table: &str, id: DbId) -> Option<Record> {
        let tables = self.tables.read().await;
        tables.get(table).and_then(|t| t.rows.get(&id)).cloned()
    }

    /// Number of rows currently held in `table`.
    pub async fn row_count(&self, table: &str) -> usize {
        let tables = self.tables.read().await;
        tables.get(table).map_or(0, |t| t.rows.len())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select(&self, query: &RecordQuery) -> Result<Vec<StoredRow>, StoreError> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(query.table) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<&Record> = table.matching(&query.conditions).collect();
        rows.sort_by(|a, b| compare_rows(a, b, &query.order));

        let (offset, limit) = match query.window {
            Some(window) => (
                usize::try_from(window.offset).unwrap_or(0),
                usize::try_from(window.limit).unwrap_or(0),
            ),
            None => (0, usize::MAX),
        };

        Ok(rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|record| StoredRow {
                record: record.clone(),
                relations: resolve_relations(&tables, record, query.relations),
            })
            .collect())
    }

    async fn count(&self, query: &RecordQuery) -> Result<i64, StoreError> {
        let tables = self.tables.read().await;
        let count = tables
            .get(query.table)
            .map_or(0, |t| t.matching(&query.conditions).count());
        Ok(count as i64)
    }

    async fn insert(
        &self,
        table: &'static str,
        _fields: &'static [FieldSpec],
        values: &Record,
    ) -> Result<Record, StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(table.to_string()).or_default();

        let id = table.next_id();
        let now = FieldValue::Timestamp(Utc::now());

        let mut row = values.clone();
        row.insert("id", id);
        row.insert("created_at", now.clone());
        row.insert("updated_at", now);

        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: &'static str,
        _fields: &'static [FieldSpec],
        conditions: &[Condition],
        values: &Record,
    ) -> Result<Vec<Record>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(table) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };
        let now = FieldValue::Timestamp(Utc::now());

        let mut updated = Vec::new();
        for row in table.rows.values_mut() {
            if conditions.iter().all(|c| c.matches(row)) {
                row.merge(values);
                row.insert("updated_at", now.clone());
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(
        &self,
        table: &'static str,
        conditions: &[Condition],
    ) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(table) = tables.get_mut(table) else {
            return Ok(0);
        };

        let before = table.rows.len();
        table
            .rows
            .retain(|_, row| !conditions.iter().all(|c| c.matches(row)));
        Ok((before - table.rows.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

fn compare_rows(a: &Record, b: &Record, order: &[OrderBy]) -> Ordering {
    for key in order {
        let ord = a.value(key.column).compare(b.value(key.column));
        let ord = match key.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        if ord.is_ne() {
            return ord;
        }
    }
    Ordering::Equal
}

fn resolve_relations(
    tables: &HashMap<String, Table>,
    record: &Record,
    relations: &'static [Relation],
) -> BTreeMap<&'static str, Record> {
    relations
        .iter()
        .filter_map(|relation| {
            let id = record.int(relation.foreign_key)?;
            let joined = tables.get(relation.table)?.rows.get(&id)?;
            let projected = relation
                .columns
                .iter()
                .map(|column| (column.to_string(), joined.value(column).clone()))
                .collect();
            Some((relation.name, projected))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
