//! [`RecordStore`] implementation over a PostgreSQL pool.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, Row};
use wvdi_core::query::{Condition, RecordQuery, StoredRow};
use wvdi_core::record::Record;
use wvdi_core::resource::FieldSpec;
use wvdi_core::store::{RecordStore, StoreError};

use crate::sql::{self, BindValue, Statement};
use crate::DbPool;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn select(&self, query: &RecordQuery) -> Result<Vec<StoredRow>, StoreError> {
        let stmt = sql::select(query);
        let rows = bind_values(sqlx::query(&stmt.sql), &stmt.binds)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| failed("select", query.table, &stmt, e))?;

        rows.iter()
            .map(|row| decode_stored_row(row, query))
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| StoreError::new("decode", query.table, e))
    }

    async fn count(&self, query: &RecordQuery) -> Result<i64, StoreError> {
        let stmt = sql::count(query);
        let row = bind_values(sqlx::query(&stmt.sql), &stmt.binds)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| failed("count", query.table, &stmt, e))?;

        row.try_get::<i64, _>(0)
            .map_err(|e| StoreError::new("decode", query.table, e))
    }

    async fn insert(
        &self,
        table: &'static str,
        fields: &'static [FieldSpec],
        values: &Record,
    ) -> Result<Record, StoreError> {
        let stmt = sql::insert(table, fields, values);
        let row = bind_values(sqlx::query(&stmt.sql), &stmt.binds)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| failed("insert", table, &stmt, e))?;

        decode_record(&row, fields).map_err(|e| StoreError::new("decode", table, e))
    }

    async fn update(
        &self,
        table: &'static str,
        fields: &'static [FieldSpec],
        conditions: &[Condition],
        values: &Record,
    ) -> Result<Vec<Record>, StoreError> {
        let stmt = sql::update(table, fields, conditions, values);
        let rows = bind_values(sqlx::query(&stmt.sql), &stmt.binds)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| failed("update", table, &stmt, e))?;

        rows.iter()
            .map(|row| decode_record(row, fields))
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| StoreError::new("decode", table, e))
    }

    async fn delete(
        &self,
        table: &'static str,
        conditions: &[Condition],
    ) -> Result<u64, StoreError> {
        let stmt = sql::delete(table, conditions);
        let result = bind_values(sqlx::query(&stmt.sql), &stmt.binds)
            .execute(&self.pool)
            .await
            .map_err(|e| failed("delete", table, &stmt, e))?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(|e| StoreError::new("ping", "database", e))
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn failed(operation: &'static str, table: &str, stmt: &Statement, err: sqlx::Error) -> StoreError {
    tracing::debug!(operation, table, sql = %stmt.sql, error = %err, "Statement failed");
    StoreError::new(operation, table, err)
}

fn decode_record(row: &PgRow, fields: &[FieldSpec]) -> Result<Record, sqlx::Error> {
    let json: serde_json::Value = row.try_get(sql::RECORD_COLUMN)?;
    Ok(Record::from_json_row(&json, fields))
}

fn decode_stored_row(row: &PgRow, query: &RecordQuery) -> Result<StoredRow, sqlx::Error> {
    let record = decode_record(row, query.fields)?;

    let mut relations = BTreeMap::new();
    for relation in query.relations {
        let json: Option<serde_json::Value> =
            row.try_get(sql::relation_column(relation).as_str())?;
        if let Some(json) = json {
            relations.insert(relation.name, Record::from_json_row(&json, &[]));
        }
    }

    Ok(StoredRow { record, relations })
}

/// Bind a slice of `BindValue` to a sqlx `Query`.
fn bind_values<'q>(
    mut q: Query<'q, Postgres, PgArguments>,
    bind_values: &'q [BindValue],
) -> Query<'q, Postgres, PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Numeric(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_deref()),
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Date(v) => q = q.bind(*v),
            BindValue::Timestamp(v) => q = q.bind(*v),
            BindValue::BigIntArray(v) => q = q.bind(v.as_slice()),
            BindValue::NumericArray(v) => q = q.bind(v.as_slice()),
            BindValue::TextArray(v) => q = q.bind(v.as_slice()),
            BindValue::BoolArray(v) => q = q.bind(v.as_slice()),
            BindValue::DateArray(v) => q = q.bind(v.as_slice()),
            BindValue::TimestampArray(v) => q = q.bind(v.as_slice()),
        }
    }
    q
}
