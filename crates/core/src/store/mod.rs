//! Backing-store abstraction.
//!
//! The service layer plans every operation as a [`RecordQuery`] or a set of
//! [`Condition`]s and hands it to a [`RecordStore`]. Implementations:
//!
//! - [`memory::MemoryStore`]: in-process tables, used by tests and local runs.
//! - `wvdi_db::PgStore`: PostgreSQL via sqlx.

pub mod memory;

use async_trait::async_trait;

use crate::query::{Condition, RecordQuery, StoredRow};
use crate::record::Record;
use crate::resource::FieldSpec;

pub use memory::MemoryStore;

/// Boxed error from the underlying driver.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A failed store operation, carrying the driver error as its source.
#[derive(Debug, thiserror::Error)]
#[error("{operation} on {table} failed: {source}")]
pub struct StoreError {
    pub operation: &'static str,
    pub table: String,
    #[source]
    pub source: BoxError,
}

impl StoreError {
    pub fn new(
        operation: &'static str,
        table: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            operation,
            table: table.into(),
            source: source.into(),
        }
    }
}

/// Storage operations the resource service is written against.
///
/// `fields` always describes the columns of `table`, so implementations can
/// bind and decode values by declared kind.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch rows matching `query`, with its relations resolved.
    async fn select(&self, query: &RecordQuery) -> Result<Vec<StoredRow>, StoreError>;

    /// Count rows matching the conditions of `query`, ignoring its window.
    async fn count(&self, query: &RecordQuery) -> Result<i64, StoreError>;

    /// Insert one row and return it as stored.
    async fn insert(
        &self,
        table: &'static str,
        fields: &'static [FieldSpec],
        values: &Record,
    ) -> Result<Record, StoreError>;

    /// Apply `values` to every row matching `conditions`; returns the updated rows.
    async fn update(
        &self,
        table: &'static str,
        fields: &'static [FieldSpec],
        conditions: &[Condition],
        values: &Record,
    ) -> Result<Vec<Record>, StoreError>;

    /// Delete every row matching `conditions`; returns the number removed.
    async fn delete(&self, table: &'static str, conditions: &[Condition])
        -> Result<u64, StoreError>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;
}
