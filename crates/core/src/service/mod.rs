//! Resource query service.
//!
//! [`ResourceService`] is the single entry point for every list/CRUD screen:
//! it resolves the resource descriptor, plans the operation, runs it against
//! the configured [`RecordStore`] and shapes the results. It holds no state
//! besides the shared store handle and is cheap to clone.

pub mod exports;
pub mod reference;
pub mod registers;

use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreError;
use crate::filters::ListFilters;
use crate::planner;
use crate::record::Record;
use crate::resource;
use crate::shaping;
use crate::store::RecordStore;
use crate::types::DbId;

/// One page of shaped records plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub data: Vec<Record>,
    pub count: i64,
}

#[derive(Clone)]
pub struct ResourceService {
    store: Arc<dyn RecordStore>,
}

impl ResourceService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Backing-store connectivity check.
    pub async fn ping(&self) -> Result<(), CoreError> {
        self.store.ping().await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// One page of `resource` matching `filters`.
    ///
    /// `authorized_branch_ids` restricts branch-scoped resources when the
    /// branch filter is `All`; `None` or an empty list means unrestricted.
    pub async fn list(
        &self,
        resource: &str,
        filters: &ListFilters,
        authorized_branch_ids: Option<&[DbId]>,
    ) -> Result<Page, CoreError> {
        let resource = resource::find(resource)?;
        let query = planner::plan_list(resource, filters, authorized_branch_ids)?;

        let count = self.store.count(&query).await?;
        let rows = self.store.select(&query).await?;

        let data: Vec<Record> = rows
            .into_iter()
            .map(|row| shaping::shape(resource, row))
            .collect();

        tracing::debug!(
            resource = resource.name,
            page = filters.page,
            items = filters.items,
            returned = data.len(),
            count,
            "Listed records",
        );

        Ok(Page { data, count })
    }

    /// A single shaped record, or `None` when no row matches.
    pub async fn get_by_id(&self, resource: &str, id: DbId) -> Result<Option<Record>, CoreError> {
        let resource = resource::find(resource)?;

        let mut query = planner::base_query(resource);
        query.conditions = planner::id_conditions(resource, id);
        let query = query.window(1, 0);

        let row = self.store.select(&query).await?.into_iter().next();

        tracing::debug!(resource = resource.name, id, found = row.is_some(), "Fetched record");

        Ok(row.map(|row| shaping::shape(resource, row)))
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a record built from the writable fields of `input`.
    ///
    /// Returns the row as stored, without derived display fields.
    pub async fn create(&self, resource: &str, input: &Record) -> Result<Record, CoreError> {
        let resource = resource::find(resource)?;
        let values = planner::prepare_create(resource, input)?;

        let created = self
            .store
            .insert(resource.table, resource.fields, &values)
            .await?;

        tracing::info!(
            resource = resource.name,
            id = ?created.int("id"),
            "Record created",
        );

        Ok(created)
    }

    /// Partially update a record; fails with `NotFound` when no row matches.
    pub async fn update(
        &self,
        resource: &str,
        id: DbId,
        input: &Record,
    ) -> Result<Record, CoreError> {
        let descriptor = resource::find(resource)?;
        let values = planner::prepare_update(descriptor, input)?;

        let not_found = || CoreError::NotFound {
            entity: descriptor.entity,
            id,
        };

        if values.is_empty() {
            return self.get_by_id(resource, id).await?.ok_or_else(not_found);
        }

        let conditions = planner::id_conditions(descriptor, id);
        let updated = self
            .store
            .update(descriptor.table, descriptor.fields, &conditions, &values)
            .await?
            .into_iter()
            .next()
            .ok_or_else(not_found)?;

        tracing::info!(
            resource = descriptor.name,
            id,
            fields = values.len(),
            "Record updated",
        );

        Ok(updated)
    }

    /// Delete by id. Succeeds whether or not the row existed.
    pub async fn delete(&self, resource: &str, id: DbId) -> Result<bool, CoreError> {
        let resource = resource::find(resource)?;
        let conditions = planner::id_conditions(resource, id);

        let removed = self.store.delete(resource.table, &conditions).await?;

        tracing::info!(resource = resource.name, id, removed, "Record deleted");

        Ok(true)
    }

    /// Delete every listed id. An empty list is a no-op.
    pub async fn delete_many(&self, resource: &str, ids: &[DbId]) -> Result<bool, CoreError> {
        let resource = resource::find(resource)?;
        if ids.is_empty() {
            return Ok(true);
        }

        let conditions = planner::ids_conditions(resource, ids);
        let removed = self.store.delete(resource.table, &conditions).await?;

        tracing::info!(
            resource = resource.name,
            requested = ids.len(),
            removed,
            "Records deleted",
        );

        Ok(true)
    }
}
