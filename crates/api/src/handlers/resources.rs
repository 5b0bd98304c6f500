//! Generic CRUD handlers over every resource in the catalogue.
//!
//! The `{resource}` path segment names a catalogue entry (`contacts`,
//! `registers`, ...); unknown names are a 404. Listing accepts the filter
//! criteria as a flat query string and honours the caller's
//! [`BranchScope`].

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use wvdi_core::error::CoreError;
use wvdi_core::filters::ListFilters;
use wvdi_core::record::Record;
use wvdi_core::resource;
use wvdi_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::middleware::branch_scope::BranchScope;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /resources/{resource}/bulk-delete`.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<DbId>,
}

/// GET /api/v1/resources/{resource}
///
/// One page of records plus the total match count, as `{ data, count }`.
pub async fn list_records(
    State(state): State<AppState>,
    scope: BranchScope,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let filters = ListFilters::from_params(&params)?;
    let page = state.service.list(&resource, &filters, scope.ids()).await?;

    Ok(Json(page))
}

/// GET /api/v1/resources/{resource}/{id}
pub async fn get_record(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let descriptor = resource::find(&resource)?;
    let record = state
        .service
        .get_by_id(descriptor.name, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: descriptor.entity,
            id,
        }))?;

    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/resources/{resource}
///
/// Only the resource's writable fields are stored; anything else in the
/// body is ignored.
pub async fn create_record(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Json(input): Json<Record>,
) -> AppResult<impl IntoResponse> {
    let created = state.service.create(&resource, &input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/resources/{resource}/{id}
///
/// Partial update; omitted fields keep their stored values.
pub async fn update_record(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, DbId)>,
    Json(input): Json<Record>,
) -> AppResult<impl IntoResponse> {
    let updated = state.service.update(&resource, id, &input).await?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/resources/{resource}/{id}
///
/// Succeeds with 204 whether or not the record existed.
pub async fn delete_record(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    state.service.delete(&resource, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resources/{resource}/bulk-delete
pub async fn bulk_delete_records(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Json(input): Json<BulkDeleteRequest>,
) -> AppResult<impl IntoResponse> {
    let deleted = state.service.delete_many(&resource, &input.ids).await?;

    Ok(Json(DataResponse { data: deleted }))
}
