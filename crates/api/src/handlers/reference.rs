//! Reference data for pickers and form validation.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use wvdi_core::types::DbId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CodeExistsParams {
    #[serde(default)]
    pub code: String,
    pub exclude_id: Option<DbId>,
}

/// Optional branch restriction for branch-bound pickers.
#[derive(Debug, Deserialize)]
pub struct BranchParams {
    pub branch_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct CodeExistsResponse {
    pub exists: bool,
}

/// GET /api/v1/branches/active
pub async fn active_branches(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let branches = state.service.active_branches().await?;

    Ok(Json(DataResponse { data: branches }))
}

/// GET /api/v1/accounts/active
pub async fn active_accounts(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let accounts = state.service.active_accounts().await?;

    Ok(Json(DataResponse { data: accounts }))
}

/// GET /api/v1/accounts/categories
pub async fn account_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = state.service.account_categories().await?;

    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/rooms/active?branch_id=
pub async fn active_rooms(
    State(state): State<AppState>,
    Query(params): Query<BranchParams>,
) -> AppResult<impl IntoResponse> {
    let rooms = state.service.active_rooms(params.branch_id).await?;

    Ok(Json(DataResponse { data: rooms }))
}

/// GET /api/v1/instructors?branch_id=
pub async fn instructors(
    State(state): State<AppState>,
    Query(params): Query<BranchParams>,
) -> AppResult<impl IntoResponse> {
    let instructors = state.service.instructors(params.branch_id).await?;

    Ok(Json(DataResponse { data: instructors }))
}

/// GET /api/v1/lookups/categories
pub async fn lookup_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = state.service.lookup_categories().await?;

    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/services/code-exists?code=&exclude_id=
///
/// `exclude_id` skips the service being edited.
pub async fn service_code_exists(
    State(state): State<AppState>,
    Query(params): Query<CodeExistsParams>,
) -> AppResult<impl IntoResponse> {
    let exists = state
        .service
        .service_code_exists(&params.code, params.exclude_id)
        .await?;

    Ok(Json(DataResponse {
        data: CodeExistsResponse { exists },
    }))
}
