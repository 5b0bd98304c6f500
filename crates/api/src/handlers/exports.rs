//! Export rows for registers, students and requisitions.
//!
//! Rows come back as JSON; the client renders the spreadsheet.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use wvdi_core::service::exports::{ExportFilters, ExportKind};

use crate::error::AppResult;
use crate::middleware::branch_scope::BranchScope;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/exports/{kind}?date_from=&date_to=&branch_id=
pub async fn export_rows(
    State(state): State<AppState>,
    scope: BranchScope,
    Path(kind): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let kind: ExportKind = kind.parse()?;
    let filters = ExportFilters::from_params(&params)?;

    let rows = state.service.export(kind, &filters, scope.ids()).await?;

    Ok(Json(DataResponse { data: rows }))
}
