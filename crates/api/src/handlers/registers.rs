//! Register-specific endpoints: reconciliation status and account balances.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use wvdi_core::filters::FilterValue;
use wvdi_core::service::registers::TransactionStatus;
use wvdi_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::branch_scope::BranchScope;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /registers/transaction-status`.
#[derive(Debug, Deserialize)]
pub struct TransactionStatusRequest {
    pub ids: Vec<DbId>,
    /// One of `U`, `C`, `R`.
    pub status: String,
}

/// GET /api/v1/registers/balance?account_id=
///
/// Cleared, uncleared and working balance. A missing or `All` account sums
/// every account visible to the caller.
pub async fn working_balance(
    State(state): State<AppState>,
    scope: BranchScope,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let account = params
        .get("account_id")
        .map_or(FilterValue::All, |raw| FilterValue::parse(raw));

    let balance = state.service.working_balance(&account, scope.ids()).await?;

    Ok(Json(DataResponse { data: balance }))
}

/// POST /api/v1/registers/transaction-status
///
/// Reconciled entries are skipped silently.
pub async fn update_transaction_status(
    State(state): State<AppState>,
    Json(input): Json<TransactionStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let status = TransactionStatus::parse(&input.status)?;
    let updated = state
        .service
        .update_transaction_status(&input.ids, status)
        .await?;

    Ok(Json(DataResponse { data: updated }))
}
