//! Branch authorization extractor.
//!
//! The upstream session provider forwards the branches the caller may see
//! in the `X-Branch-Ids` header as comma-separated ids. The list is trusted
//! as given.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use wvdi_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

pub const BRANCH_IDS_HEADER: &str = "x-branch-ids";

/// Authorized branch ids of the caller; `None` when the header is absent or
/// blank, which leaves branch-scoped resources unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchScope(pub Option<Vec<DbId>>);

impl BranchScope {
    pub fn ids(&self) -> Option<&[DbId]> {
        self.0.as_deref()
    }

    /// Parse a comma-separated id list. Blank entries are skipped.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let ids = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<DbId>().map_err(|_| {
                    AppError::BadRequest(format!("Invalid branch id '{s}' in X-Branch-Ids"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(if ids.is_empty() {
            BranchScope(None)
        } else {
            BranchScope(Some(ids))
        })
    }
}

impl FromRequestParts<AppState> for BranchScope {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(BRANCH_IDS_HEADER) else {
            return Ok(BranchScope(None));
        };

        let raw = header.to_str().map_err(|_| {
            AppError::BadRequest("X-Branch-Ids must be ASCII comma-separated ids".into())
        })?;

        BranchScope::parse(raw)
    }
}
