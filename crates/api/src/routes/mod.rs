pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /resources/{resource}                    list, create
/// /resources/{resource}/bulk-delete        delete many (POST)
/// /resources/{resource}/{id}               get, update, delete
///
/// /branches/active                         active branches
/// /accounts/active                         active accounts with category name
/// /accounts/categories                     account categories
/// /rooms/active?branch_id=                 active rooms
/// /instructors?branch_id=                  active employees
/// /lookups/categories                      distinct lookup categories
/// /services/code-exists                    service code uniqueness check
///
/// /registers/balance                       working balance of an account
/// /registers/transaction-status            bulk status change (POST)
///
/// /exports/{kind}                          export rows
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/resources/{resource}",
            get(handlers::resources::list_records).post(handlers::resources::create_record),
        )
        .route(
            "/resources/{resource}/bulk-delete",
            post(handlers::resources::bulk_delete_records),
        )
        .route(
            "/resources/{resource}/{id}",
            get(handlers::resources::get_record)
                .put(handlers::resources::update_record)
                .delete(handlers::resources::delete_record),
        )
        .route("/branches/active", get(handlers::reference::active_branches))
        .route("/accounts/active", get(handlers::reference::active_accounts))
        .route(
            "/accounts/categories",
            get(handlers::reference::account_categories),
        )
        .route("/rooms/active", get(handlers::reference::active_rooms))
        .route("/instructors", get(handlers::reference::instructors))
        .route(
            "/lookups/categories",
            get(handlers::reference::lookup_categories),
        )
        .route(
            "/services/code-exists",
            get(handlers::reference::service_code_exists),
        )
        .route("/registers/balance", get(handlers::registers::working_balance))
        .route(
            "/registers/transaction-status",
            post(handlers::registers::update_transaction_status),
        )
        .route("/exports/{kind}", get(handlers::exports::export_rows))
}
