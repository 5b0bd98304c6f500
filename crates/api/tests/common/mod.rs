//! Shared helpers for the API integration tests.
//!
//! The router is built with [`build_app_router`], the same function the
//! binary uses, over an in-memory store seeded per test.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use tower::ServiceExt;
use wvdi_api::config::{LogFormat, ServerConfig, StoreBackend};
use wvdi_api::router::build_app_router;
use wvdi_api::state::AppState;
use wvdi_core::record::Record;
use wvdi_core::service::ResourceService;
use wvdi_core::store::MemoryStore;

pub const LAST_NAMES: [&str; 5] = ["Santos", "Reyes", "Cruz", "Bautista", "Garcia"];
pub const BRANCH_CYCLE: [i64; 3] = [1, 2, 5];

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        database_url: None,
        log_format: LogFormat::Text,
    }
}

/// Build the full application router over `store`.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    let config = test_config();
    let state = AppState {
        service: ResourceService::new(store),
    };
    build_app_router(state, &config)
}

/// A store holding branches, 25 contacts, accounts, rooms and a few registers.
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());

    store
        .seed(
            "w_branches",
            [(1_i64, "Main", "A"), (2, "North", "A"), (5, "South", "A"), (7, "Closed", "I")]
                .into_iter()
                .map(|(id, name, status)| {
                    Record::new()
                        .with("id", id)
                        .with("name", name)
                        .with("branch_code", name.to_uppercase())
                        .with("status", status)
                }),
        )
        .await;

    store
        .seed(
            "w_contacts",
            (0..25).map(|i| {
                let contact_type = if i % 2 == 0 { "STUDENT" } else { "EMPLOYEE" };
                Record::new()
                    .with("first_name", format!("Person{i}"))
                    .with("last_name", LAST_NAMES[i % LAST_NAMES.len()])
                    .with("branch_id", BRANCH_CYCLE[i % BRANCH_CYCLE.len()])
                    .with("contact_type", contact_type)
                    .with("contact_status", "A")
                    .with("address1", format!("{i} Rizal St"))
                    .with("address2", "Makati")
            }),
        )
        .await;

    store
        .seed(
            "w_account_categories",
            [(1_i64, "Bank", 2_i64), (2, "Cash", 1)]
                .into_iter()
                .map(|(id, name, order)| {
                    Record::new()
                        .with("id", id)
                        .with("name", name)
                        .with("list_order", order)
                }),
        )
        .await;

    store
        .seed(
            "w_accounts",
            [
                (1_i64, "Cash on Hand", 2_i64, "A"),
                (2, "BDO Savings", 1, "A"),
                (3, "Petty Cash", 2, "I"),
            ]
            .into_iter()
            .map(|(id, name, category, status)| {
                Record::new()
                    .with("id", id)
                    .with("account_name", name)
                    .with("account_category", category)
                    .with("list_order", id)
                    .with("status", status)
            }),
        )
        .await;

    store
        .seed(
            "w_rooms",
            [(1_i64, "Room B", "A"), (1, "Room A", "A"), (2, "Lecture Hall", "A")]
                .into_iter()
                .map(|(branch_id, name, status)| {
                    Record::new()
                        .with("branch_id", branch_id)
                        .with("room_name", name)
                        .with("status", status)
                }),
        )
        .await;

    store
        .seed(
            "w_register",
            [
                register(1, 1, (2024, 3, 1), 500.0, "C"),
                register(1, 1, (2024, 3, 2), -200.0, "R"),
                register(2, 1, (2024, 3, 3), 80.0, "U"),
                register(5, 2, (2024, 3, 4), 1000.0, "C"),
            ],
        )
        .await;

    store
}

/// A register entry for `account_id` on `date`.
pub fn register(
    branch_id: i64,
    account_id: i64,
    date: (i32, u32, u32),
    amount: f64,
    status: &str,
) -> Record {
    Record::new()
        .with("branch_id", branch_id)
        .with("account_id", account_id)
        .with("date", NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap())
        .with("amount", amount)
        .with("transaction_status", status)
        .with("memo", format!("entry {amount}"))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, &[]).await
}

/// GET with an `X-Branch-Ids` header.
pub async fn get_scoped(app: Router, uri: &str, branch_ids: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, &[("x-branch-ids", branch_ids)]).await
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, method, uri, Some(body), &[]).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, &[]).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
