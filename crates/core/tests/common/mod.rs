//! Shared fixtures for the service tests.
//!
//! Every test builds its own [`MemoryStore`] so tests stay independent.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use wvdi_core::query::{Condition, RecordQuery, StoredRow};
use wvdi_core::record::Record;
use wvdi_core::resource::FieldSpec;
use wvdi_core::service::ResourceService;
use wvdi_core::store::{MemoryStore, RecordStore, StoreError};

pub const LAST_NAMES: [&str; 5] = ["Santos", "Reyes", "Cruz", "Bautista", "Garcia"];
pub const BRANCH_CYCLE: [i64; 3] = [1, 2, 5];

/// A service over a fresh, empty store.
pub fn empty() -> (Arc<MemoryStore>, ResourceService) {
    let store = Arc::new(MemoryStore::new());
    let service = ResourceService::new(store.clone());
    (store, service)
}

/// A service over a store holding branches, 25 contacts, accounts and lookups.
pub async fn seeded() -> (Arc<MemoryStore>, ResourceService) {
    let (store, service) = empty();
    seed_branches(&store).await;
    seed_contacts(&store, 25).await;
    seed_accounts(&store).await;
    seed_lookups(&store).await;
    (store, service)
}

pub async fn seed_branches(store: &MemoryStore) {
    store
        .seed(
            "w_branches",
            [
                (1_i64, "Main", "A"),
                (2, "North", "A"),
                (5, "South", "A"),
                (7, "Closed", "I"),
            ]
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
}

/// `n` contacts cycling through [`LAST_NAMES`] and [`BRANCH_CYCLE`];
/// even-numbered contacts are students, odd-numbered employees.
pub async fn seed_contacts(store: &MemoryStore, n: usize) {
    store
        .seed(
            "w_contacts",
            (0..n).map(|i| {
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
}

/// Two active accounts, one closed account and their categories.
pub async fn seed_accounts(store: &MemoryStore) {
    store
        .seed(
            "w_account_categories",
            [(1_i64, "Bank", 2_i64), (2, "Cash", 1), (3, "Assets", 1)]
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
                (1_i64, "Cash on Hand", 2_i64, 0_i64, "A"),
                (2, "BDO Savings", 1, 1, "A"),
                (3, "Petty Cash", 2, 0, "I"),
            ]
            .into_iter()
            .map(|(id, name, category, order, status)| {
                Record::new()
                    .with("id", id)
                    .with("account_name", name)
                    .with("account_category", category)
                    .with("list_order", order)
                    .with("status", status)
            }),
        )
        .await;
}

pub async fn seed_rooms(store: &MemoryStore) {
    store
        .seed(
            "w_rooms",
            [
                (1_i64, "Room B", "A"),
                (1, "Room A", "A"),
                (2, "Lecture Hall", "A"),
                (1, "Storage", "I"),
            ]
            .into_iter()
            .map(|(branch_id, name, status)| {
                Record::new()
                    .with("branch_id", branch_id)
                    .with("room_name", name)
                    .with("status", status)
            }),
        )
        .await;
}

pub async fn seed_lookups(store: &MemoryStore) {
    store
        .seed(
            "w_lookup",
            [
                ("PAYMENT_METHOD", "Cheque", 2_i64, true),
                ("GENDER", "Female", 1, true),
                ("PAYMENT_METHOD", "Cash", 1, true),
                ("GENDER", "Male", 0, true),
                ("PAYMENT_METHOD", "GCash", 3, false),
                ("", "Orphan", 0, true),
            ]
            .into_iter()
            .map(|(category, value, order, active)| {
                Record::new()
                    .with("category", category)
                    .with("value", value)
                    .with("list_order", order)
                    .with("is_active", active)
            }),
        )
        .await;
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
// Failing store
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
#[error("connection refused")]
pub struct ConnectionRefused;

/// A store whose every operation fails.
pub struct UnavailableStore;

#[async_trait]
impl RecordStore for UnavailableStore {
    async fn select(&self, query: &RecordQuery) -> Result<Vec<StoredRow>, StoreError> {
        Err(StoreError::new("select", query.table, ConnectionRefused))
    }

    async fn count(&self, query: &RecordQuery) -> Result<i64, StoreError> {
        Err(StoreError::new("count", query.table, ConnectionRefused))
    }

    async fn insert(
        &self,
        table: &'static str,
        _fields: &'static [FieldSpec],
        _values: &Record,
    ) -> Result<Record, StoreError> {
        Err(StoreError::new("insert", table, ConnectionRefused))
    }

    async fn update(
        &self,
        table: &'static str,
        _fields: &'static [FieldSpec],
        _conditions: &[Condition],
        _values: &Record,
    ) -> Result<Vec<Record>, StoreError> {
        Err(StoreError::new("update", table, ConnectionRefused))
    }

    async fn delete(
        &self,
        table: &'static str,
        _conditions: &[Condition],
    ) -> Result<u64, StoreError> {
        Err(StoreError::new("delete", table, ConnectionRefused))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::new("ping", "store", ConnectionRefused))
    }
}
