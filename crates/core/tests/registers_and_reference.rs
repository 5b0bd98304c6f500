//! Service tests for the register, reference-data and export helpers.

mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use wvdi_core::error::CoreError;
use wvdi_core::filters::FilterValue;
use wvdi_core::record::Record;
use wvdi_core::service::exports::{ExportFilters, ExportKind};
use wvdi_core::service::registers::TransactionStatus;
use wvdi_core::store::MemoryStore;

async fn seed_registers(store: &MemoryStore) {
    store
        .seed(
            "w_register",
            [
                common::register(1, 1, (2024, 1, 5), 100.0, "U"),
                common::register(1, 1, (2024, 1, 20), 200.0, "C"),
                common::register(2, 1, (2024, 2, 10), 50.0, "R"),
                common::register(2, 1, (2024, 2, 11), -30.0, "C"),
                common::register(5, 2, (2024, 3, 15), 1000.0, "U"),
                common::register(5, 1, (2024, 3, 16), -20.0, "U"),
            ],
        )
        .await;
}

// ---------------------------------------------------------------------------
// Transaction status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn transaction_status_update_skips_reconciled_rows() {
    let (store, service) = common::seeded().await;
    seed_registers(&store).await;

    assert!(service
        .update_transaction_status(&[1, 2, 3], TransactionStatus::Uncleared)
        .await
        .unwrap());

    let status = |row: Option<Record>| row.and_then(|r| r.text("transaction_status").map(str::to_string));
    assert_eq!(status(store.row("w_register", 1).await).as_deref(), Some("U"));
    assert_eq!(status(store.row("w_register", 2).await).as_deref(), Some("U"));
    assert_eq!(status(store.row("w_register", 3).await).as_deref(), Some("R"));
}

#[tokio::test]
async fn transaction_status_update_leaves_unlisted_rows() {
    let (store, service) = common::seeded().await;
    seed_registers(&store).await;

    service
        .update_transaction_status(&[1], TransactionStatus::Cleared)
        .await
        .unwrap();

    let untouched = store.row("w_register", 6).await.unwrap();
    assert_eq!(untouched.text("transaction_status"), Some("U"));
}

// ---------------------------------------------------------------------------
// Working balance
// ---------------------------------------------------------------------------

#[tokio::test]
async fn working_balance_sums_cleared_and_uncleared_separately() {
    let (store, service) = common::seeded().await;
    seed_registers(&store).await;

    let balance = service
        .working_balance(&FilterValue::from(1_i64), None)
        .await
        .unwrap();

    assert_eq!(balance.cleared, 220.0);
    assert_eq!(balance.uncleared, 80.0);
    assert_eq!(balance.working_balance, 300.0);
}

#[tokio::test]
async fn working_balance_for_all_accounts() {
    let (store, service) = common::seeded().await;
    seed_registers(&store).await;

    let balance = service.working_balance(&FilterValue::All, None).await.unwrap();

    assert_eq!(balance.cleared, 220.0);
    assert_eq!(balance.uncleared, 1080.0);
}

#[tokio::test]
async fn working_balance_respects_authorized_branches() {
    let (store, service) = common::seeded().await;
    seed_registers(&store).await;

    let balance = service
        .working_balance(&FilterValue::from(1_i64), Some(&[1]))
        .await
        .unwrap();

    assert_eq!(balance.cleared, 200.0);
    assert_eq!(balance.uncleared, 100.0);
}

#[tokio::test]
async fn working_balance_rejects_non_numeric_account() {
    let (_store, service) = common::seeded().await;
    assert_matches!(
        service
            .working_balance(&FilterValue::parse("cash"), None)
            .await,
        Err(CoreError::InvalidArgument(_))
    );
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn active_branches_are_sorted_by_name() {
    let (_store, service) = common::seeded().await;

    let branches = service.active_branches().await.unwrap();

    let names: Vec<_> = branches.iter().filter_map(|b| b.text("name")).collect();
    assert_eq!(names, ["Main", "North", "South"]);
}

#[tokio::test]
async fn active_accounts_carry_category_name_in_list_order() {
    let (_store, service) = common::seeded().await;

    let accounts = service.active_accounts().await.unwrap();

    let rows: Vec<_> = accounts
        .iter()
        .map(|a| (a.text("account_name"), a.text("category_name")))
        .collect();
    assert_eq!(
        rows,
        [
            (Some("Cash on Hand"), Some("Cash")),
            (Some("BDO Savings"), Some("Bank")),
        ]
    );
}

#[tokio::test]
async fn account_without_category_has_empty_category_name() {
    let (store, service) = common::empty();
    store
        .seed("w_accounts", [Record::new().with("account_name", "Suspense").with("status", "A")])
        .await;

    let accounts = service.active_accounts().await.unwrap();

    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].text("category_name"), Some(""));
}

#[tokio::test]
async fn account_categories_order_by_list_order_then_name() {
    let (_store, service) = common::seeded().await;

    let categories = service.account_categories().await.unwrap();

    let names: Vec<_> = categories.iter().filter_map(|c| c.text("name")).collect();
    assert_eq!(names, ["Assets", "Cash", "Bank"]);
}

#[tokio::test]
async fn active_rooms_by_name_and_branch() {
    let (store, service) = common::seeded().await;
    common::seed_rooms(&store).await;

    let all = service.active_rooms(None).await.unwrap();
    let names: Vec<_> = all.iter().filter_map(|r| r.text("room_name")).collect();
    assert_eq!(names, ["Lecture Hall", "Room A", "Room B"]);

    let main = service.active_rooms(Some(1)).await.unwrap();
    let names: Vec<_> = main.iter().filter_map(|r| r.text("room_name")).collect();
    assert_eq!(names, ["Room A", "Room B"]);
    assert_eq!(main[0].text("branch_name"), Some("Main"));
}

#[tokio::test]
async fn instructors_are_active_employees_of_the_branch() {
    let (store, service) = common::seeded().await;
    store
        .seed(
            "w_contacts",
            [Record::new()
                .with("first_name", "Retired")
                .with("last_name", "Cruz")
                .with("branch_id", 1_i64)
                .with("contact_type", "EMPLOYEE")
                .with("contact_status", "I")],
        )
        .await;

    let all = service.instructors(None).await.unwrap();
    // odd-numbered seeded contacts are employees
    assert_eq!(all.len(), 12);
    assert!(all.iter().all(|i| i.text("contact_type") == Some("EMPLOYEE")));

    let main = service.instructors(Some(1)).await.unwrap();
    assert!(!main.is_empty());
    assert!(main.iter().all(|i| i.int("branch_id") == Some(1)));
    assert!(main.iter().all(|i| i.text("first_name") != Some("Retired")));
}

#[tokio::test]
async fn lookup_categories_are_distinct_and_non_empty() {
    let (_store, service) = common::seeded().await;
    let categories = service.lookup_categories().await.unwrap();
    assert_eq!(categories, ["GENDER", "PAYMENT_METHOD"]);
}

#[tokio::test]
async fn service_code_exists_can_exclude_the_edited_row() {
    let (store, service) = common::empty();
    store
        .seed(
            "w_services",
            [Record::new().with("service_code", "PDC").with("description", "Practical")],
        )
        .await;

    assert!(service.service_code_exists("PDC", None).await.unwrap());
    assert!(!service.service_code_exists("PDC", Some(1)).await.unwrap());
    assert!(!service.service_code_exists("TDC", None).await.unwrap());
    assert_matches!(
        service.service_code_exists("  ", None).await,
        Err(CoreError::InvalidArgument(_))
    );
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

#[tokio::test]
async fn student_export_ignores_dates_and_sorts_by_last_name() {
    let (_store, service) = common::seeded().await;
    let filters = ExportFilters {
        date_from: NaiveDate::from_ymd_opt(2099, 1, 1),
        ..ExportFilters::default()
    };

    let rows = service
        .export(ExportKind::Students, &filters, None)
        .await
        .unwrap();

    assert_eq!(rows.len(), 13);
    let names: Vec<_> = rows.iter().filter_map(|r| r.text("last_name")).collect();
    assert!(names.windows(2).all(|w| w[0] <= w[1]), "{names:?}");
    assert!(rows.iter().all(|r| r.text("contact_type") == Some("STUDENT")));
    assert_eq!(rows[0].text("address").map(|a| a.ends_with(", Makati")), Some(true));
}

#[tokio::test]
async fn student_export_is_branch_scoped() {
    let (_store, service) = common::seeded().await;

    let rows = service
        .export(ExportKind::Students, &ExportFilters::default(), Some(&[2]))
        .await
        .unwrap();

    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.int("branch_id") == Some(2)));
}

#[tokio::test]
async fn register_export_applies_date_range_newest_first() {
    let (store, service) = common::seeded().await;
    seed_registers(&store).await;
    let filters = ExportFilters {
        date_from: NaiveDate::from_ymd_opt(2024, 1, 20),
        date_to: NaiveDate::from_ymd_opt(2024, 2, 11),
        branch_id: FilterValue::All,
    };

    let rows = service
        .export(ExportKind::Registers, &filters, None)
        .await
        .unwrap();

    let dates: Vec<_> = rows.iter().map(|r| r.value("date").to_string()).collect();
    assert_eq!(dates, ["2024-02-11", "2024-02-10", "2024-01-20"]);
    assert_eq!(rows[0].decimal("outflow"), Some(30.0));
}
