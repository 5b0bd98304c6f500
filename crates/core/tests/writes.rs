//! Service tests for create, update and delete.

mod common;

use assert_matches::assert_matches;
use wvdi_core::error::CoreError;
use wvdi_core::filters::ListFilters;
use wvdi_core::record::{FieldValue, Record};

// ---------------------------------------------------------------------------
// create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_get_returns_declared_fields() {
    let (_store, service) = common::seeded().await;
    let input = Record::new()
        .with("brand", "Toyota")
        .with("model", "Vios")
        .with("color", "White")
        .with("plate_number", "NAB 1234")
        .with("branch_id", 2_i64)
        .with("price_purchased", 650_000.0);

    let created = service.create("vehicles", &input).await.unwrap();
    let id = created.int("id").unwrap();
    let fetched = service.get_by_id("vehicles", id).await.unwrap().unwrap();

    for (field, value) in input.iter() {
        assert_eq!(fetched.get(field), Some(value), "{field}");
    }
    assert_eq!(fetched.text("status"), Some("A"));
    assert_eq!(fetched.text("full_name"), Some("White Toyota Vios"));
    assert_eq!(fetched.text("branch_name"), Some("North"));
}

#[tokio::test]
async fn create_ignores_non_writable_fields() {
    let (store, service) = common::empty();
    let input = Record::new()
        .with("service_code", "TDC")
        .with("description", "Theoretical Driving Course")
        .with("id", 4_242_i64)
        .with("updated_by", 7_i64)
        .with("discount_code", "FREE");

    let created = service.create("services", &input).await.unwrap();

    assert_eq!(created.int("id"), Some(1));
    let stored = store.row("w_services", 1).await.unwrap();
    assert!(!stored.contains("updated_by"));
    assert!(!stored.contains("discount_code"));
}

#[tokio::test]
async fn create_coerces_loosely_typed_input() {
    let (_store, service) = common::empty();
    let input = Record::new()
        .with("category", "GENDER")
        .with("value", "Other")
        .with("list_order", "4")
        .with("is_active", "false");

    let created = service.create("lookups", &input).await.unwrap();

    assert_eq!(created.get("list_order"), Some(&FieldValue::Integer(4)));
    assert_eq!(created.get("is_active"), Some(&FieldValue::Bool(false)));
}

#[tokio::test]
async fn create_rejects_uncoercible_input() {
    let (store, service) = common::empty();
    let input = Record::new().with("start_date", "next tuesday");

    assert_matches!(
        service.create("vehicles", &input).await,
        Err(CoreError::InvalidArgument(_))
    );
    assert_eq!(store.row_count("w_vehicles").await, 0);
}

#[tokio::test]
async fn create_student_sets_contact_type() {
    let (_store, service) = common::seeded().await;
    let input = Record::new()
        .with("first_name", "Liza")
        .with("last_name", "Soberano")
        .with("branch_id", 1_i64);

    let created = service.create("students", &input).await.unwrap();

    assert_eq!(created.text("contact_type"), Some("STUDENT"));
    assert_eq!(created.text("contact_status"), Some("A"));
}

#[tokio::test]
async fn create_register_derives_amount_from_flows() {
    let (_store, service) = common::seeded().await;
    let input = Record::new()
        .with("branch_id", 1_i64)
        .with("account_id", 1_i64)
        .with("date", "2024-05-01")
        .with("outflow", "300.50")
        .with("transaction_status", "R");

    let created = service.create("registers", &input).await.unwrap();

    assert_eq!(created.decimal("amount"), Some(-300.5));
    assert_eq!(created.text("transaction_status"), Some("U"));
}

#[tokio::test]
async fn create_schedule_accepts_start_end_and_defaults_status() {
    let (store, service) = common::seeded().await;
    let input = Record::new()
        .with("branch_id", 1_i64)
        .with("date", "2024-05-01")
        .with("start", "2024-05-01T09:00:00Z")
        .with("end", "2024-05-01T11:00:00Z");

    let created = service.create("schedules", &input).await.unwrap();

    assert_eq!(created.text("status"), Some("confirmed"));
    let stored = store.row("w_schedules", created.int("id").unwrap()).await.unwrap();
    assert_matches!(stored.value("start_time"), FieldValue::Timestamp(_));
    assert_matches!(stored.value("end_time"), FieldValue::Timestamp(_));
    assert!(!stored.contains("start"));
    assert!(!stored.contains("end"));
}

// ---------------------------------------------------------------------------
// update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let (store, service) = common::seeded().await;

    let updated = service
        .update("contacts", 4, &Record::new().with("nick_name", "Bong"))
        .await
        .unwrap();

    assert_eq!(updated.text("nick_name"), Some("Bong"));
    let stored = store.row("w_contacts", 4).await.unwrap();
    assert_eq!(stored.text("first_name"), Some("Person3"));
    assert_eq!(stored.text("last_name"), Some("Bautista"));
}

#[tokio::test]
async fn update_schedule_moves_end_through_alias() {
    let (_store, service) = common::seeded().await;
    let created = service
        .create(
            "schedules",
            &Record::new()
                .with("branch_id", 1_i64)
                .with("start_time", "2024-05-01T09:00:00Z")
                .with("end_time", "2024-05-01T10:00:00Z")
                .with("status", "pending"),
        )
        .await
        .unwrap();

    let updated = service
        .update(
            "schedules",
            created.int("id").unwrap(),
            &Record::new().with("end", "2024-05-01T12:30:00Z"),
        )
        .await
        .unwrap();

    assert_eq!(updated.text("status"), Some("pending"));
    assert_matches!(
        updated.value("end_time"),
        FieldValue::Timestamp(t) if t.to_rfc3339() == "2024-05-01T12:30:00+00:00"
    );
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
    let (_store, service) = common::seeded().await;
    assert_matches!(
        service
            .update("contacts", 9_999, &Record::new().with("nick_name", "Ghost"))
            .await,
        Err(CoreError::NotFound { entity: "Contact", id: 9_999 })
    );
}

#[tokio::test]
async fn update_without_writable_fields_returns_current_record() {
    let (_store, service) = common::seeded().await;

    let current = service
        .update("contacts", 2, &Record::new().with("created_at", "2001-01-01"))
        .await
        .unwrap();

    assert_eq!(current.int("id"), Some(2));
    assert_eq!(current.text("last_name"), Some("Reyes"));
    assert_matches!(
        service.update("contacts", 404, &Record::new()).await,
        Err(CoreError::NotFound { .. })
    );
}

#[tokio::test]
async fn update_respects_fixed_predicates() {
    let (_store, service) = common::seeded().await;
    // id 1 is a student, so it is invisible through the employees resource
    assert_matches!(
        service
            .update("employees", 1, &Record::new().with("nick_name", "Boss"))
            .await,
        Err(CoreError::NotFound { entity: "Employee", .. })
    );
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_missing_id_returns_true() {
    let (store, service) = common::seeded().await;
    assert!(service.delete("contacts", 9_999).await.unwrap());
    assert_eq!(store.row_count("w_contacts").await, 25);
}

#[tokio::test]
async fn delete_removes_the_record() {
    let (_store, service) = common::seeded().await;
    assert!(service.delete("contacts", 5).await.unwrap());
    assert_eq!(service.get_by_id("contacts", 5).await.unwrap(), None);
}

#[tokio::test]
async fn delete_many_removes_only_listed_ids() {
    let (_store, service) = common::seeded().await;

    assert!(service.delete_many("contacts", &[1, 2, 3]).await.unwrap());

    let remaining = service
        .list("contacts", &ListFilters::new(1, 100), None)
        .await
        .unwrap();
    assert_eq!(remaining.count, 22);
    assert!(remaining
        .data
        .iter()
        .all(|r| !matches!(r.int("id"), Some(1..=3))));
}

#[tokio::test]
async fn delete_many_with_no_ids_is_a_no_op() {
    let (store, service) = common::seeded().await;
    assert!(service.delete_many("contacts", &[]).await.unwrap());
    assert_eq!(store.row_count("w_contacts").await, 25);
}
