//! API Request Tests
//!
//! End-to-end JSON flows through the handler: request decoding, engine
//! dispatch, error pass-through and response shape.

use std::sync::Arc;

use serde_json::{json, Value};

use rabbitry::api::{ApiHandler, Request};
use rabbitry::lifecycle::{FixedClock, LifecycleEngine};
use rabbitry::model::dates::ymd;
use rabbitry::store::MemoryStore;

fn handler() -> ApiHandler<MemoryStore> {
    let engine = LifecycleEngine::new(Arc::new(MemoryStore::new()))
        .with_clock(FixedClock::new(ymd(2024, 2, 15).unwrap()));
    ApiHandler::new(engine)
}

fn call(handler: &ApiHandler<MemoryStore>, request: Value) -> Value {
    let response = handler.handle(&request.to_string());
    serde_json::from_str(&response.to_json()).unwrap()
}

fn ok(handler: &ApiHandler<MemoryStore>, request: Value) -> Value {
    let response = call(handler, request);
    assert_eq!(response["status"], "ok", "{}", response);
    response["data"].clone()
}

// =============================================================================
// Lifecycle Flow Tests
// =============================================================================

#[test]
fn test_breeding_to_sale_flow() {
    let h = handler();

    let doe = ok(&h, json!({
        "op": "create_rabbit",
        "tag_id": "D-1",
        "gender": "Female",
        "date_of_birth": "2023-06-15T00:00:00Z"
    }));
    let buck = ok(&h, json!({
        "op": "create_rabbit",
        "tag_id": "B-1",
        "gender": "Male",
        "date_of_birth": "2023-08-04T00:00:00Z"
    }));

    let breeding = ok(&h, json!({
        "op": "create_breeding",
        "buck_id": buck["id"],
        "doe_id": doe["id"],
        "breeding_date": "2024-01-01T00:00:00Z"
    }));
    assert_eq!(breeding["status"], "Planned");
    assert_eq!(breeding["expected_due_date"], "2024-01-31T00:00:00Z");

    let doe_now = ok(&h, json!({"op": "get_rabbit", "id": doe["id"]}));
    assert_eq!(doe_now["is_pregnant"], true);

    let litter = ok(&h, json!({
        "op": "create_litter",
        "breeding_id": breeding["id"],
        "kindling_date": "2024-01-31T00:00:00Z",
        "counts": {"born": 3},
        "tag_prefix": "L1"
    }));
    assert_eq!(litter["kit_ids"].as_array().unwrap().len(), 3);

    let active = ok(&h, json!({"op": "list_rabbits", "status": "Active"}));
    assert_eq!(active.as_array().unwrap().len(), 5);

    let kit_id = litter["kit_ids"][0].clone();
    ok(&h, json!({
        "op": "create_sale",
        "rabbit_id": kit_id,
        "sale_date": "2024-02-10T00:00:00Z",
        "sale_price": 25.5
    }));

    let sold = ok(&h, json!({"op": "list_rabbits", "status": "Sold"}));
    assert_eq!(sold.as_array().unwrap().len(), 1);

    let success = ok(&h, json!({"op": "breeding_success"}));
    assert_eq!(success["successful"], 1);
}

// =============================================================================
// Error Pass-through Tests
// =============================================================================

#[test]
fn test_precondition_error_shape() {
    let h = handler();
    let rabbit = ok(&h, json!({"op": "create_rabbit", "tag_id": "R-1", "gender": "Male"}));
    ok(&h, json!({
        "op": "create_death",
        "rabbit_id": rabbit["id"],
        "death_date": "2024-01-01T00:00:00Z"
    }));

    let err = call(&h, json!({
        "op": "create_cull",
        "rabbit_id": rabbit["id"],
        "cull_date": "2024-01-01T00:00:00Z"
    }));
    assert_eq!(err["status"], "error");
    assert_eq!(err["code"], "RABBITRY_PRECONDITION_FAILED");
    assert_eq!(err["kind"], "PreconditionFailed");
    assert_eq!(err["rule"], "RabbitNotActive");
}

#[test]
fn test_validation_error_shape() {
    let h = handler();
    let rabbit = ok(&h, json!({"op": "create_rabbit", "tag_id": "R-1", "gender": "Male"}));

    let err = call(&h, json!({
        "op": "create_sale",
        "rabbit_id": rabbit["id"],
        "sale_date": "2024-01-01T00:00:00Z",
        "sale_price": 0.0
    }));
    assert_eq!(err["code"], "RABBITRY_VALIDATION_FAILED");
    assert_eq!(err["kind"], "ValidationFailed");
    assert_eq!(err["rule"], "sale.sale_price");

    let still_active = ok(&h, json!({"op": "list_rabbits", "status": "Active"}));
    assert_eq!(still_active.as_array().unwrap().len(), 1);
}

/// The last day chrono can represent still decodes; the engine rejects it.
#[test]
fn test_end_of_calendar_date_rejected() {
    let h = handler();
    let doe = ok(&h, json!({
        "op": "create_rabbit",
        "tag_id": "D-1",
        "gender": "Female",
        "date_of_birth": "2023-06-15T00:00:00Z"
    }));
    let buck = ok(&h, json!({
        "op": "create_rabbit",
        "tag_id": "B-1",
        "gender": "Male",
        "date_of_birth": "2023-08-04T00:00:00Z"
    }));

    let err = call(&h, json!({
        "op": "create_breeding",
        "buck_id": buck["id"],
        "doe_id": doe["id"],
        "breeding_date": "+262142-12-31T00:00:00Z"
    }));
    assert_eq!(err["code"], "RABBITRY_VALIDATION_FAILED");
    assert_eq!(err["rule"], "breeding.breeding_date");

    let doe_now = ok(&h, json!({"op": "get_rabbit", "id": doe["id"]}));
    assert_eq!(doe_now["is_pregnant"], false);
}

#[test]
fn test_malformed_requests() {
    let h = handler();

    let response: Value =
        serde_json::from_str(&h.handle("not json").to_json()).unwrap();
    assert_eq!(response["code"], "RABBITRY_INVALID_REQUEST");

    let err = call(&h, json!({"op": "create_breeding", "buck_id": "nope"}));
    assert_eq!(err["code"], "RABBITRY_INVALID_REQUEST");

    let err = call(&h, json!({"op": "delete_rabbit"}));
    assert_eq!(err["code"], "RABBITRY_UNKNOWN_OPERATION");
    assert_eq!(err["kind"], "UnknownOperation");
}

// =============================================================================
// Catalog and Report Tests
// =============================================================================

#[test]
fn test_catalog_and_reports() {
    let h = handler();
    let breed = ok(&h, json!({"op": "create_breed", "name": "New Zealand White"}));
    assert_eq!(breed["name"], "new zealand white");

    let renamed = ok(&h, json!({
        "op": "update_breed",
        "id": breed["id"],
        "name": "NZW",
        "average_weight_kg": 4.5
    }));
    assert_eq!(renamed["name"], "nzw");
    assert_eq!(renamed["created_at"], breed["created_at"]);

    ok(&h, json!({
        "op": "create_expense",
        "expense_date": "2024-01-01T00:00:00Z",
        "category": "feed",
        "amount": 12.5
    }));
    let expenses = ok(&h, json!({
        "op": "total_expenses",
        "start": "2024-01-01T00:00:00Z",
        "end": "2024-01-31T00:00:00Z"
    }));
    assert_eq!(expenses["total"], 12.5);

    let income = ok(&h, json!({
        "op": "total_income",
        "start": "2024-01-01T00:00:00Z",
        "end": "2024-01-31T00:00:00Z"
    }));
    assert_eq!(income["total"], 0.0);

    let sick = ok(&h, json!({"op": "sick_count"}));
    assert_eq!(sick["sick"], 0);
}

#[test]
fn test_write_classification() {
    for op in ["population_stats", "breeding_success", "feed_consumption", "sick_count"] {
        let request = Request::parse(&json!({ "op": op }).to_string()).unwrap();
        assert!(!request.is_write(), "{}", op);
    }
    let request =
        Request::parse(r#"{"op":"create_rabbit","tag_id":"R","gender":"Male"}"#).unwrap();
    assert!(request.is_write());
}
