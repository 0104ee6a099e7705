// src/tests/router_tests/form_tests.rs

use crate::router::handle;
use crate::tests::utils::{body_string, get, post_form, test_app, FakeApi};
use serde_json::json;

#[test]
fn missing_required_fields_block_the_submit() {
    let api = FakeApi::default();
    let app = test_app(&api);

    let resp = handle(
        post_form("/gyms", &[("name", ""), ("phone", "555 0100 12"), ("monthlyFee", "")]),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 400);

    let body = body_string(resp);
    assert!(body.contains("Name is required"));
    assert!(body.contains("Monthly fee is required"));
    // What was typed stays in the form.
    assert!(body.contains("value=\"555 0100 12\""));

    assert!(api.calls().is_empty());
}

#[test]
fn malformed_values_are_reported_per_field() {
    let api = FakeApi::default();
    let app = test_app(&api);

    let resp = handle(
        post_form(
            "/gyms",
            &[
                ("name", "Tide"),
                ("phone", "call me"),
                ("monthlyFee", "-5"),
                ("website", "ftp://tide.example"),
            ],
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 400);

    let body = body_string(resp);
    assert!(body.contains("field has-error"));
    assert!(body.contains("Website must be an http(s) link"));
    assert!(api.calls().is_empty());
}

#[test]
fn end_date_before_start_is_rejected() {
    let api = FakeApi::default();
    let app = test_app(&api);

    let resp = handle(
        post_form(
            "/events",
            &[
                ("title", "Gala"),
                ("venue", "Harbour Hall"),
                ("startDate", "2025-07-10"),
                ("endDate", "2025-07-09"),
                ("price", "20"),
            ],
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("Must not be before Start date"));
    assert!(api.calls().is_empty());
}

#[test]
fn new_form_lists_every_field() {
    let app = test_app(&FakeApi::default());

    let resp = handle(get("/events/new"), &app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("New Event"));
    assert!(body.contains("action=\"/events\""));
    for name in ["title", "venue", "startDate", "endDate", "timing", "price"] {
        assert!(body.contains(&format!("name=\"{name}\"")), "missing {name}");
    }
}

#[test]
fn edit_form_is_prefilled_from_the_record() {
    let api = FakeApi::with(
        "gyms",
        vec![json!({
            "_id": "g1",
            "name": "Iron Temple",
            "phone": "555 0100 12",
            "monthlyFee": 45,
            "isActive": true
        })],
    );
    let app = test_app(&api);

    let body = body_string(handle(get("/gyms/g1/edit"), &app).unwrap());
    assert!(body.contains("Edit Gym"));
    assert!(body.contains("action=\"/gyms/g1\""));
    assert!(body.contains("value=\"Iron Temple\""));
    assert!(body.contains("value=\"45\""));
    assert!(body.contains("checked"));
}

#[test]
fn editing_an_unknown_record_is_not_found() {
    let api = FakeApi::with("gyms", vec![json!({ "_id": "g1", "name": "Iron Temple" })]);
    let app = test_app(&api);

    let result = handle(get("/gyms/zzz/edit"), &app);
    assert!(matches!(result, Err(crate::errors::ServerError::NotFound)));
}
