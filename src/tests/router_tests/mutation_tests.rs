// src/tests/router_tests/mutation_tests.rs

use crate::api::ApiError;
use crate::errors::ServerError;
use crate::listview::record::record_id;
use crate::router::handle;
use crate::tests::utils::{body_string, get, location, post_form, test_app, Call, FakeApi};
use serde_json::{json, Value};

fn five_gyms() -> Vec<Value> {
    (1..=5)
        .map(|i| json!({ "_id": i.to_string(), "name": format!("Gym {i}"), "phone": "555 0100", "isActive": true }))
        .collect()
}

fn ids(records: &[Value]) -> Vec<String> {
    records.iter().filter_map(record_id).collect()
}

#[test]
fn delete_removes_exactly_one_row() {
    let api = FakeApi::with("gyms", five_gyms());
    let app = test_app(&api);
    handle(get("/gyms"), &app).unwrap();

    let resp = handle(post_form("/gyms/3/delete", &[]), &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/gyms");

    assert_eq!(ids(&api.records("gyms")), vec!["1", "2", "4", "5"]);

    let body = body_string(handle(get("/gyms"), &app).unwrap());
    for id in ["1", "2", "4", "5"] {
        assert!(body.contains(&format!("id=\"row-{id}\"")), "missing row {id}");
    }
    assert!(!body.contains("id=\"row-3\""));
}

#[test]
fn delete_keeps_the_list_position() {
    let api = FakeApi::with("gyms", five_gyms());
    let app = test_app(&api);

    let resp = handle(
        post_form("/gyms/2/delete", &[("back", "q=gym&page=2&sort=name&dir=desc")]),
        &app,
    )
    .unwrap();
    assert_eq!(location(&resp), "/gyms?q=gym&sort=name&dir=desc&page=2&size=10");
}

#[test]
fn delete_of_a_missing_record_reports_the_api_error() {
    let api = FakeApi::with("gyms", five_gyms());
    let app = test_app(&api);

    let resp = handle(post_form("/gyms/99/delete", &[]), &app).unwrap();
    assert_eq!(resp.status(), 502);

    let body = body_string(resp);
    assert!(body.contains("gyms 99 not found"));
    assert!(body.contains("id=\"row-1\""));
    assert_eq!(api.records("gyms").len(), 5);
}

#[test]
fn failed_delete_keeps_the_list_on_screen() {
    let api = FakeApi::with("gyms", five_gyms());
    let app = test_app(&api);
    handle(get("/gyms?q=gym"), &app).unwrap();

    api.fail_with(ApiError::Status {
        status: 500,
        message: "Database unavailable".into(),
    });
    let resp = handle(post_form("/gyms/3/delete", &[("back", "q=gym")]), &app).unwrap();
    assert_eq!(resp.status(), 502);

    let body = body_string(resp);
    assert!(body.contains("Database unavailable"));
    assert!(body.contains("id=\"row-3\""));
    assert!(body.contains("value=\"gym\""));
    assert_eq!(api.records("gyms").len(), 5);
}

#[test]
fn failed_status_toggle_keeps_the_list_on_screen() {
    let api = FakeApi::with("gyms", five_gyms());
    let app = test_app(&api);
    handle(get("/gyms"), &app).unwrap();

    api.fail_with(ApiError::Network("connection refused".into()));
    let resp = handle(post_form("/gyms/2/status", &[("back", "size=10")]), &app).unwrap();
    assert_eq!(resp.status(), 502);

    let body = body_string(resp);
    assert!(body.contains("id=\"row-2\""));
    assert!(body.contains("Could not reach the server"));
    assert_eq!(api.records("gyms")[1]["isActive"], json!(true));

    api.recover();
    let body = body_string(handle(get("/gyms?size=10&menu=2"), &app).unwrap());
    assert!(body.contains("Deactivate"));
}

#[test]
fn status_toggle_flips_the_flag() {
    let api = FakeApi::with(
        "gyms",
        vec![json!({ "_id": "g2", "name": "Flow Studio", "isActive": false })],
    );
    let app = test_app(&api);

    let resp = handle(post_form("/gyms/g2/status", &[("back", "size=25")]), &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/gyms?size=25");

    assert!(api.calls().contains(&Call::SetStatus {
        resource: "gyms".into(),
        id: "g2".into(),
        field: "isActive".into(),
        active: true,
    }));
    assert_eq!(api.records("gyms")[0]["isActive"], json!(true));

    let body = body_string(handle(get("/gyms?menu=g2"), &app).unwrap());
    assert!(body.contains("Deactivate"));
}

#[test]
fn podcasts_toggle_publication() {
    let api = FakeApi::with(
        "podcasts",
        vec![json!({ "_id": "p1", "title": "Island Talks", "isPublished": true })],
    );
    let app = test_app(&api);

    handle(post_form("/podcasts/p1/status", &[]), &app).unwrap();
    assert!(api.calls().contains(&Call::SetStatus {
        resource: "podcasts".into(),
        id: "p1".into(),
        field: "isPublished".into(),
        active: false,
    }));
}

#[test]
fn entities_without_a_toggle_have_no_status_route() {
    let api = FakeApi::with("events", vec![json!({ "_id": "e1", "title": "Gala" })]);
    let app = test_app(&api);

    let result = handle(post_form("/events/e1/status", &[]), &app);
    assert!(matches!(result, Err(ServerError::NotFound)));
    assert!(api.calls().is_empty());
}

#[test]
fn valid_create_posts_the_payload_and_redirects() {
    let api = FakeApi::with("gyms", five_gyms());
    let app = test_app(&api);
    handle(get("/gyms"), &app).unwrap();

    let resp = handle(
        post_form(
            "/gyms",
            &[
                ("name", "  Tide Fitness "),
                ("phone", "+351 912 345 678"),
                ("monthlyFee", "1,200"),
                ("isActive", "on"),
            ],
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/gyms");

    let payload = api
        .calls()
        .into_iter()
        .find_map(|c| match c {
            Call::Create { resource, payload } if resource == "gyms" => Some(payload),
            _ => None,
        })
        .unwrap();
    assert_eq!(payload["name"], json!("Tide Fitness"));
    assert_eq!(payload["monthlyFee"], json!(1200));
    assert_eq!(payload["isActive"], json!(true));

    let body = body_string(handle(get("/gyms?size=25"), &app).unwrap());
    assert!(body.contains("id=\"row-new-1\""));
}

#[test]
fn update_failure_rerenders_the_form_with_the_message() {
    let api = FakeApi::with("gyms", five_gyms());
    let app = test_app(&api);
    handle(get("/gyms"), &app).unwrap();

    api.fail_with(ApiError::Status {
        status: 500,
        message: "Database unavailable".into(),
    });
    let resp = handle(
        post_form(
            "/gyms/1",
            &[("name", "Gym One"), ("phone", "555 0100 22"), ("monthlyFee", "30")],
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 502);

    let body = body_string(resp);
    assert!(body.contains("Database unavailable"));
    assert!(body.contains("value=\"Gym One\""));
}

#[test]
fn update_merges_into_the_loaded_list() {
    let api = FakeApi::with("gyms", five_gyms());
    let app = test_app(&api);
    handle(get("/gyms"), &app).unwrap();

    let resp = handle(
        post_form(
            "/gyms/4",
            &[
                ("name", "Gym Four Renamed"),
                ("phone", "555 0100 44"),
                ("monthlyFee", "30"),
                ("back", "q=renamed"),
            ],
        ),
        &app,
    )
    .unwrap();
    assert_eq!(location(&resp), "/gyms?q=renamed&size=10");

    let body = body_string(handle(get("/gyms?q=renamed"), &app).unwrap());
    assert!(body.contains("id=\"row-4\""));
    assert!(!body.contains("id=\"row-1\""));
}
