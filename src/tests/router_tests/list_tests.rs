// src/tests/router_tests/list_tests.rs

use crate::api::{ApiError, ApiService, ListQuery};
use crate::config::AppConfig;
use crate::errors::ServerError;
use crate::router::handle;
use crate::state::AppState;
use crate::tests::utils::{body_string, fixed_now, get, test_app, Call, FakeApi};
use serde_json::{json, Value};
use std::io::Read;
use std::thread;
use std::time::Duration;

fn gyms() -> Vec<Value> {
    vec![
        json!({ "_id": "g1", "name": "Iron Temple", "address": { "city": "Lisbon" }, "isActive": true }),
        json!({ "_id": "g2", "name": "Flow Studio", "address": { "city": "Porto" }, "isActive": false }),
        json!({ "_id": "g3", "name": "Harbor Gym", "address": { "city": "Faro" }, "isActive": true }),
    ]
}

/// Markup of one table row.
fn row_html<'a>(body: &'a str, id: &str) -> Option<&'a str> {
    let start = body.find(&format!("id=\"row-{id}\""))?;
    let rest = &body[start..];
    Some(&rest[..rest.find("</tr>")?])
}

#[test]
fn events_show_done_ongoing_upcoming() {
    let api = FakeApi::with(
        "events",
        vec![
            json!({ "_id": "y", "title": "Night Market", "startDate": "2025-06-14", "endDate": "2025-06-14" }),
            json!({ "_id": "t", "title": "Jazz Brunch", "startDate": "2025-06-15", "endDate": "2025-06-15" }),
            json!({ "_id": "m", "title": "Sunrise Hike", "startDate": "2025-06-16", "endDate": "2025-06-16" }),
        ],
    );
    let app = test_app(&api);

    let resp = handle(get("/events"), &app).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    assert!(row_html(&body, "y").unwrap().contains("Done"));
    assert!(row_html(&body, "t").unwrap().contains("Ongoing"));
    assert!(row_html(&body, "m").unwrap().contains("Upcoming"));

    // Newest first by default.
    let pos = |id: &str| body.find(&format!("id=\"row-{id}\"")).unwrap();
    assert!(pos("m") < pos("t") && pos("t") < pos("y"));
}

#[test]
fn searching_a_year_matches_formatted_dates() {
    let api = FakeApi::with(
        "events",
        vec![
            json!({ "_id": "a", "title": "Winter Gala", "startDate": "2025-12-12T10:00:00Z" }),
            json!({ "_id": "b", "title": "Spring Expo", "startDate": "2024-03-02T10:00:00Z" }),
        ],
    );
    let app = test_app(&api);

    let body = body_string(handle(get("/events?q=2025"), &app).unwrap());
    assert!(row_html(&body, "a").is_some());
    assert!(row_html(&body, "b").is_none());
    assert!(body.contains("Friday, 12 December 2025"));
}

#[test]
fn client_lists_reuse_rows_while_browsing_and_refetch_on_a_visit() {
    let api = FakeApi::with("gyms", gyms());
    let app = test_app(&api);

    handle(get("/gyms"), &app).unwrap();
    handle(get("/gyms?q=iron&sort=name&dir=desc"), &app).unwrap();
    handle(get("/gyms?page=3"), &app).unwrap();
    handle(get("/gyms?size=10&menu=g1"), &app).unwrap();
    assert_eq!(api.list_calls(), 1);

    // Someone else adds a gym; opening the list again picks it up.
    let mut changed = gyms();
    changed.push(json!({ "_id": "g4", "name": "Dock Gym", "isActive": true }));
    api.seed("gyms", changed);

    let body = body_string(handle(get("/gyms"), &app).unwrap());
    assert_eq!(api.list_calls(), 2);
    assert!(row_html(&body, "g4").is_some());

    handle(get("/gyms?size=10&refresh=1"), &app).unwrap();
    assert_eq!(api.list_calls(), 3);
}

#[test]
fn search_and_sort_apply_to_client_lists() {
    let api = FakeApi::with("gyms", gyms());
    let app = test_app(&api);

    let body = body_string(handle(get("/gyms?q=PORTO"), &app).unwrap());
    assert!(row_html(&body, "g2").is_some());
    assert!(row_html(&body, "g1").is_none());

    let body = body_string(handle(get("/gyms?sort=name&dir=desc"), &app).unwrap());
    let pos = |id: &str| body.find(&format!("id=\"row-{id}\"")).unwrap();
    // Iron Temple, Harbor Gym, Flow Studio
    assert!(pos("g1") < pos("g3") && pos("g3") < pos("g2"));
}

#[test]
fn server_lists_forward_page_limit_and_search() {
    let orders: Vec<Value> = (1..=12)
        .map(|i| json!({ "_id": format!("o{i}"), "orderNumber": format!("BALI-{i}"), "paymentStatus": "paid" }))
        .collect();
    let api = FakeApi::with("orders", orders);
    let app = test_app(&api);

    let body = body_string(handle(get("/orders?page=2&size=5&q=bali"), &app).unwrap());

    assert_eq!(
        api.calls(),
        vec![Call::List {
            resource: "orders".into(),
            query: ListQuery::page(2, 5, "bali").sorted("createdAt", "desc"),
        }]
    );
    assert!(body.contains("Page 2 of 3"));
    assert!(body.contains("6–10 of 12"));
    assert!(body.contains("Status counts cover the current page."));
}

#[test]
fn server_lists_clamp_past_the_last_known_page() {
    let orders: Vec<Value> = (1..=12)
        .map(|i| json!({ "_id": format!("o{i}"), "orderNumber": format!("N-{i}") }))
        .collect();
    let api = FakeApi::with("orders", orders);
    let app = test_app(&api);

    handle(get("/orders?size=5"), &app).unwrap();
    handle(get("/orders?size=5&page=40"), &app).unwrap();

    let last = api.calls().pop().unwrap();
    assert_eq!(
        last,
        Call::List {
            resource: "orders".into(),
            query: ListQuery::page(3, 5, "").sorted("createdAt", "desc"),
        }
    );
}

fn orders_by_amount() -> Vec<Value> {
    (0..25)
        .map(|i| json!({ "_id": format!("o{i:02}"), "orderNumber": format!("N-{i}"), "totalAmount": 100 - i }))
        .collect()
}

#[test]
fn server_lists_are_sorted_by_the_api_across_pages() {
    let api = FakeApi::with("orders", orders_by_amount());
    let app = test_app(&api);

    let body = body_string(handle(get("/orders?sort=totalAmount&dir=asc"), &app).unwrap());
    assert_eq!(
        api.calls(),
        vec![Call::List {
            resource: "orders".into(),
            query: ListQuery::page(1, 10, "").sorted("totalAmount", "asc"),
        }]
    );
    // The cheapest order of all is on page one; the dearest is not.
    assert!(row_html(&body, "o24").is_some());
    assert!(row_html(&body, "o00").is_none());

    // A new direction is a new query.
    let body = body_string(handle(get("/orders?sort=totalAmount&dir=desc"), &app).unwrap());
    assert_eq!(api.list_calls(), 2);
    assert!(row_html(&body, "o00").is_some());
    assert!(row_html(&body, "o24").is_none());
}

/// Holds page one back so a later request can finish first.
struct SlowFirstPage {
    inner: FakeApi,
}

impl ApiService for SlowFirstPage {
    fn list(&self, resource: &str, query: &ListQuery) -> Result<Value, ApiError> {
        if query.page == Some(1) {
            thread::sleep(Duration::from_millis(300));
        }
        self.inner.list(resource, query)
    }

    fn create(&self, resource: &str, payload: &Value) -> Result<Value, ApiError> {
        self.inner.create(resource, payload)
    }

    fn update(&self, resource: &str, id: &str, payload: &Value) -> Result<Value, ApiError> {
        self.inner.update(resource, id, payload)
    }

    fn delete(&self, resource: &str, id: &str) -> Result<Value, ApiError> {
        self.inner.delete(resource, id)
    }

    fn set_status(&self, resource: &str, id: &str, field: &str, active: bool) -> Result<Value, ApiError> {
        self.inner.set_status(resource, id, field, active)
    }
}

#[test]
fn concurrent_requests_each_render_their_own_page() {
    let api = FakeApi::with("orders", orders_by_amount());
    let app = AppState::new(AppConfig::default(), Box::new(SlowFirstPage { inner: api })).with_clock(fixed_now);

    let (first, third) = thread::scope(|s| {
        let first = s.spawn(|| body_string(handle(get("/orders?page=1&size=10"), &app).unwrap()));
        thread::sleep(Duration::from_millis(50));
        let third = body_string(handle(get("/orders?page=3&size=10"), &app).unwrap());
        (first.join().unwrap(), third)
    });

    assert!(row_html(&first, "o00").is_some());
    assert!(row_html(&first, "o20").is_none());
    assert!(first.contains("Page 1 of 3"));

    assert!(row_html(&third, "o20").is_some());
    assert!(row_html(&third, "o00").is_none());
    assert!(third.contains("Page 3 of 3"));
}

#[test]
fn failed_reload_keeps_stale_rows_and_shows_error() {
    let api = FakeApi::with("gyms", gyms());
    let app = test_app(&api);
    handle(get("/gyms"), &app).unwrap();

    api.fail_with(ApiError::Network("connection refused".into()));
    let resp = handle(get("/gyms?refresh=1"), &app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Could not reach the server"));
    assert!(body.contains("Showing rows from the last successful load."));
    assert!(row_html(&body, "g1").is_some());

    // Retry once the API is back.
    api.recover();
    let body = body_string(handle(get("/gyms?refresh=1"), &app).unwrap());
    assert!(!body.contains("Could not reach the server"));
}

#[test]
fn first_load_failure_renders_an_empty_table() {
    let api = FakeApi::default();
    api.fail_with(ApiError::Rejected("Session expired".into()));
    let app = test_app(&api);

    let body = body_string(handle(get("/vendors"), &app).unwrap());
    assert!(body.contains("Session expired"));
    assert!(body.contains("No vendors yet."));
    assert!(!body.contains("Showing rows from the last successful load."));
}

#[test]
fn only_the_open_row_shows_its_menu() {
    let api = FakeApi::with("gyms", gyms());
    let app = test_app(&api);

    let body = body_string(handle(get("/gyms?menu=g2"), &app).unwrap());
    assert!(body.contains("/gyms/g2/delete"));
    assert!(!body.contains("/gyms/g1/delete"));
    assert!(row_html(&body, "g2").unwrap().contains("Activate"));

    let body = body_string(handle(get("/gyms"), &app).unwrap());
    assert!(!body.contains("/delete"));
}

#[test]
fn rows_without_an_id_get_no_actions() {
    let api = FakeApi::with(
        "gyms",
        vec![
            json!({ "_id": "g1", "name": "Iron Temple", "isActive": true }),
            json!({ "name": "Ghost Gym", "isActive": true }),
        ],
    );
    let app = test_app(&api);

    let body = body_string(handle(get("/gyms?menu=row-1"), &app).unwrap());
    let ghost = row_html(&body, "row-1").unwrap();
    assert!(ghost.contains("Ghost Gym"));
    assert!(!ghost.contains("menu-toggle"));
    assert!(!body.contains("/gyms/row-1/"));

    assert!(row_html(&body, "g1").unwrap().contains("menu-toggle"));
}

#[test]
fn export_is_a_spreadsheet_of_matching_rows() {
    let api = FakeApi::with("gyms", gyms());
    let app = test_app(&api);

    let mut resp = handle(get("/gyms/export.xlsx?q=lisbon"), &app).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );

    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn unknown_entities_are_not_found() {
    let app = test_app(&FakeApi::default());
    assert!(matches!(handle(get("/nope"), &app), Err(ServerError::NotFound)));
    assert!(matches!(handle(get("/gyms/g1/frobnicate"), &app), Err(ServerError::NotFound)));
}

#[test]
fn home_links_every_entity() {
    let app = test_app(&FakeApi::default());
    let body = body_string(handle(get("/"), &app).unwrap());
    for slug in ["events", "fitness-events", "visa-applications", "countries"] {
        assert!(body.contains(&format!("href=\"/{slug}\"")), "missing {slug}");
    }
}
