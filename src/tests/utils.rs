// src/tests/utils.rs

use crate::api::{ApiError, ApiService, ListQuery};
use crate::config::AppConfig;
use crate::listview::record::{lookup, merge_into, record_id};
use crate::state::AppState;
use astra::{Body, Request, Response};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};
use url::form_urlencoded;

/// One call the fake API received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List { resource: String, query: ListQuery },
    Create { resource: String, payload: Value },
    Update { resource: String, id: String },
    Delete { resource: String, id: String },
    SetStatus { resource: String, id: String, field: String, active: bool },
}

#[derive(Default)]
struct Inner {
    store: Mutex<HashMap<String, Vec<Value>>>,
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<ApiError>>,
    next_id: Mutex<usize>,
}

/// In-memory stand-in for the platform API. Clones share state, so a test
/// can keep a handle after giving one to `AppState`.
#[derive(Clone, Default)]
pub struct FakeApi {
    inner: Arc<Inner>,
}

impl FakeApi {
    pub fn with(resource: &str, records: Vec<Value>) -> Self {
        let api = Self::default();
        api.seed(resource, records);
        api
    }

    pub fn seed(&self, resource: &str, records: Vec<Value>) {
        self.inner
            .store
            .lock()
            .unwrap()
            .insert(resource.to_string(), records);
    }

    /// Every call from now on fails with `err`.
    pub fn fail_with(&self, err: ApiError) {
        *self.inner.failure.lock().unwrap() = Some(err);
    }

    pub fn recover(&self) {
        *self.inner.failure.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::List { .. }))
            .count()
    }

    pub fn records(&self, resource: &str) -> Vec<Value> {
        self.inner
            .store
            .lock()
            .unwrap()
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        self.inner.calls.lock().unwrap().push(call);
        match self.inner.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn with_record<F>(&self, resource: &str, id: &str, f: F) -> Result<Value, ApiError>
    where
        F: FnOnce(&mut Vec<Value>, usize) -> Value,
    {
        let mut store = self.inner.store.lock().unwrap();
        let records = store.entry(resource.to_string()).or_default();
        match records
            .iter()
            .position(|r| record_id(r).as_deref() == Some(id))
        {
            Some(i) => Ok(f(records, i)),
            None => Err(ApiError::Status {
                status: 404,
                message: format!("{resource} {id} not found"),
            }),
        }
    }
}

impl ApiService for FakeApi {
    /// Paged queries get a paginate-plugin envelope, everything else a plain
    /// `{ success, data }` one.
    fn list(&self, resource: &str, query: &ListQuery) -> Result<Value, ApiError> {
        self.record(Call::List {
            resource: resource.to_string(),
            query: query.clone(),
        })?;

        let mut records = self.records(resource);
        if let Some(search) = &query.search {
            let needle = search.to_lowercase();
            records.retain(|r| r.to_string().to_lowercase().contains(&needle));
        }
        if let (Some(field), Some(order)) = (&query.sort, query.order) {
            records.sort_by(|a, b| match order {
                "desc" => compare_field(b, a, field),
                _ => compare_field(a, b, field),
            });
        }

        match (query.page, query.limit) {
            (Some(page), Some(limit)) => {
                let total = records.len();
                let docs: Vec<Value> = records
                    .into_iter()
                    .skip((page - 1) * limit)
                    .take(limit)
                    .collect();
                Ok(json!({
                    "success": true,
                    "data": {
                        "docs": docs,
                        "totalDocs": total,
                        "totalPages": total.div_ceil(limit).max(1),
                        "page": page
                    }
                }))
            }
            _ => Ok(json!({ "success": true, "data": records })),
        }
    }

    fn create(&self, resource: &str, payload: &Value) -> Result<Value, ApiError> {
        self.record(Call::Create {
            resource: resource.to_string(),
            payload: payload.clone(),
        })?;

        let id = {
            let mut next = self.inner.next_id.lock().unwrap();
            *next += 1;
            format!("new-{next}")
        };
        let mut record = json!({ "_id": id });
        merge_into(&mut record, payload);

        self.inner
            .store
            .lock()
            .unwrap()
            .entry(resource.to_string())
            .or_default()
            .insert(0, record.clone());

        Ok(json!({ "success": true, "data": record }))
    }

    fn update(&self, resource: &str, id: &str, payload: &Value) -> Result<Value, ApiError> {
        self.record(Call::Update {
            resource: resource.to_string(),
            id: id.to_string(),
        })?;
        self.with_record(resource, id, |records, i| {
            merge_into(&mut records[i], payload);
            json!({ "success": true, "data": records[i].clone() })
        })
    }

    fn delete(&self, resource: &str, id: &str) -> Result<Value, ApiError> {
        self.record(Call::Delete {
            resource: resource.to_string(),
            id: id.to_string(),
        })?;
        self.with_record(resource, id, |records, i| {
            records.remove(i);
            json!({ "success": true, "message": "Deleted" })
        })
    }

    fn set_status(
        &self,
        resource: &str,
        id: &str,
        field: &str,
        active: bool,
    ) -> Result<Value, ApiError> {
        self.record(Call::SetStatus {
            resource: resource.to_string(),
            id: id.to_string(),
            field: field.to_string(),
            active,
        })?;
        self.with_record(resource, id, |records, i| {
            if let Value::Object(map) = &mut records[i] {
                map.insert(field.to_string(), Value::Bool(active));
            }
            json!({ "success": true })
        })
    }
}

/// Numbers numerically, anything else by its text.
fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    let (a, b) = (lookup(a, field), lookup(b, field));
    match (a.and_then(Value::as_f64), b.and_then(Value::as_f64)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => {
            let text = |v: Option<&Value>| v.map(Value::to_string).unwrap_or_default();
            text(a).cmp(&text(b))
        }
    }
}

/// Noon UTC on Sunday 15 June 2025.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

pub fn test_app(api: &FakeApi) -> AppState {
    AppState::new(AppConfig::default(), Box::new(api.clone())).with_clock(fixed_now)
}

pub fn get(uri: &str) -> Request {
    http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, pairs: &[(&str, &str)]) -> Request {
    let body = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn body_string(mut resp: Response) -> String {
    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    String::from_utf8(bytes).unwrap()
}

pub fn location(resp: &Response) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
