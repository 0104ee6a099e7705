// api/client.rs
use crate::api::{ApiError, ApiService, ListQuery};
use crate::config::AppConfig;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = concat!("booking-admin/", env!("CARGO_PKG_VERSION"));

/// `ApiService` backed by the platform's REST endpoints.
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(cfg: &AppConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &cfg.api_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::Network(format!("invalid API token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(cfg.api_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, resource: &str, tail: &[&str]) -> String {
        let mut url = format!("{}/{}", self.base_url, resource.trim_matches('/'));
        for part in tail {
            url.push('/');
            url.push_str(&url::form_urlencoded::byte_serialize(part.as_bytes()).collect::<String>());
        }
        url
    }

    fn send(&self, req: RequestBuilder) -> Result<Value, ApiError> {
        let resp = req.send().map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();

        let text = resp
            .text()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| error_message(&body))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

            tracing::warn!(status = status.as_u16(), %message, "API call failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        let body: Value =
            serde_json::from_str(&text).map_err(|e| ApiError::JsonParse(e.to_string()))?;
        check_envelope(body)
    }
}

impl ApiService for HttpApi {
    fn list(&self, resource: &str, query: &ListQuery) -> Result<Value, ApiError> {
        tracing::debug!(resource, ?query, "GET list");
        self.send(self.client.get(self.url(resource, &[])).query(&query.as_pairs()))
    }

    fn create(&self, resource: &str, payload: &Value) -> Result<Value, ApiError> {
        tracing::debug!(resource, "POST create");
        self.send(self.client.post(self.url(resource, &[])).json(payload))
    }

    fn update(&self, resource: &str, id: &str, payload: &Value) -> Result<Value, ApiError> {
        tracing::debug!(resource, id, "PUT update");
        self.send(self.client.put(self.url(resource, &[id])).json(payload))
    }

    fn delete(&self, resource: &str, id: &str) -> Result<Value, ApiError> {
        tracing::debug!(resource, id, "DELETE");
        self.send(self.client.delete(self.url(resource, &[id])))
    }

    fn set_status(
        &self,
        resource: &str,
        id: &str,
        field: &str,
        active: bool,
    ) -> Result<Value, ApiError> {
        tracing::debug!(resource, id, field, active, "PATCH status");
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), Value::Bool(active));
        self.send(
            self.client
                .patch(self.url(resource, &[id, "status"]))
                .json(&Value::Object(body)),
        )
    }
}

/// A 2xx body can still carry `success: false`.
pub(crate) fn check_envelope(body: Value) -> Result<Value, ApiError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = error_message(&body).unwrap_or_else(|| "Request was not successful".into());
        return Err(ApiError::Rejected(message));
    }
    Ok(body)
}

/// Finds the human-readable message in an error body (`message`, `error`,
/// or the same keys one level down under `data`/`response.data`).
pub(crate) fn error_message(body: &Value) -> Option<String> {
    let candidates = [
        body.get("message"),
        body.get("error"),
        body.pointer("/data/message"),
        body.pointer("/response/data/message"),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().filter(|s| !s.trim().is_empty()))
        .map(str::to_string)
}
