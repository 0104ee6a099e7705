mod api_error;
mod client;

pub use api_error::ApiError;
pub use client::HttpApi;

use serde_json::Value;

/// Parameters sent with a list request. Server-paginated views fill all of
/// them; in-memory views only ask for everything once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    /// Field path the server orders by, with `order` as `asc` or `desc`.
    pub sort: Option<String>,
    pub order: Option<&'static str>,
}

impl ListQuery {
    pub fn everything() -> Self {
        Self::default()
    }

    pub fn page(page: usize, limit: usize, search: &str) -> Self {
        let search = search.trim();
        Self {
            page: Some(page),
            limit: Some(limit),
            search: (!search.is_empty()).then(|| search.to_string()),
            ..Self::default()
        }
    }

    pub fn sorted(self, field: &str, order: &'static str) -> Self {
        Self {
            sort: Some(field.to_string()),
            order: Some(order),
            ..self
        }
    }

    pub fn as_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let (Some(sort), Some(order)) = (&self.sort, self.order) {
            pairs.push(("sort", sort.clone()));
            pairs.push(("order", order.to_string()));
        }
        pairs
    }
}

/// The REST calls the dashboard depends on. Every call returns the raw
/// envelope; unwrapping it is the list pipeline's job.
pub trait ApiService: Send + Sync {
    fn list(&self, resource: &str, query: &ListQuery) -> Result<Value, ApiError>;

    fn create(&self, resource: &str, payload: &Value) -> Result<Value, ApiError>;

    fn update(&self, resource: &str, id: &str, payload: &Value) -> Result<Value, ApiError>;

    fn delete(&self, resource: &str, id: &str) -> Result<Value, ApiError>;

    /// Sets the boolean `field` (`isActive`, `isPublished`) of one record.
    fn set_status(
        &self,
        resource: &str,
        id: &str,
        field: &str,
        active: bool,
    ) -> Result<Value, ApiError>;
}
