// src/listview/view.rs

use crate::api::{ApiError, ApiService, ListQuery};
use crate::listview::envelope::{normalize, Normalized};
use crate::listview::record::{merge_into, record_id};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};

/// Ticket handed out per fetch. Only the newest ticket may update state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug, Default)]
pub struct RequestTokens {
    latest: u64,
}

impl RequestTokens {
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

/// Records as last loaded from the API, plus the query that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub records: Vec<Value>,
    /// Server-reported total, when the envelope carried one.
    pub total: Option<usize>,
    pub total_pages: Option<usize>,
    pub query: ListQuery,
}

impl Snapshot {
    pub fn from_normalized(n: Normalized, query: ListQuery) -> Self {
        Self {
            records: n.records,
            total: n.total,
            total_pages: n.total_pages,
            query,
        }
    }

    pub fn count(&self) -> usize {
        self.total.unwrap_or(self.records.len())
    }

    /// Optimistic local update after a successful mutation. Returns whether
    /// anything changed.
    pub fn apply(&mut self, mutation: &Mutation) -> bool {
        match mutation {
            Mutation::Created(record) => {
                self.records.insert(0, record.clone());
                self.total = self.total.map(|t| t + 1);
                true
            }
            Mutation::Updated { id, patch } => match self.position(id) {
                Some(i) => {
                    merge_into(&mut self.records[i], patch);
                    true
                }
                None => false,
            },
            Mutation::Deleted { id } => match self.position(id) {
                Some(i) => {
                    self.records.remove(i);
                    self.total = self.total.map(|t| t.saturating_sub(1));
                    true
                }
                None => false,
            },
            Mutation::StatusSet { id, field, active } => match self.position(id) {
                Some(i) => {
                    if let Value::Object(map) = &mut self.records[i] {
                        map.insert(field.to_string(), Value::Bool(*active));
                    }
                    true
                }
                None => false,
            },
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| record_id(r).as_deref() == Some(id))
    }

    pub fn find(&self, id: &str) -> Option<&Value> {
        self.position(id).map(|i| &self.records[i])
    }
}

/// A successful create/update/delete/status change, as applied locally.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Created(Value),
    Updated { id: String, patch: Value },
    Deleted { id: String },
    StatusSet {
        id: String,
        field: &'static str,
        active: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading {
        token: RequestToken,
        previous: Option<Snapshot>,
    },
    Loaded(Snapshot),
    /// Keeps the rows from before the failure so the table can stay on screen.
    Errored {
        message: String,
        previous: Option<Snapshot>,
    },
}

impl LoadState {
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            LoadState::Idle => None,
            LoadState::Loaded(s) => Some(s),
            LoadState::Loading { previous, .. } | LoadState::Errored { previous, .. } => {
                previous.as_ref()
            }
        }
    }

    fn snapshot_mut(&mut self) -> Option<&mut Snapshot> {
        match self {
            LoadState::Idle => None,
            LoadState::Loaded(s) => Some(s),
            LoadState::Loading { previous, .. } | LoadState::Errored { previous, .. } => {
                previous.as_mut()
            }
        }
    }

    fn take_snapshot(&mut self) -> Option<Snapshot> {
        match std::mem::replace(self, LoadState::Idle) {
            LoadState::Idle => None,
            LoadState::Loaded(s) => Some(s),
            LoadState::Loading { previous, .. } | LoadState::Errored { previous, .. } => previous,
        }
    }
}

struct Inner {
    tokens: RequestTokens,
    state: LoadState,
}

/// Loaded state of one entity's list: `Idle -> Loading -> Loaded | Errored`.
/// Mutations and explicit refreshes go back through `Loading`.
pub struct ListView {
    inner: Mutex<Inner>,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListView {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                tokens: RequestTokens::default(),
                state: LoadState::Idle,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> LoadState {
        self.lock().state.clone()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.lock().state.snapshot().cloned()
    }

    /// The loaded snapshot when it was produced by `query`; `None` means
    /// rendering `query` needs a trip to the API.
    pub fn cached(&self, query: &ListQuery) -> Option<Snapshot> {
        match &self.lock().state {
            LoadState::Loaded(s) if s.query == *query => Some(s.clone()),
            _ => None,
        }
    }

    /// Enters `Loading` and hands out the token the response must present.
    pub fn begin(&self) -> RequestToken {
        let mut inner = self.lock();
        let token = inner.tokens.issue();
        let previous = inner.state.take_snapshot();
        inner.state = LoadState::Loading { token, previous };
        token
    }

    /// Applies a response if `token` is still the newest; stale responses are
    /// dropped. Returns whether the state changed.
    pub fn resolve(&self, token: RequestToken, result: Result<Snapshot, ApiError>) -> bool {
        let mut inner = self.lock();
        if !inner.tokens.is_current(token) {
            tracing::debug!(?token, "dropping stale list response");
            return false;
        }

        let previous = inner.state.take_snapshot();
        inner.state = match result {
            Ok(snapshot) => LoadState::Loaded(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "list load failed");
                LoadState::Errored {
                    message: e.user_message(),
                    previous,
                }
            }
        };
        true
    }

    /// Fetches `query` and resolves it. The caller gets the snapshot its own
    /// response produced, even when a newer request has since taken over the
    /// view.
    pub fn load(
        &self,
        api: &dyn ApiService,
        resource: &str,
        query: ListQuery,
    ) -> Result<Snapshot, ApiError> {
        let token = self.begin();
        let result = api
            .list(resource, &query)
            .map(|body| Snapshot::from_normalized(normalize(&body), query));
        self.resolve(token, result.clone());
        result
    }

    /// Re-runs the last query (or `fallback` when nothing was ever loaded).
    pub fn reload(
        &self,
        api: &dyn ApiService,
        resource: &str,
        fallback: ListQuery,
    ) -> Result<Snapshot, ApiError> {
        let query = self.snapshot().map(|s| s.query).unwrap_or(fallback);
        self.load(api, resource, query)
    }

    /// Optimistically applies a mutation to whatever is loaded.
    pub fn apply(&self, mutation: &Mutation) -> bool {
        self.lock()
            .state
            .snapshot_mut()
            .map(|s| s.apply(mutation))
            .unwrap_or(false)
    }

    pub fn find_record(&self, id: &str) -> Option<Value> {
        self.lock().state.snapshot().and_then(|s| s.find(id)).cloned()
    }
}
