// src/listview/pipeline.rs

use crate::api::{ApiError, ApiService, ListQuery};
use crate::listview::metrics::ListMetrics;
use crate::listview::paginate::Page;
use crate::listview::params::ListParams;
use crate::listview::row::{build_rows, Row, ViewSpec};
use crate::listview::source::{ListSource, PagingMode};
use crate::listview::sort::SortState;
use crate::listview::view::{ListView, Snapshot};
use chrono::{DateTime, FixedOffset};

/// What a list page renders.
#[derive(Debug, Clone)]
pub struct ListOutcome {
    pub page: Page<Row>,
    pub metrics: ListMetrics,
    pub sort: SortState,
    /// Message of the failed load or mutation, if any. Rows may still be shown.
    pub error: Option<String>,
    /// Shown rows come from before a failed load.
    pub stale: bool,
}

/// Data one request renders from. Owned by the request, so a concurrent
/// request for another page or search cannot swap rows underneath it.
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    pub snapshot: Option<Snapshot>,
    /// Set when this request's own fetch failed; `snapshot` is then the last
    /// good one the view still holds.
    pub error: Option<String>,
}

/// Everything needed to fetch one entity's list.
#[derive(Clone, Copy)]
pub struct ListFetch<'a> {
    pub view: &'a ListView,
    pub source: &'a dyn ListSource,
    pub api: &'a dyn ApiService,
    pub resource: &'a str,
    pub spec: &'a ViewSpec,
}

/// Returns the snapshot for `params`, from the view when it already holds
/// exactly that query and `refresh` is not set, otherwise from the API.
pub fn ensure_loaded(
    fetch: ListFetch<'_>,
    params: &ListParams,
    sort: &SortState,
) -> Result<Snapshot, ApiError> {
    let last = fetch.view.snapshot();
    let query = fetch.source.query(params, fetch.spec, sort, last.as_ref());
    if !params.refresh {
        if let Some(cached) = fetch.view.cached(&query) {
            return Ok(cached);
        }
    }
    tracing::debug!(resource = fetch.resource, ?query, "fetching list");
    fetch.view.load(fetch.api, fetch.resource, query)
}

/// Like `ensure_loaded`, but a failure becomes an inline message over the
/// rows from the last good load.
pub fn load_for_render(fetch: ListFetch<'_>, params: &ListParams, sort: &SortState) -> Loaded {
    match ensure_loaded(fetch, params, sort) {
        Ok(snapshot) => Loaded {
            snapshot: Some(snapshot),
            error: None,
        },
        Err(e) => {
            tracing::debug!(resource = fetch.resource, error = %e, "rendering list with load error");
            Loaded {
                snapshot: fetch.view.snapshot(),
                error: Some(e.user_message()),
            }
        }
    }
}

/// Normalized records -> rows -> filter -> sort, every matching row.
pub fn arrange(
    snapshot: &Snapshot,
    source: &dyn ListSource,
    spec: &ViewSpec,
    params: &ListParams,
    sort: &SortState,
    now: DateTime<FixedOffset>,
) -> Vec<Row> {
    let rows = build_rows(spec, &snapshot.records, now);
    source.arrange(rows, params, sort)
}

/// Runs the whole pipeline over what one request loaded. Pure.
pub fn present(
    loaded: &Loaded,
    source: &dyn ListSource,
    spec: &ViewSpec,
    sort: SortState,
    params: &ListParams,
    now: DateTime<FixedOffset>,
) -> ListOutcome {
    let empty;
    let snapshot = match &loaded.snapshot {
        Some(snapshot) => snapshot,
        None => {
            empty = Snapshot::from_normalized(Default::default(), ListQuery::everything());
            &empty
        }
    };

    let all_rows = build_rows(spec, &snapshot.records, now);
    let page_local = source.mode() == PagingMode::Server;
    let metrics = ListMetrics::from_rows(&all_rows, &spec.status, snapshot.count(), page_local);

    let arranged = source.arrange(all_rows, params, &sort);
    let page = source.page(arranged, params, snapshot);

    ListOutcome {
        stale: loaded.error.is_some() && !snapshot.records.is_empty(),
        page,
        metrics,
        sort,
        error: loaded.error.clone(),
    }
}
