// src/listview/source.rs

use crate::api::ListQuery;
use crate::listview::paginate::{Page, PageRequest};
use crate::listview::params::ListParams;
use crate::listview::row::{Row, ViewSpec};
use crate::listview::search::{filter_rows, SearchTerm};
use crate::listview::sort::SortState;
use crate::listview::view::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingMode {
    /// Everything is fetched once; search, sort and paging happen here.
    Client,
    /// The API pages and searches; only the current page is held.
    Server,
}

/// Where a list's rows come from and who does the paging.
pub trait ListSource: Send + Sync {
    fn mode(&self) -> PagingMode;

    /// Query that loads what `params` needs, in `sort` order where the server
    /// does the ordering. `last` is the previously loaded snapshot, if any.
    fn query(
        &self,
        params: &ListParams,
        spec: &ViewSpec,
        sort: &SortState,
        last: Option<&Snapshot>,
    ) -> ListQuery;

    /// Query for a spreadsheet of every matching row.
    fn export_query(&self, params: &ListParams) -> ListQuery;

    /// Filters (where this side searches) and sorts the loaded rows.
    fn arrange(&self, rows: Vec<Row>, params: &ListParams, sort: &SortState) -> Vec<Row>;

    /// Cuts the visible page out of arranged rows.
    fn page(&self, rows: Vec<Row>, params: &ListParams, snapshot: &Snapshot) -> Page<Row>;
}

pub struct InMemoryListSource;

impl ListSource for InMemoryListSource {
    fn mode(&self) -> PagingMode {
        PagingMode::Client
    }

    fn query(
        &self,
        _params: &ListParams,
        _spec: &ViewSpec,
        _sort: &SortState,
        _last: Option<&Snapshot>,
    ) -> ListQuery {
        ListQuery::everything()
    }

    fn export_query(&self, _params: &ListParams) -> ListQuery {
        ListQuery::everything()
    }

    fn arrange(&self, rows: Vec<Row>, params: &ListParams, sort: &SortState) -> Vec<Row> {
        let term = SearchTerm::new(&params.search);
        let mut rows = if term.is_empty() {
            rows
        } else {
            filter_rows(&rows, &term)
        };
        sort.sort(&mut rows);
        rows
    }

    fn page(&self, rows: Vec<Row>, params: &ListParams, _snapshot: &Snapshot) -> Page<Row> {
        Page::slice(rows, params.page_request())
    }
}

pub struct RemoteListSource;

impl ListSource for RemoteListSource {
    fn mode(&self) -> PagingMode {
        PagingMode::Server
    }

    fn query(
        &self,
        params: &ListParams,
        spec: &ViewSpec,
        sort: &SortState,
        last: Option<&Snapshot>,
    ) -> ListQuery {
        let mut req = params.page_request();

        // Known page count only holds while the search stays the same.
        let search = params.search.trim();
        let known_pages = last
            .filter(|s| s.query.search.as_deref().unwrap_or("") == search)
            .and_then(|s| s.total_pages);
        if let Some(pages) = known_pages {
            req = req.clamp_to(pages);
        }

        let query = ListQuery::page(req.page, req.size, search);
        match spec.sort_field(&sort.key) {
            Some(field) => query.sorted(field, sort.direction.as_str()),
            None => query,
        }
    }

    fn export_query(&self, params: &ListParams) -> ListQuery {
        let search = params.search.trim();
        ListQuery {
            search: (!search.is_empty()).then(|| search.to_string()),
            ..ListQuery::everything()
        }
    }

    /// The server already filtered and ordered across pages; this keeps ties
    /// in the same id order the in-memory source uses.
    fn arrange(&self, mut rows: Vec<Row>, _params: &ListParams, sort: &SortState) -> Vec<Row> {
        sort.sort(&mut rows);
        rows
    }

    fn page(&self, rows: Vec<Row>, params: &ListParams, snapshot: &Snapshot) -> Page<Row> {
        let req = match (snapshot.query.page, snapshot.query.limit) {
            (Some(page), Some(limit)) => PageRequest::new(page, limit),
            _ => params.page_request(),
        };
        Page::from_server(rows, req, snapshot.total, snapshot.total_pages)
    }
}
