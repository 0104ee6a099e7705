// src/listview/params.rs

use crate::listview::menu::MenuState;
use crate::listview::paginate::PageRequest;
use crate::listview::row::{ViewSpec, STATUS_KEY};
use crate::listview::sort::{SortDirection, SortState};
use crate::listview::status::StatusRule;
use url::form_urlencoded;

/// Filter/sort/page state of a list, carried in the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub search: String,
    pub sort: Option<String>,
    pub dir: Option<SortDirection>,
    pub page: usize,
    pub size: usize,
    pub menu: MenuState,
    /// Force a re-fetch even when the loaded data matches. Set by `refresh=1`
    /// and by a visit with no query string at all.
    pub refresh: bool,
}

impl ListParams {
    pub fn new(default_size: usize) -> Self {
        Self {
            search: String::new(),
            sort: None,
            dir: None,
            page: 1,
            size: default_size,
            menu: MenuState::default(),
            refresh: false,
        }
    }

    /// Unknown keys and unparseable numbers are ignored.
    pub fn parse(query: Option<&str>, default_size: usize) -> Self {
        let mut params = Self::new(default_size);
        let Some(query) = query.filter(|q| !q.trim().is_empty()) else {
            // A bare visit (sidebar, redirect) mounts the list afresh.
            params.refresh = true;
            return params;
        };

        let mut menu = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "q" => params.search = value.trim().to_string(),
                "sort" => {
                    let v = value.trim();
                    params.sort = (!v.is_empty()).then(|| v.to_string());
                }
                "dir" => params.dir = SortDirection::parse(&value),
                "page" => {
                    if let Ok(p) = value.trim().parse() {
                        params.page = p;
                    }
                }
                "size" => {
                    if let Ok(s) = value.trim().parse() {
                        params.size = s;
                    }
                }
                "menu" => menu = Some(value.into_owned()),
                "refresh" => params.refresh = matches!(value.as_ref(), "1" | "true" | "yes"),
                _ => {}
            }
        }
        params.menu = MenuState::from_param(menu.as_deref());

        let req = params.page_request();
        params.page = req.page;
        params.size = req.size;
        params
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }

    /// Requested sort if the key is sortable for this entity, else `default`.
    pub fn sort_state(&self, spec: &ViewSpec, default: &SortState) -> SortState {
        let sortable = |key: &str| {
            spec.column(key).is_some()
                || (key == STATUS_KEY && !matches!(spec.status, StatusRule::None))
        };

        let mut state = match self.sort.as_deref() {
            Some(key) if sortable(key) => SortState::new(key, spec.sort_kind(key)),
            _ => default.clone(),
        };
        if let Some(dir) = self.dir {
            state.direction = dir;
        }
        state
    }

    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page: page.max(1),
            refresh: false,
            ..self.clone()
        }
    }

    pub fn with_size(&self, size: usize) -> Self {
        Self {
            size,
            page: 1,
            refresh: false,
            ..self.clone()
        }
    }

    /// A new sort always starts back on page one.
    pub fn with_sort(&self, sort: &SortState) -> Self {
        Self {
            sort: Some(sort.key.clone()),
            dir: Some(sort.direction),
            page: 1,
            refresh: false,
            ..self.clone()
        }
    }

    pub fn with_menu(&self, menu: MenuState) -> Self {
        Self {
            menu,
            refresh: false,
            ..self.clone()
        }
    }

    pub fn to_query(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if !self.search.is_empty() {
            out.append_pair("q", &self.search);
        }
        if let Some(sort) = &self.sort {
            out.append_pair("sort", sort);
        }
        if let Some(dir) = self.dir {
            out.append_pair("dir", dir.as_str());
        }
        if self.page > 1 {
            out.append_pair("page", &self.page.to_string());
        }
        out.append_pair("size", &self.size.to_string());
        if let Some(id) = self.menu.open_id() {
            out.append_pair("menu", id);
        }
        out.finish()
    }

    pub fn href(&self, base: &str) -> String {
        format!("{base}?{}", self.to_query())
    }
}
