// src/state.rs

use crate::api::ApiService;
use crate::config::AppConfig;
use crate::entities::{EntitySpec, CATALOG};
use crate::errors::ServerError;
use crate::listview::{ListFetch, ListView};
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::HashMap;

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Everything request handlers share: config, the API client, and one
/// loaded list per entity.
pub struct AppState {
    pub config: AppConfig,
    pub api: Box<dyn ApiService>,
    views: HashMap<&'static str, ListView>,
    clock: Clock,
}

impl AppState {
    pub fn new(config: AppConfig, api: Box<dyn ApiService>) -> Self {
        let views = CATALOG
            .iter()
            .map(|entity| (entity.slug, ListView::new()))
            .collect();

        Self {
            config,
            api,
            views,
            clock: Box::new(Utc::now),
        }
    }

    /// Replaces the wall clock, so status derivation is deterministic in tests.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    /// Current time in the display offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        (self.clock)().with_timezone(&self.config.display_offset)
    }

    pub fn view(&self, entity: &EntitySpec) -> Result<&ListView, ServerError> {
        self.views.get(entity.slug).ok_or(ServerError::NotFound)
    }

    /// The view, source and API client that load `entity`'s list.
    pub fn list_fetch<'a>(&'a self, entity: &'a EntitySpec) -> Result<ListFetch<'a>, ServerError> {
        Ok(ListFetch {
            view: self.view(entity)?,
            source: entity.source(),
            api: self.api.as_ref(),
            resource: entity.resource,
            spec: &entity.view,
        })
    }
}
