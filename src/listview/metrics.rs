// src/listview/metrics.rs

use crate::listview::row::Row;
use crate::listview::status::{Status, StatusRule};

/// Summary cards above a list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListMetrics {
    pub total: usize,
    /// One entry per status the entity can have, zero counts included.
    pub by_status: Vec<(Status, usize)>,
    /// Counts only cover the loaded page (server-paginated lists).
    pub page_local: bool,
}

impl ListMetrics {
    /// `total` is the authoritative count (server total or all loaded rows);
    /// status counts come from `rows`.
    pub fn from_rows(rows: &[Row], rule: &StatusRule, total: usize, page_local: bool) -> Self {
        let by_status = rule
            .variants()
            .iter()
            .map(|variant| {
                let n = rows.iter().filter(|r| r.status == Some(*variant)).count();
                (*variant, n)
            })
            .collect();

        Self {
            total,
            by_status,
            page_local,
        }
    }

    pub fn count(&self, status: Status) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}
