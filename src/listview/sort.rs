// src/listview/sort.rs

use crate::listview::record::{as_number, display_text};
use crate::listview::row::Row;
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    Text,
    Number,
    /// Epoch milliseconds.
    Date,
}

impl SortKind {
    /// Dates open newest first, everything else A-Z / low-high.
    pub fn default_direction(self) -> SortDirection {
        match self {
            SortKind::Date => SortDirection::Desc,
            SortKind::Text | SortKind::Number => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Asc),
            "desc" | "descending" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
}

impl SortValue {
    /// Missing or unreadable values become `""` or `0`, the minimum of their kind.
    pub fn from_raw(value: Option<&Value>, kind: SortKind) -> Self {
        match kind {
            SortKind::Text => {
                SortValue::Text(value.map(display_text).unwrap_or_default().to_lowercase())
            }
            SortKind::Number | SortKind::Date => {
                SortValue::Number(value.and_then(as_number).unwrap_or(0.0))
            }
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            // Mixed kinds never occur for one key; keep the order total anyway.
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        }
    }
}

/// Active sort column and direction of one list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub kind: SortKind,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: impl Into<String>, kind: SortKind) -> Self {
        Self {
            key: key.into(),
            kind,
            direction: kind.default_direction(),
        }
    }

    /// Same key flips the direction; a new key starts at its default direction.
    pub fn toggle(&self, key: &str, kind: SortKind) -> Self {
        if key == self.key {
            Self {
                direction: self.direction.flip(),
                ..self.clone()
            }
        } else {
            Self::new(key, kind)
        }
    }

    /// Total order: the sort value, then the row id. Descending is the exact
    /// reverse of ascending.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let ord = a
            .sort_value(&self.key, self.kind)
            .compare(&b.sort_value(&self.key, self.kind))
            .then_with(|| a.id.cmp(&b.id));
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }

    pub fn sort(&self, rows: &mut [Row]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }
}
