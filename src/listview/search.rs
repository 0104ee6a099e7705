// src/listview/search.rs

use crate::listview::row::{digits_only, Row};

/// A prepared search box value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchTerm {
    text: String,
    digits: String,
}

impl SearchTerm {
    pub fn new(raw: &str) -> Self {
        let text = raw.trim().to_lowercase();
        let digits = digits_only(&text);
        Self { text, digits }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Case-insensitive containment over the searchable text, or digit-only
    /// containment over date/phone fields ("2025" finds "12 December 2025").
    pub fn matches(&self, row: &Row) -> bool {
        if self.is_empty() {
            return true;
        }
        if row.search_text.contains(&self.text) {
            return true;
        }
        !self.digits.is_empty() && row.search_digits.iter().any(|d| d.contains(&self.digits))
    }
}

/// Rows matching `term`, in their original order. An empty term keeps everything.
pub fn filter_rows(rows: &[Row], term: &SearchTerm) -> Vec<Row> {
    rows.iter().filter(|r| term.matches(r)).cloned().collect()
}
