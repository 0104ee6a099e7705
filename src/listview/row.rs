// src/listview/row.rs

use crate::listview::dates::{format_date, format_datetime, parse_when};
use crate::listview::record::{as_number, display_text, lookup, record_id};
use crate::listview::sort::{SortKind, SortValue};
use crate::listview::status::{Status, StatusRule};
use chrono::{DateTime, FixedOffset};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Money,
    Date,
    DateTime,
    Bool,
    Email,
    Phone,
}

impl ColumnKind {
    pub fn sort_kind(self) -> SortKind {
        match self {
            ColumnKind::Number | ColumnKind::Money | ColumnKind::Bool => SortKind::Number,
            ColumnKind::Date | ColumnKind::DateTime => SortKind::Date,
            ColumnKind::Text | ColumnKind::Email | ColumnKind::Phone => SortKind::Text,
        }
    }
}

/// One table column: a header, a dotted path into the record, and how to
/// render and sort it.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub key: &'static str,
    pub header: &'static str,
    pub path: &'static str,
    pub kind: ColumnKind,
}

/// Column key under which the derived status sorts.
pub const STATUS_KEY: &str = "status";

/// Everything the pipeline needs to turn records of one entity into rows.
#[derive(Debug, Clone, Copy)]
pub struct ViewSpec {
    pub columns: &'static [Column],
    /// Paths matched case-insensitively by the search box.
    pub search_fields: &'static [&'static str],
    /// Paths (dates, phone numbers) also matched on digits only.
    pub digit_fields: &'static [&'static str],
    pub status: StatusRule,
}

impl ViewSpec {
    pub fn column(&self, key: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Record path a server is asked to order by for a sort key.
    pub fn sort_field(&self, key: &str) -> Option<&'static str> {
        if key == STATUS_KEY {
            return self.status.field();
        }
        self.column(key).map(|c| c.path)
    }

    pub fn sort_kind(&self, key: &str) -> SortKind {
        if key == STATUS_KEY {
            return SortKind::Text;
        }
        self.column(key)
            .map(|c| c.kind.sort_kind())
            .unwrap_or(SortKind::Text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub key: &'static str,
    pub text: String,
}

/// Display-ready projection of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: String,
    /// False when the record carried no id and `id` is only its position;
    /// such rows cannot be edited or deleted.
    pub keyed: bool,
    pub cells: Vec<Cell>,
    pub status: Option<Status>,
    /// Lowercased searchable text.
    pub search_text: String,
    /// Digit-only renderings of date/phone fields.
    pub search_digits: Vec<String>,
    sort_values: Vec<(&'static str, SortValue)>,
    pub record: Value,
}

impl Row {
    pub fn cell(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.text.as_str())
    }

    /// Sort value for a column key; missing values sort as the kind's minimum.
    pub fn sort_value(&self, key: &str, kind: SortKind) -> SortValue {
        if key == STATUS_KEY {
            return SortValue::Text(
                self.status
                    .map(|s| s.label().to_lowercase())
                    .unwrap_or_default(),
            );
        }
        self.sort_values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| SortValue::from_raw(lookup(&self.record, key), kind))
    }
}

/// Builds rows from records. Status is derived against `now`; the records
/// themselves are cloned, never modified.
pub fn build_rows(spec: &ViewSpec, records: &[Value], now: DateTime<FixedOffset>) -> Vec<Row> {
    records
        .iter()
        .enumerate()
        .map(|(i, rec)| build_row(spec, rec, i, now))
        .collect()
}

pub fn build_row(spec: &ViewSpec, record: &Value, index: usize, now: DateTime<FixedOffset>) -> Row {
    let offset = *now.offset();

    let (id, keyed) = match record_id(record) {
        Some(id) => (id, true),
        None => {
            tracing::warn!(index, "record has no _id/id, using its position as key");
            (format!("row-{index}"), false)
        }
    };

    let cells = spec
        .columns
        .iter()
        .map(|col| Cell {
            key: col.key,
            text: render(col.kind, lookup(record, col.path), offset),
        })
        .collect::<Vec<_>>();

    let sort_values = spec
        .columns
        .iter()
        .map(|col| {
            let value = lookup(record, col.path);
            let sort = match col.kind.sort_kind() {
                SortKind::Date => SortValue::Number(
                    value
                        .and_then(|v| parse_when(v, offset))
                        .map(|w| w.at.timestamp_millis() as f64)
                        .unwrap_or(0.0),
                ),
                kind => SortValue::from_raw(value, kind),
            };
            (col.key, sort)
        })
        .collect();

    let status = spec.status.derive(record, now);

    let mut search_text = spec
        .search_fields
        .iter()
        .map(|path| field_text(spec, record, path, offset))
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(status) = status {
        search_text.push(' ');
        search_text.push_str(status.label());
    }

    let search_digits = spec
        .digit_fields
        .iter()
        .flat_map(|path| {
            let shown = field_text(spec, record, path, offset);
            let raw = lookup(record, path).map(display_text).unwrap_or_default();
            [digits_only(&shown), digits_only(&raw)]
        })
        .filter(|d| !d.is_empty())
        .collect();

    Row {
        id,
        keyed,
        cells,
        status,
        search_text: search_text.to_lowercase(),
        search_digits,
        sort_values,
        record: record.clone(),
    }
}

/// Text of a field as the table shows it, formatted by its column when it has one.
fn field_text(spec: &ViewSpec, record: &Value, path: &str, offset: FixedOffset) -> String {
    let kind = spec
        .columns
        .iter()
        .find(|c| c.path == path)
        .map(|c| c.kind)
        .unwrap_or(ColumnKind::Text);
    render(kind, lookup(record, path), offset)
}

fn render(kind: ColumnKind, value: Option<&Value>, offset: FixedOffset) -> String {
    let Some(value) = value else {
        return String::new();
    };
    match kind {
        ColumnKind::Date => parse_when(value, offset)
            .map(|w| format_date(w.at))
            .unwrap_or_else(|| display_text(value)),
        ColumnKind::DateTime => parse_when(value, offset)
            .map(|w| {
                if w.date_only {
                    format_date(w.at)
                } else {
                    format_datetime(w.at)
                }
            })
            .unwrap_or_else(|| display_text(value)),
        ColumnKind::Money => as_number(value)
            .map(|n| format!("{n:.2}"))
            .unwrap_or_else(|| display_text(value)),
        ColumnKind::Text
        | ColumnKind::Number
        | ColumnKind::Bool
        | ColumnKind::Email
        | ColumnKind::Phone => display_text(value),
    }
}

pub fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listview::status::{ScheduleRule, ScheduleStatus};
    use chrono::TimeZone;
    use serde_json::json;

    const COLUMNS: &[Column] = &[
        Column { key: "title", header: "Title", path: "title", kind: ColumnKind::Text },
        Column { key: "product", header: "Product", path: "productId.title", kind: ColumnKind::Text },
        Column { key: "startDate", header: "Starts", path: "startDate", kind: ColumnKind::DateTime },
        Column { key: "price", header: "Price", path: "price", kind: ColumnKind::Money },
    ];

    const SPEC: ViewSpec = ViewSpec {
        columns: COLUMNS,
        search_fields: &["title", "productId.title"],
        digit_fields: &["startDate"],
        status: StatusRule::Schedule(ScheduleRule {
            start: "startDate",
            end: None,
            hours: None,
            days: None,
        }),
    };

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 12, 1, 9, 0, 0)
            .unwrap()
    }

    #[test]
    fn flattens_nested_references_and_formats() {
        let rec = json!({
            "_id": { "$oid": "e1" },
            "title": "Sunset Yoga",
            "productId": { "_id": "p1", "title": "Mat Rental" },
            "startDate": "2025-12-12T10:00:00Z",
            "price": 49.5
        });
        let row = build_row(&SPEC, &rec, 0, now());

        assert_eq!(row.id, "e1");
        assert_eq!(row.cell("product"), Some("Mat Rental"));
        assert_eq!(row.cell("startDate"), Some("Friday, 12 December 2025, 10:00 AM"));
        assert_eq!(row.cell("price"), Some("49.50"));
        assert_eq!(row.status, Some(Status::Schedule(ScheduleStatus::Upcoming)));
        assert!(row.search_text.contains("sunset yoga"));
        assert!(row.search_text.contains("upcoming"));
        assert!(row.search_digits.iter().any(|d| d.contains("2025")));
        assert_eq!(row.record, rec);
    }

    #[test]
    fn missing_id_falls_back_to_position() {
        let rows = build_rows(&SPEC, &[json!({ "title": "a" }), json!({ "title": "b" })], now());
        assert_eq!(rows[1].id, "row-1");
        assert!(!rows[1].keyed);
        assert_eq!(rows[0].cell("price"), Some(""));

        let rows = build_rows(&SPEC, &[json!({ "_id": "e1", "title": "a" })], now());
        assert!(rows[0].keyed);
    }
}
