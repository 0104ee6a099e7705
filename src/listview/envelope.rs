// src/listview/envelope.rs

use serde_json::Value;

/// One way a list can sit inside a response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// The body itself is the array.
    Array,
    /// The array sits at `path`; optional sibling totals.
    Wrapped {
        path: &'static str,
        total_path: Option<&'static str>,
        pages_path: Option<&'static str>,
    },
    /// A paginate-plugin envelope: `{ docs, totalDocs, totalPages }`.
    Paged {
        docs_path: &'static str,
        total_path: &'static str,
        pages_path: &'static str,
    },
}

/// Probed in order; the first shape that finds an array wins.
pub const DEFAULT_PROBES: &[EnvelopeShape] = &[
    EnvelopeShape::Array,
    EnvelopeShape::Paged {
        docs_path: "/data/docs",
        total_path: "/data/totalDocs",
        pages_path: "/data/totalPages",
    },
    EnvelopeShape::Paged {
        docs_path: "/docs",
        total_path: "/totalDocs",
        pages_path: "/totalPages",
    },
    EnvelopeShape::Paged {
        docs_path: "/data/data/docs",
        total_path: "/data/data/totalDocs",
        pages_path: "/data/data/totalPages",
    },
    EnvelopeShape::Wrapped {
        path: "/data/data",
        total_path: Some("/data/total"),
        pages_path: Some("/data/totalPages"),
    },
    EnvelopeShape::Wrapped {
        path: "/data",
        total_path: Some("/total"),
        pages_path: Some("/totalPages"),
    },
    EnvelopeShape::Wrapped {
        path: "/message",
        total_path: None,
        pages_path: None,
    },
    EnvelopeShape::Wrapped {
        path: "/items",
        total_path: Some("/total"),
        pages_path: Some("/totalPages"),
    },
    EnvelopeShape::Wrapped {
        path: "/results",
        total_path: Some("/count"),
        pages_path: None,
    },
];

/// The flat record list pulled out of an envelope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Normalized {
    pub records: Vec<Value>,
    /// Server-reported total across all pages, when the envelope had one.
    pub total: Option<usize>,
    pub total_pages: Option<usize>,
    /// Which probe matched; `None` for unrecognized bodies.
    pub shape: Option<EnvelopeShape>,
}

impl EnvelopeShape {
    fn extract(&self, body: &Value) -> Option<Normalized> {
        match *self {
            EnvelopeShape::Array => body.as_array().map(|items| Normalized {
                records: items.clone(),
                total: None,
                total_pages: None,
                shape: Some(*self),
            }),
            EnvelopeShape::Wrapped {
                path,
                total_path,
                pages_path,
            } => body.pointer(path).and_then(Value::as_array).map(|items| Normalized {
                records: items.clone(),
                total: total_path.and_then(|p| count_at(body, p)),
                total_pages: pages_path.and_then(|p| count_at(body, p)),
                shape: Some(*self),
            }),
            EnvelopeShape::Paged {
                docs_path,
                total_path,
                pages_path,
            } => body
                .pointer(docs_path)
                .and_then(Value::as_array)
                .map(|items| Normalized {
                    records: items.clone(),
                    total: count_at(body, total_path),
                    total_pages: count_at(body, pages_path),
                    shape: Some(*self),
                }),
        }
    }
}

fn count_at(body: &Value, pointer: &str) -> Option<usize> {
    match body.pointer(pointer)? {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Extracts the record list using `DEFAULT_PROBES`. Never fails: `null`,
/// scalars and unknown shapes give an empty list.
pub fn normalize(body: &Value) -> Normalized {
    normalize_with(body, DEFAULT_PROBES)
}

pub fn normalize_with(body: &Value, probes: &[EnvelopeShape]) -> Normalized {
    match probes.iter().find_map(|probe| probe.extract(body)) {
        Some(found) => found,
        None => {
            if !body.is_null() {
                tracing::warn!("unrecognized list envelope, treating as empty");
            }
            Normalized::default()
        }
    }
}

/// Pulls the single record out of a create/update response, so it can be
/// applied to the loaded list without waiting for the re-fetch.
pub fn single_record(body: &Value) -> Option<Value> {
    let candidate = ["/data/data", "/data", ""]
        .iter()
        .filter_map(|p| body.pointer(p))
        .find(|v| v.is_object() && crate::listview::record::record_id(v).is_some())?;
    Some(candidate.clone())
}
