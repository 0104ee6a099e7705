// src/entities/forms.rs

use crate::listview::dates::{format_input_date, parse_when, parse_when_str, TimeWindow};
use crate::listview::record::{as_flag, display_text, lookup};
use chrono::FixedOffset;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use url::{form_urlencoded, Url};

/// Validation messages keyed by field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Raw submitted form values.
pub type FormInput = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Email,
    Phone,
    Number,
    Date,
    DateTime,
    /// "9:00 AM - 5:00 PM"
    TimeWindow,
    Url,
    Select(&'static [&'static str]),
    Checkbox,
}

#[derive(Debug, Clone, Copy)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FormField {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormSpec {
    pub fields: &'static [FormField],
    /// `(start, end)`: end may not come before start.
    pub date_order: Option<(&'static str, &'static str)>,
}

pub fn parse_form(body: &[u8]) -> FormInput {
    form_urlencoded::parse(body).into_owned().collect()
}

impl FormSpec {
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Checks every field and builds the JSON payload. Blank optional fields
    /// are left out; numbers are sent as numbers.
    pub fn validate(&self, input: &FormInput, offset: FixedOffset) -> Result<Value, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut payload = Map::new();

        for field in self.fields {
            let raw = input.get(field.name).map(|s| s.trim()).unwrap_or("");

            if field.kind == FieldKind::Checkbox {
                payload.insert(field.name.to_string(), Value::Bool(is_checked(raw)));
                continue;
            }

            if raw.is_empty() {
                if field.required {
                    errors.insert(field.name.to_string(), format!("{} is required", field.label));
                }
                continue;
            }

            match check(field, raw, offset) {
                Ok(value) => {
                    payload.insert(field.name.to_string(), value);
                }
                Err(msg) => {
                    errors.insert(field.name.to_string(), msg);
                }
            }
        }

        if let Some((start, end)) = self.date_order {
            self.check_order(input, start, end, offset, &mut errors);
        }

        if errors.is_empty() {
            Ok(Value::Object(payload))
        } else {
            Err(errors)
        }
    }

    fn check_order(
        &self,
        input: &FormInput,
        start: &str,
        end: &str,
        offset: FixedOffset,
        errors: &mut FieldErrors,
    ) {
        if errors.contains_key(start) || errors.contains_key(end) {
            return;
        }
        let parsed = |name: &str| {
            input
                .get(name)
                .and_then(|raw| parse_when_str(raw, offset))
        };
        if let (Some(s), Some(e)) = (parsed(start), parsed(end)) {
            if e.end_of_range() < s.at {
                let label = self.field(start).map(|f| f.label).unwrap_or(start);
                errors.insert(end.to_string(), format!("Must not be before {label}"));
            }
        }
    }

    /// Current values of a loaded record, as form inputs expect them.
    pub fn prefill(&self, record: &Value, offset: FixedOffset) -> FormInput {
        self.fields
            .iter()
            .filter_map(|field| {
                let value = lookup(record, field.name)?;
                let text = match field.kind {
                    FieldKind::Date => parse_when(value, offset).map(|w| format_input_date(w.at))?,
                    FieldKind::DateTime => parse_when(value, offset)
                        .map(|w| w.at.format("%Y-%m-%dT%H:%M").to_string())?,
                    FieldKind::Checkbox => {
                        if as_flag(value).unwrap_or(false) {
                            "on".to_string()
                        } else {
                            return None;
                        }
                    }
                    _ => display_text(value),
                };
                Some((field.name.to_string(), text))
            })
            .collect()
    }
}

fn is_checked(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "on" | "true" | "1" | "yes")
}

fn check(field: &FormField, raw: &str, offset: FixedOffset) -> Result<Value, String> {
    let label = field.label;
    match field.kind {
        FieldKind::Text | FieldKind::TextArea => Ok(Value::String(raw.to_string())),
        FieldKind::Email => {
            if is_email(raw) {
                Ok(Value::String(raw.to_ascii_lowercase()))
            } else {
                Err(format!("{label} must be a valid email address"))
            }
        }
        FieldKind::Phone => {
            let digits = raw.chars().filter(char::is_ascii_digit).count();
            let allowed = raw
                .chars()
                .all(|c| c.is_ascii_digit() || " +-().".contains(c));
            if allowed && (7..=15).contains(&digits) {
                Ok(Value::String(raw.to_string()))
            } else {
                Err(format!("{label} must be a phone number"))
            }
        }
        FieldKind::Number => raw
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(number_value)
            .ok_or_else(|| format!("{label} must be a non-negative number")),
        FieldKind::Date => parse_when_str(raw, offset)
            .map(|w| Value::String(format_input_date(w.at)))
            .ok_or_else(|| format!("{label} must be a date")),
        FieldKind::DateTime => parse_when_str(raw, offset)
            .map(|w| Value::String(w.at.to_rfc3339()))
            .ok_or_else(|| format!("{label} must be a date and time")),
        FieldKind::TimeWindow => TimeWindow::parse(raw)
            .map(|_| Value::String(raw.to_string()))
            .ok_or_else(|| format!("{label} must look like 9:00 AM - 5:00 PM")),
        FieldKind::Url => match Url::parse(raw) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => Ok(Value::String(raw.to_string())),
            _ => Err(format!("{label} must be an http(s) link")),
        },
        FieldKind::Select(options) => options
            .iter()
            .find(|o| o.eq_ignore_ascii_case(raw))
            .map(|o| Value::String(o.to_string()))
            .ok_or_else(|| format!("{label} must be one of: {}", options.join(", "))),
        FieldKind::Checkbox => Ok(Value::Bool(is_checked(raw))),
    }
}

fn is_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !raw.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n <= i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}
