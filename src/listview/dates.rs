// src/listview/dates.rs
//
// Lenient parsing of the date and time shapes the platform API emits.
// Every parser returns `None` on input it doesn't understand; callers decide
// what a missing value means.

use crate::listview::record::unwrap_extended;
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday,
};
use serde_json::Value;

/// A parsed timestamp. `date_only` is set when the source carried no time of
/// day, so range ends can be treated as inclusive through the whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct When {
    pub at: DateTime<FixedOffset>,
    pub date_only: bool,
}

impl When {
    /// Last instant this value still covers.
    pub fn end_of_range(self) -> DateTime<FixedOffset> {
        if !self.date_only {
            return self.at;
        }
        let last = self
            .at
            .date_naive()
            .and_hms_opt(23, 59, 59)
            .and_then(|n| self.at.timezone().from_local_datetime(&n).single());
        last.unwrap_or(self.at)
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %B %Y", "%d %b %Y", "%B %d, %Y"];

/// Parses RFC 3339 strings, naive ISO date/times, epoch numbers and
/// `{ "$date": .. }` wrappers. Naive values are read in `offset`.
pub fn parse_when(value: &Value, offset: FixedOffset) -> Option<When> {
    match unwrap_extended(value) {
        Value::Number(n) => from_epoch(n.as_f64()?, offset),
        Value::String(s) => parse_when_str(s, offset),
        _ => None,
    }
}

pub fn parse_when_str(raw: &str, offset: FixedOffset) -> Option<When> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(When {
            at: dt.with_timezone(&offset),
            date_only: false,
        });
    }

    if let Some(dt) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return localize(dt, offset).map(|at| When { at, date_only: false });
    }

    if let Some(d) = NAIVE_DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
    {
        return d
            .and_hms_opt(0, 0, 0)
            .and_then(|dt| localize(dt, offset))
            .map(|at| When { at, date_only: true });
    }

    s.parse::<f64>().ok().and_then(|n| from_epoch(n, offset))
}

fn localize(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    offset.from_local_datetime(&naive).single()
}

/// Large numbers are milliseconds, small ones seconds.
fn from_epoch(n: f64, offset: FixedOffset) -> Option<When> {
    if !n.is_finite() {
        return None;
    }
    let millis = if n.abs() >= 1e11 { n } else { n * 1000.0 };
    let at = DateTime::from_timestamp_millis(millis as i64)?.with_timezone(&offset);
    Some(When { at, date_only: false })
}

/// Parses `"9:00 AM"`, `"9am"`, `"09:00"`, `"17:30:00"`, `"12:15 p.m."`.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect::<String>()
        .to_ascii_uppercase();
    if compact.is_empty() {
        return None;
    }

    let (clock, meridiem) = if let Some(rest) = compact.strip_suffix("AM") {
        (rest, Some(false))
    } else if let Some(rest) = compact.strip_suffix("PM") {
        (rest, Some(true))
    } else {
        (compact.as_str(), None)
    };

    let mut parts = clock.split(':');
    let hour: u32 = parts.next()?.parse().ok()?;
    let minute: u32 = match parts.next() {
        Some(m) => m.parse().ok()?,
        None if meridiem.is_some() => 0,
        None => return None,
    };
    let second: u32 = match parts.next() {
        Some(sec) => sec.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    let hour = match meridiem {
        Some(pm) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, false) => h,
                (h, true) => h + 12,
            }
        }
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, second)
}

/// A daily opening window such as `"9:00 AM - 5:00 PM"`. A window whose end
/// is before its start runs past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.replace(&['–', '—'][..], "-").replace(" to ", "-");
        let (start, end) = normalized.split_once('-')?;
        Some(Self {
            start: parse_time_of_day(start)?,
            end: parse_time_of_day(end)?,
        })
    }

    pub fn overnight(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.overnight() {
            t >= self.start || t <= self.end
        } else {
            t >= self.start && t <= self.end
        }
    }

    /// True once today's session is over. Overnight windows never are, since
    /// they close on the following day.
    pub fn is_past(&self, t: NaiveTime) -> bool {
        !self.overnight() && t > self.end
    }
}

/// Set of weekdays, parsed from `"Mon-Fri"`, `"Monday, Wednesday"`,
/// `"Weekends"`, `"Daily"` or a JSON array of day names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySet(u8);

impl DaySet {
    pub const ALL: DaySet = DaySet(0b111_1111);

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    fn with(self, day: Weekday) -> Self {
        DaySet(self.0 | (1 << day.num_days_from_monday()))
    }

    pub fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::parse_str(s),
            Value::Array(items) => {
                let mut set = DaySet(0);
                for item in items {
                    set = DaySet(set.0 | Self::parse(item)?.0);
                }
                (set.0 != 0).then_some(set)
            }
            _ => None,
        }
    }

    pub fn parse_str(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "" => return None,
            "daily" | "everyday" | "every day" | "all days" | "all week" => return Some(Self::ALL),
            "weekdays" => return Self::parse_str("mon-fri"),
            "weekends" | "weekend" => return Self::parse_str("sat-sun"),
            _ => {}
        }

        let mut set = DaySet(0);
        for part in lowered.split(&[',', '/', '&'][..]).map(str::trim).filter(|p| !p.is_empty()) {
            let normalized = part.replace(&['–', '—'][..], "-").replace(" to ", "-");
            match normalized.split_once('-') {
                Some((from, to)) => {
                    let (mut day, last) = (weekday(from)?, weekday(to)?);
                    set = set.with(day);
                    while day != last {
                        day = day.succ();
                        set = set.with(day);
                    }
                }
                None => set = set.with(weekday(&normalized)?),
            }
        }
        (set.0 != 0).then_some(set)
    }
}

fn weekday(raw: &str) -> Option<Weekday> {
    let key: String = raw.trim().chars().take(3).collect();
    match key.as_str() {
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// "Friday, 12 December 2025"
pub fn format_date(at: DateTime<FixedOffset>) -> String {
    at.format("%A, %-d %B %Y").to_string()
}

/// "Friday, 12 December 2025, 10:00 AM"
pub fn format_datetime(at: DateTime<FixedOffset>) -> String {
    at.format("%A, %-d %B %Y, %-I:%M %p").to_string()
}

/// Value for an `<input type="date">`.
pub fn format_input_date(at: DateTime<FixedOffset>) -> String {
    format!("{:04}-{:02}-{:02}", at.year(), at.month(), at.day())
}
