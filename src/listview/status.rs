// src/listview/status.rs

use crate::listview::dates::{parse_when, DaySet, TimeWindow};
use crate::listview::record::{as_flag, lookup};
use chrono::{DateTime, Datelike, FixedOffset};
use serde_json::Value;

/// Lifecycle of anything with a start and an end (events, classes, tours).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScheduleStatus {
    Upcoming,
    Ongoing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActivityStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApplicationStatus {
    Submitted,
    Processing,
    Approved,
    Rejected,
}

/// Display status of a row. Each entity type uses exactly one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Schedule(ScheduleStatus),
    Activity(ActivityStatus),
    Payment(PaymentStatus),
    Application(ApplicationStatus),
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Schedule(ScheduleStatus::Upcoming) => "Upcoming",
            Status::Schedule(ScheduleStatus::Ongoing) => "Ongoing",
            Status::Schedule(ScheduleStatus::Done) => "Done",
            Status::Activity(ActivityStatus::Active) => "Active",
            Status::Activity(ActivityStatus::Inactive) => "Inactive",
            Status::Payment(PaymentStatus::Paid) => "Paid",
            Status::Payment(PaymentStatus::Pending) => "Pending",
            Status::Payment(PaymentStatus::Failed) => "Failed",
            Status::Payment(PaymentStatus::Refunded) => "Refunded",
            Status::Application(ApplicationStatus::Submitted) => "Submitted",
            Status::Application(ApplicationStatus::Processing) => "Processing",
            Status::Application(ApplicationStatus::Approved) => "Approved",
            Status::Application(ApplicationStatus::Rejected) => "Rejected",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Status::Schedule(ScheduleStatus::Upcoming) => "badge badge-info",
            Status::Schedule(ScheduleStatus::Ongoing) => "badge badge-success",
            Status::Schedule(ScheduleStatus::Done) => "badge badge-muted",
            Status::Activity(ActivityStatus::Active) => "badge badge-success",
            Status::Activity(ActivityStatus::Inactive) => "badge badge-danger",
            Status::Payment(PaymentStatus::Paid) => "badge badge-success",
            Status::Payment(PaymentStatus::Pending) => "badge badge-warning",
            Status::Payment(PaymentStatus::Failed) => "badge badge-danger",
            Status::Payment(PaymentStatus::Refunded) => "badge badge-muted",
            Status::Application(ApplicationStatus::Submitted) => "badge badge-info",
            Status::Application(ApplicationStatus::Processing) => "badge badge-warning",
            Status::Application(ApplicationStatus::Approved) => "badge badge-success",
            Status::Application(ApplicationStatus::Rejected) => "badge badge-danger",
        }
    }
}

/// Which record fields drive a schedule status.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleRule {
    pub start: &'static str,
    /// Missing end means the range is the start day.
    pub end: Option<&'static str>,
    /// Daily window like "9:00 AM - 5:00 PM".
    pub hours: Option<&'static str>,
    /// Allowed days like "Mon-Fri".
    pub days: Option<&'static str>,
}

/// How a record's status is derived.
#[derive(Debug, Clone, Copy)]
pub enum StatusRule {
    None,
    Schedule(ScheduleRule),
    Flag { field: &'static str },
    Payment { field: &'static str },
    Application { field: &'static str },
}

impl StatusRule {
    /// Record field the status is read from; schedules use their start.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            StatusRule::None => None,
            StatusRule::Schedule(rule) => Some(rule.start),
            StatusRule::Flag { field }
            | StatusRule::Payment { field }
            | StatusRule::Application { field } => Some(field),
        }
    }

    /// Pure over the record and `now`. Unreadable fields fall back to each
    /// family's default instead of failing.
    pub fn derive(&self, record: &Value, now: DateTime<FixedOffset>) -> Option<Status> {
        let status = match self {
            StatusRule::None => return None,
            StatusRule::Schedule(rule) => Status::Schedule(rule.derive(record, now)),
            StatusRule::Flag { field } => Status::Activity(
                match lookup(record, field).and_then(as_flag) {
                    Some(true) => ActivityStatus::Active,
                    Some(false) | None => ActivityStatus::Inactive,
                },
            ),
            StatusRule::Payment { field } => Status::Payment(
                lookup(record, field)
                    .and_then(Value::as_str)
                    .and_then(payment_status)
                    .unwrap_or(PaymentStatus::Pending),
            ),
            StatusRule::Application { field } => Status::Application(
                lookup(record, field)
                    .and_then(Value::as_str)
                    .and_then(application_status)
                    .unwrap_or(ApplicationStatus::Submitted),
            ),
        };
        Some(status)
    }

    /// The statuses this rule can produce, in display order.
    pub fn variants(&self) -> &'static [Status] {
        match self {
            StatusRule::None => &[],
            StatusRule::Schedule(_) => &[
                Status::Schedule(ScheduleStatus::Upcoming),
                Status::Schedule(ScheduleStatus::Ongoing),
                Status::Schedule(ScheduleStatus::Done),
            ],
            StatusRule::Flag { .. } => &[
                Status::Activity(ActivityStatus::Active),
                Status::Activity(ActivityStatus::Inactive),
            ],
            StatusRule::Payment { .. } => &[
                Status::Payment(PaymentStatus::Paid),
                Status::Payment(PaymentStatus::Pending),
                Status::Payment(PaymentStatus::Failed),
                Status::Payment(PaymentStatus::Refunded),
            ],
            StatusRule::Application { .. } => &[
                Status::Application(ApplicationStatus::Submitted),
                Status::Application(ApplicationStatus::Processing),
                Status::Application(ApplicationStatus::Approved),
                Status::Application(ApplicationStatus::Rejected),
            ],
        }
    }
}

impl ScheduleRule {
    pub fn derive(&self, record: &Value, now: DateTime<FixedOffset>) -> ScheduleStatus {
        let offset = *now.offset();
        let Some(start) = lookup(record, self.start).and_then(|v| parse_when(v, offset)) else {
            return ScheduleStatus::Upcoming;
        };
        let end = self
            .end
            .and_then(|f| lookup(record, f))
            .and_then(|v| parse_when(v, offset))
            .unwrap_or(start)
            .end_of_range();

        let window = self
            .hours
            .and_then(|f| lookup(record, f))
            .and_then(Value::as_str)
            .and_then(TimeWindow::parse);
        let days = self
            .days
            .and_then(|f| lookup(record, f))
            .and_then(DaySet::parse)
            .unwrap_or(DaySet::ALL);

        schedule_status(start.at, end, window, days, now)
    }
}

/// `now < start` is Upcoming, `now > end` is Done, anything between is
/// Ongoing. With a daily window, the range only counts as Ongoing inside the
/// window on an allowed day; after the final day's window it is Done.
pub fn schedule_status(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    window: Option<TimeWindow>,
    days: DaySet,
    now: DateTime<FixedOffset>,
) -> ScheduleStatus {
    if now < start {
        return ScheduleStatus::Upcoming;
    }
    if now > end {
        return ScheduleStatus::Done;
    }

    let Some(window) = window else {
        return ScheduleStatus::Ongoing;
    };

    let local = now.with_timezone(end.offset());
    let t = local.time();
    if days.contains(local.weekday()) && window.contains(t) {
        ScheduleStatus::Ongoing
    } else if local.date_naive() == end.date_naive() && window.is_past(t) {
        ScheduleStatus::Done
    } else {
        ScheduleStatus::Upcoming
    }
}

fn payment_status(raw: &str) -> Option<PaymentStatus> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "paid" | "success" | "succeeded" | "completed" | "captured" => Some(PaymentStatus::Paid),
        "pending" | "created" | "processing" | "unpaid" => Some(PaymentStatus::Pending),
        "failed" | "cancelled" | "canceled" | "declined" => Some(PaymentStatus::Failed),
        "refunded" | "refund" => Some(PaymentStatus::Refunded),
        _ => None,
    }
}

fn application_status(raw: &str) -> Option<ApplicationStatus> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "submitted" | "new" | "received" => Some(ApplicationStatus::Submitted),
        "processing" | "in_review" | "in review" | "under review" | "pending" => {
            Some(ApplicationStatus::Processing)
        }
        "approved" | "granted" | "issued" => Some(ApplicationStatus::Approved),
        "rejected" | "denied" | "declined" => Some(ApplicationStatus::Rejected),
        _ => None,
    }
}
