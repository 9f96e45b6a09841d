//! Domain types the selection algorithm operates on.
//!
//! These are intentionally decoupled from the serde-mirrored wire shapes in
//! [`crate::wire`] — persistence and transport concerns never leak into the
//! types `select` actually pattern-matches on.

use chrono::{DateTime, Utc};

/// Lifecycle status of a [`Rule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStatus {
    Active,
    Inactive,
    Archived,
}

/// A single `HH:MM` local time-of-day, stored as minutes since midnight.
///
/// Using minutes (rather than `chrono::NaiveTime`) keeps the degenerate
/// `start == end` "always-on" window (§4.B) a plain integer comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { minutes: 0 };

    /// Builds a time-of-day from hour/minute. Returns `None` for anything
    /// outside `00:00..23:59` (§6 — `24:00` is not valid).
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            minutes: hour as u16 * 60 + minute as u16,
        })
    }

    /// Parses an `HH:MM` literal. Returns `None` on any malformed input —
    /// callers treat that as "this window fails to match" (§7), never as a
    /// hard error.
    pub fn parse(s: &str) -> Option<Self> {
        let (h, m) = s.split_once(':')?;
        let hour: u8 = h.parse().ok()?;
        let minute: u8 = m.parse().ok()?;
        Self::new(hour, minute)
    }

    pub fn minutes_since_midnight(self) -> u16 {
        self.minutes
    }

    pub fn from_chrono(t: chrono::NaiveTime) -> Self {
        use chrono::Timelike;
        Self {
            minutes: (t.hour() * 60 + t.minute()) as u16,
        }
    }
}

/// Monday=1 … Sunday=7, per §3/§4.C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IsoWeekday(u8);

impl IsoWeekday {
    pub fn new(n: u8) -> Option<Self> {
        if (1..=7).contains(&n) {
            Some(Self(n))
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn from_chrono(weekday: chrono::Weekday) -> Self {
        use chrono::Weekday as W;
        let n = match weekday {
            W::Mon => 1,
            W::Tue => 2,
            W::Wed => 3,
            W::Thu => 4,
            W::Fri => 5,
            W::Sat => 6,
            W::Sun => 7,
        };
        Self(n)
    }
}

/// One `[start, end)` window within a single day (§4.B).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// A `Monthly` schedule entry: a day-of-month plus a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyWindow {
    pub day: u8,
    pub window: TimeWindow,
}

/// An inclusive local calendar date range, `YYYY-MM-DD` on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

/// The schedule tagged union (§3, §4.C). One case per wire `schedule_type`.
#[derive(Debug, Clone, PartialEq)]
pub enum Schedule {
    Daily(Vec<TimeWindow>),
    Monthly(Vec<MonthlyWindow>),
    BusinessHour,
    NonBusinessHour,
    DateRange(Vec<DateRange>),
}

impl Schedule {
    /// The schedule-kind used to break ties within Tier 4 (§4.D):
    /// `Monthly > DateRange > BusinessHour > NonBusinessHour > Daily`.
    /// Lower returned value sorts first (wins ties).
    pub(crate) fn tier4_rank(&self) -> u8 {
        match self {
            Schedule::Monthly(_) => 0,
            Schedule::DateRange(_) => 1,
            Schedule::BusinessHour => 2,
            Schedule::NonBusinessHour => 3,
            Schedule::Daily(_) => 4,
        }
    }
}

/// A single business-hour row: `{weekday, start, end}` (§3, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHourRow {
    pub weekday: IsoWeekday,
    pub window: TimeWindow,
}

/// A single auto-reply configuration (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: i64,
    pub organization_id: i64,
    pub bot_id: i64,
    pub name: String,
    pub status: RuleStatus,
    pub enabled: bool,
    pub priority: i32,
    pub keywords: Vec<String>,
    pub story_ids: Vec<String>,
    pub schedule: Option<Schedule>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rule {
    /// Active ∧ enabled is the only firing-eligible state (§3).
    pub fn is_firing_eligible(&self) -> bool {
        self.status == RuleStatus::Active && self.enabled
    }

    pub fn is_story_scoped(&self) -> bool {
        !self.story_ids.is_empty()
    }

    pub fn has_keywords(&self) -> bool {
        !self.keywords.is_empty()
    }
}

/// The channel a bot is wired to (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    Line,
    Facebook,
    Instagram,
}

/// Per-bot, read-only bundle presented to one evaluation (§3).
#[derive(Debug, Clone)]
pub struct ChannelAggregate {
    pub bot_id: i64,
    pub channel_type: ChannelType,
    /// IANA timezone name. Empty/unparseable falls back to UTC at
    /// evaluation time (§4.C) — this field is not pre-validated.
    pub timezone: String,
    pub rules: Vec<Rule>,
    pub business_hours: Vec<BusinessHourRow>,
}

/// Only `Message` participates in trigger evaluation (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Message,
    Other,
}

/// The inbound webhook event (§3).
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    pub event_kind: EventKind,
    pub message_text: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub channel_type: ChannelType,
    pub story_id: Option<String>,
}
