//! Wire format & serialization (§3.I, §4.I — ambient, added).
//!
//! Plain `serde`-derived structs mirroring the external JSON shapes of §6,
//! living alongside (not inside) the domain types in [`crate::model`]. This
//! is the one boundary in the crate allowed to fail with a real,
//! named error (§7) — everything downstream of a successfully constructed
//! [`crate::model::Rule`] / [`crate::model::ChannelAggregate`] is infallible.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    BusinessHourRow, ChannelAggregate, ChannelType, DateRange, EventKind, IsoWeekday,
    MonthlyWindow, Rule, RuleStatus, Schedule, TimeOfDay, TimeWindow, WebhookEvent,
};

/// Everything that can go wrong converting persisted/wire JSON into the
/// domain types this crate's algorithm operates on.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed time-of-day literal {0:?} (expected HH:MM, 00:00..23:59)")]
    BadTimeOfDay(String),
    #[error("malformed date literal {0:?} (expected YYYY-MM-DD)")]
    BadDate(String),
    #[error("weekday {0} out of range (expected 1..7, Monday=1)")]
    BadWeekday(u8),
    #[error("unknown schedule_type {0:?}")]
    UnknownScheduleType(String),
    #[error("rule {rule_id} declares schedule_type {schedule_type:?} but is missing schedule_settings")]
    MissingScheduleSettings { rule_id: i64, schedule_type: String },
    #[error("rule {rule_id}'s {schedule_type} schedule has no entries in schedule_settings.schedules")]
    EmptyScheduleEntries { rule_id: i64, schedule_type: String },
    #[error("unknown status {0:?} (expected active|inactive|archived)")]
    UnknownStatus(String),
    #[error("unknown channel_type {0:?} (expected LINE|FB|IG)")]
    UnknownChannelType(String),
    #[error("unknown event_type {0:?}")]
    UnknownEventType(String),
}

fn parse_time_of_day(s: &str) -> Result<TimeOfDay, WireError> {
    TimeOfDay::parse(s).ok_or_else(|| WireError::BadTimeOfDay(s.to_string()))
}

fn parse_date(s: &str) -> Result<NaiveDate, WireError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| WireError::BadDate(s.to_string()))
}

// --- Rule wire shape -------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRuleStatus {
    Active,
    Inactive,
    Archived,
}

impl From<WireRuleStatus> for RuleStatus {
    fn from(s: WireRuleStatus) -> Self {
        match s {
            WireRuleStatus::Active => RuleStatus::Active,
            WireRuleStatus::Inactive => RuleStatus::Inactive,
            WireRuleStatus::Archived => RuleStatus::Archived,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireDailyEntry {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMonthlyEntry {
    pub day: u8,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireDateRangeEntry {
    pub start_date: String,
    pub end_date: String,
}

/// The `schedule_settings.schedules` array is variant-specific (§6); we
/// decode it as loosely-typed JSON and interpret its shape against
/// `schedule_type`, since the wire format does not carry an internal tag
/// per array entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WireScheduleSettings {
    #[serde(default)]
    pub schedules: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRule {
    pub id: i64,
    pub organization_id: i64,
    pub bot_id: i64,
    pub name: String,
    pub status: WireRuleStatus,
    pub enabled: bool,
    pub priority: i32,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub story_ids: Vec<String>,
    #[serde(default)]
    pub schedule_type: Option<String>,
    #[serde(default)]
    pub schedule_settings: Option<WireScheduleSettings>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<WireRule> for Rule {
    type Error = WireError;

    fn try_from(w: WireRule) -> Result<Self, WireError> {
        let schedule = match &w.schedule_type {
            None => None,
            Some(kind) => Some(parse_schedule(w.id, kind, w.schedule_settings.as_ref())?),
        };

        Ok(Rule {
            id: w.id,
            organization_id: w.organization_id,
            bot_id: w.bot_id,
            name: w.name,
            status: w.status.into(),
            enabled: w.enabled,
            priority: w.priority,
            keywords: w.keywords,
            story_ids: w.story_ids,
            schedule,
            created_at: w.created_at,
            updated_at: w.updated_at,
        })
    }
}

fn parse_schedule(
    rule_id: i64,
    schedule_type: &str,
    settings: Option<&WireScheduleSettings>,
) -> Result<Schedule, WireError> {
    let entries = || -> Result<&[serde_json::Value], WireError> {
        settings
            .map(|s| s.schedules.as_slice())
            .ok_or_else(|| WireError::MissingScheduleSettings {
                rule_id,
                schedule_type: schedule_type.to_string(),
            })
    };

    match schedule_type {
        "daily" => {
            let raw = entries()?;
            if raw.is_empty() {
                return Err(WireError::EmptyScheduleEntries {
                    rule_id,
                    schedule_type: "daily".to_string(),
                });
            }
            let mut windows = Vec::with_capacity(raw.len());
            for value in raw {
                let entry: WireDailyEntry =
                    serde_json::from_value(value.clone()).map_err(|_| {
                        WireError::BadTimeOfDay(value.to_string())
                    })?;
                windows.push(TimeWindow {
                    start: parse_time_of_day(&entry.start_time)?,
                    end: parse_time_of_day(&entry.end_time)?,
                });
            }
            Ok(Schedule::Daily(windows))
        }
        "monthly" => {
            let raw = entries()?;
            if raw.is_empty() {
                return Err(WireError::EmptyScheduleEntries {
                    rule_id,
                    schedule_type: "monthly".to_string(),
                });
            }
            let mut out = Vec::with_capacity(raw.len());
            for value in raw {
                let entry: WireMonthlyEntry = serde_json::from_value(value.clone())
                    .map_err(|_| WireError::BadTimeOfDay(value.to_string()))?;
                out.push(MonthlyWindow {
                    day: entry.day,
                    window: TimeWindow {
                        start: parse_time_of_day(&entry.start_time)?,
                        end: parse_time_of_day(&entry.end_time)?,
                    },
                });
            }
            Ok(Schedule::Monthly(out))
        }
        "business_hour" => Ok(Schedule::BusinessHour),
        "non_business_hour" => Ok(Schedule::NonBusinessHour),
        "date_range" => {
            let raw = entries()?;
            if raw.is_empty() {
                return Err(WireError::EmptyScheduleEntries {
                    rule_id,
                    schedule_type: "date_range".to_string(),
                });
            }
            let mut ranges = Vec::with_capacity(raw.len());
            for value in raw {
                let entry: WireDateRangeEntry = serde_json::from_value(value.clone())
                    .map_err(|_| WireError::BadDate(value.to_string()))?;
                ranges.push(DateRange {
                    start: parse_date(&entry.start_date)?,
                    end: parse_date(&entry.end_date)?,
                });
            }
            Ok(Schedule::DateRange(ranges))
        }
        other => Err(WireError::UnknownScheduleType(other.to_string())),
    }
}

// --- Business hour row wire shape ------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireBusinessHourRow {
    pub weekday: u8,
    pub start_time: String,
    pub end_time: String,
}

impl TryFrom<WireBusinessHourRow> for BusinessHourRow {
    type Error = WireError;

    fn try_from(w: WireBusinessHourRow) -> Result<Self, WireError> {
        Ok(BusinessHourRow {
            weekday: IsoWeekday::new(w.weekday).ok_or(WireError::BadWeekday(w.weekday))?,
            window: TimeWindow {
                start: parse_time_of_day(&w.start_time)?,
                end: parse_time_of_day(&w.end_time)?,
            },
        })
    }
}

// --- Channel aggregate wire shape -------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WireChannelType {
    Line,
    Fb,
    Ig,
}

impl From<WireChannelType> for ChannelType {
    fn from(c: WireChannelType) -> Self {
        match c {
            WireChannelType::Line => ChannelType::Line,
            WireChannelType::Fb => ChannelType::Facebook,
            WireChannelType::Ig => ChannelType::Instagram,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireChannelAggregate {
    pub bot_id: i64,
    pub channel_type: WireChannelType,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub rules: Vec<WireRule>,
    #[serde(default)]
    pub business_hours: Vec<WireBusinessHourRow>,
}

impl TryFrom<WireChannelAggregate> for ChannelAggregate {
    type Error = WireError;

    fn try_from(w: WireChannelAggregate) -> Result<Self, WireError> {
        let rules = w
            .rules
            .into_iter()
            .map(Rule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let business_hours = w
            .business_hours
            .into_iter()
            .map(BusinessHourRow::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChannelAggregate {
            bot_id: w.bot_id,
            channel_type: w.channel_type.into(),
            timezone: w.timezone,
            rules,
            business_hours,
        })
    }
}

// --- Webhook event wire shape -----------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireEventType {
    Message,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireWebhookEvent {
    pub event_type: WireEventType,
    #[serde(default)]
    pub message_text: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub channel_type: WireChannelType,
    #[serde(default)]
    pub story_id: Option<String>,
}

impl From<WireWebhookEvent> for WebhookEvent {
    fn from(w: WireWebhookEvent) -> Self {
        WebhookEvent {
            event_kind: match w.event_type {
                WireEventType::Message => EventKind::Message,
                WireEventType::Other => EventKind::Other,
            },
            message_text: w.message_text,
            timestamp: w.timestamp,
            channel_type: w.channel_type.into(),
            story_id: w.story_id,
        }
    }
}
