//! Multi-channel auto-reply trigger evaluation engine.
//!
//! Given an inbound webhook message, a bot's auto-reply rules, its
//! business-hour table, and its timezone, [`selector::select`] deterministically
//! picks the single highest-priority rule that should fire, or concludes that
//! none applies. See the module docs below for the four-tier priority
//! lattice this crate implements.
//!
//! The selection path (`select`, `schedule_matches`, `matches_keyword_set`,
//! `time_in_range`) never panics and never returns an `Err` — "no match" is
//! a regular outcome, not a failure. The one fallible boundary is [`wire`],
//! which converts external JSON into the domain types everything else
//! operates on.

pub mod classifier;
pub mod model;
pub mod schedule;
pub mod selector;
pub mod text;
pub mod time_range;
pub mod validation;
pub mod wire;

pub use classifier::{classify, Tier};
pub use model::{
    BusinessHourRow, ChannelAggregate, ChannelType, DateRange, EventKind, IsoWeekday,
    MonthlyWindow, Rule, RuleStatus, Schedule, TimeOfDay, TimeWindow, WebhookEvent,
};
pub use schedule::schedule_matches;
pub use selector::{select, SelectionResult};
pub use text::{matches_keyword_set, normalize};
pub use time_range::time_in_range;
pub use validation::{validate_rules, ValidationWarning};
pub use wire::{WireChannelAggregate, WireError, WireRule, WireWebhookEvent};
