//! Aggregate selector (§4.E): the entry point that ties the classifier,
//! keyword matcher, and schedule evaluator together into one decision.

use crate::classifier::{classify, Tier};
use crate::model::{ChannelAggregate, EventKind, Rule, Schedule, WebhookEvent};
use crate::schedule::schedule_matches;
use crate::text::matches_keyword_set;

/// The outcome of one evaluation (§3 "Selection Result").
///
/// `tier` is informational only — telemetry, not a confidence score
/// (§3) — and callers MUST NOT branch on it beyond logging/metrics.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionResult {
    Matched {
        rule_id: i64,
        tier: Tier,
    },
    NoMatch {
        reason: &'static str,
    },
}

impl SelectionResult {
    pub fn matched_rule_id(&self) -> Option<i64> {
        match self {
            SelectionResult::Matched { rule_id, .. } => Some(*rule_id),
            SelectionResult::NoMatch { .. } => None,
        }
    }
}

/// Classified, firing-eligible candidate awaiting its event-predicate.
struct Candidate<'a> {
    rule: &'a Rule,
    tier: Tier,
}

/// Decides which rule, if any, should fire for `event` against `aggregate`
/// (§4.E). Never panics, never returns an error — "no-match" is a regular,
/// expected outcome carrying a short diagnostic reason (§7).
pub fn select(aggregate: &ChannelAggregate, event: &WebhookEvent) -> SelectionResult {
    if event.event_kind != EventKind::Message {
        tracing::debug!("event is not a message, skipping selection");
        return SelectionResult::NoMatch {
            reason: "event is not a message",
        };
    }

    if aggregate.rules.is_empty() {
        return SelectionResult::NoMatch {
            reason: "bot has no configured rules",
        };
    }

    let candidates: Vec<Candidate> = aggregate
        .rules
        .iter()
        .filter(|r| r.is_firing_eligible())
        .filter_map(|rule| classify(rule).map(|tier| Candidate { rule, tier }))
        .collect();

    if candidates.is_empty() {
        return SelectionResult::NoMatch {
            reason: "no active, enabled, classifiable rules",
        };
    }

    for tier in [
        Tier::StoryKeyword,
        Tier::StorySchedule,
        Tier::GeneralKeyword,
        Tier::GeneralSchedule,
    ] {
        let mut tier_candidates: Vec<&Candidate> =
            candidates.iter().filter(|c| c.tier == tier).collect();
        if tier_candidates.is_empty() {
            continue;
        }

        sort_tier(tier, &mut tier_candidates);

        tracing::debug!(?tier, count = tier_candidates.len(), "evaluating tier");

        for candidate in tier_candidates {
            if event_predicate_holds(candidate.rule, tier, aggregate, event) {
                return SelectionResult::Matched {
                    rule_id: candidate.rule.id,
                    tier,
                };
            }
        }
    }

    SelectionResult::NoMatch {
        reason: "no rule's predicate matched the event",
    }
}

/// Sorts candidates within a tier by the tie-break order in §4.D: Tiers 1-3
/// break ties purely by `priority` descending; Tier 4 first breaks ties by
/// schedule-kind rank, then by `priority` descending, then stably by rule id.
fn sort_tier(tier: Tier, candidates: &mut [&Candidate]) {
    match tier {
        Tier::GeneralSchedule => {
            candidates.sort_by(|a, b| {
                let rank_a = a.rule.schedule.as_ref().map(Schedule::tier4_rank).unwrap_or(u8::MAX);
                let rank_b = b.rule.schedule.as_ref().map(Schedule::tier4_rank).unwrap_or(u8::MAX);
                rank_a
                    .cmp(&rank_b)
                    .then(b.rule.priority.cmp(&a.rule.priority))
                    .then(a.rule.id.cmp(&b.rule.id))
            });
        }
        Tier::StoryKeyword | Tier::StorySchedule | Tier::GeneralKeyword => {
            candidates.sort_by(|a, b| {
                b.rule
                    .priority
                    .cmp(&a.rule.priority)
                    .then(a.rule.id.cmp(&b.rule.id))
            });
        }
    }
}

/// The event-side predicate for a classified candidate (§4.D "Predicate on
/// event" column), including the exclusion law (§4.E): story-scoped tiers
/// never fire without a matching `story_id` on the event.
fn event_predicate_holds(
    rule: &Rule,
    tier: Tier,
    aggregate: &ChannelAggregate,
    event: &WebhookEvent,
) -> bool {
    match tier {
        Tier::StoryKeyword => {
            story_id_matches(rule, event)
                && event
                    .message_text
                    .as_deref()
                    .map(|text| matches_keyword_set(text, &rule.keywords))
                    .unwrap_or(false)
        }
        Tier::StorySchedule => {
            story_id_matches(rule, event)
                && rule
                    .schedule
                    .as_ref()
                    .map(|s| schedule_matches(s, event.timestamp, &aggregate.timezone, &aggregate.business_hours))
                    .unwrap_or(false)
        }
        Tier::GeneralKeyword => event
            .message_text
            .as_deref()
            .map(|text| matches_keyword_set(text, &rule.keywords))
            .unwrap_or(false),
        Tier::GeneralSchedule => rule
            .schedule
            .as_ref()
            .map(|s| schedule_matches(s, event.timestamp, &aggregate.timezone, &aggregate.business_hours))
            .unwrap_or(false),
    }
}

fn story_id_matches(rule: &Rule, event: &WebhookEvent) -> bool {
    match &event.story_id {
        Some(id) => rule.story_ids.iter().any(|s| s == id),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BusinessHourRow, ChannelType, IsoWeekday, MonthlyWindow, RuleStatus, TimeOfDay, TimeWindow,
    };
    use chrono::{DateTime, TimeZone, Utc};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn tod(h: u8, m: u8) -> TimeOfDay {
        TimeOfDay::new(h, m).unwrap()
    }

    fn window(sh: u8, sm: u8, eh: u8, em: u8) -> TimeWindow {
        TimeWindow {
            start: tod(sh, sm),
            end: tod(eh, em),
        }
    }

    fn base_rule(id: i64) -> Rule {
        Rule {
            id,
            organization_id: 1,
            bot_id: 1,
            name: format!("r{id}"),
            status: RuleStatus::Active,
            enabled: true,
            priority: 0,
            keywords: vec![],
            story_ids: vec![],
            schedule: None,
            created_at: utc(2024, 1, 1, 0, 0),
            updated_at: utc(2024, 1, 1, 0, 0),
        }
    }

    fn aggregate(rules: Vec<Rule>) -> ChannelAggregate {
        ChannelAggregate {
            bot_id: 1,
            channel_type: ChannelType::Line,
            timezone: "Asia/Taipei".to_string(),
            rules,
            business_hours: vec![],
        }
    }

    fn message_event(text: &str, ts: DateTime<Utc>, story_id: Option<&str>) -> WebhookEvent {
        WebhookEvent {
            event_kind: EventKind::Message,
            message_text: Some(text.to_string()),
            timestamp: ts,
            channel_type: ChannelType::Line,
            story_id: story_id.map(str::to_string),
        }
    }

    #[test]
    fn s1_keyword_beats_schedule_in_general_tier() {
        let mut r1 = base_rule(1);
        r1.keywords = vec!["hello".into()];
        r1.priority = 5;

        let mut r2 = base_rule(2);
        r2.schedule = Some(Schedule::Daily(vec![window(9, 0, 17, 0)]));
        r2.priority = 10;

        let agg = aggregate(vec![r1, r2]);
        // 2024-07-01T06:00:00Z is 14:00 in Asia/Taipei.
        let event = message_event("hello", utc(2024, 7, 1, 6, 0), None);

        assert_eq!(
            select(&agg, &event),
            SelectionResult::Matched {
                rule_id: 1,
                tier: Tier::GeneralKeyword
            }
        );
    }

    #[test]
    fn s2_story_keyword_beats_general_keyword() {
        let mut r1 = base_rule(1);
        r1.story_ids = vec!["s1".into()];
        r1.keywords = vec!["hi".into()];

        let mut r2 = base_rule(2);
        r2.keywords = vec!["hi".into()];

        let agg = aggregate(vec![r1, r2]);
        let event = message_event("HI", utc(2024, 1, 1, 0, 0), Some("s1"));

        assert_eq!(
            select(&agg, &event),
            SelectionResult::Matched {
                rule_id: 1,
                tier: Tier::StoryKeyword
            }
        );
    }

    #[test]
    fn s3_story_exclusion() {
        let mut r1 = base_rule(1);
        r1.story_ids = vec!["s1".into()];
        r1.keywords = vec!["hi".into()];

        let agg = aggregate(vec![r1]);
        let event = message_event("hi", utc(2024, 1, 1, 0, 0), None);

        assert!(matches!(select(&agg, &event), SelectionResult::NoMatch { .. }));
    }

    #[test]
    fn s6_partial_keyword_rejection() {
        let mut r1 = base_rule(1);
        r1.keywords = vec!["hello".into()];
        let agg = aggregate(vec![r1]);

        for (text, expect_match) in [
            ("hello world", false),
            ("say hello", false),
            ("helo", false),
            ("HELLO", true),
            ("  hello  ", true),
            ("hello", true),
        ] {
            let event = message_event(text, utc(2024, 1, 1, 0, 0), None);
            let got = matches!(select(&agg, &event), SelectionResult::Matched { .. });
            assert_eq!(got, expect_match, "text={text:?}");
        }
    }

    #[test]
    fn non_message_events_never_match() {
        let mut r1 = base_rule(1);
        r1.keywords = vec!["hi".into()];
        let agg = aggregate(vec![r1]);
        let event = WebhookEvent {
            event_kind: EventKind::Other,
            message_text: Some("hi".into()),
            timestamp: utc(2024, 1, 1, 0, 0),
            channel_type: ChannelType::Line,
            story_id: None,
        };
        assert!(matches!(select(&agg, &event), SelectionResult::NoMatch { .. }));
    }

    #[test]
    fn inactive_or_disabled_rules_never_fire() {
        let mut r1 = base_rule(1);
        r1.keywords = vec!["hi".into()];
        r1.status = RuleStatus::Inactive;

        let mut r2 = base_rule(2);
        r2.keywords = vec!["hi".into()];
        r2.enabled = false;

        let mut r3 = base_rule(3);
        r3.keywords = vec!["hi".into()];
        r3.status = RuleStatus::Archived;

        let agg = aggregate(vec![r1, r2, r3]);
        let event = message_event("hi", utc(2024, 1, 1, 0, 0), None);
        assert!(matches!(select(&agg, &event), SelectionResult::NoMatch { .. }));
    }

    #[test]
    fn rule_with_keywords_and_schedule_is_keyword_only() {
        let mut r1 = base_rule(1);
        r1.keywords = vec!["hi".into()];
        // A schedule that would never match — proves the schedule is ignored
        // entirely, not merely de-prioritized, once keywords are present.
        r1.schedule = Some(Schedule::Daily(vec![window(3, 0, 3, 1)]));

        let agg = aggregate(vec![r1]);
        let event = message_event("hi", utc(2024, 1, 1, 12, 0), None);
        assert_eq!(
            select(&agg, &event),
            SelectionResult::Matched {
                rule_id: 1,
                tier: Tier::GeneralKeyword
            }
        );
    }

    #[test]
    fn tier4_schedule_kind_tie_break_monthly_before_daily() {
        let mut daily = base_rule(1);
        daily.schedule = Some(Schedule::Daily(vec![window(0, 0, 23, 59)]));
        daily.priority = 100;

        let mut monthly = base_rule(2);
        monthly.schedule = Some(Schedule::Monthly(vec![MonthlyWindow {
            day: 1,
            window: window(0, 0, 23, 59),
        }]));
        monthly.priority = 0;

        let agg = aggregate(vec![daily, monthly]);
        let event = message_event("", utc(2024, 1, 1, 3, 0), None);
        assert_eq!(
            select(&agg, &event),
            SelectionResult::Matched {
                rule_id: 2,
                tier: Tier::GeneralSchedule
            }
        );
    }

    #[test]
    fn tier4_priority_breaks_ties_within_same_schedule_kind() {
        let mut low = base_rule(1);
        low.schedule = Some(Schedule::BusinessHour);
        low.priority = 1;

        let mut high = base_rule(2);
        high.schedule = Some(Schedule::BusinessHour);
        high.priority = 10;

        let mut agg = aggregate(vec![low, high]);
        agg.business_hours = vec![BusinessHourRow {
            weekday: IsoWeekday::new(1).unwrap(),
            window: window(0, 0, 23, 59),
        }];
        // 2024-01-01 is a Monday.
        let event = message_event("", utc(2024, 1, 1, 3, 0), None);
        assert_eq!(
            select(&agg, &event),
            SelectionResult::Matched {
                rule_id: 2,
                tier: Tier::GeneralSchedule
            }
        );
    }

    #[test]
    fn no_rules_is_a_diagnostic_no_match() {
        let agg = aggregate(vec![]);
        let event = message_event("hi", utc(2024, 1, 1, 0, 0), None);
        assert_eq!(
            select(&agg, &event),
            SelectionResult::NoMatch {
                reason: "bot has no configured rules"
            }
        );
    }

    #[test]
    fn determinism_property() {
        let mut r1 = base_rule(1);
        r1.keywords = vec!["hi".into()];
        let agg = aggregate(vec![r1]);
        let event = message_event("hi", utc(2024, 1, 1, 0, 0), None);
        let first = select(&agg, &event);
        let second = select(&agg, &event);
        assert_eq!(first, second);
    }
}
