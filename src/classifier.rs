//! Rule classifier (§4.D): tags each active, enabled rule with its priority
//! tier based on its shape, ahead of any event-specific predicate.

use crate::model::Rule;

/// The four selection tiers, ordered 1→4 (§4.D, GLOSSARY "Rule tier").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    StoryKeyword = 1,
    StorySchedule = 2,
    GeneralKeyword = 3,
    GeneralSchedule = 4,
}

impl Tier {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Classifies a single rule by its shape. Returns `None` if the rule does
/// not fit any tier's shape predicate (it is dropped from selection).
///
/// A rule with both `keywords` and `schedule` is resolved as keyword-only
/// (§4.D) — the schedule is never consulted for classification or
/// evaluation in that case.
pub fn classify(rule: &Rule) -> Option<Tier> {
    let story_scoped = rule.is_story_scoped();
    let has_keywords = rule.has_keywords();
    let has_schedule = rule.schedule.is_some();

    match (story_scoped, has_keywords, has_schedule) {
        (true, true, _) => Some(Tier::StoryKeyword),
        (true, false, true) => Some(Tier::StorySchedule),
        (false, true, _) => Some(Tier::GeneralKeyword),
        (false, false, true) => Some(Tier::GeneralSchedule),
        (_, false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RuleStatus, Schedule};
    use chrono::Utc;

    fn base_rule() -> Rule {
        Rule {
            id: 1,
            organization_id: 1,
            bot_id: 1,
            name: "r".into(),
            status: RuleStatus::Active,
            enabled: true,
            priority: 0,
            keywords: vec![],
            story_ids: vec![],
            schedule: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn story_plus_keywords_is_tier_1() {
        let mut r = base_rule();
        r.story_ids = vec!["s1".into()];
        r.keywords = vec!["hi".into()];
        assert_eq!(classify(&r), Some(Tier::StoryKeyword));
    }

    #[test]
    fn story_plus_schedule_no_keywords_is_tier_2() {
        let mut r = base_rule();
        r.story_ids = vec!["s1".into()];
        r.schedule = Some(Schedule::BusinessHour);
        assert_eq!(classify(&r), Some(Tier::StorySchedule));
    }

    #[test]
    fn story_plus_schedule_plus_keywords_is_tier_1_not_2() {
        let mut r = base_rule();
        r.story_ids = vec!["s1".into()];
        r.keywords = vec!["hi".into()];
        r.schedule = Some(Schedule::BusinessHour);
        assert_eq!(classify(&r), Some(Tier::StoryKeyword));
    }

    #[test]
    fn general_keywords_is_tier_3() {
        let mut r = base_rule();
        r.keywords = vec!["hi".into()];
        assert_eq!(classify(&r), Some(Tier::GeneralKeyword));
    }

    #[test]
    fn general_keywords_plus_schedule_is_still_tier_3() {
        let mut r = base_rule();
        r.keywords = vec!["hi".into()];
        r.schedule = Some(Schedule::BusinessHour);
        assert_eq!(classify(&r), Some(Tier::GeneralKeyword));
    }

    #[test]
    fn general_schedule_only_is_tier_4() {
        let mut r = base_rule();
        r.schedule = Some(Schedule::BusinessHour);
        assert_eq!(classify(&r), Some(Tier::GeneralSchedule));
    }

    #[test]
    fn neither_keywords_nor_schedule_is_unclassifiable() {
        let r = base_rule();
        assert_eq!(classify(&r), None);
    }

    #[test]
    fn story_ids_with_neither_keywords_nor_schedule_is_unclassifiable() {
        let mut r = base_rule();
        r.story_ids = vec!["s1".into()];
        assert_eq!(classify(&r), None);
    }

    #[test]
    fn tier_ordering_is_1_lt_2_lt_3_lt_4() {
        assert!(Tier::StoryKeyword < Tier::StorySchedule);
        assert!(Tier::StorySchedule < Tier::GeneralKeyword);
        assert!(Tier::GeneralKeyword < Tier::GeneralSchedule);
    }
}
