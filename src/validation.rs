//! Configuration validation (§4.H): a pure, admin-time predicate over a rule
//! set. Never runs during `select` and never blocks evaluation — it only
//! produces warnings for the admin/write-time caller to surface.

use std::collections::HashMap;

use crate::classifier::{classify, Tier};
use crate::model::Rule;
use crate::text::normalize;

/// One structural or cross-rule concern flagged by [`validate_rules`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// A rule populates neither `keywords` nor `schedule` — it can never be
    /// classified into a tier and will never fire (§3 invariant).
    EmptyTriggerShape { rule_id: i64 },
    /// A rule has `story_ids` but is missing both keywords and schedule,
    /// same root cause as above but called out separately since it is the
    /// more surprising of the two to an admin authoring story-scoped rules.
    StoryScopedWithoutTriggerShape { rule_id: i64 },
    /// The same normalized keyword appears on rules in two different tiers
    /// within the same bot — the lower-numbered tier's rule always wins,
    /// so the higher-tier rule is silently unreachable for that keyword.
    KeywordShadowedAcrossTiers {
        keyword: String,
        shadowing_rule_id: i64,
        shadowing_tier: Tier,
        shadowed_rule_id: i64,
        shadowed_tier: Tier,
    },
}

/// Validates a bot's rule set and returns every warning found. Pure:
/// identical input always yields identical, order-stable output (§8.8).
pub fn validate_rules(rules: &[Rule]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for rule in rules {
        if !rule.has_keywords() && rule.schedule.is_none() {
            if rule.is_story_scoped() {
                warnings.push(ValidationWarning::StoryScopedWithoutTriggerShape { rule_id: rule.id });
            } else {
                warnings.push(ValidationWarning::EmptyTriggerShape { rule_id: rule.id });
            }
        }
    }

    warnings.extend(keyword_shadow_warnings(rules));
    warnings
}

/// For every normalized keyword, find the firing-eligible rules carrying it
/// and flag any pair whose tiers differ — the lower tier number always wins
/// at selection time (§4.E), so the other rule is unreachable under that
/// keyword.
fn keyword_shadow_warnings(rules: &[Rule]) -> Vec<ValidationWarning> {
    let mut by_keyword: HashMap<String, Vec<(&Rule, Tier)>> = HashMap::new();

    for rule in rules {
        if !rule.is_firing_eligible() {
            continue;
        }
        let Some(tier) = classify(rule) else {
            continue;
        };
        if !rule.has_keywords() {
            continue;
        }
        for keyword in &rule.keywords {
            let normalized = normalize(keyword);
            if normalized.is_empty() {
                continue;
            }
            by_keyword.entry(normalized).or_default().push((rule, tier));
        }
    }

    let mut warnings = Vec::new();
    for (keyword, mut entries) in by_keyword {
        entries.sort_by_key(|(r, tier)| (*tier, r.id));
        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                let (rule_a, tier_a) = entries[i];
                let (rule_b, tier_b) = entries[j];
                if tier_a != tier_b {
                    warnings.push(ValidationWarning::KeywordShadowedAcrossTiers {
                        keyword: keyword.clone(),
                        shadowing_rule_id: rule_a.id,
                        shadowing_tier: tier_a,
                        shadowed_rule_id: rule_b.id,
                        shadowed_tier: tier_b,
                    });
                }
            }
        }
    }
    warnings.sort_by_key(|w| match w {
        ValidationWarning::EmptyTriggerShape { rule_id } => (*rule_id, 0, String::new()),
        ValidationWarning::StoryScopedWithoutTriggerShape { rule_id } => (*rule_id, 1, String::new()),
        ValidationWarning::KeywordShadowedAcrossTiers {
            shadowing_rule_id,
            keyword,
            ..
        } => (*shadowing_rule_id, 2, keyword.clone()),
    });
    warnings
}
