//! Applying a rule set to a parsed catalog

use super::rules::RuleSet;
use super::{Notice, PatchPhase};
use crate::formats::mo::Catalog;
use std::collections::HashSet;

/// What [`apply_rules`] changed
#[derive(Debug, Clone, Default)]
pub struct EngineOutcome {
    /// Ids whose translation was transformed, in catalog order
    pub patched: Vec<String>,
    /// Enabled rule ids that matched no entry, sorted
    pub unmatched_rules: Vec<String>,
    pub notices: Vec<Notice>,
}

/// Apply every enabled rule to its entry, in place.
///
/// The header entry is never transformed, even if a rule targets `""`. If an
/// id occurs more than once, only its first occurrence is transformed.
pub fn apply_rules(catalog: &mut Catalog, rules: &RuleSet<'_>) -> EngineOutcome {
    let mut outcome = EngineOutcome::default();
    let mut patched_ids: HashSet<String> = HashSet::new();

    if rules.get("").is_some() {
        tracing::warn!("Ignoring rule targeting the catalog header");
        outcome.notices.push(Notice::HeaderRuleIgnored);
    }
    for id in rules.shadowed() {
        outcome.notices.push(Notice::ShadowedRule {
            target_id: id.clone(),
        });
    }

    for entry in &mut catalog.entries {
        if entry.is_header() {
            continue;
        }
        let Some(rule) = rules.get(&entry.original) else {
            continue;
        };
        if patched_ids.contains(&entry.original) {
            tracing::warn!(
                "Duplicate catalog entry {:?}, leaving later occurrence untouched",
                entry.original
            );
            outcome.notices.push(Notice::DuplicatePolicyApplied {
                original: entry.original.clone(),
                phase: PatchPhase::ApplyingRules,
            });
            continue;
        }

        entry.translated = rule.apply(&entry.translated);
        patched_ids.insert(entry.original.clone());
        outcome.patched.push(entry.original.clone());
    }

    outcome.unmatched_rules = rules
        .ids()
        .filter(|id| !id.is_empty() && !patched_ids.contains(*id))
        .map(str::to_string)
        .collect();
    outcome.unmatched_rules.sort();

    tracing::debug!(
        "Applied {} of {} rules ({} unmatched)",
        outcome.patched.len(),
        rules.len(),
        outcome.unmatched_rules.len()
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::super::rules::OverrideRule;
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Catalog {
        Catalog::from_pairs([("", "meta"), ("IDS_X", "Old"), ("IDS_X_DESCR", "Desc")])
    }

    fn translation<'a>(catalog: &'a Catalog, id: &str) -> &'a str {
        &catalog.get(id).unwrap().translated
    }

    #[test]
    fn test_selective_update() {
        let mut catalog = sample();
        let rules = vec![OverrideRule::new("IDS_X", |_| "New".to_string())];
        let outcome = apply_rules(&mut catalog, &RuleSet::new(&rules));

        assert_eq!(translation(&catalog, "IDS_X"), "New");
        assert_eq!(translation(&catalog, "IDS_X_DESCR"), "Desc");
        assert_eq!(translation(&catalog, ""), "meta");
        assert_eq!(outcome.patched, vec!["IDS_X".to_string()]);
        assert!(outcome.notices.is_empty());
    }

    #[test]
    fn test_disabled_rule_is_noop() {
        let mut catalog = sample();
        let rules = vec![OverrideRule::replace("IDS_X", "New").with_enabled(false)];
        let outcome = apply_rules(&mut catalog, &RuleSet::new(&rules));

        assert_eq!(catalog.entries, sample().entries);
        assert!(outcome.patched.is_empty());
        assert!(outcome.unmatched_rules.is_empty());
    }

    #[test]
    fn test_header_immunity() {
        let mut catalog = sample();
        let rules = vec![
            OverrideRule::replace("", "Content-Type: text/plain; charset=CP1252\n"),
            OverrideRule::replace("IDS_X", "New"),
        ];
        let outcome = apply_rules(&mut catalog, &RuleSet::new(&rules));

        assert_eq!(translation(&catalog, ""), "meta");
        assert_eq!(translation(&catalog, "IDS_X"), "New");
        assert_eq!(outcome.notices, vec![Notice::HeaderRuleIgnored]);
        // The header rule is not reported as unmatched either
        assert!(outcome.unmatched_rules.is_empty());
    }

    #[test]
    fn test_unmatched_rules_reported() {
        let mut catalog = sample();
        let rules = vec![
            OverrideRule::replace("IDS_NOT_THERE", "x"),
            OverrideRule::replace("IDS_ALSO_MISSING", "y"),
        ];
        let outcome = apply_rules(&mut catalog, &RuleSet::new(&rules));
        assert_eq!(catalog.entries, sample().entries);
        assert_eq!(
            outcome.unmatched_rules,
            vec!["IDS_ALSO_MISSING".to_string(), "IDS_NOT_THERE".to_string()]
        );
    }

    #[test]
    fn test_duplicate_only_first_patched() {
        let mut catalog = Catalog::from_pairs([
            ("IDS_DUP", "one"),
            ("IDS_OTHER", "other"),
            ("IDS_DUP", "two"),
        ]);
        let rules = vec![OverrideRule::prepend("IDS_DUP", "* ")];
        let outcome = apply_rules(&mut catalog, &RuleSet::new(&rules));

        assert_eq!(catalog.entries[0].translated, "* one");
        assert_eq!(catalog.entries[2].translated, "two");
        assert_eq!(
            outcome.notices,
            vec![Notice::DuplicatePolicyApplied {
                original: "IDS_DUP".to_string(),
                phase: PatchPhase::ApplyingRules,
            }]
        );
    }

    #[test]
    fn test_entries_without_rules_pass_through() {
        let mut catalog = sample();
        let outcome = apply_rules(&mut catalog, &RuleSet::new(&[]));
        assert_eq!(catalog.entries, sample().entries);
        assert!(outcome.patched.is_empty());
    }
}
