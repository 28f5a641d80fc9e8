//! Override rules and the id -> rule lookup built from them

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Boxed translation transform
pub type TransformFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Declarative text transforms, as written in patch plans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextTransform {
    /// Replace the translation entirely
    Replace(String),
    /// Insert text before the current translation
    Prepend(String),
    /// Add text after the current translation
    Append(String),
}

impl TextTransform {
    #[must_use]
    pub fn apply(&self, translated: &str) -> String {
        match self {
            TextTransform::Replace(text) => text.clone(),
            TextTransform::Prepend(prefix) => format!("{prefix}{translated}"),
            TextTransform::Append(suffix) => format!("{translated}{suffix}"),
        }
    }
}

/// Instruction to rewrite one entry's translation
pub struct OverrideRule {
    /// Message id this rule targets
    pub target_id: String,
    /// A disabled rule behaves as if it were absent
    pub enabled: bool,
    transform: TransformFn,
}

impl OverrideRule {
    /// Create an enabled rule with an arbitrary transform
    pub fn new<F>(target_id: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            target_id: target_id.into(),
            enabled: true,
            transform: Box::new(transform),
        }
    }

    /// Create an enabled rule from a declarative transform
    pub fn from_transform(target_id: impl Into<String>, transform: TextTransform) -> Self {
        Self::new(target_id, move |t| transform.apply(t))
    }

    pub fn replace(target_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::from_transform(target_id, TextTransform::Replace(text.into()))
    }

    pub fn prepend(target_id: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::from_transform(target_id, TextTransform::Prepend(prefix.into()))
    }

    pub fn append(target_id: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self::from_transform(target_id, TextTransform::Append(suffix.into()))
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Run the transform on a translation
    #[must_use]
    pub fn apply(&self, translated: &str) -> String {
        (self.transform)(translated)
    }
}

impl fmt::Debug for OverrideRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideRule")
            .field("target_id", &self.target_id)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Lookup from message id to its enabled rule
///
/// Built once per patch run. The first enabled rule for an id wins; later
/// enabled rules for the same id are recorded as shadowed.
#[derive(Debug)]
pub struct RuleSet<'a> {
    by_id: HashMap<&'a str, &'a OverrideRule>,
    shadowed: Vec<String>,
}

impl<'a> RuleSet<'a> {
    #[must_use]
    pub fn new(rules: &'a [OverrideRule]) -> Self {
        let mut by_id = HashMap::with_capacity(rules.len());
        let mut shadowed = Vec::new();
        for rule in rules.iter().filter(|r| r.enabled) {
            if by_id.contains_key(rule.target_id.as_str()) {
                let id = &rule.target_id;
                tracing::warn!("Rule for {id:?} is shadowed by an earlier rule");
                shadowed.push(rule.target_id.clone());
            } else {
                by_id.insert(rule.target_id.as_str(), rule);
            }
        }
        Self { by_id, shadowed }
    }

    /// The enabled rule for `id`, if any
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&'a OverrideRule> {
        self.by_id.get(id).copied()
    }

    /// Ids of enabled rules, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.by_id.keys().copied()
    }

    /// Ids of enabled rules that lost to an earlier rule for the same id
    #[must_use]
    pub fn shadowed(&self) -> &[String] {
        &self.shadowed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
