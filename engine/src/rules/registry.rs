// Site rule registry
//
// Ordered, immutable table of site rules. Built once at startup and handed to
// whoever needs it by reference; there is no global instance.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use super::{RuleError, SiteRule};
use crate::net::ParsedUrl;

/// Preference branch shared by every add-on setting
pub const PREF_BRANCH: &str = "extensions.imagezoom.";

/// Suffix of the per-site enable toggle, `<branch><key>.enable`
pub const PREF_ENABLE_SUFFIX: &str = ".enable";

/// Position of a rule in its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleIndex(usize);

impl RuleIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for RuleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SiteRuleRegistry {
    rules: Vec<SiteRule>,
}

impl SiteRuleRegistry {
    /// Build a registry from rules in priority order. Keys must be unique.
    pub fn from_rules(rules: Vec<SiteRule>) -> Result<Self, RuleError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.key()) {
                return Err(RuleError::DuplicateKey(rule.key().to_string()));
            }
        }

        debug!(rules = rules.len(), "site rule registry built");
        Ok(Self { rules })
    }

    /// The shipped table of supported sites
    pub fn builtin() -> Result<Self, RuleError> {
        Self::from_rules(super::sites::builtin_rules()?)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// `None` when `index` comes from a different, larger registry.
    pub fn get(&self, index: RuleIndex) -> Option<&SiteRule> {
        self.rules.get(index.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuleIndex, &SiteRule)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (RuleIndex(i), rule))
    }

    pub fn key_of(&self, index: RuleIndex) -> Option<&str> {
        self.get(index).map(SiteRule::key)
    }

    pub fn name_of(&self, index: RuleIndex) -> Option<&str> {
        self.get(index).map(SiteRule::display_name)
    }

    /// First rule whose host pattern matches `host`
    pub fn resolve_by_host(&self, host: &str) -> Option<RuleIndex> {
        let found = self.rules.iter().position(|rule| rule.matches_host(host));

        debug!(host, rule = found.map(|i| self.rules[i].key()), "resolve by host");
        found.map(RuleIndex)
    }

    /// Exact key lookup
    pub fn resolve_by_key(&self, key: &str) -> Option<RuleIndex> {
        self.rules.iter().position(|rule| rule.key() == key).map(RuleIndex)
    }

    /// Bind a document to a rule. Only http and https documents qualify.
    pub fn resolve_document(&self, document_url: &str) -> Option<RuleIndex> {
        let url = ParsedUrl::parse(document_url)?;
        if !url.is_http() {
            debug!(scheme = %url.scheme, "document scheme not eligible");
            return None;
        }
        self.resolve_by_host(&url.host_with_port())
    }

    /// Full name of the rule's enable preference
    pub fn preference_key(&self, index: RuleIndex) -> Option<String> {
        let key = self.key_of(index)?;
        Some(format!("{}{}{}", PREF_BRANCH, key, PREF_ENABLE_SUFFIX))
    }

    /// Rule whose enable toggle `pref_name` names, if any
    pub fn rule_for_preference(&self, pref_name: &str) -> Option<RuleIndex> {
        let key = pref_name
            .strip_prefix(PREF_BRANCH)?
            .strip_suffix(PREF_ENABLE_SUFFIX)?;
        self.resolve_by_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{ThumbnailFilter, ZoomTransform};

    fn rule(key: &str, host: &str) -> SiteRule {
        SiteRule::new(key, key, host, ThumbnailFilter::Any, ZoomTransform::identity()).unwrap()
    }

    #[test]
    fn test_first_host_match_wins() {
        let registry = SiteRuleRegistry::from_rules(vec![
            rule("maps", r"maps\.example\.com"),
            rule("example", r"example\.com"),
        ])
        .unwrap();

        assert_eq!(registry.resolve_by_host("maps.example.com"), Some(RuleIndex(0)));
        assert_eq!(registry.resolve_by_host("www.example.com"), Some(RuleIndex(1)));

        let reversed = SiteRuleRegistry::from_rules(vec![
            rule("example", r"example\.com"),
            rule("maps", r"maps\.example\.com"),
        ])
        .unwrap();
        let maps = reversed.resolve_by_host("maps.example.com").unwrap();
        assert_eq!(reversed.key_of(maps), Some("example"));
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let err = SiteRuleRegistry::from_rules(vec![rule("a", "a"), rule("a", "b")]).unwrap_err();
        assert!(matches!(err, RuleError::DuplicateKey(ref k) if k == "a"));
    }

    #[test]
    fn test_absence_is_not_index_zero() {
        let registry = SiteRuleRegistry::from_rules(vec![rule("only", r"only\.org")]).unwrap();
        assert_eq!(registry.resolve_by_host("other.org"), None);
        assert_eq!(registry.resolve_by_key("onl"), None);
        assert_eq!(registry.resolve_by_key("only"), Some(RuleIndex(0)));
    }

    #[test]
    fn test_preference_mapping() {
        let registry =
            SiteRuleRegistry::from_rules(vec![rule("alpha", "a"), rule("beta", "b")]).unwrap();
        let beta = registry.resolve_by_key("beta").unwrap();
        let pref = registry.preference_key(beta).unwrap();
        assert_eq!(pref, "extensions.imagezoom.beta.enable");
        assert_eq!(registry.rule_for_preference(&pref), Some(beta));
        assert_eq!(registry.rule_for_preference("extensions.imagezoom.panel.wait"), None);
        assert_eq!(registry.rule_for_preference("beta.enable"), None);
        assert_eq!(registry.rule_for_preference("extensions.imagezoom.gamma.enable"), None);
    }

    #[test]
    fn test_foreign_index_is_absent() {
        let large = SiteRuleRegistry::from_rules(vec![rule("a", "a"), rule("b", "b")]).unwrap();
        let small = SiteRuleRegistry::from_rules(vec![rule("a", "a")]).unwrap();
        let b = large.resolve_by_key("b").unwrap();

        assert!(small.get(b).is_none());
        assert_eq!(small.key_of(b), None);
        assert_eq!(small.name_of(b), None);
        assert_eq!(small.preference_key(b), None);
        assert_eq!(large.name_of(b), Some("b"));
    }
}
