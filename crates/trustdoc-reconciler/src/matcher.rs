//! Class-name matching rules
//!
//! Every field owns one [`ClassMatcher`]. Matching is case-sensitive:
//! a class matches when it equals one of the aliases or contains one of the
//! `contains` fragments, and contains none of the `excludes` fragments.

/// Compiled match rule for one template field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassMatcher {
    aliases: Vec<String>,
    contains: Vec<String>,
    excludes: Vec<String>,
}

impl ClassMatcher {
    /// Create a matcher from alias, contains and exclude lists
    pub fn new(aliases: Vec<String>, contains: Vec<String>, excludes: Vec<String>) -> Self {
        Self {
            aliases,
            contains,
            excludes,
        }
    }

    /// Matcher accepting exactly the given aliases
    pub fn exact<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Whether `class` satisfies this rule
    pub fn matches(&self, class: &str) -> bool {
        if self.excludes.iter().any(|e| class.contains(e.as_str())) {
            return false;
        }
        self.aliases.iter().any(|a| a == class)
            || self.contains.iter().any(|c| class.contains(c.as_str()))
    }

    /// Exact aliases accepted by this rule
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// True if the rule can never match anything
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty() && self.contains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_alias_match() {
        let matcher = ClassMatcher::exact(["effective_date", "trust_date"]);
        assert!(matcher.matches("trust_date"));
        assert!(!matcher.matches("trust_dates"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let matcher = ClassMatcher::exact(["trust_name"]);
        assert!(!matcher.matches("Trust_Name"));
    }

    #[test]
    fn test_contains_match() {
        let matcher = ClassMatcher::new(vec![], strings(&["successor_trustee"]), vec![]);
        assert!(matcher.matches("successor_trustee"));
        assert!(matcher.matches("first_successor_trustee"));
        assert!(!matcher.matches("successor_grantor"));
    }

    #[test]
    fn test_excludes_veto_matches() {
        let matcher = ClassMatcher::new(
            strings(&["trustee"]),
            strings(&["trustee"]),
            strings(&["successor"]),
        );
        assert!(matcher.matches("trustee"));
        assert!(matcher.matches("co_trustee"));
        assert!(!matcher.matches("successor_trustee"));
    }

    #[test]
    fn test_empty_matcher_matches_nothing() {
        let matcher = ClassMatcher::default();
        assert!(matcher.is_empty());
        assert!(!matcher.matches("anything"));
        assert!(!matcher.matches(""));
    }
}
