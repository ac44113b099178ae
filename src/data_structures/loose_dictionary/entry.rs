//! Entry payload stored on payload-bearing trie nodes.

use serde::{Deserialize, Serialize};

/// A stored value together with its match constraints.
///
/// An entry with `exact_match_only` set is only visible when the matched span
/// reaches the end of the query. An entry with a blacklist word is hidden from
/// every query that contains that word, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<V> {
    value: V,

    #[serde(default)]
    exact_match_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    blacklist_word: Option<String>,
}

impl<V> Entry<V> {
    /// Creates an unconstrained entry.
    pub fn new(value: V) -> Self {
        Self {
            value,
            exact_match_only: false,
            blacklist_word: None,
        }
    }

    /// Sets the exact-match-only flag.
    pub fn with_exact_match_only(mut self, exact_match_only: bool) -> Self {
        self.exact_match_only = exact_match_only;
        self
    }

    /// Sets the blacklist word. Empty words clear it.
    pub fn with_blacklist_word<S: Into<String>>(mut self, word: Option<S>) -> Self {
        self.blacklist_word = normalize_blacklist_word(word);
        self
    }

    /// The stored value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the entry, returning the stored value.
    pub fn into_value(self) -> V {
        self.value
    }

    /// Whether this entry only matches spans anchored at the end of a query.
    pub fn is_exact_match_only(&self) -> bool {
        self.exact_match_only
    }

    /// The blacklist word, if any.
    pub fn blacklist_word(&self) -> Option<&str> {
        self.blacklist_word.as_deref()
    }

    /// Replaces value and constraints in place.
    pub(crate) fn update(&mut self, value: V, exact_match_only: bool, blacklist_word: Option<String>) {
        self.value = value;
        self.exact_match_only = exact_match_only;
        self.blacklist_word = normalize_blacklist_word(blacklist_word);
    }

    /// Whether the blacklist word occurs in `query`.
    ///
    /// `query` must already be lowercase.
    pub(crate) fn is_blacklisted_for(&self, query: &str) -> bool {
        match self.blacklist_word.as_deref() {
            Some(word) if !word.is_empty() => query.contains(word.to_lowercase().as_str()),
            _ => false,
        }
    }

    /// Validity of this entry for a span of `query`.
    ///
    /// `anchored` tells whether the span satisfies the exact-match-only rule of
    /// the traversal that produced it.
    pub(crate) fn is_valid_for(&self, query: &str, anchored: bool, exact_match_only: bool) -> bool {
        if (self.exact_match_only || exact_match_only) && !anchored {
            return false;
        }
        !self.is_blacklisted_for(query)
    }

    /// Whether this entry would also plausibly match `query`.
    pub(crate) fn is_ambiguous_for(&self, query: &str) -> bool {
        !self.exact_match_only && !self.is_blacklisted_for(query)
    }
}

fn normalize_blacklist_word<S: Into<String>>(word: Option<S>) -> Option<String> {
    word.map(Into::into).filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_blacklist_word_is_dropped() {
        let entry = Entry::new(1).with_blacklist_word(Some(""));
        assert_eq!(entry.blacklist_word(), None);
        assert!(!entry.is_blacklisted_for("anything"));
    }

    #[test]
    fn test_blacklist_is_case_insensitive() {
        let entry = Entry::new(1).with_blacklist_word(Some("Giant"));
        assert!(entry.is_blacklisted_for("giantcopperrock"));
        assert!(!entry.is_blacklisted_for("copperrock"));
    }

    #[test]
    fn test_exact_only_requires_anchor() {
        let entry = Entry::new(1).with_exact_match_only(true);
        assert!(!entry.is_valid_for("ironore", false, false));
        assert!(entry.is_valid_for("rawiron", true, false));

        let loose = Entry::new(2);
        assert!(loose.is_valid_for("ironore", false, false));
        assert!(!loose.is_valid_for("ironore", false, true));
    }

    #[test]
    fn test_serde_defaults() {
        let entry: Entry<u32> = serde_json::from_str(r#"{"value": 7}"#).unwrap();
        assert_eq!(entry, Entry::new(7));

        let json = serde_json::to_string(&Entry::new(3).with_exact_match_only(true)).unwrap();
        assert_eq!(json, r#"{"value":3,"exact_match_only":true}"#);
    }
}
