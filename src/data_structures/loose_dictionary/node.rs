//! Match trie node and its traversal algorithms.
//!
//! Each node exclusively owns its children. A node carrying an [`Entry`] marks
//! the end of a registered key; nodes without one are path junctions. Removal
//! walks down recursively and tells the caller whether the visited child is
//! dead, so no parent links are ever stored.

use fnv::{FnvHashMap, FnvHashSet};

use super::entry::Entry;

/// A node in the match trie.
#[derive(Debug, Clone)]
pub(crate) struct TrieNode<V> {
    /// Map of characters to child nodes
    pub(crate) children: FnvHashMap<char, TrieNode<V>>,

    /// Payload, present only on nodes that terminate a registered key
    pub(crate) entry: Option<Entry<V>>,
}

/// Query context shared by every node visited during one traversal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MatchRules<'q> {
    /// Lowercased query, as characters
    pub(crate) chars: &'q [char],

    /// Lowercased query, used for blacklist checks
    pub(crate) text: &'q str,

    /// Caller-requested exact-match-only mode
    pub(crate) exact_match_only: bool,
}

/// A node accepted by the leftmost-substring traversal.
#[derive(Debug)]
pub(crate) struct SubstringHit<'a, V> {
    pub(crate) node: &'a TrieNode<V>,
    pub(crate) entry: &'a Entry<V>,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl<V> TrieNode<V> {
    /// Creates a new empty trie node.
    pub(crate) fn new() -> Self {
        Self {
            children: FnvHashMap::default(),
            entry: None,
        }
    }

    /// Places `entry` at the end of `key`, creating junctions as needed.
    ///
    /// Any entry already stored there is overwritten and returned.
    pub(crate) fn insert(&mut self, key: &[char], entry: Entry<V>) -> Option<Entry<V>> {
        let mut node = self;
        for &c in key {
            node = node.children.entry(c).or_insert_with(TrieNode::new);
        }
        node.entry.replace(entry)
    }

    /// Node reached by walking `key` from here.
    pub(crate) fn get(&self, key: &[char]) -> Option<&TrieNode<V>> {
        key.iter().try_fold(self, |node, c| node.children.get(c))
    }

    /// Same as [`TrieNode::get`], walking the characters of a string.
    pub(crate) fn find(&self, key: &str) -> Option<&TrieNode<V>> {
        key.chars().try_fold(self, |node, c| node.children.get(&c))
    }

    /// Mutable node reached by walking `key` from here.
    pub(crate) fn get_mut(&mut self, key: &[char]) -> Option<&mut TrieNode<V>> {
        key.iter().try_fold(self, |node, c| node.children.get_mut(c))
    }

    /// Clears the payload at the end of `key` and prunes dead nodes on the way back up.
    ///
    /// Returns the removed entry, or `None` if no entry was stored at `key`.
    /// The node this is called on is never detached.
    pub(crate) fn remove_path(&mut self, key: &[char]) -> Option<Entry<V>> {
        self.detach(key).map(|(entry, _)| entry)
    }

    /// Returns the cleared entry and whether `self` is now dead.
    fn detach(&mut self, key: &[char]) -> Option<(Entry<V>, bool)> {
        match key.split_first() {
            None => {
                let entry = self.entry.take()?;
                Some((entry, self.is_dead()))
            }
            Some((c, rest)) => {
                let child = self.children.get_mut(c)?;
                let (entry, child_dead) = child.detach(rest)?;
                if child_dead {
                    self.children.remove(c);
                }
                Some((entry, self.is_dead()))
            }
        }
    }

    fn is_dead(&self) -> bool {
        self.entry.is_none() && self.children.is_empty()
    }

    /// Drops every child and the payload.
    pub(crate) fn clear(&mut self) {
        self.children.clear();
        self.entry = None;
    }

    /// Total number of nodes below this one.
    pub(crate) fn descendant_count(&self) -> usize {
        self.children
            .values()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Leftmost-substring traversal.
    ///
    /// Tries every start offset of the query in order and, for each one,
    /// descends while the query characters have matching children. The first
    /// valid node found wins, so earlier offsets beat later ones and shallower
    /// keys beat deeper ones at the same offset.
    pub(crate) fn find_substring<'a>(&'a self, rules: &MatchRules<'_>) -> Option<SubstringHit<'a, V>> {
        (0..rules.chars.len()).find_map(|start| self.descend_from(start, rules))
    }

    fn descend_from<'a>(&'a self, start: usize, rules: &MatchRules<'_>) -> Option<SubstringHit<'a, V>> {
        let last = rules.chars.len();
        let mut node = self;
        for (pos, c) in rules.chars.iter().enumerate().skip(start) {
            node = node.children.get(c)?;
            let end = pos + 1;
            if let Some(entry) = &node.entry {
                if entry.is_valid_for(rules.text, end == last, rules.exact_match_only) {
                    return Some(SubstringHit {
                        node,
                        entry,
                        start,
                        end,
                    });
                }
            }
        }
        None
    }

    /// Whether any node below this one carries an entry that also matches the query.
    pub(crate) fn has_ambiguous_descendant(&self, query: &str) -> bool {
        self.children.values().any(|child| {
            child
                .entry
                .as_ref()
                .is_some_and(|entry| entry.is_ambiguous_for(query))
                || child.has_ambiguous_descendant(query)
        })
    }

    /// Non-contiguous traversal.
    ///
    /// Query characters without a matching child are skipped while staying on
    /// the same node. When a child exists but its subtree yields nothing, the
    /// character is skipped as well. The effective span length is the depth of
    /// the candidate node and is compared against the full query length for the
    /// exact-match-only rule.
    pub(crate) fn find_skipping<'a>(&'a self, rules: &MatchRules<'_>) -> Option<&'a Entry<V>> {
        let mut path = Vec::with_capacity(rules.chars.len());
        let mut exhausted = FailedAttempts::default();
        self.skip_from(0, &mut path, rules, &mut exhausted)
    }

    /// `path` spells the key prefix leading to `self`; its length is the node depth.
    fn skip_from<'a>(
        &'a self,
        from: usize,
        path: &mut Vec<char>,
        rules: &MatchRules<'_>,
        exhausted: &mut FailedAttempts,
    ) -> Option<&'a Entry<V>> {
        let query_len = rules.chars.len();
        for pos in from..query_len {
            let c = rules.chars[pos];
            let Some(child) = self.children.get(&c) else {
                continue;
            };

            path.push(c);
            let resume = pos + 1;
            if !exhausted.contains(resume, path) {
                if let Some(entry) = &child.entry {
                    if entry.is_valid_for(rules.text, path.len() == query_len, rules.exact_match_only) {
                        return Some(entry);
                    }
                }
                if let Some(found) = child.skip_from(resume, path, rules, exhausted) {
                    return Some(found);
                }
                exhausted.insert(resume, path);
            }
            path.pop();
        }
        None
    }
}

/// Skip-traversal attempts known to yield nothing.
///
/// A trie node is identified by the key prefix spelling its path, so entering
/// the same prefix at the same query position always gives the same result.
#[derive(Debug, Default)]
struct FailedAttempts {
    by_position: FnvHashMap<usize, FnvHashSet<Vec<char>>>,
}

impl FailedAttempts {
    fn contains(&self, position: usize, prefix: &[char]) -> bool {
        self.by_position
            .get(&position)
            .is_some_and(|prefixes| prefixes.contains(prefix))
    }

    fn insert(&mut self, position: usize, prefix: &[char]) {
        self.by_position
            .entry(position)
            .or_default()
            .insert(prefix.to_vec());
    }
}

impl<V> Default for TrieNode<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn rules<'q>(chars: &'q [char], text: &'q str) -> MatchRules<'q> {
        MatchRules {
            chars,
            text,
            exact_match_only: false,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut root = TrieNode::new();
        assert!(root.insert(&chars("foo"), Entry::new(1)).is_none());
        assert_eq!(root.get(&chars("foo")).and_then(|n| n.entry.as_ref()), Some(&Entry::new(1)));
        assert!(root.get(&chars("fo")).is_some_and(|n| n.entry.is_none()));
        assert!(root.get(&chars("fox")).is_none());

        let previous = root.insert(&chars("foo"), Entry::new(2));
        assert_eq!(previous, Some(Entry::new(1)));
    }

    #[test]
    fn test_remove_path_prunes_to_junction() {
        let mut root = TrieNode::new();
        root.insert(&chars("foo"), Entry::new(1));
        root.insert(&chars("foobar"), Entry::new(2));
        assert_eq!(root.descendant_count(), 6);

        assert_eq!(root.remove_path(&chars("foobar")), Some(Entry::new(2)));
        assert_eq!(root.descendant_count(), 3);
        assert!(root.get(&chars("foo")).is_some_and(|n| n.children.is_empty()));

        assert_eq!(root.remove_path(&chars("foo")), Some(Entry::new(1)));
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_remove_path_keeps_children() {
        let mut root = TrieNode::new();
        root.insert(&chars("foo"), Entry::new(1));
        root.insert(&chars("foobar"), Entry::new(2));

        assert_eq!(root.remove_path(&chars("foo")), Some(Entry::new(1)));
        assert_eq!(root.descendant_count(), 6);
        assert!(root.get(&chars("foo")).is_some_and(|n| n.entry.is_none()));
        assert!(root.get(&chars("foobar")).is_some_and(|n| n.entry.is_some()));
    }

    #[test]
    fn test_remove_path_missing_key_is_noop() {
        let mut root = TrieNode::new();
        root.insert(&chars("foobar"), Entry::new(2));

        assert!(root.remove_path(&chars("foo")).is_none());
        assert!(root.remove_path(&chars("fizz")).is_none());
        assert!(root.remove_path(&[]).is_none());
        assert_eq!(root.descendant_count(), 6);
    }

    #[test]
    fn test_find_substring_span() {
        let mut root = TrieNode::new();
        root.insert(&chars("ore"), Entry::new(1));

        let query = chars("rawore");
        let hit = root.find_substring(&rules(&query, "rawore")).unwrap();
        assert_eq!((hit.start, hit.end), (3, 6));
        assert_eq!(hit.entry.value(), &1);
    }

    #[test]
    fn test_find_skipping_through_separators() {
        let mut root = TrieNode::new();
        root.insert(&chars("copper"), Entry::new(1));

        let query = chars("c-o-p-p-e-r");
        let found = root.find_skipping(&rules(&query, "c-o-p-p-e-r"));
        assert_eq!(found.map(Entry::value), Some(&1));

        let query = chars("c-o-p");
        assert!(root.find_skipping(&rules(&query, "c-o-p")).is_none());
    }

    #[test]
    fn test_find_skipping_distinguishes_nodes_at_same_depth() {
        let mut root = TrieNode::new();
        root.insert(&chars("axq"), Entry::new(1));
        root.insert(&chars("bx"), Entry::new(2));

        // "ax" and "bx" are both entered at depth 2 and position 3; only "ax" fails.
        let query = chars("abx");
        let found = root.find_skipping(&rules(&query, "abx"));
        assert_eq!(found.map(Entry::value), Some(&2));
    }
}
