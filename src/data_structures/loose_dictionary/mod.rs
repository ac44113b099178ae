//! Loose Dictionary Implementation
//!
//! An associative container keyed by lowercase strings that, besides exact
//! lookup, answers "does this query contain any registered key as a
//! substring". Entries can restrict themselves to matches anchored at the end
//! of the query, or hide themselves from queries containing a blacklist word.
//!
//! Two structures are kept in lockstep:
//! * an entry index holding the registered keys and their export order;
//! * a match trie whose root-to-node paths spell the registered keys and whose
//!   terminal nodes own the entries.
//!
//! Every mutation goes through this type and touches both. The dictionary is
//! single-threaded; see [`SharedLooseDictionary`] for hosts that need to share
//! it across threads.
//!
//! # Example
//!
//! ```
//! use pin_assist_lib::data_structures::loose_dictionary::LooseDictionary;
//!
//! let mut dictionary = LooseDictionary::new();
//! dictionary.add("Copper", 1, None, false).unwrap();
//! dictionary.add("tin", 2, None, false).unwrap();
//!
//! assert_eq!(dictionary.lookup_loose_lite("rock_copperore"), Some(&1));
//! assert_eq!(dictionary.lookup_loose_lite("tinbar"), Some(&2));
//! assert_eq!(dictionary.lookup_loose_lite("xyz"), None);
//! ```

mod entry;
mod error;
mod index;
mod node;
mod shared;

use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace, warn};

pub use entry::Entry;
pub use error::LooseDictionaryError;
pub use shared::{SharedLooseDictionary, SharedLooseMatch};

use index::EntryIndex;
use node::{MatchRules, TrieNode};

/// Result type for Loose Dictionary operations
pub type LooseDictionaryResult<T> = Result<T, LooseDictionaryError>;

/// Configuration options for the Loose Dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LooseDictionaryConfig {
    /// Maximum key length in characters (bounds the trie depth)
    pub max_key_length: usize,

    /// Whether add and rename check the existing keys for conflicts
    pub detect_conflicts: bool,
}

impl Default for LooseDictionaryConfig {
    fn default() -> Self {
        Self {
            max_key_length: 128,
            detect_conflicts: true,
        }
    }
}

/// Result of a successful add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddOutcome {
    /// An already registered key occurs inside the new key.
    pub conflicting: bool,
}

/// Result of a successful rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome<V> {
    /// An already registered key occurs inside the new key.
    pub conflicting: bool,

    /// The registered key found inside the new key.
    pub conflicting_key: Option<String>,

    /// Value of the registered key found inside the new key.
    pub conflicting_value: Option<V>,
}

impl<V> Default for RenameOutcome<V> {
    fn default() -> Self {
        Self {
            conflicting: false,
            conflicting_key: None,
            conflicting_value: None,
        }
    }
}

/// A registered key found inside a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooseMatch<'a, V> {
    /// The matched key (lowercase)
    pub key: String,

    /// Character range of the match within the lowercased query
    pub span: Range<usize>,

    /// The entry stored under the matched key
    pub entry: &'a Entry<V>,

    /// More than one registered key plausibly matches the query
    pub conflicting: bool,
}

impl<'a, V> LooseMatch<'a, V> {
    /// The matched value.
    pub fn value(&self) -> &'a V {
        self.entry.value()
    }
}

/// Lowercased key or query, kept both as text and as characters.
struct Normalized {
    text: String,
    chars: Vec<char>,
}

impl Normalized {
    fn new(raw: &str) -> Self {
        let text = raw.to_lowercase();
        let chars = text.chars().collect();
        Self { text, chars }
    }

    fn rules(&self, exact_match_only: bool) -> MatchRules<'_> {
        MatchRules {
            chars: &self.chars,
            text: &self.text,
            exact_match_only,
        }
    }
}

/// Substring-matching dictionary over lowercase keys.
#[derive(Debug, Clone)]
pub struct LooseDictionary<V> {
    /// Registered keys in export order
    index: EntryIndex,

    /// Root of the match trie; never carries an entry
    root: TrieNode<V>,

    /// Configuration options
    config: LooseDictionaryConfig,
}

impl<V> LooseDictionary<V> {
    /// Creates a new empty dictionary with default configuration.
    pub fn new() -> Self {
        Self::with_config(LooseDictionaryConfig::default())
    }

    /// Creates a new empty dictionary with the specified configuration.
    pub fn with_config(config: LooseDictionaryConfig) -> Self {
        Self {
            index: EntryIndex::new(),
            root: TrieNode::new(),
            config,
        }
    }

    /// Builds a dictionary from a persisted flat mapping.
    ///
    /// The trie is rebuilt from scratch. Keys are lowercased; when two keys
    /// collide after lowercasing the later entry overwrites the earlier one
    /// and the key keeps its first position. Empty keys are skipped.
    ///
    /// # Arguments
    ///
    /// * `entries` - Key and entry pairs in export order.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Entry<V>)>,
        K: AsRef<str>,
    {
        Self::from_entries_with_config(entries, LooseDictionaryConfig::default())
    }

    /// Same as [`LooseDictionary::from_entries`] with an explicit configuration.
    ///
    /// The length limit is not applied to persisted keys.
    pub fn from_entries_with_config<I, K>(entries: I, config: LooseDictionaryConfig) -> Self
    where
        I: IntoIterator<Item = (K, Entry<V>)>,
        K: AsRef<str>,
    {
        let mut dictionary = Self::with_config(config);
        for (key, entry) in entries {
            let key = Normalized::new(key.as_ref());
            if key.chars.is_empty() {
                warn!("Skipping persisted entry with an empty key");
                continue;
            }
            if dictionary.root.insert(&key.chars, entry).is_some() {
                debug!(key = %key.text, "Duplicate key overwritten while rebuilding trie");
            }
            dictionary.index.insert(key.text);
        }
        debug!(entries = dictionary.len(), "Rebuilt trie from persisted entries");
        dictionary
    }

    /// The active configuration.
    pub fn config(&self) -> &LooseDictionaryConfig {
        &self.config
    }

    /// Replaces the configuration. Keys already registered are kept as is.
    pub fn set_config(&mut self, config: LooseDictionaryConfig) {
        self.config = config;
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether no key is registered.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether `key` (in any casing) is registered.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains(&key.to_lowercase())
    }

    /// Registered keys in export order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.iter()
    }

    /// Registered keys and their entries in export order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry<V>)> {
        self.index
            .iter()
            .filter_map(move |key| self.stored_entry(key).map(|entry| (key, entry)))
    }

    /// Number of trie nodes below the root.
    pub fn node_count(&self) -> usize {
        self.root.descendant_count()
    }

    /// Registers `key` with `value`.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to register; it is lowercased before storage.
    /// * `value` - The value to associate with the key.
    /// * `blacklist_word` - Hides the entry from queries containing this word.
    /// * `exact_match_only` - Only match spans that end at the end of the query.
    ///
    /// # Returns
    ///
    /// * `Ok(AddOutcome)` - `conflicting` is set when a registered key occurs inside `key`.
    ///
    /// # Errors
    ///
    /// * [`LooseDictionaryError::KeyExists`] if the key is already registered;
    ///   nothing is overwritten.
    /// * [`LooseDictionaryError::EmptyKey`] / [`LooseDictionaryError::KeyTooLong`]
    ///   for keys the trie cannot hold.
    pub fn add(
        &mut self,
        key: &str,
        value: V,
        blacklist_word: Option<&str>,
        exact_match_only: bool,
    ) -> LooseDictionaryResult<AddOutcome> {
        let entry = Entry::new(value)
            .with_exact_match_only(exact_match_only)
            .with_blacklist_word(blacklist_word);
        self.insert_entry(key, entry)
    }

    /// Registers `key` with a prepared entry. See [`LooseDictionary::add`].
    pub fn insert_entry(&mut self, key: &str, entry: Entry<V>) -> LooseDictionaryResult<AddOutcome> {
        let key = self.checked_key(key)?;
        if self.index.contains(&key.text) {
            return Err(LooseDictionaryError::KeyExists { key: key.text });
        }

        let conflicting = !entry.is_exact_match_only() && self.find_conflict(&key).is_some();

        self.root.insert(&key.chars, entry);
        self.index.insert(key.text.clone());
        debug!(key = %key.text, conflicting, "Entry added");
        Ok(AddOutcome { conflicting })
    }

    /// Updates the value and match constraints of `key` in place.
    ///
    /// The trie path is untouched, so the key keeps its position and nodes.
    ///
    /// # Arguments
    ///
    /// * `key` - The registered key, in any casing.
    /// * `value` - The new value.
    /// * `exact_match_only` - The new exact-match-only flag.
    /// * `blacklist_word` - The new blacklist word; `None` clears it.
    ///
    /// # Errors
    ///
    /// [`LooseDictionaryError::KeyNotFound`] if the key is not registered.
    pub fn modify(
        &mut self,
        key: &str,
        value: V,
        exact_match_only: bool,
        blacklist_word: Option<&str>,
    ) -> LooseDictionaryResult<()> {
        let key = Normalized::new(key);
        if !self.index.contains(&key.text) {
            return Err(LooseDictionaryError::KeyNotFound { key: key.text });
        }
        let entry = self
            .root
            .get_mut(&key.chars)
            .and_then(|node| node.entry.as_mut())
            .ok_or_else(|| LooseDictionaryError::KeyNotFound {
                key: key.text.clone(),
            })?;

        entry.update(value, exact_match_only, blacklist_word.map(str::to_owned));
        debug!(key = %key.text, "Entry modified");
        Ok(())
    }

    /// Unregisters `key` and prunes its trie path.
    ///
    /// # Returns
    ///
    /// * `Ok(Entry<V>)` - The entry that was stored under `key`.
    ///
    /// # Errors
    ///
    /// [`LooseDictionaryError::KeyNotFound`] if the key is not registered.
    pub fn remove(&mut self, key: &str) -> LooseDictionaryResult<Entry<V>> {
        let key = Normalized::new(key);
        if !self.index.remove(&key.text) {
            return Err(LooseDictionaryError::KeyNotFound { key: key.text });
        }
        let entry = self
            .root
            .remove_path(&key.chars)
            .ok_or_else(|| LooseDictionaryError::KeyNotFound {
                key: key.text.clone(),
            })?;

        debug!(key = %key.text, "Entry removed");
        Ok(entry)
    }

    /// Removes every key. Does nothing when already empty.
    pub fn clear(&mut self) {
        if self.index.is_empty() {
            return;
        }
        self.index.clear();
        self.root.clear();
        debug!("Dictionary cleared");
    }

    /// Entry registered under exactly `key` (in any casing).
    ///
    /// Match constraints are not applied: an exact-only or blacklisted entry
    /// is still returned.
    pub fn lookup_exact(&self, key: &str) -> Option<&Entry<V>> {
        let key = key.to_lowercase();
        if !self.index.contains(&key) {
            return None;
        }
        self.stored_entry(&key)
    }

    /// Finds the registered key occurring earliest in `query`.
    ///
    /// A query that is itself a registered key returns that key's entry,
    /// provided the entry is not blacklisted for it. Otherwise suffixes of the
    /// query are tried from offset 0 onwards and the shallowest valid key at
    /// the first offset that has one wins. With `exact_match_only`, only
    /// matches reaching the end of the query are accepted.
    ///
    /// # Arguments
    ///
    /// * `query` - The free-form name to search, in any casing.
    /// * `exact_match_only` - Require the match to end at the end of the query.
    ///
    /// # Returns
    ///
    /// * `Some(LooseMatch)` - The matched key, its span and entry, and whether
    ///   a longer registered key below it would also match. The flag is never
    ///   set when `exact_match_only` is requested.
    /// * `None` - If no registered key occurs in the query.
    ///
    /// # Example
    ///
    /// ```
    /// use pin_assist_lib::data_structures::loose_dictionary::LooseDictionary;
    ///
    /// let mut dictionary = LooseDictionary::new();
    /// dictionary.add("copper", 1, None, false).unwrap();
    /// dictionary.add("copperore", 2, Some("giant"), false).unwrap();
    ///
    /// let found = dictionary.lookup_loose("Raw_Copper", false).unwrap();
    /// assert_eq!((found.key.as_str(), found.span.clone()), ("copper", 4..10));
    /// assert!(dictionary.lookup_loose("copperore_x", false).unwrap().conflicting);
    /// assert!(!dictionary.lookup_loose("giant_copperore", false).unwrap().conflicting);
    /// ```
    pub fn lookup_loose(&self, query: &str, exact_match_only: bool) -> Option<LooseMatch<'_, V>> {
        let query = Normalized::new(query);
        if query.chars.is_empty() {
            return None;
        }
        let rules = query.rules(exact_match_only);

        let (node, entry, span) = match self.exact_hit(&query, &rules) {
            Some((node, entry)) => (node, entry, 0..query.chars.len()),
            None => {
                let hit = self.root.find_substring(&rules)?;
                (hit.node, hit.entry, hit.start..hit.end)
            }
        };

        let conflicting = !exact_match_only && node.has_ambiguous_descendant(&query.text);
        trace!(query = %query.text, ?span, conflicting, "Loose match found");
        Some(LooseMatch {
            key: query.chars[span.clone()].iter().collect(),
            span,
            entry,
            conflicting,
        })
    }

    /// Value of the registered key occurring earliest in `query`.
    ///
    /// Same scan as [`LooseDictionary::lookup_loose`] without conflict
    /// detection or span tracking.
    pub fn lookup_loose_lite(&self, query: &str) -> Option<&V> {
        let query = Normalized::new(query);
        let rules = query.rules(false);
        if let Some((_, entry)) = self.exact_hit(&query, &rules) {
            return Some(entry.value());
        }
        self.root.find_substring(&rules).map(|hit| hit.entry.value())
    }

    /// Finds a registered key whose characters occur in order, not
    /// necessarily contiguously, in `query`.
    ///
    /// Separators between the key's characters are skipped, so `copper`
    /// matches `c-o-p-p-e-r`. With `exact_match_only`, or for exact-only
    /// entries, every query character must belong to the key.
    ///
    /// # Arguments
    ///
    /// * `query` - The free-form name to search, in any casing.
    /// * `exact_match_only` - Require the key to account for every query character.
    ///
    /// # Returns
    ///
    /// The value of the first key found, or `None`.
    pub fn lookup_fuzzy(&self, query: &str, exact_match_only: bool) -> Option<&V> {
        let query = Normalized::new(query);
        let rules = query.rules(exact_match_only);
        if let Some((_, entry)) = self.exact_hit(&query, &rules) {
            return Some(entry.value());
        }
        self.root.find_skipping(&rules).map(Entry::value)
    }

    fn stored_entry(&self, key: &str) -> Option<&Entry<V>> {
        self.root.find(key).and_then(|node| node.entry.as_ref())
    }

    /// The query's own entry, when the query is a registered key valid for itself.
    fn exact_hit(&self, query: &Normalized, rules: &MatchRules<'_>) -> Option<(&TrieNode<V>, &Entry<V>)> {
        if !self.index.contains(&query.text) {
            return None;
        }
        let node = self.root.get(&query.chars)?;
        let entry = node.entry.as_ref()?;
        entry
            .is_valid_for(&query.text, true, rules.exact_match_only)
            .then_some((node, entry))
    }

    /// Lowercases `key` and checks it can be stored.
    fn checked_key(&self, key: &str) -> LooseDictionaryResult<Normalized> {
        let key = Normalized::new(key);
        if key.chars.is_empty() {
            return Err(LooseDictionaryError::EmptyKey);
        }
        if key.chars.len() > self.config.max_key_length {
            return Err(LooseDictionaryError::KeyTooLong {
                key: key.text,
                max_len: self.config.max_key_length,
            });
        }
        Ok(key)
    }

    /// Registered key found inside `key` by a leftmost-substring scan.
    fn find_conflict(&self, key: &Normalized) -> Option<(String, &Entry<V>)> {
        if !self.config.detect_conflicts {
            return None;
        }
        self.root
            .find_substring(&key.rules(false))
            .map(|hit| (key.chars[hit.start..hit.end].iter().collect(), hit.entry))
    }
}

impl<V: Clone> LooseDictionary<V> {
    /// Moves the entry of `old_key` to `new_key`.
    ///
    /// Renaming a key to itself (after lowercasing) succeeds without changes.
    /// The renamed key keeps its export position and its match constraints.
    ///
    /// # Arguments
    ///
    /// * `old_key` - The registered key to move.
    /// * `new_key` - The key to move it to.
    ///
    /// # Returns
    ///
    /// * `Ok(RenameOutcome)` - When a registered key occurs inside `new_key`,
    ///   the outcome names it and carries a copy of its value.
    ///
    /// # Errors
    ///
    /// * [`LooseDictionaryError::KeyNotFound`] if `old_key` is not registered.
    /// * [`LooseDictionaryError::TargetExists`] if `new_key` is registered.
    /// * [`LooseDictionaryError::EmptyKey`] / [`LooseDictionaryError::KeyTooLong`]
    ///   for an unusable `new_key`.
    ///
    /// The dictionary is left untouched on every error.
    pub fn rename(&mut self, old_key: &str, new_key: &str) -> LooseDictionaryResult<RenameOutcome<V>> {
        let old = Normalized::new(old_key);
        if !self.index.contains(&old.text) {
            return Err(LooseDictionaryError::KeyNotFound { key: old.text });
        }
        let new = self.checked_key(new_key)?;
        if old.text == new.text {
            return Ok(RenameOutcome::default());
        }
        if self.index.contains(&new.text) {
            return Err(LooseDictionaryError::TargetExists { key: new.text });
        }

        let entry = self
            .root
            .remove_path(&old.chars)
            .ok_or_else(|| LooseDictionaryError::KeyNotFound {
                key: old.text.clone(),
            })?;

        let conflict = if entry.is_exact_match_only() {
            None
        } else {
            self.find_conflict(&new)
                .map(|(key, found)| (key, found.value().clone()))
        };

        self.root.insert(&new.chars, entry);
        self.index.replace(&old.text, new.text.clone());
        debug!(from = %old.text, to = %new.text, conflicting = conflict.is_some(), "Entry renamed");

        Ok(match conflict {
            Some((key, value)) => RenameOutcome {
                conflicting: true,
                conflicting_key: Some(key),
                conflicting_value: Some(value),
            },
            None => RenameOutcome::default(),
        })
    }

    /// Owned copy of every registered key and entry, in export order.
    pub fn to_entries(&self) -> Vec<(String, Entry<V>)> {
        self.iter()
            .map(|(key, entry)| (key.to_owned(), entry.clone()))
            .collect()
    }
}

impl<V: Ord> LooseDictionary<V> {
    /// Stable reorder of the export order by ascending value. The trie is untouched.
    pub fn sort_by_value(&mut self) {
        let root = &self.root;
        self.index.sort_by_cached_key(|key| {
            root.find(key)
                .and_then(|node| node.entry.as_ref())
                .map(Entry::value)
        });
    }
}

impl<V> Default for LooseDictionary<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Serialize> Serialize for LooseDictionary<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, entry) in self.iter() {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for LooseDictionary<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

struct EntriesVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
    type Value = LooseDictionary<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of keys to dictionary entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, entry)) = access.next_entry::<String, Entry<V>>()? {
            entries.push((key, entry));
        }
        Ok(LooseDictionary::from_entries(entries))
    }
}
