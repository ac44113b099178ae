//! Thread-shareable handle around a [`LooseDictionary`].
//!
//! The dictionary itself does no locking. A mutation touches both the index
//! and the trie, so the whole structure sits behind a single lock here and
//! every operation holds it for its full duration.

use std::ops::Range;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    AddOutcome, Entry, LooseDictionary, LooseDictionaryConfig, LooseDictionaryResult, LooseMatch,
    RenameOutcome,
};

/// A [`LooseMatch`] copied out of the dictionary so the lock can be released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedLooseMatch<V> {
    /// The matched key (lowercase)
    pub key: String,

    /// Character range of the match within the lowercased query
    pub span: Range<usize>,

    /// Copy of the entry stored under the matched key
    pub entry: Entry<V>,

    /// More than one registered key plausibly matches the query
    pub conflicting: bool,
}

impl<V> SharedLooseMatch<V> {
    /// The matched value.
    pub fn value(&self) -> &V {
        self.entry.value()
    }
}

impl<V: Clone> From<LooseMatch<'_, V>> for SharedLooseMatch<V> {
    fn from(found: LooseMatch<'_, V>) -> Self {
        Self {
            key: found.key,
            span: found.span,
            entry: found.entry.clone(),
            conflicting: found.conflicting,
        }
    }
}

/// A cloneable, lock-protected [`LooseDictionary`].
#[derive(Debug)]
pub struct SharedLooseDictionary<V> {
    inner: Arc<RwLock<LooseDictionary<V>>>,
}

impl<V> SharedLooseDictionary<V> {
    /// Creates a new empty shared dictionary with default configuration.
    pub fn new() -> Self {
        Self::from_dictionary(LooseDictionary::new())
    }

    /// Creates a new empty shared dictionary with the specified configuration.
    pub fn with_config(config: LooseDictionaryConfig) -> Self {
        Self::from_dictionary(LooseDictionary::with_config(config))
    }

    /// Wraps an existing dictionary.
    pub fn from_dictionary(dictionary: LooseDictionary<V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(dictionary)),
        }
    }

    /// Shared access for several reads under one lock.
    pub fn read(&self) -> RwLockReadGuard<'_, LooseDictionary<V>> {
        self.inner.read()
    }

    /// Exclusive access for several mutations under one lock.
    pub fn write(&self) -> RwLockWriteGuard<'_, LooseDictionary<V>> {
        self.inner.write()
    }

    /// See [`LooseDictionary::add`].
    pub fn add(
        &self,
        key: &str,
        value: V,
        blacklist_word: Option<&str>,
        exact_match_only: bool,
    ) -> LooseDictionaryResult<AddOutcome> {
        self.inner
            .write()
            .add(key, value, blacklist_word, exact_match_only)
    }

    /// See [`LooseDictionary::insert_entry`].
    pub fn insert_entry(&self, key: &str, entry: Entry<V>) -> LooseDictionaryResult<AddOutcome> {
        self.inner.write().insert_entry(key, entry)
    }

    /// See [`LooseDictionary::modify`].
    pub fn modify(
        &self,
        key: &str,
        value: V,
        exact_match_only: bool,
        blacklist_word: Option<&str>,
    ) -> LooseDictionaryResult<()> {
        self.inner
            .write()
            .modify(key, value, exact_match_only, blacklist_word)
    }

    /// See [`LooseDictionary::remove`].
    pub fn remove(&self, key: &str) -> LooseDictionaryResult<Entry<V>> {
        self.inner.write().remove(key)
    }

    /// See [`LooseDictionary::clear`].
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether no key is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl<V: Clone> SharedLooseDictionary<V> {
    /// See [`LooseDictionary::rename`].
    pub fn rename(&self, old_key: &str, new_key: &str) -> LooseDictionaryResult<RenameOutcome<V>> {
        self.inner.write().rename(old_key, new_key)
    }

    /// Owned copy of the entry registered under exactly `key`.
    pub fn lookup_exact(&self, key: &str) -> Option<Entry<V>> {
        self.inner.read().lookup_exact(key).cloned()
    }

    /// Owned copy of [`LooseDictionary::lookup_loose`], including the conflict flag.
    pub fn lookup_loose(&self, query: &str, exact_match_only: bool) -> Option<SharedLooseMatch<V>> {
        self.inner
            .read()
            .lookup_loose(query, exact_match_only)
            .map(SharedLooseMatch::from)
    }

    /// Owned copy of [`LooseDictionary::lookup_loose_lite`].
    pub fn lookup_loose_lite(&self, query: &str) -> Option<V> {
        self.inner.read().lookup_loose_lite(query).cloned()
    }

    /// Owned copy of [`LooseDictionary::lookup_fuzzy`].
    pub fn lookup_fuzzy(&self, query: &str, exact_match_only: bool) -> Option<V> {
        self.inner.read().lookup_fuzzy(query, exact_match_only).cloned()
    }
}

impl<V: Ord> SharedLooseDictionary<V> {
    /// See [`LooseDictionary::sort_by_value`].
    pub fn sort_by_value(&self) {
        self.inner.write().sort_by_value();
    }
}

impl<V> Clone for SharedLooseDictionary<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for SharedLooseDictionary<V> {
    fn default() -> Self {
        Self::new()
    }
}
