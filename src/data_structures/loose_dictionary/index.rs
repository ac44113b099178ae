//! Flat key index backing existence checks and export ordering.

use hashbrown::HashSet;

/// Registered keys in their current iteration order.
///
/// Membership is answered from a hash set; ordering is kept in a separate
/// vector so the export order can be rearranged without touching the trie.
#[derive(Debug, Clone, Default)]
pub(crate) struct EntryIndex {
    members: HashSet<String>,
    order: Vec<String>,
}

impl EntryIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.members.contains(key)
    }

    /// Appends `key`. Returns `false` if it was already registered.
    pub(crate) fn insert(&mut self, key: String) -> bool {
        if !self.members.insert(key.clone()) {
            return false;
        }
        self.order.push(key);
        true
    }

    /// Removes `key`. Returns `false` if it was not registered.
    pub(crate) fn remove(&mut self, key: &str) -> bool {
        if !self.members.remove(key) {
            return false;
        }
        self.order.retain(|k| k != key);
        true
    }

    /// Replaces `old` with `new` at the same position in the order.
    pub(crate) fn replace(&mut self, old: &str, new: String) {
        if !self.members.remove(old) {
            return;
        }
        self.members.insert(new.clone());
        if let Some(slot) = self.order.iter_mut().find(|k| k.as_str() == old) {
            *slot = new;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.members.clear();
        self.order.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Stable reorder of the keys by a key extracted once per entry.
    pub(crate) fn sort_by_cached_key<K, F>(&mut self, f: F)
    where
        K: Ord,
        F: FnMut(&String) -> K,
    {
        self.order.sort_by_cached_key(f);
    }
}
