//! Bucket: the chain of entries stored in one slot.
//!
//! A bucket knows nothing about hashing or capacity. It keeps entries in
//! insertion order and trusts its caller to keep keys unique; `push` does
//! not check for duplicates. Every operation is a linear scan, which is fine
//! while the table keeps chains short.

use crate::entry::Entry;
use core::borrow::Borrow;

#[derive(Debug, Clone)]
pub(crate) struct Bucket<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Bucket<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append `entry` and return a reference to it in place.
    pub(crate) fn push(&mut self, entry: Entry<K, V>) -> &Entry<K, V> {
        self.entries.reserve_exact(1);
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }
}

impl<K, V> Bucket<K, V>
where
    K: Eq,
{
    /// Drop every entry with a matching key, keeping the others in order.
    /// Returns the first removed entry.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        if !self.contains(key) {
            return None;
        }
        let mut removed = None;
        let mut kept = Vec::with_capacity(self.entries.len() - 1);
        for entry in self.entries.drain(..) {
            if entry.key().borrow() == key {
                if removed.is_none() {
                    removed = Some(entry);
                }
            } else {
                kept.push(entry);
            }
        }
        kept.shrink_to_fit();
        self.entries = kept;
        removed
    }

    /// Replace the value of the first matching entry. Returns the entry, now
    /// holding `value`, together with the value it replaced.
    pub(crate) fn update<Q>(&mut self, key: &Q, value: V) -> Option<(&Entry<K, V>, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let entry = self.entries.iter_mut().find(|e| e.key().borrow() == key)?;
        let old = entry.replace_value(value);
        Some((entry, old))
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries.iter().any(|e| e.key().borrow() == key)
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries
            .iter()
            .find(|e| e.key().borrow() == key)
            .map(Entry::value)
    }
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K, V> IntoIterator for &'a Bucket<K, V> {
    type Item = &'a Entry<K, V>;
    type IntoIter = core::slice::Iter<'a, Entry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for Bucket<K, V> {
    type Item = Entry<K, V>;
    type IntoIter = std::vec::IntoIter<Entry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
