//! EventDictionary: separate-chaining table with load-factor growth and
//! change notifications.

use crate::bucket::Bucket;
use crate::entry::Entry;
use crate::error::{check_range, DictError, Result};
use crate::events::{
    AddListener, AddListenerId, Channel, RemoveListener, RemoveListenerId, UpdateListener,
    UpdateListenerId,
};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use tracing::{debug, trace};

/// Slot count of a new or cleared table.
pub const INITIAL_CAPACITY: usize = 10;
/// Slot-claim ratio above which the next `add` grows the table first.
pub const LOAD_FACTOR: f64 = 0.75;
/// Capacity multiplier applied on each resize.
pub const GROWTH_FACTOR: usize = 2;

/// A hash map that tells subscribers about every add, update and remove.
///
/// Slots hold at most one bucket; buckets are created on first use and
/// dropped as soon as they empty. Growth is driven by a slot-claim counter
/// that rises on every insertion (including rehash insertions) and falls only
/// when a bucket is discarded; the table never shrinks except through
/// [`clear`](Self::clear).
///
/// Listeners run synchronously, in registration order, after the change has
/// been applied. A listener that panics unwinds through the call that
/// triggered it and the change stays applied.
pub struct EventDictionary<K, V, S = DefaultHashBuilder> {
    hasher: S,
    slots: Vec<Option<Bucket<K, V>>>,
    len: usize,
    occupied: usize,
    claims: usize,
    added: Channel<AddListenerId, AddListener<K, V>>,
    removed: Channel<RemoveListenerId, RemoveListener<K>>,
    updated: Channel<UpdateListenerId, UpdateListener<K, V>>,
}

fn empty_slots<K, V>(capacity: usize) -> Vec<Option<Bucket<K, V>>> {
    core::iter::repeat_with(|| None).take(capacity).collect()
}

impl<K, V> EventDictionary<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V> Default for EventDictionary<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> EventDictionary<K, V, S> {
    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current slot count.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots holding a bucket; not the entry count.
    pub fn occupied_slots(&self) -> usize {
        self.occupied
    }

    /// The table always accepts mutation.
    pub fn is_read_only(&self) -> bool {
        false
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Entries in slot order, and within a slot in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.slots.iter().flatten().flatten(),
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(Entry::key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(Entry::value)
    }

    /// Drop every entry and return to `INITIAL_CAPACITY`. Listeners stay
    /// subscribed but hear nothing about the discarded entries.
    pub fn clear(&mut self) {
        debug!(entries = self.len, capacity = self.capacity(), "clearing table");
        self.slots = empty_slots(INITIAL_CAPACITY);
        self.len = 0;
        self.occupied = 0;
        self.claims = 0;
    }

    /// Write every entry, in iteration order, into `destination` starting at
    /// `start`. Nothing is written unless the whole table fits.
    pub fn copy_to(&self, destination: &mut [Option<Entry<K, V>>], start: usize) -> Result<()>
    where
        K: Clone,
        V: Clone,
    {
        check_range(start, 0, destination.len(), "start offset")?;
        check_range(self.len, 0, destination.len() - start, "entry count")?;
        for (dst, entry) in destination[start..].iter_mut().zip(self.iter()) {
            *dst = Some(entry.clone());
        }
        Ok(())
    }

    pub fn subscribe_add<F>(&mut self, listener: F) -> AddListenerId
    where
        F: FnMut(&Entry<K, V>) + 'static,
    {
        self.added.subscribe(Box::new(listener))
    }

    pub fn subscribe_remove<F>(&mut self, listener: F) -> RemoveListenerId
    where
        F: FnMut(&K) + 'static,
    {
        self.removed.subscribe(Box::new(listener))
    }

    pub fn subscribe_update<F>(&mut self, listener: F) -> UpdateListenerId
    where
        F: FnMut(&K, &V, &V) + 'static,
    {
        self.updated.subscribe(Box::new(listener))
    }

    pub fn unsubscribe_add(&mut self, id: AddListenerId) -> bool {
        self.added.unsubscribe(id)
    }

    pub fn unsubscribe_remove(&mut self, id: RemoveListenerId) -> bool {
        self.removed.unsubscribe(id)
    }

    pub fn unsubscribe_update(&mut self, id: UpdateListenerId) -> bool {
        self.updated.unsubscribe(id)
    }
}

impl<K, V, S> EventDictionary<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            slots: empty_slots(INITIAL_CAPACITY),
            len: 0,
            occupied: 0,
            claims: 0,
            added: Channel::new(),
            removed: Channel::new(),
            updated: Channel::new(),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self> {
        if capacity == 0 {
            return Err(DictError::InvalidArgument("capacity must be non-zero"));
        }
        let mut map = Self::with_hasher(hasher);
        map.slots = empty_slots(capacity);
        Ok(map)
    }

    /// Build a table by adding each pair in turn. A repeated key fails with
    /// `AlreadyExists`.
    pub fn try_from_iter<I>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        S: Default,
    {
        let mut map = Self::with_hasher(S::default());
        for (key, value) in iter {
            map.add(key, value)?;
        }
        Ok(map)
    }

    fn index_of<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        (self.hasher.hash_one(key) % self.slots.len() as u64) as usize
    }

    fn bucket<Q>(&self, key: &Q) -> Option<&Bucket<K, V>>
    where
        Q: ?Sized + Hash,
    {
        self.slots[self.index_of(key)].as_ref()
    }

    fn over_load_factor(&self) -> bool {
        self.claims as f64 / self.slots.len() as f64 > LOAD_FACTOR
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.bucket(key).is_some_and(|b| b.contains(key))
    }

    /// Insert a new entry. Fails with `AlreadyExists` if the key is present,
    /// leaving the stored value untouched.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        if self.contains_key(&key) {
            return Err(DictError::AlreadyExists);
        }
        self.insert_new(key, value);
        Ok(())
    }

    /// Value for `key`, or `NotFound`.
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.try_get(key).ok_or(DictError::NotFound)
    }

    /// Value for `key`, treating absence as an ordinary outcome.
    pub fn try_get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.bucket(key)?.get(key)
    }

    /// Replace the value of an existing key and return the old one.
    pub fn update<Q>(&mut self, key: &Q, value: V) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.replace(key, value).ok_or(DictError::NotFound)
    }

    /// Update if `key` is present, add otherwise.
    pub fn set(&mut self, key: K, value: V) {
        if self.contains_key(&key) {
            self.replace(&key, value);
        } else {
            self.insert_new(key, value);
        }
    }

    /// Returns whether an entry was removed.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(key).is_some()
    }

    /// Remove `key` and hand back its entry.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.index_of(key);
        let bucket = self.slots[index].as_mut()?;
        let entry = bucket.remove(key)?;
        if bucket.is_empty() {
            self.slots[index] = None;
            self.occupied -= 1;
            self.claims -= 1;
        }
        self.len -= 1;

        trace!(listeners = self.removed.len(), "dispatching remove");
        self.removed.emit(|listener| listener(entry.key()));
        Some(entry)
    }

    /// Append without a duplicate check; callers have already done one.
    fn insert_new(&mut self, key: K, value: V) {
        if self.over_load_factor() {
            self.resize();
        }
        let index = self.index_of(&key);
        let slot = &mut self.slots[index];
        if slot.is_none() {
            self.occupied += 1;
        }
        let entry = slot.get_or_insert_with(Bucket::new).push(Entry::new(key, value));
        self.claims += 1;
        self.len += 1;

        trace!(listeners = self.added.len(), "dispatching add");
        self.added.emit(|listener| listener(entry));
    }

    fn replace<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.index_of(key);
        let (entry, old) = self.slots[index].as_mut()?.update(key, value)?;

        trace!(listeners = self.updated.len(), "dispatching update");
        self.updated
            .emit(|listener| listener(entry.key(), &old, entry.value()));
        Some(old)
    }

    /// Grow by `GROWTH_FACTOR` and rehash. All entries are pulled out first,
    /// then reinserted into a fresh slot array, so no caller can observe a
    /// half-moved table.
    fn resize(&mut self) {
        let from = self.slots.len();
        let to = from * GROWTH_FACTOR;
        debug!(from, to, entries = self.len, "resizing table");

        let extracted: Vec<Entry<K, V>> = core::mem::take(&mut self.slots)
            .into_iter()
            .flatten()
            .flatten()
            .collect();

        self.slots = empty_slots(to);
        self.occupied = 0;
        self.claims = 0;
        for entry in extracted {
            let index = self.index_of(entry.key());
            let slot = &mut self.slots[index];
            if slot.is_none() {
                self.occupied += 1;
            }
            slot.get_or_insert_with(Bucket::new).push(entry);
            self.claims += 1;
        }
        debug_assert_eq!(
            self.len,
            self.slots.iter().flatten().map(Bucket::len).sum::<usize>()
        );
    }
}

impl<K, Q, V, S> core::ops::Index<&Q> for EventDictionary<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Panics if `key` is absent.
    fn index(&self, key: &Q) -> &V {
        match self.try_get(key) {
            Some(v) => v,
            None => panic!("key not found in EventDictionary"),
        }
    }
}

impl<K, V, S> fmt::Debug for EventDictionary<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|e| (e.key(), e.value())))
            .finish()
    }
}

type SlotsIter<'a, K, V> = core::iter::Flatten<
    core::iter::Flatten<core::slice::Iter<'a, Option<Bucket<K, V>>>>,
>;

/// Iterator over the entries of an `EventDictionary`.
pub struct Iter<'a, K, V> {
    inner: SlotsIter<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let next = self.inner.next()?;
        self.remaining -= 1;
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a EventDictionary<K, V, S> {
    type Item = &'a Entry<K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator; yields entries in the same order as [`Iter`].
pub struct IntoIter<K, V> {
    inner: core::iter::Flatten<core::iter::Flatten<std::vec::IntoIter<Option<Bucket<K, V>>>>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = Entry<K, V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let next = self.inner.next()?;
        self.remaining -= 1;
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V, S> IntoIterator for EventDictionary<K, V, S> {
    type Item = Entry<K, V>;
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.len,
            inner: self.slots.into_iter().flatten().flatten(),
        }
    }
}
