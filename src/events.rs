//! Notification channels.
//!
//! A channel is an ordered list of boxed listeners. Listeners live in a
//! `SlotMap` so that the id handed back by `subscribe` is generational: once
//! a listener is removed its id never resolves again, even if the slot is
//! reused. Registration order is tracked separately because slot order is
//! not insertion order.

use crate::entry::Entry;
use slotmap::{Key, SlotMap};

slotmap::new_key_type! {
    /// Subscription to the "added" channel.
    pub struct AddListenerId;
    /// Subscription to the "removed" channel.
    pub struct RemoveListenerId;
    /// Subscription to the "updated" channel.
    pub struct UpdateListenerId;
}

/// Called with the newly inserted entry.
pub type AddListener<K, V> = dyn FnMut(&Entry<K, V>);
/// Called with the key that was removed.
pub type RemoveListener<K> = dyn FnMut(&K);
/// Called with the key, the previous value and the new value.
pub type UpdateListener<K, V> = dyn FnMut(&K, &V, &V);

pub(crate) struct Channel<Id: Key, F: ?Sized> {
    listeners: SlotMap<Id, Box<F>>,
    order: Vec<Id>,
}

impl<Id: Key, F: ?Sized> Channel<Id, F> {
    pub(crate) fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn subscribe(&mut self, listener: Box<F>) -> Id {
        let id = self.listeners.insert(listener);
        self.order.push(id);
        id
    }

    /// Returns false if `id` was never issued by this channel or is already gone.
    pub(crate) fn unsubscribe(&mut self, id: Id) -> bool {
        if self.listeners.remove(id).is_none() {
            return false;
        }
        self.order.retain(|&other| other != id);
        true
    }

    /// Invoke every listener in registration order.
    pub(crate) fn emit(&mut self, mut call: impl FnMut(&mut F)) {
        for &id in &self.order {
            if let Some(listener) = self.listeners.get_mut(id) {
                call(&mut **listener);
            }
        }
    }
}

impl<Id: Key, F: ?Sized> Default for Channel<Id, F> {
    fn default() -> Self {
        Self::new()
    }
}
