//! event-dictionary: a single-threaded, separate-chaining hash map that
//! notifies listeners whenever an entry is added, updated or removed.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the chaining table simple enough that every invariant can
//!   be checked by reading one function.
//! - Layers:
//!   - Bucket<K, V>: ordered chain for one slot. No hashing, no capacity,
//!     no uniqueness check; linear scans only.
//!   - EventDictionary<K, V, S>: owns `Vec<Option<Bucket>>`, routes keys by
//!     `hash(key) % capacity`, enforces unique keys, grows the slot array
//!     and dispatches notifications.
//!   - Channel: ordered listener registry per notification kind, keyed by
//!     generational ids.
//!
//! Constraints
//! - Single-threaded and non-reentrant: listeners get shared references
//!   into the table's data and cannot reach the table itself.
//! - Buckets exist only while non-empty; an empty slot is `None`.
//! - Resizing is stop-the-world: extract all entries, swap in a fresh slot
//!   array, reinsert. The table never shrinks except through `clear`.
//!
//! Growth
//! - Before inserting, if `occupied_slots / capacity > LOAD_FACTOR` the
//!   capacity is multiplied by `GROWTH_FACTOR`. The ratio counts slots
//!   holding a bucket, not entries, so heavy collisions do not trigger
//!   growth on their own.
//!
//! Notifications
//! - `add` fires the add channel with the new entry, `update` fires the
//!   update channel with (key, old, new), `remove` fires the remove channel
//!   with the key. Each fires exactly once, after the mutation is complete.
//! - `clear` and internal rehashing fire nothing.
//!
//! Notes and non-goals
//! - No mutable value access outside `update`/`set`, so no change can
//!   bypass the update channel.
//! - No persistence, no shrink-on-delete, no thread safety.

mod bucket;
mod entry;
pub mod error;
mod event_dictionary;
pub mod events;

// Public surface
pub use entry::Entry;
pub use error::{DictError, Result};
pub use event_dictionary::{
    EventDictionary, IntoIter, Iter, GROWTH_FACTOR, INITIAL_CAPACITY, LOAD_FACTOR,
};
pub use events::{AddListenerId, RemoveListenerId, UpdateListenerId};
