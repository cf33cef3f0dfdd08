//! Drives an `EventDictionary` through adds, removals, updates and lookups,
//! reporting each notification through `tracing`.
//!
//! Set `RUST_LOG=debug` to also see resize and clear events from the table.
//! An optional first argument names a key to look up at the end.

use event_dictionary::{error::require, DictError, EventDictionary};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const ITEMS: u64 = 25;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s >> 33)
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> Result<(), DictError> {
    init_logging();

    let mut dict: EventDictionary<String, u64> = EventDictionary::new();
    dict.add("1".to_string(), 1)?;

    dict.subscribe_add(|entry| info!(key = %entry.key(), value = entry.value(), "added"));
    dict.subscribe_remove(|key| info!(%key, "removed"));
    dict.subscribe_update(|key, old, new| info!(%key, old, new, "updated"));

    info!("add test");
    for i in 0..ITEMS {
        let key = i.to_string();
        if let Err(e) = dict.add(key.clone(), i) {
            warn!(%key, error = %e, "add rejected");
        }
    }
    info!(count = dict.len(), capacity = dict.capacity(), "after adds");

    info!("remove test");
    for n in lcg(7).take(10) {
        let key = (n % ITEMS).to_string();
        if !dict.remove(key.as_str()) {
            warn!(%key, "nothing to remove");
        }
    }

    info!("update test");
    for (n, value) in lcg(11).zip(lcg(13)).take(10) {
        let key = (n % ITEMS).to_string();
        if let Err(e) = dict.update(key.as_str(), value % 100) {
            warn!(%key, error = %e, "update rejected");
        }
    }

    info!("get test");
    for n in lcg(17).take(10) {
        // Keys past ITEMS are never present.
        let key = (n % (ITEMS + 10)).to_string();
        match dict.get(key.as_str()) {
            Ok(value) => info!(%key, value, "found"),
            Err(e) => warn!(%key, error = %e, "lookup failed"),
        }
    }

    match require(std::env::args().nth(1), "key") {
        Ok(key) => match dict.try_get(key.as_str()) {
            Some(value) => info!(%key, value, "requested key"),
            None => warn!(%key, "requested key not present"),
        },
        Err(e) => info!(error = %e, "no key requested"),
    }

    info!(count = dict.len(), capacity = dict.capacity(), "dictionary");
    for entry in &dict {
        info!(key = %entry.key(), value = entry.value(), "item");
    }
    Ok(())
}
