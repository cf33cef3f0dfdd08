// EventDictionary property tests.
//
// Model: a hashbrown::HashMap holding the expected contents, plus counters
// for each notification channel.
//
// Invariants checked after every step:
//  - len() == model.len() == number of entries produced by iter().
//  - every model key is found with the model's value; every iterated entry
//    is in the model.
//  - occupied_slots() <= len() and capacity() never decreases except on clear.
//  - each successful add/update/remove fires exactly one notification on
//    its own channel and none on the others; failures fire nothing.
use event_dictionary::{DictError, EventDictionary, INITIAL_CAPACITY};
use hashbrown::HashMap;
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Default)]
struct Counts {
    added: Cell<usize>,
    removed: Cell<usize>,
    updated: Cell<usize>,
}

impl Counts {
    fn snapshot(&self) -> (usize, usize, usize) {
        (self.added.get(), self.removed.get(), self.updated.get())
    }
}

fn observed() -> (EventDictionary<String, i32>, Rc<Counts>) {
    let counts = Rc::new(Counts::default());
    let mut m: EventDictionary<String, i32> = EventDictionary::new();
    let c = counts.clone();
    m.subscribe_add(move |_| c.added.set(c.added.get() + 1));
    let c = counts.clone();
    m.subscribe_remove(move |_| c.removed.set(c.removed.get() + 1));
    let c = counts.clone();
    m.subscribe_update(move |_, _, _| c.updated.set(c.updated.get() + 1));
    (m, counts)
}

proptest! {
    #[test]
    fn prop_matches_model(ops in proptest::collection::vec((0u8..=5u8, 0usize..40usize, any::<i32>()), 1..200)) {
        let (mut m, counts) = observed();
        let mut model: HashMap<String, i32> = HashMap::new();
        let mut last_capacity = m.capacity();

        for (op, raw_k, value) in ops {
            let key = format!("k{}", raw_k);
            let before = counts.snapshot();
            let (a, r, u) = before;
            match op {
                // add
                0 => {
                    let res = m.add(key.clone(), value);
                    if model.contains_key(&key) {
                        prop_assert_eq!(res, Err(DictError::AlreadyExists));
                        prop_assert_eq!(counts.snapshot(), before);
                    } else {
                        prop_assert_eq!(res, Ok(()));
                        model.insert(key.clone(), value);
                        prop_assert_eq!(counts.snapshot(), (a + 1, r, u));
                    }
                }
                // remove
                1 => {
                    let removed = m.remove(key.as_str());
                    prop_assert_eq!(removed, model.remove(&key).is_some());
                    let expected = if removed { (a, r + 1, u) } else { before };
                    prop_assert_eq!(counts.snapshot(), expected);
                    prop_assert!(m.get(key.as_str()).is_err());
                }
                // update
                2 => {
                    let res = m.update(key.as_str(), value);
                    match model.get_mut(&key) {
                        Some(slot) => {
                            prop_assert_eq!(res, Ok(*slot));
                            *slot = value;
                            prop_assert_eq!(counts.snapshot(), (a, r, u + 1));
                        }
                        None => {
                            prop_assert_eq!(res, Err(DictError::NotFound));
                            prop_assert_eq!(counts.snapshot(), before);
                        }
                    }
                }
                // set
                3 => {
                    let existed = model.insert(key.clone(), value).is_some();
                    m.set(key.clone(), value);
                    let expected = if existed { (a, r, u + 1) } else { (a + 1, r, u) };
                    prop_assert_eq!(counts.snapshot(), expected);
                }
                // lookup
                4 => {
                    prop_assert_eq!(m.try_get(key.as_str()), model.get(&key));
                    prop_assert_eq!(counts.snapshot(), before);
                }
                // occasional clear
                5 => {
                    if raw_k % 8 == 0 {
                        m.clear();
                        model.clear();
                        prop_assert_eq!(m.capacity(), INITIAL_CAPACITY);
                        prop_assert_eq!(counts.snapshot(), before);
                        last_capacity = INITIAL_CAPACITY;
                    }
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(m.len(), model.len());
            prop_assert_eq!(m.iter().count(), model.len());
            prop_assert!(m.occupied_slots() <= m.len());
            prop_assert!(m.capacity() >= last_capacity);
            last_capacity = m.capacity();
        }

        for entry in &m {
            prop_assert_eq!(model.get(entry.key()), Some(entry.value()));
        }
        for (k, v) in &model {
            prop_assert_eq!(m.get(k.as_str()), Ok(v));
        }
    }
}

// Construction from a mapping reproduces it exactly.
proptest! {
    #[test]
    fn prop_built_from_mapping_round_trips(source in proptest::collection::hash_map(any::<u16>(), any::<i64>(), 0..120)) {
        let m: EventDictionary<u16, i64> = EventDictionary::try_from_iter(source.clone()).unwrap();
        prop_assert_eq!(m.len(), source.len());
        let rebuilt: std::collections::HashMap<u16, i64> =
            m.iter().map(|e| (*e.key(), *e.value())).collect();
        prop_assert_eq!(rebuilt, source);
    }
}
