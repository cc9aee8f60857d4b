use quarry_core::stmt::Value;

use std::collections::HashMap;

/// The last instance seen per primary key, bounded.
///
/// Eviction is least-recently-used via a monotonic stamp per entry.
/// Capacities run in the hundreds, so the evict-time scan for the stalest
/// stamp stays cheap. A capacity of zero disables caching entirely.
pub(super) struct InstanceCache<T> {
    capacity: usize,
    next_stamp: u64,
    entries: HashMap<Key, Entry<T>>,
}

struct Entry<T> {
    stamp: u64,
    instance: T,
}

impl<T: Clone> InstanceCache<T> {
    pub(super) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            next_stamp: 0,
            entries: HashMap::new(),
        }
    }

    /// The cached instance for `key`, freshening its stamp.
    pub(super) fn get(&mut self, key: &[Value]) -> Option<T> {
        let stamp = self.stamp();
        let entry = self.entries.get_mut(&Key::new(key))?;
        entry.stamp = stamp;
        Some(entry.instance.clone())
    }

    /// Stores `instance` under `key`, evicting the stalest entry at capacity.
    pub(super) fn put(&mut self, key: Vec<Value>, instance: T) {
        if self.capacity == 0 {
            return;
        }

        let key = Key::new(&key);
        let stamp = self.stamp();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict();
        }

        self.entries.insert(key, Entry { stamp, instance });
    }

    fn stamp(&mut self) -> u64 {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        stamp
    }

    fn evict(&mut self) {
        let stalest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.stamp)
            .map(|(key, _)| key.clone());

        if let Some(stalest) = stalest {
            self.entries.remove(&stalest);
        }
    }
}

/// Primary key values as a hashable map key.
#[derive(Clone, PartialEq, Eq, Hash)]
struct Key(Vec<HashableValue>);

impl Key {
    fn new(values: &[Value]) -> Self {
        Self(values.iter().map(Into::into).collect())
    }
}

/// [`Value`] with `f64` keys hashed by bit pattern.
#[derive(Clone, PartialEq, Eq, Hash)]
enum HashableValue {
    Bool(bool),
    Bytes(Vec<u8>),
    F64(u64),
    I64(i64),
    Null,
    String(String),
}

impl From<&Value> for HashableValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(v) => Self::Bool(*v),
            Value::Bytes(v) => Self::Bytes(v.clone()),
            Value::F64(v) => Self::F64(v.to_bits()),
            Value::I64(v) => Self::I64(*v),
            Value::Null => Self::Null,
            Value::String(v) => Self::String(v.clone()),
        }
    }
}
