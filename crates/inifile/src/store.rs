//! Open-addressed hash table backing the document model.
//!
//! `Table<V>` maps owned string keys to values of type `V` using FNV-1a
//! (64-bit) over the raw key bytes, linear probing, and a power-of-two
//! capacity that starts at 16 and doubles once the table is half full.
//! The half-full bound guarantees every probe sequence terminates at an
//! empty slot.
//!
//! The table itself is not synchronized: the document holds one lock above
//! it and every public document operation runs under that lock.

/// Initial slot count. Always a power of two.
const INITIAL_CAPACITY: usize = 16;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the raw bytes of `key`.
fn fnv1a(key: &str) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in key.as_bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[derive(Debug, Clone)]
struct Entry<V> {
    key: String,
    value: V,
}

/// Open-addressed map from string keys to `V`, with slot-order iteration.
///
/// Keys are compared by byte-exact equality. Iteration order is a pure
/// function of the inserted keys (FNV is unseeded), so it is deterministic
/// within a process run.
#[derive(Debug, Clone)]
pub struct Table<V> {
    slots: Vec<Option<Entry<V>>>,
    len: usize,
}

impl<V> Table<V> {
    /// Creates an empty table with the initial capacity.
    pub fn new() -> Self {
        Self {
            slots: Self::empty_slots(INITIAL_CAPACITY),
            len: 0,
        }
    }

    fn empty_slots(capacity: usize) -> Vec<Option<Entry<V>>> {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        slots
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current slot count. Exposed for growth tests.
    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the slot holding `key`, or of the empty slot where it would
    /// be inserted. The table is never more than half full, so the probe
    /// always terminates.
    fn probe(&self, key: &str) -> usize {
        let mask = self.slots.len() - 1;
        let mut index = (fnv1a(key) as usize) & mask;
        loop {
            match &self.slots[index] {
                Some(entry) if entry.key != key => index = (index + 1) & mask,
                _ => return index,
            }
        }
    }

    /// Borrows the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.slots[self.probe(key)].as_ref().map(|e| &e.value)
    }

    /// Mutably borrows the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.probe(key);
        self.slots[index].as_mut().map(|e| &mut e.value)
    }

    /// Returns `true` if `key` is stored.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts or replaces the value under `key`.
    ///
    /// Returns the displaced value when `key` was already present. The
    /// original key allocation is kept on replacement.
    pub fn set(&mut self, key: &str, value: V) -> Option<V> {
        self.grow_if_needed();
        let index = self.probe(key);
        match &mut self.slots[index] {
            Some(entry) => Some(std::mem::replace(&mut entry.value, value)),
            slot @ None => {
                *slot = Some(Entry {
                    key: key.to_owned(),
                    value,
                });
                self.len += 1;
                None
            }
        }
    }

    /// Borrows the value under `key`, inserting `default()` first if absent.
    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> V) -> &mut V {
        self.grow_if_needed();
        let index = self.probe(key);
        if self.slots[index].is_none() {
            self.slots[index] = Some(Entry {
                key: key.to_owned(),
                value: default(),
            });
            self.len += 1;
        }
        match &mut self.slots[index] {
            Some(entry) => &mut entry.value,
            // The slot was just filled above.
            None => unreachable!("probed slot is occupied after insertion"),
        }
    }

    fn grow_if_needed(&mut self) {
        if self.len >= self.slots.len() / 2 {
            self.grow();
        }
    }

    /// Doubles the slot count and re-homes every entry.
    fn grow(&mut self) {
        let new_capacity = self.slots.len() * 2;
        let old = std::mem::replace(&mut self.slots, Self::empty_slots(new_capacity));
        let mask = new_capacity - 1;
        for entry in old.into_iter().flatten() {
            let mut index = (fnv1a(&entry.key) as usize) & mask;
            while self.slots[index].is_some() {
                index = (index + 1) & mask;
            }
            self.slots[index] = Some(entry);
        }
    }

    /// Iterates `(key, value)` pairs in slot order.
    ///
    /// The borrow checker prevents mutation while an iterator is live.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|e| (e.key.as_str(), &e.value)))
    }

    /// Iterates keys in slot order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(k, _)| k)
    }
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_known_vectors() {
        // Reference values for 64-bit FNV-1a.
        assert_eq!(fnv1a(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a("a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_get_on_empty_table_is_none() {
        let table: Table<String> = Table::new();
        assert_eq!(table.get("missing"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_set_then_get_returns_value() {
        let mut table = Table::new();
        assert_eq!(table.set("host", "localhost".to_string()), None);
        assert_eq!(table.get("host").map(String::as_str), Some("localhost"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_set_existing_key_replaces_and_returns_old_value() {
        let mut table = Table::new();
        table.set("port", "80".to_string());
        let old = table.set("port", "8080".to_string());
        assert_eq!(old.as_deref(), Some("80"));
        assert_eq!(table.get("port").map(String::as_str), Some("8080"));
        assert_eq!(table.len(), 1, "replacement must not change the length");
    }

    #[test]
    fn test_keys_are_compared_byte_exact() {
        let mut table = Table::new();
        table.set("Key", 1u32);
        table.set("key", 2u32);
        assert_eq!(table.get("Key"), Some(&1));
        assert_eq!(table.get("key"), Some(&2));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_grows_when_half_full() {
        let mut table = Table::new();
        assert_eq!(table.capacity(), 16);
        for i in 0..8 {
            table.set(&format!("k{i}"), i);
        }
        // Eight entries exactly fill half of the initial 16 slots; the
        // next insert doubles first.
        assert_eq!(table.capacity(), 16);
        table.set("k8", 8);
        assert_eq!(table.capacity(), 32);
        // All entries survive the re-home.
        for i in 0..9 {
            assert_eq!(table.get(&format!("k{i}")), Some(&i));
        }
    }

    #[test]
    fn test_survives_many_insertions() {
        let mut table = Table::new();
        for i in 0..1000 {
            table.set(&format!("key-{i}"), i);
        }
        assert_eq!(table.len(), 1000);
        for i in 0..1000 {
            assert_eq!(table.get(&format!("key-{i}")), Some(&i));
        }
    }

    #[test]
    fn test_iteration_visits_every_entry_once() {
        let mut table = Table::new();
        for i in 0..50 {
            table.set(&format!("k{i}"), i);
        }
        let mut seen: Vec<i32> = table.iter().map(|(_, v)| *v).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_iteration_order_is_stable_for_same_keys() {
        let build = || {
            let mut t = Table::new();
            for key in ["alpha", "beta", "gamma", "delta"] {
                t.set(key, key.len());
            }
            t.keys().map(str::to_owned).collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_get_or_insert_with_creates_once() {
        let mut table: Table<Vec<u8>> = Table::new();
        table.get_or_insert_with("section", Vec::new).push(1);
        table.get_or_insert_with("section", Vec::new).push(2);
        assert_eq!(table.get("section"), Some(&vec![1, 2]));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_string_is_a_valid_key() {
        let mut table = Table::new();
        table.set("", "global".to_string());
        assert_eq!(table.get("").map(String::as_str), Some("global"));
    }
}
