//! In-memory store, used by tests and throwaway boards

use std::collections::BTreeMap;

use super::{validate_key, KeyValueStore, Result};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    /// Number of `set`/`remove` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.writes += 1;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.writes += 1;
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_writes() {
        let mut store = MemoryStore::new();
        assert_eq!(store.writes(), 0);
        store.set("a", "1").unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.writes(), 2);
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_with_value_seeds_without_counting() {
        let store = MemoryStore::new().with_value("user-ip", "unknown");
        assert_eq!(store.get("user-ip").unwrap().as_deref(), Some("unknown"));
        assert_eq!(store.writes(), 0);
    }
}
