use std::collections::HashMap;
use std::sync::RwLock;

/// Session-scoped advisory storage for identifiers discovered during
/// resolution (company id, rep profile id).
///
/// Values are hints only: callers must tolerate absence or staleness and
/// re-probe the backend. Concurrent access is last-write-wins.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn clear(&self);
}

/// Key under which a user's resolved company id is cached.
pub fn company_id_key(user_id: &str) -> String {
    format!("{user_id}:company_id")
}

/// Key under which a user's resolved rep profile id is cached.
pub fn profile_id_key(user_id: &str) -> String {
    format!("{user_id}:profile_id")
}

/// Process-local `SessionStore` backed by a `RwLock<HashMap>`.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .expect("session lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .expect("session lock poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .write()
            .expect("session lock poisoned")
            .remove(key);
    }

    fn clear(&self) {
        self.entries.write().expect("session lock poisoned").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove_roundtrip() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v1");
        assert_eq!(store.get("k").as_deref(), Some("v1"));
        store.set("k", "v2"); // last write wins
        assert_eq!(store.get("k").as_deref(), Some("v2"));
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_clear_drops_all_entries() {
        let store = InMemorySessionStore::new();
        store.set("a", "1");
        store.set("b", "2");
        store.clear();
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b"), None);
    }

    #[test]
    fn test_keys_are_namespaced_per_user() {
        assert_ne!(company_id_key("u1"), company_id_key("u2"));
        assert_ne!(company_id_key("u1"), profile_id_key("u1"));
    }
}
