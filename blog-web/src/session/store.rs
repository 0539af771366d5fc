//! Durable session storage.
//!
//! The session manager persists its token and user record through the
//! [`SessionStore`] trait so tests can substitute an in-memory fake for the
//! browser's local storage.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Storage key holding the raw bearer token.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Storage key holding the JSON-serialized user record.
pub const USER_KEY: &str = "user";

/// String key-value store that persists session state across restarts.
///
/// Both session keys are always written and cleared together by the
/// session manager. The store is shared, unsynchronized state (another tab
/// may race a write); last-write-wins is accepted.
pub trait SessionStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`. Write failures (quota, private browsing)
    /// are the implementation's concern and must not panic.
    fn set(&self, key: &str, value: &str);

    /// Remove the value stored under `key`, if any.
    fn remove(&self, key: &str);
}

impl<S: SessionStore + ?Sized> SessionStore for Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value);
    }

    fn remove(&self, key: &str) {
        (**self).remove(key);
    }
}

/// In-memory store for tests and native callers.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Store backed by the browser's `localStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSessionStore;

#[cfg(target_arch = "wasm32")]
impl LocalSessionStore {
    /// Create a handle to the browser's local storage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_arch = "wasm32")]
impl SessionStore for LocalSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        use gloo_storage::Storage;
        gloo_storage::LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        use gloo_storage::Storage;
        if let Err(err) = gloo_storage::LocalStorage::raw().set_item(key, value) {
            tracing::warn!("local storage write failed: {err:?}");
        }
    }

    fn remove(&self, key: &str) {
        use gloo_storage::Storage;
        if let Err(err) = gloo_storage::LocalStorage::raw().remove_item(key) {
            tracing::warn!("local storage removal failed: {err:?}");
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get(AUTH_TOKEN_KEY), None);

        store.set(AUTH_TOKEN_KEY, "tok");
        store.set(USER_KEY, "{}");
        assert_eq!(store.get(AUTH_TOKEN_KEY).as_deref(), Some("tok"));
        assert_eq!(store.len(), 2);

        store.remove(AUTH_TOKEN_KEY);
        assert_eq!(store.get(AUTH_TOKEN_KEY), None);
        assert_eq!(store.get(USER_KEY).as_deref(), Some("{}"));
    }

    #[test]
    fn memory_store_overwrites() {
        let store = MemorySessionStore::new();
        store.set(AUTH_TOKEN_KEY, "first");
        store.set(AUTH_TOKEN_KEY, "second");
        assert_eq!(store.get(AUTH_TOKEN_KEY).as_deref(), Some("second"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rc_store_delegates() {
        let store = Rc::new(MemorySessionStore::new());
        let handle = Rc::clone(&store);
        handle.set(USER_KEY, "{}");
        assert_eq!(store.get(USER_KEY).as_deref(), Some("{}"));
    }
}
