//! The browser-local vote cache.
//!
//! This is a hint for the UI, nothing more: clearing site data or switching
//! browsers resets it, and the server never sees it.

use std::cell::RefCell;
use std::collections::HashMap;

pub const VOTED_KEY: &str = "collegeconnect:has_voted";
pub const COUNT_KEY: &str = "collegeconnect:interested_count";

pub trait VoteCache {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);

    fn has_voted(&self) -> bool {
        self.get(VOTED_KEY).as_deref() == Some("true")
    }

    fn mark_voted(&self) {
        self.set(VOTED_KEY, "true");
    }

    fn cached_count(&self) -> Option<u64> {
        self.get(COUNT_KEY)?.trim().parse().ok()
    }

    fn store_count(&self, count: u64) {
        self.set(COUNT_KEY, &count.to_string());
    }
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RefCell<HashMap<String, String>>,
}

impl VoteCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// `window.localStorage`, when the browser allows it.
#[cfg(target_arch = "wasm32")]
pub struct BrowserCache {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl BrowserCache {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable, votes will not be remembered");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl VoteCache for BrowserCache {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.set_item(key, value) {
                log::warn!("Failed to write {key} to localStorage: {e:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voted_flag_round_trips() {
        let cache = MemoryCache::default();
        assert!(!cache.has_voted());
        cache.mark_voted();
        assert!(cache.has_voted());
        assert_eq!(cache.get(VOTED_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn only_the_literal_true_counts_as_voted() {
        let cache = MemoryCache::default();
        cache.set(VOTED_KEY, "yes");
        assert!(!cache.has_voted());
    }

    #[test]
    fn unparseable_count_is_ignored() {
        let cache = MemoryCache::default();
        assert_eq!(cache.cached_count(), None);
        cache.set(COUNT_KEY, "lots");
        assert_eq!(cache.cached_count(), None);
        cache.store_count(42);
        assert_eq!(cache.cached_count(), Some(42));
    }
}
