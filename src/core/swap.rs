//! Whole-value replacement for state shared with the draw path.
//!
//! Writers build a complete new value and swap the pointer; readers take a
//! cheap `Arc` clone and keep a consistent snapshot for as long as they need.

use std::sync::{Arc, RwLock};

/// A value that is only ever replaced wholesale.
#[derive(Debug, Default)]
pub struct Swap<T> {
    inner: RwLock<Arc<T>>,
}

impl<T> Swap<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(Arc::new(value)),
        }
    }

    /// Current snapshot
    pub fn load(&self) -> Arc<T> {
        // A panicked writer cannot leave a half-built value behind, so a
        // poisoned lock still holds a complete snapshot.
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Publish a fully built replacement
    pub fn store(&self, value: T) {
        self.store_arc(Arc::new(value));
    }

    pub fn store_arc(&self, value: Arc<T>) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = value;
    }

    /// Publish `value` only if `still_wanted` holds under the write lock.
    /// Returns whether it was published.
    pub fn store_if(&self, value: T, still_wanted: impl FnOnce() -> bool) -> bool {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if !still_wanted() {
            return false;
        }
        *guard = Arc::new(value);
        true
    }
}

impl<T: Clone> Swap<T> {
    /// Clone the current value, modify the copy, and publish it
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = (*self.load()).clone();
        f(&mut next);
        self.store(next);
    }
}
