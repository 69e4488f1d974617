//! Coalesced redraw requests

use std::sync::atomic::{AtomicBool, Ordering};

/// Any number of requests between two frames collapse into one redraw.
#[derive(Debug, Default)]
pub struct RedrawFlag {
    dirty: AtomicBool,
}

impl RedrawFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Consume the pending request, if any
    pub fn take(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }
}
