//! Field overlay recomputation.
//!
//! Recomputing is quadratic in radius, so it only runs when the source set
//! changes. A newer request supersedes any computation still in flight: the
//! stale result is dropped instead of published.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tokio::task::JoinHandle;

use crate::core::swap::Swap;
use crate::field::overlay::FieldOverlay;
use crate::field::source::FieldSource;
use crate::hex::Coord;

/// Board extents used to clip field coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBounds {
    pub width: i32,
    pub height: i32,
}

impl FieldBounds {
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }
}

/// Owns the published overlay and the generation counter.
#[derive(Clone)]
pub struct FieldCalculator {
    generation: Arc<AtomicU64>,
    overlay: Arc<Swap<FieldOverlay>>,
}

impl Default for FieldCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldCalculator {
    pub fn new() -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            overlay: Arc::new(Swap::new(FieldOverlay::new())),
        }
    }

    /// The last published overlay
    pub fn overlay(&self) -> Arc<FieldOverlay> {
        self.overlay.load()
    }

    /// Recompute on the calling thread. Returns `false` when a newer request
    /// arrived first and this result was discarded.
    pub fn recompute(&self, sources: Vec<FieldSource>, bounds: FieldBounds) -> bool {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        run(&self.generation, &self.overlay, token, &sources, bounds)
    }

    /// Recompute on the blocking pool
    pub fn recompute_async(&self, sources: Vec<FieldSource>, bounds: FieldBounds) -> JoinHandle<bool> {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let overlay = Arc::clone(&self.overlay);
        tokio::task::spawn_blocking(move || run(&generation, &overlay, token, &sources, bounds))
    }

    /// Drop the overlay and cancel anything in flight
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.overlay.store(FieldOverlay::new());
    }
}

fn run(
    generation: &AtomicU64,
    target: &Swap<FieldOverlay>,
    token: u64,
    sources: &[FieldSource],
    bounds: FieldBounds,
) -> bool {
    let start = Instant::now();
    let is_current = || generation.load(Ordering::SeqCst) == token;

    let Some(overlay) = compute(sources, bounds, is_current) else {
        tracing::debug!("Field recompute {} superseded", token);
        return false;
    };
    let tinted = overlay.len();
    if !target.store_if(overlay, is_current) {
        tracing::debug!("Field recompute {} superseded", token);
        return false;
    }

    tracing::debug!(
        "Field overlay: {} sources, {} tinted hexes, {:?}",
        sources.len(),
        tinted,
        start.elapsed()
    );
    true
}

/// Coverage of every source in parallel, then the blend in source order so
/// the result does not depend on thread scheduling. `None` if `is_current`
/// turns false between the two passes.
fn compute(
    sources: &[FieldSource],
    bounds: FieldBounds,
    is_current: impl Fn() -> bool,
) -> Option<FieldOverlay> {
    let coverage: Vec<Vec<Coord>> = sources
        .par_iter()
        .map(|s| {
            s.coverage()
                .into_iter()
                .filter(|c| bounds.contains(*c))
                .collect()
        })
        .collect();

    if !is_current() {
        return None;
    }

    let mut overlay = FieldOverlay::new();
    for (source, coords) in sources.iter().zip(coverage) {
        for coord in coords {
            overlay.apply(coord, source.tint);
        }
    }
    Some(overlay)
}

/// One-shot computation without publication
pub fn compute_overlay(sources: &[FieldSource], bounds: FieldBounds) -> FieldOverlay {
    compute(sources, bounds, || true).unwrap_or_default()
}
