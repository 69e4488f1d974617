//! Per-tick animation state.

use std::time::Duration;

use crate::animation::moving::{MoveAdvancer, MoveEvent, Waypoint};
use crate::animation::slide::SlidingOverlay;
use crate::core::config::RenderConfig;
use crate::core::types::EntityId;

/// HUD panel travel in pixels
const HUD_TRAVEL: f64 = 240.0;

/// Result of one tick
#[derive(Debug, Default, PartialEq)]
pub struct TickOutcome {
    pub moves: Vec<MoveEvent>,
    pub overlay_moved: bool,
}

impl TickOutcome {
    /// Whether anything visible changed
    pub fn changed(&self) -> bool {
        self.overlay_moved || !self.moves.is_empty()
    }
}

/// Everything a tick advances: the HUD slide and the moving units.
#[derive(Debug, Clone)]
pub struct AnimationScheduler {
    pub hud: SlidingOverlay,
    moves: MoveAdvancer,
    ticks: u64,
}

impl AnimationScheduler {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            hud: SlidingOverlay::new(-HUD_TRAVEL, 0.0, config.hud_slide()),
            moves: MoveAdvancer::new(config.move_step_delay()),
            ticks: 0,
        }
    }

    pub fn reconfigure(&mut self, config: &RenderConfig) {
        self.moves.set_step_delay(config.move_step_delay());
        let shown = self.hud.is_shown();
        self.hud = SlidingOverlay::new(-HUD_TRAVEL, 0.0, config.hud_slide());
        if shown {
            self.hud.show();
        }
    }

    pub fn start_moving(&mut self, entity: EntityId, path: Vec<Waypoint>) -> bool {
        self.moves.start(entity, path)
    }

    pub fn cancel_moving(&mut self, entity: EntityId) -> bool {
        self.moves.cancel(entity).is_some()
    }

    /// Whether any unit still has waypoints left
    pub fn has_movers(&self) -> bool {
        !self.moves.is_idle()
    }

    pub fn is_moving(&self, entity: EntityId) -> bool {
        self.moves.is_moving(entity)
    }

    pub fn is_idle(&self) -> bool {
        self.moves.is_idle() && !self.hud.is_moving()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick(&mut self, elapsed: Duration) -> TickOutcome {
        self.ticks += 1;
        let overlay_moved = self.hud.advance(elapsed);
        let moves = self.moves.advance(elapsed);
        tracing::trace!(
            "Tick {} ({:?}): {} move events, overlay moved: {}",
            self.ticks,
            elapsed,
            moves.len(),
            overlay_moved
        );
        TickOutcome {
            moves,
            overlay_moved,
        }
    }
}
