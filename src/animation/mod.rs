//! Animation: the tick driver, unit movement, HUD slides and redraw
//! coalescing.

pub mod moving;
pub mod redraw;
pub mod scheduler;
pub mod slide;
pub mod ticker;

pub use moving::{MoveAdvancer, MoveEvent, MovingUnit, Waypoint};
pub use redraw::RedrawFlag;
pub use scheduler::{AnimationScheduler, TickOutcome};
pub use slide::SlidingOverlay;
pub use ticker::{spawn_ticker, RenderMessage};
