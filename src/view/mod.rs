//! Viewport and input: scroll/zoom, pointer gestures, semantic events, and
//! the [`BoardView`] that ties the whole renderer together.

pub mod board_view;
pub mod events;
pub mod input;
pub mod tooltip;
pub mod viewport;

pub use board_view::BoardView;
pub use events::{BoardEvent, EventSink};
pub use input::{Gesture, GestureClassifier, Modifiers, PointerButton, PointerEvent};
pub use tooltip::tooltip_at;
pub use viewport::Viewport;
