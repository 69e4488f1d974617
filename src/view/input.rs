//! Pointer gesture classification.
//!
//! Raw pointer events come in screen pixels; the classifier turns them into
//! clicks, double clicks, drags and popup requests. It knows nothing about
//! the board.

use std::time::Duration;

use crate::core::types::Point;

/// Two clicks closer than this in time and space form a double click
pub const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(400);
pub const DOUBLE_CLICK_DISTANCE: f64 = 5.0;
/// Movement past this (screen pixels) with the button held starts a drag
pub const DRAG_THRESHOLD: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }
}

/// Raw pointer input. `time` is any monotonic timestamp (time since the
/// view started is fine).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move {
        pos: Point,
    },
    Down {
        pos: Point,
        button: PointerButton,
        mods: Modifiers,
        time: Duration,
    },
    Up {
        pos: Point,
        button: PointerButton,
        mods: Modifiers,
        time: Duration,
    },
}

/// Classified gesture, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Hover(Point),
    Click { at: Point, mods: Modifiers },
    DoubleClick { at: Point },
    /// Incremental drag movement since the last event
    Drag { delta: Point },
    DragEnd,
    Popup { at: Point },
}

#[derive(Debug, Clone, Copy)]
struct Press {
    origin: Point,
    last: Point,
    dragging: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    press: Option<Press>,
    last_click: Option<(Point, Duration)>,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.dragging)
    }

    pub fn classify(&mut self, event: PointerEvent) -> Option<Gesture> {
        match event {
            PointerEvent::Move { pos } => match self.press.as_mut() {
                None => Some(Gesture::Hover(pos)),
                Some(press) => {
                    if !press.dragging && press.origin.distance(pos) > DRAG_THRESHOLD {
                        press.dragging = true;
                    }
                    if press.dragging {
                        let delta = pos - press.last;
                        press.last = pos;
                        Some(Gesture::Drag { delta })
                    } else {
                        None
                    }
                }
            },
            PointerEvent::Down {
                pos,
                button: PointerButton::Primary,
                ..
            } => {
                self.press = Some(Press {
                    origin: pos,
                    last: pos,
                    dragging: false,
                });
                None
            }
            PointerEvent::Down {
                pos,
                button: PointerButton::Secondary,
                ..
            } => Some(Gesture::Popup { at: pos }),
            PointerEvent::Up {
                pos,
                button: PointerButton::Primary,
                mods,
                time,
            } => {
                let press = self.press.take()?;
                if press.dragging {
                    self.last_click = None;
                    return Some(Gesture::DragEnd);
                }
                let double = self.last_click.is_some_and(|(at, t)| {
                    time.saturating_sub(t) <= DOUBLE_CLICK_TIME
                        && at.distance(pos) <= DOUBLE_CLICK_DISTANCE
                });
                if double {
                    self.last_click = None;
                    Some(Gesture::DoubleClick { at: pos })
                } else {
                    self.last_click = Some((pos, time));
                    Some(Gesture::Click { at: pos, mods })
                }
            }
            PointerEvent::Up {
                button: PointerButton::Secondary,
                ..
            } => None,
        }
    }
}
