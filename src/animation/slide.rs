//! Sliding HUD panels

use std::time::Duration;

/// A panel that slides between a hidden and a shown offset (pixels) at a
/// constant rate, covering the full distance in `duration`.
#[derive(Debug, Clone, PartialEq)]
pub struct SlidingOverlay {
    hidden_offset: f64,
    shown_offset: f64,
    current: f64,
    shown: bool,
    duration: Duration,
}

impl SlidingOverlay {
    /// Starts hidden
    pub fn new(hidden_offset: f64, shown_offset: f64, duration: Duration) -> Self {
        Self {
            hidden_offset,
            shown_offset,
            current: hidden_offset,
            shown: false,
            duration,
        }
    }

    pub fn show(&mut self) {
        self.shown = true;
    }

    pub fn hide(&mut self) {
        self.shown = false;
    }

    pub fn toggle(&mut self) {
        self.shown = !self.shown;
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn offset(&self) -> f64 {
        self.current
    }

    fn target(&self) -> f64 {
        if self.shown {
            self.shown_offset
        } else {
            self.hidden_offset
        }
    }

    pub fn is_moving(&self) -> bool {
        self.current != self.target()
    }

    /// Fully retracted and not heading anywhere
    pub fn is_hidden(&self) -> bool {
        !self.shown && !self.is_moving()
    }

    /// Move towards the target by the distance covered in `elapsed`.
    /// Returns whether the offset changed.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let target = self.target();
        if self.current == target {
            return false;
        }
        let span = (self.shown_offset - self.hidden_offset).abs();
        let step = if self.duration.is_zero() {
            span
        } else {
            span * elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        let remaining = target - self.current;
        if remaining.abs() <= step {
            self.current = target;
        } else {
            self.current += step.copysign(remaining);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slides_in_over_duration() {
        let mut hud = SlidingOverlay::new(-200.0, 0.0, Duration::from_millis(200));
        assert!(!hud.advance(Duration::from_millis(20)));
        hud.show();
        assert!(hud.advance(Duration::from_millis(100)));
        assert!((hud.offset() + 100.0).abs() < 1e-9);
        assert!(hud.is_moving());
        hud.advance(Duration::from_millis(100));
        assert_eq!(hud.offset(), 0.0);
        assert!(!hud.is_moving());
        assert!(!hud.advance(Duration::from_millis(20)));
    }

    #[test]
    fn test_reverses_midway() {
        let mut hud = SlidingOverlay::new(0.0, 100.0, Duration::from_millis(100));
        hud.show();
        hud.advance(Duration::from_millis(60));
        hud.hide();
        hud.advance(Duration::from_millis(200));
        assert_eq!(hud.offset(), 0.0);
        assert!(hud.is_hidden());
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut hud = SlidingOverlay::new(0.0, 50.0, Duration::ZERO);
        hud.toggle();
        hud.advance(Duration::from_millis(1));
        assert_eq!(hud.offset(), 50.0);
    }
}
