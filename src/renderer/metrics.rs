//! Per-frame counters for the board renderer.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::Serialize;

const HISTORY: usize = 120;

/// Tracks render cost over the last frames.
pub struct FrameMetrics {
    frame_times: VecDeque<Duration>,
    last_frame_start: Instant,
    pub hexes_drawn: usize,
    pub sprites_drawn: usize,
    pub sprites_skipped: usize,
    pub frames: u64,
}

/// Serializable snapshot of [`FrameMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub frames: u64,
    pub hexes_drawn: usize,
    pub sprites_drawn: usize,
    pub sprites_skipped: usize,
    pub avg_frame_ms: f32,
    pub max_frame_ms: f32,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(HISTORY),
            last_frame_start: Instant::now(),
            hexes_drawn: 0,
            sprites_drawn: 0,
            sprites_skipped: 0,
            frames: 0,
        }
    }

    /// Call at the start of each frame; resets the per-frame counters.
    pub fn begin_frame(&mut self) {
        self.last_frame_start = Instant::now();
        self.hexes_drawn = 0;
        self.sprites_drawn = 0;
        self.sprites_skipped = 0;
    }

    pub fn end_frame(&mut self) {
        let elapsed = self.last_frame_start.elapsed();
        self.frame_times.push_back(elapsed);
        if self.frame_times.len() > HISTORY {
            self.frame_times.pop_front();
        }
        self.frames += 1;
    }

    pub fn record_hex(&mut self) {
        self.hexes_drawn += 1;
    }

    pub fn record_sprites(&mut self, drawn: usize, skipped: usize) {
        self.sprites_drawn += drawn;
        self.sprites_skipped += skipped;
    }

    /// Average frame time in milliseconds over the history window
    pub fn avg_frame_time_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let sum: Duration = self.frame_times.iter().sum();
        sum.as_secs_f32() * 1000.0 / self.frame_times.len() as f32
    }

    pub fn max_frame_time_ms(&self) -> f32 {
        self.frame_times
            .iter()
            .max()
            .map(|d| d.as_secs_f32() * 1000.0)
            .unwrap_or(0.0)
    }

    pub fn last_frame_time_ms(&self) -> f32 {
        self.frame_times
            .back()
            .map(|d| d.as_secs_f32() * 1000.0)
            .unwrap_or(0.0)
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            frames: self.frames,
            hexes_drawn: self.hexes_drawn,
            sprites_drawn: self.sprites_drawn,
            sprites_skipped: self.sprites_skipped,
            avg_frame_ms: self.avg_frame_time_ms(),
            max_frame_ms: self.max_frame_time_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_recording() {
        let mut metrics = FrameMetrics::new();

        metrics.begin_frame();
        metrics.record_hex();
        metrics.record_hex();
        metrics.record_sprites(3, 5);
        thread::sleep(Duration::from_millis(1));
        metrics.end_frame();

        assert_eq!(metrics.hexes_drawn, 2);
        assert_eq!(metrics.sprites_drawn, 3);
        assert_eq!(metrics.sprites_skipped, 5);
        assert_eq!(metrics.frames, 1);
        assert!(metrics.last_frame_time_ms() >= 1.0);
    }

    #[test]
    fn test_begin_frame_resets_counters() {
        let mut metrics = FrameMetrics::new();
        metrics.begin_frame();
        metrics.record_sprites(4, 1);
        metrics.end_frame();
        metrics.begin_frame();
        assert_eq!(metrics.sprites_drawn, 0);
        assert_eq!(metrics.summary().frames, 1);
    }

    #[test]
    fn test_empty_history() {
        let metrics = FrameMetrics::new();
        assert_eq!(metrics.avg_frame_time_ms(), 0.0);
        assert_eq!(metrics.max_frame_time_ms(), 0.0);
    }
}
