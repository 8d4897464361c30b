//! Tick sources
//!
//! The host only delivers frame timestamps. A [`FrameClock`] turns them into
//! whole simulation ticks for one of two cadences, so game logic never sees
//! wall-clock jitter.

use crate::consts::{FRAME_MS, MAX_SUBSTEPS};

/// How often a game wants to be ticked
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cadence {
    /// Discrete fixed-period timer (snake, countdowns)
    Interval { period_ms: f64 },
    /// Continuous motion, one step per 60 Hz display frame
    Frame,
}

impl Cadence {
    /// Length of one tick in milliseconds
    pub fn step_ms(&self) -> f64 {
        match *self {
            Cadence::Interval { period_ms } => period_ms,
            Cadence::Frame => FRAME_MS,
        }
    }
}

/// Accumulator that converts frame timestamps into tick counts
#[derive(Debug, Clone)]
pub struct FrameClock {
    cadence: Cadence,
    last_ms: Option<f64>,
    accumulator: f64,
}

impl FrameClock {
    pub fn new(cadence: Cadence) -> Self {
        Self {
            cadence,
            last_ms: None,
            accumulator: 0.0,
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Forget elapsed time (the next frame only re-anchors the clock)
    pub fn reset(&mut self) {
        self.last_ms = None;
        self.accumulator = 0.0;
    }

    /// Advance to `now_ms` and return how many ticks are due
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let step = self.cadence.step_ms();
        let Some(last) = self.last_ms.replace(now_ms) else {
            return 0;
        };

        // Clamp long gaps (hidden tab, debugger) so we never replay a backlog
        let dt = (now_ms - last).clamp(0.0, step * (MAX_SUBSTEPS as f64 + 0.5));
        self.accumulator += dt;

        let mut ticks = 0;
        while self.accumulator >= step && ticks < MAX_SUBSTEPS {
            self.accumulator -= step;
            ticks += 1;
        }
        if ticks == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(step);
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_only_anchors() {
        let mut clock = FrameClock::new(Cadence::Frame);
        assert_eq!(clock.advance(1000.0), 0);
        assert_eq!(clock.advance(1000.0 + FRAME_MS + 0.5), 1);
    }

    #[test]
    fn test_interval_accumulates() {
        let mut clock = FrameClock::new(Cadence::Interval { period_ms: 100.0 });
        clock.advance(0.0);
        assert_eq!(clock.advance(60.0), 0);
        assert_eq!(clock.advance(120.0), 1);
        assert_eq!(clock.advance(330.0), 2);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut clock = FrameClock::new(Cadence::Frame);
        clock.advance(0.0);
        assert_eq!(clock.advance(10_000.0), MAX_SUBSTEPS);
        // Backlog was discarded, not queued
        assert_eq!(clock.advance(10_000.0 + 1.0), 0);
    }

    #[test]
    fn test_reset_reanchors() {
        let mut clock = FrameClock::new(Cadence::Interval { period_ms: 1000.0 });
        clock.advance(0.0);
        clock.advance(900.0);
        clock.reset();
        assert_eq!(clock.advance(5000.0), 0);
        assert_eq!(clock.advance(5999.0), 0);
        assert_eq!(clock.advance(6000.0), 1);
    }
}
