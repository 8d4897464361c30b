//! Tower stacker
//!
//! A box slides back and forth above the tower. Dropping it keeps only the
//! part that overlaps the box below; missing entirely ends the run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Game, GameKind, InputOutcome, Phase};
use crate::clock::Cadence;
use crate::input::{Button, InputEvent};
use crate::ports::{GameEvent, SoundCue};
use crate::tuning::StackerTuning;

/// Box fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoxColor {
    /// Grey base platform
    Base,
    /// HSL hue in degrees (80% saturation, 50% lightness)
    Hue(f32),
}

/// One box of the tower
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: BoxColor,
}

impl StackBox {
    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Outcome of slicing the active box against the box below
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slice {
    /// No horizontal overlap at all
    Miss,
    /// Overlapping interval `[x, x + width]`
    Placed { x: f32, width: f32, perfect: bool },
}

/// Slice `active` against `prev`
///
/// Touching edges still count as a (zero-width) placement; only a strict gap
/// is a miss.
pub fn slice(active: &StackBox, prev: &StackBox) -> Slice {
    let (a_left, a_right) = (active.left(), active.right());
    let (p_left, p_right) = (prev.left(), prev.right());

    if a_left > p_right || a_right < p_left {
        return Slice::Miss;
    }

    if a_left >= p_left && a_right <= p_right {
        // Whole span survives
        return Slice::Placed {
            x: a_left,
            width: active.width,
            perfect: true,
        };
    }

    let left = a_left.max(p_left);
    let right = a_right.min(p_right);
    Slice::Placed {
        x: left,
        width: right - left,
        perfect: false,
    }
}

/// Tower stacker session
#[derive(Debug, Clone)]
pub struct Stacker {
    pub tuning: StackerTuning,
    /// Settled boxes, bottom to top (append-only)
    pub settled: Vec<StackBox>,
    /// The sliding box
    pub active: StackBox,
    pub speed: f32,
    /// +1 moving right, -1 moving left
    pub dir: f32,
    pub score: u64,
    /// Camera vertical offset (added to every box's y when drawing)
    pub scroll_y: f32,
    pub phase: Phase,
}

impl Stacker {
    pub fn new(tuning: StackerTuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let (w, h, box_h) = (tuning.width, tuning.height, tuning.box_height);

        let base = StackBox {
            x: w / 2.0 - tuning.base_width / 2.0,
            y: h - box_h,
            width: tuning.base_width,
            height: box_h,
            color: BoxColor::Base,
        };
        let active = StackBox {
            x: 0.0,
            y: h - box_h * 2.0,
            width: tuning.base_width,
            height: box_h,
            color: BoxColor::Hue(rng.random_range(0.0..360.0)),
        };

        Self {
            speed: tuning.start_speed,
            tuning,
            settled: vec![base],
            active,
            dir: 1.0,
            score: 0,
            scroll_y: 0.0,
            phase: Phase::Playing,
        }
    }

    /// Top of the tower
    pub fn top(&self) -> &StackBox {
        // The base box is created with the session and never removed
        &self.settled[self.settled.len() - 1]
    }

    /// Where the camera is heading
    pub fn camera_target(&self) -> f32 {
        let visible = self.tuning.height - self.tuning.box_height * self.tuning.camera_margin_boxes;
        (visible - self.active.y).max(0.0)
    }

    /// Drop the active box onto the tower
    pub fn drop_box(&mut self, events: &mut Vec<GameEvent>) -> InputOutcome {
        if self.phase != Phase::Playing {
            return InputOutcome::Ignored;
        }

        let (x, width, perfect) = match slice(&self.active, self.top()) {
            Slice::Miss => {
                log::info!("Stacker miss at height {} (score {})", self.settled.len(), self.score);
                self.phase = Phase::GameOver;
                events.push(GameEvent::GameOver(true));
                events.push(GameEvent::Cue(SoundCue::Cancel));
                return InputOutcome::Handled;
            }
            Slice::Placed { x, width, perfect } => (x, width, perfect),
        };

        if perfect {
            events.push(GameEvent::PerfectDrop);
            events.push(GameEvent::Cue(SoundCue::Select));
        }

        self.settled.push(StackBox {
            x,
            width,
            ..self.active
        });

        self.score += 1;
        self.speed += self.tuning.speed_step;
        events.push(GameEvent::Score(format!("SCORE: {}", self.score)));
        events.push(GameEvent::Cue(SoundCue::Nav));
        log::debug!("Stacker drop: x={:.1} width={:.1} perfect={}", x, width, perfect);

        // Next box enters from the side it was moving away from
        let next_x = if self.dir > 0.0 { 0.0 } else { self.tuning.width - width };
        self.active = StackBox {
            x: next_x,
            y: self.active.y - self.tuning.box_height,
            width,
            height: self.tuning.box_height,
            color: BoxColor::Hue((self.score * 15 % 360) as f32),
        };
        self.dir = -self.dir;

        InputOutcome::Handled
    }
}

impl Game for Stacker {
    fn kind(&self) -> GameKind {
        GameKind::Stacker
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn cadence(&self) -> Cadence {
        Cadence::Frame
    }

    fn tick(&mut self, _now_ms: f64, _events: &mut Vec<GameEvent>) {
        if self.phase != Phase::Playing {
            return;
        }

        self.active.x += self.speed * self.dir;
        if self.active.x <= 0.0 {
            self.active.x = 0.0;
            self.dir = 1.0;
        } else if self.active.right() >= self.tuning.width {
            self.active.x = self.tuning.width - self.active.width;
            self.dir = -1.0;
        }

        // First-order filter toward the target keeps the camera from jittering
        let target = self.camera_target();
        self.scroll_y += (target - self.scroll_y) * self.tuning.camera_gain;
    }

    fn input(&mut self, event: &InputEvent, _now_ms: f64, events: &mut Vec<GameEvent>) -> InputOutcome {
        match event {
            InputEvent::Press(Button::Cross) | InputEvent::Pointer { down: true, .. } => {
                if self.phase == Phase::GameOver {
                    InputOutcome::Restart
                } else {
                    self.drop_box(events)
                }
            }
            _ => InputOutcome::Ignored,
        }
    }

    fn announce(&self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::GameOver(false));
        events.push(GameEvent::Score("SCORE: 0".to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stacker() -> Stacker {
        Stacker::new(StackerTuning::default(), 1)
    }

    fn boxed(x: f32, width: f32) -> StackBox {
        StackBox {
            x,
            y: 0.0,
            width,
            height: 20.0,
            color: BoxColor::Base,
        }
    }

    #[test]
    fn test_base_box_is_centred() {
        let s = stacker();
        assert_eq!(s.settled.len(), 1);
        assert_eq!(s.top().left(), 60.0);
        assert_eq!(s.top().right(), 180.0);
        assert_eq!(s.active.width, 120.0);
        assert_eq!(s.active.y, 320.0 - 40.0);
    }

    #[test]
    fn test_perfect_stack_scenario() {
        let mut s = stacker();
        s.active.x = 60.0;
        let mut events = Vec::new();

        assert_eq!(s.drop_box(&mut events), InputOutcome::Handled);
        assert_eq!(s.settled.len(), 2);
        assert_eq!(s.top().left(), 60.0);
        assert_eq!(s.top().right(), 180.0);
        assert_eq!(s.score, 1);
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::PerfectDrop).count(),
            1
        );
        assert!(events.contains(&GameEvent::Cue(SoundCue::Select)));
        assert!(events.contains(&GameEvent::Cue(SoundCue::Nav)));
    }

    #[test]
    fn test_miss_scenario() {
        let mut s = stacker();
        s.active.x = 190.0;
        let mut events = Vec::new();

        s.drop_box(&mut events);
        assert_eq!(s.phase, Phase::GameOver);
        assert_eq!(s.settled.len(), 1);
        assert_eq!(s.score, 0);
        assert!(events.contains(&GameEvent::GameOver(true)));
        assert!(events.contains(&GameEvent::Cue(SoundCue::Cancel)));
        assert!(!events.contains(&GameEvent::PerfectDrop));
    }

    #[test]
    fn test_partial_overlap_narrows_box() {
        let mut s = stacker();
        s.active.x = 100.0; // [100, 220] over [60, 180]
        let mut events = Vec::new();
        s.drop_box(&mut events);

        let top = *s.top();
        assert_eq!(top.left(), 100.0);
        assert_eq!(top.width, 80.0);
        assert!(!events.contains(&GameEvent::PerfectDrop));
        // Next active box carries the narrowed width
        assert_eq!(s.active.width, 80.0);
    }

    #[test]
    fn test_overhang_left() {
        let result = slice(&boxed(20.0, 120.0), &boxed(60.0, 120.0));
        assert_eq!(
            result,
            Slice::Placed {
                x: 60.0,
                width: 80.0,
                perfect: false
            }
        );
    }

    #[test]
    fn test_touching_edge_is_not_a_miss() {
        let result = slice(&boxed(180.0, 120.0), &boxed(60.0, 120.0));
        assert!(matches!(result, Slice::Placed { width, .. } if width == 0.0));
    }

    #[test]
    fn test_drop_ramps_speed_and_alternates_side() {
        let mut s = stacker();
        let mut events = Vec::new();
        s.active.x = 60.0;
        s.dir = 1.0;
        s.drop_box(&mut events);

        assert!((s.speed - 3.2).abs() < 1e-6);
        assert_eq!(s.active.x, 0.0);
        assert_eq!(s.dir, -1.0);
        assert_eq!(s.active.y, 320.0 - 60.0);

        s.active.x = 60.0;
        s.drop_box(&mut events);
        assert_eq!(s.active.x, 240.0 - 120.0);
        assert_eq!(s.dir, 1.0);
    }

    #[test]
    fn test_tick_bounces_off_edges() {
        let mut s = stacker();
        let mut events = Vec::new();
        s.active.x = 118.0;
        s.dir = 1.0;
        s.tick(0.0, &mut events);
        assert_eq!(s.active.x, 120.0);
        assert_eq!(s.dir, -1.0);

        s.active.x = 2.0;
        s.tick(0.0, &mut events);
        assert_eq!(s.active.x, 0.0);
        assert_eq!(s.dir, 1.0);
    }

    #[test]
    fn test_camera_follows_tower() {
        let mut s = stacker();
        let mut events = Vec::new();
        assert_eq!(s.camera_target(), 0.0);

        for _ in 0..5 {
            s.active.x = s.top().x;
            s.drop_box(&mut events);
        }
        let target = s.camera_target();
        assert!(target > 0.0);

        let mut last_gap = target - s.scroll_y;
        for _ in 0..30 {
            s.tick(0.0, &mut events);
            let gap = target - s.scroll_y;
            assert!(gap < last_gap);
            last_gap = gap;
        }
    }

    #[test]
    fn test_drop_ignored_after_game_over() {
        let mut s = stacker();
        let mut events = Vec::new();
        s.active.x = 200.0;
        s.drop_box(&mut events);
        events.clear();

        assert_eq!(s.drop_box(&mut events), InputOutcome::Ignored);
        assert!(events.is_empty());
        assert_eq!(
            s.input(&InputEvent::Press(Button::Cross), 0.0, &mut events),
            InputOutcome::Restart
        );
    }
}
