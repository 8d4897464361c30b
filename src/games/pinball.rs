//! Pinball table
//!
//! One ball, two flippers, a fixed set of walls and three bumpers. The ball
//! rests in the launch tube on the right until launched, then falls under
//! gravity and bounces until it drains past the flippers.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Game, GameKind, InputOutcome, Phase};
use crate::clock::Cadence;
use crate::input::{Button, InputEvent};
use crate::ports::{GameEvent, SoundCue};
use crate::sim::{Body, Circle, Segment, resolve_circle, resolve_segment};
use crate::tuning::PinballTuning;

/// Width of the launch tube along the right edge
pub const LAUNCH_TUBE_WIDTH: f32 = 30.0;
/// Vertical band at the bottom of the tube where a launch is allowed
pub const LAUNCH_ZONE_HEIGHT: f32 = 50.0;
/// Resting offset of the ball from the bottom-right corner
pub const BALL_REST_INSET: f32 = 15.0;
/// Flipper pivot height above the table bottom
pub const FLIPPER_INSET_Y: f32 = 30.0;
/// Flipper pivot distance from the side walls
pub const FLIPPER_INSET_X: f32 = 100.0;

/// The pinball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// False while resting in the launch tube
    pub active: bool,
}

impl Ball {
    fn body(&self) -> Body {
        Body {
            pos: self.pos,
            vel: self.vel,
            radius: self.radius,
        }
    }

    fn set_body(&mut self, body: Body) {
        self.pos = body.pos;
        self.vel = body.vel;
    }
}

/// Which side of the table a flipper sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A flipper rotating about its pivot between a rest and a raised angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flipper {
    pub side: Side,
    pub pivot: Vec2,
    pub angle: f32,
    pub rest_angle: f32,
    pub max_angle: f32,
    pub length: f32,
    pub pressed: bool,
}

impl Flipper {
    /// Left flipper rests pointing down-right and swings up counter-clockwise
    pub fn left(pivot: Vec2, length: f32) -> Self {
        Self {
            side: Side::Left,
            pivot,
            angle: 0.5,
            rest_angle: 0.5,
            max_angle: -0.2,
            length,
            pressed: false,
        }
    }

    /// Right flipper mirrors the left one
    pub fn right(pivot: Vec2, length: f32) -> Self {
        use std::f32::consts::PI;
        Self {
            side: Side::Right,
            pivot,
            angle: PI - 0.5,
            rest_angle: PI - 0.5,
            max_angle: PI + 0.2,
            length,
            pressed: false,
        }
    }

    /// Tip position derived from the current angle
    pub fn tip(&self) -> Vec2 {
        self.pivot + self.length * Vec2::new(self.angle.cos(), self.angle.sin())
    }

    /// Current collidable segment (pivot to tip)
    pub fn segment(&self) -> Segment {
        Segment::new(self.pivot, self.tip())
    }

    /// Move toward the raised angle while pressed, relax toward rest otherwise
    ///
    /// Flipping is fast and the return is slow.
    pub fn step(&mut self, flip_speed: f32, restore_speed: f32) {
        let toward_max = (self.max_angle - self.rest_angle).signum();
        if self.pressed {
            self.angle += toward_max * flip_speed;
            if (self.angle - self.max_angle) * toward_max > 0.0 {
                self.angle = self.max_angle;
            }
        } else {
            self.angle -= toward_max * restore_speed;
            if (self.angle - self.rest_angle) * toward_max < 0.0 {
                self.angle = self.rest_angle;
            }
        }
    }
}

/// A round bumper
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bumper {
    pub shape: Circle,
    /// Ticks left on the hit highlight (visual only)
    pub hit_cooldown_ticks: u32,
}

/// Pinball session
#[derive(Debug, Clone)]
pub struct Pinball {
    pub tuning: PinballTuning,
    pub ball: Ball,
    pub left: Flipper,
    pub right: Flipper,
    pub walls: Vec<Segment>,
    pub bumpers: Vec<Bumper>,
    pub score: u64,
    pub phase: Phase,
    rng: Pcg32,
}

/// Static table boundary for a `w` x `h` table
pub fn table_walls(w: f32, h: f32) -> Vec<Segment> {
    let tube = w - LAUNCH_TUBE_WIDTH;
    vec![
        // Launch tube
        Segment::from_coords(tube, h, tube, 40.0),
        // Outer bounds
        Segment::from_coords(0.0, h, 0.0, 0.0),
        Segment::from_coords(0.0, 0.0, w, 0.0),
        Segment::from_coords(w, 0.0, w, h),
        // Corner slants
        Segment::from_coords(0.0, 40.0, 40.0, 0.0),
        Segment::from_coords(w, 40.0, w - 40.0, 0.0),
        // Gutter slants
        Segment::from_coords(0.0, h - 80.0, 80.0, h - 20.0),
        Segment::from_coords(w - 40.0, h - 80.0, w - 120.0, h - 20.0),
    ]
}

impl Pinball {
    pub fn new(tuning: PinballTuning, seed: u64) -> Self {
        let (w, h) = (tuning.width, tuning.height);
        let bumper = |x: f32, y: f32| Bumper {
            shape: Circle::new(Vec2::new(x, y), tuning.bumper_radius),
            hit_cooldown_ticks: 0,
        };
        let bumpers = vec![
            bumper(w / 2.0, 50.0),
            bumper(w / 2.0 - 50.0, 80.0),
            bumper(w / 2.0 + 50.0, 80.0),
        ];

        Self {
            ball: Ball {
                pos: Self::rest_position(w, h),
                vel: Vec2::ZERO,
                radius: tuning.ball_radius,
                active: false,
            },
            left: Flipper::left(Vec2::new(FLIPPER_INSET_X, h - FLIPPER_INSET_Y), tuning.flipper_length),
            right: Flipper::right(
                Vec2::new(w - FLIPPER_INSET_X, h - FLIPPER_INSET_Y),
                tuning.flipper_length,
            ),
            walls: table_walls(w, h),
            bumpers,
            score: 0,
            phase: Phase::Playing,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    fn rest_position(w: f32, h: f32) -> Vec2 {
        Vec2::new(w - BALL_REST_INSET, h - BALL_REST_INSET)
    }

    /// True while the ball sits where a launch is allowed
    pub fn in_launch_zone(&self) -> bool {
        let (w, h) = (self.tuning.width, self.tuning.height);
        self.ball.pos.y > h - LAUNCH_ZONE_HEIGHT && self.ball.pos.x > w - LAUNCH_TUBE_WIDTH
    }

    /// Fire the ball up the launch tube
    pub fn launch(&mut self, events: &mut Vec<GameEvent>) -> InputOutcome {
        if self.phase != Phase::Playing || self.ball.active || !self.in_launch_zone() {
            return InputOutcome::Ignored;
        }
        let spread = self.rng.random::<f32>() * self.tuning.launch_speed_spread;
        self.ball.vel = Vec2::new(
            -self.tuning.launch_nudge,
            -(self.tuning.launch_speed_min + spread),
        );
        self.ball.active = true;
        events.push(GameEvent::Cue(SoundCue::Select));
        log::debug!("Pinball launch: vy={:.2}", self.ball.vel.y);
        InputOutcome::Handled
    }

    pub fn set_flipper(&mut self, side: Side, pressed: bool) {
        match side {
            Side::Left => self.left.pressed = pressed,
            Side::Right => self.right.pressed = pressed,
        }
    }

    /// Ball fell off the bottom outside the launch tube
    pub fn drained(&self) -> bool {
        let (w, h) = (self.tuning.width, self.tuning.height);
        self.ball.pos.y > h + self.ball.radius && self.ball.pos.x < w - LAUNCH_TUBE_WIDTH
    }

    /// Resolve the ball against one flipper, adding the flip impulse if raised
    fn collide_flipper(&mut self, side: Side) {
        let flipper = match side {
            Side::Left => self.left,
            Side::Right => self.right,
        };
        let mut body = self.ball.body();
        if resolve_segment(&mut body, &flipper.segment(), self.tuning.wall_bounce) {
            if flipper.pressed {
                body.vel.y -= self.tuning.flip_boost;
            }
            self.ball.set_body(body);
        }
    }

    /// Resolve the ball against every bumper and run their highlight timers
    fn collide_bumpers(&mut self, events: &mut Vec<GameEvent>) {
        for bumper in &mut self.bumpers {
            let mut body = Body {
                pos: self.ball.pos,
                vel: self.ball.vel,
                radius: self.ball.radius,
            };
            if resolve_circle(&mut body, &bumper.shape, self.tuning.bumper_force) {
                self.ball.pos = body.pos;
                self.ball.vel = body.vel;
                self.score += self.tuning.bumper_score;
                bumper.hit_cooldown_ticks = self.tuning.bumper_cooldown_ticks;
                events.push(GameEvent::Score(format!("SCORE: {}", self.score)));
                events.push(GameEvent::Cue(SoundCue::Select));
            }
            bumper.hit_cooldown_ticks = bumper.hit_cooldown_ticks.saturating_sub(1);
        }
    }
}

impl Game for Pinball {
    fn kind(&self) -> GameKind {
        GameKind::Pinball
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn cadence(&self) -> Cadence {
        Cadence::Frame
    }

    fn tick(&mut self, _now_ms: f64, events: &mut Vec<GameEvent>) {
        if self.phase != Phase::Playing {
            return;
        }
        let t = &self.tuning;

        // Integrate
        if self.ball.active {
            self.ball.vel.y += t.gravity;
            self.ball.pos += self.ball.vel;
            self.ball.vel *= t.friction;
        } else {
            self.ball.pos = Self::rest_position(t.width, t.height);
        }

        if self.drained() {
            log::info!("Pinball drained (score {})", self.score);
            self.phase = Phase::GameOver;
            events.push(GameEvent::GameOver(true));
            events.push(GameEvent::Cue(SoundCue::Cancel));
            return;
        }

        let (flip, restore) = (t.flip_speed, t.flip_restore);
        self.left.step(flip, restore);
        self.right.step(flip, restore);

        let mut body = self.ball.body();
        for wall in &self.walls {
            resolve_segment(&mut body, wall, self.tuning.wall_bounce);
        }
        self.ball.set_body(body);

        self.collide_flipper(Side::Left);
        self.collide_flipper(Side::Right);
        self.collide_bumpers(events);
    }

    fn input(&mut self, event: &InputEvent, _now_ms: f64, events: &mut Vec<GameEvent>) -> InputOutcome {
        if self.phase == Phase::GameOver {
            return match event {
                InputEvent::Press(Button::Cross) => InputOutcome::Restart,
                _ => InputOutcome::Ignored,
            };
        }
        match event {
            InputEvent::Press(Button::Cross) | InputEvent::Press(Button::Down) => self.launch(events),
            InputEvent::Press(Button::Left) => {
                self.set_flipper(Side::Left, true);
                InputOutcome::Handled
            }
            InputEvent::Release(Button::Left) => {
                self.set_flipper(Side::Left, false);
                InputOutcome::Handled
            }
            InputEvent::Press(Button::Right) => {
                self.set_flipper(Side::Right, true);
                InputOutcome::Handled
            }
            InputEvent::Release(Button::Right) => {
                self.set_flipper(Side::Right, false);
                InputOutcome::Handled
            }
            _ => InputOutcome::Ignored,
        }
    }

    fn announce(&self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::GameOver(false));
        events.push(GameEvent::Score("SCORE: 0".to_string()));
    }
}
