//! Brick breaker
//!
//! Paddle, ball and a fixed grid of bricks. Losing the ball costs a life;
//! clearing the grid refills it with a faster ball.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Game, GameKind, InputOutcome, Phase};
use crate::clock::Cadence;
use crate::input::{Button, InputEvent};
use crate::ports::{GameEvent, SoundCue};
use crate::tuning::BrickTuning;

/// Distance from the paddle's top edge to the canvas bottom
const PADDLE_INSET: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brick {
    pub x: f32,
    pub y: f32,
    pub row: usize,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickBall {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Vertical speed after a paddle hit
    pub speed: f32,
}

/// Held paddle directions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone)]
pub struct BrickBreaker {
    pub tuning: BrickTuning,
    pub paddle: Paddle,
    pub ball: BrickBall,
    pub bricks: Vec<Brick>,
    pub keys: HeldKeys,
    pub score: u64,
    pub lives: u32,
    /// Grids cleared this run
    pub waves: u32,
    pub phase: Phase,
    rng: Pcg32,
}

/// Full brick grid for `tuning`, row-major
pub fn brick_grid(tuning: &BrickTuning) -> Vec<Brick> {
    let mut bricks = Vec::with_capacity(tuning.rows * tuning.cols);
    for row in 0..tuning.rows {
        for col in 0..tuning.cols {
            bricks.push(Brick {
                x: col as f32 * (tuning.brick_width + tuning.brick_padding) + tuning.offset_x,
                y: row as f32 * (tuning.brick_height + tuning.brick_padding) + tuning.offset_y,
                row,
                alive: true,
            });
        }
    }
    bricks
}

impl BrickBreaker {
    pub fn new(tuning: BrickTuning, seed: u64) -> Self {
        let (w, h) = (tuning.width, tuning.height);
        Self {
            paddle: Paddle {
                x: w / 2.0 - tuning.paddle_width / 2.0,
                y: h - PADDLE_INSET,
                width: tuning.paddle_width,
                height: tuning.paddle_height,
            },
            ball: BrickBall {
                pos: Vec2::new(w / 2.0, h / 2.0 + 20.0),
                vel: Vec2::ZERO,
                radius: tuning.ball_radius,
                speed: tuning.ball_speed,
            },
            bricks: brick_grid(&tuning),
            keys: HeldKeys::default(),
            score: 0,
            lives: tuning.lives,
            waves: 0,
            phase: Phase::Idle,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    fn serve_dx(&mut self) -> f32 {
        let side = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.tuning.ball_speed * side
    }

    /// Cross or a click: serve, or start over after game over
    pub fn action(&mut self, events: &mut Vec<GameEvent>) -> InputOutcome {
        match self.phase {
            Phase::Playing => InputOutcome::Ignored,
            Phase::GameOver | Phase::Won => InputOutcome::Restart,
            Phase::Idle => {
                self.phase = Phase::Playing;
                self.ball.vel = Vec2::new(self.serve_dx(), -self.ball.speed);
                events.push(GameEvent::GameOver(false));
                events.push(GameEvent::Status(format!("LIVES: {}", self.lives)));
                log::info!("Brick breaker started");
                InputOutcome::Handled
            }
        }
    }

    pub fn set_keys(&mut self, keys: HeldKeys) {
        self.keys = keys;
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }

    fn move_paddle(&mut self) {
        let mut dx = 0.0;
        if self.keys.right {
            dx = self.tuning.paddle_speed;
        }
        if self.keys.left {
            dx = -self.tuning.paddle_speed;
        }
        let max_x = self.tuning.width - self.paddle.width;
        self.paddle.x = (self.paddle.x + dx).clamp(0.0, max_x);
    }

    fn move_ball(&mut self, events: &mut Vec<GameEvent>) {
        let (w, h) = (self.tuning.width, self.tuning.height);
        let ball = &mut self.ball;
        ball.pos += ball.vel;

        if ball.pos.x + ball.radius > w {
            ball.vel.x = -ball.vel.x.abs();
            events.push(GameEvent::Cue(SoundCue::Nav));
        } else if ball.pos.x - ball.radius < 0.0 {
            ball.vel.x = ball.vel.x.abs();
            events.push(GameEvent::Cue(SoundCue::Nav));
        }
        if ball.pos.y - ball.radius < 0.0 {
            ball.vel.y = ball.vel.y.abs();
            events.push(GameEvent::Cue(SoundCue::Nav));
        }

        let paddle = &self.paddle;
        if ball.pos.x > paddle.x && ball.pos.x < paddle.x + paddle.width && ball.pos.y + ball.radius > paddle.y {
            ball.vel.y = -ball.speed;
            // Off-center hits steer the ball
            let offset = ball.pos.x - (paddle.x + paddle.width / 2.0);
            ball.vel.x = offset * self.tuning.english;
            events.push(GameEvent::Cue(SoundCue::Nav));
        }

        if ball.pos.y + ball.radius > h {
            self.lose_life(events);
        }
    }

    fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        events.push(GameEvent::Cue(SoundCue::Cancel));
        events.push(GameEvent::Status(format!("LIVES: {}", self.lives)));

        if self.lives == 0 {
            log::info!("Brick breaker over (score {}, waves {})", self.score, self.waves);
            self.phase = Phase::GameOver;
            events.push(GameEvent::GameOver(true));
            return;
        }

        let (w, h) = (self.tuning.width, self.tuning.height);
        let dx = self.serve_dx();
        self.ball.pos = Vec2::new(w / 2.0, h / 2.0);
        self.ball.vel = Vec2::new(dx, -self.tuning.ball_speed);
        self.paddle.x = w / 2.0 - self.paddle.width / 2.0;
    }

    fn break_bricks(&mut self, events: &mut Vec<GameEvent>) {
        let (bw, bh) = (self.tuning.brick_width, self.tuning.brick_height);
        let pos = self.ball.pos;
        for brick in self.bricks.iter_mut().filter(|b| b.alive) {
            if pos.x > brick.x && pos.x < brick.x + bw && pos.y > brick.y && pos.y < brick.y + bh {
                brick.alive = false;
                self.ball.vel.y = -self.ball.vel.y;
                self.score += 1;
                events.push(GameEvent::Score(format!("SCORE: {}", self.score)));
                events.push(GameEvent::Cue(SoundCue::Select));
            }
        }

        if self.bricks_left() == 0 {
            self.waves += 1;
            self.bricks = brick_grid(&self.tuning);
            self.ball.speed += self.tuning.speed_step;
            log::info!("Brick wave {} cleared, ball speed {:.1}", self.waves, self.ball.speed);
        }
    }
}

impl Game for BrickBreaker {
    fn kind(&self) -> GameKind {
        GameKind::Brick
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
        self.move_paddle();
        self.move_ball(events);
        if self.phase == Phase::Playing {
            self.break_bricks(events);
        }
    }

    fn input(&mut self, event: &InputEvent, _now_ms: f64, events: &mut Vec<GameEvent>) -> InputOutcome {
        match event {
            InputEvent::Press(Button::Cross) => self.action(events),
            InputEvent::Press(Button::Left) => {
                self.keys.left = true;
                InputOutcome::Handled
            }
            InputEvent::Release(Button::Left) => {
                self.keys.left = false;
                InputOutcome::Handled
            }
            InputEvent::Press(Button::Right) => {
                self.keys.right = true;
                InputOutcome::Handled
            }
            InputEvent::Release(Button::Right) => {
                self.keys.right = false;
                InputOutcome::Handled
            }
            // Holding the pointer on either half of the canvas steers
            InputEvent::Pointer { pos, down: true } => {
                if pos.x < self.tuning.width / 2.0 {
                    self.keys.left = true;
                } else {
                    self.keys.right = true;
                }
                match self.phase {
                    Phase::Playing => InputOutcome::Handled,
                    _ => self.action(events),
                }
            }
            InputEvent::Pointer { down: false, .. } => {
                self.keys = HeldKeys::default();
                InputOutcome::Handled
            }
            _ => InputOutcome::Ignored,
        }
    }

    fn announce(&self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::GameOver(false));
        events.push(GameEvent::Score("SCORE: 0".to_string()));
        events.push(GameEvent::Status(format!("LIVES: {}", self.lives)));
    }
}
