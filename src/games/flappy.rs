//! Flappy bird clone
//!
//! The bird falls under gravity and jumps on each action. Pipe pairs scroll
//! in from the right at a fixed frame interval; touching one or the floor
//! ends the run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Game, GameKind, InputOutcome, Phase};
use crate::clock::Cadence;
use crate::input::{Button, InputEvent};
use crate::ports::{GameEvent, SoundCue};
use crate::tuning::FlappyTuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub velocity: f32,
}

/// A top and bottom pipe with the gap between them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    pub x: f32,
    /// Height of the top pipe
    pub top: f32,
    /// Upper edge of the bottom pipe
    pub bottom_y: f32,
    pub width: f32,
    /// Already counted toward the score
    pub passed: bool,
}

impl Pipe {
    /// True when the bird's box overlaps either pipe
    pub fn hits(&self, bird: &Bird) -> bool {
        let within_x = bird.x + bird.radius > self.x && bird.x - bird.radius < self.x + self.width;
        within_x && (bird.y - bird.radius < self.top || bird.y + bird.radius > self.bottom_y)
    }
}

#[derive(Debug, Clone)]
pub struct Flappy {
    pub tuning: FlappyTuning,
    pub bird: Bird,
    pub pipes: Vec<Pipe>,
    pub frames: u32,
    pub score: u64,
    pub phase: Phase,
    rng: Pcg32,
}

impl Flappy {
    pub fn new(tuning: FlappyTuning, seed: u64) -> Self {
        Self {
            bird: Self::fresh_bird(&tuning),
            tuning,
            pipes: Vec::new(),
            frames: 0,
            score: 0,
            phase: Phase::Idle,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn fresh_bird(tuning: &FlappyTuning) -> Bird {
        Bird {
            x: tuning.bird_x,
            y: tuning.bird_start_y,
            radius: tuning.bird_radius,
            velocity: 0.0,
        }
    }

    fn reset(&mut self, events: &mut Vec<GameEvent>) {
        self.bird = Self::fresh_bird(&self.tuning);
        self.pipes.clear();
        self.frames = 0;
        self.score = 0;
        events.push(GameEvent::Score("SCORE: 0".to_string()));
        events.push(GameEvent::GameOver(false));
        events.push(GameEvent::Instruction(String::new()));
    }

    /// Start if needed, then flap
    pub fn action(&mut self, events: &mut Vec<GameEvent>) -> InputOutcome {
        if self.phase != Phase::Playing {
            self.reset(events);
            self.phase = Phase::Playing;
            log::info!("Flappy started");
        }
        self.bird.velocity = self.tuning.jump;
        events.push(GameEvent::Cue(SoundCue::Nav));
        InputOutcome::Handled
    }

    fn spawn_pipe(&mut self) {
        let t = &self.tuning;
        let min = t.pipe_min_height as i32;
        let max = (t.height - t.pipe_gap - t.pipe_min_height) as i32;
        let top = self.rng.random_range(min..=max.max(min)) as f32;
        self.pipes.push(Pipe {
            x: t.width,
            top,
            bottom_y: top + t.pipe_gap,
            width: t.pipe_width,
            passed: false,
        });
    }

    fn end(&mut self, events: &mut Vec<GameEvent>) {
        log::info!("Flappy over (score {})", self.score);
        self.phase = Phase::GameOver;
        events.push(GameEvent::Cue(SoundCue::Cancel));
        events.push(GameEvent::GameOver(true));
    }
}

impl Game for Flappy {
    fn kind(&self) -> GameKind {
        GameKind::Flappy
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
        let height = self.tuning.height;

        let bird = &mut self.bird;
        bird.velocity += self.tuning.gravity;
        bird.y += bird.velocity;
        if bird.y + bird.radius >= height {
            bird.y = height - bird.radius;
            self.end(events);
            return;
        }
        // Ceiling clamps instead of killing
        if bird.y - bird.radius <= 0.0 {
            bird.y = bird.radius;
            bird.velocity = 0.0;
        }

        if self.frames % self.tuning.pipe_interval == 0 {
            self.spawn_pipe();
        }

        let mut crashed = false;
        for pipe in &mut self.pipes {
            pipe.x -= self.tuning.pipe_speed;
            crashed |= pipe.hits(&self.bird);
            if !pipe.passed && pipe.x + pipe.width < self.bird.x {
                pipe.passed = true;
                self.score += 1;
                events.push(GameEvent::Score(format!("SCORE: {}", self.score)));
                events.push(GameEvent::Cue(SoundCue::Select));
            }
        }
        self.pipes.retain(|p| p.x + p.width >= 0.0);
        self.frames += 1;

        if crashed {
            self.end(events);
        }
    }

    fn input(&mut self, event: &InputEvent, _now_ms: f64, events: &mut Vec<GameEvent>) -> InputOutcome {
        match event {
            InputEvent::Press(Button::Cross) | InputEvent::Pointer { down: true, .. } => self.action(events),
            _ => InputOutcome::Ignored,
        }
    }

    fn announce(&self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::GameOver(false));
        events.push(GameEvent::Score("SCORE: 0".to_string()));
        events.push(GameEvent::Instruction("Press ✕ to flap".to_string()));
    }
}
