//! Reaction time test
//!
//! Press to arm, wait for the random go signal, press again as fast as
//! possible. Pressing before the signal fails the attempt.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Game, GameKind, InputOutcome, Phase};
use crate::clock::Cadence;
use crate::input::{Button, InputEvent};
use crate::ports::{GameEvent, SoundCue};
use crate::tuning::ReactionTuning;

/// Test progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReactState {
    Idle,
    /// Armed; goes green at `ready_at_ms`
    Waiting { ready_at_ms: f64 },
    /// Green since `since_ms`
    Ready { since_ms: f64 },
    /// Pressed too early
    TooEarly,
    /// Measured reaction in whole milliseconds
    Result { ms: u32 },
}

#[derive(Debug, Clone)]
pub struct Reaction {
    pub tuning: ReactionTuning,
    pub state: ReactState,
    /// Fastest result this session
    pub best_ms: Option<u32>,
    rng: Pcg32,
}

impl Reaction {
    pub fn new(tuning: ReactionTuning, seed: u64) -> Self {
        Self {
            tuning,
            state: ReactState::Idle,
            best_ms: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// The single action button
    pub fn press(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) -> InputOutcome {
        match self.state {
            ReactState::Idle | ReactState::TooEarly | ReactState::Result { .. } => {
                let delay = self.tuning.min_delay_ms + self.rng.random::<f64>() * self.tuning.delay_spread_ms;
                self.state = ReactState::Waiting {
                    ready_at_ms: now_ms + delay,
                };
                events.push(GameEvent::Status("Wait for Green...".to_string()));
                events.push(GameEvent::Instruction("Pressing too early fails!".to_string()));
            }
            ReactState::Waiting { .. } => {
                self.state = ReactState::TooEarly;
                events.push(GameEvent::Status("Too Early!".to_string()));
                events.push(GameEvent::Instruction("Press ✕ to try again".to_string()));
                events.push(GameEvent::Cue(SoundCue::Cancel));
            }
            ReactState::Ready { since_ms } => {
                let ms = (now_ms - since_ms).max(0.0).round() as u32;
                self.state = ReactState::Result { ms };
                let best = self.best_ms.map_or(ms, |b| b.min(ms));
                self.best_ms = Some(best);
                log::info!("Reaction: {} ms (best {} ms)", ms, best);

                events.push(GameEvent::Status(format!("{} ms", ms)));
                events.push(GameEvent::Score(format!("BEST: {} ms", best)));
                events.push(GameEvent::Instruction("Press ✕ to go again".to_string()));
                events.push(GameEvent::Cue(SoundCue::Select));
            }
        }
        InputOutcome::Handled
    }
}

impl Game for Reaction {
    fn kind(&self) -> GameKind {
        GameKind::Reaction
    }

    fn phase(&self) -> Phase {
        match self.state {
            ReactState::Idle => Phase::Idle,
            ReactState::Waiting { .. } | ReactState::Ready { .. } => Phase::Playing,
            ReactState::TooEarly | ReactState::Result { .. } => Phase::GameOver,
        }
    }

    fn cadence(&self) -> Cadence {
        Cadence::Frame
    }

    fn tick(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) {
        if let ReactState::Waiting { ready_at_ms } = self.state {
            if now_ms >= ready_at_ms {
                self.state = ReactState::Ready { since_ms: now_ms };
                events.push(GameEvent::Status("PRESS ✕ NOW!".to_string()));
            }
        }
    }

    fn input(&mut self, event: &InputEvent, now_ms: f64, events: &mut Vec<GameEvent>) -> InputOutcome {
        match event {
            InputEvent::Press(Button::Cross) | InputEvent::Pointer { down: true, .. } => self.press(now_ms, events),
            _ => InputOutcome::Ignored,
        }
    }

    fn announce(&self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::Status("Reaction Test".to_string()));
        events.push(GameEvent::Instruction("Press ✕ to start".to_string()));
        events.push(GameEvent::Score(String::new()));
    }
}
