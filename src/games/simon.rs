//! Pattern memory
//!
//! Each level appends one random face button to the sequence, plays the
//! whole sequence back, then waits for the player to repeat it.
//!
//! All timing is absolute: the session stores the next due time in
//! milliseconds and the tick compares it against the frame clock.

use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::{Game, GameKind, InputOutcome, Phase};
use crate::clock::Cadence;
use crate::consts::SIMON_TICK_MS;
use crate::input::{Button, InputEvent};
use crate::ports::{GameEvent, SoundCue};
use crate::tuning::SimonTuning;

/// Pads in screen order (top, right, bottom, left)
pub const PADS: [Button; 4] = [Button::Triangle, Button::Circle, Button::Cross, Button::Square];

const READY_TEXT: &str = "Watch the pattern! <br>(Press ✕ to start)";
const GAME_OVER_TEXT: &str = "GAME OVER! <br>(Press ✕ or click right side to restart)";

/// What the session is waiting for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    /// Playing back the sequence; `index` lights at `at_ms`
    Showing { index: usize, at_ms: f64 },
    /// Player's turn
    Listening,
    /// Sequence complete, next level starts at `at_ms`
    Advancing { at_ms: f64 },
}

/// A lit pad and when it goes dark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub button: Button,
    pub until_ms: f64,
}

#[derive(Debug, Clone)]
pub struct Simon {
    pub tuning: SimonTuning,
    pub sequence: Vec<Button>,
    /// Correct presses so far in the current round
    pub entered: usize,
    pub level: u32,
    pub stage: Stage,
    pub light: Option<Light>,
    pub phase: Phase,
    rng: Pcg32,
}

impl Simon {
    pub fn new(tuning: SimonTuning, seed: u64) -> Self {
        Self {
            tuning,
            sequence: Vec::new(),
            entered: 0,
            level: 0,
            stage: Stage::Listening,
            light: None,
            phase: Phase::Idle,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Levels fully repeated so far
    pub fn score(&self) -> u32 {
        self.level.saturating_sub(1)
    }

    pub fn is_showing(&self) -> bool {
        matches!(self.stage, Stage::Showing { .. })
    }

    fn random_pad(&mut self) -> Button {
        *PADS.choose(&mut self.rng).unwrap_or(&Button::Cross)
    }

    fn light(&mut self, button: Button, now_ms: f64, duration_ms: f64, events: &mut Vec<GameEvent>) {
        self.light = Some(Light {
            button,
            until_ms: now_ms + duration_ms,
        });
        events.push(GameEvent::Cue(SoundCue::Nav));
    }

    fn start(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) -> InputOutcome {
        self.phase = Phase::Playing;
        self.sequence.clear();
        self.level = 0;
        self.light = None;
        log::info!("Simon started");
        self.next_level(now_ms, events);
        InputOutcome::Handled
    }

    fn next_level(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) {
        self.level += 1;
        events.push(GameEvent::Score(format!("SCORE: {}", self.score())));

        let mut next = self.random_pad();
        if let [.., prev, last] = self.sequence.as_slice() {
            // Three of a kind in a row gets one reroll
            if next == *last && next == *prev {
                next = self.random_pad();
            }
        }
        self.sequence.push(next);

        self.entered = 0;
        self.stage = Stage::Showing {
            index: 0,
            at_ms: now_ms + self.tuning.lead_in_ms,
        };
        events.push(GameEvent::Instruction("Watch...".to_string()));
    }

    /// A pad press from the player
    pub fn press(&mut self, button: Button, now_ms: f64, events: &mut Vec<GameEvent>) -> InputOutcome {
        if self.phase != Phase::Playing {
            return match button {
                Button::Cross => self.start(now_ms, events),
                _ => InputOutcome::Ignored,
            };
        }
        if self.stage != Stage::Listening || !PADS.contains(&button) {
            return InputOutcome::Ignored;
        }

        self.light(button, now_ms, self.tuning.press_light_ms, events);

        if self.sequence.get(self.entered) != Some(&button) {
            log::info!("Simon over at level {}", self.level);
            self.phase = Phase::GameOver;
            events.push(GameEvent::Cue(SoundCue::Cancel));
            events.push(GameEvent::Instruction(GAME_OVER_TEXT.to_string()));
            events.push(GameEvent::Score(format!("FINAL: {}", self.score())));
            return InputOutcome::Handled;
        }

        self.entered += 1;
        if self.entered == self.sequence.len() {
            events.push(GameEvent::Instruction("Perfect!".to_string()));
            self.stage = Stage::Advancing {
                at_ms: now_ms + self.tuning.next_level_ms,
            };
        }
        InputOutcome::Handled
    }
}

impl Game for Simon {
    fn kind(&self) -> GameKind {
        GameKind::Simon
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn cadence(&self) -> Cadence {
        Cadence::Interval {
            period_ms: SIMON_TICK_MS,
        }
    }

    /// Keep ticking after game over until the last pad goes dark
    fn is_running(&self) -> bool {
        self.phase == Phase::Playing || self.light.is_some()
    }

    fn tick(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) {
        if self.light.is_some_and(|l| now_ms >= l.until_ms) {
            self.light = None;
        }
        if self.phase != Phase::Playing {
            return;
        }

        match self.stage {
            Stage::Showing { index, at_ms } if now_ms >= at_ms => {
                if let Some(&button) = self.sequence.get(index) {
                    self.light(button, now_ms, self.tuning.pattern_light_ms, events);
                    self.stage = Stage::Showing {
                        index: index + 1,
                        at_ms: at_ms + self.tuning.step_ms,
                    };
                } else {
                    self.stage = Stage::Listening;
                    events.push(GameEvent::Instruction("Your turn!".to_string()));
                }
            }
            Stage::Advancing { at_ms } if now_ms >= at_ms => self.next_level(now_ms, events),
            _ => {}
        }
    }

    fn input(&mut self, event: &InputEvent, now_ms: f64, events: &mut Vec<GameEvent>) -> InputOutcome {
        match event {
            InputEvent::Press(button) => self.press(*button, now_ms, events),
            // Clicking the panel only starts or restarts; pads are pressed by name
            InputEvent::Pointer { down: true, .. } if self.phase != Phase::Playing => {
                self.press(Button::Cross, now_ms, events)
            }
            _ => InputOutcome::Ignored,
        }
    }

    fn announce(&self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::Score("SCORE: 0".to_string()));
        events.push(GameEvent::Instruction(READY_TEXT.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tick every 50 ms until `end_ms`
    fn run_until(s: &mut Simon, from_ms: f64, end_ms: f64, events: &mut Vec<GameEvent>) {
        let mut t = from_ms;
        while t <= end_ms {
            s.tick(t, events);
            t += SIMON_TICK_MS;
        }
    }

    fn started() -> Simon {
        let mut s = Simon::new(SimonTuning::default(), 9);
        s.press(Button::Cross, 0.0, &mut Vec::new());
        s
    }

    #[test]
    fn test_start_appends_first_step() {
        let s = started();
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.level, 1);
        assert_eq!(s.sequence.len(), 1);
        assert!(s.is_showing());
    }

    #[test]
    fn test_non_cross_does_not_start() {
        let mut s = Simon::new(SimonTuning::default(), 9);
        assert_eq!(s.press(Button::Circle, 0.0, &mut Vec::new()), InputOutcome::Ignored);
        assert_eq!(s.phase, Phase::Idle);
    }

    #[test]
    fn test_pattern_playback_timing() {
        let mut s = started();
        let mut events = Vec::new();

        run_until(&mut s, 0.0, 750.0, &mut events);
        assert!(s.light.is_none());

        run_until(&mut s, 800.0, 800.0, &mut events);
        assert_eq!(s.light.map(|l| l.button), Some(s.sequence[0]));
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Cue(SoundCue::Nav)).count(), 1);

        // Light lasts 400 ms, listening begins one step later
        run_until(&mut s, 850.0, 1200.0, &mut events);
        assert!(s.light.is_none());
        assert!(s.is_showing());
        run_until(&mut s, 1250.0, 1400.0, &mut events);
        assert_eq!(s.stage, Stage::Listening);
        assert!(events.contains(&GameEvent::Instruction("Your turn!".to_string())));
    }

    #[test]
    fn test_presses_ignored_while_showing() {
        let mut s = started();
        let first = s.sequence[0];
        assert_eq!(s.press(first, 100.0, &mut Vec::new()), InputOutcome::Ignored);
        assert_eq!(s.entered, 0);
    }

    #[test]
    fn test_correct_sequence_advances_level() {
        let mut s = started();
        let mut events = Vec::new();
        run_until(&mut s, 0.0, 1400.0, &mut events);

        let first = s.sequence[0];
        s.press(first, 1500.0, &mut events);
        assert!(events.contains(&GameEvent::Instruction("Perfect!".to_string())));
        assert!(matches!(s.stage, Stage::Advancing { .. }));

        run_until(&mut s, 1550.0, 2500.0, &mut events);
        assert_eq!(s.level, 2);
        assert_eq!(s.sequence.len(), 2);
        assert_eq!(s.sequence[0], first);
        assert!(events.contains(&GameEvent::Score("SCORE: 1".to_string())));
    }

    #[test]
    fn test_wrong_press_ends_game() {
        let mut s = started();
        let mut events = Vec::new();
        run_until(&mut s, 0.0, 1400.0, &mut events);

        let wrong = PADS.into_iter().find(|b| *b != s.sequence[0]).unwrap();
        s.press(wrong, 1500.0, &mut events);
        assert_eq!(s.phase, Phase::GameOver);
        assert!(events.contains(&GameEvent::Cue(SoundCue::Cancel)));
        assert!(events.contains(&GameEvent::Score("FINAL: 0".to_string())));

        // Still ticking until the press light fades, then the loop may stop
        assert!(s.is_running());
        run_until(&mut s, 1550.0, 1700.0, &mut events);
        assert!(!s.is_running());

        // Cross restarts from scratch
        s.press(Button::Cross, 2000.0, &mut events);
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.level, 1);
        assert_eq!(s.sequence.len(), 1);
    }

    #[test]
    fn test_each_level_adds_one_step() {
        let mut s = started();
        let mut now = 0.0;
        for level in 1..=6 {
            assert_eq!(s.sequence.len(), level);
            s.stage = Stage::Advancing { at_ms: now };
            s.tick(now, &mut Vec::new());
            now += 100.0;
        }
    }
}
