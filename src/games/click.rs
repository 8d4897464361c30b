//! Click speed
//!
//! Count as many actions as possible in a fixed countdown. Once time is up
//! the result stays on screen until Triangle resets the board.

use super::{Game, GameKind, InputOutcome, Phase};
use crate::clock::Cadence;
use crate::consts::COUNTDOWN_TICK_MS;
use crate::input::{Button, InputEvent};
use crate::ports::{GameEvent, SoundCue};
use crate::tuning::ClickTuning;

const READY_TEXT: &str = "Click wildly! <br>(Press ✕ or Click here to begin)";
const TIME_UP_TEXT: &str = "TIME UP! <br>(Press △ for next game)";

#[derive(Debug, Clone)]
pub struct ClickSpeed {
    pub tuning: ClickTuning,
    pub score: u64,
    pub remaining_secs: u32,
    pub phase: Phase,
}

impl ClickSpeed {
    pub fn new(tuning: ClickTuning) -> Self {
        Self {
            remaining_secs: tuning.duration_secs,
            tuning,
            score: 0,
            phase: Phase::Idle,
        }
    }

    fn time_text(&self) -> String {
        format!("TIME: {}s", self.remaining_secs)
    }

    /// Cross or a click: start the countdown or count a hit
    pub fn action(&mut self, events: &mut Vec<GameEvent>) -> InputOutcome {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Playing;
                self.score = 0;
                self.remaining_secs = self.tuning.duration_secs;
                events.push(GameEvent::Score("0".to_string()));
                events.push(GameEvent::Instruction(String::new()));
                events.push(GameEvent::Cue(SoundCue::Nav));
                InputOutcome::Handled
            }
            Phase::Playing => {
                self.score += 1;
                events.push(GameEvent::Score(self.score.to_string()));
                events.push(GameEvent::Cue(SoundCue::Select));
                InputOutcome::Handled
            }
            // Triangle is the only way out of the result screen
            Phase::GameOver | Phase::Won => InputOutcome::Ignored,
        }
    }

    /// Triangle: clear the result and wait for a new start
    pub fn reset(&mut self, events: &mut Vec<GameEvent>) -> InputOutcome {
        if !self.phase.is_terminal() {
            return InputOutcome::Ignored;
        }
        self.phase = Phase::Idle;
        self.score = 0;
        self.remaining_secs = self.tuning.duration_secs;
        self.announce(events);
        events.push(GameEvent::Cue(SoundCue::Nav));
        InputOutcome::Handled
    }
}

impl Game for ClickSpeed {
    fn kind(&self) -> GameKind {
        GameKind::Click
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn cadence(&self) -> Cadence {
        Cadence::Interval {
            period_ms: COUNTDOWN_TICK_MS,
        }
    }

    fn tick(&mut self, _now_ms: f64, events: &mut Vec<GameEvent>) {
        if self.phase != Phase::Playing {
            return;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        events.push(GameEvent::Status(self.time_text()));
        if self.remaining_secs == 0 {
            log::info!("Click speed over: {} clicks", self.score);
            self.phase = Phase::GameOver;
            events.push(GameEvent::Cue(SoundCue::Cancel));
            events.push(GameEvent::Instruction(TIME_UP_TEXT.to_string()));
        }
    }

    fn input(&mut self, event: &InputEvent, _now_ms: f64, events: &mut Vec<GameEvent>) -> InputOutcome {
        match event {
            InputEvent::Press(Button::Cross) | InputEvent::Pointer { down: true, .. } => self.action(events),
            InputEvent::Press(Button::Triangle) => self.reset(events),
            _ => InputOutcome::Ignored,
        }
    }

    fn announce(&self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::Score(self.score.to_string()));
        events.push(GameEvent::Status(self.time_text()));
        events.push(GameEvent::Instruction(READY_TEXT.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_seconds(game: &mut ClickSpeed, secs: u32, events: &mut Vec<GameEvent>) {
        for _ in 0..secs {
            game.tick(0.0, events);
        }
    }

    #[test]
    fn test_first_action_starts() {
        let mut g = ClickSpeed::new(ClickTuning::default());
        let mut events = Vec::new();
        assert!(!g.is_running());

        g.action(&mut events);
        assert_eq!(g.phase, Phase::Playing);
        assert_eq!(g.score, 0);
        assert!(events.contains(&GameEvent::Cue(SoundCue::Nav)));

        g.action(&mut events);
        g.action(&mut events);
        assert_eq!(g.score, 2);
        assert_eq!(events.last(), Some(&GameEvent::Cue(SoundCue::Select)));
    }

    #[test]
    fn test_countdown_ends_game() {
        let mut g = ClickSpeed::new(ClickTuning::default());
        let mut events = Vec::new();
        g.action(&mut events);

        run_seconds(&mut g, 9, &mut events);
        assert_eq!(g.phase, Phase::Playing);
        assert!(events.contains(&GameEvent::Status("TIME: 1s".to_string())));

        run_seconds(&mut g, 1, &mut events);
        assert_eq!(g.phase, Phase::GameOver);
        assert!(events.contains(&GameEvent::Cue(SoundCue::Cancel)));
        assert!(events.contains(&GameEvent::Status("TIME: 0s".to_string())));
    }

    #[test]
    fn test_actions_ignored_until_triangle() {
        let mut g = ClickSpeed::new(ClickTuning::default());
        let mut events = Vec::new();
        g.action(&mut events);
        g.action(&mut events);
        run_seconds(&mut g, 10, &mut events);

        assert_eq!(g.action(&mut events), InputOutcome::Ignored);
        assert_eq!(g.score, 1);

        events.clear();
        assert_eq!(
            g.input(&InputEvent::Press(Button::Triangle), 0.0, &mut events),
            InputOutcome::Handled
        );
        assert_eq!(g.phase, Phase::Idle);
        assert_eq!(g.remaining_secs, 10);
        assert!(events.contains(&GameEvent::Status("TIME: 10s".to_string())));
    }

    #[test]
    fn test_triangle_ignored_while_playing() {
        let mut g = ClickSpeed::new(ClickTuning::default());
        let mut events = Vec::new();
        g.action(&mut events);
        assert_eq!(g.reset(&mut events), InputOutcome::Ignored);
        assert_eq!(g.phase, Phase::Playing);
    }
}
