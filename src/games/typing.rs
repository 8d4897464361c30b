//! Typing test
//!
//! A stream of random words scrolls past a cursor. Matching characters
//! advance it, a space completes a word, and the score is words per minute
//! over the elapsed part of the countdown.

use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::{Game, GameKind, InputOutcome, Phase};
use crate::clock::Cadence;
use crate::consts::{COUNTDOWN_TICK_MS, TYPING_TICK_MS};
use crate::input::{Button, InputEvent};
use crate::ports::{GameEvent, SoundCue};
use crate::tuning::TypingTuning;

pub const WORD_BANK: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "coding", "in", "javascript",
    "is", "fun", "challenging", "and", "welcome", "modern", "portable", "gaming", "simulator",
    "web", "practice", "typing", "speed", "horizontally", "continuous", "flow", "every", "word",
    "per", "minute", "counts", "towards", "score", "psp", "interface", "built", "completely",
    "with", "html", "css", "accuracy", "both", "important", "parameters", "for", "success",
    "function", "variable", "const", "let", "return", "true", "false", "array", "object",
    "string", "number", "boolean", "undefined", "window", "document", "element", "style",
    "color", "background",
];

/// Ticks per countdown second
const TICKS_PER_SEC: u32 = (COUNTDOWN_TICK_MS / TYPING_TICK_MS) as u32;
/// Completed text kept visible left of the cursor
pub const LOOKBEHIND_CHARS: usize = 20;
/// Upcoming text shown right of the cursor
pub const LOOKAHEAD_CHARS: usize = 40;

const READY_TEXT: &str = "Type the words! <br>(Press ✕ (s key) to begin, Esc to quit)";
const TIME_UP_TEXT: &str = "TIME UP! <br>(Press △ to restart, Esc to quit)";

/// Words per minute, rounded; zero before any time has passed
pub fn words_per_minute(words: u32, elapsed_secs: u32) -> u32 {
    if elapsed_secs == 0 {
        return 0;
    }
    let minutes = elapsed_secs as f64 / 60.0;
    (words as f64 / minutes).round() as u32
}

#[derive(Debug, Clone)]
pub struct TypingTest {
    pub tuning: TypingTuning,
    /// Space-terminated words, ASCII only
    pub stream: String,
    /// Index of the next expected character
    pub cursor: usize,
    pub words_typed: u32,
    pub remaining_secs: u32,
    /// Sub-second tick counter
    sub_ticks: u32,
    /// Ticks left on the mismatch flash
    pub flash_ticks: u32,
    pub phase: Phase,
    rng: Pcg32,
}

impl TypingTest {
    pub fn new(tuning: TypingTuning, seed: u64) -> Self {
        Self {
            remaining_secs: tuning.duration_secs,
            tuning,
            stream: String::new(),
            cursor: 0,
            words_typed: 0,
            sub_ticks: 0,
            flash_ticks: 0,
            phase: Phase::Idle,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn push_words(&mut self, count: usize) {
        for _ in 0..count {
            if let Some(word) = WORD_BANK.choose(&mut self.rng) {
                self.stream.push_str(word);
                self.stream.push(' ');
            }
        }
    }

    /// Characters left of the cursor still shown on the track
    pub fn done_text(&self) -> &str {
        &self.stream[self.cursor.saturating_sub(LOOKBEHIND_CHARS)..self.cursor]
    }

    pub fn cursor_char(&self) -> Option<char> {
        self.stream[self.cursor..].chars().next()
    }

    pub fn todo_text(&self) -> &str {
        let start = (self.cursor + 1).min(self.stream.len());
        let end = (self.cursor + LOOKAHEAD_CHARS).min(self.stream.len());
        &self.stream[start..end.max(start)]
    }

    pub fn wpm(&self) -> u32 {
        words_per_minute(self.words_typed, self.tuning.duration_secs - self.remaining_secs)
    }

    fn start(&mut self, events: &mut Vec<GameEvent>) -> InputOutcome {
        self.phase = Phase::Playing;
        self.words_typed = 0;
        self.remaining_secs = self.tuning.duration_secs;
        self.sub_ticks = 0;
        self.flash_ticks = 0;
        self.stream.clear();
        self.cursor = 0;
        self.push_words(self.tuning.initial_words);

        events.push(GameEvent::Score("WPM: 0".to_string()));
        events.push(GameEvent::Status(format!("TIME: {}s", self.remaining_secs)));
        events.push(GameEvent::Instruction(String::new()));
        events.push(GameEvent::Cue(SoundCue::Nav));
        log::info!("Typing test started");
        InputOutcome::Handled
    }

    /// Feed one typed character
    pub fn key_press(&mut self, key: char, events: &mut Vec<GameEvent>) -> InputOutcome {
        match self.phase {
            Phase::Idle if key.eq_ignore_ascii_case(&'s') => self.start(events),
            Phase::Playing => self.type_char(key),
            _ => InputOutcome::Ignored,
        }
    }

    fn type_char(&mut self, key: char) -> InputOutcome {
        let Some(expected) = self.cursor_char() else {
            return InputOutcome::Ignored;
        };
        if !key.eq_ignore_ascii_case(&expected) {
            self.flash_ticks = 1;
            return InputOutcome::Handled;
        }

        self.cursor += expected.len_utf8();
        if expected == ' ' {
            self.words_typed += 1;
            if self.stream.len() - self.cursor < self.tuning.refill_threshold {
                self.push_words(self.tuning.refill_words);
            }
        }
        InputOutcome::Handled
    }

    /// Triangle after time is up restarts immediately
    pub fn triangle(&mut self, events: &mut Vec<GameEvent>) -> InputOutcome {
        if self.phase != Phase::GameOver {
            return InputOutcome::Ignored;
        }
        self.start(events)
    }
}

impl Game for TypingTest {
    fn kind(&self) -> GameKind {
        GameKind::Typing
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn cadence(&self) -> Cadence {
        Cadence::Interval {
            period_ms: TYPING_TICK_MS,
        }
    }

    fn tick(&mut self, _now_ms: f64, events: &mut Vec<GameEvent>) {
        if self.phase != Phase::Playing {
            return;
        }
        self.flash_ticks = self.flash_ticks.saturating_sub(1);

        self.sub_ticks += 1;
        if self.sub_ticks < TICKS_PER_SEC {
            return;
        }
        self.sub_ticks = 0;

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        events.push(GameEvent::Status(format!("TIME: {}s", self.remaining_secs)));
        events.push(GameEvent::Score(format!("WPM: {}", self.wpm())));

        if self.remaining_secs == 0 {
            log::info!("Typing test over: {} words, {} WPM", self.words_typed, self.wpm());
            self.phase = Phase::GameOver;
            events.push(GameEvent::Cue(SoundCue::Cancel));
            events.push(GameEvent::Instruction(TIME_UP_TEXT.to_string()));
        }
    }

    fn input(&mut self, event: &InputEvent, _now_ms: f64, events: &mut Vec<GameEvent>) -> InputOutcome {
        match event {
            InputEvent::Key(c) => self.key_press(*c, events),
            InputEvent::Press(Button::Cross) if self.phase == Phase::Idle => self.start(events),
            InputEvent::Press(Button::Triangle) => self.triangle(events),
            _ => InputOutcome::Ignored,
        }
    }

    fn announce(&self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::Score("WPM: 0".to_string()));
        events.push(GameEvent::Status(format!("TIME: {}s", self.tuning.duration_secs)));
        events.push(GameEvent::Instruction(READY_TEXT.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> TypingTest {
        let mut t = TypingTest::new(TypingTuning::default(), 11);
        let mut events = Vec::new();
        t.key_press('s', &mut events);
        t
    }

    fn type_word(t: &mut TypingTest) {
        loop {
            let c = t.cursor_char().unwrap();
            t.key_press(c, &mut Vec::new());
            if c == ' ' {
                break;
            }
        }
    }

    fn run_secs(t: &mut TypingTest, secs: u32, events: &mut Vec<GameEvent>) {
        for _ in 0..secs * TICKS_PER_SEC {
            t.tick(0.0, events);
        }
    }

    #[test]
    fn test_wpm_formula() {
        assert_eq!(words_per_minute(0, 0), 0);
        assert_eq!(words_per_minute(5, 0), 0);
        assert_eq!(words_per_minute(5, 10), 30);
        assert_eq!(words_per_minute(7, 30), 14);
        assert_eq!(words_per_minute(1, 7), 9);
    }

    #[test]
    fn test_s_starts_and_fills_stream() {
        let t = started();
        assert_eq!(t.phase, Phase::Playing);
        assert_eq!(t.stream.split_whitespace().count(), 15);
        assert!(t.stream.ends_with(' '));
        assert!(t.stream.split_whitespace().all(|w| WORD_BANK.contains(&w)));
    }

    #[test]
    fn test_other_keys_do_not_start() {
        let mut t = TypingTest::new(TypingTuning::default(), 11);
        assert_eq!(t.key_press('x', &mut Vec::new()), InputOutcome::Ignored);
        assert_eq!(t.phase, Phase::Idle);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let mut t = started();
        let c = t.cursor_char().unwrap().to_ascii_uppercase();
        t.key_press(c, &mut Vec::new());
        assert_eq!(t.cursor, 1);
    }

    #[test]
    fn test_mismatch_flashes_without_advancing() {
        let mut t = started();
        t.key_press('#', &mut Vec::new());
        assert_eq!(t.cursor, 0);
        assert_eq!(t.flash_ticks, 1);
        t.tick(0.0, &mut Vec::new());
        assert_eq!(t.flash_ticks, 0);
    }

    #[test]
    fn test_space_completes_word_and_extends_stream() {
        let mut t = started();
        for _ in 0..3 {
            type_word(&mut t);
        }
        assert_eq!(t.words_typed, 3);

        // Type until the refill triggers
        let before = t.stream.len();
        while t.stream.len() == before {
            type_word(&mut t);
        }
        assert!(t.stream.len() - t.cursor >= 15);
        assert_eq!(t.stream.split_whitespace().count(), 20);
    }

    #[test]
    fn test_countdown_and_wpm_updates() {
        let mut t = started();
        for _ in 0..5 {
            type_word(&mut t);
        }
        let mut events = Vec::new();
        run_secs(&mut t, 10, &mut events);
        assert_eq!(t.remaining_secs, 20);
        assert!(events.contains(&GameEvent::Score("WPM: 30".to_string())));

        run_secs(&mut t, 20, &mut events);
        assert_eq!(t.phase, Phase::GameOver);
        assert!(events.contains(&GameEvent::Cue(SoundCue::Cancel)));
        assert_eq!(t.key_press('a', &mut events), InputOutcome::Ignored);
    }

    #[test]
    fn test_triangle_restarts_after_time_up() {
        let mut t = started();
        run_secs(&mut t, 30, &mut Vec::new());
        let mut events = Vec::new();
        assert_eq!(
            t.input(&InputEvent::Press(Button::Triangle), 0.0, &mut events),
            InputOutcome::Handled
        );
        assert_eq!(t.phase, Phase::Playing);
        assert_eq!(t.remaining_secs, 30);
        assert_eq!(t.cursor, 0);
    }

    #[test]
    fn test_track_windows() {
        let mut t = started();
        assert_eq!(t.done_text(), "");
        assert_eq!(t.todo_text().len(), 39.min(t.stream.len() - 1));
        for _ in 0..30 {
            let c = t.cursor_char().unwrap();
            t.key_press(c, &mut Vec::new());
        }
        assert_eq!(t.done_text().len(), LOOKBEHIND_CHARS);
    }
}
