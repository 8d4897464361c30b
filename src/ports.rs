//! Presentation ports
//!
//! Games never touch the page. They push [`GameEvent`]s; the registry drains
//! them into whatever [`Hud`] and [`CueSink`] the shell injected.

/// Named sound cues understood by the shell's `playSound`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Select,
    Nav,
    Cancel,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Select => "select",
            SoundCue::Nav => "nav",
            SoundCue::Cancel => "cancel",
        }
    }
}

/// Something a game wants the surrounding UI to know
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Cue(SoundCue),
    /// Score line text (format is game specific)
    Score(String),
    /// Instruction text, may contain `<br>`
    Instruction(String),
    /// Secondary readout (countdown, reaction prompt)
    Status(String),
    /// Show or hide the game-over banner
    GameOver(bool),
    /// Stacker placement with zero overlap loss
    PerfectDrop,
}

/// Score / instruction / game-over text sink
pub trait Hud {
    fn set_score(&mut self, text: &str);
    fn set_instruction(&mut self, text: &str);
    fn set_status(&mut self, text: &str);
    fn set_game_over(&mut self, visible: bool);
}

/// Fire-and-forget sound notification sink
pub trait CueSink {
    fn play(&mut self, cue: SoundCue);
}

/// Route drained events to the ports
pub fn dispatch(events: &[GameEvent], hud: &mut dyn Hud, cues: &mut dyn CueSink) {
    for event in events {
        match event {
            GameEvent::Cue(cue) => cues.play(*cue),
            GameEvent::Score(text) => hud.set_score(text),
            GameEvent::Instruction(text) => hud.set_instruction(text),
            GameEvent::Status(text) => hud.set_status(text),
            GameEvent::GameOver(visible) => hud.set_game_over(*visible),
            GameEvent::PerfectDrop => log::debug!("Perfect drop"),
        }
    }
}

/// HUD that remembers the latest value of every field (tests, headless runs)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    pub score: String,
    pub instruction: String,
    pub status: String,
    pub game_over: bool,
    /// Number of times the game-over banner was shown
    pub game_over_shown: u32,
}

impl Hud for HudSnapshot {
    fn set_score(&mut self, text: &str) {
        self.score = text.to_string();
    }

    fn set_instruction(&mut self, text: &str) {
        self.instruction = text.to_string();
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn set_game_over(&mut self, visible: bool) {
        if visible {
            self.game_over_shown += 1;
        }
        self.game_over = visible;
    }
}

/// Cue sink that records every cue in order
#[derive(Debug, Clone, Default)]
pub struct CueLog {
    pub cues: Vec<SoundCue>,
}

impl CueLog {
    pub fn count(&self, cue: SoundCue) -> usize {
        self.cues.iter().filter(|c| **c == cue).count()
    }
}

impl CueSink for CueLog {
    fn play(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_routes_each_event() {
        let mut hud = HudSnapshot::default();
        let mut cues = CueLog::default();
        let events = vec![
            GameEvent::Score("SCORE: 3".to_string()),
            GameEvent::Cue(SoundCue::Nav),
            GameEvent::GameOver(true),
            GameEvent::Cue(SoundCue::Cancel),
            GameEvent::PerfectDrop,
        ];
        dispatch(&events, &mut hud, &mut cues);

        assert_eq!(hud.score, "SCORE: 3");
        assert!(hud.game_over);
        assert_eq!(hud.game_over_shown, 1);
        assert_eq!(cues.cues, vec![SoundCue::Nav, SoundCue::Cancel]);
    }

    #[test]
    fn test_cue_names() {
        assert_eq!(SoundCue::Select.as_str(), "select");
        assert_eq!(SoundCue::Nav.as_str(), "nav");
        assert_eq!(SoundCue::Cancel.as_str(), "cancel");
    }
}
