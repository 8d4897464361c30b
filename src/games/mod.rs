//! Mini-game sessions
//!
//! Each game is a self-contained state machine. All of them follow the same
//! shape:
//! - `Idle -> Playing -> GameOver | Won`, back to a fresh session on restart
//! - one `tick` per clock step, pure state mutation
//! - explicit inputs mapped to state changes
//! - UI updates reported as [`GameEvent`]s, never written directly

use crate::clock::Cadence;
use crate::input::InputEvent;
use crate::ports::GameEvent;
use crate::tuning::Tuning;

pub mod brick;
pub mod click;
pub mod flappy;
pub mod pinball;
pub mod reaction;
pub mod simon;
pub mod snake;
pub mod stacker;
pub mod typing;

pub use brick::BrickBreaker;
pub use click::ClickSpeed;
pub use flappy::Flappy;
pub use pinball::Pinball;
pub use reaction::Reaction;
pub use simon::Simon;
pub use snake::Snake;
pub use stacker::Stacker;
pub use typing::TypingTest;

/// Game types, one live session each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameKind {
    Snake,
    Stacker,
    Pinball,
    Click,
    Typing,
    Simon,
    Reaction,
    Flappy,
    Brick,
}

impl GameKind {
    pub const ALL: [GameKind; 9] = [
        GameKind::Snake,
        GameKind::Stacker,
        GameKind::Pinball,
        GameKind::Click,
        GameKind::Typing,
        GameKind::Simon,
        GameKind::Reaction,
        GameKind::Flappy,
        GameKind::Brick,
    ];

    /// Prefix of the page element ids (`stack-canvas`, `stack-score`, ...)
    pub fn slug(&self) -> &'static str {
        match self {
            GameKind::Snake => "snake",
            GameKind::Stacker => "stack",
            GameKind::Pinball => "pinball",
            GameKind::Click => "click",
            GameKind::Typing => "typing",
            GameKind::Simon => "simon",
            GameKind::Reaction => "react",
            GameKind::Flappy => "flappy",
            GameKind::Brick => "brick",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the start action
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
    /// Run completed (nothing left to play)
    Won,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver | Phase::Won)
    }
}

/// What an input did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// State changed
    Handled,
    /// Not valid in the current state (silent no-op)
    Ignored,
    /// Tear the session down and start a fresh one
    Restart,
}

/// Common surface every session exposes to the registry
pub trait Game {
    fn kind(&self) -> GameKind;

    fn phase(&self) -> Phase;

    fn cadence(&self) -> Cadence;

    /// Whether the session currently wants clock ticks
    fn is_running(&self) -> bool {
        self.phase() == Phase::Playing
    }

    /// Advance by one clock step
    fn tick(&mut self, now_ms: f64, events: &mut Vec<GameEvent>);

    /// Apply one input event
    fn input(&mut self, event: &InputEvent, now_ms: f64, events: &mut Vec<GameEvent>) -> InputOutcome;

    /// Events describing the fresh session (initial score / instruction text)
    fn announce(&self, events: &mut Vec<GameEvent>);
}

/// One live session of any game type
#[derive(Debug, Clone)]
pub enum Session {
    Snake(Snake),
    Stacker(Stacker),
    Pinball(Pinball),
    Click(ClickSpeed),
    Typing(TypingTest),
    Simon(Simon),
    Reaction(Reaction),
    Flappy(Flappy),
    Brick(BrickBreaker),
}

impl Session {
    /// Build a fresh session for `kind`
    pub fn new(kind: GameKind, tuning: &Tuning, seed: u64) -> Self {
        match kind {
            GameKind::Snake => Session::Snake(Snake::new(tuning.snake.clone(), seed)),
            GameKind::Stacker => Session::Stacker(Stacker::new(tuning.stacker.clone(), seed)),
            GameKind::Pinball => Session::Pinball(Pinball::new(tuning.pinball.clone(), seed)),
            GameKind::Click => Session::Click(ClickSpeed::new(tuning.click.clone())),
            GameKind::Typing => Session::Typing(TypingTest::new(tuning.typing.clone(), seed)),
            GameKind::Simon => Session::Simon(Simon::new(tuning.simon.clone(), seed)),
            GameKind::Reaction => Session::Reaction(Reaction::new(tuning.reaction.clone(), seed)),
            GameKind::Flappy => Session::Flappy(Flappy::new(tuning.flappy.clone(), seed)),
            GameKind::Brick => Session::Brick(BrickBreaker::new(tuning.brick.clone(), seed)),
        }
    }

    pub fn game(&self) -> &dyn Game {
        match self {
            Session::Snake(g) => g,
            Session::Stacker(g) => g,
            Session::Pinball(g) => g,
            Session::Click(g) => g,
            Session::Typing(g) => g,
            Session::Simon(g) => g,
            Session::Reaction(g) => g,
            Session::Flappy(g) => g,
            Session::Brick(g) => g,
        }
    }

    pub fn game_mut(&mut self) -> &mut dyn Game {
        match self {
            Session::Snake(g) => g,
            Session::Stacker(g) => g,
            Session::Pinball(g) => g,
            Session::Click(g) => g,
            Session::Typing(g) => g,
            Session::Simon(g) => g,
            Session::Reaction(g) => g,
            Session::Flappy(g) => g,
            Session::Brick(g) => g,
        }
    }
}
