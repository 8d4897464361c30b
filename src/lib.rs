//! XMB Arcade - handheld-console style mini-game collection
//!
//! Core modules:
//! - `sim`: Shared geometry and collision resolution
//! - `games`: One self-contained session type per mini-game
//! - `arcade`: Session registry (cancel-before-replace per game type)
//! - `clock`: Fixed-interval / frame-synchronized tick sources
//! - `renderer`: Canvas 2D projection of game state
//! - `ports`: Score, instruction and sound-cue reporting
//! - `platform`: Browser shell (wasm32 only)
//! - `settings` / `tuning`: JSON-configurable settings and game balance

pub mod arcade;
pub mod clock;
pub mod error;
pub mod games;
pub mod input;
pub mod platform;
pub mod ports;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use arcade::{Arcade, LoopControl, LoopHandle};
pub use error::ArcadeError;
pub use games::{GameKind, Phase};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frame-synchronized simulation step (the physics constants are per 60 Hz frame)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Maximum catch-up steps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Snake grid step
    pub const SNAKE_TICK_MS: f64 = 100.0;
    /// Countdown games tick once per second
    pub const COUNTDOWN_TICK_MS: f64 = 1000.0;
    /// Typing test runs a finer tick so the mistake flash is visible
    pub const TYPING_TICK_MS: f64 = 100.0;
    /// Simon pattern scheduling resolution
    pub const SIMON_TICK_MS: f64 = 50.0;
}

/// Deterministic session seed from a base seed and game slot
#[inline]
pub fn session_seed(base: u64, salt: u64) -> u64 {
    base.wrapping_mul(6364136223846793005).wrapping_add(salt.wrapping_mul(1442695040888963407))
}
