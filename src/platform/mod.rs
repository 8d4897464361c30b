//! Platform layer
//!
//! The browser shell lives in `web` (wasm32 only): DOM-backed [`Hud`],
//! `playSound` cue sink, Canvas 2D surface and the exported entry points the
//! page calls. Native builds have no shell; the headless binary drives the
//! registry directly with the in-memory ports.
//!
//! [`Hud`]: crate::ports::Hud

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Element id for one of a game's HUD parts (`stack-score`, `pinball-canvas`)
pub fn element_id(slug: &str, part: &str) -> String {
    format!("{}-{}", slug, part)
}
