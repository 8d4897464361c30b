//! Data-driven game balance
//!
//! Every mini-game reads its constants from a section of [`Tuning`]. All
//! sections default to the values the games were designed around, so a
//! partial JSON document only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;

/// Snake balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeTuning {
    pub width: f32,
    pub height: f32,
    /// Cell size in pixels
    pub grid_size: f32,
    pub food_score: u64,
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self {
            width: 240.0,
            height: 240.0,
            grid_size: 10.0,
            food_score: 10,
        }
    }
}

/// Tower stacker balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StackerTuning {
    pub width: f32,
    pub height: f32,
    pub box_height: f32,
    pub base_width: f32,
    pub start_speed: f32,
    /// Speed added per successful drop
    pub speed_step: f32,
    /// Camera filter gain per tick
    pub camera_gain: f32,
    /// Boxes kept visible below the active box
    pub camera_margin_boxes: f32,
}

impl Default for StackerTuning {
    fn default() -> Self {
        Self {
            width: 240.0,
            height: 320.0,
            box_height: 20.0,
            base_width: 120.0,
            start_speed: 3.0,
            speed_step: 0.2,
            camera_gain: 0.1,
            camera_margin_boxes: 4.0,
        }
    }
}

/// Pinball table balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PinballTuning {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    /// Wall and flipper restitution
    pub wall_bounce: f32,
    /// Bumper restitution (> 1 adds energy)
    pub bumper_force: f32,
    /// Per-tick velocity damping
    pub friction: f32,
    pub ball_radius: f32,
    pub launch_speed_min: f32,
    pub launch_speed_spread: f32,
    pub launch_nudge: f32,
    /// Radians per tick while pressed
    pub flip_speed: f32,
    /// Radians per tick while released
    pub flip_restore: f32,
    /// Extra upward velocity on contact with a pressed flipper
    pub flip_boost: f32,
    pub flipper_length: f32,
    pub bumper_radius: f32,
    pub bumper_score: u64,
    pub bumper_cooldown_ticks: u32,
}

impl Default for PinballTuning {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 400.0,
            gravity: 0.15,
            wall_bounce: 0.6,
            bumper_force: 1.3,
            friction: 0.99,
            ball_radius: 5.0,
            launch_speed_min: 10.0,
            launch_speed_spread: 5.0,
            launch_nudge: 1.0,
            flip_speed: 0.3,
            flip_restore: 0.1,
            flip_boost: 8.0,
            flipper_length: 50.0,
            bumper_radius: 15.0,
            bumper_score: 50,
            bumper_cooldown_ticks: 10,
        }
    }
}

/// Click speed balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickTuning {
    pub width: f32,
    pub height: f32,
    pub duration_secs: u32,
}

impl Default for ClickTuning {
    fn default() -> Self {
        Self {
            width: 240.0,
            height: 160.0,
            duration_secs: 10,
        }
    }
}

/// Typing test balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingTuning {
    pub width: f32,
    pub height: f32,
    pub duration_secs: u32,
    pub initial_words: usize,
    pub refill_words: usize,
    /// Append more words when fewer characters than this remain
    pub refill_threshold: usize,
}

impl Default for TypingTuning {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 120.0,
            duration_secs: 30,
            initial_words: 15,
            refill_words: 5,
            refill_threshold: 15,
        }
    }
}

/// Simon timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimonTuning {
    pub width: f32,
    pub height: f32,
    pub lead_in_ms: f64,
    pub step_ms: f64,
    pub pattern_light_ms: f64,
    pub press_light_ms: f64,
    pub next_level_ms: f64,
}

impl Default for SimonTuning {
    fn default() -> Self {
        Self {
            width: 240.0,
            height: 240.0,
            lead_in_ms: 800.0,
            step_ms: 600.0,
            pattern_light_ms: 400.0,
            press_light_ms: 200.0,
            next_level_ms: 1000.0,
        }
    }
}

/// Reaction test timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionTuning {
    pub width: f32,
    pub height: f32,
    pub min_delay_ms: f64,
    pub delay_spread_ms: f64,
}

impl Default for ReactionTuning {
    fn default() -> Self {
        Self {
            width: 240.0,
            height: 160.0,
            min_delay_ms: 2000.0,
            delay_spread_ms: 4000.0,
        }
    }
}

/// Flappy balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappyTuning {
    pub width: f32,
    pub height: f32,
    pub bird_x: f32,
    pub bird_start_y: f32,
    pub bird_radius: f32,
    pub gravity: f32,
    pub jump: f32,
    pub pipe_gap: f32,
    pub pipe_min_height: f32,
    pub pipe_width: f32,
    pub pipe_speed: f32,
    /// Frames between pipe spawns
    pub pipe_interval: u32,
}

impl Default for FlappyTuning {
    fn default() -> Self {
        Self {
            width: 240.0,
            height: 320.0,
            bird_x: 50.0,
            bird_start_y: 100.0,
            bird_radius: 8.0,
            gravity: 0.25,
            jump: -4.5,
            pipe_gap: 60.0,
            pipe_min_height: 20.0,
            pipe_width: 30.0,
            pipe_speed: 1.5,
            pipe_interval: 100,
        }
    }
}

/// Brick breaker balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickTuning {
    pub width: f32,
    pub height: f32,
    pub lives: u32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub ball_radius: f32,
    pub ball_speed: f32,
    /// Speed added each time the grid is cleared
    pub speed_step: f32,
    /// Horizontal velocity per pixel of paddle offset
    pub english: f32,
    pub rows: usize,
    pub cols: usize,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_padding: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for BrickTuning {
    fn default() -> Self {
        Self {
            width: 330.0,
            height: 260.0,
            lives: 3,
            paddle_width: 50.0,
            paddle_height: 5.0,
            paddle_speed: 4.0,
            ball_radius: 4.0,
            ball_speed: 3.0,
            speed_step: 0.5,
            english: 0.15,
            rows: 4,
            cols: 8,
            brick_width: 36.0,
            brick_height: 10.0,
            brick_padding: 4.0,
            offset_x: 5.0,
            offset_y: 25.0,
        }
    }
}

/// Complete tuning table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub snake: SnakeTuning,
    pub stacker: StackerTuning,
    pub pinball: PinballTuning,
    pub click: ClickTuning,
    pub typing: TypingTuning,
    pub simon: SimonTuning,
    pub reaction: ReactionTuning,
    pub flappy: FlappyTuning,
    pub brick: BrickTuning,
}

impl Tuning {
    /// Page element holding optional tuning JSON
    pub const ELEMENT_ID: &'static str = "arcade-tuning";

    /// Parse and validate a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, ArcadeError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject constants that break the simulations
    pub fn validate(&self) -> Result<(), ArcadeError> {
        fn positive(name: &'static str, value: f64) -> Result<(), ArcadeError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ArcadeError::UnsafeConstant {
                    name,
                    value,
                    safe_range: "> 0",
                })
            }
        }

        let canvases = [
            ("snake.width", self.snake.width),
            ("snake.height", self.snake.height),
            ("snake.grid_size", self.snake.grid_size),
            ("stacker.width", self.stacker.width),
            ("stacker.height", self.stacker.height),
            ("stacker.box_height", self.stacker.box_height),
            ("stacker.base_width", self.stacker.base_width),
            ("pinball.width", self.pinball.width),
            ("pinball.height", self.pinball.height),
            ("pinball.ball_radius", self.pinball.ball_radius),
            ("flappy.width", self.flappy.width),
            ("flappy.height", self.flappy.height),
            ("brick.width", self.brick.width),
            ("brick.height", self.brick.height),
            ("brick.ball_speed", self.brick.ball_speed),
        ];
        for (name, value) in canvases {
            positive(name, value as f64)?;
        }

        if self.stacker.base_width > self.stacker.width {
            return Err(ArcadeError::UnsafeConstant {
                name: "stacker.base_width",
                value: self.stacker.base_width as f64,
                safe_range: "<= stacker.width",
            });
        }
        if !(self.stacker.camera_gain > 0.0 && self.stacker.camera_gain <= 1.0) {
            return Err(ArcadeError::UnsafeConstant {
                name: "stacker.camera_gain",
                value: self.stacker.camera_gain as f64,
                safe_range: "(0, 1]",
            });
        }
        if !(self.pinball.friction > 0.0 && self.pinball.friction <= 1.0) {
            return Err(ArcadeError::UnsafeConstant {
                name: "pinball.friction",
                value: self.pinball.friction as f64,
                safe_range: "(0, 1]",
            });
        }
        if self.pinball.bumper_force < 1.0 {
            return Err(ArcadeError::UnsafeConstant {
                name: "pinball.bumper_force",
                value: self.pinball.bumper_force as f64,
                safe_range: ">= 1",
            });
        }
        let free_height = self.flappy.height - self.flappy.pipe_gap - 2.0 * self.flappy.pipe_min_height;
        if free_height < 0.0 {
            return Err(ArcadeError::UnsafeConstant {
                name: "flappy.pipe_gap",
                value: self.flappy.pipe_gap as f64,
                safe_range: "<= height - 2 * pipe_min_height",
            });
        }
        if self.flappy.pipe_interval == 0 {
            return Err(ArcadeError::UnsafeConstant {
                name: "flappy.pipe_interval",
                value: 0.0,
                safe_range: ">= 1",
            });
        }
        if self.brick.rows == 0 || self.brick.cols == 0 {
            return Err(ArcadeError::UnsafeConstant {
                name: "brick.rows/cols",
                value: (self.brick.rows.min(self.brick.cols)) as f64,
                safe_range: ">= 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{ "pinball": { "gravity": 0.2 } }"#).unwrap();
        assert!((tuning.pinball.gravity - 0.2).abs() < 1e-6);
        // Untouched fields keep defaults
        assert!((tuning.pinball.bumper_force - 1.3).abs() < 1e-6);
        assert!((tuning.stacker.base_width - 120.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_energy_draining_bumper() {
        let err = Tuning::from_json(r#"{ "pinball": { "bumper_force": 0.5 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ArcadeError::UnsafeConstant {
                name: "pinball.bumper_force",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_canvas() {
        let err = Tuning::from_json(r#"{ "snake": { "width": 0 } }"#).unwrap_err();
        assert!(err.to_string().contains("snake.width"));
    }
}
