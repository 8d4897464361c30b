//! Error types for configuration and the browser shell.
//!
//! The simulation core never fails: invalid actions are ignored and game over
//! is a normal phase. These errors only come from loading configuration and
//! from wiring the shell to the page.

use std::fmt;

/// Top-level error enum for the arcade.
#[derive(Debug)]
pub enum ArcadeError {
    /// A required DOM element was not found.
    MissingElement {
        /// Element id that was looked up.
        id: String,
    },

    /// A DOM element exists but is not the expected type.
    WrongElementType {
        /// Element id that was looked up.
        id: String,
        /// Expected element interface, e.g. `HtmlCanvasElement`.
        expected: &'static str,
    },

    /// The canvas did not hand out a 2D rendering context.
    ContextUnavailable {
        /// Canvas element id.
        id: String,
    },

    /// Settings or tuning JSON did not parse.
    InvalidConfig(serde_json::Error),

    /// Tuning constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for ArcadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcadeError::MissingElement { id } => write!(f, "element '#{}' not found", id),
            ArcadeError::WrongElementType { id, expected } => {
                write!(f, "element '#{}' is not a {}", id, expected)
            }
            ArcadeError::ContextUnavailable { id } => {
                write!(f, "canvas '#{}' has no 2d context", id)
            }
            ArcadeError::InvalidConfig(err) => write!(f, "invalid configuration: {}", err),
            ArcadeError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "tuning constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for ArcadeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArcadeError::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ArcadeError {
    fn from(err: serde_json::Error) -> Self {
        ArcadeError::InvalidConfig(err)
    }
}
