//! Abstract console input
//!
//! The shell translates keyboard, pointer and gamepad events into these
//! values; each game decides what they mean.

use glam::Vec2;

/// Console face buttons and directional pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Cross,
    Circle,
    Triangle,
    Square,
    Up,
    Down,
    Left,
    Right,
}

impl Button {
    /// Keyboard mapping used by the shell
    ///
    /// Face buttons sit on the home row the way handheld emulators map them
    /// (`s` = cross, `d` = circle, `w` = triangle, `a` = square).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Button::Up),
            "ArrowDown" => Some(Button::Down),
            "ArrowLeft" => Some(Button::Left),
            "ArrowRight" => Some(Button::Right),
            "s" | "S" | "Enter" | " " => Some(Button::Cross),
            "d" | "D" => Some(Button::Circle),
            "w" | "W" => Some(Button::Triangle),
            "a" | "A" => Some(Button::Square),
            _ => None,
        }
    }

    /// Name used by the exported action functions (`simon_btn_press("cross")`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "cross" => Some(Button::Cross),
            "circle" => Some(Button::Circle),
            "triangle" => Some(Button::Triangle),
            "square" => Some(Button::Square),
            "up" | "u" => Some(Button::Up),
            "down" | "d" => Some(Button::Down),
            "left" | "l" => Some(Button::Left),
            "right" | "r" => Some(Button::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Button::Cross => "cross",
            Button::Circle => "circle",
            Button::Triangle => "triangle",
            Button::Square => "square",
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
        }
    }
}

/// One input event delivered to a game session
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Press(Button),
    Release(Button),
    /// Printable character (typing test)
    Key(char),
    /// Pointer in canvas coordinates
    Pointer { pos: Vec2, down: bool },
}

impl InputEvent {
    /// Convenience for a single-character key string
    pub fn from_key_str(key: &str) -> Option<Self> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(InputEvent::Key(c)),
            _ => None,
        }
    }
}
