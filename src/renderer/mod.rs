//! Canvas 2D rendering
//!
//! Games never draw themselves. [`scenes::draw`] projects a session onto the
//! small [`Canvas`] surface below; the browser shell implements it over
//! `CanvasRenderingContext2d`, tests and the native demo record into a
//! [`DrawList`].

pub mod scenes;

use glam::Vec2;

/// sRGB color with straight alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// `#rgb` shorthand colors (each nibble doubled)
    pub const fn hex3(v: u16) -> Self {
        let r = ((v >> 8) & 0xf) as u8;
        let g = ((v >> 4) & 0xf) as u8;
        let b = (v & 0xf) as u8;
        Self::rgb(r * 17, g * 17, b * 17)
    }

    /// HSL with hue in degrees, saturation and lightness in `0..=1`
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS color string for `fillStyle` / `strokeStyle`
    pub fn css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Minimal immediate-mode 2D surface
pub trait Canvas {
    fn size(&self) -> Vec2;

    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color);

    fn stroke_rect(&mut self, pos: Vec2, size: Vec2, color: Color, width: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32);

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);

    /// `px` is the font size; text is drawn with its baseline at `pos.y`
    fn text(&mut self, text: &str, pos: Vec2, px: f32, color: Color, align: Align);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect { pos: Vec2, size: Vec2, color: Color },
    StrokeRect { pos: Vec2, size: Vec2, color: Color, width: f32 },
    FillCircle { center: Vec2, radius: f32, color: Color },
    StrokeCircle { center: Vec2, radius: f32, color: Color, width: f32 },
    Line { from: Vec2, to: Vec2, color: Color, width: f32 },
    Text { text: String, pos: Vec2, px: f32, color: Color, align: Align },
}

/// Canvas that records commands for the current frame
///
/// `clear` starts a new frame, so after a draw pass the list holds exactly
/// that frame.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Canvas for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect { pos, size, color });
    }

    fn stroke_rect(&mut self, pos: Vec2, size: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokeRect { pos, size, color, width });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
            width,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line { from, to, color, width });
    }

    fn text(&mut self, text: &str, pos: Vec2, px: f32, color: Color, align: Align) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            px,
            color,
            align,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_output() {
        assert_eq!(Color::rgb(255, 0, 16).css(), "#ff0010");
        assert_eq!(Color::rgba(1, 2, 3, 0.5).css(), "rgba(1,2,3,0.5)");
        assert_eq!(Color::hex3(0xf80), Color::rgb(255, 136, 0));
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(Color::hsl(0.0, 1.0, 0.5), Color::rgb(255, 0, 0));
        assert_eq!(Color::hsl(120.0, 1.0, 0.5), Color::rgb(0, 255, 0));
        assert_eq!(Color::hsl(240.0, 1.0, 0.5), Color::rgb(0, 0, 255));
        assert_eq!(Color::hsl(360.0, 1.0, 0.5), Color::rgb(255, 0, 0));
        assert_eq!(Color::hsl(0.0, 0.0, 1.0), Color::WHITE);
    }

    #[test]
    fn test_clear_starts_new_frame() {
        let mut list = DrawList::new(10.0, 10.0);
        list.fill_rect(Vec2::ZERO, Vec2::ONE, Color::WHITE);
        list.clear(Color::BLACK);
        list.line(Vec2::ZERO, Vec2::ONE, Color::WHITE, 1.0);
        assert_eq!(list.commands().len(), 2);
        assert_eq!(list.commands()[0], DrawCommand::Clear(Color::BLACK));
    }
}
