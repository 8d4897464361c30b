//! Per-game projections onto a [`Canvas`]
//!
//! Pure functions of session state: nothing here mutates a game, so a frame
//! can be redrawn at any time.

use glam::Vec2;

use super::{Align, Canvas, Color};
use crate::games::brick::BrickBreaker;
use crate::games::flappy::Flappy;
use crate::games::pinball::Pinball;
use crate::games::reaction::{ReactState, Reaction};
use crate::games::simon::{PADS, Simon};
use crate::games::snake::Snake;
use crate::games::stacker::{BoxColor, Stacker};
use crate::games::typing::TypingTest;
use crate::games::{ClickSpeed, Phase, Session};
use crate::input::Button;

/// Monospace advance used to lay out the typing track
pub const TRACK_CHAR_WIDTH: f32 = 12.0;
/// Side of one Simon pad
pub const SIMON_PAD: f32 = 60.0;

const BRICK_ROW_COLORS: [Color; 4] = [
    Color::hex3(0xf22),
    Color::hex3(0xf82),
    Color::hex3(0xff2),
    Color::hex3(0x2f2),
];

/// Draw the current state of any session
pub fn draw(session: &Session, canvas: &mut dyn Canvas) {
    match session {
        Session::Snake(g) => snake(g, canvas),
        Session::Stacker(g) => stacker(g, canvas),
        Session::Pinball(g) => pinball(g, canvas),
        Session::Click(g) => click(g, canvas),
        Session::Typing(g) => typing(g, canvas),
        Session::Simon(g) => simon(g, canvas),
        Session::Reaction(g) => reaction(g, canvas),
        Session::Flappy(g) => flappy(g, canvas),
        Session::Brick(g) => brick(g, canvas),
    }
}

pub fn snake(game: &Snake, canvas: &mut dyn Canvas) {
    canvas.clear(Color::BLACK);
    let cell = game.tuning.grid_size;
    let size = Vec2::splat(cell - 1.0);

    if let Some(food) = game.food {
        canvas.fill_rect(Vec2::new(food.x as f32, food.y as f32) * cell, size, Color::hex3(0xf00));
    }
    for (i, seg) in game.body.iter().enumerate() {
        let color = if i == 0 { Color::hex3(0xcfc) } else { Color::hex3(0x0a0) };
        canvas.fill_rect(Vec2::new(seg.x as f32, seg.y as f32) * cell, size, color);
    }
}

fn box_color(color: BoxColor) -> Color {
    match color {
        BoxColor::Base => Color::hex3(0x444),
        BoxColor::Hue(h) => Color::hsl(h, 0.8, 0.5),
    }
}

pub fn stacker(game: &Stacker, canvas: &mut dyn Canvas) {
    canvas.clear(Color::BLACK);
    let scroll = Vec2::new(0.0, game.scroll_y);
    for b in game.settled.iter().chain(std::iter::once(&game.active)) {
        canvas.fill_rect(
            Vec2::new(b.x, b.y) + scroll,
            Vec2::new(b.width, b.height),
            box_color(b.color),
        );
    }
}

pub fn pinball(game: &Pinball, canvas: &mut dyn Canvas) {
    canvas.clear(Color::hex3(0x111));

    for wall in &game.walls {
        canvas.line(wall.p1, wall.p2, Color::hex3(0x0ff), 2.0);
    }
    for bumper in &game.bumpers {
        let fill = if bumper.hit_cooldown_ticks > 0 {
            Color::WHITE
        } else {
            Color::hex3(0xf0f)
        };
        canvas.fill_circle(bumper.shape.center, bumper.shape.radius, fill);
        canvas.stroke_circle(bumper.shape.center, bumper.shape.radius, Color::WHITE, 2.0);
    }
    for flipper in [&game.left, &game.right] {
        canvas.line(flipper.pivot, flipper.tip(), Color::hex3(0xff0), 4.0);
    }
    canvas.fill_circle(game.ball.pos, game.ball.radius, Color::WHITE);
}

pub fn click(game: &ClickSpeed, canvas: &mut dyn Canvas) {
    canvas.clear(Color::hex3(0x111));
    let size = canvas.size();
    let color = match game.phase {
        Phase::Playing => Color::WHITE,
        _ => Color::hex3(0x888),
    };
    canvas.text(
        &game.score.to_string(),
        Vec2::new(size.x / 2.0, size.y / 2.0 + 16.0),
        48.0,
        color,
        Align::Center,
    );
    canvas.text(
        &format!("TIME: {}s", game.remaining_secs),
        Vec2::new(size.x / 2.0, size.y - 12.0),
        14.0,
        Color::hex3(0xaaa),
        Align::Center,
    );
}

pub fn typing(game: &TypingTest, canvas: &mut dyn Canvas) {
    canvas.clear(Color::hex3(0x111));
    let size = canvas.size();
    let baseline = size.y / 2.0 + 7.0;
    let cursor_x = size.x / 2.0;

    let track = if game.flash_ticks > 0 {
        Color::hex3(0xf00)
    } else {
        Color::hex3(0x888)
    };

    // Completed text sits left of the fixed cursor column
    let done = game.done_text();
    let done_x = cursor_x - done.len() as f32 * TRACK_CHAR_WIDTH;
    canvas.text(done, Vec2::new(done_x, baseline), 20.0, track.with_alpha(0.5), Align::Left);

    if let Some(c) = game.cursor_char() {
        canvas.fill_rect(
            Vec2::new(cursor_x, baseline - 18.0),
            Vec2::new(TRACK_CHAR_WIDTH, 24.0),
            Color::hex3(0x0cf).with_alpha(0.3),
        );
        canvas.text(&c.to_string(), Vec2::new(cursor_x, baseline), 20.0, Color::WHITE, Align::Left);
    }
    canvas.text(
        game.todo_text(),
        Vec2::new(cursor_x + TRACK_CHAR_WIDTH, baseline),
        20.0,
        track,
        Align::Left,
    );
}

/// Pad color and its top-left corner in a `size` canvas
pub fn simon_pad(button: Button, size: Vec2) -> (Color, Vec2) {
    let c = size / 2.0 - Vec2::splat(SIMON_PAD / 2.0);
    let step = SIMON_PAD + 4.0;
    match button {
        Button::Triangle => (Color::rgb(136, 170, 255), c - Vec2::new(0.0, step)),
        Button::Circle => (Color::rgb(255, 136, 136), c + Vec2::new(step, 0.0)),
        Button::Cross => (Color::rgb(136, 255, 204), c + Vec2::new(0.0, step)),
        _ => (Color::rgb(255, 136, 255), c - Vec2::new(step, 0.0)),
    }
}

pub fn simon(game: &Simon, canvas: &mut dyn Canvas) {
    canvas.clear(Color::hex3(0x111));
    let size = canvas.size();
    let lit = game.light.map(|l| l.button);
    for pad in PADS {
        let (color, pos) = simon_pad(pad, size);
        let alpha = if lit == Some(pad) { 0.8 } else { 0.2 };
        canvas.fill_rect(pos, Vec2::splat(SIMON_PAD), color.with_alpha(alpha));
        canvas.stroke_rect(pos, Vec2::splat(SIMON_PAD), color, 2.0);
    }
}

pub fn reaction(game: &Reaction, canvas: &mut dyn Canvas) {
    let (background, text) = match game.state {
        ReactState::Idle => (Color::hex3(0x222), "Reaction Test".to_string()),
        ReactState::Waiting { .. } => (Color::hex3(0xa22), "Wait for Green...".to_string()),
        ReactState::Ready { .. } => (Color::hex3(0x2a2), "PRESS ✕ NOW!".to_string()),
        ReactState::TooEarly => (Color::hex3(0x222), "Too Early!".to_string()),
        ReactState::Result { ms } => (Color::hex3(0x222), format!("{} ms", ms)),
    };
    canvas.clear(background);
    let size = canvas.size();
    canvas.text(&text, size / 2.0 + Vec2::new(0.0, 8.0), 22.0, Color::WHITE, Align::Center);
    if let Some(best) = game.best_ms {
        canvas.text(
            &format!("BEST: {} ms", best),
            Vec2::new(size.x / 2.0, size.y - 12.0),
            12.0,
            Color::hex3(0xccc),
            Align::Center,
        );
    }
}

pub fn flappy(game: &Flappy, canvas: &mut dyn Canvas) {
    canvas.clear(Color::rgb(112, 197, 206));
    let height = canvas.size().y;

    for pipe in &game.pipes {
        let top = (Vec2::new(pipe.x, 0.0), Vec2::new(pipe.width, pipe.top));
        let bottom = (
            Vec2::new(pipe.x, pipe.bottom_y),
            Vec2::new(pipe.width, height - pipe.bottom_y),
        );
        for (pos, size) in [top, bottom] {
            canvas.fill_rect(pos, size, Color::hex3(0x2d2));
            canvas.stroke_rect(pos, size, Color::hex3(0x050), 2.0);
        }
    }

    let bird = &game.bird;
    let center = Vec2::new(bird.x, bird.y);
    canvas.fill_circle(center, bird.radius, Color::rgb(255, 204, 0));
    canvas.fill_circle(center + Vec2::new(3.0, -2.0), 2.0, Color::BLACK);
}

pub fn brick(game: &BrickBreaker, canvas: &mut dyn Canvas) {
    canvas.clear(Color::BLACK);
    let t = &game.tuning;
    let brick_size = Vec2::new(t.brick_width, t.brick_height);

    for b in game.bricks.iter().filter(|b| b.alive) {
        let color = BRICK_ROW_COLORS[b.row % BRICK_ROW_COLORS.len()];
        canvas.fill_rect(Vec2::new(b.x, b.y), brick_size, color);
    }
    let p = &game.paddle;
    canvas.fill_rect(Vec2::new(p.x, p.y), Vec2::new(p.width, p.height), Color::hex3(0x0cf));
    canvas.fill_circle(game.ball.pos, game.ball.radius, Color::WHITE);

    if game.phase == Phase::Idle {
        let size = canvas.size();
        canvas.text(
            "Press ✕ to Start",
            Vec2::new(size.x / 2.0, size.y / 2.0 + 50.0),
            16.0,
            Color::WHITE,
            Align::Center,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::GameKind;
    use crate::renderer::{DrawCommand, DrawList};
    use crate::tuning::{
        BrickTuning, PinballTuning, SimonTuning, SnakeTuning, StackerTuning, Tuning, TypingTuning,
    };

    fn is_fill_rect(c: &DrawCommand) -> bool {
        matches!(c, DrawCommand::FillRect { .. })
    }

    fn is_line(c: &DrawCommand) -> bool {
        matches!(c, DrawCommand::Line { .. })
    }

    #[test]
    fn test_every_scene_starts_with_clear() {
        let tuning = Tuning::default();
        for kind in GameKind::ALL {
            let session = Session::new(kind, &tuning, 1);
            let mut list = DrawList::new(240.0, 240.0);
            draw(&session, &mut list);
            assert!(
                matches!(list.commands().first(), Some(DrawCommand::Clear(_))),
                "{:?}",
                kind
            );
        }
    }

    #[test]
    fn test_snake_draws_food_and_body() {
        let game = Snake::new(SnakeTuning::default(), 1);
        let mut list = DrawList::new(240.0, 240.0);
        snake(&game, &mut list);
        assert_eq!(list.count(is_fill_rect), game.body.len() + 1);
    }

    #[test]
    fn test_stacker_applies_scroll() {
        let mut game = Stacker::new(StackerTuning::default(), 1);
        game.scroll_y = 40.0;
        let mut list = DrawList::new(240.0, 320.0);
        stacker(&game, &mut list);

        assert_eq!(list.count(is_fill_rect), 2);
        let base = &list.commands()[1];
        assert_eq!(
            *base,
            DrawCommand::FillRect {
                pos: Vec2::new(60.0, 340.0),
                size: Vec2::new(120.0, 20.0),
                color: Color::hex3(0x444),
            }
        );
    }

    #[test]
    fn test_pinball_lines() {
        let game = Pinball::new(PinballTuning::default(), 1);
        let mut list = DrawList::new(300.0, 400.0);
        pinball(&game, &mut list);
        // Eight walls plus two flippers
        assert_eq!(list.count(is_line), 10);
        assert_eq!(
            list.count(|c| matches!(c, DrawCommand::FillCircle { .. })),
            game.bumpers.len() + 1
        );
    }

    #[test]
    fn test_lit_bumper_turns_white() {
        let mut game = Pinball::new(PinballTuning::default(), 1);
        game.bumpers[1].hit_cooldown_ticks = 5;
        let mut list = DrawList::new(300.0, 400.0);
        pinball(&game, &mut list);
        let whites = list.count(|c| {
            matches!(c, DrawCommand::FillCircle { color, radius, .. } if *color == Color::WHITE && *radius == 15.0)
        });
        assert_eq!(whites, 1);
    }

    #[test]
    fn test_simon_highlights_lit_pad() {
        let mut game = Simon::new(SimonTuning::default(), 1);
        game.press(Button::Cross, 0.0, &mut Vec::new());
        game.light = Some(crate::games::simon::Light {
            button: Button::Circle,
            until_ms: 1000.0,
        });
        let mut list = DrawList::new(240.0, 240.0);
        simon(&game, &mut list);
        let bright = list.count(|c| matches!(c, DrawCommand::FillRect { color, .. } if color.a == 0.8));
        assert_eq!(bright, 1);
    }

    #[test]
    fn test_typing_track_text() {
        let mut game = TypingTest::new(TypingTuning::default(), 1);
        game.key_press('s', &mut Vec::new());
        let mut list = DrawList::new(480.0, 120.0);
        typing(&game, &mut list);
        let texts: Vec<&str> = list.texts().collect();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[1], game.cursor_char().unwrap().to_string());
        assert_eq!(texts[2], game.todo_text());
    }

    #[test]
    fn test_brick_idle_prompt_and_bricks() {
        let game = BrickBreaker::new(BrickTuning::default(), 1);
        let mut list = DrawList::new(330.0, 260.0);
        brick(&game, &mut list);
        // 32 bricks plus the paddle
        assert_eq!(list.count(is_fill_rect), 33);
        assert!(list.texts().any(|t| t.contains("Start")));
    }
}
