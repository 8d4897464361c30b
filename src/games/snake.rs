//! Snake on a fixed grid
//!
//! The head moves one cell per tick in the queued direction. Hitting a wall or
//! the body ends the run; eating food grows the snake by one cell.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Game, GameKind, InputOutcome, Phase};
use crate::clock::Cadence;
use crate::consts::SNAKE_TICK_MS;
use crate::input::{Button, InputEvent};
use crate::ports::{GameEvent, SoundCue};
use crate::tuning::SnakeTuning;

/// Grid cell (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn from_button(button: Button) -> Option<Self> {
        match button {
            Button::Up => Some(Direction::Up),
            Button::Down => Some(Direction::Down),
            Button::Left => Some(Direction::Left),
            Button::Right => Some(Direction::Right),
            _ => None,
        }
    }

    /// Parse the `U`/`D`/`L`/`R` letters used by the page bindings
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "U" | "u" => Some(Direction::Up),
            "D" | "d" => Some(Direction::Down),
            "L" | "l" => Some(Direction::Left),
            "R" | "r" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Snake session
#[derive(Debug, Clone)]
pub struct Snake {
    pub tuning: SnakeTuning,
    /// Head first
    pub body: VecDeque<Cell>,
    pub food: Option<Cell>,
    pub dir: Direction,
    /// Direction applied on the next tick
    pub next_dir: Direction,
    pub score: u64,
    pub phase: Phase,
    rng: Pcg32,
}

impl Snake {
    pub fn new(tuning: SnakeTuning, seed: u64) -> Self {
        let body = VecDeque::from([Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]);
        let mut snake = Self {
            tuning,
            body,
            food: None,
            dir: Direction::Right,
            next_dir: Direction::Right,
            score: 0,
            phase: Phase::Playing,
            rng: Pcg32::seed_from_u64(seed),
        };
        snake.food = snake.spawn_food();
        snake
    }

    /// Board size in cells
    pub fn columns(&self) -> i32 {
        (self.tuning.width / self.tuning.grid_size) as i32
    }

    pub fn rows(&self) -> i32 {
        (self.tuning.height / self.tuning.grid_size) as i32
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Pick a free cell, `None` when the body covers the board
    fn spawn_food(&mut self) -> Option<Cell> {
        let (cols, rows) = (self.columns(), self.rows());
        let free = (cols * rows) as usize - self.body.len().min((cols * rows) as usize);
        if free == 0 {
            return None;
        }
        // Rejection sampling is fine while the board is mostly empty
        for _ in 0..64 {
            let cell = Cell::new(self.rng.random_range(0..cols), self.rng.random_range(0..rows));
            if !self.body.contains(&cell) {
                return Some(cell);
            }
        }
        let nth = self.rng.random_range(0..free);
        (0..rows)
            .flat_map(|y| (0..cols).map(move |x| Cell::new(x, y)))
            .filter(|c| !self.body.contains(c))
            .nth(nth)
    }

    /// Queue a turn; reversing onto the neck is ignored
    pub fn steer(&mut self, dir: Direction) -> InputOutcome {
        if self.phase != Phase::Playing || dir == self.dir.opposite() {
            return InputOutcome::Ignored;
        }
        self.next_dir = dir;
        InputOutcome::Handled
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.columns() && cell.y >= 0 && cell.y < self.rows()
    }

    fn end(&mut self, events: &mut Vec<GameEvent>) {
        log::info!("Snake over (score {}, length {})", self.score, self.body.len());
        self.phase = Phase::GameOver;
        events.push(GameEvent::GameOver(true));
        events.push(GameEvent::Cue(SoundCue::Cancel));
    }
}

impl Game for Snake {
    fn kind(&self) -> GameKind {
        GameKind::Snake
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn cadence(&self) -> Cadence {
        Cadence::Interval {
            period_ms: SNAKE_TICK_MS,
        }
    }

    fn tick(&mut self, _now_ms: f64, events: &mut Vec<GameEvent>) {
        if self.phase != Phase::Playing {
            return;
        }
        self.dir = self.next_dir;
        let head = self.head().step(self.dir);

        // The tail still occupies its cell during the check
        if !self.in_bounds(head) || self.body.contains(&head) {
            self.end(events);
            return;
        }

        self.body.push_front(head);
        if self.food == Some(head) {
            self.score += self.tuning.food_score;
            events.push(GameEvent::Score(format!("SCORE: {}", self.score)));
            events.push(GameEvent::Cue(SoundCue::Select));
            self.food = self.spawn_food();
            if self.food.is_none() {
                log::info!("Snake filled the board (score {})", self.score);
                self.phase = Phase::Won;
                events.push(GameEvent::GameOver(true));
            }
        } else {
            self.body.pop_back();
        }
    }

    fn input(&mut self, event: &InputEvent, _now_ms: f64, _events: &mut Vec<GameEvent>) -> InputOutcome {
        match event {
            InputEvent::Press(Button::Cross) if self.phase.is_terminal() => InputOutcome::Restart,
            InputEvent::Press(button) => match Direction::from_button(*button) {
                Some(dir) => self.steer(dir),
                None => InputOutcome::Ignored,
            },
            _ => InputOutcome::Ignored,
        }
    }

    fn announce(&self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::GameOver(false));
        events.push(GameEvent::Score("SCORE: 0".to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake() -> Snake {
        Snake::new(SnakeTuning::default(), 5)
    }

    #[test]
    fn test_initial_layout() {
        let s = snake();
        assert_eq!(s.columns(), 24);
        assert_eq!(s.rows(), 24);
        assert_eq!(s.head(), Cell::new(10, 10));
        assert_eq!(s.body.len(), 3);
        let food = s.food.unwrap();
        assert!(!s.body.contains(&food));
    }

    #[test]
    fn test_moves_one_cell_per_tick() {
        let mut s = snake();
        s.food = Some(Cell::new(0, 0));
        let mut events = Vec::new();
        s.tick(0.0, &mut events);
        assert_eq!(s.head(), Cell::new(11, 10));
        assert_eq!(s.body.len(), 3);
        assert!(events.is_empty());
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut s = snake();
        s.food = Some(Cell::new(11, 10));
        let mut events = Vec::new();
        s.tick(0.0, &mut events);

        assert_eq!(s.body.len(), 4);
        assert_eq!(s.score, 10);
        assert!(events.contains(&GameEvent::Score("SCORE: 10".to_string())));
        assert!(events.contains(&GameEvent::Cue(SoundCue::Select)));
        assert!(!s.body.contains(&s.food.unwrap()));
    }

    #[test]
    fn test_wall_collision_ends_run() {
        let mut s = snake();
        s.food = Some(Cell::new(0, 0));
        let mut events = Vec::new();
        // 13 steps reach column 23, the 14th leaves the board
        for _ in 0..14 {
            s.tick(0.0, &mut events);
        }
        assert_eq!(s.phase, Phase::GameOver);
        assert!(events.contains(&GameEvent::GameOver(true)));
        assert!(events.contains(&GameEvent::Cue(SoundCue::Cancel)));
    }

    #[test]
    fn test_self_collision_ends_run() {
        let mut s = snake();
        s.food = Some(Cell::new(0, 0));
        s.body = VecDeque::from([
            Cell::new(5, 5),
            Cell::new(4, 5),
            Cell::new(4, 6),
            Cell::new(5, 6),
            Cell::new(6, 6),
        ]);
        s.dir = Direction::Right;
        s.steer(Direction::Down);
        let mut events = Vec::new();
        s.tick(0.0, &mut events);
        assert_eq!(s.phase, Phase::GameOver);
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut s = snake();
        assert_eq!(s.steer(Direction::Left), InputOutcome::Ignored);
        assert_eq!(s.next_dir, Direction::Right);
        assert_eq!(s.steer(Direction::Up), InputOutcome::Handled);
        assert_eq!(s.next_dir, Direction::Up);
    }

    #[test]
    fn test_full_board_is_won() {
        let tuning = SnakeTuning {
            width: 30.0,
            height: 10.0,
            ..SnakeTuning::default()
        };
        let mut s = Snake::new(tuning, 1);
        s.body = VecDeque::from([Cell::new(1, 0), Cell::new(0, 0)]);
        s.dir = Direction::Right;
        s.next_dir = Direction::Right;
        s.food = Some(Cell::new(2, 0));
        let mut events = Vec::new();
        s.tick(0.0, &mut events);
        assert_eq!(s.phase, Phase::Won);
        assert!(s.food.is_none());
        assert_eq!(
            s.input(&InputEvent::Press(Button::Cross), 0.0, &mut events),
            InputOutcome::Restart
        );
    }

    #[test]
    fn test_direction_letters() {
        assert_eq!(Direction::from_letter("U"), Some(Direction::Up));
        assert_eq!(Direction::from_letter("r"), Some(Direction::Right));
        assert_eq!(Direction::from_letter("X"), None);
    }
}
