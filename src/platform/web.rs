//! Browser shell
//!
//! One registry per page, kept in a thread-local. Each game type owns at most
//! one `requestAnimationFrame` chain; starting a game cancels the pending
//! frame of the previous chain before scheduling the new one, and the
//! registry's loop handles refuse anything that slips through.

use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use super::element_id;
use crate::arcade::{Arcade, LoopControl, LoopHandle};
use crate::error::ArcadeError;
use crate::games::GameKind;
use crate::games::snake::Direction;
use crate::input::{Button, InputEvent};
use crate::ports::{CueSink, Hud, SoundCue};
use crate::renderer::{Align, Canvas, Color};
use crate::settings::Settings;
use crate::tuning::Tuning;

#[wasm_bindgen]
extern "C" {
    /// Sound playback provided by the page
    #[wasm_bindgen(catch, js_name = playSound)]
    fn play_sound(cue: &str) -> Result<(), JsValue>;
}

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Text content of an optional `<script type="application/json">` block
fn config_text(id: &str) -> Option<String> {
    document()?.get_element_by_id(id)?.text_content()
}

/// HUD elements of one game, looked up per write
struct WebHud {
    document: Option<Document>,
    slug: &'static str,
}

impl WebHud {
    fn new(kind: GameKind) -> Self {
        Self {
            document: document(),
            slug: kind.slug(),
        }
    }

    fn element(&self, part: &str) -> Option<HtmlElement> {
        let id = element_id(self.slug, part);
        let element = self.document.as_ref()?.get_element_by_id(&id);
        if element.is_none() {
            log::debug!("HUD element #{} not on page", id);
        }
        element?.dyn_into::<HtmlElement>().ok()
    }
}

impl Hud for WebHud {
    fn set_score(&mut self, text: &str) {
        if let Some(el) = self.element("score") {
            el.set_inner_text(text);
        }
    }

    fn set_instruction(&mut self, text: &str) {
        if let Some(el) = self.element("instruction") {
            el.set_inner_html(text);
        }
    }

    fn set_status(&mut self, text: &str) {
        if let Some(el) = self.element("status") {
            el.set_inner_text(text);
        }
    }

    fn set_game_over(&mut self, visible: bool) {
        if let Some(el) = self.element("gameover") {
            let display = if visible { "block" } else { "none" };
            let _ = el.style().set_property("display", display);
        }
    }
}

/// Forwards cues to the page's `playSound`; failures are ignored
struct WebCues {
    muted: bool,
}

impl CueSink for WebCues {
    fn play(&mut self, cue: SoundCue) {
        if self.muted {
            return;
        }
        if let Err(err) = play_sound(cue.as_str()) {
            log::debug!("playSound({}) failed: {:?}", cue.as_str(), err);
        }
    }
}

/// `<slug>-canvas` with its 2D context
struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    fn find(kind: GameKind) -> Result<Self, ArcadeError> {
        let id = element_id(kind.slug(), "canvas");
        let element = document()
            .and_then(|d| d.get_element_by_id(&id))
            .ok_or_else(|| ArcadeError::MissingElement { id: id.clone() })?;
        let canvas: HtmlCanvasElement = element.dyn_into().map_err(|_| ArcadeError::WrongElementType {
            id: id.clone(),
            expected: "HtmlCanvasElement",
        })?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(ArcadeError::ContextUnavailable { id })?;
        Ok(Self { canvas, ctx })
    }

    /// Map client (page) coordinates into canvas pixels
    fn to_canvas(&self, client_x: f64, client_y: f64) -> Vec2 {
        let rect = self.canvas.get_bounding_client_rect();
        let sx = if rect.width() > 0.0 { self.canvas.width() as f64 / rect.width() } else { 1.0 };
        let sy = if rect.height() > 0.0 { self.canvas.height() as f64 / rect.height() } else { 1.0 };
        Vec2::new(
            ((client_x - rect.left()) * sx) as f32,
            ((client_y - rect.top()) * sy) as f32,
        )
    }
}

impl Canvas for CanvasSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self, color: Color) {
        let size = self.size();
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn stroke_rect(&mut self, pos: Vec2, size: Vec2, color: Color, width: f32) {
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }

    fn text(&mut self, text: &str, pos: Vec2, px: f32, color: Color, align: Align) {
        self.ctx.set_font(&format!("{}px 'Courier New', monospace", px));
        self.ctx.set_text_align(match align {
            Align::Left => "left",
            Align::Center => "center",
        });
        self.ctx.set_fill_style_str(&color.css());
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }
}

/// Page-wide shell state
struct Shell {
    arcade: Arcade,
    settings: Settings,
    surfaces: HashMap<GameKind, CanvasSurface>,
    /// Pending `requestAnimationFrame` id per game
    frame_ids: HashMap<GameKind, i32>,
}

impl Shell {
    fn new(settings: Settings, tuning: Tuning) -> Self {
        let seed = settings.effective_seed(js_sys::Date::now() as u64);
        log::info!("Arcade shell ready (seed {})", seed);
        Self {
            arcade: Arcade::new(tuning, seed),
            settings,
            surfaces: HashMap::new(),
            frame_ids: HashMap::new(),
        }
    }

    fn cues(&self) -> WebCues {
        WebCues {
            muted: self.settings.mute_cues,
        }
    }

    fn cancel_frame(&mut self, kind: GameKind) {
        if let Some(id) = self.frame_ids.remove(&kind) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    /// Look the canvas up once; later calls reuse it
    fn ensure_surface(&mut self, kind: GameKind) -> Result<(), ArcadeError> {
        if !self.surfaces.contains_key(&kind) {
            let surface = CanvasSurface::find(kind)?;
            self.surfaces.insert(kind, surface);
        }
        Ok(())
    }

    fn init(&mut self, kind: GameKind) {
        if let Err(err) = self.ensure_surface(kind) {
            log::error!("Cannot start {}: {}", kind.slug(), err);
            return;
        }
        self.cancel_frame(kind);
        let mut hud = WebHud::new(kind);
        let mut cues = self.cues();
        let handle = self.arcade.init(kind, &mut hud, &mut cues);
        self.schedule(handle);
    }

    fn schedule(&mut self, handle: LoopHandle) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| on_frame(handle, time));
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => {
                self.frame_ids.insert(handle.kind, id);
            }
            Err(err) => log::error!("requestAnimationFrame failed: {:?}", err),
        }
        closure.forget();
    }

    fn frame(&mut self, handle: LoopHandle, time: f64) {
        let kind = handle.kind;
        self.frame_ids.remove(&kind);
        let Some(surface) = self.surfaces.get_mut(&kind) else {
            return;
        };
        let mut hud = WebHud::new(kind);
        let mut cues = WebCues {
            muted: self.settings.mute_cues,
        };
        if self.arcade.frame(handle, time, &mut hud, &mut cues, surface) == LoopControl::Continue {
            self.schedule(handle);
        }
    }

    fn input(&mut self, kind: GameKind, event: InputEvent) {
        let mut hud = WebHud::new(kind);
        let mut cues = self.cues();
        let restarted = self.arcade.input(kind, &event, now_ms(), &mut hud, &mut cues);

        if let Some(surface) = self.surfaces.get_mut(&kind) {
            self.arcade.render(kind, surface);
        }
        if let Some(handle) = restarted {
            self.cancel_frame(kind);
            self.schedule(handle);
        }
    }

    fn pointer(&mut self, kind: GameKind, client_x: f64, client_y: f64, down: bool) {
        let Some(surface) = self.surfaces.get(&kind) else {
            return;
        };
        let pos = surface.to_canvas(client_x, client_y);
        self.input(kind, InputEvent::Pointer { pos, down });
    }
}

thread_local! {
    static SHELL: RefCell<Option<Shell>> = const { RefCell::new(None) };
}

/// Run `f` against the shell, creating it with defaults if `start` never ran
fn with_shell(f: impl FnOnce(&mut Shell)) {
    SHELL.with(|cell| {
        let mut slot = cell.borrow_mut();
        let shell = slot.get_or_insert_with(|| Shell::new(Settings::default(), Tuning::default()));
        f(shell);
    });
}

fn on_frame(handle: LoopHandle, time: f64) {
    with_shell(|shell| shell.frame(handle, time));
}

fn send(kind: GameKind, event: InputEvent) {
    with_shell(|shell| shell.input(kind, event));
}

fn press_button(kind: GameKind, button: Button) {
    send(kind, InputEvent::Press(button));
}

fn kind_from_slug(slug: &str) -> Option<GameKind> {
    let kind = GameKind::from_slug(slug);
    if kind.is_none() {
        log::warn!("Unknown game '{}'", slug);
    }
    kind
}

/// Load settings and tuning from the page and install the logger
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let settings = config_text(Settings::ELEMENT_ID).map(|text| Settings::from_json(&text));
    let level = match &settings {
        Some(Ok(s)) => s.log_level.to_level(),
        _ => log::Level::Info,
    };
    let _ = console_log::init_with_level(level);

    let settings = match settings {
        Some(Ok(s)) => s,
        Some(Err(err)) => {
            log::error!("Ignoring #{}: {}", Settings::ELEMENT_ID, err);
            Settings::default()
        }
        None => Settings::default(),
    };
    let tuning = match config_text(Tuning::ELEMENT_ID).map(|text| Tuning::from_json(&text)) {
        Some(Ok(t)) => t,
        Some(Err(err)) => {
            log::error!("Ignoring #{}: {}", Tuning::ELEMENT_ID, err);
            Tuning::default()
        }
        None => Tuning::default(),
    };

    SHELL.with(|cell| *cell.borrow_mut() = Some(Shell::new(settings, tuning)));
}

// Lifecycle

#[wasm_bindgen]
pub fn init_snake_game() {
    with_shell(|s| s.init(GameKind::Snake));
}

#[wasm_bindgen]
pub fn init_stack_game() {
    with_shell(|s| s.init(GameKind::Stacker));
}

#[wasm_bindgen]
pub fn init_pinball_game() {
    with_shell(|s| s.init(GameKind::Pinball));
}

#[wasm_bindgen]
pub fn init_click_game() {
    with_shell(|s| s.init(GameKind::Click));
}

#[wasm_bindgen]
pub fn init_typing_game() {
    with_shell(|s| s.init(GameKind::Typing));
}

#[wasm_bindgen]
pub fn init_simon_game() {
    with_shell(|s| s.init(GameKind::Simon));
}

#[wasm_bindgen]
pub fn init_react_game() {
    with_shell(|s| s.init(GameKind::Reaction));
}

#[wasm_bindgen]
pub fn init_flappy_game() {
    with_shell(|s| s.init(GameKind::Flappy));
}

#[wasm_bindgen]
pub fn init_brick_game() {
    with_shell(|s| s.init(GameKind::Brick));
}

/// Start any game by its page slug
#[wasm_bindgen]
pub fn init_game(slug: &str) {
    if let Some(kind) = kind_from_slug(slug) {
        with_shell(|s| s.init(kind));
    }
}

/// Leave a game: its loop stops and the session is dropped
#[wasm_bindgen]
pub fn stop_game(slug: &str) {
    if let Some(kind) = kind_from_slug(slug) {
        with_shell(|s| {
            s.cancel_frame(kind);
            s.arcade.stop(kind);
        });
    }
}

// Per-game actions

#[wasm_bindgen]
pub fn stack_drop_box() {
    press_button(GameKind::Stacker, Button::Cross);
}

#[wasm_bindgen]
pub fn pinball_launch() {
    press_button(GameKind::Pinball, Button::Cross);
}

/// `side` is `"left"` or `"right"`
#[wasm_bindgen]
pub fn pinball_flipper(side: &str, pressed: bool) {
    let button = match side {
        "left" | "l" => Button::Left,
        "right" | "r" => Button::Right,
        _ => return,
    };
    let event = if pressed { InputEvent::Press(button) } else { InputEvent::Release(button) };
    send(GameKind::Pinball, event);
}

/// `dir` is one of `U`, `D`, `L`, `R`
#[wasm_bindgen]
pub fn snake_direction(dir: &str) {
    let button = match Direction::from_letter(dir) {
        Some(Direction::Up) => Button::Up,
        Some(Direction::Down) => Button::Down,
        Some(Direction::Left) => Button::Left,
        Some(Direction::Right) => Button::Right,
        None => return,
    };
    press_button(GameKind::Snake, button);
}

#[wasm_bindgen]
pub fn click_action() {
    press_button(GameKind::Click, Button::Cross);
}

#[wasm_bindgen]
pub fn click_triangle() {
    press_button(GameKind::Click, Button::Triangle);
}

/// Raw `KeyboardEvent.key` value
#[wasm_bindgen]
pub fn typing_key_press(key: &str) {
    if let Some(event) = InputEvent::from_key_str(key) {
        send(GameKind::Typing, event);
    }
}

#[wasm_bindgen]
pub fn typing_triangle() {
    press_button(GameKind::Typing, Button::Triangle);
}

/// `name` is `triangle`, `circle`, `cross` or `square`
#[wasm_bindgen]
pub fn simon_btn_press(name: &str) {
    if let Some(button) = Button::from_name(name) {
        press_button(GameKind::Simon, button);
    }
}

#[wasm_bindgen]
pub fn react_key_press() {
    press_button(GameKind::Reaction, Button::Cross);
}

#[wasm_bindgen]
pub fn flappy_action() {
    press_button(GameKind::Flappy, Button::Cross);
}

#[wasm_bindgen]
pub fn brick_action() {
    press_button(GameKind::Brick, Button::Cross);
}

/// Held paddle directions
#[wasm_bindgen]
pub fn brick_keys(left: bool, right: bool) {
    for (button, held) in [(Button::Left, left), (Button::Right, right)] {
        let event = if held { InputEvent::Press(button) } else { InputEvent::Release(button) };
        send(GameKind::Brick, event);
    }
}

// Generic input

#[wasm_bindgen]
pub fn press(slug: &str, button: &str) {
    if let (Some(kind), Some(button)) = (kind_from_slug(slug), Button::from_name(button)) {
        press_button(kind, button);
    }
}

#[wasm_bindgen]
pub fn release(slug: &str, button: &str) {
    if let (Some(kind), Some(button)) = (kind_from_slug(slug), Button::from_name(button)) {
        send(kind, InputEvent::Release(button));
    }
}

/// Keyboard input using the console key map, printable keys pass through
#[wasm_bindgen]
pub fn key(slug: &str, key: &str, down: bool) {
    let Some(kind) = kind_from_slug(slug) else {
        return;
    };
    if kind == GameKind::Typing && down {
        // Letters are text in the typing test, not face buttons
        if let Some(event) = InputEvent::from_key_str(key) {
            send(kind, event);
            return;
        }
    }
    match (Button::from_key(key), down) {
        (Some(button), true) => press_button(kind, button),
        (Some(button), false) => send(kind, InputEvent::Release(button)),
        (None, _) => {}
    }
}

/// Pointer in page coordinates
#[wasm_bindgen]
pub fn pointer(slug: &str, client_x: f64, client_y: f64, down: bool) {
    if let Some(kind) = kind_from_slug(slug) {
        with_shell(|s| s.pointer(kind, client_x, client_y, down));
    }
}
