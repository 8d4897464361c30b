//! XMB Arcade entry point
//!
//! The browser build starts from `platform::web` (`#[wasm_bindgen(start)]` in
//! the library). Natively there is no window; the binary plays a few scripted
//! rounds headless so the simulation and logging can be checked from a shell.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use xmb_arcade::{Settings, Tuning};

    env_logger::init();
    log::info!("XMB Arcade (native) starting...");
    log::info!("The games run in the browser - build with `trunk serve` for the web version");

    let settings = Settings::default();
    let tuning = Tuning::default();
    if let Err(err) = tuning.validate() {
        log::error!("Default tuning rejected: {}", err);
        return;
    }
    let seed = settings.effective_seed(0x5eed);

    println!("\nRunning headless rounds...");
    demo::stacker(&tuning, seed);
    demo::pinball(&tuning, seed);
    demo::snake(&tuning, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use xmb_arcade::consts::FRAME_MS;
    use xmb_arcade::games::{GameKind, Session};
    use xmb_arcade::input::{Button, InputEvent};
    use xmb_arcade::ports::{CueLog, HudSnapshot, SoundCue};
    use xmb_arcade::renderer::DrawList;
    use xmb_arcade::{Arcade, LoopControl, LoopHandle, Tuning};

    struct Headless {
        arcade: Arcade,
        hud: HudSnapshot,
        cues: CueLog,
        canvas: DrawList,
        now_ms: f64,
    }

    impl Headless {
        fn new(tuning: &Tuning, seed: u64, width: f32, height: f32) -> Self {
            Self {
                arcade: Arcade::new(tuning.clone(), seed),
                hud: HudSnapshot::default(),
                cues: CueLog::default(),
                canvas: DrawList::new(width, height),
                now_ms: 0.0,
            }
        }

        fn init(&mut self, kind: GameKind) -> LoopHandle {
            self.arcade.init(kind, &mut self.hud, &mut self.cues)
        }

        /// Advance one display frame
        fn frame(&mut self, handle: LoopHandle) -> LoopControl {
            self.now_ms += FRAME_MS;
            self.arcade
                .frame(handle, self.now_ms, &mut self.hud, &mut self.cues, &mut self.canvas)
        }

        fn press(&mut self, kind: GameKind, button: Button) -> Option<LoopHandle> {
            self.arcade.input(
                kind,
                &InputEvent::Press(button),
                self.now_ms,
                &mut self.hud,
                &mut self.cues,
            )
        }
    }

    /// Drop whenever the active box is centered over the tower
    pub fn stacker(tuning: &Tuning, seed: u64) {
        let mut rig = Headless::new(tuning, seed, tuning.stacker.width, tuning.stacker.height);
        let handle = rig.init(GameKind::Stacker);

        for _ in 0..3600 {
            if rig.frame(handle) == LoopControl::Halt {
                break;
            }
            let aligned = match rig.arcade.session(GameKind::Stacker) {
                Some(Session::Stacker(s)) => (s.active.x - s.top().x).abs() < s.speed,
                _ => false,
            };
            if aligned {
                rig.press(GameKind::Stacker, Button::Cross);
            }
            if rig.hud.score == "SCORE: 25" {
                break;
            }
        }

        log::info!(
            "Stacker: {} ({} perfect drops)",
            rig.hud.score,
            rig.cues.count(SoundCue::Select)
        );
        println!("✓ Stacker: {}", rig.hud.score);
    }

    /// Launch and hold both flippers until the ball drains
    pub fn pinball(tuning: &Tuning, seed: u64) {
        let mut rig = Headless::new(tuning, seed, tuning.pinball.width, tuning.pinball.height);
        let handle = rig.init(GameKind::Pinball);
        rig.frame(handle);
        rig.press(GameKind::Pinball, Button::Cross);

        let mut frames = 0;
        while frames < 60 * 120 {
            frames += 1;
            let flip = frames % 40 < 6;
            for button in [Button::Left, Button::Right] {
                let event = if flip { InputEvent::Press(button) } else { InputEvent::Release(button) };
                rig.arcade
                    .input(GameKind::Pinball, &event, rig.now_ms, &mut rig.hud, &mut rig.cues);
            }
            if rig.frame(handle) == LoopControl::Halt {
                break;
            }
        }

        log::info!(
            "Pinball: {} after {} frames ({} draw calls in last frame)",
            rig.hud.score,
            frames,
            rig.canvas.commands().len()
        );
        println!("✓ Pinball: {} ({} frames)", rig.hud.score, frames);
    }

    /// Walk the snake in a square until it bites itself or the wall
    pub fn snake(tuning: &Tuning, seed: u64) {
        let mut rig = Headless::new(tuning, seed, tuning.snake.width, tuning.snake.height);
        let handle = rig.init(GameKind::Snake);
        let turns = [Button::Down, Button::Left, Button::Up, Button::Right];

        for frame in 0..60 * 60 {
            if frame % 90 == 89 {
                rig.press(GameKind::Snake, turns[(frame / 90) % turns.len()]);
            }
            if rig.frame(handle) == LoopControl::Halt {
                break;
            }
        }

        log::info!("Snake: {} (game over: {})", rig.hud.score, rig.hud.game_over);
        println!("✓ Snake: {}", rig.hud.score);
    }
}
