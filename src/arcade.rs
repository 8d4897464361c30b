//! Session registry
//!
//! Owns at most one live session per game type. Starting a game always
//! replaces the previous session and invalidates its loop: every loop carries
//! a [`LoopHandle`] and a frame presented with a stale handle is refused
//! without touching any state.

use std::collections::HashMap;

use crate::clock::FrameClock;
use crate::games::{GameKind, InputOutcome, Session};
use crate::input::InputEvent;
use crate::ports::{CueSink, GameEvent, Hud, dispatch};
use crate::renderer::{Canvas, scenes};
use crate::tuning::Tuning;

/// Identity of one scheduled loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopHandle {
    pub kind: GameKind,
    generation: u64,
}

impl LoopHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Whether the host should request another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Halt,
}

/// A session plus its scheduling state
#[derive(Debug)]
struct Live {
    generation: u64,
    session: Session,
    clock: FrameClock,
    /// A loop with `generation` is expected to be requesting frames
    scheduled: bool,
}

/// Registry of live sessions
#[derive(Debug)]
pub struct Arcade {
    live: HashMap<GameKind, Live>,
    next_generation: u64,
    tuning: Tuning,
    seed: u64,
    /// Reused event buffer, drained after every tick batch or input
    events: Vec<GameEvent>,
}

impl Arcade {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            live: HashMap::new(),
            next_generation: 1,
            tuning,
            seed,
            events: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    fn bump_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    /// Start (or restart) `kind`, cancelling any loop of the previous session
    ///
    /// Idempotent: calling it twice leaves exactly one live session and only
    /// the second handle stays valid.
    pub fn init(&mut self, kind: GameKind, hud: &mut dyn Hud, cues: &mut dyn CueSink) -> LoopHandle {
        let generation = self.bump_generation();
        let session = Session::new(kind, &self.tuning, crate::session_seed(self.seed, generation));
        let clock = FrameClock::new(session.game().cadence());

        if let Some(old) = self.live.get(&kind) {
            log::info!(
                "Replacing {} session (generation {} -> {})",
                kind.slug(),
                old.generation,
                generation
            );
        } else {
            log::info!("Starting {} session (generation {})", kind.slug(), generation);
        }

        self.events.clear();
        session.game().announce(&mut self.events);
        dispatch(&self.events, hud, cues);
        self.events.clear();

        // Scheduled so the first frame draws the fresh board even when idle
        self.live.insert(
            kind,
            Live {
                generation,
                session,
                clock,
                scheduled: true,
            },
        );
        LoopHandle { kind, generation }
    }

    /// Drop a session and invalidate its loop
    pub fn stop(&mut self, kind: GameKind) -> bool {
        let removed = self.live.remove(&kind).is_some();
        if removed {
            log::info!("Stopped {} session", kind.slug());
        }
        removed
    }

    /// True while `handle` belongs to the current session of its kind
    pub fn is_current(&self, handle: LoopHandle) -> bool {
        self.live
            .get(&handle.kind)
            .is_some_and(|live| live.generation == handle.generation)
    }

    /// Current handle for `kind`, if a loop is expected to be running
    pub fn scheduled_handle(&self, kind: GameKind) -> Option<LoopHandle> {
        self.live
            .get(&kind)
            .filter(|live| live.scheduled)
            .map(|live| LoopHandle {
                kind,
                generation: live.generation,
            })
    }

    pub fn session(&self, kind: GameKind) -> Option<&Session> {
        self.live.get(&kind).map(|live| &live.session)
    }

    pub fn session_mut(&mut self, kind: GameKind) -> Option<&mut Session> {
        self.live.get_mut(&kind).map(|live| &mut live.session)
    }

    /// Run one host frame for `handle`: due ticks first, then the render pass
    pub fn frame(
        &mut self,
        handle: LoopHandle,
        now_ms: f64,
        hud: &mut dyn Hud,
        cues: &mut dyn CueSink,
        canvas: &mut dyn Canvas,
    ) -> LoopControl {
        let Some(live) = self.live.get_mut(&handle.kind) else {
            log::warn!("Frame for {} without a session", handle.kind.slug());
            return LoopControl::Halt;
        };
        if live.generation != handle.generation || !live.scheduled {
            log::warn!(
                "Stale {} loop (generation {}, current {})",
                handle.kind.slug(),
                handle.generation,
                live.generation
            );
            return LoopControl::Halt;
        }

        let ticks = live.clock.advance(now_ms);
        let game = live.session.game_mut();
        for _ in 0..ticks {
            if !game.is_running() {
                break;
            }
            game.tick(now_ms, &mut self.events);
        }
        dispatch(&self.events, hud, cues);
        self.events.clear();

        scenes::draw(&live.session, canvas);

        if live.session.game().is_running() {
            LoopControl::Continue
        } else {
            live.scheduled = false;
            LoopControl::Halt
        }
    }

    /// Apply an input to `kind`
    ///
    /// Returns a handle when the caller must start a new loop: either the game
    /// asked for a fresh session, or it just started running again after its
    /// previous loop halted.
    pub fn input(
        &mut self,
        kind: GameKind,
        event: &InputEvent,
        now_ms: f64,
        hud: &mut dyn Hud,
        cues: &mut dyn CueSink,
    ) -> Option<LoopHandle> {
        let Some(live) = self.live.get_mut(&kind) else {
            log::debug!("Input {:?} for inactive {}", event, kind.slug());
            return None;
        };

        let outcome = live.session.game_mut().input(event, now_ms, &mut self.events);
        dispatch(&self.events, hud, cues);
        self.events.clear();

        match outcome {
            InputOutcome::Restart => Some(self.init(kind, hud, cues)),
            InputOutcome::Ignored => None,
            InputOutcome::Handled => self.reschedule(kind),
        }
    }

    /// Give a running but unscheduled session a new loop
    fn reschedule(&mut self, kind: GameKind) -> Option<LoopHandle> {
        let generation = self.next_generation;
        let live = self.live.get_mut(&kind)?;
        if live.scheduled || !live.session.game().is_running() {
            return None;
        }
        self.next_generation += 1;
        live.generation = generation;
        live.scheduled = true;
        live.clock.reset();
        log::debug!("Rescheduling {} loop (generation {})", kind.slug(), generation);
        Some(LoopHandle { kind, generation })
    }

    /// Redraw `kind` outside the loop (after an input on a halted session)
    pub fn render(&self, kind: GameKind, canvas: &mut dyn Canvas) -> bool {
        match self.live.get(&kind) {
            Some(live) => {
                scenes::draw(&live.session, canvas);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::games::Phase;
    use crate::input::Button;
    use crate::ports::{CueLog, HudSnapshot};
    use crate::renderer::DrawList;

    struct Rig {
        arcade: Arcade,
        hud: HudSnapshot,
        cues: CueLog,
        canvas: DrawList,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                arcade: Arcade::new(Tuning::default(), 42),
                hud: HudSnapshot::default(),
                cues: CueLog::default(),
                canvas: DrawList::new(240.0, 320.0),
            }
        }

        fn init(&mut self, kind: GameKind) -> LoopHandle {
            self.arcade.init(kind, &mut self.hud, &mut self.cues)
        }

        fn frame(&mut self, handle: LoopHandle, now_ms: f64) -> LoopControl {
            self.arcade
                .frame(handle, now_ms, &mut self.hud, &mut self.cues, &mut self.canvas)
        }

        fn press(&mut self, kind: GameKind, button: Button) -> Option<LoopHandle> {
            self.arcade
                .input(kind, &InputEvent::Press(button), 0.0, &mut self.hud, &mut self.cues)
        }
    }

    #[test]
    fn test_init_announces() {
        let mut rig = Rig::new();
        rig.init(GameKind::Snake);
        assert_eq!(rig.hud.score, "SCORE: 0");
        assert!(!rig.hud.game_over);
    }

    #[test]
    fn test_stale_handle_halts_without_mutation() {
        let mut rig = Rig::new();
        let old = rig.init(GameKind::Stacker);
        let new = rig.init(GameKind::Stacker);
        assert_ne!(old, new);
        assert!(!rig.arcade.is_current(old));

        let before = match rig.arcade.session(GameKind::Stacker) {
            Some(Session::Stacker(s)) => s.active,
            _ => panic!("no stacker"),
        };
        assert_eq!(rig.frame(old, 0.0), LoopControl::Halt);
        assert_eq!(rig.frame(old, 100.0), LoopControl::Halt);
        let after = match rig.arcade.session(GameKind::Stacker) {
            Some(Session::Stacker(s)) => s.active,
            _ => panic!("no stacker"),
        };
        assert_eq!(before, after);
        assert!(rig.canvas.commands().is_empty());

        assert_eq!(rig.frame(new, 0.0), LoopControl::Continue);
        assert!(!rig.canvas.commands().is_empty());
    }

    #[test]
    fn test_ticks_follow_clock() {
        let mut rig = Rig::new();
        let handle = rig.init(GameKind::Stacker);
        rig.frame(handle, 0.0);
        rig.frame(handle, FRAME_MS * 3.0 + 0.5);
        match rig.arcade.session(GameKind::Stacker) {
            Some(Session::Stacker(s)) => assert_eq!(s.active.x, 9.0),
            _ => panic!("no stacker"),
        }
    }

    #[test]
    fn test_idle_game_halts_after_first_draw() {
        let mut rig = Rig::new();
        let handle = rig.init(GameKind::Click);
        assert_eq!(rig.frame(handle, 0.0), LoopControl::Halt);
        assert!(!rig.canvas.commands().is_empty());
        assert!(rig.arcade.scheduled_handle(GameKind::Click).is_none());

        // Starting the countdown needs a new loop
        let resumed = rig.press(GameKind::Click, Button::Cross).unwrap();
        assert_ne!(resumed, handle);
        assert_eq!(rig.frame(resumed, 0.0), LoopControl::Continue);
        // Further presses do not spawn more loops
        assert!(rig.press(GameKind::Click, Button::Cross).is_none());
    }

    #[test]
    fn test_restart_replaces_session() {
        let mut rig = Rig::new();
        let handle = rig.init(GameKind::Stacker);
        if let Some(Session::Stacker(s)) = rig.arcade.session_mut(GameKind::Stacker) {
            s.active.x = 200.0;
        }
        assert!(rig.press(GameKind::Stacker, Button::Cross).is_none());
        assert!(rig.hud.game_over);
        assert_eq!(rig.frame(handle, 0.0), LoopControl::Halt);

        let restarted = rig.press(GameKind::Stacker, Button::Cross).unwrap();
        assert!(!rig.arcade.is_current(handle));
        assert!(rig.arcade.is_current(restarted));
        assert!(!rig.hud.game_over);
        assert_eq!(
            rig.arcade.session(GameKind::Stacker).map(|s| s.game().phase()),
            Some(Phase::Playing)
        );
    }

    #[test]
    fn test_input_without_session_is_ignored() {
        let mut rig = Rig::new();
        assert!(rig.press(GameKind::Flappy, Button::Cross).is_none());
        assert!(rig.hud.score.is_empty());
    }

    #[test]
    fn test_stop_invalidates_loop() {
        let mut rig = Rig::new();
        let handle = rig.init(GameKind::Pinball);
        assert!(rig.arcade.stop(GameKind::Pinball));
        assert_eq!(rig.frame(handle, 0.0), LoopControl::Halt);
        assert!(!rig.arcade.stop(GameKind::Pinball));
    }
}
