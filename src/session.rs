//! Session controller
//!
//! Owns the game state and the save store, converts frame time into fixed
//! ticks, and handles the inputs that need I/O (restart and quit). Storage is
//! only touched here, never inside a tick.

use crate::consts::*;
use crate::persistence::{SaveState, SaveStore};
use crate::settings::MenuSelection;
use crate::sim::{FrameContext, GameEvent, GameState, InputEvent, SessionPhase, tick};

/// What the frontend should do after a frame
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Continue(Vec<GameEvent>),
    Quit,
}

pub struct Session {
    selection: MenuSelection,
    store: SaveStore,
    state: GameState,
    seed: u64,
    /// Completed restarts; varies the RNG stream between runs
    restarts: u64,
    accumulator: f32,
    /// Inputs waiting for the next tick
    pending: Vec<InputEvent>,
}

impl Session {
    /// Begin a session: fresh state, then the persisted progression on top
    pub fn start(selection: MenuSelection, store: SaveStore, seed: u64) -> Self {
        log::info!(
            "Starting session for {} ({}, seed {})",
            selection.player_name,
            selection.difficulty.as_str(),
            seed
        );
        let state = Self::fresh_state(&selection, &store, seed);
        Self {
            selection,
            store,
            state,
            seed,
            restarts: 0,
            accumulator: 0.0,
            pending: Vec::new(),
        }
    }

    fn fresh_state(selection: &MenuSelection, store: &SaveStore, seed: u64) -> GameState {
        let mut state = GameState::new(seed, selection.difficulty, selection.color);
        store.restore_into(&mut state.avatar, &mut state.progression);
        state
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn selection(&self) -> &MenuSelection {
        &self.selection
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Run exactly one tick with the given inputs
    pub fn step(&mut self, input: Vec<InputEvent>) -> Control {
        if input.contains(&InputEvent::Quit) {
            self.shutdown();
            return Control::Quit;
        }

        let mut events = Vec::new();
        if self.state.phase == SessionPhase::GameOver && input.contains(&InputEvent::Restart) {
            self.restart();
            events.push(GameEvent::PhaseChanged(SessionPhase::Running));
        }

        let mut ctx = FrameContext::new(input);
        tick(&mut self.state, &mut ctx);
        events.extend(ctx.take_events());
        Control::Continue(events)
    }

    /// Advance by real elapsed time, running as many fixed ticks as fit.
    ///
    /// Inputs that arrive on a frame too short for a tick are queued for the
    /// next one. Quit is honored immediately.
    pub fn update(&mut self, dt: f32, input: Vec<InputEvent>) -> Control {
        if input.contains(&InputEvent::Quit) {
            self.shutdown();
            return Control::Quit;
        }
        self.pending.extend(input);
        self.accumulator += dt.min(0.25);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = std::mem::take(&mut self.pending);
            match self.step(input) {
                Control::Quit => return Control::Quit,
                Control::Continue(mut step_events) => events.append(&mut step_events),
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = 0.0;
        }
        Control::Continue(events)
    }

    /// Save progression, then rebuild the session from scratch and reload it
    pub fn restart(&mut self) {
        self.persist();
        self.restarts += 1;
        let seed = self.seed.wrapping_add(self.restarts);
        self.state = Self::fresh_state(&self.selection, &self.store, seed);
        log::info!("Restarted (run {})", self.restarts + 1);
    }

    /// Final save on process exit; a failed save never blocks shutdown
    pub fn shutdown(&self) {
        self.persist();
        log::info!("Session ended");
    }

    fn persist(&self) {
        let snapshot = SaveState::capture(&self.state.avatar, &self.state.progression);
        if let Err(e) = self.store.save(&snapshot) {
            log::error!("Could not save progress: {e}");
        }
    }
}
