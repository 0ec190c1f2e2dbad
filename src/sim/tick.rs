//! Fixed timestep simulation tick
//!
//! Core game loop step. Everything a tick needs from the outside world comes
//! in through `FrameContext`, and everything it reports goes out through it.

use super::collision::resolve;
use super::state::{GameEvent, GameState, SessionPhase};
use crate::progression::UpgradeKind;

/// Discrete input events delivered by the platform layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Jump,
    TogglePause,
    ToggleUpgradeMenu,
    PurchaseUpgrade(UpgradeKind),
    Restart,
}

/// Per-tick context: inputs in, events out
#[derive(Debug, Clone, Default)]
pub struct FrameContext {
    /// Inputs to apply at the start of this tick
    pub input: Vec<InputEvent>,
    /// Events produced by this tick
    pub events: Vec<GameEvent>,
}

impl FrameContext {
    pub fn new(input: Vec<InputEvent>) -> Self {
        Self {
            input,
            events: Vec::new(),
        }
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Apply one input event. `Quit` and `Restart` need I/O and are handled by
/// the session before the tick runs.
fn handle_input(state: &mut GameState, event: InputEvent, events: &mut Vec<GameEvent>) {
    match (event, state.phase) {
        (InputEvent::Jump, SessionPhase::Running) => {
            state.avatar.apply_impulse();
            events.push(GameEvent::Jumped);
        }
        (InputEvent::TogglePause, SessionPhase::Running) => {
            state.set_phase(SessionPhase::Paused, events);
        }
        (InputEvent::TogglePause, SessionPhase::Paused) => {
            state.set_phase(SessionPhase::Running, events);
        }
        (InputEvent::ToggleUpgradeMenu, SessionPhase::Running) => {
            state.set_phase(SessionPhase::UpgradeMenu, events);
        }
        (InputEvent::ToggleUpgradeMenu, SessionPhase::UpgradeMenu) => {
            state.set_phase(SessionPhase::Running, events);
        }
        (InputEvent::PurchaseUpgrade(kind), SessionPhase::UpgradeMenu) => {
            if let Some(level) = state.progression.purchase(kind, &mut state.avatar) {
                events.push(GameEvent::UpgradePurchased { kind, level });
            }
        }
        _ => {}
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, ctx: &mut FrameContext) {
    let inputs = std::mem::take(&mut ctx.input);
    for event in inputs.iter().copied() {
        handle_input(state, event, &mut ctx.events);
    }
    ctx.input = inputs;

    // Only the running phase moves the clock
    if !state.phase.is_running() {
        return;
    }

    state.time_ticks += 1;

    let spawned = state.scheduler.advance(&mut state.rng);
    for request in spawned {
        log::trace!("Spawn {:?}", request);
        state.push_spawn(request, &mut ctx.events);
    }

    if state.weather.advance(&mut state.rng) {
        ctx.events.push(GameEvent::WeatherChanged(state.weather.kind));
    }
    state.weather.apply(&mut state.avatar);

    state.avatar.integrate();

    let resolution = resolve(state, &mut ctx.events);
    if resolution.exhausted {
        log::info!(
            "Game over: score {}, coins {}",
            state.avatar.score,
            state.avatar.coins
        );
        state.set_phase(SessionPhase::GameOver, &mut ctx.events);
    }
}
