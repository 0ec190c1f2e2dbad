//! Game state and core simulation types
//!
//! `GameState` owns everything one session mutates: the avatar, all entity
//! collections, progression, spawn timers, weather and the seeded RNG.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::avatar::Avatar;
use super::entities::{Coin, Enemy, Heart, Obstacle, PowerUp, PowerUpKind};
use super::spawn::{SpawnRequest, SpawnScheduler};
use super::weather::{Weather, WeatherKind};
use crate::progression::{MissionKind, Progression, UpgradeKind};
use crate::settings::{AvatarColor, Difficulty};

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Active gameplay; the only phase that advances the simulation
    Running,
    /// Frozen by the pause toggle
    Paused,
    /// Frozen while the upgrade shop is open
    UpgradeMenu,
    /// All lives used; waiting for restart
    GameOver,
}

impl SessionPhase {
    pub fn is_running(&self) -> bool {
        matches!(self, SessionPhase::Running)
    }
}

/// Things that happened during a tick, for audio/HUD/log consumers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Jumped,
    PhaseChanged(SessionPhase),
    ObstaclePassed { score: u32 },
    CoinCollected { coins: u32 },
    PowerUpCollected(PowerUpKind),
    HeartCollected { lives: u8 },
    Damaged { health: u32 },
    LifeLost { lives: u8 },
    HitFloor,
    MissionCompleted(MissionKind),
    UpgradePurchased { kind: UpgradeKind, level: u32 },
    WeatherChanged(WeatherKind),
    BackgroundChanged(usize),
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub difficulty: Difficulty,
    pub color: AvatarColor,
    pub phase: SessionPhase,
    /// Running ticks simulated so far
    pub time_ticks: u64,
    pub avatar: Avatar,
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    pub power_ups: Vec<PowerUp>,
    pub hearts: Vec<Heart>,
    pub enemies: Vec<Enemy>,
    pub progression: Progression,
    pub scheduler: SpawnScheduler,
    pub weather: Weather,
    pub rng: Pcg32,
}

impl GameState {
    /// Fresh session with default progression
    pub fn new(seed: u64, difficulty: Difficulty, color: AvatarColor) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let weather = Weather::new(&mut rng);
        let progression = Progression::new();
        let mut avatar = Avatar::new();
        progression.apply_effects(&mut avatar);

        Self {
            seed,
            difficulty,
            color,
            phase: SessionPhase::Running,
            time_ticks: 0,
            avatar,
            obstacles: Vec::new(),
            coins: Vec::new(),
            power_ups: Vec::new(),
            hearts: Vec::new(),
            enemies: Vec::new(),
            progression,
            scheduler: SpawnScheduler::new(difficulty.enemy_interval()),
            weather,
            rng,
        }
    }

    /// Horizontal scroll speed for this session
    pub fn world_speed(&self) -> f32 {
        self.difficulty.speed()
    }

    /// Move to `phase`, reporting the change
    pub fn set_phase(&mut self, phase: SessionPhase, events: &mut Vec<GameEvent>) {
        if self.phase != phase {
            log::debug!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            events.push(GameEvent::PhaseChanged(phase));
        }
    }

    /// Append a scheduler spawn to the matching collection
    pub fn push_spawn(&mut self, request: SpawnRequest, events: &mut Vec<GameEvent>) {
        match request {
            SpawnRequest::Obstacle(o) => self.obstacles.push(o),
            SpawnRequest::Coin(c) => self.coins.push(c),
            SpawnRequest::PowerUp(p) => self.power_ups.push(p),
            SpawnRequest::Heart(h) => self.hearts.push(h),
            SpawnRequest::Enemy(e) => self.enemies.push(e),
            SpawnRequest::Background(phase) => events.push(GameEvent::BackgroundChanged(phase)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BASE_JUMP_IMPULSE;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(42, Difficulty::Medium, AvatarColor::Yellow);
        assert_eq!(state.phase, SessionPhase::Running);
        assert!(state.obstacles.is_empty() && state.coins.is_empty() && state.enemies.is_empty());
        assert_eq!(state.world_speed(), 4.0);
        assert_eq!(state.avatar.effects.jump_impulse, BASE_JUMP_IMPULSE);
    }

    #[test]
    fn test_set_phase_reports_changes_only() {
        let mut state = GameState::new(1, Difficulty::Easy, AvatarColor::Red);
        let mut events = Vec::new();
        state.set_phase(SessionPhase::Running, &mut events);
        assert!(events.is_empty());
        state.set_phase(SessionPhase::Paused, &mut events);
        assert_eq!(events, vec![GameEvent::PhaseChanged(SessionPhase::Paused)]);
    }
}
