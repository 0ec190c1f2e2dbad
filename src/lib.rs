//! Flap Rush - A side-scrolling arcade flyer
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (avatar physics, spawning, collisions, phases)
//! - `progression`: Missions, upgrades and the coin economy
//! - `persistence`: Save/load of progression and avatar vitals
//! - `render`: Abstract drawing boundary and frame composition
//! - `session`: Fixed-rate loop, restart and shutdown handling
//! - `platform`: Terminal frontend (input + canvas)
//! - `settings`: Player choices and difficulty table

pub mod persistence;
pub mod platform;
pub mod progression;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::{AvatarColor, Difficulty, MenuSelection, Settings};

/// Game configuration constants
pub mod consts {
    /// Logical ticks per second
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum ticks run per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Visible play area (logical pixels, y grows downward)
    pub const WIDTH: f32 = 400.0;
    pub const HEIGHT: f32 = 600.0;

    /// Avatar defaults
    pub const AVATAR_X: f32 = 60.0;
    pub const AVATAR_WIDTH: f32 = 40.0;
    pub const AVATAR_HEIGHT: f32 = 30.0;
    pub const GRAVITY: f32 = 0.5;
    pub const BASE_JUMP_IMPULSE: f32 = -9.0;
    pub const START_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 5;
    pub const MAX_HEALTH: u32 = 100;
    /// Post-hit cooldown during which damage is suppressed
    pub const IMMUNITY_TICKS: u32 = 120;
    /// Damage dealt by obstacles, enemies and the floor
    pub const HIT_DAMAGE: u32 = 25;

    /// Obstacle pair geometry
    pub const OBSTACLE_WIDTH: f32 = 70.0;
    pub const OBSTACLE_GAP: f32 = 150.0;
    pub const OBSTACLE_GAP_TOP_MIN: i32 = 60;
    pub const OBSTACLE_GAP_TOP_MAX: i32 = HEIGHT as i32 - 220;
    pub const DANGER_CHANCE: f64 = 0.2;

    /// Collectible and hazard sizes
    pub const COIN_SIZE: f32 = 25.0;
    pub const POWER_UP_SIZE: f32 = 25.0;
    pub const HEART_SIZE: f32 = 30.0;
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const ENEMY_SPEED_MIN: i32 = 2;
    pub const ENEMY_SPEED_MAX: i32 = 4;
    /// Vertical margin for collectible/enemy placement
    pub const SPAWN_MARGIN: i32 = 50;

    /// Spawn thresholds (ticks); a spawn fires once the counter exceeds it
    pub const OBSTACLE_INTERVAL: u32 = 90;
    pub const COIN_INTERVAL: u32 = 150;
    pub const POWER_UP_INTERVAL: u32 = 600;
    pub const HEART_INTERVAL: u32 = 900;
    pub const BACKGROUND_INTERVAL: u32 = 600;
    /// Number of sky colors the background cycles through
    pub const BACKGROUND_PHASES: usize = 4;

    /// Weather re-rolls after this many ticks
    pub const WEATHER_INTERVAL: u32 = 1800;

    /// Upgrade tuning
    pub const UPGRADE_COST_STEP: u32 = 10;
    /// Highest upgrade tier; saved levels above it are clamped
    pub const MAX_UPGRADE_LEVEL: u32 = 50;
    pub const DURATION_PER_LEVEL: u32 = 300;
    pub const JUMP_BONUS_PER_LEVEL: f32 = 0.1;
}
