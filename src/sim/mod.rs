//! Fixed-tick simulation module
//!
//! All gameplay logic lives here. This module must stay free of I/O:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable evaluation order (obstacles, coins, power-ups, hearts, enemies)
//! - No rendering or platform dependencies

pub mod avatar;
pub mod collision;
pub mod entities;
pub mod geometry;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weather;

pub use avatar::{Avatar, DamageOutcome, DerivedEffects};
pub use collision::resolve;
pub use entities::{Coin, Enemy, Heart, Obstacle, PowerUp, PowerUpKind, Spawned};
pub use geometry::{Aabb, Latch};
pub use spawn::{SpawnRequest, SpawnScheduler};
pub use state::{GameEvent, GameState, SessionPhase};
pub use tick::{FrameContext, InputEvent, tick};
pub use weather::{Weather, WeatherKind};
