//! The player-controlled avatar
//!
//! Holds vitals (lives, health), timed effects and the physics integration.
//! All counters are unsigned and mutated with saturating arithmetic, so
//! health and lives can never be observed negative.

use crate::consts::*;

use super::geometry::Aabb;

/// Avatar parameters derived from upgrade levels.
///
/// Written only by `Progression::apply_effects`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedEffects {
    /// Ticks of magnet granted by a magnet power-up
    pub magnet_duration: u32,
    /// Ticks of shield granted by a shield power-up
    pub shield_duration: u32,
    /// Vertical velocity set by a jump (negative = upward)
    pub jump_impulse: f32,
}

impl Default for DerivedEffects {
    fn default() -> Self {
        Self {
            magnet_duration: DURATION_PER_LEVEL,
            shield_duration: DURATION_PER_LEVEL,
            jump_impulse: BASE_JUMP_IMPULSE,
        }
    }
}

/// Result of a `take_damage` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Immunity or shield suppressed the hit
    Blocked,
    /// Health reduced, still alive on this life
    Hit,
    /// Health ran out; one life consumed, health restored
    LifeLost,
    /// The last life was consumed
    Exhausted,
}

impl DamageOutcome {
    /// Whether the hit actually landed
    pub fn applied(self) -> bool {
        !matches!(self, DamageOutcome::Blocked)
    }
}

/// The player avatar
#[derive(Debug, Clone)]
pub struct Avatar {
    pub x: f32,
    pub y: f32,
    /// Vertical velocity (pixels per tick, positive = downward)
    pub vel: f32,
    pub gravity: f32,
    pub width: f32,
    pub height: f32,
    pub lives: u8,
    pub health: u32,
    pub immunity_ticks: u32,
    /// Remaining shield ticks; `Some` while the shield is active
    pub shield: Option<u32>,
    pub magnet_ticks: u32,
    /// Remaining rage ticks; `Some` while rage mode is active
    pub rage: Option<u32>,
    /// Obstacles passed
    pub score: u32,
    /// Currency
    pub coins: u32,
    pub effects: DerivedEffects,
}

impl Default for Avatar {
    fn default() -> Self {
        Self::new()
    }
}

impl Avatar {
    pub fn new() -> Self {
        Self {
            x: AVATAR_X,
            y: HEIGHT / 2.0,
            vel: 0.0,
            gravity: GRAVITY,
            width: AVATAR_WIDTH,
            height: AVATAR_HEIGHT,
            lives: START_LIVES,
            health: MAX_HEALTH,
            immunity_ticks: 0,
            shield: None,
            magnet_ticks: 0,
            rage: None,
            score: 0,
            coins: 0,
            effects: DerivedEffects::default(),
        }
    }

    /// Bounding box used for every collision test
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y.trunc(), self.width, self.height)
    }

    pub fn is_immune(&self) -> bool {
        self.immunity_ticks > 0
    }

    pub fn is_shielded(&self) -> bool {
        self.shield.is_some()
    }

    pub fn is_magnetized(&self) -> bool {
        self.magnet_ticks > 0
    }

    pub fn is_raging(&self) -> bool {
        self.rage.is_some()
    }

    /// Jump: velocity becomes the upgrade-scaled impulse
    pub fn apply_impulse(&mut self) {
        self.vel = self.effects.jump_impulse;
    }

    /// Advance physics and effect timers by one tick
    pub fn integrate(&mut self) {
        self.vel += self.gravity;
        self.y += self.vel;

        self.immunity_ticks = self.immunity_ticks.saturating_sub(1);

        if let Some(ticks) = self.rage {
            let ticks = ticks.saturating_sub(1);
            if ticks == 0 {
                self.rage = None;
                self.health = MAX_HEALTH;
            } else {
                self.rage = Some(ticks);
            }
        }

        if let Some(ticks) = self.shield {
            let ticks = ticks.saturating_sub(1);
            self.shield = (ticks > 0).then_some(ticks);
        }

        self.magnet_ticks = self.magnet_ticks.saturating_sub(1);
    }

    /// Apply damage unless immunity or a shield blocks it.
    ///
    /// Either protection alone suppresses the hit. A landed hit arms the
    /// immunity window; if health runs out, exactly one life is consumed and
    /// health is restored to full within this call.
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.is_immune() || self.is_shielded() {
            return DamageOutcome::Blocked;
        }

        self.health = self.health.saturating_sub(amount);
        self.immunity_ticks = IMMUNITY_TICKS;

        if self.health > 0 {
            return DamageOutcome::Hit;
        }

        self.lives = self.lives.saturating_sub(1);
        self.health = MAX_HEALTH;
        self.immunity_ticks = IMMUNITY_TICKS;
        log::debug!("Life lost, {} remaining", self.lives);

        if self.lives == 0 {
            DamageOutcome::Exhausted
        } else {
            DamageOutcome::LifeLost
        }
    }

    /// Arm rage mode; health is restored to full when it runs out
    pub fn enter_rage(&mut self, ticks: u32) {
        if ticks > 0 {
            self.rage = Some(ticks);
        }
    }

    pub fn activate_shield(&mut self) {
        if self.effects.shield_duration > 0 {
            self.shield = Some(self.effects.shield_duration);
        }
    }

    pub fn activate_magnet(&mut self) {
        self.magnet_ticks = self.effects.magnet_duration;
    }

    /// Gain a life, never exceeding the cap
    pub fn gain_life(&mut self) {
        self.lives = (self.lives + 1).min(MAX_LIVES);
    }

    /// Fell past the bottom of the play area
    pub fn is_below_floor(&self) -> bool {
        self.y > HEIGHT
    }

    /// Rest on the floor with zero velocity
    pub fn clamp_to_floor(&mut self) {
        self.y = HEIGHT - self.height;
        self.vel = 0.0;
    }
}
