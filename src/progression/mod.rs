//! Missions, upgrades and the coin economy
//!
//! The progression manager never owns avatar state: every operation that
//! reads or writes coins, score or derived effects takes `&mut Avatar`.

pub mod missions;
pub mod upgrades;

pub use missions::{Metrics, Mission, MissionKind};
pub use upgrades::{Upgrade, UpgradeKind, duration_for_level, jump_impulse_for_level};

use crate::sim::{Avatar, DerivedEffects};

/// Mission and upgrade bookkeeping
#[derive(Debug, Clone)]
pub struct Progression {
    /// Indexed by `MissionKind` discriminant
    pub missions: [Mission; 3],
    /// Indexed by `UpgradeKind` discriminant
    pub upgrades: [Upgrade; 3],
    pub metrics: Metrics,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    pub fn new() -> Self {
        Self {
            missions: MissionKind::ALL.map(Mission::new),
            upgrades: UpgradeKind::ALL.map(Upgrade::new),
            metrics: Metrics::default(),
        }
    }

    pub fn mission(&self, kind: MissionKind) -> &Mission {
        &self.missions[kind as usize]
    }

    pub(crate) fn mission_mut(&mut self, kind: MissionKind) -> &mut Mission {
        &mut self.missions[kind as usize]
    }

    pub fn upgrade(&self, kind: UpgradeKind) -> &Upgrade {
        &self.upgrades[kind as usize]
    }

    pub(crate) fn upgrade_mut(&mut self, kind: UpgradeKind) -> &mut Upgrade {
        &mut self.upgrades[kind as usize]
    }

    /// Count a collected heart (the only metric not mirrored from the avatar)
    pub fn record_heart(&mut self) {
        self.metrics.hearts_collected = self.metrics.hearts_collected.saturating_add(1);
    }

    /// Re-evaluate incomplete missions after a scoring event.
    ///
    /// Mirrors are refreshed from the avatar once, then each mission is
    /// checked in order. Rewards go straight to `avatar.coins`.
    pub fn on_scoring_event(&mut self, avatar: &mut Avatar) -> Vec<MissionKind> {
        self.metrics.coins_collected = avatar.coins;
        self.metrics.pipes_passed = avatar.score;

        let mut completed = Vec::new();
        for mission in &mut self.missions {
            if let Some(reward) = mission.evaluate(&self.metrics) {
                avatar.coins = avatar.coins.saturating_add(reward);
                log::info!(
                    "Mission complete: {} (+{} coins)",
                    mission.kind.description(),
                    reward
                );
                completed.push(mission.kind);
            }
        }
        completed
    }

    /// Buy one tier of `kind`. Returns the new level, or `None` (and changes
    /// nothing) when the avatar cannot afford it or the upgrade is maxed.
    pub fn purchase(&mut self, kind: UpgradeKind, avatar: &mut Avatar) -> Option<u32> {
        let upgrade = self.upgrade_mut(kind);
        if avatar.coins < upgrade.cost || upgrade.is_maxed() {
            return None;
        }

        avatar.coins -= upgrade.cost;
        upgrade.level_up();
        let level = upgrade.level;
        log::info!("Upgraded {} to level {}", kind.id(), level);

        self.apply_effects(avatar);
        Some(level)
    }

    /// Effects implied by the current upgrade levels
    pub fn derived_effects(&self) -> DerivedEffects {
        DerivedEffects {
            magnet_duration: duration_for_level(self.upgrade(UpgradeKind::MagnetDuration).level),
            shield_duration: duration_for_level(self.upgrade(UpgradeKind::ShieldDuration).level),
            jump_impulse: jump_impulse_for_level(self.upgrade(UpgradeKind::JumpPower).level),
        }
    }

    /// Recompute the avatar's derived effects. Idempotent.
    pub fn apply_effects(&self, avatar: &mut Avatar) {
        avatar.effects = self.derived_effects();
    }

    /// `(kind, current, target)` for every mission still open
    pub fn mission_progress(&self) -> Vec<(MissionKind, u32, u32)> {
        self.missions
            .iter()
            .filter(|m| !m.is_completed())
            .map(|m| (m.kind, m.kind.metric(&self.metrics), m.kind.target()))
            .collect()
    }
}
