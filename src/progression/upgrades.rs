//! Purchasable upgrades

use crate::consts::{
    BASE_JUMP_IMPULSE, DURATION_PER_LEVEL, JUMP_BONUS_PER_LEVEL, MAX_UPGRADE_LEVEL,
    UPGRADE_COST_STEP,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    MagnetDuration,
    ShieldDuration,
    JumpPower,
}

impl UpgradeKind {
    /// Menu order
    pub const ALL: [UpgradeKind; 3] = [
        UpgradeKind::MagnetDuration,
        UpgradeKind::ShieldDuration,
        UpgradeKind::JumpPower,
    ];

    /// Stable identifier used as the save-file key
    pub fn id(&self) -> &'static str {
        match self {
            UpgradeKind::MagnetDuration => "magnet_duration",
            UpgradeKind::ShieldDuration => "shield_duration",
            UpgradeKind::JumpPower => "jump_power",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpgradeKind::MagnetDuration => "Magnet",
            UpgradeKind::ShieldDuration => "Shield",
            UpgradeKind::JumpPower => "Jump power",
        }
    }

    /// Menu key (1-based)
    pub fn from_key(key: u8) -> Option<Self> {
        Self::ALL.get(usize::from(key).checked_sub(1)?).copied()
    }

    pub fn base_cost(&self) -> u32 {
        match self {
            UpgradeKind::MagnetDuration | UpgradeKind::ShieldDuration => 10,
            UpgradeKind::JumpPower => 15,
        }
    }
}

/// An upgrade's tier and price
#[derive(Debug, Clone)]
pub struct Upgrade {
    pub kind: UpgradeKind,
    pub level: u32,
    pub cost: u32,
}

impl Upgrade {
    pub fn new(kind: UpgradeKind) -> Self {
        Self::at_level(kind, 1)
    }

    /// Upgrade at `level` (clamped to `1..=MAX_UPGRADE_LEVEL`) priced as if
    /// every tier had been bought in turn
    pub fn at_level(kind: UpgradeKind, level: u32) -> Self {
        let level = level.clamp(1, MAX_UPGRADE_LEVEL);
        Self {
            kind,
            level,
            cost: kind.base_cost() + UPGRADE_COST_STEP * (level - 1),
        }
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= MAX_UPGRADE_LEVEL
    }

    /// Raise one tier; the next tier costs a fixed step more
    pub(crate) fn level_up(&mut self) {
        if self.is_maxed() {
            return;
        }
        self.level += 1;
        self.cost += UPGRADE_COST_STEP;
    }
}

/// Effect duration (ticks) granted at a level
pub fn duration_for_level(level: u32) -> u32 {
    level.min(MAX_UPGRADE_LEVEL) * DURATION_PER_LEVEL
}

/// Jump impulse at a level
pub fn jump_impulse_for_level(level: u32) -> f32 {
    let bonus_levels = level.clamp(1, MAX_UPGRADE_LEVEL) - 1;
    BASE_JUMP_IMPULSE * (1.0 + JUMP_BONUS_PER_LEVEL * bonus_levels as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for kind in UpgradeKind::ALL {
            assert_eq!(UpgradeKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(UpgradeKind::from_id("speed"), None);
    }

    #[test]
    fn test_menu_keys() {
        assert_eq!(UpgradeKind::from_key(1), Some(UpgradeKind::MagnetDuration));
        assert_eq!(UpgradeKind::from_key(3), Some(UpgradeKind::JumpPower));
        assert_eq!(UpgradeKind::from_key(0), None);
        assert_eq!(UpgradeKind::from_key(4), None);
    }

    #[test]
    fn test_cost_derived_from_level() {
        let upgrade = Upgrade::at_level(UpgradeKind::JumpPower, 3);
        assert_eq!(upgrade.cost, 35);
        let floor = Upgrade::at_level(UpgradeKind::ShieldDuration, 0);
        assert_eq!(floor.level, 1);
        assert_eq!(floor.cost, 10);
    }

    #[test]
    fn test_effect_scaling() {
        assert_eq!(duration_for_level(1), 300);
        assert_eq!(duration_for_level(4), 1200);
        assert_eq!(jump_impulse_for_level(1), BASE_JUMP_IMPULSE);
        assert!((jump_impulse_for_level(3) - BASE_JUMP_IMPULSE * 1.2).abs() < 1e-5);
        assert_eq!(duration_for_level(u32::MAX), duration_for_level(MAX_UPGRADE_LEVEL));
        assert_eq!(jump_impulse_for_level(u32::MAX), jump_impulse_for_level(MAX_UPGRADE_LEVEL));
    }

    #[test]
    fn test_level_is_capped() {
        let mut upgrade = Upgrade::at_level(UpgradeKind::JumpPower, u32::MAX);
        assert_eq!(upgrade.level, MAX_UPGRADE_LEVEL);
        assert!(upgrade.is_maxed());
        let cost = upgrade.cost;
        upgrade.level_up();
        assert_eq!((upgrade.level, upgrade.cost), (MAX_UPGRADE_LEVEL, cost));
    }
}
