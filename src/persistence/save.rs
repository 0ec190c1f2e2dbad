//! Save file format and store

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::consts::{MAX_LIVES, START_LIVES};
use crate::progression::{MissionKind, Progression, Upgrade, UpgradeKind};
use crate::sim::Avatar;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted progression snapshot
///
/// Serialized as
/// `{coins, score, lives, missions: [[description, completed]], improvements: {id: level}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveState {
    pub coins: Option<u32>,
    pub score: Option<u32>,
    pub lives: Option<u8>,
    pub missions: Vec<(String, bool)>,
    pub improvements: BTreeMap<String, u32>,
}

impl SaveState {
    /// Snapshot the live avatar and progression
    pub fn capture(avatar: &Avatar, progression: &Progression) -> Self {
        Self {
            coins: Some(avatar.coins),
            score: Some(avatar.score),
            lives: Some(avatar.lives),
            missions: progression
                .missions
                .iter()
                .map(|m| (m.kind.description().to_string(), m.is_completed()))
                .collect(),
            improvements: progression
                .upgrades
                .iter()
                .map(|u| (u.kind.id().to_string(), u.level))
                .collect(),
        }
    }

    /// Build from parsed JSON, defaulting each field independently
    pub fn from_value(value: &Value) -> Self {
        let field_u32 = |key: &str| -> Option<u32> {
            let field = value.get(key)?;
            let parsed = field.as_u64().and_then(|n| u32::try_from(n).ok());
            if parsed.is_none() {
                log::warn!("Ignoring save field {key}: {field}");
            }
            parsed
        };

        let missions = value
            .get("missions")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let pair = entry.as_array()?;
                        let description = pair.first()?.as_str()?;
                        let completed = pair.get(1)?.as_bool()?;
                        Some((description.to_string(), completed))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let improvements = value
            .get("improvements")
            .and_then(Value::as_object)
            .map(|levels| {
                levels
                    .iter()
                    .filter_map(|(id, level)| {
                        let level = u32::try_from(level.as_u64()?).ok()?;
                        Some((id.clone(), level))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            coins: field_u32("coins"),
            score: field_u32("score"),
            lives: field_u32("lives").and_then(|n| u8::try_from(n).ok()),
            missions,
            improvements,
        }
    }

    /// Restore into a freshly constructed avatar/progression pair.
    ///
    /// Absent fields keep their constructor defaults; unknown mission
    /// descriptions and upgrade ids are ignored. Derived avatar effects are
    /// recomputed afterwards.
    pub fn restore(&self, avatar: &mut Avatar, progression: &mut Progression) {
        if let Some(coins) = self.coins {
            avatar.coins = coins;
        }
        if let Some(score) = self.score {
            avatar.score = score;
        }
        avatar.lives = match self.lives {
            Some(lives) if (1..=MAX_LIVES).contains(&lives) => lives,
            Some(lives) => {
                log::warn!("Saved lives {lives} out of range, starting with {START_LIVES}");
                START_LIVES
            }
            None => START_LIVES,
        };

        for (description, completed) in &self.missions {
            match MissionKind::from_description(description) {
                Some(kind) => progression.mission_mut(kind).restore(*completed),
                None => log::warn!("Unknown mission in save: {description:?}"),
            }
        }

        for (id, level) in &self.improvements {
            match UpgradeKind::from_id(id) {
                Some(kind) => {
                    let upgrade = Upgrade::at_level(kind, *level);
                    if upgrade.level != *level {
                        log::warn!("Saved {id} level {level} out of range, using {}", upgrade.level);
                    }
                    *progression.upgrade_mut(kind) = upgrade;
                }
                None => log::warn!("Unknown upgrade in save: {id:?}"),
            }
        }

        progression.metrics.coins_collected = avatar.coins;
        progression.metrics.pipes_passed = avatar.score;
        progression.apply_effects(avatar);
    }
}

/// File-backed save store
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Read the save, `Ok(None)` if there is none. Never writes.
    pub fn load(&self) -> Result<Option<SaveState>, PersistError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value: Value = serde_json::from_str(&json)?;
        Ok(Some(SaveState::from_value(&value)))
    }

    /// Write the save, replacing any previous file atomically
    pub fn save(&self, state: &SaveState) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("Progress saved to {}", self.path.display());
        Ok(())
    }

    /// Load into a fresh avatar/progression pair; any failure leaves defaults
    pub fn restore_into(&self, avatar: &mut Avatar, progression: &mut Progression) {
        match self.load() {
            Ok(Some(state)) => {
                state.restore(avatar, progression);
                log::info!(
                    "Loaded save: {} coins, score {}, {} lives",
                    avatar.coins,
                    avatar.score,
                    avatar.lives
                );
            }
            Ok(None) => log::info!("No save found, starting fresh"),
            Err(e) => log::warn!("{e}; starting fresh"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BASE_JUMP_IMPULSE, MAX_UPGRADE_LEVEL, OBSTACLE_WIDTH};
    use crate::progression::{duration_for_level, jump_impulse_for_level};
    use crate::settings::{AvatarColor, Difficulty};
    use crate::sim::{Coin, GameState, Obstacle, resolve};

    fn temp_store(name: &str) -> SaveStore {
        let dir = std::env::temp_dir().join(format!("flap-rush-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        SaveStore::new(dir.join("savegame.json"))
    }

    #[test]
    fn test_round_trip() {
        let store = temp_store("round-trip");
        let mut avatar = Avatar::new();
        let mut progression = Progression::new();
        avatar.coins = 37;
        avatar.score = 12;
        avatar.lives = 2;
        progression.mission_mut(MissionKind::CollectCoins).restore(true);
        progression.mission_mut(MissionKind::PassObstacles).restore(true);
        *progression.upgrade_mut(UpgradeKind::MagnetDuration) =
            Upgrade::at_level(UpgradeKind::MagnetDuration, 2);
        *progression.upgrade_mut(UpgradeKind::JumpPower) =
            Upgrade::at_level(UpgradeKind::JumpPower, 3);

        store.save(&SaveState::capture(&avatar, &progression)).unwrap();

        let mut loaded_avatar = Avatar::new();
        let mut loaded = Progression::new();
        store.restore_into(&mut loaded_avatar, &mut loaded);

        assert_eq!(loaded_avatar.coins, 37);
        assert_eq!(loaded_avatar.score, 12);
        assert_eq!(loaded_avatar.lives, 2);
        assert!(loaded.mission(MissionKind::CollectCoins).is_completed());
        assert!(loaded.mission(MissionKind::PassObstacles).is_completed());
        assert!(!loaded.mission(MissionKind::CollectHearts).is_completed());
        assert_eq!(loaded.upgrade(UpgradeKind::MagnetDuration).level, 2);
        assert_eq!(loaded.upgrade(UpgradeKind::ShieldDuration).level, 1);
        assert_eq!(loaded.upgrade(UpgradeKind::JumpPower).level, 3);

        assert_eq!(loaded_avatar.effects.magnet_duration, 600);
        assert_eq!(loaded_avatar.effects.shield_duration, 300);
        assert_eq!(loaded_avatar.effects.jump_impulse, jump_impulse_for_level(3));
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn test_missing_file_is_none() {
        let store = temp_store("missing");
        let _ = std::fs::remove_file(store.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_wire_format() {
        let state = SaveState::capture(&Avatar::new(), &Progression::new());
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["coins"], 0);
        assert_eq!(value["lives"], 3);
        assert_eq!(value["missions"][0][0], "Collect 10 coins");
        assert_eq!(value["missions"][0][1], false);
        assert_eq!(value["improvements"]["jump_power"], 1);
    }

    #[test]
    fn test_partial_save_defaults_per_field() {
        let value: Value = serde_json::from_str(
            r#"{"coins": "lots", "score": 4, "missions": [["Pass 20 pipes", true], ["bogus"]],
                "improvements": {"shield_duration": 3, "warp": 9}}"#,
        )
        .unwrap();
        let state = SaveState::from_value(&value);
        let mut avatar = Avatar::new();
        let mut progression = Progression::new();
        state.restore(&mut avatar, &mut progression);

        assert_eq!(avatar.coins, 0);
        assert_eq!(avatar.score, 4);
        assert_eq!(avatar.lives, 3);
        assert!(progression.mission(MissionKind::PassObstacles).is_completed());
        assert!(!progression.mission(MissionKind::CollectCoins).is_completed());
        let shield = progression.upgrade(UpgradeKind::ShieldDuration);
        assert_eq!((shield.level, shield.cost), (3, 30));
        assert_eq!(avatar.effects.shield_duration, 900);
        assert_eq!(avatar.effects.jump_impulse, BASE_JUMP_IMPULSE);
    }

    #[test]
    fn test_extreme_values_are_clamped() {
        let value: Value = serde_json::from_str(
            r#"{"coins": 4294967295, "score": 4294967295, "lives": 255,
                "improvements": {"jump_power": 4294967295, "shield_duration": 20000000, "magnet_duration": 0}}"#,
        )
        .unwrap();
        let mut state = GameState::new(7, Difficulty::Medium, AvatarColor::Yellow);
        SaveState::from_value(&value).restore(&mut state.avatar, &mut state.progression);

        assert_eq!(state.avatar.lives, 3);
        for kind in UpgradeKind::ALL {
            let level = state.progression.upgrade(kind).level;
            assert!((1..=MAX_UPGRADE_LEVEL).contains(&level));
        }
        assert_eq!(state.avatar.effects.shield_duration, duration_for_level(MAX_UPGRADE_LEVEL));
        assert_eq!(state.avatar.effects.magnet_duration, duration_for_level(1));

        // Scoring at the ceiling saturates
        let bounds = state.avatar.bounds();
        state.coins.push(Coin::new(bounds.left() + 5.0, bounds.top()));
        state.obstacles.push(Obstacle::new(-OBSTACLE_WIDTH + 1.0, 200.0, false));
        let mut events = Vec::new();
        resolve(&mut state, &mut events);
        assert_eq!(state.avatar.coins, u32::MAX);
        assert_eq!(state.avatar.score, u32::MAX);

        // A maxed upgrade cannot be bought even with coins to spare
        assert_eq!(state.progression.purchase(UpgradeKind::JumpPower, &mut state.avatar), None);
        assert_eq!(state.avatar.coins, u32::MAX);
    }

    #[test]
    fn test_exhausted_lives_restart_fresh() {
        let value: Value = serde_json::from_str(r#"{"lives": 0}"#).unwrap();
        let mut avatar = Avatar::new();
        SaveState::from_value(&value).restore(&mut avatar, &mut Progression::new());
        assert_eq!(avatar.lives, 3);
    }

    #[test]
    fn test_corrupt_file_is_error_and_untouched() {
        let store = temp_store("corrupt");
        std::fs::write(store.path(), "not json{").unwrap();
        assert!(matches!(store.load(), Err(PersistError::Json(_))));

        let mut avatar = Avatar::new();
        store.restore_into(&mut avatar, &mut Progression::new());
        assert_eq!(avatar.coins, 0);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "not json{");
    }
}
