//! Game settings and menu selections
//!
//! The name/difficulty/color menus live in the frontend; what they hand over
//! is a validated `MenuSelection`. Settings supply the menu defaults and are
//! persisted separately from the save game as a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::Rgb;

/// Longest accepted player name, in characters
pub const MAX_NAME_LEN: usize = 12;

/// Environment variable overriding the settings file location
pub const SETTINGS_ENV: &str = "FLAP_RUSH_SETTINGS";
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";
pub const DEFAULT_SAVE_PATH: &str = "savegame.json";

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Menu key (1-based); out-of-range keys select nothing
    pub fn from_key(key: u8) -> Option<Self> {
        Self::ALL.get(usize::from(key).checked_sub(1)?).copied()
    }

    /// Horizontal scroll speed (pixels per tick)
    pub fn speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 3.0,
            Difficulty::Medium => 4.0,
            Difficulty::Hard => 5.0,
        }
    }

    /// Enemy spawn threshold (ticks)
    pub fn enemy_interval(&self) -> u32 {
        match self {
            Difficulty::Easy => 600,
            Difficulty::Medium => 400,
            Difficulty::Hard => 250,
        }
    }
}

/// The seven-color avatar palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AvatarColor {
    Red,
    Orange,
    #[default]
    Yellow,
    Green,
    Blue,
    Indigo,
    Violet,
}

impl AvatarColor {
    pub const ALL: [AvatarColor; 7] = [
        AvatarColor::Red,
        AvatarColor::Orange,
        AvatarColor::Yellow,
        AvatarColor::Green,
        AvatarColor::Blue,
        AvatarColor::Indigo,
        AvatarColor::Violet,
    ];

    /// Menu key (1-based); out-of-range keys select nothing
    pub fn from_key(key: u8) -> Option<Self> {
        Self::ALL.get(usize::from(key).checked_sub(1)?).copied()
    }

    pub fn rgb(&self) -> Rgb {
        match self {
            AvatarColor::Red => Rgb(255, 0, 0),
            AvatarColor::Orange => Rgb(255, 127, 0),
            AvatarColor::Yellow => Rgb(255, 255, 0),
            AvatarColor::Green => Rgb(0, 255, 0),
            AvatarColor::Blue => Rgb(0, 0, 255),
            AvatarColor::Indigo => Rgb(75, 0, 130),
            AvatarColor::Violet => Rgb(148, 0, 211),
        }
    }
}

/// Incremental player-name entry. Invalid keystrokes are ignored.
#[derive(Debug, Clone, Default)]
pub struct NameInput {
    text: String,
}

impl NameInput {
    /// Append a character if printable and there is room; otherwise no-op
    pub fn push(&mut self, c: char) -> bool {
        if c.is_control() || self.text.chars().count() >= MAX_NAME_LEN {
            return false;
        }
        self.text.push(c);
        true
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The entered name, if it can be submitted
    pub fn submit(&self) -> Option<String> {
        validate_name(&self.text)
    }
}

/// A name is 1..=12 printable characters and not blank
pub fn validate_name(name: &str) -> Option<String> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN || name.trim().is_empty() {
        return None;
    }
    if name.chars().any(char::is_control) {
        return None;
    }
    Some(name.to_string())
}

/// Validated choices made before the loop starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSelection {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub color: AvatarColor,
}

/// Errors reading the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub avatar_color: AvatarColor,
    /// Where progression is saved
    pub save_path: PathBuf,
    /// Fixed RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            difficulty: Difficulty::default(),
            avatar_color: AvatarColor::default(),
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            seed: None,
        }
    }
}

impl Settings {
    /// Settings file location (environment override or default)
    pub fn default_path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH))
    }

    /// Read settings from `path`
    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load settings, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// The menu selection these settings describe. An invalid name falls
    /// back to the default one.
    pub fn selection(&self) -> MenuSelection {
        let player_name = validate_name(&self.player_name).unwrap_or_else(|| {
            log::warn!("Invalid player name {:?}, using default", self.player_name);
            Self::default().player_name
        });
        MenuSelection {
            player_name,
            difficulty: self.difficulty,
            color: self.avatar_color,
        }
    }
}
