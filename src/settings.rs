//! Game rules configuration
//!
//! Defaults are the canonical rule set. Persisted as JSON alongside the high
//! scores.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, StorageError};
use crate::sim::board::DEFAULT_VALUE_COUNT;
use crate::sim::matcher::MIN_MATCH_COUNT;
use crate::sim::refill::{MAX_CASCADE_ROUNDS, RefillPolicy, RefillRules, SAFE_CLUSTER_CAP};
use crate::sim::scoring::COMBO_WINDOW_MS;

/// Board size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoardSize {
    /// Narrow screens
    Small,
    #[default]
    Large,
}

impl BoardSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardSize::Small => "Small",
            BoardSize::Large => "Large",
        }
    }

    /// Hexagon radius for this preset
    pub fn radius(&self) -> u32 {
        match self {
            BoardSize::Small => 3,
            BoardSize::Large => 4,
        }
    }
}

impl FromStr for BoardSize {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Ok(BoardSize::Small),
            "large" | "l" => Ok(BoardSize::Large),
            _ => Err(SettingsError::UnknownBoardSize(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown board size {0:?}")]
    UnknownBoardSize(String),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board_size: BoardSize,
    /// Tile values are `1..=value_count`
    pub value_count: u8,
    /// Smallest cluster that clears
    pub min_match: usize,
    /// Largest cluster a safe refill may create
    pub safe_cluster_cap: usize,
    pub combo_window_ms: f64,

    // === Clock ===
    /// Seconds on the clock at game start
    pub initial_time: f64,
    /// Time bonuses never push the clock past this
    pub time_max: f64,

    // === Refill ===
    /// Post-match refill mode. Initial population is always safe.
    pub refill_policy: RefillPolicy,
    pub max_cascade_rounds: u32,

    /// Tiles of each value to clear for the quest
    pub quest_target: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_size: BoardSize::default(),
            value_count: DEFAULT_VALUE_COUNT,
            min_match: MIN_MATCH_COUNT,
            safe_cluster_cap: SAFE_CLUSTER_CAP,
            combo_window_ms: COMBO_WINDOW_MS,

            initial_time: 30.0,
            time_max: 90.0,

            refill_policy: RefillPolicy::default(),
            max_cascade_rounds: MAX_CASCADE_ROUNDS,

            quest_target: 30,
        }
    }
}

impl Settings {
    /// LocalStorage-style key
    pub const STORAGE_KEY: &'static str = "ice-breaker-settings";

    /// Defaults with the given board size
    pub fn from_preset(board_size: BoardSize) -> Self {
        Self {
            board_size,
            ..Self::default()
        }
    }

    pub fn radius(&self) -> u32 {
        self.board_size.radius()
    }

    /// Rules for population, refill and cascades
    pub fn refill_rules(&self) -> RefillRules {
        RefillRules {
            value_count: self.value_count,
            min_match: self.min_match,
            safe_cap: self.safe_cluster_cap,
            policy: self.refill_policy,
            max_rounds: self.max_cascade_rounds,
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |field, reason| Err(SettingsError::Invalid { field, reason });

        if self.value_count < 2 {
            return invalid("value_count", "need at least two tile values");
        }
        if self.min_match < 2 {
            return invalid("min_match", "must be at least 2");
        }
        if self.safe_cluster_cap == 0 || self.safe_cluster_cap >= self.min_match {
            return invalid("safe_cluster_cap", "must be between 1 and min_match - 1");
        }
        if !(self.combo_window_ms >= 0.0) {
            return invalid("combo_window_ms", "must be non-negative");
        }
        if !(self.time_max > 0.0) {
            return invalid("time_max", "must be positive");
        }
        if !(self.initial_time > 0.0 && self.initial_time <= self.time_max) {
            return invalid("initial_time", "must be in (0, time_max]");
        }
        if self.max_cascade_rounds == 0 {
            return invalid("max_cascade_rounds", "must be at least 1");
        }
        Ok(())
    }

    /// Load from storage, falling back to defaults on missing or bad data
    pub fn load(storage: &impl Storage) -> Self {
        let stored = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("Using default settings");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Failed to read settings: {}", e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&stored) {
            Ok(settings) => match settings.validate() {
                Ok(()) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Stored settings rejected ({}), using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Stored settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut impl Storage) -> Result<(), StorageError> {
        storage.set_item(Self::STORAGE_KEY, &serde_json::to_string(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_defaults_are_canonical_and_valid() {
        let s = Settings::default();
        assert_eq!(s.radius(), 4);
        assert_eq!(s.min_match, 5);
        assert_eq!(s.safe_cluster_cap, 4);
        assert_eq!(s.combo_window_ms, 1350.0);
        assert_eq!(s.refill_policy, RefillPolicy::Random);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_board_size_from_str() {
        assert_eq!("SMALL".parse::<BoardSize>(), Ok(BoardSize::Small));
        assert_eq!("l".parse::<BoardSize>(), Ok(BoardSize::Large));
        assert!("huge".parse::<BoardSize>().is_err());
        assert_eq!(Settings::from_preset(BoardSize::Small).radius(), 3);
    }

    #[test]
    fn test_validate_rejects() {
        let cases: [fn(&mut Settings); 6] = [
            |s| s.value_count = 1,
            |s| s.safe_cluster_cap = s.min_match,
            |s| s.combo_window_ms = -1.0,
            |s| s.initial_time = s.time_max + 1.0,
            |s| s.time_max = f64::NAN,
            |s| s.max_cascade_rounds = 0,
        ];
        for mutate in cases {
            let mut s = Settings::default();
            mutate(&mut s);
            assert!(s.validate().is_err(), "{s:?}");
        }
    }

    #[test]
    fn test_load_save_and_partial_json() {
        let mut storage = MemoryStorage::new();
        assert_eq!(Settings::load(&storage), Settings::default());

        let mut s = Settings::from_preset(BoardSize::Small);
        s.refill_policy = RefillPolicy::Safe;
        s.save(&mut storage).unwrap();
        assert_eq!(Settings::load(&storage), s);

        // Missing fields take defaults
        storage
            .set_item(Settings::STORAGE_KEY, r#"{"min_match": 3, "safe_cluster_cap": 2}"#)
            .unwrap();
        let loaded = Settings::load(&storage);
        assert_eq!(loaded.min_match, 3);
        assert_eq!(loaded.value_count, 6);

        // Invalid combination falls back entirely
        storage
            .set_item(Settings::STORAGE_KEY, r#"{"min_match": 3}"#)
            .unwrap();
        assert_eq!(Settings::load(&storage), Settings::default());
    }
}
