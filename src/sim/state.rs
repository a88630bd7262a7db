//! Game state and core simulation types
//!
//! Everything one play session owns lives in [`GameState`]; every operation
//! takes it explicitly.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{Board, Tile};
use super::matcher::find_clusters;
use super::refill::{self, RefillPolicy};
use super::scoring::ComboState;
use crate::error::GameError;
use crate::settings::Settings;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting tile selections
    Playing,
    /// A match left holes; input is blocked until the cascade settles
    Resolving,
    /// Clock ran out
    GameOver,
}

/// Remaining tiles to clear per value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestProgress {
    /// Index `v - 1` holds the count for value `v`
    remaining: Vec<u32>,
}

impl QuestProgress {
    pub fn new(value_count: u8, target: u32) -> Self {
        Self {
            remaining: vec![target; value_count as usize],
        }
    }

    pub fn remaining(&self, value: u8) -> Option<u32> {
        let idx = (value as usize).checked_sub(1)?;
        self.remaining.get(idx).copied()
    }

    /// Count one destroyed tile of `value`
    pub fn record(&mut self, value: u8) {
        if let Some(slot) = (value as usize)
            .checked_sub(1)
            .and_then(|i| self.remaining.get_mut(i))
        {
            *slot = slot.saturating_sub(1);
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.iter().all(|&r| r == 0)
    }
}

/// Read-only view of the board for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub radius: u32,
    /// Live tiles in region order
    pub tiles: Vec<Tile>,
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub board: Board,
    pub phase: GamePhase,
    pub score: u64,
    pub combo: ComboState,
    /// Seconds left on the clock
    pub time_left: f64,
    /// Play clock in milliseconds, advanced by `tick`. Combo timing uses it.
    pub clock_ms: f64,
    pub quest: QuestProgress,
    /// Rotations that went through
    pub moves: u32,
    /// Rounds run by the current cascade
    pub(crate) cascade_rounds: u32,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Start a game with a fully populated board that has no ready-made
    /// matches.
    pub fn new(settings: Settings, seed: u64) -> Result<Self, GameError> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut board = Board::new(settings.radius());

        let rules = settings.refill_rules().with_policy(RefillPolicy::Safe);
        refill::populate(&mut board, &rules, &mut rng)?;

        // Only reachable when the safe fallback had to exceed the cap
        let leftovers = find_clusters(&board, &[], rules.min_match);
        if !leftovers.is_empty() {
            log::debug!("Clearing {} clusters from the opening board", leftovers.len());
            for tile in leftovers.iter().flat_map(|c| c.tiles.iter()) {
                board.break_tile(tile.coord);
            }
            refill::resolve_cascade(&mut board, &rules, &mut rng)?;
        }

        log::info!(
            "New game: seed {}, radius {}, {} tiles",
            seed,
            board.radius(),
            board.live_count()
        );

        Ok(Self {
            seed,
            combo: ComboState::new(settings.combo_window_ms),
            time_left: settings.initial_time,
            quest: QuestProgress::new(settings.value_count, settings.quest_target),
            settings,
            board,
            phase: GamePhase::Playing,
            score: 0,
            clock_ms: 0.0,
            moves: 0,
            cascade_rounds: 0,
            rng,
        })
    }

    /// Start from a prepared board, for hosts that load puzzles.
    ///
    /// The board's radius wins over `settings.board_size`; refills and
    /// snapshots only ever use [`GameState::radius`].
    pub fn with_board(settings: Settings, board: Board, seed: u64) -> Result<Self, GameError> {
        settings.validate()?;
        if board.radius() != settings.radius() {
            log::debug!(
                "Prepared board radius {} overrides the {} preset",
                board.radius(),
                settings.board_size.as_str()
            );
        }
        Ok(Self {
            seed,
            combo: ComboState::new(settings.combo_window_ms),
            time_left: settings.initial_time,
            quest: QuestProgress::new(settings.value_count, settings.quest_target),
            settings,
            board,
            phase: GamePhase::Playing,
            score: 0,
            clock_ms: 0.0,
            moves: 0,
            cascade_rounds: 0,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    /// Radius of the board in play
    pub fn radius(&self) -> u32 {
        self.board.radius()
    }

    pub fn current_score(&self) -> u64 {
        self.score
    }

    pub fn current_combo(&self) -> u32 {
        self.combo.count
    }

    pub fn time_remaining(&self) -> f64 {
        self.time_left
    }

    pub fn is_expired(&self) -> bool {
        self.time_left <= 0.0
    }

    pub fn accepts_input(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn snapshot_board(&self) -> BoardSnapshot {
        BoardSnapshot {
            radius: self.board.radius(),
            tiles: self.board.live_tiles().copied().collect(),
        }
    }

    /// Add bonus seconds, capped at the configured maximum
    pub(crate) fn add_time(&mut self, seconds: f64) {
        self.time_left = (self.time_left + seconds).min(self.settings.time_max);
    }
}
