//! Refilling cleared cells and settling cascades

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::board::{Board, DEFAULT_VALUE_COUNT, Tile};
use super::hex::HexCoord;
use super::matcher::{MIN_MATCH_COUNT, cluster_size_if_placed, find_clusters};
use crate::error::GameError;

/// Largest cluster a refill may create on its own (canonical)
pub const SAFE_CLUSTER_CAP: usize = MIN_MATCH_COUNT - 1;

/// Defensive cap on cascade rounds
pub const MAX_CASCADE_ROUNDS: u32 = 1000;

/// How cleared cells are given new values after a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefillPolicy {
    /// Avoid values that would immediately form an oversized cluster
    Safe,
    /// Uniformly random values; cascades can chain
    #[default]
    Random,
}

/// Parameters shared by population, refill and cascade resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefillRules {
    pub value_count: u8,
    pub min_match: usize,
    pub safe_cap: usize,
    pub policy: RefillPolicy,
    pub max_rounds: u32,
}

impl Default for RefillRules {
    fn default() -> Self {
        Self {
            value_count: DEFAULT_VALUE_COUNT,
            min_match: MIN_MATCH_COUNT,
            safe_cap: SAFE_CLUSTER_CAP,
            policy: RefillPolicy::default(),
            max_rounds: MAX_CASCADE_ROUNDS,
        }
    }
}

impl RefillRules {
    pub fn with_policy(self, policy: RefillPolicy) -> Self {
        Self { policy, ..self }
    }
}

/// Outcome of a board-level cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CascadeSummary {
    pub rounds: u32,
    pub destroyed: usize,
}

pub fn random_value<R: Rng + ?Sized>(rng: &mut R, value_count: u8) -> u8 {
    rng.random_range(1..=value_count)
}

/// Choose a value for `coord` whose placed cluster stays within `cap`.
///
/// Candidates are tried in shuffled order. When every value exceeds the cap
/// the one giving the smallest cluster is used, lowest value on ties.
pub fn safe_value_for<R: Rng + ?Sized>(
    board: &Board,
    coord: HexCoord,
    value_count: u8,
    cap: usize,
    rng: &mut R,
) -> u8 {
    let mut candidates: Vec<u8> = (1..=value_count).collect();
    candidates.shuffle(rng);

    if let Some(v) = candidates
        .iter()
        .copied()
        .find(|&v| cluster_size_if_placed(board, coord, v) <= cap)
    {
        return v;
    }

    let fallback = (1..=value_count)
        .min_by_key(|&v| cluster_size_if_placed(board, coord, v))
        .unwrap_or(1);
    log::debug!("No safe value at {}, falling back to {}", coord, fallback);
    fallback
}

/// Fill every empty cell of the region with a safe value, in region order
pub fn populate<R: Rng + ?Sized>(
    board: &mut Board,
    rules: &RefillRules,
    rng: &mut R,
) -> Result<Vec<Tile>, GameError> {
    fill_empty(board, rules.value_count, rules.safe_cap, RefillPolicy::Safe, rng)
}

/// One refill pass: drop broken tiles, then fill every empty cell under
/// `rules.policy`. Returns the new tiles in region order.
pub fn refill_round<R: Rng + ?Sized>(
    board: &mut Board,
    rules: &RefillRules,
    rng: &mut R,
) -> Result<Vec<Tile>, GameError> {
    board.sweep_broken();
    fill_empty(board, rules.value_count, rules.safe_cap, rules.policy, rng)
}

fn fill_empty<R: Rng + ?Sized>(
    board: &mut Board,
    value_count: u8,
    cap: usize,
    policy: RefillPolicy,
    rng: &mut R,
) -> Result<Vec<Tile>, GameError> {
    let empty = board.empty_coordinates();
    let mut created = Vec::with_capacity(empty.len());
    for coord in empty {
        let value = match policy {
            RefillPolicy::Safe => safe_value_for(board, coord, value_count, cap, rng),
            RefillPolicy::Random => random_value(rng, value_count),
        };
        let tile = Tile::new(coord, value);
        board.put(tile)?;
        created.push(tile);
    }
    Ok(created)
}

/// Refill and clear until no new cluster forms.
///
/// Each round seeds the matcher with only the freshly created tiles, so a
/// round that creates nothing ends the cascade. Matched tiles are marked
/// broken and swept by the following round.
pub fn resolve_cascade<R: Rng + ?Sized>(
    board: &mut Board,
    rules: &RefillRules,
    rng: &mut R,
) -> Result<CascadeSummary, GameError> {
    let mut summary = CascadeSummary::default();

    loop {
        if summary.rounds >= rules.max_rounds {
            log::error!("Cascade did not settle after {} rounds", summary.rounds);
            return Err(GameError::RefillExhausted {
                rounds: summary.rounds,
            });
        }
        summary.rounds += 1;

        let created = refill_round(board, rules, rng)?;
        if created.is_empty() {
            return Ok(summary);
        }
        let seeds: Vec<HexCoord> = created.iter().map(|t| t.coord).collect();
        let clusters = find_clusters(board, &seeds, rules.min_match);
        if clusters.is_empty() {
            return Ok(summary);
        }

        for tile in clusters.iter().flat_map(|c| c.tiles.iter()) {
            if board.break_tile(tile.coord).is_some() {
                summary.destroyed += 1;
            }
        }
        log::debug!(
            "Cascade round {}: {} clusters, {} destroyed so far",
            summary.rounds,
            clusters.len(),
            summary.destroyed
        );
    }
}
