//! Player input, the play clock and cascade stepping
//!
//! The host drives a session with three calls: [`select_tile`] for input,
//! [`tick`] for elapsed time, and [`GameState::cascade`] (or
//! [`resolve_pending`]) to settle the board after a match. Cascades are
//! stepped one round at a time so a renderer can animate between rounds.

use serde::{Deserialize, Serialize};

use super::board::Tile;
use super::hex::HexCoord;
use super::matcher::{Cluster, find_clusters};
use super::refill;
use super::rotation::{Rotation, apply_rotation, compute_rotation, select_rotation_group};
use super::scoring::{multiplier, score_for, time_bonus_for, total_destroyed};
use super::state::{GamePhase, GameState};
use crate::error::{GameError, RejectReason};

/// Everything one match resolution changed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchReport {
    pub clusters: Vec<Cluster>,
    /// Tiles marked broken, in cluster order
    pub destroyed: Vec<Tile>,
    pub score_delta: u64,
    /// Seconds requested for the clock, before the time cap
    pub time_bonus: f64,
    /// Combo count after this resolution
    pub combo: u32,
}

impl MatchReport {
    pub fn is_match(&self) -> bool {
        !self.clusters.is_empty()
    }
}

/// Result of a tile selection
#[derive(Debug, Clone, PartialEq)]
pub enum RotationOutcome {
    /// Nothing changed
    Rejected(RejectReason),
    Applied {
        rotation: Rotation,
        /// Rotated tiles at their new coordinates
        moved: [Tile; 3],
        matches: MatchReport,
    },
}

impl RotationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RotationOutcome::Applied { .. })
    }
}

/// Result of advancing the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    Continue,
    Expired,
}

/// One refill round of a cascade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeStep {
    /// 1-based round within the current cascade
    pub round: u32,
    /// New tiles in region order
    pub refilled: Vec<Tile>,
    pub matches: MatchReport,
    /// No new match formed; input is accepted again
    pub settled: bool,
}

/// Rotate around the tile at `coord` and resolve any resulting matches.
///
/// Rejections leave the state untouched. A rotation that forms no match is
/// still applied and counted as a move. When it does match, the state enters
/// [`GamePhase::Resolving`] until the cascade settles.
pub fn select_tile(state: &mut GameState, coord: HexCoord) -> Result<RotationOutcome, GameError> {
    match state.phase {
        GamePhase::GameOver => return Ok(RotationOutcome::Rejected(RejectReason::GameOver)),
        GamePhase::Resolving => return Ok(RotationOutcome::Rejected(RejectReason::InputBlocked)),
        GamePhase::Playing => {}
    }

    let group = match select_rotation_group(&state.board, coord) {
        Ok(group) => group,
        Err(GameError::InvalidSelection(reason)) => {
            log::debug!("Selection at {} rejected: {:?}", coord, reason);
            return Ok(RotationOutcome::Rejected(reason));
        }
        Err(e) => return Err(e),
    };

    let rotation = compute_rotation(&group);
    let moved = apply_rotation(&mut state.board, &rotation)?;
    state.moves += 1;

    let clusters = find_clusters(
        &state.board,
        &rotation.destinations(),
        state.settings.min_match,
    );
    state.cascade_rounds = 0;
    let matches = resolve_matches(state, clusters);

    if matches.is_match() {
        log::debug!(
            "Rotation at {} destroyed {} tiles (+{}, combo {})",
            coord,
            matches.destroyed.len(),
            matches.score_delta,
            matches.combo
        );
    }

    Ok(RotationOutcome::Applied {
        rotation,
        moved,
        matches,
    })
}

/// Advance the play clock and the countdown by `delta_secs`.
///
/// Negative deltas are ignored. Reaching zero ends the game.
pub fn tick(state: &mut GameState, delta_secs: f64) -> TimerOutcome {
    if state.phase == GamePhase::GameOver {
        return TimerOutcome::Expired;
    }

    let dt = delta_secs.max(0.0);
    state.clock_ms += dt * 1000.0;
    state.time_left = (state.time_left - dt).max(0.0);

    if state.is_expired() {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Time up: score {}, {} moves",
            state.score,
            state.moves
        );
        return TimerOutcome::Expired;
    }
    TimerOutcome::Continue
}

/// Break every tile of `clusters` and credit score, time and quest progress.
///
/// An empty cluster list changes nothing and reports the current combo.
fn resolve_matches(state: &mut GameState, clusters: Vec<Cluster>) -> MatchReport {
    if clusters.is_empty() {
        return MatchReport {
            combo: state.combo.count,
            ..MatchReport::default()
        };
    }

    let combo = state.combo.register_match(state.clock_ms);
    let mult = multiplier(combo);

    let mut destroyed = Vec::with_capacity(total_destroyed(&clusters));
    for tile in clusters.iter().flat_map(|c| c.tiles.iter()) {
        if let Some(broken) = state.board.break_tile(tile.coord) {
            state.quest.record(broken.value);
            destroyed.push(broken);
        }
    }

    let score_delta = score_for(total_destroyed(&clusters), mult);
    let time_bonus = time_bonus_for(&clusters, mult);
    state.score += score_delta;
    state.add_time(time_bonus);
    state.phase = GamePhase::Resolving;

    MatchReport {
        clusters,
        destroyed,
        score_delta,
        time_bonus,
        combo,
    }
}

/// Run one cascade round: sweep, refill, then look for matches among the new
/// tiles.
fn cascade_round(state: &mut GameState) -> Result<CascadeStep, GameError> {
    let rules = state.settings.refill_rules();
    if state.cascade_rounds >= rules.max_rounds {
        log::error!("Cascade did not settle after {} rounds", state.cascade_rounds);
        state.phase = GamePhase::GameOver;
        return Err(GameError::RefillExhausted {
            rounds: state.cascade_rounds,
        });
    }
    state.cascade_rounds += 1;

    let refilled = refill::refill_round(&mut state.board, &rules, &mut state.rng)?;
    let clusters = if refilled.is_empty() {
        Vec::new()
    } else {
        let seeds: Vec<HexCoord> = refilled.iter().map(|t| t.coord).collect();
        find_clusters(&state.board, &seeds, rules.min_match)
    };

    let matches = resolve_matches(state, clusters);
    let settled = !matches.is_match();
    if settled {
        state.phase = GamePhase::Playing;
    }

    Ok(CascadeStep {
        round: state.cascade_rounds,
        refilled,
        matches,
        settled,
    })
}

/// Steps a pending cascade, one refill round per item.
///
/// Yields nothing unless the state is [`GamePhase::Resolving`]. Ends after
/// the settling round, after an error, or when the game ends mid-cascade.
pub struct Cascade<'a> {
    state: &'a mut GameState,
    done: bool,
}

impl Iterator for Cascade<'_> {
    type Item = Result<CascadeStep, GameError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.state.phase != GamePhase::Resolving {
            return None;
        }
        let step = cascade_round(self.state);
        self.done = step.as_ref().map_or(true, |s| s.settled);
        Some(step)
    }
}

impl GameState {
    /// Step the pending cascade, if any
    pub fn cascade(&mut self) -> Cascade<'_> {
        Cascade {
            state: self,
            done: false,
        }
    }
}

/// Settle the board in one go
pub fn resolve_pending(state: &mut GameState) -> Result<Vec<CascadeStep>, GameError> {
    state.cascade().collect()
}
