//! Deterministic match engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, owned by the game state
//! - Stable iteration order (region order: q ascending, then r)
//! - Time only enters through `tick`
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod board;
pub mod hex;
pub mod matcher;
pub mod refill;
pub mod rotation;
pub mod scoring;
pub mod state;
pub mod tick;

pub use autoplay::choose_pivot;
pub use board::{Board, Tile};
pub use hex::HexCoord;
pub use matcher::{Cluster, cluster_size_if_placed, find_clusters};
pub use refill::{RefillPolicy, RefillRules};
pub use rotation::{Rotation, RotationGroup, RotationMove, apply_rotation, compute_rotation, select_rotation_group};
pub use scoring::ComboState;
pub use state::{BoardSnapshot, GamePhase, GameState, QuestProgress};
pub use tick::{
    Cascade, CascadeStep, MatchReport, RotationOutcome, TimerOutcome, resolve_pending, select_tile,
    tick,
};
