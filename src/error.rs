//! Error types for the match engine

use crate::settings::SettingsError;
use crate::sim::HexCoord;

/// Why a tile selection did not start a rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No tile at the selected coordinate
    MissingTile,
    /// The selected tile is already matched and pending removal
    BrokenTile,
    /// Fewer than two live neighbors to rotate with
    InsufficientNeighbors,
    /// A cascade from the previous rotation is still resolving
    InputBlocked,
    /// The clock has run out
    GameOver,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("invalid selection: {0:?}")]
    InvalidSelection(RejectReason),
    #[error("coordinate {coord} is outside the board radius {radius}")]
    OutOfBounds { coord: HexCoord, radius: u32 },
    #[error("cascade did not settle within {rounds} rounds")]
    RefillExhausted { rounds: u32 },
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
