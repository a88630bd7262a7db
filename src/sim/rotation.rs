//! Three-tile rotation around a pivot

use serde::{Deserialize, Serialize};

use super::board::{Board, Tile};
use super::hex::HexCoord;
use crate::error::{GameError, RejectReason};

/// Pivot plus the first two live neighbors in cyclic direction order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationGroup(pub [Tile; 3]);

impl RotationGroup {
    pub fn pivot(&self) -> &Tile {
        &self.0[0]
    }

    pub fn coords(&self) -> [HexCoord; 3] {
        self.0.map(|t| t.coord)
    }
}

/// One tile's move within a rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationMove {
    pub from: HexCoord,
    pub to: HexCoord,
    pub value: u8,
}

/// A cyclic coordinate permutation of three tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation {
    pub moves: [RotationMove; 3],
}

impl Rotation {
    /// Destination coordinates, i.e. where the moved tiles now sit
    pub fn destinations(&self) -> [HexCoord; 3] {
        self.moves.map(|m| m.to)
    }
}

/// Pick the rotation group anchored at `pivot`.
///
/// Fails without touching the board when the pivot is missing or broken, or
/// has fewer than two live neighbors.
pub fn select_rotation_group(board: &Board, pivot: HexCoord) -> Result<RotationGroup, GameError> {
    let center = match board.get(pivot) {
        None => return Err(GameError::InvalidSelection(RejectReason::MissingTile)),
        Some(t) if t.broken => return Err(GameError::InvalidSelection(RejectReason::BrokenTile)),
        Some(t) => *t,
    };

    let mut live = pivot.neighbors().into_iter().filter_map(|n| board.live(n).copied());
    match (live.next(), live.next()) {
        (Some(first), Some(second)) => Ok(RotationGroup([center, first, second])),
        _ => Err(GameError::InvalidSelection(
            RejectReason::InsufficientNeighbors,
        )),
    }
}

/// Each tile takes the coordinate of the next tile in the group:
/// `t0 -> t1`, `t1 -> t2`, `t2 -> t0`.
pub fn compute_rotation(group: &RotationGroup) -> Rotation {
    let tiles = &group.0;
    let moves = std::array::from_fn(|i| RotationMove {
        from: tiles[i].coord,
        to: tiles[(i + 1) % 3].coord,
        value: tiles[i].value,
    });
    Rotation { moves }
}

/// Apply a rotation to the board.
///
/// All three sources are removed before any destination is written, so the
/// board never holds two tiles on one cell or loses a tile. Coordinates and
/// sources are checked up front; on error the board is unchanged.
pub fn apply_rotation(board: &mut Board, rotation: &Rotation) -> Result<[Tile; 3], GameError> {
    for m in &rotation.moves {
        for coord in [m.from, m.to] {
            if !board.contains(coord) {
                return Err(GameError::OutOfBounds {
                    coord,
                    radius: board.radius(),
                });
            }
        }
    }

    if let Some(m) = rotation.moves.iter().find(|m| board.get(m.from).is_none()) {
        log::warn!("Rotation source {} is empty", m.from);
        return Err(GameError::InvalidSelection(RejectReason::MissingTile));
    }

    let lifted = rotation.moves.map(|m| board.remove(m.from));

    let mut placed = [Tile::new(HexCoord::ORIGIN, 0); 3];
    for (slot, (m, tile)) in placed.iter_mut().zip(rotation.moves.iter().zip(lifted)) {
        if let Some(mut tile) = tile {
            tile.coord = m.to;
            board.put(tile)?;
            *slot = tile;
        }
    }
    Ok(placed)
}
