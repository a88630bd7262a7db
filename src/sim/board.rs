//! Tile storage over a hexagonal region

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::hex::{self, HexCoord};
use crate::error::GameError;

/// Tile values are `1..=value_count`; this is the canonical count
pub const DEFAULT_VALUE_COUNT: u8 = 6;

/// One occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub coord: HexCoord,
    /// Matching class ("color"). Never changes for the life of the tile.
    pub value: u8,
    /// Matched and pending removal
    #[serde(default)]
    pub broken: bool,
}

impl Tile {
    pub fn new(coord: HexCoord, value: u8) -> Self {
        Self {
            coord,
            value,
            broken: false,
        }
    }

    /// Live tiles take part in matching and rotation
    pub fn is_live(&self) -> bool {
        !self.broken
    }
}

/// Tiles keyed by coordinate, bounded to a hexagon of fixed radius
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    radius: u32,
    tiles: HashMap<HexCoord, Tile>,
}

impl Board {
    /// An empty board
    pub fn new(radius: u32) -> Self {
        Self {
            radius,
            tiles: HashMap::with_capacity(hex::hexagon_len(radius)),
        }
    }

    /// Build a board from `(coord, value)` pairs
    pub fn from_values<I>(radius: u32, values: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = (HexCoord, u8)>,
    {
        let mut board = Self::new(radius);
        for (coord, value) in values {
            board.put(Tile::new(coord, value))?;
        }
        Ok(board)
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn contains(&self, coord: HexCoord) -> bool {
        coord.within_radius(self.radius)
    }

    /// Tile at `coord`, broken or not
    pub fn get(&self, coord: HexCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    /// Non-broken tile at `coord`
    pub fn live(&self, coord: HexCoord) -> Option<&Tile> {
        self.tiles.get(&coord).filter(|t| t.is_live())
    }

    /// Insert or overwrite the tile at `tile.coord`
    pub fn put(&mut self, tile: Tile) -> Result<(), GameError> {
        if !self.contains(tile.coord) {
            log::warn!("Rejected put at {} (radius {})", tile.coord, self.radius);
            return Err(GameError::OutOfBounds {
                coord: tile.coord,
                radius: self.radius,
            });
        }
        self.tiles.insert(tile.coord, tile);
        Ok(())
    }

    pub fn remove(&mut self, coord: HexCoord) -> Option<Tile> {
        self.tiles.remove(&coord)
    }

    /// Mark the tile at `coord` as matched. Returns the tile if it was live.
    pub fn break_tile(&mut self, coord: HexCoord) -> Option<Tile> {
        match self.tiles.get_mut(&coord) {
            Some(tile) if tile.is_live() => {
                tile.broken = true;
                Some(*tile)
            }
            _ => None,
        }
    }

    /// Drop every broken tile from storage, returning their coordinates
    pub fn sweep_broken(&mut self) -> Vec<HexCoord> {
        let mut swept: Vec<HexCoord> = self
            .tiles
            .values()
            .filter(|t| t.broken)
            .map(|t| t.coord)
            .collect();
        swept.sort();
        for coord in &swept {
            self.tiles.remove(coord);
        }
        swept
    }

    /// All stored tiles, including broken ones pending removal.
    ///
    /// Borrowing the board keeps it unmodified for the life of the iterator.
    pub fn all_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Live tiles in region order
    pub fn live_tiles(&self) -> impl Iterator<Item = &Tile> {
        hex::hexagon(self.radius).filter_map(|c| self.live(c))
    }

    pub fn live_count(&self) -> usize {
        self.tiles.values().filter(|t| t.is_live()).count()
    }

    /// Region coordinates with no live tile, in region order
    pub fn empty_coordinates(&self) -> Vec<HexCoord> {
        hex::hexagon(self.radius)
            .filter(|c| self.live(*c).is_none())
            .collect()
    }

    /// True when every region cell holds a live tile
    pub fn is_full(&self) -> bool {
        self.live_count() == hex::hexagon_len(self.radius)
    }
}
