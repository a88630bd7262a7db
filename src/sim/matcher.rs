//! Same-value cluster detection
//!
//! Depth-first flood fill over hex adjacency. A seeded search only finds
//! clusters reachable from the seeds, which keeps the per-rotation cost
//! proportional to the touched region rather than the whole board.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::board::{Board, Tile};
use super::hex::HexCoord;

/// Canonical minimum cluster size for a match
pub const MIN_MATCH_COUNT: usize = 5;

/// A maximal connected set of same-value live tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub value: u8,
    /// Members in discovery order
    pub tiles: Vec<Tile>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn coords(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.tiles.iter().map(|t| t.coord)
    }

    pub fn contains(&self, coord: HexCoord) -> bool {
        self.tiles.iter().any(|t| t.coord == coord)
    }
}

/// Find clusters of at least `min_match` tiles.
///
/// With an empty `seeds` slice every live tile on the board is a seed (in
/// region order). Otherwise only clusters reachable from the given
/// coordinates are returned; matches elsewhere on the board are not looked
/// for. Seeds that are empty or broken are skipped.
pub fn find_clusters(board: &Board, seeds: &[HexCoord], min_match: usize) -> Vec<Cluster> {
    let seed_tiles: Vec<Tile> = if seeds.is_empty() {
        board.live_tiles().copied().collect()
    } else {
        seeds.iter().filter_map(|c| board.live(*c)).copied().collect()
    };

    let mut visited: HashSet<HexCoord> = HashSet::new();
    let mut clusters = Vec::new();

    for seed in seed_tiles {
        if visited.contains(&seed.coord) {
            continue;
        }

        let target = seed.value;
        let mut members = Vec::new();
        let mut stack = vec![seed];

        while let Some(current) = stack.pop() {
            if visited.contains(&current.coord) {
                continue;
            }
            if current.broken || current.value != target {
                continue;
            }

            visited.insert(current.coord);
            members.push(current);

            for n in current.coord.neighbors() {
                if let Some(tile) = board.get(n) {
                    if !visited.contains(&n) {
                        stack.push(*tile);
                    }
                }
            }
        }

        if members.len() >= min_match {
            clusters.push(Cluster {
                value: target,
                tiles: members,
            });
        }
    }

    clusters
}

/// Size of the cluster a tile of `value` would form at `coord`.
///
/// Whatever currently sits at `coord` is ignored; the hypothetical tile
/// counts as one. The board is not modified.
pub fn cluster_size_if_placed(board: &Board, coord: HexCoord, value: u8) -> usize {
    let mut visited: HashSet<HexCoord> = HashSet::new();
    let mut stack = vec![coord];
    visited.insert(coord);

    while let Some(current) = stack.pop() {
        for n in current.neighbors() {
            if visited.contains(&n) {
                continue;
            }
            if board.live(n).is_some_and(|t| t.value == value) {
                visited.insert(n);
                stack.push(n);
            }
        }
    }

    visited.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hex::hexagon;
    use proptest::prelude::*;

    fn ring_board() -> Board {
        // Center 2, all six neighbors 1
        Board::from_values(
            1,
            hexagon(1).map(|c| (c, if c == HexCoord::ORIGIN { 2 } else { 1 })),
        )
        .unwrap()
    }

    #[test]
    fn test_full_scan_finds_ring() {
        let board = ring_board();
        let clusters = find_clusters(&board, &[], MIN_MATCH_COUNT);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].value, 1);
        assert_eq!(clusters[0].len(), 6);
        assert!(!clusters[0].contains(HexCoord::ORIGIN));
    }

    #[test]
    fn test_below_threshold_is_not_a_cluster() {
        let board = ring_board();
        assert!(find_clusters(&board, &[], 7).is_empty());
        // Threshold 1 reports the lone center too
        assert_eq!(find_clusters(&board, &[], 1).len(), 2);
    }

    #[test]
    fn test_seeded_scan_is_local() {
        // Two separate runs of 1s along q = -2 and q = 2 on a radius 2 board
        let board = Board::from_values(
            2,
            hexagon(2).map(|c| {
                let v = if c.q == -2 || c.q == 2 {
                    1
                } else {
                    ((c.q + c.r).rem_euclid(3) + 2) as u8
                };
                (c, v)
            }),
        )
        .unwrap();

        let all = find_clusters(&board, &[], 3);
        assert!(all.iter().any(|cl| cl.contains(HexCoord::new(-2, 0))));
        assert!(all.iter().any(|cl| cl.contains(HexCoord::new(2, 0))));

        let local = find_clusters(&board, &[HexCoord::new(-2, 1)], 3);
        assert_eq!(local.len(), 1);
        assert!(local[0].contains(HexCoord::new(-2, 2)));
        assert!(!local[0].contains(HexCoord::new(2, 0)));
    }

    #[test]
    fn test_broken_tiles_are_ignored() {
        let mut board = ring_board();
        board.break_tile(HexCoord::new(1, 0));
        board.break_tile(HexCoord::new(-1, 0));
        // Remaining 1s are split into two runs of two
        assert!(find_clusters(&board, &[], 3).is_empty());
        // Broken seed yields nothing
        assert!(find_clusters(&board, &[HexCoord::new(1, 0)], 1).is_empty());
    }

    #[test]
    fn test_cluster_size_if_placed() {
        let board = ring_board();
        // Replacing the center with a 1 joins all seven
        assert_eq!(cluster_size_if_placed(&board, HexCoord::ORIGIN, 1), 7);
        assert_eq!(cluster_size_if_placed(&board, HexCoord::ORIGIN, 3), 1);
        // Board untouched
        assert_eq!(board.get(HexCoord::ORIGIN).map(|t| t.value), Some(2));

        let empty = Board::new(2);
        assert_eq!(cluster_size_if_placed(&empty, HexCoord::new(1, 1), 4), 1);
    }

    fn arb_board() -> impl Strategy<Value = Board> {
        (1u32..4).prop_flat_map(|radius| {
            let len = crate::sim::hex::hexagon_len(radius);
            let cell = (prop_oneof![Just(0u8), 1u8..4], proptest::bool::weighted(0.2));
            proptest::collection::vec(cell, len).prop_map(move |cells| {
                let mut board = Board::new(radius);
                for (coord, (v, broken)) in hexagon(radius).zip(cells) {
                    if v == 0 {
                        continue;
                    }
                    board.put(Tile::new(coord, v)).unwrap();
                    if broken {
                        board.break_tile(coord);
                    }
                }
                board
            })
        })
    }

    proptest! {
        #[test]
        fn full_scan_partitions_and_is_maximal(board in arb_board(), min_match in 1usize..5) {
            let clusters = find_clusters(&board, &[], min_match);

            let mut seen = HashSet::new();
            for cluster in &clusters {
                prop_assert!(cluster.len() >= min_match);
                for tile in &cluster.tiles {
                    prop_assert_eq!(tile.value, cluster.value);
                    prop_assert!(seen.insert(tile.coord), "tile in two clusters");

                    // Maximality: every same-value live neighbor is a member
                    for n in tile.coord.neighbors() {
                        if let Some(nt) = board.live(n) {
                            if nt.value == cluster.value {
                                prop_assert!(cluster.contains(n));
                            }
                        }
                    }
                }
            }

            // Threshold 1 covers every live tile exactly once, and no broken one
            let every = find_clusters(&board, &[], 1);
            let total: usize = every.iter().map(Cluster::len).sum();
            prop_assert_eq!(total, board.live_count());
            for cluster in &every {
                prop_assert!(cluster.tiles.iter().all(|t| board.live(t.coord).is_some()));
            }
        }
    }
}
