//! Combo, score and time-bonus rules
//!
//! A "match resolution" is everything destroyed by one rotation or by one
//! cascade round. Each resolution registers exactly one combo step,
//! however many clusters it contains.

use serde::{Deserialize, Serialize};

use super::matcher::Cluster;

/// Canonical combo window in milliseconds
pub const COMBO_WINDOW_MS: f64 = 1350.0;

/// Points per destroyed tile before the combo multiplier
pub const POINTS_PER_TILE: f64 = 100.0;

/// Consecutive-match counter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    pub count: u32,
    /// Play-clock time of the previous match, if any
    pub last_match_ms: Option<f64>,
    pub window_ms: f64,
}

impl Default for ComboState {
    fn default() -> Self {
        Self::new(COMBO_WINDOW_MS)
    }
}

impl ComboState {
    pub fn new(window_ms: f64) -> Self {
        Self {
            count: 0,
            last_match_ms: None,
            window_ms,
        }
    }

    /// Record a match resolution at `now_ms` and return the new count.
    ///
    /// Within the window of the previous match the count grows by one,
    /// otherwise it restarts at 1.
    pub fn register_match(&mut self, now_ms: f64) -> u32 {
        self.count = match self.last_match_ms {
            Some(last) if now_ms - last <= self.window_ms => self.count + 1,
            _ => 1,
        };
        self.last_match_ms = Some(now_ms);
        self.count
    }

    pub fn multiplier(&self) -> f64 {
        multiplier(self.count)
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.last_match_ms = None;
    }
}

/// Tiered combo multiplier
pub fn multiplier(count: u32) -> f64 {
    if count >= 6 {
        1.4
    } else if count >= 3 {
        1.2
    } else {
        1.0
    }
}

/// Points for destroying `destroyed` tiles at the given multiplier
pub fn score_for(destroyed: usize, multiplier: f64) -> u64 {
    (destroyed as f64 * POINTS_PER_TILE * multiplier).round() as u64
}

/// Base seconds a single cluster earns, by size
pub fn base_time_bonus(size: usize) -> f64 {
    match size {
        0 | 1 => 0.0,
        2 => 0.2,
        3 => 0.5,
        _ => 0.8,
    }
}

/// Seconds added to the clock for a set of clusters
pub fn time_bonus_for(clusters: &[Cluster], multiplier: f64) -> f64 {
    let base: f64 = clusters.iter().map(|c| base_time_bonus(c.len())).sum();
    base * multiplier
}

pub fn total_destroyed(clusters: &[Cluster]) -> usize {
    clusters.iter().map(Cluster::len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board::Tile;
    use crate::sim::hex::HexCoord;
    use proptest::prelude::*;

    fn cluster_of(size: usize) -> Cluster {
        Cluster {
            value: 1,
            tiles: (0..size as i32).map(|i| Tile::new(HexCoord::new(i, 0), 1)).collect(),
        }
    }

    #[test]
    fn test_combo_sequence() {
        let mut combo = ComboState::default();
        assert_eq!(combo.register_match(0.0), 1);
        assert_eq!(combo.register_match(500.0), 2);
        assert_eq!(combo.register_match(3000.0), 1);
    }

    #[test]
    fn test_combo_window_is_inclusive() {
        let mut combo = ComboState::default();
        combo.register_match(1000.0);
        assert_eq!(combo.register_match(2350.0), 2);
        assert_eq!(combo.register_match(3700.01), 1);
    }

    #[test]
    fn test_multiplier_tiers() {
        assert_eq!(multiplier(0), 1.0);
        assert_eq!(multiplier(2), 1.0);
        assert_eq!(multiplier(3), 1.2);
        assert_eq!(multiplier(5), 1.2);
        assert_eq!(multiplier(6), 1.4);
        assert_eq!(multiplier(40), 1.4);
    }

    #[test]
    fn test_score_for() {
        assert_eq!(score_for(5, 1.0), 500);
        assert_eq!(score_for(5, 1.2), 600);
        assert_eq!(score_for(7, 1.4), 980);
        assert_eq!(score_for(0, 1.4), 0);
    }

    #[test]
    fn test_time_bonus() {
        let bonus = time_bonus_for(&[cluster_of(5)], 1.2);
        assert!((bonus - 0.96).abs() < 1e-9);

        let mixed = [cluster_of(2), cluster_of(3), cluster_of(4), cluster_of(1)];
        assert!((time_bonus_for(&mixed, 1.0) - 1.5).abs() < 1e-9);
        assert_eq!(time_bonus_for(&[], 1.4), 0.0);
        assert_eq!(total_destroyed(&mixed), 10);
    }

    proptest! {
        #[test]
        fn combo_resets_outside_window(
            prior in 0u32..50,
            t1 in 0.0f64..1.0e6,
            gap in (COMBO_WINDOW_MS + 0.001)..1.0e6,
        ) {
            let mut combo = ComboState {
                count: prior,
                last_match_ms: Some(t1),
                window_ms: COMBO_WINDOW_MS,
            };
            prop_assert_eq!(combo.register_match(t1 + gap), 1);
        }

        #[test]
        fn score_is_monotonic(a in 0usize..500, b in 0usize..500, ca in 0u32..10, cb in 0u32..10) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (mlo, mhi) = if ca <= cb {
                (multiplier(ca), multiplier(cb))
            } else {
                (multiplier(cb), multiplier(ca))
            };
            prop_assert!(score_for(lo, mlo) <= score_for(hi, mlo));
            prop_assert!(score_for(lo, mlo) <= score_for(lo, mhi));
        }
    }
}
