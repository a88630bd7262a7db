//! Ice Breaker - a hex-board rotate-three tile matching game
//!
//! Core modules:
//! - `sim`: Deterministic match engine (board, rotation, matching, refill, scoring)
//! - `settings`: Rule configuration
//! - `highscores`: Top-5 leaderboard
//! - `persistence`: Key/value storage for settings and scores
//! - `error`: Engine error types

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use error::{GameError, RejectReason};
pub use highscores::HighScores;
pub use settings::{BoardSize, Settings};

use glam::Vec2;

use sim::HexCoord;

/// Game configuration constants
pub mod consts {
    pub use crate::sim::board::DEFAULT_VALUE_COUNT;
    pub use crate::sim::matcher::MIN_MATCH_COUNT;
    pub use crate::sim::refill::{MAX_CASCADE_ROUNDS, SAFE_CLUSTER_CAP};
    pub use crate::sim::scoring::{COMBO_WINDOW_MS, POINTS_PER_TILE};

    /// Host timer resolution in seconds
    pub const TIMER_STEP: f64 = 0.1;
    /// Rotation animation length in seconds
    pub const ROTATION_SECS: f64 = 0.25;
    /// Pause between cascade rounds in seconds
    pub const CASCADE_DELAY_SECS: f64 = 0.5;

    /// Hex cell size (center to corner) in pixels at the large preset
    pub const HEX_SIZE: f32 = 32.0;
}

const SQRT_3: f32 = 1.732_050_8;

/// Center of a pointy-top hex cell, relative to the board center
#[inline]
pub fn axial_to_pixel(coord: HexCoord, size: f32) -> Vec2 {
    let (q, r) = (coord.q as f32, coord.r as f32);
    Vec2::new(size * (SQRT_3 * q + SQRT_3 / 2.0 * r), size * 1.5 * r)
}

/// Cell containing a point, relative to the board center
#[inline]
pub fn pixel_to_axial(pos: Vec2, size: f32) -> HexCoord {
    let q = (SQRT_3 / 3.0 * pos.x - pos.y / 3.0) / size;
    let r = (2.0 / 3.0 * pos.y) / size;
    sim::hex::axial_round(q, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hex::hexagon;

    #[test]
    fn test_axial_to_pixel() {
        assert_eq!(axial_to_pixel(HexCoord::ORIGIN, 10.0), Vec2::ZERO);
        let p = axial_to_pixel(HexCoord::new(0, 2), 10.0);
        assert!((p.x - 10.0 * SQRT_3).abs() < 1e-4);
        assert!((p.y - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_pixel_roundtrip() {
        for coord in hexagon(4) {
            let center = axial_to_pixel(coord, consts::HEX_SIZE);
            assert_eq!(pixel_to_axial(center, consts::HEX_SIZE), coord);
            // Slightly off-center still lands in the same cell
            let nudged = center + Vec2::new(5.0, -4.0);
            assert_eq!(pixel_to_axial(nudged, consts::HEX_SIZE), coord);
        }
    }
}
