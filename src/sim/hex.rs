//! Axial hex coordinates
//!
//! Only the pieces the match/rotation engine needs: neighbor enumeration in a
//! fixed cyclic order, hex distance, rounding of fractional coordinates, and
//! enumeration of a hexagonal region.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Neighbor offsets in cyclic order, starting east and proceeding
/// counter-clockwise. Rotation groups are picked in this order.
pub const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Axial coordinate of a hex cell (implicit `s = -q - r`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub const ORIGIN: HexCoord = HexCoord::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The implicit third axis, widened so it exists for every `(q, r)`
    pub const fn s(&self) -> i64 {
        -(self.q as i64) - self.r as i64
    }

    /// The six neighbors in [`DIRECTIONS`] order. Wraps at the `i32` edge.
    pub fn neighbors(&self) -> [HexCoord; 6] {
        DIRECTIONS.map(|(dq, dr)| HexCoord::new(self.q.wrapping_add(dq), self.r.wrapping_add(dr)))
    }

    /// Hex distance in steps, saturating at `u32::MAX`
    pub fn distance(&self, other: &HexCoord) -> u32 {
        let dq = self.q as i64 - other.q as i64;
        let dr = self.r as i64 - other.r as i64;
        let steps = (dq.abs() + (dq + dr).abs() + dr.abs()) / 2;
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    /// True if every axis lies within `[-radius, radius]`
    pub fn within_radius(&self, radius: u32) -> bool {
        let radius = radius as i64;
        (self.q as i64).abs() <= radius
            && (self.r as i64).abs() <= radius
            && self.s().abs() <= radius
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

impl From<(i32, i32)> for HexCoord {
    fn from((q, r): (i32, i32)) -> Self {
        Self::new(q, r)
    }
}

/// Free-function form of [`HexCoord::neighbors`]
pub fn neighbors(q: i32, r: i32) -> [HexCoord; 6] {
    HexCoord::new(q, r).neighbors()
}

/// Free-function form of [`HexCoord::distance`]
pub fn distance(a: HexCoord, b: HexCoord) -> u32 {
    a.distance(&b)
}

/// Round fractional axial coordinates to the containing hex.
///
/// Rounds all three cube axes and then fixes up the one with the largest
/// rounding error so that `q + r + s == 0` still holds.
pub fn axial_round(q: f32, r: f32) -> HexCoord {
    let s = -q - r;

    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let q_diff = (rq - q).abs();
    let r_diff = (rr - r).abs();
    let s_diff = (rs - s).abs();

    if q_diff > r_diff && q_diff > s_diff {
        rq = -rr - rs;
    } else if r_diff > s_diff {
        rr = -rq - rs;
    }

    HexCoord::new(rq as i32, rr as i32)
}

/// Every coordinate of the hexagon with the given radius.
///
/// Order is `q` ascending, then `r` ascending within that column's valid
/// range. Refill and snapshot order both depend on this.
pub fn hexagon(radius: u32) -> impl Iterator<Item = HexCoord> {
    let radius = radius as i32;
    (-radius..=radius).flat_map(move |q| {
        let r1 = (-radius).max(-q - radius);
        let r2 = radius.min(-q + radius);
        (r1..=r2).map(move |r| HexCoord::new(q, r))
    })
}

/// Number of cells in a hexagon of the given radius
pub fn hexagon_len(radius: u32) -> usize {
    let r = radius as usize;
    3 * r * (r + 1) + 1
}
