//! Hex lattice coordinates using axial coordinates (q, r).
//!
//! This module provides the geometry the board is generated from:
//! - `HexCoord`: identifies a single cell of the lattice
//! - `walk_lattice`: visits every cell reachable in a fixed number of unit steps
//!
//! Axial coordinates keep neighbor arithmetic integral, and the squared
//! Euclidean distance between two cell centers is an exact integer, so
//! adjacency never depends on floating point comparisons.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The six unit steps in axial space, counter-clockwise starting from East.
pub const DIRECTIONS: [(i32, i32); 6] = [
    (1, 0),  // East
    (1, -1), // NorthEast
    (0, -1), // NorthWest
    (-1, 0), // West
    (-1, 1), // SouthWest
    (0, 1),  // SouthEast
];

/// Axial lattice position.
///
/// Only `q` and `r` are stored; the cube coordinate `s` is derived so that
/// `q + r + s == 0`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct HexCoord {
    /// East-west axis
    pub q: i32,
    /// Southeast axis
    pub r: i32,
}

impl HexCoord {
    /// The center of the lattice
    pub const ORIGIN: HexCoord = HexCoord::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate `s = -q - r`
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Step once in one of the six `DIRECTIONS`
    pub fn step(&self, (dq, dr): (i32, i32)) -> HexCoord {
        HexCoord::new(self.q + dq, self.r + dr)
    }

    /// The six neighboring hexes in `DIRECTIONS` order
    pub fn neighbors(&self) -> [HexCoord; 6] {
        DIRECTIONS.map(|d| self.step(d))
    }

    /// Distance to another hex (in hex steps). This is the ring index when
    /// measured from `ORIGIN`.
    pub fn distance_to(&self, other: &HexCoord) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Squared Euclidean distance between the two cell centers, with unit
    /// spacing between adjacent centers.
    ///
    /// With centers at `(q + r/2, r·√3/2)` this reduces to
    /// `dq² + dq·dr + dr²`, which is always an integer.
    pub fn squared_distance_to(&self, other: &HexCoord) -> i32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        dq * dq + dq * dr + dr * dr
    }

    /// Whether the two cell centers are exactly one unit apart
    pub fn is_adjacent(&self, other: &HexCoord) -> bool {
        self.squared_distance_to(other) == 1
    }

    /// Center of this cell in the plane, adjacent centers one unit apart
    pub fn center(&self) -> (f64, f64) {
        let x = self.q as f64 + self.r as f64 / 2.0;
        let y = self.r as f64 * 3.0_f64.sqrt() / 2.0;
        (x, y)
    }
}

/// Visit every cell reachable from `ORIGIN` by at most `depth` unit steps.
///
/// The walk repeats each step in all six directions from every cell it
/// reaches, so most cells are reached many times; each cell is recorded
/// exactly once, in the order it was first reached, with `ORIGIN` first.
pub fn walk_lattice(depth: u32) -> Vec<HexCoord> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    seen.insert(HexCoord::ORIGIN);
    order.push(HexCoord::ORIGIN);
    walk_from(HexCoord::ORIGIN, depth, &mut seen, &mut order);
    order
}

fn walk_from(
    from: HexCoord,
    remaining: u32,
    seen: &mut HashSet<HexCoord>,
    order: &mut Vec<HexCoord>,
) {
    if remaining == 0 {
        return;
    }
    for next in from.neighbors() {
        if seen.insert(next) {
            order.push(next);
        }
        walk_from(next, remaining - 1, seen, order);
    }
}
