//! Offset hex coordinates for the tactical board
//!
//! Columns are flat-topped hexes; odd columns sit half a hex lower than even
//! columns. Direction offsets therefore depend on column parity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// (column, row) address of a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Odd columns are staggered down by half a hex. Works for negative
    /// columns too (two's complement: -1 & 1 == 1).
    pub const fn is_odd_column(&self) -> bool {
        self.x & 1 == 1
    }

    /// Adjacent coordinate in the given direction.
    pub fn neighbor(&self, dir: HexDirection) -> Coord {
        let odd = self.is_odd_column() as i32;
        let even = 1 - odd;
        match dir {
            HexDirection::North => Coord::new(self.x, self.y - 1),
            HexDirection::NorthEast => Coord::new(self.x + 1, self.y - even),
            HexDirection::SouthEast => Coord::new(self.x + 1, self.y + odd),
            HexDirection::South => Coord::new(self.x, self.y + 1),
            HexDirection::SouthWest => Coord::new(self.x - 1, self.y + odd),
            HexDirection::NorthWest => Coord::new(self.x - 1, self.y - even),
        }
    }

    /// All 6 neighbors, indexed by direction
    pub fn neighbors(&self) -> [Coord; 6] {
        HexDirection::all().map(|d| self.neighbor(d))
    }

    /// Direction of an adjacent coordinate, `None` if not adjacent
    pub fn direction_to(&self, other: &Coord) -> Option<HexDirection> {
        HexDirection::all()
            .into_iter()
            .find(|d| self.neighbor(*d) == *other)
    }

    /// Convert to cube coordinates (q, r, s) for distance and line work
    pub fn to_cube(&self) -> (i32, i32, i32) {
        let q = self.x;
        let r = self.y - (self.x - (self.x & 1)) / 2;
        (q, r, -q - r)
    }

    /// Inverse of [`Coord::to_cube`] (s is implied)
    pub fn from_cube(q: i32, r: i32) -> Self {
        Self::new(q, r + (q - (q & 1)) / 2)
    }

    /// Distance in hex steps
    pub fn distance(&self, other: &Coord) -> u32 {
        let (q1, r1, s1) = self.to_cube();
        let (q2, r2, s2) = other.to_cube();
        (((q1 - q2).abs() + (r1 - r2).abs() + (s1 - s2).abs()) / 2) as u32
    }

    /// Hexes on the straight line from self to other (inclusive)
    pub fn line_to(&self, other: &Coord) -> Vec<Coord> {
        let n = self.distance(other) as i32;
        if n == 0 {
            return vec![*self];
        }

        let (q1, r1, _) = self.to_cube();
        let (q2, r2, _) = other.to_cube();
        // Nudge off exact vertex ties so the line is stable
        let (q1, r1) = (q1 as f64 + 1e-6, r1 as f64 + 2e-6);
        let (q2, r2) = (q2 as f64 + 1e-6, r2 as f64 + 2e-6);

        let mut results = Vec::with_capacity((n + 1) as usize);
        for i in 0..=n {
            let t = i as f64 / n as f64;
            let q = q1 + (q2 - q1) * t;
            let r = r1 + (r2 - r1) * t;
            let (rq, rr) = cube_round(q, r);
            results.push(Self::from_cube(rq, rr));
        }
        results
    }

    /// Every coordinate of the square of side `2 * radius + 1` centered here
    pub fn square_around(&self, radius: u32) -> impl Iterator<Item = Coord> {
        let r = radius as i32;
        let center = *self;
        (-r..=r).flat_map(move |dx| (-r..=r).map(move |dy| Coord::new(center.x + dx, center.y + dy)))
    }

    /// Hexes within `radius` steps (inclusive), found by filtering the
    /// bounding square
    pub fn hexes_in_range(&self, radius: u32) -> Vec<Coord> {
        // A single step moves at most one column and one row, so the square
        // covers every hex at distance <= radius
        self.square_around(radius)
            .filter(|c| self.distance(c) <= radius)
            .collect()
    }

    /// Four-digit board label: 1-based column then row, two digits each
    pub fn board_label(&self) -> String {
        format!("{:02}{:02}", self.x + 1, self.y + 1)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board_label())
    }
}

/// Round fractional cube coordinates to the nearest hex
fn cube_round(q: f64, r: f64) -> (i32, i32) {
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

    (rq as i32, rr as i32)
}

/// Hex edge direction, clockwise from north
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum HexDirection {
    #[default]
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

impl HexDirection {
    /// Direction from its index (0 = North, clockwise); wraps modulo 6
    pub fn from_index(index: usize) -> Self {
        Self::all()[index % 6]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Get opposite direction
    pub fn opposite(&self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Next direction clockwise
    pub fn clockwise(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Screen angle of the edge midpoint in degrees, measured counter-clockwise
    /// from east with y pointing up (north = 90).
    pub fn angle_degrees(&self) -> f64 {
        match self {
            HexDirection::North => 90.0,
            HexDirection::NorthEast => 30.0,
            HexDirection::SouthEast => -30.0,
            HexDirection::South => -90.0,
            HexDirection::SouthWest => -150.0,
            HexDirection::NorthWest => 150.0,
        }
    }

    /// All directions
    pub fn all() -> [HexDirection; 6] {
        [
            HexDirection::North,
            HexDirection::NorthEast,
            HexDirection::SouthEast,
            HexDirection::South,
            HexDirection::SouthWest,
            HexDirection::NorthWest,
        ]
    }
}
