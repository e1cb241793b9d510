//! Strongly-typed identifiers for tiles and unit types.

use std::fmt;

/// Identifies a unit type in the per-type count table.
///
/// The raw value is whatever the game engine uses for its unit-type
/// enumeration; the codec treats it as an opaque signed integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitTypeId(pub i32);

impl fmt::Display for UnitTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UnitTypeId {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

/// A tile coordinate on the terrain grid.
///
/// `x` runs along the width axis, `y` along the height axis. Both are
/// zero-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePos {
    /// Column index, `0..width`.
    pub x: u32,
    /// Row index, `0..height`.
    pub y: u32,
}

impl TilePos {
    /// Create a tile position.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u32, u32)> for TilePos {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}
