//! Grid coordinates and movement directions
//!
//! Cells are addressed in screen orientation: x grows rightward, y grows
//! downward, so `Direction::Up` carries a negative y delta. Coordinates are
//! signed so a delta applied at the grid edge lands on a representable
//! (out-of-bounds) cell that the collision query rejects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell position on the maze grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    /// Column, growing rightward
    pub x: i32,
    /// Row, growing downward
    pub y: i32,
}

impl CellCoord {
    /// Create a cell coordinate
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step in the given direction
    pub fn stepped(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Apply an optional direction; `None` is the wait no-op (zero delta)
    pub fn offset(self, direction: Option<Direction>) -> Self {
        match direction {
            Some(direction) => self.stepped(direction),
            None => self,
        }
    }

    /// Whether this cell lies inside a square grid of the given dimension
    pub fn in_bounds(self, grid_size: i32) -> bool {
        self.x >= 0 && self.x < grid_size && self.y >= 0 && self.y < grid_size
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four axis-aligned movement directions
///
/// Diagonal movement never occurs; every instruction changes at most one
/// axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward the top of the grid (y - 1)
    Up,
    /// Toward the bottom of the grid (y + 1)
    Down,
    /// Toward the left edge (x - 1)
    Left,
    /// Toward the right edge (x + 1)
    Right,
}

impl Direction {
    /// The (dx, dy) unit delta for this direction
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(f, "{}", name)
    }
}
