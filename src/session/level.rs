//! Maze fixtures, themes, and the collision query
//!
//! Levels are immutable per-session fixtures; loading hands out a fresh
//! copy so the editor brush never mutates the catalog. The built-in
//! fixtures are the three shipped worlds. Wall membership is keyed
//! by cell, so the collision query is O(1).
//!
//! The wall set is expected to stay disjoint from the start and goal
//! cells. The query does not defend against a violating fixture; the
//! editor brush preserves the invariant.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::{LevelError, LevelResult};
use super::grid::CellCoord;

/// Cosmetic theme data for one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTheme {
    /// World name
    pub name: String,
    /// Glyph drawn on wall cells
    pub wall_icon: String,
    /// Glyph drawn on the goal cell
    pub goal_icon: String,
    /// Floor color (hex)
    pub floor_color: String,
    /// Wall background color (hex)
    pub wall_color: String,
    /// Accent palette name
    pub accent: String,
}

/// One maze fixture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// Fixture id
    pub id: u32,
    /// Cosmetic theme
    pub theme: LevelTheme,
    /// Grid dimension; cells span `[0, grid_size)` on both axes
    pub grid_size: i32,
    /// Where sprites begin
    pub start: CellCoord,
    /// The cell that wins the puzzle
    pub goal: CellCoord,
    /// Impassable cells
    pub walls: HashSet<CellCoord>,
}

impl Level {
    /// Whether a cell is impassable: outside the grid or a wall
    pub fn is_blocked(&self, cell: CellCoord) -> bool {
        !cell.in_bounds(self.grid_size) || self.walls.contains(&cell)
    }
}

/// The set of loadable level fixtures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// The three built-in worlds
    pub fn builtin() -> Self {
        Self {
            levels: vec![forest(), cosmos(), volcano()],
        }
    }

    /// Load fixtures from a JSON document (an array of levels)
    pub fn from_json(data: &str) -> LevelResult<Self> {
        let levels: Vec<Level> = serde_json::from_str(data)?;
        Ok(Self { levels })
    }

    /// Build a catalog from already-constructed fixtures
    pub fn from_levels(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    /// A fresh copy of the fixture with the given id
    pub fn get(&self, id: u32) -> LevelResult<Level> {
        self.levels
            .iter()
            .find(|level| level.id == id)
            .cloned()
            .ok_or(LevelError::NotFound(id))
    }

    /// All fixtures, in catalog order
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

const GRID_SIZE: i32 = 10;

fn cells(pairs: &[(i32, i32)]) -> impl Iterator<Item = CellCoord> + '_ {
    pairs.iter().map(|&(x, y)| CellCoord::new(x, y))
}

/// The outer ring of a square grid
fn border(grid_size: i32) -> impl Iterator<Item = CellCoord> {
    let top = (0..grid_size).map(move |x| CellCoord::new(x, 0));
    let bottom = (0..grid_size).map(move |x| CellCoord::new(x, grid_size - 1));
    let left = (1..grid_size - 1).map(move |y| CellCoord::new(0, y));
    let right = (1..grid_size - 1).map(move |y| CellCoord::new(grid_size - 1, y));
    top.chain(bottom).chain(left).chain(right)
}

fn forest() -> Level {
    const INTERIOR: &[(i32, i32)] = &[
        (2, 2),
        (2, 4),
        (3, 4),
        (1, 6),
        (2, 6),
        (8, 6),
        (2, 3),
        (5, 7),
        (5, 8),
        (8, 7),
        (4, 7),
        (2, 1),
        (8, 8),
        (8, 5),
        (8, 4),
        (8, 3),
        (8, 2),
        (6, 5),
        (6, 4),
        (6, 2),
        (6, 1),
    ];

    Level {
        id: 1,
        theme: LevelTheme {
            name: "Forest".to_string(),
            wall_icon: "🌲".to_string(),
            goal_icon: "🥚".to_string(),
            floor_color: "#064e3b".to_string(),
            wall_color: "#065f46".to_string(),
            accent: "emerald".to_string(),
        },
        grid_size: GRID_SIZE,
        start: CellCoord::new(1, 1),
        goal: CellCoord::new(3, 1),
        walls: border(GRID_SIZE).chain(cells(INTERIOR)).collect(),
    }
}

fn cosmos() -> Level {
    const INTERIOR: &[(i32, i32)] = &[
        (8, 1),
        (1, 3),
        (2, 4),
        (3, 5),
        (4, 6),
        (5, 7),
        (6, 8),
        (2, 1),
        (3, 2),
        (4, 3),
        (5, 4),
        (6, 5),
        (7, 6),
        (8, 7),
        (7, 4),
        (8, 5),
        (6, 3),
        (5, 2),
        (4, 1),
        (6, 1),
        (7, 2),
        (8, 3),
        (1, 5),
        (2, 6),
        (1, 7),
        (2, 8),
        (3, 7),
        (4, 8),
    ];

    // The bottom border has a deliberate gap at (3, 9).
    Level {
        id: 2,
        theme: LevelTheme {
            name: "Cosmos".to_string(),
            wall_icon: "☄️".to_string(),
            goal_icon: "🛸".to_string(),
            floor_color: "#1e1b4b".to_string(),
            wall_color: "#312e81".to_string(),
            accent: "indigo".to_string(),
        },
        grid_size: GRID_SIZE,
        start: CellCoord::new(1, 1),
        goal: CellCoord::new(8, 8),
        walls: border(GRID_SIZE)
            .filter(|cell| *cell != CellCoord::new(3, 9))
            .chain(cells(INTERIOR))
            .collect(),
    }
}

fn volcano() -> Level {
    const INTERIOR: &[(i32, i32)] = &[
        (7, 1),
        (7, 2),
        (7, 3),
        (7, 4),
        (7, 5),
        (7, 6),
        (7, 7),
        (6, 7),
        (5, 7),
        (4, 7),
        (3, 7),
        (2, 7),
        (2, 6),
        (2, 5),
        (2, 4),
        (2, 3),
        (2, 2),
        (3, 2),
        (4, 2),
        (5, 2),
        (5, 3),
        (5, 4),
        (5, 5),
    ];

    // Deliberate border gaps at (4, 0) and (5, 9).
    Level {
        id: 3,
        theme: LevelTheme {
            name: "Volcano".to_string(),
            wall_icon: "🌋".to_string(),
            goal_icon: "💎".to_string(),
            floor_color: "#450a0a".to_string(),
            wall_color: "#7f1d1d".to_string(),
            accent: "orange".to_string(),
        },
        grid_size: GRID_SIZE,
        start: CellCoord::new(8, 1),
        goal: CellCoord::new(4, 3),
        walls: border(GRID_SIZE)
            .filter(|cell| *cell != CellCoord::new(4, 0) && *cell != CellCoord::new(5, 9))
            .chain(cells(INTERIOR))
            .collect(),
    }
}
