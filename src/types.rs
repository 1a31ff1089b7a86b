// Shared coordinate types and harness snapshots
//
// Both engines index grids as (row, column). Snapshots mirror what the game
// harness hands us each turn and are what the decision log and the replay
// tool persist as JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pacman::{Actors, Grid, PacmanState, Tile};
use crate::reversi::{Board, Disc};

/// 2D coordinate on a grid; `x` is the row, `y` the column
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Returns the coordinate shifted by (dx, dy)
    pub fn offset(&self, dx: i32, dy: i32) -> Coord {
        Coord {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Calculates Manhattan distance between two coordinates
    pub fn manhattan(&self, other: Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// The four orthogonal movement directions, in the order the Pac-Man agent
/// tries them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Returns all directions in search order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left]
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Up => coord.offset(-1, 0),
            Direction::Right => coord.offset(0, 1),
            Direction::Down => coord.offset(1, 0),
            Direction::Left => coord.offset(0, -1),
        }
    }
}

/// One candidate step for the Pac-Man fallback scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Move(Direction),
    Stay,
}

impl Step {
    /// Up, right, down, left, then stay
    pub fn all() -> [Step; 5] {
        [
            Step::Move(Direction::Up),
            Step::Move(Direction::Right),
            Step::Move(Direction::Down),
            Step::Move(Direction::Left),
            Step::Stay,
        ]
    }

    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Step::Move(dir) => dir.apply(coord),
            Step::Stay => *coord,
        }
    }
}

/// Errors raised while decoding a harness snapshot into engine state
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("board has no rows")]
    Empty,
    #[error("row {row} has {len} cells, expected {expected}")]
    Ragged { row: usize, len: usize, expected: usize },
    #[error("reversi board must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("{actor} at ({x}, {y}) is outside the grid")]
    ActorOutOfBounds { actor: &'static str, x: i32, y: i32 },
}

/// Reversi turn snapshot: `'O'` own disc, `'o'` opponent disc, anything else empty
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ReversiSnapshot {
    pub turn: i32,
    pub rows: Vec<String>,
}

/// Pac-Man turn snapshot: `'#'` wall, `'o'` pellet, `'O'` power pellet, anything else empty
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PacmanSnapshot {
    pub turn: i32,
    pub rows: Vec<String>,
    pub position: Coord,
    /// Remaining empowered turns; zero when normal
    pub status: i32,
    pub ghosts: [Coord; 2],
    pub opponent: Coord,
    pub opponent_status: i32,
}

/// A snapshot of either game, tagged by `"game"`
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum Snapshot {
    Reversi(ReversiSnapshot),
    Pacman(PacmanSnapshot),
}

impl Snapshot {
    pub fn turn(&self) -> i32 {
        match self {
            Snapshot::Reversi(s) => s.turn,
            Snapshot::Pacman(s) => s.turn,
        }
    }
}

/// Checks that all rows share one width and returns (rows, cols)
fn grid_dimensions(rows: &[String]) -> Result<(usize, usize), SnapshotError> {
    let expected = rows.first().ok_or(SnapshotError::Empty)?.chars().count();
    if expected == 0 {
        return Err(SnapshotError::Empty);
    }
    for (row, line) in rows.iter().enumerate() {
        let len = line.chars().count();
        if len != expected {
            return Err(SnapshotError::Ragged { row, len, expected });
        }
    }
    Ok((rows.len(), expected))
}

impl ReversiSnapshot {
    /// Decodes the rows into a board seen from our side
    pub fn to_board(&self) -> Result<Board, SnapshotError> {
        let (rows, cols) = grid_dimensions(&self.rows)?;
        if rows != cols {
            return Err(SnapshotError::NotSquare { rows, cols });
        }

        let cells = self
            .rows
            .iter()
            .flat_map(|line| line.chars())
            .map(|c| match c {
                'O' => Disc::Own,
                'o' => Disc::Opponent,
                _ => Disc::Empty,
            })
            .collect();

        Ok(Board::from_cells(rows, cells))
    }
}

impl PacmanSnapshot {
    /// Decodes the rows and actors into a validated game state
    pub fn to_state(&self) -> Result<PacmanState, SnapshotError> {
        let (rows, cols) = grid_dimensions(&self.rows)?;
        let tiles = self
            .rows
            .iter()
            .flat_map(|line| line.chars())
            .map(|c| match c {
                '#' => Tile::Wall,
                'o' => Tile::Pellet,
                'O' => Tile::PowerPellet,
                _ => Tile::Empty,
            })
            .collect();
        let grid = Grid::from_tiles(rows, cols, tiles);

        let placed = [
            ("self", self.position),
            ("ghost 0", self.ghosts[0]),
            ("ghost 1", self.ghosts[1]),
            ("opponent", self.opponent),
        ];
        for (actor, pos) in placed {
            if !grid.in_bounds(pos) {
                return Err(SnapshotError::ActorOutOfBounds {
                    actor,
                    x: pos.x,
                    y: pos.y,
                });
            }
        }

        Ok(PacmanState {
            grid,
            actors: Actors {
                position: self.position,
                status: self.status,
                ghosts: self.ghosts,
                opponent: self.opponent,
                opponent_status: self.opponent_status,
            },
        })
    }
}
