// Pac-Man grid state and cell tests
//
// Cells are addressed as (row, column). Actor occupancy is kept apart from
// the static tiles so structural questions (walls, dead ends) never depend
// on where the ghosts happen to stand.

use crate::config::PacmanConfig;
use crate::types::{Coord, Direction};

/// Static content of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Wall,
    Empty,
    Pellet,
    PowerPellet,
}

impl Tile {
    pub fn is_pellet(self) -> bool {
        matches!(self, Tile::Pellet | Tile::PowerPellet)
    }
}

/// Rectangular maze, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Builds a grid from row-major tiles; `tiles.len()` must be `rows * cols`
    pub fn from_tiles(rows: usize, cols: usize, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), rows * cols);
        Grid { rows, cols, tiles }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn in_bounds(&self, at: Coord) -> bool {
        at.x >= 0 && at.y >= 0 && (at.x as usize) < self.rows && (at.y as usize) < self.cols
    }

    /// Tile at `at`, or `None` outside the grid
    pub fn tile(&self, at: Coord) -> Option<Tile> {
        if self.in_bounds(at) {
            Some(self.tiles[at.x as usize * self.cols + at.y as usize])
        } else {
            None
        }
    }

    /// In bounds and not a wall
    pub fn is_open(&self, at: Coord) -> bool {
        matches!(self.tile(at), Some(t) if t != Tile::Wall)
    }

    /// Number of orthogonal neighbours that are open
    pub fn open_sides(&self, at: Coord) -> usize {
        Direction::all()
            .iter()
            .filter(|dir| self.is_open(dir.apply(&at)))
            .count()
    }

    /// True iff `at` is open with exactly one open neighbour
    pub fn is_dead_end_cell(&self, at: Coord) -> bool {
        self.is_open(at) && self.open_sides(at) == 1
    }

    /// Iterates over every coordinate in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let (rows, cols) = (self.rows as i32, self.cols as i32);
        (0..rows).flat_map(move |x| (0..cols).map(move |y| Coord::new(x, y)))
    }

    /// Pellet cells in row-major order
    pub fn pellets(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        self.coords()
            .filter_map(move |at| self.tile(at).filter(|t| t.is_pellet()).map(|t| (at, t)))
    }
}

/// Dense per-cell scratch map, owned by a single traversal
#[derive(Debug, Clone)]
pub struct CellMap<T> {
    cols: usize,
    cells: Vec<T>,
}

impl<T: Clone> CellMap<T> {
    pub fn new(grid: &Grid, fill: T) -> Self {
        CellMap {
            cols: grid.cols(),
            cells: vec![fill; grid.cell_count()],
        }
    }

    /// Value at `at`; callers pass in-bounds coordinates only
    pub fn get(&self, at: Coord) -> &T {
        &self.cells[at.x as usize * self.cols + at.y as usize]
    }

    pub fn set(&mut self, at: Coord, value: T) {
        self.cells[at.x as usize * self.cols + at.y as usize] = value;
    }
}

/// Dynamic actor positions and statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actors {
    pub position: Coord,
    /// Remaining empowered turns; zero when normal
    pub status: i32,
    pub ghosts: [Coord; 2],
    pub opponent: Coord,
    pub opponent_status: i32,
}

impl Actors {
    pub fn is_empowered(&self) -> bool {
        self.status > 0
    }

    pub fn opponent_empowered(&self) -> bool {
        self.opponent_status > 0
    }

    /// Manhattan distance from `at` to the closer ghost
    pub fn nearest_ghost_distance(&self, at: Coord) -> i32 {
        self.ghosts
            .iter()
            .map(|g| at.manhattan(*g))
            .min()
            .unwrap_or(i32::MAX)
    }
}

/// Everything the Pac-Man agent observes in one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacmanState {
    pub grid: Grid,
    pub actors: Actors,
}

impl PacmanState {
    /// Whether we may step onto `at`. A normal agent avoids ghosts, and also
    /// the opponent while the opponent is empowered.
    pub fn is_valid(&self, at: Coord, empowered: bool) -> bool {
        if !self.grid.is_open(at) {
            return false;
        }
        if empowered {
            return true;
        }
        if self.actors.ghosts.contains(&at) {
            return false;
        }
        !(self.actors.opponent_empowered() && at == self.actors.opponent)
    }

    /// Whether standing on `at` keeps us out of reach of ghosts and an
    /// empowered opponent. Always true while empowered.
    pub fn is_safe(&self, at: Coord, empowered: bool, config: &PacmanConfig) -> bool {
        if empowered {
            return true;
        }

        let [a, b] = self.actors.ghosts;
        let alert = if a.manhattan(b) <= config.ghost_cluster_distance {
            config.clustered_alert_radius
        } else {
            config.alert_radius
        };
        if self.actors.ghosts.iter().any(|g| at.manhattan(*g) <= alert) {
            return false;
        }

        !(self.actors.opponent_empowered()
            && at.manhattan(self.actors.opponent) <= config.opponent_alert_radius)
    }

    /// True while any pellet remains outside `except`
    pub fn has_pellets_besides(&self, except: Coord) -> bool {
        self.grid.pellets().any(|(at, _)| at != except)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_dead_end_cell_is_structural() {
        let grid = grid_from(&[
            "#####",
            "#...#",
            "#.#.#",
            "#####",
        ]);
        assert!(grid.is_dead_end_cell(Coord::new(2, 1)));
        assert!(grid.is_dead_end_cell(Coord::new(2, 3)));
        assert!(!grid.is_dead_end_cell(Coord::new(1, 2)));
        assert!(!grid.is_dead_end_cell(Coord::new(0, 0)), "walls are not dead ends");
        assert!(!grid.is_dead_end_cell(Coord::new(-1, 2)));
    }

    #[test]
    fn test_is_valid_respects_ghosts_and_empowered_opponent() {
        let mut state = state_from(
            &[".....", ".....", "....."],
            Coord::new(1, 1),
            [Coord::new(0, 0), Coord::new(2, 4)],
            Coord::new(1, 3),
        );
        assert!(!state.is_valid(Coord::new(0, 0), false));
        assert!(state.is_valid(Coord::new(0, 0), true));
        assert!(state.is_valid(Coord::new(1, 3), false));
        assert!(!state.is_valid(Coord::new(3, 0), true));

        state.actors.opponent_status = 3;
        assert!(!state.is_valid(Coord::new(1, 3), false));
        assert!(state.is_valid(Coord::new(1, 3), true));
    }

    #[test]
    fn test_alert_radius_grows_when_ghosts_cluster() {
        let config = Config::default_hardcoded().pacman;
        let spread = state_from(
            &["........", "........", "........", "........"],
            Coord::new(0, 0),
            [Coord::new(0, 2), Coord::new(3, 7)],
            Coord::new(3, 0),
        );
        // Ghosts 8 apart: radius 1, so distance 2 is safe
        assert!(spread.is_safe(Coord::new(0, 0), false, &config));
        assert!(!spread.is_safe(Coord::new(0, 1), false, &config));

        let clustered = state_from(
            &["........", "........", "........", "........"],
            Coord::new(0, 0),
            [Coord::new(0, 2), Coord::new(1, 3)],
            Coord::new(3, 0),
        );
        assert!(!clustered.is_safe(Coord::new(0, 0), false, &config));
        assert!(clustered.is_safe(Coord::new(0, 0), true, &config));
    }

    #[test]
    fn test_empowered_opponent_adjacent_is_unsafe() {
        let config = Config::default_hardcoded().pacman;
        let mut state = state_from(
            &["........", "........", "........", "........"],
            Coord::new(0, 0),
            [Coord::new(3, 7), Coord::new(3, 6)],
            Coord::new(0, 1),
        );
        assert!(state.is_safe(Coord::new(0, 0), false, &config));
        state.actors.opponent_status = 2;
        assert!(!state.is_safe(Coord::new(0, 0), false, &config));
    }
}
