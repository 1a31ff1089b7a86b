// Look-ahead classification of dead corridors
//
// Starting from a candidate cell, with the cell we are leaving marked as
// already visited, explore until a junction (3+ open sides) shows there is a
// way out. Exhausting the frontier without one means the candidate leads
// into a dead end.

use std::ops::ControlFlow;

use crate::pacman::bfs::breadth_first;
use crate::pacman::grid::{PacmanState, Tile};
use crate::types::Coord;

/// Open sides needed for a cell to count as a junction
const JUNCTION_SIDES: usize = 3;

/// What the look-ahead found behind a candidate cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeadEndAnalysis {
    pub is_dead_end: bool,
    pub has_power_pellet: bool,
    pub pellet_count: i32,
}

/// Classifies the region entered by stepping from `from` onto `start`.
///
/// Exploration gives up after a quarter of the grid's cells and reports
/// "not a dead end" in that case. Ghosts block exploration as they block a
/// normal agent.
pub fn analyze_path(state: &PacmanState, start: Coord, from: Coord) -> DeadEndAnalysis {
    let grid = &state.grid;
    let limit = grid.cell_count() / 4;
    let mut result = DeadEndAnalysis::default();
    let mut explored = 0;
    let mut escaped = false;

    breadth_first(
        grid,
        start,
        &[from],
        |at| state.is_valid(at, false),
        |at, _| {
            match grid.tile(at) {
                Some(Tile::Pellet) => result.pellet_count += 1,
                Some(Tile::PowerPellet) => {
                    result.pellet_count += 1;
                    result.has_power_pellet = true;
                }
                _ => {}
            }

            explored += 1;
            if explored > limit || grid.open_sides(at) >= JUNCTION_SIDES {
                escaped = true;
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        },
    );

    result.is_dead_end = !escaped;
    result
}
