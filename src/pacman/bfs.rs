// Breadth-first traversal over the maze, target scoring and path backtrace
//
// `breadth_first` is shared by the target search and the dead-end analyzer.
// Each call owns its visited and parent maps, so there is no scratch state to
// reset between searches.

use std::collections::VecDeque;
use std::ops::ControlFlow;

use crate::config::PacmanConfig;
use crate::pacman::grid::{CellMap, Grid, PacmanState, Tile};
use crate::types::{Coord, Direction};

/// Visited cells and backtrace pointers of one traversal
#[derive(Debug, Clone)]
pub struct BfsTree {
    origin: Coord,
    visited: CellMap<bool>,
    parent: CellMap<Option<Coord>>,
}

impl BfsTree {
    pub fn is_visited(&self, grid: &Grid, at: Coord) -> bool {
        grid.in_bounds(at) && *self.visited.get(at)
    }

    /// Predecessor of `at` on its shortest path from the origin
    pub fn parent(&self, grid: &Grid, at: Coord) -> Option<Coord> {
        if grid.in_bounds(at) {
            *self.parent.get(at)
        } else {
            None
        }
    }

    /// First cell to step onto when heading from the origin to `target`.
    ///
    /// Stays on the origin when there is no target, when the target is the
    /// origin itself, or when the target was never reached.
    pub fn next_step(&self, grid: &Grid, target: Option<Coord>) -> Coord {
        let Some(target) = target else {
            return self.origin;
        };
        if target == self.origin {
            return target;
        }

        let mut cursor = target;
        while let Some(prev) = self.parent(grid, cursor) {
            if prev == self.origin {
                return cursor;
            }
            cursor = prev;
        }
        self.origin
    }
}

/// Runs a BFS from `origin` over cells accepted by `passable`.
///
/// Cells in `pre_visited` are never entered. `visit` is called for every
/// dequeued cell with its distance from the origin; returning
/// `ControlFlow::Break` stops the traversal early.
pub fn breadth_first<P, V>(
    grid: &Grid,
    origin: Coord,
    pre_visited: &[Coord],
    passable: P,
    mut visit: V,
) -> BfsTree
where
    P: Fn(Coord) -> bool,
    V: FnMut(Coord, u32) -> ControlFlow<()>,
{
    let mut tree = BfsTree {
        origin,
        visited: CellMap::new(grid, false),
        parent: CellMap::new(grid, None),
    };
    if !grid.in_bounds(origin) {
        return tree;
    }

    for &at in pre_visited {
        if grid.in_bounds(at) {
            tree.visited.set(at, true);
        }
    }

    let mut queue = VecDeque::new();
    tree.visited.set(origin, true);
    queue.push_back((origin, 0u32));

    while let Some((current, dist)) = queue.pop_front() {
        if visit(current, dist).is_break() {
            break;
        }

        for dir in Direction::all() {
            let next = dir.apply(&current);
            if !grid.in_bounds(next) || *tree.visited.get(next) || !passable(next) {
                continue;
            }
            tree.visited.set(next, true);
            tree.parent.set(next, Some(current));
            queue.push_back((next, dist + 1));
        }
    }

    tree
}

/// Best-scoring reachable cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub at: Coord,
    pub score: i32,
}

/// Outcome of a target search: the chosen target (if any) and the tree to
/// backtrace through
#[derive(Debug, Clone)]
pub struct TargetSearch {
    pub target: Option<Target>,
    pub tree: BfsTree,
}

impl TargetSearch {
    pub fn target_coord(&self) -> Option<Coord> {
        self.target.map(|t| t.at)
    }
}

/// Score of `at` reached after `dist` steps, and whether it may be a target
fn score_cell(
    state: &PacmanState,
    at: Coord,
    dist: i32,
    empowered: bool,
    config: &PacmanConfig,
) -> (i32, bool) {
    let actors = &state.actors;
    let tile = state.grid.tile(at);
    let mut score = 0;
    let mut eligible = false;

    if tile == Some(Tile::PowerPellet) {
        score = config.power_pellet_value - config.power_pellet_decay * dist;
        eligible = true;
    } else if empowered {
        if actors.ghosts.contains(&at) {
            score = config.ghost_value - dist;
            eligible = true;
        }
        if !actors.opponent_empowered() && at == actors.opponent {
            score = config.opponent_value - dist;
            eligible = true;
        }
    }

    if tile == Some(Tile::Pellet) {
        score = config.pellet_value - config.pellet_decay * dist;
        eligible = true;
    }

    if !empowered {
        score += config.ghost_distance_weight * actors.nearest_ghost_distance(at);
        if actors.opponent_empowered() {
            let gap = config.opponent_danger_radius - at.manhattan(actors.opponent);
            score -= gap * config.opponent_proximity_penalty;
        }
    }

    (score, eligible)
}

/// BFS from our position, picking the highest-scoring eligible cell.
/// Ties keep the cell found first.
pub fn find_target(state: &PacmanState, empowered: bool, config: &PacmanConfig) -> TargetSearch {
    let mut best: Option<Target> = None;

    let tree = breadth_first(
        &state.grid,
        state.actors.position,
        &[],
        |at| state.is_valid(at, empowered),
        |at, dist| {
            let (score, eligible) = score_cell(state, at, dist as i32, empowered, config);
            if eligible && best.map_or(true, |b| score > b.score) {
                best = Some(Target { at, score });
            }
            ControlFlow::Continue(())
        },
    );

    TargetSearch { target: best, tree }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pacman::grid::test_support::*;

    #[test]
    fn test_empowered_opponent_pushes_target_away() {
        let config = Config::default_hardcoded().pacman;
        let rows = ["#########", "#o.....o#", "#########"];
        let ghosts = [Coord::new(0, 0), Coord::new(0, 8)];
        let mut state = state_from(&rows, Coord::new(1, 4), ghosts, Coord::new(0, 7));

        // Equal scores: the pellet dequeued first (rightward) wins the tie
        let calm = find_target(&state, false, &config);
        assert_eq!(
            calm.target,
            Some(Target {
                at: Coord::new(1, 7),
                score: 500 - 9 + 20,
            })
        );

        // (5 - 1) * 100 off the near pellet, (5 - 7) * 100 back on the far one
        state.actors.opponent_status = 5;
        let wary = find_target(&state, false, &config);
        assert_eq!(
            wary.target,
            Some(Target {
                at: Coord::new(1, 1),
                score: 500 - 9 + 20 + 200,
            })
        );
    }

    #[test]
    fn test_single_pellet_is_the_target() {
        let config = Config::default_hardcoded().pacman;
        let state = state_from(
            &[
                "#######",
                "#.....#",
                "#.###.#",
                "#....o#",
                "#######",
            ],
            Coord::new(1, 1),
            [Coord::new(0, 0), Coord::new(0, 6)],
            Coord::new(4, 0),
        );
        let search = find_target(&state, false, &config);
        assert_eq!(search.target_coord(), Some(Coord::new(3, 5)));
    }

    #[test]
    fn test_power_pellet_outranks_nearer_pellet() {
        let config = Config::default_hardcoded().pacman;
        let state = state_from(
            &[
                "#########",
                "#.o....O#",
                "#########",
            ],
            Coord::new(1, 1),
            [Coord::new(0, 0), Coord::new(0, 1)],
            Coord::new(2, 0),
        );
        let search = find_target(&state, false, &config);
        assert_eq!(search.target_coord(), Some(Coord::new(1, 7)));
    }

    #[test]
    fn test_no_reachable_pellet_means_no_target() {
        let config = Config::default_hardcoded().pacman;
        let state = state_from(
            &[
                "#####",
                "#..#o",
                "#####",
            ],
            Coord::new(1, 1),
            [Coord::new(0, 0), Coord::new(0, 1)],
            Coord::new(2, 0),
        );
        let search = find_target(&state, false, &config);
        assert_eq!(search.target, None);
        assert_eq!(
            search.tree.next_step(&state.grid, search.target_coord()),
            Coord::new(1, 1)
        );
    }

    #[test]
    fn test_next_step_walks_parents_back_to_origin() {
        let config = Config::default_hardcoded().pacman;
        let state = state_from(
            &[
                "######",
                "#...o#",
                "######",
            ],
            Coord::new(1, 1),
            [Coord::new(0, 0), Coord::new(0, 1)],
            Coord::new(2, 0),
        );
        let search = find_target(&state, false, &config);
        assert_eq!(search.target_coord(), Some(Coord::new(1, 4)));
        assert_eq!(
            search.tree.next_step(&state.grid, search.target_coord()),
            Coord::new(1, 2)
        );
        assert_eq!(
            search.tree.next_step(&state.grid, Some(Coord::new(1, 1))),
            Coord::new(1, 1)
        );
    }

    #[test]
    fn test_ghosts_block_normal_traversal_but_are_targets_when_empowered() {
        let config = Config::default_hardcoded().pacman;
        let state = state_from(
            &[
                "#######",
                "#.....#",
                "#######",
            ],
            Coord::new(1, 1),
            [Coord::new(1, 3), Coord::new(0, 0)],
            Coord::new(2, 0),
        );

        let normal = find_target(&state, false, &config);
        assert!(!normal.tree.is_visited(&state.grid, Coord::new(1, 4)));
        assert_eq!(normal.target, None);

        let empowered = find_target(&state, true, &config);
        assert_eq!(
            empowered.target,
            Some(Target {
                at: Coord::new(1, 3),
                score: config.ghost_value - 2
            })
        );
        assert_eq!(
            empowered.tree.next_step(&state.grid, empowered.target_coord()),
            Coord::new(1, 2)
        );
    }

    #[test]
    fn test_breadth_first_stops_on_break() {
        let grid = grid_from(&["....."]);
        let mut seen = Vec::new();
        let tree = breadth_first(
            &grid,
            Coord::new(0, 0),
            &[],
            |at| grid.is_open(at),
            |at, dist| {
                seen.push((at, dist));
                if dist == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            },
        );
        assert_eq!(
            seen,
            vec![
                (Coord::new(0, 0), 0),
                (Coord::new(0, 1), 1),
                (Coord::new(0, 2), 2)
            ]
        );
        // The breaking cell is not expanded
        assert!(tree.is_visited(&grid, Coord::new(0, 2)));
        assert!(!tree.is_visited(&grid, Coord::new(0, 3)));
    }
}
