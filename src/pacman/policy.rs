// Per-tick move selection for the Pac-Man agent
//
// 1. BFS target search and backtrace give the default step.
// 2. An unsafe default step is replaced by the fallback scorer.
// 3. While empowered, chase the most profitable ghost; when empowerment is
//    about to run out, head for a power pellet within reach instead.

use log::debug;

use crate::config::PacmanConfig;
use crate::pacman::bfs::find_target;
use crate::pacman::dead_end::analyze_path;
use crate::pacman::grid::{PacmanState, Tile};
use crate::types::{Coord, Step};

/// Which rule produced the final step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    /// Toward the BFS target
    Target,
    /// Default step was unsafe; fallback scorer chose
    Fallback,
    /// Empowered, chasing a ghost
    Chase,
    /// Empowered but running out, heading for a power pellet
    Refill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacmanDecision {
    pub next: Coord,
    pub target: Option<Coord>,
    pub reason: DecisionReason,
}

/// Stateless decision policy; all tuning comes from [`PacmanConfig`]
#[derive(Debug, Clone)]
pub struct PacmanPolicy {
    config: PacmanConfig,
}

impl PacmanPolicy {
    pub fn new(config: PacmanConfig) -> Self {
        PacmanPolicy { config }
    }

    pub fn config(&self) -> &PacmanConfig {
        &self.config
    }

    /// Chooses the cell to occupy next tick
    pub fn decide(&self, state: &PacmanState) -> PacmanDecision {
        let config = &self.config;
        let grid = &state.grid;
        let empowered = state.actors.is_empowered();

        let search = find_target(state, empowered, config);
        let mut target = search.target_coord();
        let mut next = search.tree.next_step(grid, target);
        let mut reason = DecisionReason::Target;

        if !state.is_safe(next, empowered, config) {
            debug!("Step to {:?} is unsafe, falling back", next);
            next = self.safe_move(state, empowered);
            reason = DecisionReason::Fallback;
        }

        if empowered {
            if let Some(ghost) = self.chase_target(state) {
                target = Some(ghost);
                next = search.tree.next_step(grid, target);
                reason = DecisionReason::Chase;
            }

            if state.actors.status < config.refill_threshold {
                if let Some(step) = self.refill_step(state, empowered) {
                    next = step;
                    reason = DecisionReason::Refill;
                }
            }
        }

        PacmanDecision {
            next,
            target,
            reason,
        }
    }

    /// Ghost with the best value per distance; ghosts on our cell are ignored
    fn chase_target(&self, state: &PacmanState) -> Option<Coord> {
        let position = state.actors.position;
        let mut best: Option<(Coord, f64)> = None;

        for ghost in state.actors.ghosts {
            let dist = position.manhattan(ghost);
            if dist <= 0 {
                continue;
            }
            let value = self.config.chase_value / dist as f64;
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((ghost, value));
            }
        }

        best.map(|(ghost, _)| ghost)
    }

    /// One orthogonal step toward the nearest power pellet, if it can be
    /// reached before empowerment runs out and the step is safe. The row
    /// axis is tried before the column axis.
    fn refill_step(&self, state: &PacmanState, empowered: bool) -> Option<Coord> {
        let position = state.actors.position;
        let mut nearest: Option<(Coord, i32)> = None;
        for (at, tile) in state.grid.pellets() {
            if tile != Tile::PowerPellet {
                continue;
            }
            let dist = at.manhattan(position);
            if nearest.map_or(true, |(_, d)| dist < d) {
                nearest = Some((at, dist));
            }
        }

        let (pellet, dist) = nearest?;
        if dist >= state.actors.status * self.config.refill_steps_per_turn {
            return None;
        }

        let row_step = position.offset((pellet.x - position.x).signum(), 0);
        let col_step = position.offset(0, (pellet.y - position.y).signum());
        [row_step, col_step].into_iter().find(|&step| {
            step != position
                && state.grid.is_open(step)
                && state.is_safe(step, empowered, &self.config)
        })
    }

    /// Scores up, right, down, left and staying put; returns the best
    /// admissible cell, or our own cell when nothing qualifies. Ties keep
    /// the earlier option.
    pub fn safe_move(&self, state: &PacmanState, empowered: bool) -> Coord {
        let position = state.actors.position;
        let mut best = position;
        let mut best_score = i32::MIN;

        for step in Step::all() {
            let next = step.apply(&position);
            if !state.is_valid(next, empowered) || !state.is_safe(next, empowered, &self.config) {
                continue;
            }

            let score = self.fallback_score(state, next);
            if score > best_score {
                best_score = score;
                best = next;
            }
        }

        best
    }

    /// Fallback score of standing on `next` after leaving our cell
    pub(crate) fn fallback_score(&self, state: &PacmanState, next: Coord) -> i32 {
        let config = &self.config;
        let actors = &state.actors;

        let target_score = state
            .grid
            .pellets()
            .map(|(at, _)| next.manhattan(at))
            .min()
            .map_or(0, |d| config.fallback_pellet_value - config.fallback_pellet_decay * d);

        let mut safety_score: i32 = actors
            .ghosts
            .iter()
            .map(|g| next.manhattan(*g) * config.fallback_ghost_distance_weight)
            .sum();
        if actors.opponent_empowered() {
            safety_score +=
                next.manhattan(actors.opponent) * config.fallback_opponent_distance_weight;
        }

        let cell_score = match state.grid.tile(next) {
            Some(Tile::Pellet) => config.pellet_cell_bonus,
            Some(Tile::PowerPellet) => config.power_pellet_cell_bonus,
            _ => 0,
        };

        let analysis = analyze_path(state, next, actors.position);
        if analysis.is_dead_end {
            safety_score += if !state.has_pellets_besides(next) {
                config.dead_end_last_pellets_bonus
            } else if analysis.has_power_pellet {
                config.dead_end_power_pellet_bonus
            } else if analysis.pellet_count == 0 {
                -config.dead_end_empty_penalty
            } else {
                -(config.dead_end_pellet_penalty
                    - analysis.pellet_count * config.dead_end_pellet_relief)
            };
        }

        target_score + safety_score + cell_score
    }
}
