//! Reversi move selection
//!
//! - [`board`]: legality, flip-capture, perspective swap
//! - [`eval`]: positional weight table and leaf evaluation
//! - [`search`]: width-capped minimax with alpha-beta pruning

pub mod board;
pub mod eval;
pub mod search;

pub use board::{Board, Disc};
pub use eval::{Evaluator, WeightTable};
pub use search::{choose_move, SearchOutcome, SearchStats};

use crate::config::ReversiConfig;

/// Reversi player for one game session.
///
/// The weight table is derived once from the board size when the session
/// starts; every call to [`ReversiAgent::place`] runs an independent search.
#[derive(Debug, Clone)]
pub struct ReversiAgent {
    config: ReversiConfig,
    table: WeightTable,
}

impl ReversiAgent {
    pub fn new(config: ReversiConfig, size: usize) -> Self {
        ReversiAgent {
            config,
            table: WeightTable::for_size(size),
        }
    }

    pub fn size(&self) -> usize {
        self.table.size()
    }

    /// Chooses a move for `board`, seen from our side
    pub fn place(&self, board: &Board) -> SearchOutcome {
        choose_move(board, &self.table, &self.config)
    }
}
