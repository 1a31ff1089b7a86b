// Depth-limited minimax with single-bound alpha-beta pruning
//
// Steps are 1-indexed: odd steps are our turn (maximising), even steps the
// opponent's (minimising). Every child receives its own board copy, flipped
// to the perspective of the side to move, so sibling branches never share
// state. Only the top-K moves by positional weight are expanded per node.

use log::debug;

use crate::config::ReversiConfig;
use crate::reversi::board::Board;
use crate::reversi::eval::{Evaluator, WeightTable};
use crate::types::Coord;

/// Upper pruning bound; never produced by a real evaluation
pub const SCORE_CEILING: i32 = 50_000_000;
/// Lower pruning bound; never produced by a real evaluation
pub const SCORE_FLOOR: i32 = -50_000_000;

/// Counters collected during one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub leaves: u64,
    pub cutoffs: u64,
    pub passes: u64,
}

/// Result of a root search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// `None` means we have no legal move and must pass
    pub best_move: Option<Coord>,
    pub score: i32,
    pub stats: SearchStats,
}

/// Fixed-capacity list of moves kept in descending weight order.
/// Equal weights keep encounter order.
#[derive(Debug, Clone)]
pub struct CandidateList {
    slots: Vec<(Coord, i32)>,
    capacity: usize,
}

impl CandidateList {
    pub fn new(capacity: usize) -> Self {
        CandidateList {
            slots: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Inserts `at` if it ranks among the best `capacity` seen so far
    pub fn offer(&mut self, at: Coord, weight: i32) {
        let pos = self
            .slots
            .iter()
            .position(|&(_, w)| weight > w)
            .unwrap_or(self.slots.len());
        if pos < self.capacity {
            self.slots.insert(pos, (at, weight));
            self.slots.truncate(self.capacity);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn moves(&self) -> impl Iterator<Item = Coord> + '_ {
        self.slots.iter().map(|&(at, _)| at)
    }
}

/// Collects the best `width` legal moves for the side to move
pub fn candidates(board: &Board, table: &WeightTable, width: usize) -> CandidateList {
    let mut list = CandidateList::new(width);
    for at in board.coords() {
        if board.is_valid_move(at) {
            list.offer(at, table.get(at));
        }
    }
    list
}

/// One minimax search rooted at our turn
pub struct Searcher<'a> {
    table: &'a WeightTable,
    evaluator: Evaluator<'a>,
    depth: u32,
    width: usize,
    stats: SearchStats,
    best_move: Option<Coord>,
}

impl<'a> Searcher<'a> {
    pub fn new(table: &'a WeightTable, config: &ReversiConfig, root: &Board) -> Self {
        Searcher {
            table,
            evaluator: Evaluator::new(table, config, root),
            depth: config.search_depth,
            width: config.search_width,
            stats: SearchStats::default(),
            best_move: None,
        }
    }

    /// Searches `root` and returns the chosen move
    pub fn run(mut self, root: &Board) -> SearchOutcome {
        let score = self.search(1, root, SCORE_CEILING);

        // The first expanded root child always improves on the floor; keep
        // the strongest candidate anyway if nothing was recorded
        let best_move = self
            .best_move
            .or_else(|| candidates(root, self.table, self.width).moves().next());

        debug!(
            "Reversi search: move={:?} score={} nodes={} leaves={} cutoffs={} passes={}",
            best_move,
            score,
            self.stats.nodes,
            self.stats.leaves,
            self.stats.cutoffs,
            self.stats.passes
        );

        SearchOutcome {
            best_move,
            score,
            stats: self.stats,
        }
    }

    /// Leaf score from our perspective regardless of whose turn `step` is
    fn leaf_score(&mut self, board: &Board, step: u32) -> i32 {
        self.stats.leaves += 1;
        if step % 2 == 1 {
            self.evaluator.evaluate(board)
        } else {
            self.evaluator.evaluate(&board.swapped())
        }
    }

    fn search(&mut self, step: u32, board: &Board, bound: i32) -> i32 {
        self.stats.nodes += 1;

        if step > self.depth {
            return self.leaf_score(board, step);
        }

        let maximizing = step % 2 == 1;
        let moves = candidates(board, self.table, self.width);

        if moves.is_empty() {
            if step == 1 {
                self.best_move = None;
                return 0;
            }

            self.stats.passes += 1;
            let passed = board.swapped();
            if passed.mobility_count() == 0 {
                // Neither side can move: the game is over
                return self.leaf_score(board, step);
            }
            let reset = if maximizing { SCORE_FLOOR } else { SCORE_CEILING };
            return self.search(step + 1, &passed, reset);
        }

        let mut best = if maximizing { SCORE_FLOOR } else { SCORE_CEILING };
        for at in moves.moves() {
            let mut next = board.clone();
            next.apply_move(at);
            let value = self.search(step + 1, &next.swapped(), best);

            if maximizing {
                if value > bound {
                    self.stats.cutoffs += 1;
                    return SCORE_CEILING;
                }
                if value > best {
                    best = value;
                    if step == 1 {
                        self.best_move = Some(at);
                    }
                }
            } else {
                if value < bound {
                    self.stats.cutoffs += 1;
                    return SCORE_FLOOR;
                }
                if value < best {
                    best = value;
                }
            }
        }

        best
    }
}

/// Picks our move for `board`; `None` means pass
pub fn choose_move(board: &Board, table: &WeightTable, config: &ReversiConfig) -> SearchOutcome {
    Searcher::new(table, config, board).run(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::reversi::board::Disc;

    fn board_from(rows: &[&str]) -> Board {
        let cells = rows
            .iter()
            .flat_map(|r| r.chars())
            .map(|c| match c {
                'O' => Disc::Own,
                'o' => Disc::Opponent,
                _ => Disc::Empty,
            })
            .collect();
        Board::from_cells(rows.len(), cells)
    }

    /// Plain minimax over the same candidate sets, without pruning
    fn reference_minimax(
        eval: &Evaluator,
        table: &WeightTable,
        config: &ReversiConfig,
        step: u32,
        board: &Board,
    ) -> i32 {
        let perspective = |b: &Board| {
            if step % 2 == 1 {
                eval.evaluate(b)
            } else {
                eval.evaluate(&b.swapped())
            }
        };
        if step > config.search_depth {
            return perspective(board);
        }
        let moves = candidates(board, table, config.search_width);
        if moves.is_empty() {
            let passed = board.swapped();
            if passed.mobility_count() == 0 {
                return perspective(board);
            }
            return reference_minimax(eval, table, config, step + 1, &passed);
        }
        let values = moves.moves().map(|at| {
            let mut next = board.clone();
            next.apply_move(at);
            reference_minimax(eval, table, config, step + 1, &next.swapped())
        });
        if step % 2 == 1 {
            values.max().unwrap_or(0)
        } else {
            values.min().unwrap_or(0)
        }
    }

    #[test]
    fn test_candidate_list_keeps_top_k_in_encounter_order() {
        let mut list = CandidateList::new(3);
        list.offer(Coord::new(0, 0), 5);
        list.offer(Coord::new(0, 1), 10);
        list.offer(Coord::new(0, 2), 5);
        list.offer(Coord::new(0, 3), 1);
        list.offer(Coord::new(0, 4), 7);

        let kept: Vec<Coord> = list.moves().collect();
        assert_eq!(
            kept,
            vec![Coord::new(0, 1), Coord::new(0, 4), Coord::new(0, 0)]
        );
    }

    #[test]
    fn test_depth_one_prefers_corner_capture() {
        let mut config = Config::default_hardcoded().reversi;
        config.search_depth = 1;
        let board = board_from(&[
            "........",
            ".o......",
            "..O.....",
            "...Oo...",
            "...oO...",
            "........",
            "........",
            "........",
        ]);
        let table = WeightTable::for_size(8);
        let outcome = choose_move(&board, &table, &config);
        assert_eq!(outcome.best_move, Some(Coord::new(0, 0)));
    }

    #[test]
    fn test_no_legal_move_at_root_is_a_pass() {
        let config = Config::default_hardcoded().reversi;
        let board = board_from(&["O...", "....", "....", "...."]);
        let table = WeightTable::for_size(4);
        let outcome = choose_move(&board, &table, &config);
        assert_eq!(outcome.best_move, None);
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn test_pruned_search_matches_plain_minimax() {
        let mut config = Config::default_hardcoded().reversi;
        config.search_depth = 4;
        let table = WeightTable::for_size(8);
        let mut board = Board::opening(8);
        board.apply_move(Coord::new(2, 4));
        let board = board.swapped();
        let mut board_after_reply = board.clone();
        board_after_reply.apply_move(Coord::new(2, 3));
        let root = board_after_reply.swapped();

        let outcome = choose_move(&root, &table, &config);
        let eval = Evaluator::new(&table, &config, &root);
        let expected = reference_minimax(&eval, &table, &config, 1, &root);

        assert_eq!(outcome.score, expected);
        assert!(outcome.best_move.is_some());
        assert!(outcome.stats.cutoffs > 0);
    }

    #[test]
    fn test_opponent_wipeout_ends_in_double_pass() {
        let config = Config::default_hardcoded().reversi;
        let table = WeightTable::for_size(4);
        let board = board_from(&["Oo..", "....", "....", "...."]);

        let outcome = choose_move(&board, &table, &config);
        assert_eq!(outcome.best_move, Some(Coord::new(0, 2)));
        assert_eq!(outcome.stats.passes, 1);
        // Corner plus its two edge neighbours are stable
        assert_eq!(outcome.score, config.win_score + 3 * config.stable_disc_weight);
    }

    #[test]
    fn test_opponent_pass_continues_search() {
        let config = Config::default_hardcoded().reversi;
        let table = WeightTable::for_size(4);
        // After either capture the opponent is stuck, and we still have the other one
        let root = board_from(&["Oo..", "....", "....", "..oO"]);
        assert_eq!(root.legal_moves(), vec![Coord::new(0, 2), Coord::new(3, 1)]);

        let outcome = choose_move(&root, &table, &config);
        let eval = Evaluator::new(&table, &config, &root);
        let expected = reference_minimax(&eval, &table, &config, 1, &root);

        assert_eq!(outcome.score, expected);
        assert_eq!(outcome.score, config.win_score + 6 * config.stable_disc_weight);
        assert_eq!(outcome.best_move, Some(Coord::new(0, 2)));
        assert!(outcome.stats.passes >= 2, "passes: {}", outcome.stats.passes);
    }

    #[test]
    fn test_default_search_returns_legal_move() {
        let config = Config::default_hardcoded().reversi;
        let table = WeightTable::for_size(8);
        let board = Board::opening(8);
        let outcome = choose_move(&board, &table, &config);
        let chosen = outcome.best_move.expect("opening always has a move");
        assert!(board.is_valid_move(chosen));
        assert!(outcome.score > SCORE_FLOOR && outcome.score < SCORE_CEILING);
    }

    #[test]
    fn test_search_does_not_mutate_root() {
        let config = Config::default_hardcoded().reversi;
        let table = WeightTable::for_size(8);
        let board = Board::opening(8);
        let before = board.clone();
        let _ = choose_move(&board, &table, &config);
        assert_eq!(board, before);
    }
}
