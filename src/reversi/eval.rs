// Reversi position evaluation
//
// The leaf score combines four terms, all from the perspective of the side
// whose board is passed in:
// - positional weight of own discs (WeightTable)
// - mobility differential
// - count of discs that can never be flipped
// - own disc count, only in the endgame

use crate::config::ReversiConfig;
use crate::reversi::board::{Board, Disc};
use crate::types::Coord;

/// Static per-cell positional scores derived from board geometry.
/// Built once per game and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightTable {
    size: usize,
    weights: Vec<i32>,
}

impl WeightTable {
    /// Builds the table for a square board of side `size`
    pub fn for_size(size: usize) -> Self {
        let mut table = WeightTable {
            size,
            weights: vec![2; size * size],
        };
        let n = size as i32;

        // 2x2 blocks at each corner are penalised first, then refined below
        for (x, y) in [(0, 0), (0, n - 2), (n - 2, 0), (n - 2, n - 2)] {
            for i in 0..2 {
                for j in 0..2 {
                    table.set(x + i, y + j, -25);
                }
            }
        }

        for (x, y) in [(0, 0), (0, n - 1), (n - 1, 0), (n - 1, n - 1)] {
            table.set(x, y, 500);
        }
        for (x, y) in [(1, 1), (1, n - 2), (n - 2, 1), (n - 2, n - 2)] {
            table.set(x, y, -45);
        }
        for (x, y) in [(2, 2), (2, n - 3), (n - 3, 2), (n - 3, n - 3)] {
            table.set(x, y, 3);
        }

        for i in 2..n - 2 {
            table.set(0, i, 5);
            table.set(n - 1, i, 5);
            table.set(1, i, 1);
            table.set(n - 2, i, 1);

            table.set(i, 0, 5);
            table.set(i, n - 1, 5);
            table.set(i, 1, 1);
            table.set(i, n - 2, 1);
        }

        for (x, y) in [
            (0, 2),
            (0, n - 3),
            (n - 1, 2),
            (n - 1, n - 3),
            (2, 0),
            (n - 3, 0),
            (2, n - 1),
            (n - 3, n - 1),
        ] {
            table.set(x, y, 10);
        }

        table
    }

    fn set(&mut self, x: i32, y: i32, weight: i32) {
        let n = self.size as i32;
        if x >= 0 && y >= 0 && x < n && y < n {
            self.weights[x as usize * self.size + y as usize] = weight;
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Positional weight of `at`; zero outside the board
    pub fn get(&self, at: Coord) -> i32 {
        let n = self.size as i32;
        if at.x >= 0 && at.y >= 0 && at.x < n && at.y < n {
            self.weights[at.x as usize * self.size + at.y as usize]
        } else {
            0
        }
    }
}

/// Positional score of the own discs plus the own disc count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardWeight {
    pub score: i32,
    pub own_discs: i32,
}

/// Leaf evaluator for one search. Mobility and endgame weights are fixed at
/// the root for the whole search.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    table: &'a WeightTable,
    mobility_weight: i32,
    stable_weight: i32,
    endgame_weight: i32,
    win_score: i32,
    loss_score: i32,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator tuned for the given root position
    pub fn new(table: &'a WeightTable, config: &ReversiConfig, root: &Board) -> Self {
        let endgame_weight = if root.empty_cells() <= root.size() {
            config.endgame_weight
        } else {
            0
        };

        Evaluator {
            table,
            mobility_weight: config.mobility_weight_for(root.size()),
            stable_weight: config.stable_disc_weight,
            endgame_weight,
            win_score: config.win_score,
            loss_score: config.loss_score,
        }
    }

    pub fn mobility_weight(&self) -> i32 {
        self.mobility_weight
    }

    pub fn endgame_weight(&self) -> i32 {
        self.endgame_weight
    }

    /// Sum of positional weights over own discs, short-circuiting to the
    /// loss/win score when one side has no discs left
    pub fn board_weight(&self, board: &Board) -> BoardWeight {
        let mut score = 0;
        let mut own = 0;
        let mut opponent = 0;

        for at in board.coords() {
            match board.get(at) {
                Some(Disc::Own) => {
                    score += self.table.get(at);
                    own += 1;
                }
                Some(Disc::Opponent) => opponent += 1,
                _ => {}
            }
        }

        let score = if own == 0 {
            self.loss_score
        } else if opponent == 0 {
            self.win_score
        } else {
            score
        };

        BoardWeight {
            score,
            own_discs: own,
        }
    }

    /// Composite leaf score
    pub fn evaluate(&self, board: &Board) -> i32 {
        let weight = self.board_weight(board);
        weight.score
            + self.mobility_weight * mobility(board)
            + self.stable_weight * stable_discs(board) as i32
            + self.endgame_weight * weight.own_discs
    }
}

/// Own legal-move count minus opponent legal-move count
pub fn mobility(board: &Board) -> i32 {
    board.mobility_count() as i32 - board.swapped().mobility_count() as i32
}

/// Counts own discs that can never be flipped.
///
/// A disc is stable if it is a corner, lies on an own run along an edge
/// starting from an own corner, or sits in the interior with its row, column
/// and both diagonals completely filled. Each disc is counted once: a corner
/// closing two own edges, or an edge disc reached by the walks from both of
/// its corners, adds one to the total rather than one per walk.
pub fn stable_discs(board: &Board) -> usize {
    let n = board.size();
    if n == 0 {
        return 0;
    }
    let last = n as i32 - 1;
    let mut stable = vec![false; n * n];
    let mark = |stable: &mut Vec<bool>, at: Coord| {
        stable[at.x as usize * n + at.y as usize] = true;
    };

    // Each corner walks along its two edges
    let corners = [
        (Coord::new(0, 0), [(0, 1), (1, 0)]),
        (Coord::new(0, last), [(0, -1), (1, 0)]),
        (Coord::new(last, 0), [(0, 1), (-1, 0)]),
        (Coord::new(last, last), [(0, -1), (-1, 0)]),
    ];
    for (corner, edges) in corners {
        if board.get(corner) != Some(Disc::Own) {
            continue;
        }
        mark(&mut stable, corner);
        for (dx, dy) in edges {
            let mut cursor = corner.offset(dx, dy);
            while board.get(cursor) == Some(Disc::Own) {
                mark(&mut stable, cursor);
                cursor = cursor.offset(dx, dy);
            }
        }
    }

    // Full-line tables; diagonals indexed by y - x + n - 1, anti-diagonals by x + y
    let mut row_full = vec![true; n];
    let mut col_full = vec![true; n];
    let mut diag_full = vec![true; 2 * n - 1];
    let mut anti_full = vec![true; 2 * n - 1];
    for at in board.coords() {
        if board.get(at) == Some(Disc::Empty) {
            let (x, y) = (at.x as usize, at.y as usize);
            row_full[x] = false;
            col_full[y] = false;
            diag_full[y + n - 1 - x] = false;
            anti_full[x + y] = false;
        }
    }

    for x in 1..n.saturating_sub(1) {
        for y in 1..n - 1 {
            let at = Coord::new(x as i32, y as i32);
            if board.get(at) == Some(Disc::Own)
                && row_full[x]
                && col_full[y]
                && diag_full[y + n - 1 - x]
                && anti_full[x + y]
            {
                mark(&mut stable, at);
            }
        }
    }

    stable.iter().filter(|&&s| s).count()
}
