// Reversi board operations: legality test, flip-capture, perspective swap
//
// A `Board` is always seen from the side to move. Instead of carrying two
// mirrored boards, the opponent's view is produced with `swapped()`, which
// keeps own/opponent cells complementary by construction.

use crate::types::Coord;

/// The eight compass directions scanned for flanking captures
const DIRECTIONS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

/// State of a single Reversi cell relative to the side to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disc {
    Empty,
    Own,
    Opponent,
}

impl Disc {
    /// The same cell seen from the other side
    pub fn flipped(self) -> Disc {
        match self {
            Disc::Empty => Disc::Empty,
            Disc::Own => Disc::Opponent,
            Disc::Opponent => Disc::Own,
        }
    }
}

/// Square Reversi board, row-major
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Disc>,
}

impl Board {
    /// Creates an empty board of the given side length
    pub fn empty(size: usize) -> Self {
        Board {
            size,
            cells: vec![Disc::Empty; size * size],
        }
    }

    /// Creates the standard opening: four discs in the centre, own on the
    /// top-left/bottom-right diagonal
    pub fn opening(size: usize) -> Self {
        let mut board = Board::empty(size);
        let mid = (size / 2) as i32;
        board.set(Coord::new(mid - 1, mid - 1), Disc::Own);
        board.set(Coord::new(mid, mid), Disc::Own);
        board.set(Coord::new(mid - 1, mid), Disc::Opponent);
        board.set(Coord::new(mid, mid - 1), Disc::Opponent);
        board
    }

    /// Builds a board from row-major cells; `cells.len()` must be `size * size`
    pub fn from_cells(size: usize, cells: Vec<Disc>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Board { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, at: Coord) -> bool {
        at.x >= 0 && at.y >= 0 && (at.x as usize) < self.size && (at.y as usize) < self.size
    }

    fn index(&self, at: Coord) -> usize {
        at.x as usize * self.size + at.y as usize
    }

    /// Returns the disc at `at`, or `None` outside the board
    pub fn get(&self, at: Coord) -> Option<Disc> {
        if self.in_bounds(at) {
            Some(self.cells[self.index(at)])
        } else {
            None
        }
    }

    /// Overwrites a single cell; out-of-bounds writes are ignored
    pub fn set(&mut self, at: Coord, disc: Disc) {
        if self.in_bounds(at) {
            let idx = self.index(at);
            self.cells[idx] = disc;
        }
    }

    /// Iterates over every coordinate in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let size = self.size as i32;
        (0..size).flat_map(move |x| (0..size).map(move |y| Coord::new(x, y)))
    }

    /// The same position from the opponent's point of view
    pub fn swapped(&self) -> Board {
        Board {
            size: self.size,
            cells: self.cells.iter().map(|d| d.flipped()).collect(),
        }
    }

    /// Number of cells holding `disc`
    pub fn count_discs(&self, disc: Disc) -> usize {
        self.cells.iter().filter(|&&d| d == disc).count()
    }

    pub fn empty_cells(&self) -> usize {
        self.count_discs(Disc::Empty)
    }

    /// Length of the opponent run starting next to `at` in direction (dx, dy),
    /// if that run is closed by an own disc
    fn flank_length(&self, at: Coord, (dx, dy): (i32, i32)) -> Option<usize> {
        let mut cursor = at.offset(dx, dy);
        if self.get(cursor) != Some(Disc::Opponent) {
            return None;
        }

        let mut run = 0;
        loop {
            match self.get(cursor) {
                Some(Disc::Opponent) => run += 1,
                Some(Disc::Own) => return Some(run),
                Some(Disc::Empty) | None => return None,
            }
            cursor = cursor.offset(dx, dy);
        }
    }

    /// True iff `at` is an empty in-bounds cell that flanks at least one
    /// opponent run
    pub fn is_valid_move(&self, at: Coord) -> bool {
        if self.get(at) != Some(Disc::Empty) {
            return false;
        }
        DIRECTIONS
            .iter()
            .any(|&dir| self.flank_length(at, dir).is_some())
    }

    /// All legal moves for the side to move, row-major
    pub fn legal_moves(&self) -> Vec<Coord> {
        self.coords().filter(|&c| self.is_valid_move(c)).collect()
    }

    pub fn mobility_count(&self) -> usize {
        self.coords().filter(|&c| self.is_valid_move(c)).count()
    }

    /// Places an own disc at `at` and flips every flanked opponent run.
    /// Legality is not checked. Returns the number of flipped discs.
    pub fn apply_move(&mut self, at: Coord) -> usize {
        if !self.in_bounds(at) {
            return 0;
        }
        self.set(at, Disc::Own);

        let mut flipped = 0;
        for dir in DIRECTIONS {
            if let Some(run) = self.flank_length(at, dir) {
                let mut cursor = at;
                for _ in 0..run {
                    cursor = cursor.offset(dir.0, dir.1);
                    self.set(cursor, Disc::Own);
                }
                flipped += run;
            }
        }
        flipped
    }
}
