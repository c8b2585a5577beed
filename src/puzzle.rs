//! Board model for the up-it-up puzzle.
//!
//! Eight pieces sit on a 3x3 grid around one empty cell. Each piece is a cube,
//! and its cell value records which face points up (1..=6). Sliding a piece
//! into the empty cell rolls it, so its value changes by a per-direction rule.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Grid side length.
pub const SIZE: usize = 3;

/// Number of cells in a board.
pub const CELLS: usize = SIZE * SIZE;

/// Value of the empty cell.
pub const EMPTY: u8 = 0;

/// Largest legal cell value.
pub const MAX_VALUE: u8 = 6;

const BASE: u32 = MAX_VALUE as u32 + 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("cell ({row}, {col}) holds {value}, expected a value in 0..=6")]
    ValueOutOfRange { row: usize, col: usize, value: u8 },
    #[error("board has no empty cell")]
    NoEmptyCell,
    #[error("board has {0} empty cells, expected exactly one")]
    EmptyCellCount(usize),
    #[error("encoding {0} is outside 0..{space}", space = Code::SPACE)]
    CodeOutOfRange(u64),
    #[error("move {0} is not legal from this board")]
    IllegalMove(Move),
    #[error("expected 9 cells, found {0}")]
    CellCount(usize),
    #[error("cannot parse cell value {0:?}")]
    BadToken(String),
}

/// One of the four sliding directions, named after where the empty cell goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Expansion order used by the solver.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Offset from the empty cell to the piece that slides into it.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn inverse(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// The single-byte tag stored in the solver's visited table.
    pub fn tag(&self) -> u8 {
        match self {
            Move::Up => b'U',
            Move::Down => b'D',
            Move::Left => b'L',
            Move::Right => b'R',
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'U' => Some(Move::Up),
            b'D' => Some(Move::Down),
            b'L' => Some(Move::Left),
            b'R' => Some(Move::Right),
            _ => None,
        }
    }

    /// New face value of a piece rolled by this move.
    ///
    /// Vertical rolls only touch {1, 2, 5, 6} and horizontal rolls only touch
    /// {1, 2, 3, 4}; anything else keeps its value.
    pub fn remap(&self, value: u8) -> u8 {
        match (self, value) {
            (Move::Up, 1) => 6,
            (Move::Up, 2) => 5,
            (Move::Up, 5) => 1,
            (Move::Up, 6) => 2,
            (Move::Down, 1) => 5,
            (Move::Down, 2) => 6,
            (Move::Down, 5) => 2,
            (Move::Down, 6) => 1,
            (Move::Left, 1) => 4,
            (Move::Left, 2) => 3,
            (Move::Left, 3) => 1,
            (Move::Left, 4) => 2,
            (Move::Right, 1) => 3,
            (Move::Right, 2) => 4,
            (Move::Right, 3) => 2,
            (Move::Right, 4) => 1,
            (_, v) => v,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag() as char)
    }
}

/// Base-7 row-major encoding of a board, in `0..Code::SPACE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code(u32);

impl Code {
    /// Number of distinct encodings, 7^9.
    pub const SPACE: usize = 40_353_607;

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn decode(self) -> Result<Board, PuzzleError> {
        let mut rest = self.0;
        let mut cells = [[EMPTY; SIZE]; SIZE];
        for cell in cells.iter_mut().flatten() {
            // rest % BASE < 7, so the narrowing is lossless
            *cell = (rest % BASE) as u8;
            rest /= BASE;
        }
        Board::from_rows(cells)
    }
}

impl TryFrom<u64> for Code {
    type Error = PuzzleError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value < Self::SPACE as u64 {
            Ok(Code(value as u32))
        } else {
            Err(PuzzleError::CodeOutOfRange(value))
        }
    }
}

/// A win condition the solver searches for.
pub trait Goal {
    fn is_goal(&self, board: &Board) -> bool;
}

impl<F> Goal for F
where
    F: Fn(&Board) -> bool,
{
    fn is_goal(&self, board: &Board) -> bool {
        self(board)
    }
}

/// Every piece shows face 1 (or is the hole) and the center is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct Upright;

impl Goal for Upright {
    fn is_goal(&self, board: &Board) -> bool {
        let center = SIZE / 2;
        board.cells.iter().flatten().all(|&v| v <= 1) && board.cells[center][center] == EMPTY
    }
}

/// A 3x3 configuration. Moves return fresh boards; a board is never mutated
/// once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[u8; SIZE]; SIZE],
}

impl Board {
    /// Builds a board, rejecting out-of-range values and boards without an
    /// empty cell.
    pub fn from_rows(cells: [[u8; SIZE]; SIZE]) -> Result<Self, PuzzleError> {
        for (row, line) in cells.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                if value > MAX_VALUE {
                    return Err(PuzzleError::ValueOutOfRange { row, col, value });
                }
            }
        }
        let board = Self { cells };
        board.locate_empty()?;
        Ok(board)
    }

    /// The fixed starting position: the center is empty and every piece
    /// shows face 2.
    pub fn upitup() -> Self {
        let mut cells = [[2; SIZE]; SIZE];
        cells[SIZE / 2][SIZE / 2] = EMPTY;
        Self { cells }
    }

    /// The solved position for [`Upright`].
    pub fn solved() -> Self {
        let mut cells = [[1; SIZE]; SIZE];
        cells[SIZE / 2][SIZE / 2] = EMPTY;
        Self { cells }
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    pub fn rows(&self) -> &[[u8; SIZE]; SIZE] {
        &self.cells
    }

    pub fn encode(&self) -> Code {
        let code = self
            .cells
            .iter()
            .flatten()
            .rev()
            .fold(0u32, |acc, &v| acc * BASE + v as u32);
        Code(code)
    }

    /// First empty cell in row-major order.
    pub fn locate_empty(&self) -> Result<(usize, usize), PuzzleError> {
        (0..CELLS)
            .map(|i| (i / SIZE, i % SIZE))
            .find(|&(r, c)| self.cells[r][c] == EMPTY)
            .ok_or(PuzzleError::NoEmptyCell)
    }

    pub fn is_goal(&self) -> bool {
        Upright.is_goal(self)
    }

    /// Slides the piece next to the empty cell into it. Returns `None` when
    /// the empty cell sits on the edge the move would cross.
    pub fn try_move(&self, movement: Move) -> Result<Option<Self>, PuzzleError> {
        let (row, col) = self.locate_empty()?;
        Ok(self.slide(row, col, movement))
    }

    fn slide(&self, row: usize, col: usize, movement: Move) -> Option<Self> {
        let (dr, dc) = movement.as_offset();
        let from_row = row.checked_add_signed(dr).filter(|&r| r < SIZE)?;
        let from_col = col.checked_add_signed(dc).filter(|&c| c < SIZE)?;

        let mut next = *self;
        next.cells[row][col] = movement.remap(self.cells[from_row][from_col]);
        next.cells[from_row][from_col] = EMPTY;
        Some(next)
    }

    /// Legal successors in [`Move::ALL`] order.
    pub fn neighbours(&self) -> Result<Vec<(Move, Self)>, PuzzleError> {
        let (row, col) = self.locate_empty()?;
        Ok(Move::ALL
            .iter()
            .filter_map(|&m| self.slide(row, col, m).map(|b| (m, b)))
            .collect())
    }

    /// Replays `moves` from this board.
    pub fn apply_moves(&self, moves: &[Move]) -> Result<Self, PuzzleError> {
        moves.iter().try_fold(*self, |board, &m| {
            board.try_move(m)?.ok_or(PuzzleError::IllegalMove(m))
        })
    }

    /// Makes `count` random legal moves from this board.
    pub fn scramble<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Result<Self, PuzzleError> {
        let mut board = *self;
        for _ in 0..count {
            let options = board.neighbours()?;
            if let Some(&(_, next)) = options.choose(rng) {
                board = next;
            }
        }
        Ok(board)
    }
}

impl FromStr for Board {
    type Err = PuzzleError;

    /// Parses nine values separated by whitespace, commas or slashes, and
    /// requires exactly one empty cell.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(|ch: char| ch.is_whitespace() || ch == ',' || ch == '/')
            .filter(|tok| !tok.is_empty())
            .map(|tok| tok.parse::<u8>().map_err(|_| PuzzleError::BadToken(tok.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        if values.len() != CELLS {
            return Err(PuzzleError::CellCount(values.len()));
        }
        let empties = values.iter().filter(|&&v| v == EMPTY).count();
        if empties != 1 {
            return Err(PuzzleError::EmptyCellCount(empties));
        }

        let mut cells = [[EMPTY; SIZE]; SIZE];
        for (i, v) in values.into_iter().enumerate() {
            cells[i / SIZE][i % SIZE] = v;
        }
        Board::from_rows(cells)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for &val in row {
                write!(f, "{} ", val)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
