//! Othello rule engine shared by the arbiter and the reference player.
//!
//! The rules deviate from classic Othello in two ways, and both programs must
//! agree on them exactly:
//!
//! - A move is legal if it captures. When no empty cell bordering the pieces
//!   captures anything, *every* empty cell bordering an occupied cell is legal.
//!   There is therefore no pass.
//! - The game ends after [`MAX_MOVES`] applied moves, whatever the board looks
//!   like at that point. Empty cells are not awarded to anyone.
//!
//! The side to move is derived from the number of moves played: white moves
//! on even counts, black on odd counts.

use std::fmt::{self, Display, Formatter, Write};
use std::str::FromStr;

use anyhow::bail;
use thiserror::Error;

use crate::game_interface::{Game, GameFactory};

/// Edge length of the board.
pub const SIZE: usize = 8;

/// Number of applied moves after which a game is over.
pub const MAX_MOVES: u32 = 60;

const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// One of the two players. White moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// The opponent of this side.
    pub fn other(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// 0 for the first mover, 1 for the second.
    pub fn index(self) -> usize {
        match self {
            Side::White => 0,
            Side::Black => 1,
        }
    }

    /// Inverse of [`Side::index`].
    pub fn from_index(index: usize) -> Side {
        if index % 2 == 0 {
            Side::White
        } else {
            Side::Black
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }
}

/// Content of a single board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    White,
    Black,
}

impl Cell {
    pub fn owner(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::White => Some(Side::White),
            Cell::Black => Some(Side::Black),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Cell::White,
            Side::Black => Cell::Black,
        }
    }
}

/// A board coordinate. Rows and columns are both in `0..8`.
///
/// Textual form is two ASCII characters: the row as `'A'..='H'` followed by
/// the column as `'1'..='8'`, so row 0 / column 0 is `A1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    row: u8,
    col: u8,
}

impl Move {
    /// Returns `None` if the coordinates are off the board.
    pub fn new(row: usize, col: usize) -> Option<Move> {
        if row < SIZE && col < SIZE {
            Some(Move {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    pub fn row(self) -> usize {
        self.row as usize
    }

    pub fn col(self) -> usize {
        self.col as usize
    }

    /// The cell `distance` steps away in direction `(dr, dc)`, if still on the board.
    fn step(self, (dr, dc): (isize, isize), distance: isize) -> Option<Move> {
        let row = self.row as isize + dr * distance;
        let col = self.col as isize + dc * distance;
        if row < 0 || col < 0 {
            return None;
        }
        Move::new(row as usize, col as usize)
    }

    /// Every cell of the board, row by row.
    pub fn all() -> impl Iterator<Item = Move> {
        (0..SIZE).flat_map(|row| (0..SIZE).filter_map(move |col| Move::new(row, col)))
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char((b'A' + self.row) as char)?;
        f.write_char((b'1' + self.col) as char)
    }
}

/// Why a move token was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("a move is exactly 2 characters, got {0} bytes")]
    Length(usize),
    #[error("row {0:?} is not in 'A'..='H'")]
    Row(char),
    #[error("column {0:?} is not in '1'..='8'")]
    Column(char),
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let &[row, col] = s.as_bytes() else {
            return Err(ParseMoveError::Length(s.len()));
        };
        if !(b'A'..b'A' + SIZE as u8).contains(&row) {
            return Err(ParseMoveError::Row(row as char));
        }
        if !(b'1'..b'1' + SIZE as u8).contains(&col) {
            return Err(ParseMoveError::Column(col as char));
        }
        Ok(Move {
            row: row - b'A',
            col: col - b'1',
        })
    }
}

/// Authoritative game state: the grid plus the number of moves played.
///
/// Occupied cells always number `moves_played + 4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; SIZE]; SIZE],
    moves_played: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl Board {
    /// Starting position: two diagonal pairs in the center, white on the
    /// main diagonal.
    pub fn initial() -> Board {
        let mut cells = [[Cell::Empty; SIZE]; SIZE];
        let (lo, hi) = (SIZE / 2 - 1, SIZE / 2);
        cells[lo][lo] = Cell::White;
        cells[lo][hi] = Cell::Black;
        cells[hi][lo] = Cell::Black;
        cells[hi][hi] = Cell::White;
        Board {
            cells,
            moves_played: 0,
        }
    }

    pub fn cell(&self, at: Move) -> Cell {
        self.cells[at.row()][at.col()]
    }

    pub fn moves_played(&self) -> u32 {
        self.moves_played
    }

    pub fn side_to_move(&self) -> Side {
        Side::from_index(self.moves_played as usize)
    }

    /// Number of cells owned by `side`.
    pub fn count(&self, side: Side) -> u32 {
        let cell = Cell::from(side);
        self.cells
            .iter()
            .flatten()
            .filter(|&&c| c == cell)
            .count() as u32
    }

    pub fn is_terminal(&self) -> bool {
        self.moves_played >= MAX_MOVES
    }

    /// White's cells minus black's cells.
    pub fn score(&self) -> i32 {
        self.count(Side::White) as i32 - self.count(Side::Black) as i32
    }

    fn has_occupied_neighbor(&self, at: Move) -> bool {
        DIRECTIONS
            .iter()
            .filter_map(|&dir| at.step(dir, 1))
            .any(|n| !self.cell(n).is_empty())
    }

    /// Length of the run of opponent cells starting next to `at` in `dir`,
    /// if that run is non-empty and immediately closed by one of `side`'s
    /// cells.
    fn capture_length(&self, side: Side, at: Move, dir: (isize, isize)) -> Option<isize> {
        let mut distance = 1;
        loop {
            let owner = self.cell(at.step(dir, distance)?).owner()?;
            if owner == side {
                return (distance > 1).then_some(distance - 1);
            }
            distance += 1;
        }
    }

    /// Whether placing a piece of `side` at `at` would capture anything.
    pub fn has_flips(&self, side: Side, at: Move) -> bool {
        DIRECTIONS
            .iter()
            .any(|&dir| self.capture_length(side, at, dir).is_some())
    }

    /// Empty cells bordering at least one occupied cell.
    pub fn frontier(&self) -> Vec<Move> {
        Move::all()
            .filter(|&mv| self.cell(mv).is_empty() && self.has_occupied_neighbor(mv))
            .collect()
    }

    /// Legal moves for the side to move, row by row.
    ///
    /// Only capturing moves are listed if any exist, otherwise the whole
    /// frontier is.
    pub fn legal_moves(&self) -> Vec<Move> {
        let side = self.side_to_move();
        let frontier = self.frontier();
        let capturing = frontier
            .iter()
            .copied()
            .filter(|&mv| self.has_flips(side, mv))
            .collect::<Vec<_>>();
        if capturing.is_empty() {
            frontier
        } else {
            capturing
        }
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves().contains(&mv)
    }

    /// Places a piece for the side to move and flips every captured run.
    ///
    /// Does not check legality; callers validate with [`Board::is_legal`] first.
    pub fn apply(&mut self, mv: Move) {
        debug_assert!(self.cell(mv).is_empty(), "{mv} is already occupied");
        let side = self.side_to_move();
        for dir in DIRECTIONS {
            let Some(length) = self.capture_length(side, mv, dir) else {
                continue;
            };
            for distance in 1..=length {
                if let Some(flipped) = mv.step(dir, distance) {
                    self.cells[flipped.row()][flipped.col()] = Cell::from(side);
                }
            }
        }
        self.cells[mv.row()][mv.col()] = Cell::from(side);
        self.moves_played += 1;
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("  12345678\n")?;
        for (row, cells) in self.cells.iter().enumerate() {
            f.write_char((b'A' + row as u8) as char)?;
            f.write_char(' ')?;
            for cell in cells {
                f.write_char(match cell {
                    Cell::Empty => '.',
                    Cell::White => 'W',
                    Cell::Black => 'B',
                })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl Game for Board {
    type Action = Move;

    fn legal_actions(&self) -> Vec<Move> {
        self.legal_moves()
    }

    fn apply_action(&mut self, action: &Move) -> anyhow::Result<()> {
        let legal = self.legal_moves();
        if !legal.contains(action) {
            let listed = legal.iter().map(Move::to_string).collect::<Vec<_>>();
            bail!("Valid moves: {}", listed.join(" "));
        }
        self.apply(*action);
        Ok(())
    }

    fn current_player_number(&self) -> usize {
        self.side_to_move().index()
    }

    fn is_finished(&self) -> bool {
        self.is_terminal()
    }

    fn score(&self) -> i32 {
        Board::score(self)
    }
}

/// Builds a fresh [`Board`] for every match.
#[derive(Clone, Copy, Debug, Default)]
pub struct OthelloFactory;

impl GameFactory<Board> for OthelloFactory {
    fn new_game(&self) -> Board {
        Board::initial()
    }
}
