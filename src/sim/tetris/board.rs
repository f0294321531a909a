//! Board module - the static occupancy grid
//!
//! 10 columns x 20 rows, row 0 at the top. A cell holds 0 when empty or the
//! locked piece's cell value (1..=7). The dimensions never change: clearing
//! rows refills from the top.

use serde::{Deserialize, Serialize};

use super::piece::Piece;
use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH};

pub type Row = [u8; BOARD_WIDTH];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            rows: [[0; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    pub fn from_rows(rows: [Row; BOARD_HEIGHT]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row; BOARD_HEIGHT] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        BOARD_WIDTH
    }

    pub fn height(&self) -> usize {
        BOARD_HEIGHT
    }

    pub fn in_bounds(x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < BOARD_WIDTH && y >= 0 && (y as usize) < BOARD_HEIGHT
    }

    /// Cell value at (x, y), `None` outside the board
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        Self::in_bounds(x, y).then(|| self.rows[y as usize][x as usize])
    }

    pub fn set(&mut self, x: i32, y: i32, value: u8) -> bool {
        if !Self::in_bounds(x, y) {
            return false;
        }
        self.rows[y as usize][x as usize] = value;
        true
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(v) if v != 0)
    }

    /// In bounds and empty
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Some(0)
    }

    /// True when every block of the piece is on the board and unoccupied
    pub fn fits(&self, piece: &Piece) -> bool {
        piece.cells().all(|(x, y)| self.is_free(x, y))
    }

    /// Lock a piece into the grid. Blocks outside the board are dropped.
    pub fn place(&mut self, piece: &Piece) {
        let value = piece.kind.cell_value();
        for (x, y) in piece.cells() {
            self.set(x, y, value);
        }
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|&cell| cell != 0))
    }

    /// Remove every full row, shifting the rows above down and inserting
    /// empty rows at the top. Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut write = BOARD_HEIGHT;
        let mut cleared = 0;
        for read in (0..BOARD_HEIGHT).rev() {
            if self.is_row_full(read) {
                cleared += 1;
            } else {
                write -= 1;
                if write != read {
                    self.rows[write] = self.rows[read];
                }
            }
        }
        for row in &mut self.rows[..write] {
            *row = [0; BOARD_WIDTH];
        }
        cleared
    }

    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| cell != 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tetris::piece::PieceKind;

    fn fill_row(board: &mut Board, y: i32) {
        for x in 0..BOARD_WIDTH as i32 {
            board.set(x, y, 1);
        }
    }

    #[test]
    fn test_bounds() {
        let board = Board::new();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(10, 0), None);
        assert_eq!(board.get(0, 20), None);
        assert_eq!(board.get(9, 19), Some(0));
        assert!(!board.is_free(0, -1));
    }

    #[test]
    fn test_fits_and_place() {
        let mut board = Board::new();
        let piece = Piece::spawn(PieceKind::O);
        assert!(board.fits(&piece));

        board.place(&piece);
        assert_eq!(board.occupied_count(), 4);
        assert!(!board.fits(&piece));
        assert!(board.fits(&piece.shifted(2, 0)));
        assert!(!board.fits(&piece.shifted(5, 0)));
    }

    #[test]
    fn test_clear_single_row() {
        let mut board = Board::new();
        fill_row(&mut board, 19);
        board.set(3, 18, 5);
        let before = board.occupied_count();

        assert_eq!(board.clear_full_rows(), 1);
        assert_eq!(board.occupied_count(), before - BOARD_WIDTH);
        assert_eq!(board.rows().len(), BOARD_HEIGHT);
        // Row above shifted down
        assert_eq!(board.get(3, 19), Some(5));
        assert!(!board.is_occupied(3, 18));
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let mut board = Board::new();
        fill_row(&mut board, 19);
        board.set(0, 18, 2);
        fill_row(&mut board, 17);
        board.set(9, 16, 3);

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.get(0, 19), Some(2));
        assert_eq!(board.get(9, 18), Some(3));
        assert_eq!(board.occupied_count(), 2);
        assert!(board.rows()[..18].iter().all(|r| r.iter().all(|&c| c == 0)));
    }

    #[test]
    fn test_no_full_rows_is_noop() {
        let mut board = Board::new();
        board.set(4, 19, 1);
        let before = board.clone();
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, before);
    }
}
