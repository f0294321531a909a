//! Tetromino shapes
//!
//! Each piece lives in a square bounding box of side 2 (O), 3 (T S Z J L)
//! or 4 (I). Rotation is a transpose-and-reverse of that box with no
//! offset fallback.

use serde::{Deserialize, Serialize};

use crate::consts::BOARD_WIDTH;

/// Largest bounding box side
pub const SHAPE_MAX: usize = 4;

/// The seven canonical tetrominoes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Board cell value for a locked block of this kind (never 0)
    pub fn cell_value(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    pub fn from_index(index: usize) -> Option<PieceKind> {
        Self::ALL.get(index).copied()
    }

    /// Spawn orientation
    pub fn shape(&self) -> Shape {
        match self {
            PieceKind::I => Shape::from_rows(&[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]]),
            PieceKind::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
            PieceKind::T => Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]]),
            PieceKind::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]]),
            PieceKind::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]]),
            PieceKind::J => Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]]),
            PieceKind::L => Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]]),
        }
    }

    /// All four orientations reachable by rotation
    pub fn orientations(&self) -> [Shape; 4] {
        let r0 = self.shape();
        let r1 = r0.rotated();
        let r2 = r1.rotated();
        let r3 = r2.rotated();
        [r0, r1, r2, r3]
    }
}

/// A square occupancy matrix of side `size` (<= 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub size: u8,
    pub cells: [[bool; SHAPE_MAX]; SHAPE_MAX],
}

impl Shape {
    fn from_rows(rows: &[&[u8]]) -> Self {
        let mut cells = [[false; SHAPE_MAX]; SHAPE_MAX];
        for (y, row) in rows.iter().enumerate() {
            for (x, v) in row.iter().enumerate() {
                cells[y][x] = *v != 0;
            }
        }
        Self {
            size: rows.len() as u8,
            cells,
        }
    }

    /// Clockwise quarter turn: `new[r][c] = old[n - 1 - c][r]`
    pub fn rotated(&self) -> Shape {
        let n = self.size as usize;
        let mut cells = [[false; SHAPE_MAX]; SHAPE_MAX];
        for (r, row) in cells.iter_mut().enumerate().take(n) {
            for (c, cell) in row.iter_mut().enumerate().take(n) {
                *cell = self.cells[n - 1 - c][r];
            }
        }
        Self {
            size: self.size,
            cells,
        }
    }

    /// Offsets (dx, dy) of filled cells inside the bounding box
    pub fn blocks(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let n = self.size as usize;
        (0..n).flat_map(move |y| {
            (0..n).filter_map(move |x| self.cells[y][x].then_some((x as i32, y as i32)))
        })
    }

    /// Filled rows and columns (height, width) of the occupied extent
    pub fn extent(&self) -> (i32, i32) {
        let (mut max_x, mut max_y, mut min_x, mut min_y) = (-1, -1, i32::MAX, i32::MAX);
        for (x, y) in self.blocks() {
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
        }
        if max_x < 0 {
            return (0, 0);
        }
        (max_y - min_y + 1, max_x - min_x + 1)
    }
}

/// The falling piece: a shape at a board position (top-left of its box)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Spawn column shared by every piece
    pub const SPAWN_X: i32 = (BOARD_WIDTH / 2) as i32 - 1;

    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            x: Self::SPAWN_X,
            y: 0,
        }
    }

    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated(),
            ..*self
        }
    }

    /// Absolute board cells covered by this piece
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.blocks().map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_piece_has_four_blocks() {
        for kind in PieceKind::ALL {
            for shape in kind.orientations() {
                assert_eq!(shape.blocks().count(), 4, "{:?}", kind);
            }
        }
    }

    #[test]
    fn test_four_rotations_return_home() {
        for kind in PieceKind::ALL {
            let [_, _, _, r3] = kind.orientations();
            assert_eq!(r3.rotated(), kind.shape());
        }
    }

    #[test]
    fn test_t_rotates_clockwise() {
        // .#.      .#.
        // ###  ->  .##
        // ...      .#.
        let rotated = PieceKind::T.shape().rotated();
        let blocks: Vec<_> = rotated.blocks().collect();
        assert_eq!(blocks, vec![(1, 0), (1, 1), (2, 1), (1, 2)]);
    }

    #[test]
    fn test_i_extent_swaps_on_rotation() {
        let i = PieceKind::I.shape();
        assert_eq!(i.extent(), (1, 4));
        assert_eq!(i.rotated().extent(), (4, 1));
        assert_eq!(PieceKind::O.shape().extent(), (2, 2));
    }

    #[test]
    fn test_spawn_position() {
        let piece = Piece::spawn(PieceKind::O);
        assert_eq!((piece.x, piece.y), (4, 0));
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(4, 0), (5, 0), (4, 1), (5, 1)]);
    }

    #[test]
    fn test_cell_values_are_distinct_and_nonzero() {
        let mut values: Vec<u8> = PieceKind::ALL.iter().map(|k| k.cell_value()).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), 7);
        assert!(values.iter().all(|v| (1..=7).contains(v)));
    }
}
