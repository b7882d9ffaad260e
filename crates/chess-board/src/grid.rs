//! The 8×8 cell storage behind a board.

use chess_core::{Color, Piece, PieceKind, Square};

/// Cells indexed `[row][col]`, row 0 being rank 1 and col 0 being file A.
pub type Cells = [[Option<Piece>; 8]; 8];

/// Plain piece placement, with no notion of whose move it is.
///
/// A `Grid` is `Copy`, which is what lets the legality filter simulate a move
/// on a scratch copy without touching the real board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid(Cells);

impl Grid {
    /// A grid with no pieces.
    pub const EMPTY: Grid = Grid([[None; 8]; 8]);

    /// Wraps raw cells.
    #[inline]
    pub const fn from_cells(cells: Cells) -> Self {
        Grid(cells)
    }

    /// Borrows the raw cells, rank 1 first.
    #[inline]
    pub const fn cells(&self) -> &Cells {
        &self.0
    }

    /// Returns the piece on `sq`, if any.
    #[inline]
    pub const fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.0[sq.row() as usize][sq.col() as usize]
    }

    /// Removes and returns the piece on `sq`.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.0[sq.row() as usize][sq.col() as usize].take()
    }

    /// Places `piece` on `sq`, replacing any occupant.
    #[inline]
    pub fn put(&mut self, sq: Square, piece: Piece) {
        self.0[sq.row() as usize][sq.col() as usize] = Some(piece);
    }

    /// Returns true if `sq` holds no piece.
    #[inline]
    pub const fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Iterates over occupied squares in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        (0..64u8)
            .filter_map(Square::from_index)
            .filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Counts the pieces on the grid.
    pub fn count(&self) -> usize {
        self.0.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    /// Returns every square holding a king of `color`.
    pub fn kings(&self, color: Color) -> Vec<Square> {
        self.pieces()
            .filter(|(_, p)| p.kind == PieceKind::King && p.color == color)
            .map(|(sq, _)| sq)
            .collect()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::EMPTY
    }
}
