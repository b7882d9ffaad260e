//! Errors reported by the board.
//!
//! None of these are fatal. A rejected operation leaves the board exactly as
//! it was, so callers can treat every variant as "ignore the input".

use crate::PendingPromotion;
use chess_core::{Color, FenError, PieceKind, Square};
use thiserror::Error;

/// Why a move or promotion was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// The source square is empty or holds an opponent's piece.
    #[error("no piece of the side to move on {0}")]
    InvalidSelection(Square),

    /// The destination is not among the legal destinations of the source.
    #[error("illegal move {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    /// A pawn cannot become a king or stay a pawn.
    #[error("a pawn cannot be promoted to a {0}")]
    InvalidPromotionChoice(PieceKind),

    /// `complete_promotion` was called without a matching pending move.
    #[error("no pending promotion matches the given move")]
    InconsistentPendingState,

    /// Another move was attempted before the pending promotion was resolved.
    #[error("promotion {0} is waiting for a piece choice")]
    PromotionUnresolved(PendingPromotion),
}

/// Why a position could not be set up.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("{color} has {count} kings, expected exactly one")]
    KingCount { color: Color, count: usize },

    #[error("pawn on {0} cannot stand on the first or last rank")]
    PawnOnBackRank(Square),

    #[error("{0} is in check although it is not their move")]
    OpponentInCheck(Color),
}
