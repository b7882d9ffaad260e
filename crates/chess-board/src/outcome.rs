//! Values describing applied and deferred moves.

use chess_core::{Move, Piece, Square};
use std::fmt;

/// A pawn move to the last rank that has been validated but is waiting for
/// the caller to choose the replacement piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingPromotion {
    pub from: Square,
    pub to: Square,
}

impl fmt::Display for PendingPromotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// A move that has been fully applied to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    /// The move, flagged with the special rule it triggered.
    pub mov: Move,
    /// The moving piece as it stood before the move.
    pub piece: Piece,
    /// The piece removed from play, if any.
    pub captured: Option<Piece>,
}

impl MoveRecord {
    /// Returns true if the move removed an enemy piece.
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// What happened after a successful `attempt_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was applied and the turn passed to the other side.
    Completed(MoveRecord),
    /// The move promotes a pawn; nothing changes until the promotion is
    /// completed or cancelled.
    PromotionPending(PendingPromotion),
}

impl MoveOutcome {
    /// Returns the record of a completed move.
    pub fn record(self) -> Option<MoveRecord> {
        match self {
            MoveOutcome::Completed(record) => Some(record),
            MoveOutcome::PromotionPending(_) => None,
        }
    }
}
