//! Game status derived from a board.
//!
//! Only the conditions visible on a single board are reported. Draws by
//! repetition or the fifty-move rule need history the board does not keep;
//! callers can build them on top of [`Board::halfmove_clock`].

use crate::{Board, PendingPromotion};
use chess_core::Color;

/// State of play for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// The side to move has legal moves and is not in check.
    InProgress,
    /// The given side is in check but has a way out.
    Check(Color),
    /// The side to move is in check with no legal move.
    Checkmate { winner: Color },
    /// The side to move has no legal move and is not in check.
    Stalemate,
    /// A pawn move is waiting for its promotion piece.
    AwaitingPromotion(PendingPromotion),
}

impl GameStatus {
    /// Returns true if no further moves can be played.
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::Checkmate { .. } | GameStatus::Stalemate)
    }
}

impl Board {
    /// Reports check, checkmate, stalemate or a pending promotion.
    pub fn status(&self) -> GameStatus {
        if let Some(pending) = self.pending_promotion() {
            return GameStatus::AwaitingPromotion(pending);
        }

        let us = self.side_to_move();
        let in_check = self.is_in_check(us);
        match (in_check, self.has_legal_move()) {
            (true, true) => GameStatus::Check(us),
            (true, false) => GameStatus::Checkmate {
                winner: us.opposite(),
            },
            (false, true) => GameStatus::InProgress,
            (false, false) => GameStatus::Stalemate,
        }
    }
}
