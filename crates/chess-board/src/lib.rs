//! Chess rules engine for a two-player board.
//!
//! This crate provides:
//! - [`Board`] - piece placement, turn order and move application
//! - [`SquareSet`] - the set type returned by every square query
//! - [`MoveOutcome`] and [`PendingPromotion`] - the two-step promotion flow
//! - [`GameStatus`] - check, checkmate and stalemate detection
//! - [`perft`] - move generator validation
//!
//! # Architecture
//!
//! Each piece kind generates pseudo-legal candidate squares from the grid.
//! The board filters them by simulating every candidate on a copy of the
//! grid and discarding those that leave the mover's king attacked. Only the
//! board mutates piece placement.
//!
//! # Example
//!
//! ```
//! use chess_board::{Board, MoveOutcome};
//! use chess_core::{PieceKind, Square};
//!
//! let mut board = Board::new();
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//!
//! assert!(board.legal_destinations(e2).contains(e4));
//! let outcome = board.attempt_move(e2, e4).unwrap();
//! assert!(matches!(outcome, MoveOutcome::Completed(_)));
//!
//! // A pawn reaching the last rank waits for the caller's choice.
//! let mut board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
//! let a7 = Square::from_algebraic("a7").unwrap();
//! if let MoveOutcome::PromotionPending(pending) = board.attempt_move(a7, Square::A8).unwrap() {
//!     board.complete_promotion(pending, PieceKind::Queen).unwrap();
//! }
//! assert_eq!(board.piece_at(Square::A8).unwrap().kind, PieceKind::Queen);
//! ```

mod board;
mod error;
mod grid;
pub mod movegen;
mod outcome;
pub mod perft;
mod square_set;
mod status;

pub use board::Board;
pub use error::{MoveError, SetupError};
pub use grid::{Cells, Grid};
pub use outcome::{MoveOutcome, MoveRecord, PendingPromotion};
pub use perft::{perft, perft_divide};
pub use square_set::{SquareSet, SquareSetIter};
pub use status::GameStatus;
