//! The board: piece placement, turn order and move application.

use crate::error::{MoveError, SetupError};
use crate::movegen::{self, CASTLING_PATHS, KING_HOME_COL};
use crate::{Grid, MoveOutcome, MoveRecord, PendingPromotion, SquareSet};
use chess_core::{
    CastlingRights, Color, FenParser, File, Move, MoveFlag, Piece, PieceKind, Square,
};
use tracing::{debug, trace};

/// A chess board owned by one game session.
///
/// The board is the only thing that mutates piece placement. Every mutating
/// operation either applies completely or returns an error and leaves the
/// board untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    side_to_move: Color,
    /// Squares of the two kings, indexed by color.
    kings: [Square; 2],
    /// File of the pawn that double-stepped on the previous move.
    en_passant: Option<File>,
    pending: Option<PendingPromotion>,
    last_move: Option<MoveRecord>,
    /// Pieces removed from play, indexed by the color of the captured piece.
    captured: [Vec<Piece>; 2],
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Board {
    /// Creates a board with the standard starting arrangement.
    pub fn new() -> Self {
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut cells = [[None; 8]; 8];
        for color in Color::ALL {
            for (col, kind) in back_rank.into_iter().enumerate() {
                cells[color.back_rank() as usize][col] = Some(Piece::new(kind, color));
                cells[color.pawn_rank() as usize][col] =
                    Some(Piece::new(PieceKind::Pawn, color));
            }
        }

        Board {
            grid: Grid::from_cells(cells),
            side_to_move: Color::White,
            kings: [Square::E1, Square::E8],
            en_passant: None,
            pending: None,
            last_move: None,
            captured: [Vec::new(), Vec::new()],
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates a board from a FEN string.
    ///
    /// Castling rights become unmoved kings and rooks on their home squares;
    /// pawns off their starting rank are marked as moved.
    pub fn from_fen(fen: &str) -> Result<Self, SetupError> {
        let parsed = FenParser::parse(fen)?;
        let mut grid = Grid::from_cells(parsed.placement);

        for (sq, piece) in grid.pieces().collect::<Vec<_>>() {
            if piece.kind == PieceKind::Pawn && (sq.row() == 0 || sq.row() == 7) {
                return Err(SetupError::PawnOnBackRank(sq));
            }
            let unmoved = match piece.kind {
                PieceKind::Pawn => sq.row() == piece.color.pawn_rank(),
                PieceKind::King => king_keeps_rights(sq, piece.color, parsed.castling),
                PieceKind::Rook => rook_keeps_rights(sq, piece.color, parsed.castling),
                _ => true,
            };
            if !unmoved {
                grid.put(sq, piece.moved());
            }
        }

        let mut kings = [Square::E1, Square::E8];
        for color in Color::ALL {
            match grid.kings(color).as_slice() {
                [sq] => kings[color.index()] = *sq,
                found => {
                    return Err(SetupError::KingCount {
                        color,
                        count: found.len(),
                    })
                }
            }
        }

        let board = Board {
            grid,
            side_to_move: parsed.side_to_move,
            kings,
            en_passant: parsed.en_passant_file(),
            pending: None,
            last_move: None,
            captured: [Vec::new(), Vec::new()],
            halfmove_clock: parsed.halfmove_clock,
            fullmove_number: parsed.fullmove_number,
        };

        let waiting = board.side_to_move.opposite();
        if board.is_in_check(waiting) {
            return Err(SetupError::OpponentInCheck(waiting));
        }

        Ok(board)
    }

    /// Serializes the position as FEN.
    ///
    /// Castling rights are derived from unmoved kings and rooks and the
    /// en passant field from the last double step. A pending promotion is not
    /// represented.
    pub fn to_fen(&self) -> String {
        let mut castling = CastlingRights::NONE;
        for color in Color::ALL {
            let king_sq = self.king_square(color);
            let king_home = self.grid.piece_at(king_sq).is_some_and(|king| !king.has_moved)
                && is_king_home(king_sq, color);
            if !king_home {
                continue;
            }
            for path in &CASTLING_PATHS {
                let rook_home = Square::from_coords(color.back_rank(), path.rook_from)
                    .and_then(|sq| self.grid.piece_at(sq))
                    .is_some_and(|p| p.kind == PieceKind::Rook && p.color == color && !p.has_moved);
                match path.flag {
                    MoveFlag::CastleKingside if rook_home => castling.set_kingside(color),
                    MoveFlag::CastleQueenside if rook_home => castling.set_queenside(color),
                    _ => {}
                }
            }
        }

        // The target square sits behind the pawn that just double-stepped.
        let en_passant = self.en_passant.and_then(|file| {
            let mover = self.side_to_move.opposite();
            Square::from_coords(
                (mover.pawn_rank() as i8 + mover.pawn_direction()) as u8,
                file.index(),
            )
        });

        let mut placement = [[None; 8]; 8];
        for (sq, piece) in self.grid.pieces() {
            placement[sq.row() as usize][sq.col() as usize] =
                Some(Piece::new(piece.kind, piece.color));
        }

        FenParser {
            placement,
            side_to_move: self.side_to_move,
            castling,
            en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_string()
    }

    /// Borrows the piece placement.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the piece on `sq`, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid.piece_at(sq)
    }

    /// The side whose turn it is.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Square of the king of `color`.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    /// File on which an en passant capture is possible this move.
    #[inline]
    pub fn en_passant_file(&self) -> Option<File> {
        self.en_passant
    }

    /// The promotion waiting for a piece choice, if any.
    #[inline]
    pub fn pending_promotion(&self) -> Option<PendingPromotion> {
        self.pending
    }

    /// The most recently completed move.
    #[inline]
    pub fn last_move(&self) -> Option<MoveRecord> {
        self.last_move
    }

    /// Pieces of `color` that have been captured, in capture order.
    #[inline]
    pub fn captured(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    /// Number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.grid.count()
    }

    /// Half-moves since the last capture or pawn move.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Move number, starting at 1 and incremented after Black moves.
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns true if any piece of `by_color` controls `sq`.
    pub fn is_square_attacked(&self, sq: Square, by_color: Color) -> bool {
        movegen::is_attacked(&self.grid, sq, by_color)
    }

    /// Returns true if the king of `color` is attacked.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), color.opposite())
    }

    /// Legal destinations of the piece on `from`.
    ///
    /// Empty if `from` does not hold a piece of the side to move, or while a
    /// promotion is pending.
    pub fn legal_destinations(&self, from: Square) -> SquareSet {
        if self.pending.is_some() {
            return SquareSet::EMPTY;
        }
        match self.grid.piece_at(from) {
            Some(piece) if piece.color == self.side_to_move => movegen::candidates(self, from)
                .into_iter()
                .filter(|&to| self.keeps_king_safe(movegen::classify(self, from, to), piece))
                .collect(),
            _ => SquareSet::EMPTY,
        }
    }

    /// Every legal move of the side to move, with promotions expanded to
    /// each of the four choices.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for (from, piece) in self.grid.pieces() {
            if piece.color != self.side_to_move {
                continue;
            }
            for to in self.legal_destinations(from) {
                let mov = movegen::classify(self, from, to);
                if mov.flag().is_promotion() {
                    moves.extend(PieceKind::PROMOTIONS.map(|kind| mov.with_promotion(kind)));
                } else {
                    moves.push(mov);
                }
            }
        }
        moves
    }

    /// Returns true if the side to move has at least one legal move.
    pub fn has_legal_move(&self) -> bool {
        self.grid
            .pieces()
            .filter(|(_, piece)| piece.color == self.side_to_move)
            .any(|(from, _)| !self.legal_destinations(from).is_empty())
    }

    /// Simulates `mov` on a scratch grid and checks the mover's king.
    fn keeps_king_safe(&self, mov: Move, piece: Piece) -> bool {
        let mut grid = self.grid;
        movegen::displace(&mut grid, mov, piece);
        let king = if piece.kind == PieceKind::King {
            mov.to()
        } else {
            self.king_square(piece.color)
        };
        !movegen::is_attacked(&grid, king, piece.color.opposite())
    }

    /// Checks everything `attempt_move` requires and returns the moving piece.
    fn validate(&self, from: Square, to: Square) -> Result<Piece, MoveError> {
        if let Some(pending) = self.pending {
            return Err(MoveError::PromotionUnresolved(pending));
        }
        let piece = match self.grid.piece_at(from) {
            Some(piece) if piece.color == self.side_to_move => piece,
            _ => return Err(MoveError::InvalidSelection(from)),
        };
        if !self.legal_destinations(from).contains(to) {
            return Err(MoveError::IllegalMove { from, to });
        }
        Ok(piece)
    }

    /// Returns true exactly when `attempt_move(from, to)` would stop at a
    /// pending promotion.
    pub fn is_promotion_pending(&self, from: Square, to: Square) -> bool {
        match self.validate(from, to) {
            Ok(piece) => {
                piece.kind == PieceKind::Pawn && to.row() == piece.color.promotion_rank()
            }
            Err(_) => false,
        }
    }

    /// Moves the piece on `from` to `to`.
    ///
    /// A pawn reaching the last rank does not move yet: the board records a
    /// [`PendingPromotion`], keeps the side to move, and waits for
    /// [`complete_promotion`](Self::complete_promotion).
    pub fn attempt_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
        let piece = self.validate(from, to).map_err(|err| {
            trace!(%from, %to, %err, "move rejected");
            err
        })?;

        let mov = movegen::classify(self, from, to);
        if mov.flag().is_promotion() {
            let pending = PendingPromotion { from, to };
            self.pending = Some(pending);
            debug!(%pending, "promotion awaiting piece choice");
            return Ok(MoveOutcome::PromotionPending(pending));
        }

        Ok(MoveOutcome::Completed(self.apply(mov, piece)))
    }

    /// Finishes a pending promotion with the chosen piece kind.
    pub fn complete_promotion(
        &mut self,
        pending: PendingPromotion,
        kind: PieceKind,
    ) -> Result<MoveRecord, MoveError> {
        if !kind.is_promotion_target() {
            trace!(%kind, "promotion choice rejected");
            return Err(MoveError::InvalidPromotionChoice(kind));
        }
        if self.pending != Some(pending) {
            return Err(MoveError::InconsistentPendingState);
        }
        let pawn = match self.grid.piece_at(pending.from) {
            Some(piece) if piece.kind == PieceKind::Pawn => piece,
            _ => return Err(MoveError::InconsistentPendingState),
        };

        self.pending = None;
        let mov = Move::new(pending.from, pending.to, MoveFlag::Promotion(kind));
        Ok(self.apply(mov, pawn))
    }

    /// Drops the pending promotion without moving anything.
    pub fn cancel_promotion(&mut self) -> Option<PendingPromotion> {
        let cancelled = self.pending.take();
        if let Some(pending) = cancelled {
            debug!(%pending, "promotion cancelled");
        }
        cancelled
    }

    /// Plays a complete move, promotion kind included.
    ///
    /// A promotion move without a kind stops at the pending state, exactly
    /// like [`attempt_move`](Self::attempt_move).
    pub fn play(&mut self, mov: Move) -> Result<MoveOutcome, MoveError> {
        let (from, to) = (mov.from(), mov.to());
        if let Some(kind) = mov.flag().promotion_kind() {
            if !kind.is_promotion_target() {
                return Err(MoveError::InvalidPromotionChoice(kind));
            }
            self.validate(from, to)?;
            if !self.is_promotion_pending(from, to) {
                return Err(MoveError::IllegalMove { from, to });
            }
        }

        match self.attempt_move(from, to)? {
            MoveOutcome::PromotionPending(pending) => match mov.flag().promotion_kind() {
                Some(kind) => self
                    .complete_promotion(pending, kind)
                    .map(MoveOutcome::Completed),
                None => Ok(MoveOutcome::PromotionPending(pending)),
            },
            completed => Ok(completed),
        }
    }

    /// Applies an already validated move and passes the turn.
    pub(crate) fn apply(&mut self, mov: Move, piece: Piece) -> MoveRecord {
        let us = self.side_to_move;
        let captured = movegen::displace(&mut self.grid, mov, piece);

        if let Some(victim) = captured {
            self.captured[victim.color.index()].push(victim);
        }
        if piece.kind == PieceKind::King {
            self.kings[us.index()] = mov.to();
        }

        self.en_passant = (mov.flag() == MoveFlag::DoublePush).then(|| mov.from().file());

        if piece.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = us.opposite();

        let record = MoveRecord {
            mov,
            piece,
            captured,
        };
        self.last_move = Some(record);
        debug!(%mov, piece = %piece, captured = ?captured.map(|p| p.kind), "move applied");
        record
    }
}

fn is_king_home(sq: Square, color: Color) -> bool {
    sq.row() == color.back_rank() && sq.col() == KING_HOME_COL
}

fn king_keeps_rights(sq: Square, color: Color, rights: CastlingRights) -> bool {
    is_king_home(sq, color) && (rights.kingside(color) || rights.queenside(color))
}

fn rook_keeps_rights(sq: Square, color: Color, rights: CastlingRights) -> bool {
    if sq.row() != color.back_rank() {
        return false;
    }
    CASTLING_PATHS
        .iter()
        .filter(|path| path.rook_from == sq.col())
        .any(|path| match path.flag {
            MoveFlag::CastleKingside => rights.kingside(color),
            _ => rights.queenside(color),
        })
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
