//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{Color, File, Piece, Square};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// Castling availability as written in the third FEN field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    const fn kingside_bit(color: Color) -> u8 {
        match color {
            Color::White => 0b0001,
            Color::Black => 0b0100,
        }
    }

    const fn queenside_bit(color: Color) -> u8 {
        match color {
            Color::White => 0b0010,
            Color::Black => 0b1000,
        }
    }

    /// Returns true if `color` may still castle toward the h-file.
    #[inline]
    pub const fn kingside(self, color: Color) -> bool {
        self.0 & Self::kingside_bit(color) != 0
    }

    /// Returns true if `color` may still castle toward the a-file.
    #[inline]
    pub const fn queenside(self, color: Color) -> bool {
        self.0 & Self::queenside_bit(color) != 0
    }

    /// Grants kingside castling to `color`.
    #[inline]
    pub fn set_kingside(&mut self, color: Color) {
        self.0 |= Self::kingside_bit(color);
    }

    /// Grants queenside castling to `color`.
    #[inline]
    pub fn set_queenside(&mut self, color: Color) {
        self.0 |= Self::queenside_bit(color);
    }

    /// Returns true if neither side may castle.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (granted, c) in [
            (self.kingside(Color::White), 'K'),
            (self.queenside(Color::White), 'Q'),
            (self.kingside(Color::Black), 'k'),
            (self.queenside(Color::Black), 'q'),
        ] {
            if granted {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// A validated FEN record.
///
/// The placement is stored as a grid indexed `[row][col]` with row 0 being
/// rank 1. Every parsed piece is unmoved; deriving `has_moved` from the
/// castling rights and pawn ranks is the board's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    pub placement: [[Option<Piece>; 8]; 8],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = Self::parse_castling(parts[2])?;
        let en_passant = Self::parse_en_passant(parts[3], side_to_move)?;

        let halfmove_clock = parts[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;
        let fullmove_number = parts[5]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        Ok(FenParser {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(placement: &str) -> Result<[[Option<Piece>; 8]; 8], FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut grid = [[None; 8]; 8];
        // FEN lists rank 8 first.
        for (i, rank) in ranks.iter().enumerate() {
            let row = 7 - i;
            let mut col = 0usize;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    col += skip as usize;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    if col < 8 {
                        grid[row][col] = Some(piece);
                    }
                    col += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        row + 1
                    )));
                }
            }
            if col != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    row + 1,
                    col
                )));
            }
        }

        Ok(grid)
    }

    fn parse_castling(castling: &str) -> Result<CastlingRights, FenError> {
        let mut rights = CastlingRights::NONE;
        if castling == "-" {
            return Ok(rights);
        }
        for c in castling.chars() {
            match c {
                'K' => rights.set_kingside(Color::White),
                'Q' => rights.set_queenside(Color::White),
                'k' => rights.set_kingside(Color::Black),
                'q' => rights.set_queenside(Color::Black),
                _ => {
                    return Err(FenError::InvalidCastlingRights(format!(
                        "invalid character '{}'",
                        c
                    )))
                }
            }
        }
        Ok(rights)
    }

    /// The target must sit behind a pawn the opponent of `side_to_move`
    /// could just have pushed two squares: rank 6 with White to move, rank 3
    /// with Black to move.
    fn parse_en_passant(ep: &str, side_to_move: Color) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }
        let pusher = side_to_move.opposite();
        let target_row = (pusher.pawn_rank() as i8 + pusher.pawn_direction()) as u8;
        match Square::from_algebraic(ep) {
            Some(sq) if sq.row() == target_row => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }

    /// Column of the en-passant target, if any.
    pub fn en_passant_file(&self) -> Option<File> {
        self.en_passant.map(Square::file)
    }
}

impl fmt::Display for FenParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8).rev() {
            let mut empty = 0;
            for cell in &self.placement[row] {
                match cell {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{}", empty)?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.to_fen_char())?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{}", empty)?;
            }
            if row > 0 {
                write!(f, "/")?;
            }
        }

        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let ep = self
            .en_passant
            .map(Square::to_algebraic)
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            " {} {} {} {} {}",
            side, self.castling, ep, self.halfmove_clock, self.fullmove_number
        )
    }
}

impl Default for FenParser {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    #[test]
    fn parse_startpos() {
        let fen = FenParser::parse(FenParser::STARTPOS).unwrap();
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.castling, CastlingRights::ALL);
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(
            fen.placement[0][4],
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            fen.placement[6][0],
            Some(Piece::new(PieceKind::Pawn, Color::Black))
        );
        assert_eq!(fen.placement[3][3], None);
    }

    #[test]
    fn roundtrip() {
        let original = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let parsed = FenParser::parse(original).unwrap();
        assert_eq!(parsed.to_string(), original);
        assert_eq!(parsed.en_passant_file(), Some(File::E));
    }

    #[test]
    fn partial_castling_roundtrip() {
        let fen = FenParser::parse("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 3 20").unwrap();
        assert!(fen.castling.kingside(Color::White));
        assert!(!fen.castling.queenside(Color::White));
        assert!(!fen.castling.kingside(Color::Black));
        assert!(fen.castling.queenside(Color::Black));
        assert_eq!(fen.to_string(), "r3k2r/8/8/8/8/8/8/R3K2R w Kq - 3 20");
    }

    #[test]
    fn invalid_part_count_and_color() {
        assert!(matches!(
            FenParser::parse("invalid"),
            Err(FenError::InvalidPartCount(1))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::InvalidActiveColor(_))
        ));
    }

    #[test]
    fn invalid_piece_placement() {
        // Too few ranks
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8 w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        // Unknown piece letter
        assert!(matches!(
            FenParser::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        // Nine squares in one rank
        assert!(matches!(
            FenParser::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        // Zero is not a valid skip count
        assert!(matches!(
            FenParser::parse("08/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn invalid_castling_and_en_passant() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - abc 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        // Only ranks 3 and 6 can hold an en passant target
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
    }

    #[test]
    fn en_passant_rank_follows_side_to_move() {
        // White to move: Black just pushed, so the target is on rank 6.
        assert!(FenParser::parse("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 1").is_ok());
        assert!(matches!(
            FenParser::parse("4k3/8/8/3Pp3/8/8/8/4K3 w - e3 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));

        // Black to move: White just pushed, so the target is on rank 3.
        assert!(FenParser::parse("4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1").is_ok());
        assert!(matches!(
            FenParser::parse("4k3/8/8/8/3pP3/8/8/4K3 b - e6 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
    }

    #[test]
    fn invalid_counters() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - 0 xyz"),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
    }

    #[test]
    fn default_is_startpos() {
        assert_eq!(FenParser::default().to_string(), FenParser::STARTPOS);
    }

    #[test]
    fn fen_error_display() {
        let err = FenError::InvalidPartCount(3);
        assert!(format!("{}", err).contains('3'));

        let err = FenError::InvalidEnPassantSquare("z9".to_string());
        assert!(format!("{}", err).contains("z9"));
    }
}
