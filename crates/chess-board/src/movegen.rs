//! Per-piece move generation.
//!
//! Everything here is a pure query over a [`Board`] or [`Grid`]. Candidate
//! destinations are pseudo-legal: they follow the piece's movement pattern
//! but may leave the mover's own king in check. Filtering those out is the
//! board's job.

use crate::{Board, Grid, SquareSet};
use chess_core::{Color, Move, MoveFlag, Piece, PieceKind, Square};

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];
const KING_STEPS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Geometry of one castling direction, in columns of the king's back rank.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CastlingPath {
    pub flag: MoveFlag,
    /// Column of the rook taking part.
    pub rook_from: u8,
    /// Column the king crosses; the rook ends up here.
    pub king_passes: u8,
    /// Column the king lands on.
    pub king_lands: u8,
    /// Columns that must be empty between king and rook.
    pub between: &'static [u8],
}

pub(crate) const CASTLING_PATHS: [CastlingPath; 2] = [
    CastlingPath {
        flag: MoveFlag::CastleKingside,
        rook_from: 7,
        king_passes: 5,
        king_lands: 6,
        between: &[5, 6],
    },
    CastlingPath {
        flag: MoveFlag::CastleQueenside,
        rook_from: 0,
        king_passes: 3,
        king_lands: 2,
        between: &[1, 2, 3],
    },
];

/// Column the king starts on.
pub(crate) const KING_HOME_COL: u8 = 4;

impl CastlingPath {
    /// Looks up the path for a castling flag.
    pub(crate) fn for_flag(flag: MoveFlag) -> Option<&'static CastlingPath> {
        CASTLING_PATHS.iter().find(|path| path.flag == flag)
    }

    /// Rook source and destination on the given back rank.
    pub(crate) fn rook_squares(&self, row: u8) -> Option<(Square, Square)> {
        Some((
            Square::from_coords(row, self.rook_from)?,
            Square::from_coords(row, self.king_passes)?,
        ))
    }
}

/// Squares from `from` in one direction, up to and including the first
/// occupied square or the board edge.
fn ray(grid: &Grid, from: Square, (d_row, d_col): (i8, i8)) -> impl Iterator<Item = Square> + '_ {
    let mut next = from.offset(d_row, d_col);
    let mut blocked = false;
    std::iter::from_fn(move || {
        if blocked {
            return None;
        }
        let sq = next?;
        blocked = !grid.is_empty(sq);
        next = sq.offset(d_row, d_col);
        Some(sq)
    })
}

fn steps(from: Square, offsets: &[(i8, i8)]) -> impl Iterator<Item = Square> + '_ {
    offsets
        .iter()
        .filter_map(move |&(d_row, d_col)| from.offset(d_row, d_col))
}

/// True if a piece of `color` may end its move on `sq`: empty, or an enemy
/// that is not the king.
fn can_land(grid: &Grid, sq: Square, color: Color) -> bool {
    match grid.piece_at(sq) {
        None => true,
        Some(other) => other.color != color && other.kind != PieceKind::King,
    }
}

/// Ray directions of a sliding piece; empty for pieces that step or jump.
fn slider_directions(kind: PieceKind) -> &'static [(i8, i8)] {
    match kind {
        PieceKind::Bishop => &DIAGONAL,
        PieceKind::Rook => &ORTHOGONAL,
        PieceKind::Queen => &KING_STEPS,
        PieceKind::Pawn | PieceKind::Knight | PieceKind::King => &[],
    }
}

/// Pseudo-legal destinations of the piece on `from`.
///
/// Returns an empty set if `from` is empty. Castling destinations are
/// included only when every castling condition holds, including the
/// attack checks on the king's path.
pub fn candidates(board: &Board, from: Square) -> SquareSet {
    let grid = board.grid();
    let Some(piece) = grid.piece_at(from) else {
        return SquareSet::EMPTY;
    };

    match piece.kind {
        PieceKind::Pawn => pawn_candidates(board, from, piece.color),
        PieceKind::Knight => steps(from, &KNIGHT_JUMPS)
            .filter(|&to| can_land(grid, to, piece.color))
            .collect(),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => slider_directions(piece.kind)
            .iter()
            .flat_map(|&dir| ray(grid, from, dir))
            .filter(|&to| can_land(grid, to, piece.color))
            .collect(),
        PieceKind::King => {
            let mut set: SquareSet = steps(from, &KING_STEPS)
                .filter(|&to| can_land(grid, to, piece.color))
                .collect();
            set |= castling_candidates(board, from, piece);
            set
        }
    }
}

fn pawn_candidates(board: &Board, from: Square, color: Color) -> SquareSet {
    let grid = board.grid();
    let dir = color.pawn_direction();
    let mut set = SquareSet::EMPTY;

    if let Some(one) = from.offset(dir, 0).filter(|&sq| grid.is_empty(sq)) {
        set.insert(one);
        if from.row() == color.pawn_rank() {
            if let Some(two) = from.offset(2 * dir, 0).filter(|&sq| grid.is_empty(sq)) {
                set.insert(two);
            }
        }
    }

    for d_col in [-1, 1] {
        let Some(to) = from.offset(dir, d_col) else {
            continue;
        };
        match grid.piece_at(to) {
            Some(target) if target.color != color && target.kind != PieceKind::King => {
                set.insert(to);
            }
            None if is_en_passant(board, from, to, color) => set.insert(to),
            _ => {}
        }
    }

    set
}

/// True if a pawn of `color` on `from` may capture en passant onto `to`.
fn is_en_passant(board: &Board, from: Square, to: Square, color: Color) -> bool {
    if board.en_passant_file() != Some(to.file()) || from.row() != color.en_passant_rank() {
        return false;
    }
    let victim = Square::from_coords(from.row(), to.col()).and_then(|sq| board.grid().piece_at(sq));
    matches!(victim, Some(p) if p.kind == PieceKind::Pawn && p.color != color)
}

fn castling_candidates(board: &Board, from: Square, king: Piece) -> SquareSet {
    let color = king.color;
    let row = color.back_rank();
    let them = color.opposite();
    let grid = board.grid();
    let mut set = SquareSet::EMPTY;

    if king.has_moved
        || Square::from_coords(row, KING_HOME_COL) != Some(from)
        || board.is_square_attacked(from, them)
    {
        return set;
    }

    for path in &CASTLING_PATHS {
        let rook_ready = Square::from_coords(row, path.rook_from)
            .and_then(|sq| grid.piece_at(sq))
            .is_some_and(|rook| {
                rook.kind == PieceKind::Rook && rook.color == color && !rook.has_moved
            });
        if !rook_ready {
            continue;
        }

        let path_clear = path
            .between
            .iter()
            .filter_map(|&col| Square::from_coords(row, col))
            .all(|sq| grid.is_empty(sq));
        if !path_clear {
            continue;
        }

        let (Some(passes), Some(lands)) = (
            Square::from_coords(row, path.king_passes),
            Square::from_coords(row, path.king_lands),
        ) else {
            continue;
        };
        if !board.is_square_attacked(passes, them) && !board.is_square_attacked(lands, them) {
            set.insert(lands);
        }
    }

    set
}

/// Squares controlled by the piece on `from`.
///
/// Unlike [`candidates`] this counts pawn diagonals whether or not anything
/// stands there, ignores pawn pushes and castling, and includes the first
/// blocker of either color on each ray.
pub fn attacks(grid: &Grid, from: Square) -> SquareSet {
    let Some(piece) = grid.piece_at(from) else {
        return SquareSet::EMPTY;
    };

    match piece.kind {
        PieceKind::Pawn => {
            let dir = piece.color.pawn_direction();
            steps(from, &[(dir, -1), (dir, 1)]).collect()
        }
        PieceKind::Knight => steps(from, &KNIGHT_JUMPS).collect(),
        PieceKind::King => steps(from, &KING_STEPS).collect(),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => slider_directions(piece.kind)
            .iter()
            .flat_map(|&dir| ray(grid, from, dir))
            .collect(),
    }
}

/// Returns true if any piece of `by` controls `target`.
///
/// Looks outward from the target square instead of generating every enemy
/// piece's attacks; the answer is the same as checking `target` against
/// [`attacks`] for each piece of `by`.
pub fn is_attacked(grid: &Grid, target: Square, by: Color) -> bool {
    let holds = |sq: Square, kinds: &[PieceKind]| {
        matches!(grid.piece_at(sq), Some(p) if p.color == by && kinds.contains(&p.kind))
    };

    let back = -by.pawn_direction();
    if steps(target, &[(back, -1), (back, 1)]).any(|sq| holds(sq, &[PieceKind::Pawn])) {
        return true;
    }
    if steps(target, &KNIGHT_JUMPS).any(|sq| holds(sq, &[PieceKind::Knight])) {
        return true;
    }
    if steps(target, &KING_STEPS).any(|sq| holds(sq, &[PieceKind::King])) {
        return true;
    }

    let straight = [PieceKind::Rook, PieceKind::Queen];
    if ORTHOGONAL
        .iter()
        .filter_map(|&dir| ray(grid, target, dir).last())
        .any(|sq| holds(sq, &straight))
    {
        return true;
    }

    let diagonal = [PieceKind::Bishop, PieceKind::Queen];
    DIAGONAL
        .iter()
        .filter_map(|&dir| ray(grid, target, dir).last())
        .any(|sq| holds(sq, &diagonal))
}

/// Builds the move a piece on `from` makes by going to `to`, with the flag
/// of whichever special rule it triggers.
///
/// Promotions are flagged with a queen; callers substitute the chosen kind.
pub fn classify(board: &Board, from: Square, to: Square) -> Move {
    let Some(piece) = board.grid().piece_at(from) else {
        return Move::normal(from, to);
    };

    let flag = match piece.kind {
        PieceKind::Pawn if to.row() == piece.color.promotion_rank() => {
            MoveFlag::Promotion(PieceKind::Queen)
        }
        PieceKind::Pawn if from.row().abs_diff(to.row()) == 2 => MoveFlag::DoublePush,
        PieceKind::Pawn if from.col() != to.col() && board.grid().is_empty(to) => {
            MoveFlag::EnPassant
        }
        PieceKind::King if from.col().abs_diff(to.col()) == 2 => {
            if to.col() > from.col() {
                MoveFlag::CastleKingside
            } else {
                MoveFlag::CastleQueenside
            }
        }
        _ => MoveFlag::Normal,
    };

    Move::new(from, to, flag)
}

/// Moves pieces on `grid` as `mov` prescribes for `piece`, returning the
/// captured piece. No legality checks.
pub(crate) fn displace(grid: &mut Grid, mov: Move, piece: Piece) -> Option<Piece> {
    let (from, to) = (mov.from(), mov.to());
    grid.take(from);
    let mut captured = grid.take(to);

    match mov.flag() {
        MoveFlag::EnPassant => {
            if let Some(victim) = Square::from_coords(from.row(), to.col()) {
                captured = grid.take(victim);
            }
        }
        flag if flag.is_castling() => {
            let rook_squares =
                CastlingPath::for_flag(flag).and_then(|path| path.rook_squares(from.row()));
            if let Some((rook_from, rook_to)) = rook_squares {
                if let Some(rook) = grid.take(rook_from) {
                    grid.put(rook_to, rook.moved());
                }
            }
        }
        _ => {}
    }

    let placed = match mov.flag().promotion_kind() {
        Some(kind) => piece.promoted(kind),
        None => piece.moved(),
    };
    grid.put(to, placed);

    captured
}
