//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree to a given depth. The
//! counts for well-known positions are published, so any disagreement points
//! at a move generation bug.

use crate::Board;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in moves {
        let Some(piece) = board.piece_at(m.from()) else {
            continue;
        };
        let mut next = board.clone();
        next.apply(m, piece);
        nodes += perft(&next, depth - 1);
    }
    nodes
}

/// Perft with divide: the node count below each root move, sorted by UCI
/// notation. Handy for narrowing down which move disagrees with a reference.
pub fn perft_divide(board: &Board, depth: u32) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = board
        .legal_moves()
        .into_iter()
        .filter_map(|m| {
            let piece = board.piece_at(m.from())?;
            let mut next = board.clone();
            next.apply(m, piece);
            let nodes = if depth > 1 { perft(&next, depth - 1) } else { 1 };
            Some((m.to_uci(), nodes))
        })
        .collect();

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
