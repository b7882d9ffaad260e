//! Property tests over positions reached by random play.

use chess_board::{Board, MoveOutcome};
use chess_core::{Color, PieceKind, Square};
use proptest::prelude::*;

/// Plays one legal move per choice, stopping early when the game ends.
fn random_playout(choices: &[usize]) -> Vec<Board> {
    let mut board = Board::new();
    let mut seen = vec![board.clone()];
    for &choice in choices {
        let moves = board.legal_moves();
        if moves.is_empty() {
            break;
        }
        let mov = moves[choice % moves.len()];
        match board.play(mov) {
            Ok(MoveOutcome::Completed(_)) => {}
            other => panic!("legal move {mov} was not completed: {other:?}"),
        }
        seen.push(board.clone());
    }
    seen
}

fn king_count(board: &Board, color: Color) -> usize {
    board
        .grid()
        .pieces()
        .filter(|(_, p)| p.kind == PieceKind::King && p.color == color)
        .count()
}

fn square() -> impl Strategy<Value = Square> {
    (0u8..64).prop_filter_map("square index", Square::from_index)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn one_king_per_color(choices in prop::collection::vec(any::<usize>(), 0..60)) {
        for board in random_playout(&choices) {
            for color in Color::ALL {
                prop_assert_eq!(king_count(&board, color), 1);
                prop_assert_eq!(
                    board.piece_at(board.king_square(color)).map(|p| p.kind),
                    Some(PieceKind::King)
                );
            }
        }
    }

    #[test]
    fn mover_never_left_in_check(choices in prop::collection::vec(any::<usize>(), 0..60)) {
        let boards = random_playout(&choices);
        for pair in boards.windows(2) {
            let mover = pair[0].side_to_move();
            prop_assert!(!pair[1].is_in_check(mover));
        }
    }

    #[test]
    fn side_to_move_alternates(choices in prop::collection::vec(any::<usize>(), 0..60)) {
        let boards = random_playout(&choices);
        for pair in boards.windows(2) {
            prop_assert_eq!(pair[1].side_to_move(), pair[0].side_to_move().opposite());
        }
    }

    #[test]
    fn destinations_are_all_safe(choices in prop::collection::vec(any::<usize>(), 0..40)) {
        let boards = random_playout(&choices);
        let Some(board) = boards.last() else {
            return Ok(());
        };
        let us = board.side_to_move();
        for mov in board.legal_moves() {
            let mut next = board.clone();
            prop_assert!(next.play(mov).is_ok());
            prop_assert!(!next.is_in_check(us));
        }
    }

    #[test]
    fn rejection_leaves_board_untouched(
        choices in prop::collection::vec(any::<usize>(), 0..40),
        from in square(),
        to in square(),
    ) {
        let boards = random_playout(&choices);
        let Some(board) = boards.last() else {
            return Ok(());
        };
        prop_assume!(!board.legal_destinations(from).contains(to));

        let mut after = board.clone();
        let first = after.attempt_move(from, to);
        prop_assert!(first.is_err());
        prop_assert_eq!(&after, board);

        let second = after.attempt_move(from, to);
        prop_assert_eq!(first, second);
        prop_assert_eq!(&after, board);
    }
}
