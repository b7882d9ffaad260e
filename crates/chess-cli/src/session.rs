//! A line-oriented game session on top of [`Board`].
//!
//! The session reads one command per line, applies it to the board and
//! writes the reply. Rejected input is reported and otherwise ignored; the
//! board is never left half-updated.

use chess_board::{Board, GameStatus, MoveError, MoveOutcome, MoveRecord};
use chess_core::{Move, MoveFlag, PieceKind, Square};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

use crate::config::CliConfig;

const HELP: &str = "\
commands:
  e2e4 | e2 e4     move a piece
  e7e8q            move and promote in one step
  q | r | b | n    choose the piece for a waiting promotion
  cancel           drop a waiting promotion
  moves e2         list legal destinations of a square
  board            show the board
  history          list the moves played so far
  fen              print the position as FEN
  help             show this text
  quit             leave the session";

/// A parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Move),
    Promote(PieceKind),
    Cancel,
    Moves(Square),
    Board,
    History,
    Fen,
    Help,
    Quit,
}

/// Why an input line could not be understood.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' is not a square")]
    InvalidSquare(String),
}

/// Why a command could not be carried out.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("no promotion is waiting for a piece choice")]
    NoPendingPromotion,
}

/// Parses one line of user input.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&first) = tokens.first() else {
        return Err(ParseError::Empty);
    };

    let command = match (first.to_ascii_lowercase().as_str(), tokens.len()) {
        ("board", 1) => Command::Board,
        ("history", 1) => Command::History,
        ("fen", 1) => Command::Fen,
        ("help" | "?", 1) => Command::Help,
        ("quit" | "exit", 1) => Command::Quit,
        ("cancel", 1) => Command::Cancel,
        ("moves", 2) => Square::from_algebraic(tokens[1])
            .map(Command::Moves)
            .ok_or_else(|| ParseError::InvalidSquare(tokens[1].to_string()))?,
        ("q" | "r" | "b" | "n", 1) => first
            .chars()
            .next()
            .and_then(PieceKind::from_char)
            .map(Command::Promote)
            .ok_or_else(|| ParseError::Unknown(first.to_string()))?,
        _ => {
            let joined: String = tokens.concat().to_ascii_lowercase();
            Move::from_uci(&joined)
                .map(Command::Move)
                .ok_or_else(|| ParseError::Unknown(line.trim().to_string()))?
        }
    };
    Ok(command)
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// How the board is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub unicode: bool,
    pub coordinates: bool,
}

impl From<&CliConfig> for RenderOptions {
    fn from(config: &CliConfig) -> Self {
        RenderOptions {
            unicode: config.unicode_pieces,
            coordinates: config.show_coordinates,
        }
    }
}

/// One game played from the terminal.
pub struct Session {
    board: Board,
    history: Vec<String>,
    render: RenderOptions,
}

impl Session {
    pub fn new(board: Board, render: RenderOptions) -> Self {
        Session {
            board,
            history: Vec::new(),
            render,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Moves played so far, in `E2 -> E4` form.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Applies one command to the board.
    pub fn handle(&mut self, command: Command) -> Result<Flow, SessionError> {
        debug!(?command, "handling command");
        let reply = match command {
            Command::Move(mov) => match self.board.play(mov)? {
                MoveOutcome::Completed(record) => self.completed(record),
                MoveOutcome::PromotionPending(_) => self.status_line(),
            },
            Command::Promote(kind) => {
                let pending = self
                    .board
                    .pending_promotion()
                    .ok_or(SessionError::NoPendingPromotion)?;
                let record = self.board.complete_promotion(pending, kind)?;
                self.completed(record)
            }
            Command::Cancel => {
                let pending = self
                    .board
                    .cancel_promotion()
                    .ok_or(SessionError::NoPendingPromotion)?;
                format!("promotion {pending} cancelled\n{}", self.status_line())
            }
            Command::Moves(from) => {
                let dests: Vec<String> = self
                    .board
                    .legal_destinations(from)
                    .into_iter()
                    .map(|sq| sq.to_algebraic())
                    .collect();
                if dests.is_empty() {
                    format!("no legal moves from {from}")
                } else {
                    format!("{from}: {}", dests.join(" "))
                }
            }
            Command::Board => self.render(),
            Command::History if self.history.is_empty() => "no moves yet".to_string(),
            Command::History => self
                .history
                .iter()
                .enumerate()
                .map(|(i, entry)| format!("{:>3}. {entry}", i + 1))
                .collect::<Vec<_>>()
                .join("\n"),
            Command::Fen => self.board.to_fen(),
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Flow::Quit),
        };
        Ok(Flow::Continue(reply))
    }

    fn completed(&mut self, record: MoveRecord) -> String {
        self.history.push(history_entry(&record));
        self.render()
    }

    /// Draws the board followed by the status line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (row, cells) in self.board.grid().cells().iter().enumerate().rev() {
            if self.render.coordinates {
                out.push_str(&format!("{} ", row + 1));
            }
            let line: Vec<String> = cells
                .iter()
                .map(|cell| match cell {
                    Some(piece) if self.render.unicode => piece.symbol().to_string(),
                    Some(piece) => piece.to_fen_char().to_string(),
                    None => ".".to_string(),
                })
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        if self.render.coordinates {
            out.push_str("  a b c d e f g h\n");
        }
        out.push_str(&self.status_line());
        out
    }

    fn status_line(&self) -> String {
        match self.board.status() {
            GameStatus::InProgress => format!("{} to move", self.board.side_to_move()),
            GameStatus::Check(color) => format!("{color} to move, in check"),
            GameStatus::Checkmate { winner } => format!("checkmate, {winner} wins"),
            GameStatus::Stalemate => "stalemate".to_string(),
            GameStatus::AwaitingPromotion(pending) => {
                format!("promote {pending}: choose q, r, b or n")
            }
        }
    }

    fn prompt(&self) -> String {
        match self.board.pending_promotion() {
            Some(_) => "promote> ".to_string(),
            None => format!("{}> ", self.board.side_to_move()).to_lowercase(),
        }
    }

    /// Runs the read-eval-print loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        writeln!(output, "{}", self.render())?;
        write!(output, "{}", self.prompt())?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            let reply = match parse_command(&line) {
                Ok(command) => match self.handle(command) {
                    Ok(Flow::Continue(text)) => text,
                    Ok(Flow::Quit) => break,
                    Err(err) => err.to_string(),
                },
                Err(ParseError::Empty) => String::new(),
                Err(err) => err.to_string(),
            };
            if !reply.is_empty() {
                writeln!(output, "{reply}")?;
            }
            write!(output, "{}", self.prompt())?;
            output.flush()?;
        }
        Ok(())
    }
}

/// Formats a move as `E2 -> E4`, with the promotion piece when there is one.
fn history_entry(record: &MoveRecord) -> String {
    let from = record.mov.from().to_algebraic().to_uppercase();
    let to = record.mov.to().to_algebraic().to_uppercase();
    match record.mov.flag() {
        MoveFlag::Promotion(kind) => format!("{from} -> {to} ({kind})"),
        _ => format!("{from} -> {to}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn plain() -> RenderOptions {
        RenderOptions {
            unicode: false,
            coordinates: true,
        }
    }

    fn run_script(board: Board, script: &str) -> (Session, String) {
        let mut session = Session::new(board, plain());
        let mut output = Vec::new();
        session.run(script.as_bytes(), &mut output).unwrap();
        (session, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_parse_moves() {
        let e2e4 = Command::Move(Move::normal(sq("e2"), sq("e4")));
        assert_eq!(parse_command("e2e4"), Ok(e2e4));
        assert_eq!(parse_command("  e2 e4 "), Ok(e2e4));
        assert_eq!(parse_command("E2E4"), Ok(e2e4));

        let promo = parse_command("e7e8q").unwrap();
        match promo {
            Command::Move(mov) => assert_eq!(mov.flag(), MoveFlag::Promotion(PieceKind::Queen)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_command("board"), Ok(Command::Board));
        assert_eq!(parse_command("HISTORY"), Ok(Command::History));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
        assert_eq!(parse_command("moves e2"), Ok(Command::Moves(sq("e2"))));
        assert_eq!(parse_command("n"), Ok(Command::Promote(PieceKind::Knight)));
        assert_eq!(parse_command("cancel"), Ok(Command::Cancel));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_command("   "), Err(ParseError::Empty));
        assert_eq!(
            parse_command("moves z9"),
            Err(ParseError::InvalidSquare("z9".to_string()))
        );
        assert!(matches!(parse_command("castle"), Err(ParseError::Unknown(_))));
        // A king is not a promotion choice.
        assert!(matches!(parse_command("e7e8k"), Err(ParseError::Unknown(_))));
    }

    #[test]
    fn test_history_uses_arrow_form() {
        let (session, output) = run_script(Board::new(), "e2e4\ne7 e5\nhistory\nquit\n");
        assert_eq!(session.history(), ["E2 -> E4", "E7 -> E5"]);
        assert!(output.contains("  1. E2 -> E4"));
        assert!(output.contains("  2. E7 -> E5"));
    }

    #[test]
    fn test_illegal_move_is_reported_and_ignored() {
        let (session, output) = run_script(Board::new(), "e2e5\nquit\n");
        assert!(output.contains("illegal move e2 -> e5"));
        assert_eq!(session.board(), &Board::new());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_promotion_prompt_flow() {
        let board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let (session, output) = run_script(board, "a7a8\ne1e2\nr\nquit\n");

        assert!(output.contains("promote a7 -> a8: choose q, r, b or n"));
        assert!(output.contains("waiting for a piece choice"));
        assert_eq!(session.history(), ["A7 -> A8 (Rook)"]);
        assert_eq!(
            session.board().piece_at(Square::A8).unwrap().kind,
            PieceKind::Rook
        );
    }

    #[test]
    fn test_promote_without_pending() {
        let mut session = Session::new(Board::new(), plain());
        assert_eq!(
            session.handle(Command::Promote(PieceKind::Queen)),
            Err(SessionError::NoPendingPromotion)
        );
        assert_eq!(
            session.handle(Command::Cancel),
            Err(SessionError::NoPendingPromotion)
        );
    }

    #[test]
    fn test_moves_lists_destinations() {
        let mut session = Session::new(Board::new(), plain());
        assert_eq!(
            session.handle(Command::Moves(sq("g1"))),
            Ok(Flow::Continue("g1: f3 h3".to_string()))
        );
        assert_eq!(
            session.handle(Command::Moves(sq("e4"))),
            Ok(Flow::Continue("no legal moves from e4".to_string()))
        );
    }

    #[test]
    fn test_render_options() {
        let session = Session::new(Board::new(), plain());
        let text = session.render();
        assert!(text.starts_with("8 r n b q k b n r\n"));
        assert!(text.contains("  a b c d e f g h\n"));
        assert!(text.ends_with("White to move"));

        let session = Session::new(
            Board::new(),
            RenderOptions {
                unicode: true,
                coordinates: false,
            },
        );
        let text = session.render();
        assert!(!text.contains("a b c d"));
        assert!(text.lines().next().unwrap().starts_with('♜'));
    }

    #[test]
    fn test_checkmate_is_announced() {
        let (_, output) = run_script(Board::new(), "f2f3\ne7e5\ng2g4\nd8h4\nquit\n");
        assert!(output.contains("checkmate, Black wins"));
    }
}
