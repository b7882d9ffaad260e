//! Chess CLI - plays a two-player game on the terminal.
//!
//! Moves are typed in coordinate form (`e2e4`). The board is redrawn after
//! every move together with whose turn it is and any check or mate.

mod config;
mod session;

use anyhow::Context;
use chess_board::Board;
use clap::Parser;
use config::CliConfig;
use session::{RenderOptions, Session};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Chess CLI - plays a two-player game on the terminal.
#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Plays a two-player chess game on the terminal")]
struct Args {
    /// Start from this FEN position instead of the standard setup
    #[arg(long)]
    fen: Option<String>,

    /// Path to the configuration file
    #[arg(long, default_value = "chess.toml")]
    config: PathBuf,

    /// Log filter, e.g. "debug" or "chess_board=trace"
    #[arg(long)]
    log_level: Option<String>,

    /// Draw pieces with Unicode chess symbols
    #[arg(long)]
    unicode: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = CliConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(fen) = args.fen {
        config.start_fen = Some(fen);
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if args.unicode {
        config.unicode_pieces = true;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if args.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let board = match &config.start_fen {
        Some(fen) => Board::from_fen(fen).with_context(|| format!("invalid start position {fen}"))?,
        None => Board::new(),
    };
    tracing::info!(fen = %board.to_fen(), "starting session");

    let mut session = Session::new(board, RenderOptions::from(&config));
    session.run(io::stdin().lock(), io::stdout().lock())?;

    tracing::info!(
        moves = session.history().len(),
        fen = %session.board().to_fen(),
        "session finished"
    );
    Ok(())
}
