//! Reference Othello player speaking the arbiter's line protocol.
//!
//! Reads `Start`, opponent moves and `Quit` on stdin, answers with its own
//! moves on stdout and logs to stderr.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, Level};

use othello_arbiter::client_handler::{QUIT, START};
use othello_arbiter::prelude::*;
use othello_arbiter::search::{resolve_seed, Searcher};

#[derive(Parser, Debug)]
#[command(name = "player")]
#[command(about = "Negamax Othello player for the arbiter")]
struct Cli {
    /// Plies searched below each candidate move
    #[arg(long, default_value = "3")]
    depth: u32,
    /// Seed for breaking ties between equally valued moves, drawn at random if absent
    #[arg(long)]
    seed: Option<u64>,
    /// Log every selected move
    #[arg(long)]
    verbose: bool,
}

fn send_move(out: &mut impl Write, mv: Move) -> io::Result<()> {
    out.write_all(format!("{mv}\n").as_bytes())?;
    out.flush()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(io::stderr)
        .init();

    let seed = resolve_seed(cli.seed);
    info!(seed, depth = cli.depth, "player started");
    let mut searcher = Searcher::new(ChaCha8Rng::seed_from_u64(seed), cli.depth);

    let mut lines = io::stdin().lock().lines();
    let mut out = io::stdout().lock();
    let mut board = Board::initial();
    let mut me: Option<Side> = None;

    loop {
        if me == Some(board.side_to_move()) && !board.is_terminal() {
            let (mv, value) = searcher
                .select_move(&board)
                .context("no move possible")?;
            info!(best_value = value, "playing {mv}");
            send_move(&mut out, mv).context("could not send move")?;
            board.apply(mv);
            continue;
        }

        let Some(line) = lines.next().transpose().context("could not read input")? else {
            bail!("Premature end of input.");
        };
        if line == QUIT {
            info!("Quit received. Exiting.");
            return Ok(());
        }
        if me.is_none() {
            if line == START {
                me = Some(Side::White);
                continue;
            }
            me = Some(Side::Black);
        }

        let mv = match line.parse::<Move>() {
            Ok(mv) => mv,
            Err(e) => bail!("Invalid move received: [{line}] ({e})"),
        };
        board
            .apply_action(&mv)
            .with_context(|| format!("illegal move received: {mv}"))?;
        debug!(moves = board.moves_played(), "opponent played {mv}");
    }
}
