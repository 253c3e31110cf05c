//! Referee for two Othello-playing programs.
//!
//! ```text
//! arbiter [--rounds=<N>] [--logs=<filename-prefix>] <player1> <player2>
//! ```
//!
//! Player commands are run through `/bin/sh -c`. The arbiter's own diagnostics
//! follow `ARBITER_LOG` and `ARBITER_LOG_LEVEL`, see
//! [`Configuration::from_env`](othello_arbiter::configuration::Configuration::from_env).

use clap::error::ErrorKind;
use clap::Parser;

use othello_arbiter::prelude::*;

const USAGE: &str =
    "Usage: arbiter [--rounds=<N>] [--logs=<filename-prefix>] <player1> <player2>";

#[derive(Parser, Debug)]
#[command(name = "arbiter")]
#[command(about = "Plays Othello games between two player programs")]
struct Cli {
    /// Number of rounds, each being two games with colors swapped. 0 plays a single game.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    rounds: i32,
    /// Player stderr handling: absent discards, `-` shares ours, anything else is a file prefix.
    #[arg(long, value_name = "filename-prefix")]
    logs: Option<String>,
    /// Command launching the first player.
    player1: String,
    /// Command launching the second player.
    player2: String,
}

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("{e}");
            println!("{USAGE}");
            std::process::exit(1);
        }
    };

    let config = Configuration::from_env()
        .with_rounds(cli.rounds)
        .with_player_logs(PlayerLogs::from_arg(cli.logs.as_deref()));
    let arbiter = Arbiter::<Board, _>::new(OthelloFactory, config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    arbiter.run([cli.player1.as_str(), cli.player2.as_str()], &mut out)?;
    Ok(())
}
