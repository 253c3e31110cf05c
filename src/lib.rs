//! # Othello Arbiter
//!
//! Referee for matches between two independent Othello playing programs.
//!
//! It provides:
//! - The rule engine shared by the arbiter and the reference player ([`rules`])
//! - Player process management and the line protocol spoken with players
//! - Single games with violation detection and think time measurement ([`match_runner`])
//! - Tournaments of alternating colors with aggregated statistics ([`Arbiter`](crate::arbiter::Arbiter))
//!
//! Each player runs as a separate OS process launched through `/bin/sh -c`, reading
//! messages on its standard input and answering on its standard output.
//!
//! # Documentation Overview
//!
//! - For the tournament loop and its output, see the [`arbiter`] module.
//! - For configuring rounds, player diagnostics and logging, see
//!   [`Configuration`](crate::configuration::Configuration).
//! - For the exact game rules, including the non-capturing fallback, see [`rules`].
//! - For the wire protocol, see [`client_handler`].
//!
//! # Usage Example
//!
//! ```no_run
//! use othello_arbiter::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Two rounds, i.e. four games, players' stderr shared with ours
//!     let config = Configuration::from_env()
//!         .with_rounds(2)
//!         .with_player_logs(PlayerLogs::Inherit);
//!
//!     let arbiter = Arbiter::<Board, _>::new(OthelloFactory, config)?;
//!     let stats = arbiter.run(["./player --seed=1", "./player --seed=2"], &mut std::io::stdout())?;
//!
//!     println!("p1 scored {:+}", stats.player(0).total_score());
//!     Ok(())
//! }
//! ```
//!
//! # Player Requirements
//!
//! - The player moving first receives `Start`, then each player receives its
//!   opponent's moves as two-character tokens (`A1`..`H8`).
//! - Every message but `Quit` must be answered with exactly one line holding one
//!   legal move, written in a single `write`.
//! - Any violation forfeits the game: `-99` if the first mover broke a rule,
//!   `+99` if the second did.

pub use anyhow;

pub mod agent;
pub mod arbiter;
pub mod client_handler;
pub mod configuration;
pub mod game_interface;
mod logger;
pub mod match_runner;
pub mod player_process;
pub mod rules;
pub mod search;
pub mod tournament_stats;

/// Commonly used types and traits for quick access.
///
/// ```rust
/// use othello_arbiter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::arbiter::Arbiter;
    pub use crate::configuration::{Configuration, LogTarget, PlayerLogs};
    pub use crate::game_interface::{Game, GameFactory};
    pub use crate::match_runner::{GameResult, Termination};
    pub use crate::rules::{Board, Move, OthelloFactory, Side};
    pub use crate::tournament_stats::{PlayerStats, TournamentStats};
}
