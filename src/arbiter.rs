//! Tournament execution between two player programs.
//!
//! An [`Arbiter`] plays [`Configuration::games()`] games in sequence, one at a
//! time. Game `i` is opened by player `i % 2`, so over a round each program
//! plays both colors once. Every game produces one line on the output; when
//! more than one game was played a summary table follows.
//!
//! # Output
//!
//! ```text
//!    0: F5D6C3D3C4F4F6F3E6E7... +12
//!    1: C4E3F6E6F5C5C3C6D3D2... -99
//!
//! Player               AvgTm MaxTm Wins Ties Loss Fail RedPts BluePt Total
//! -------------------- ----- ----- ---- ---- ---- ---- ------ ------ ------
//! ./player             0.412 0.530    2    0    0    0    +12    +99   +111
//! ./broken             0.101 0.120    0    0    2    1    -99    -12   -111
//! ```
//!
//! Player violations never abort the tournament: the offending side forfeits
//! the game and the next one starts. Only setup failures (a player that cannot
//! be launched, a log file that cannot be created) are returned as errors.

use std::fmt::Display;
use std::io::Write;
use std::marker::PhantomData;
use std::str::FromStr;

use anyhow::Context;
use tracing::{info, instrument, trace};

use crate::agent::Agent;
use crate::configuration::Configuration;
use crate::game_interface::{Game, GameFactory};
use crate::logger::init_logger;
use crate::match_runner::{run_match, GameResult, MatchSettings};
use crate::tournament_stats::TournamentStats;

/// Runs a two-player tournament.
///
/// # Type Parameters
/// - `G`: The game type implementing [`Game`]
/// - `F`: A factory implementing [`GameFactory<G>`]
pub struct Arbiter<G: Game, F>
where
    F: GameFactory<G>,
{
    factory: F,
    config: Configuration,
    _ff: PhantomData<G>,
}

impl<G: Game, F: GameFactory<G>> Arbiter<G, F>
where
    <G::Action as FromStr>::Err: Display,
{
    /// Create an [`Arbiter`], installing the log subscriber the configuration asks for.
    ///
    /// # Errors
    /// Returns an error if the log subscriber cannot be installed.
    #[instrument(skip_all)]
    pub fn new(factory: F, config: Configuration) -> anyhow::Result<Arbiter<G, F>> {
        init_logger(config.log, config.log_level)?;
        trace!(?config);

        Ok(Arbiter {
            factory,
            config,
            _ff: PhantomData,
        })
    }

    /// Play the tournament between `commands[0]` (`p1`) and `commands[1]` (`p2`),
    /// writing the per-game lines and the summary to `out`.
    ///
    /// # Errors
    /// Returns an error if a player cannot be launched or `out` cannot be written.
    pub fn run(&self, commands: [&str; 2], out: &mut impl Write) -> anyhow::Result<TournamentStats> {
        let agents = [Agent::new(0, commands[0]), Agent::new(1, commands[1])];
        let games = self.config.games();
        info!(games, "starting tournament between {} and {}", agents[0], agents[1]);

        let mut stats = TournamentStats::new();
        for game in 0..games {
            let first = game % 2;
            let settings = MatchSettings {
                game,
                ordered_player: [agents[first].clone(), agents[1 - first].clone()],
                player_logs: self.config.player_logs.clone(),
            };
            let result = run_match(&settings, self.factory.new_game())
                .with_context(|| format!("could not set up game {game} {settings}"))?;

            writeln!(out, "{}", format_game_line(game, &result))?;
            out.flush()?;
            info!(
                game,
                score = result.score,
                "{settings} finished after {} moves",
                result.moves.len()
            );
            stats.record(first, &result);
        }

        if games > 1 {
            let names = [agents[0].display_name(), agents[1].display_name()];
            stats.write_summary(names, out)?;
            out.flush()?;
            for agent in &agents {
                info!("{agent}: {}", stats.player(agent.id));
            }
        }
        Ok(stats)
    }
}

/// `<game>: <transcript> <score>`, the game index right-aligned on 4 columns and
/// positive scores with an explicit `+`.
pub fn format_game_line<A: Display>(game: usize, result: &GameResult<A>) -> String {
    let sign = if result.score > 0 { "+" } else { "" };
    format!("{:4}: {} {}{}", game, result.transcript(), sign, result.score)
}
