//! Aggregated results of a tournament between two players.

use std::fmt::Display;
use std::io::{self, Write};
use std::time::Duration;

use crate::match_runner::{GameResult, FORFEIT_SCORE};

/// Counters kept for one player over the whole tournament.
#[derive(PartialEq, Eq, Default, Debug, Clone, Copy)]
pub struct PlayerStats {
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
    /// Losses caused by the player's own violation.
    pub forfeits: u32,
    /// Points earned while moving first.
    pub score_as_first: i32,
    /// Points earned while moving second.
    pub score_as_second: i32,
    pub total_time: Duration,
    /// Longest think time of a single game.
    pub max_time: Duration,
}

impl PlayerStats {
    pub fn total_score(&self) -> i32 {
        self.score_as_first + self.score_as_second
    }

    /// Fold in one game, `score` and `time` seen from this player's side.
    fn record(&mut self, score: i32, moved_first: bool, time: Duration) {
        match score.signum() {
            1 => self.wins += 1,
            0 => self.ties += 1,
            _ => self.losses += 1,
        }
        if score == -FORFEIT_SCORE {
            self.forfeits += 1;
        }
        if moved_first {
            self.score_as_first += score;
        } else {
            self.score_as_second += score;
        }
        self.total_time += time;
        self.max_time = self.max_time.max(time);
    }
}

impl Display for PlayerStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "win: {}, tie: {}, loss: {}, forfeit: {}, score: {:+}",
            self.wins,
            self.ties,
            self.losses,
            self.forfeits,
            self.total_score()
        )
    }
}

/// Statistics of both players, indexed by command line position.
#[derive(PartialEq, Eq, Default, Debug, Clone)]
pub struct TournamentStats {
    players: [PlayerStats; 2],
    games: usize,
}

impl TournamentStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a game in which player `first` moved first.
    pub fn record<A>(&mut self, first: usize, result: &GameResult<A>) {
        let second = 1 - first;
        self.players[first].record(result.score, true, result.time_used[0]);
        self.players[second].record(-result.score, false, result.time_used[1]);
        self.games += 1;
    }

    pub fn games(&self) -> usize {
        self.games
    }

    pub fn player(&self, index: usize) -> &PlayerStats {
        &self.players[index]
    }

    /// Render the summary table, one row per player named by `names`.
    pub fn write_summary(&self, names: [&str; 2], out: &mut impl Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(
            out,
            "Player               AvgTm MaxTm Wins Ties Loss Fail RedPts BluePt Total"
        )?;
        writeln!(
            out,
            "-------------------- ----- ----- ---- ---- ---- ---- ------ ------ ------"
        )?;
        let games = self.games.max(1) as f64;
        for (name, stats) in names.iter().zip(&self.players) {
            writeln!(
                out,
                "{:<20} {:.3} {:.3} {:4} {:4} {:4} {:4} {:+6} {:+6} {:+6}",
                name,
                stats.total_time.as_secs_f64() / games,
                stats.max_time.as_secs_f64(),
                stats.wins,
                stats.ties,
                stats.losses,
                stats.forfeits,
                stats.score_as_first,
                stats.score_as_second,
                stats.total_score()
            )?;
        }
        Ok(())
    }
}
