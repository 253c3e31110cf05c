//! Plays a single game between two player processes.
//!
//! The first mover gets [`START`], after which each player only ever receives
//! its opponent's last move. The first violation of any kind ends the game
//! with a forfeit: no retries, no second chances.
//!
//! Think time is charged per player as the time between handing it a message
//! and receiving its reply.

use std::fmt::{self, Display, Write as _};
use std::str::FromStr;
use std::time::{Duration, Instant};

use tracing::{info, instrument, trace, warn};

use crate::agent::Agent;
use crate::client_handler::{escape, ClientHandler, ProtocolError, START};
use crate::configuration::PlayerLogs;
use crate::game_interface::Game;
use crate::rules::Side;

/// Score of a forfeited game. Larger than any material difference.
pub const FORFEIT_SCORE: i32 = 99;

/// Who plays in a game, in move order, and where their diagnostics go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSettings {
    /// Game number within the tournament.
    pub game: usize,
    /// First mover, then second mover.
    pub ordered_player: [Agent; 2],
    pub player_logs: PlayerLogs,
}

impl Display for MatchSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} VS {}]",
            self.ordered_player[0].name, self.ordered_player[1].name
        )
    }
}

/// What a player did wrong.
#[derive(Debug)]
pub enum Violation {
    /// No usable line came back.
    Protocol(ProtocolError),
    /// A line came back but is not a move.
    Unparsable { line: String, reason: String },
    /// A well-formed move that is not legal right now.
    Illegal { action: String, reason: String },
    /// A message for the other player could not be delivered.
    Undeliverable(ProtocolError),
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Protocol(e) => write!(f, "{e}"),
            Violation::Unparsable { line, reason } => {
                write!(f, "could not parse move {} ({reason})", escape(line.as_bytes()))
            }
            Violation::Illegal { action, reason } => write!(f, "invalid move {action} ({reason})"),
            Violation::Undeliverable(e) => write!(f, "{e}"),
        }
    }
}

/// How a game ended.
#[derive(Debug)]
pub enum Termination {
    /// The move budget was used up.
    Completed,
    /// `player` (0 = first mover) broke a rule.
    Forfeit { player: usize, violation: Violation },
}

/// Outcome of one game.
#[derive(Debug)]
pub struct GameResult<A> {
    /// Moves applied, in order.
    pub moves: Vec<A>,
    /// From the first mover's point of view.
    pub score: i32,
    /// Think time of the first and second mover.
    pub time_used: [Duration; 2],
    pub termination: Termination,
}

impl<A: Display> GameResult<A> {
    /// Concatenated move tokens.
    pub fn transcript(&self) -> String {
        let mut s = String::new();
        for action in &self.moves {
            // writing to a String cannot fail
            let _ = write!(s, "{action}");
        }
        s
    }

    pub fn is_forfeit(&self) -> bool {
        matches!(self.termination, Termination::Forfeit { .. })
    }
}

/// Score awarded when `player` forfeits.
pub fn forfeit_score(player: usize) -> i32 {
    if player == 0 {
        -FORFEIT_SCORE
    } else {
        FORFEIT_SCORE
    }
}

/// Launch both players and play `game` to the end.
///
/// Both players are told to quit and reaped before this returns, however the
/// game ended.
///
/// # Errors
/// Only setup failures (a player that cannot be launched) are errors; every
/// misbehavior of a player is reported through [`GameResult::termination`].
#[instrument(skip_all, fields(game = settings.game, players = %settings))]
pub fn run_match<G: Game>(settings: &MatchSettings, game: G) -> anyhow::Result<GameResult<G::Action>>
where
    <G::Action as FromStr>::Err: Display,
{
    let [first, second] = &settings.ordered_player;
    let first = ClientHandler::init(
        &first.command,
        &first.diagnostics_sink(&settings.player_logs, settings.game, Side::White),
    )?;
    let second = ClientHandler::init(
        &second.command,
        &second.diagnostics_sink(&settings.player_logs, settings.game, Side::Black),
    )?;
    let mut clients = [first, second];

    let result = play(game, &mut clients);

    for client in &mut clients {
        client.close();
    }
    info!(score = result.score, moves = result.moves.len(), "game over");
    Ok(result)
}

/// Drive `game` with already launched players. `clients[0]` moves first.
pub fn play<G: Game>(mut game: G, clients: &mut [ClientHandler; 2]) -> GameResult<G::Action>
where
    <G::Action as FromStr>::Err: Display,
{
    let mut moves = Vec::new();
    let mut time_used = [Duration::ZERO; 2];
    let mut handed_over = Instant::now();
    let mut started = false;

    let forfeit = loop {
        if game.is_finished() {
            break None;
        }
        let player = game.current_player_number();
        trace!("player to play: {player}");

        if !started {
            if let Err(e) = clients[0].send_line(START) {
                break Some((0, Violation::Undeliverable(e)));
            }
            started = true;
        }

        let received = clients[player].receive_line();
        time_used[player] += handed_over.elapsed();
        let line = match received {
            Ok(line) => line,
            Err(e) => break Some((player, Violation::Protocol(e))),
        };

        let action = match line.parse::<G::Action>() {
            Ok(action) => action,
            Err(e) => {
                let reason = e.to_string();
                break Some((player, Violation::Unparsable { line, reason }));
            }
        };
        if let Err(e) = game.apply_action(&action) {
            let reason = e.to_string();
            break Some((player, Violation::Illegal { action: line, reason }));
        }
        let token = action.to_string();
        moves.push(action);

        if !game.is_finished() {
            handed_over = Instant::now();
            if let Err(e) = clients[1 - player].send_line(&token) {
                // blamed on the player whose move it was
                break Some((player, Violation::Undeliverable(e)));
            }
        }
    };

    let (score, termination) = match forfeit {
        None => (game.score(), Termination::Completed),
        Some((player, violation)) => {
            warn!("Player {player} forfeits: {violation}");
            (
                forfeit_score(player),
                Termination::Forfeit { player, violation },
            )
        }
    };

    GameResult {
        moves,
        score,
        time_used,
        termination,
    }
}

#[cfg(test)]
mod match_tests {
    use crate::player_process::DiagnosticsSink;
    use crate::rules::{Board, Move};

    use super::*;

    fn clients(first: &str, second: &str) -> [ClientHandler; 2] {
        [
            ClientHandler::init(first, &DiagnosticsSink::Discard).unwrap(),
            ClientHandler::init(second, &DiagnosticsSink::Discard).unwrap(),
        ]
    }

    fn forfeiting_player(result: &GameResult<Move>) -> Option<usize> {
        match result.termination {
            Termination::Forfeit { player, .. } => Some(player),
            Termination::Completed => None,
        }
    }

    #[test]
    fn malformed_first_move_forfeits() {
        for token in ["A", "A11", "Z9", "Start"] {
            let mut clients = clients(&format!("read line; echo {token}"), "read line");
            let result = play(Board::initial(), &mut clients);
            assert_eq!(result.score, -FORFEIT_SCORE, "token {token}");
            assert_eq!(forfeiting_player(&result), Some(0));
            assert!(matches!(
                result.termination,
                Termination::Forfeit {
                    violation: Violation::Unparsable { .. },
                    ..
                }
            ));
            assert_eq!(result.transcript(), "");
        }
    }

    #[test]
    fn malformed_second_move_forfeits() {
        let mut clients = clients("read line; echo C5; read line", "read line; echo Z9");
        let result = play(Board::initial(), &mut clients);
        assert_eq!(result.score, FORFEIT_SCORE);
        assert_eq!(forfeiting_player(&result), Some(1));
        assert_eq!(result.transcript(), "C5");
    }

    #[test]
    fn illegal_move_lists_valid_moves() {
        let mut clients = clients("read line; echo A1", "read line");
        let result = play(Board::initial(), &mut clients);
        assert_eq!(result.score, -FORFEIT_SCORE);
        match &result.termination {
            Termination::Forfeit {
                player: 0,
                violation: Violation::Illegal { action, reason },
            } => {
                assert_eq!(action, "A1");
                assert_eq!(reason, "Valid moves: C5 D6 E3 F4");
            }
            other => panic!("unexpected termination {other:?}"),
        }
    }

    #[test]
    fn silent_player_forfeits() {
        let mut clients = clients("read line; echo C5; read line", "read line");
        let result = play(Board::initial(), &mut clients);
        assert_eq!(result.score, FORFEIT_SCORE);
        assert!(matches!(
            result.termination,
            Termination::Forfeit {
                player: 1,
                violation: Violation::Protocol(ProtocolError::EndOfStream),
            }
        ));
    }

    #[test]
    fn undeliverable_move_is_blamed_on_the_mover() {
        // the second player is gone before the first one answers
        let mut clients = clients("read line; sleep 0.5; echo C5; read line", "exit 0");
        let result = play(Board::initial(), &mut clients);
        assert_eq!(result.transcript(), "C5");
        assert_eq!(result.score, -FORFEIT_SCORE);
        assert!(matches!(
            result.termination,
            Termination::Forfeit {
                player: 0,
                violation: Violation::Undeliverable(_),
            }
        ));
        assert!(result.time_used[0] >= Duration::from_millis(500));
        assert_eq!(result.time_used[1], Duration::ZERO);
    }

    #[test]
    fn undeliverable_start_forfeits_the_first_mover() {
        let mut clients = clients("exit 0", "read line");
        // let the first player go away before the game starts
        std::thread::sleep(Duration::from_millis(200));
        let result = play(Board::initial(), &mut clients);
        assert_eq!(result.score, -FORFEIT_SCORE);
        assert_eq!(result.transcript(), "");
        match &result.termination {
            Termination::Forfeit {
                player: 0,
                violation: Violation::Undeliverable(ProtocolError::Undeliverable { message, .. }),
            } => assert_eq!(message, START),
            other => panic!("unexpected termination {other:?}"),
        }
    }

    #[test]
    fn run_match_launches_and_reaps() {
        let settings = MatchSettings {
            game: 0,
            ordered_player: [
                Agent::new(0, "read line; echo F4; read line"),
                Agent::new(1, "read line; echo H8"),
            ],
            player_logs: PlayerLogs::Discard,
        };
        assert_eq!(settings.to_string(), "[p1 VS p2]");
        let result = run_match(&settings, Board::initial()).unwrap();
        assert_eq!(result.transcript(), "F4");
        assert_eq!(result.score, FORFEIT_SCORE);
        assert!(result.is_forfeit());
    }

    #[test]
    fn forfeit_sign_follows_the_offender() {
        assert_eq!(forfeit_score(0), -99);
        assert_eq!(forfeit_score(1), 99);
    }
}
