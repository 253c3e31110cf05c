//! Traits the match runner is generic over.
//!
//! [`Board`](crate::rules::Board) is the only game shipped with the crate, but the
//! match runner only needs what is below: a way to list and apply actions, to
//! know whose turn it is, and to score the final position.

use std::fmt::Display;
use std::str::FromStr;

/// A sequential two-player game with a textual action format.
pub trait Game {
    /// What players send over the wire, one per line.
    type Action: FromStr + Display + PartialEq;

    /// Actions currently allowed for the player to move.
    fn legal_actions(&self) -> Vec<Self::Action>;

    /// Apply an action for the player to move.
    ///
    /// # Error
    /// Returned when `action` is not legal. The state is left unchanged and
    /// the message describes what would have been accepted.
    fn apply_action(&mut self, action: &Self::Action) -> anyhow::Result<()>;

    /// The number of the player that should play now: 0 for the first mover, 1 for the second.
    fn current_player_number(&self) -> usize;

    /// True if game is finished
    fn is_finished(&self) -> bool;

    /// Final score from the first mover's point of view.
    fn score(&self) -> i32;
}

/// What will be given to the arbiter to allow it to create games
pub trait GameFactory<G: Game> {
    /// Returns an initialized game
    fn new_game(&self) -> G;
}
