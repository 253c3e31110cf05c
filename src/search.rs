//! Move selection of the reference player: fixed-depth negamax over the
//! shared rules.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::rules::{Board, Move};

/// Static value of `board` for the side to move.
///
/// Every own piece counts +1 and every opponent piece -1. Each empty frontier
/// cell adds 2 if the side to move could capture there and subtracts 2 if the
/// opponent could.
pub fn evaluate(board: &Board) -> i32 {
    let me = board.side_to_move();
    let other = me.other();
    let material = board.count(me) as i32 - board.count(other) as i32;
    let mobility = board
        .frontier()
        .into_iter()
        .map(|mv| {
            let mut value = 0;
            if board.has_flips(me, mv) {
                value += 2;
            }
            if board.has_flips(other, mv) {
                value -= 2;
            }
            value
        })
        .sum::<i32>();
    material + mobility
}

/// Best achievable value for the side to move, looking `depth` plies ahead.
pub fn negamax(board: &Board, depth: u32) -> i32 {
    if depth == 0 || board.is_terminal() {
        return evaluate(board);
    }
    let moves = board.legal_moves();
    if moves.is_empty() {
        return evaluate(board);
    }
    moves
        .into_iter()
        .map(|mv| {
            let mut child = *board;
            child.apply(mv);
            -negamax(&child, depth - 1)
        })
        .max()
        .unwrap_or_else(|| evaluate(board))
}

/// `seed`, or a fresh one drawn from the thread RNG when none was given.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

/// Picks moves with [`negamax`], breaking ties at random.
#[derive(Debug, Clone)]
pub struct Searcher<R> {
    rng: R,
    depth: u32,
}

impl<R: Rng> Searcher<R> {
    /// `depth` is the number of plies searched below each root move.
    pub fn new(rng: R, depth: u32) -> Self {
        Searcher { rng, depth }
    }

    /// The best move for the side to move and its value, or `None` when there
    /// is nothing to play.
    pub fn select_move(&mut self, board: &Board) -> Option<(Move, i32)> {
        if board.is_terminal() {
            return None;
        }
        let mut moves = board.legal_moves();
        moves.shuffle(&mut self.rng);

        let mut best: Option<(Move, i32)> = None;
        for mv in moves {
            let mut child = *board;
            child.apply(mv);
            let value = -negamax(&child, self.depth);
            if best.map_or(true, |(_, best_value)| value > best_value) {
                best = Some((mv, value));
            }
        }
        if let Some((mv, value)) = best {
            debug!(%mv, value, "selected move");
        }
        best
    }
}
