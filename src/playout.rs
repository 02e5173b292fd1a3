//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays uniformly random legal moves until two consecutive
//! passes or the ply cap, then scores the end position with a cheap
//! material heuristic instead of full area scoring.

use fastrand::Rng;

use crate::board::{Color, Point, Scratch};
use crate::constants::playout_cap;
use crate::position::Position;

/// Buffers reused across playouts so the inner loop does not allocate.
pub struct PlayoutBuffers {
    scratch: Scratch,
    candidates: Vec<Point>,
}

impl PlayoutBuffers {
    pub fn new(size: usize) -> Self {
        Self {
            scratch: Scratch::new(size * size),
            candidates: Vec::with_capacity(size * size),
        }
    }
}

/// Play random moves on `pos` until the game ends or the ply cap is hit.
///
/// Returns the number of plies played.
pub fn mcplayout(pos: &mut Position, rng: &mut Rng, buf: &mut PlayoutBuffers) -> usize {
    let cap = playout_cap(pos.size());
    let mut plies = 0;

    while !pos.is_game_over() && plies < cap {
        if !play_random_move(pos, rng, buf) {
            // pass_mut only fails once the game is over, which the loop guards
            let _ = pos.pass_mut();
        }
        plies += 1;
    }
    plies
}

/// Try empty points in random order until one is legal and play it.
///
/// Uses an incremental Fisher-Yates shuffle so a legal move found early
/// stops the shuffle early. Returns `false` if no point is playable.
fn play_random_move(pos: &mut Position, rng: &mut Rng, buf: &mut PlayoutBuffers) -> bool {
    buf.candidates.clear();
    buf.candidates.extend(pos.board().empty_points());

    let n = buf.candidates.len();
    for i in 0..n {
        let j = rng.usize(i..n);
        buf.candidates.swap(i, j);
        if pos.play_mut(buf.candidates[i], &mut buf.scratch).is_ok() {
            return true;
        }
    }
    false
}

/// Material balance from `color`'s point of view:
/// capture differential plus stone-count differential.
pub fn heuristic(pos: &Position, color: Color) -> i64 {
    let caps = pos.captures();
    let board = pos.board();
    let capture_diff = i64::from(caps.get(color)) - i64::from(caps.get(color.opp()));
    let stone_diff = board.count(color) as i64 - board.count(color.opp()) as i64;
    capture_diff + stone_diff
}
