//! Flat Monte Carlo move search.
//!
//! Every legal candidate gets the same number of random playouts; each
//! playout is scored with the material heuristic from the candidate
//! owner's point of view and the candidate with the highest total wins.
//! There is no tree, no UCB selection and no reuse between candidates.
//!
//! Each candidate draws from its own RNG seeded from (base seed, candidate
//! index), so results depend only on the seed, never on thread scheduling.
//! With the `parallel` feature candidates are evaluated on the rayon pool.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use fastrand::Rng;
use log::{debug, error, trace, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::{Move, Point};
use crate::constants::{DEFAULT_SEED, N_SIMS, SEED_STRIDE};
use crate::playout::{PlayoutBuffers, heuristic, mcplayout};
use crate::position::{Position, attempt_place, legal_moves};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Playouts per candidate move
    pub simulations: usize,
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            simulations: N_SIMS,
            seed: DEFAULT_SEED,
        }
    }
}

/// Cooperative cancellation flag shared between a search and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Best candidate found
    Move(Point),
    /// No legal placement exists
    Pass,
    /// The search was abandoned before it finished
    Cancelled,
}

impl SearchOutcome {
    /// The move to play, if the search ran to completion.
    pub fn as_move(self) -> Option<Move> {
        match self {
            SearchOutcome::Move(pt) => Some(Move::Play(pt)),
            SearchOutcome::Pass => Some(Move::Pass),
            SearchOutcome::Cancelled => None,
        }
    }
}

/// Summed heuristic score of one candidate over all of its playouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub point: Point,
    pub total: i64,
}

/// Marker error for a search stopped through its [`CancelToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

pub struct Searcher {
    config: SearchConfig,
    cancel: CancelToken,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_cancel(config, CancelToken::new())
    }

    pub fn with_cancel(config: SearchConfig, cancel: CancelToken) -> Self {
        Self { config, cancel }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Pick a move for the side to move. `pos` is never modified.
    pub fn select_move(&self, pos: &Position) -> SearchOutcome {
        if self.cancel.is_cancelled() {
            return SearchOutcome::Cancelled;
        }
        let legal = legal_moves(pos);
        match legal.as_slice() {
            [] => return SearchOutcome::Pass,
            [only] => return SearchOutcome::Move(*only),
            _ => {}
        }

        let Ok(candidates) = self.evaluate_points(pos, &legal) else {
            debug!("search cancelled at move {}", pos.move_number());
            return SearchOutcome::Cancelled;
        };
        let Some(best) = best_candidate(&candidates) else {
            return SearchOutcome::Pass;
        };
        debug!(
            "search chose {:?} (total {}) from {} candidates",
            best.point,
            best.total,
            candidates.len()
        );
        SearchOutcome::Move(best.point)
    }

    /// Score every legal candidate, in row-major order.
    pub fn evaluate(&self, pos: &Position) -> Result<Vec<Candidate>, Cancelled> {
        self.evaluate_points(pos, &legal_moves(pos))
    }

    fn evaluate_points(&self, pos: &Position, legal: &[Point]) -> Result<Vec<Candidate>, Cancelled> {
        debug!(
            "evaluating {} candidates x {} playouts for {}",
            legal.len(),
            self.config.simulations,
            pos.turn()
        );

        #[cfg(feature = "parallel")]
        let iter = legal.par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = legal.iter();

        let results: Vec<Result<Option<Candidate>, Cancelled>> = iter
            .enumerate()
            .map(|(i, &pt)| self.evaluate_candidate(pos, pt, i))
            .collect();

        results.into_iter().filter_map(Result::transpose).collect()
    }

    /// Run all playouts for one candidate.
    ///
    /// `Ok(None)` if the point is not a legal move, `Err` if cancelled part way.
    fn evaluate_candidate(
        &self,
        pos: &Position,
        pt: Point,
        index: usize,
    ) -> Result<Option<Candidate>, Cancelled> {
        let color = pos.turn();
        let start = match attempt_place(pos, pt) {
            Ok(start) => start,
            Err(e) => {
                warn!("skipping candidate {pt:?}: {e}");
                return Ok(None);
            }
        };
        let mut rng = Rng::with_seed(candidate_seed(self.config.seed, index));
        let mut buf = PlayoutBuffers::new(pos.size());

        let mut total = 0i64;
        for _ in 0..self.config.simulations {
            if self.cancel.is_cancelled() {
                return Err(Cancelled);
            }
            let mut sim = start.clone();
            mcplayout(&mut sim, &mut rng, &mut buf);
            total += heuristic(&sim, color);
        }
        trace!("candidate {pt:?}: total {total}");
        Ok(Some(Candidate { point: pt, total }))
    }
}

/// Search with default settings and the given playout budget.
pub fn select_move(pos: &Position, simulations: usize) -> SearchOutcome {
    Searcher::new(SearchConfig {
        simulations,
        ..Default::default()
    })
    .select_move(pos)
}

/// Highest total wins; on a tie the earliest candidate is kept.
fn best_candidate(candidates: &[Candidate]) -> Option<Candidate> {
    let (&first, rest) = candidates.split_first()?;
    Some(rest.iter().fold(first, |best, &c| if c.total > best.total { c } else { best }))
}

fn candidate_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(SEED_STRIDE)
}

/// A search running on its own thread.
///
/// Dropping the handle cancels the search. Start a new search only after
/// cancelling the previous one, or a stale result may land on a newer position.
pub struct SearchHandle {
    cancel: CancelToken,
    handle: Option<JoinHandle<SearchOutcome>>,
}

impl SearchHandle {
    /// Search a copy of `pos` in the background.
    pub fn spawn(pos: Position, config: SearchConfig) -> Self {
        let cancel = CancelToken::new();
        let searcher = Searcher::with_cancel(config, cancel.clone());
        let handle = thread::spawn(move || searcher.select_move(&pos));
        Self {
            cancel,
            handle: Some(handle),
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the search to end.
    pub fn join(mut self) -> SearchOutcome {
        let Some(handle) = self.handle.take() else {
            return SearchOutcome::Cancelled;
        };
        handle.join().unwrap_or_else(|_| {
            error!("search thread panicked");
            SearchOutcome::Cancelled
        })
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::board::Color;

    fn quick(seed: u64) -> SearchConfig {
        SearchConfig {
            simulations: 4,
            seed,
        }
    }

    #[test]
    fn test_no_candidates_means_pass() {
        let pos = Position::from_layout(&[".O", "O."], Color::Black).unwrap();
        assert_eq!(Searcher::new(quick(1)).select_move(&pos), SearchOutcome::Pass);
    }

    #[test]
    fn test_single_candidate_returned_directly() {
        // (1,0) is the only empty point, and filling it captures the white pair
        let lone = Position::from_layout(&["X.", "OO"], Color::Black).unwrap();
        assert_eq!(legal_moves(&lone), vec![(1, 0)]);
        assert_eq!(Searcher::new(quick(1)).select_move(&lone), SearchOutcome::Move((1, 0)));
    }

    #[test]
    fn test_same_seed_same_move() {
        let pos = attempt_place(&Position::new(5).unwrap(), (2, 2)).unwrap();
        let a = Searcher::new(quick(99)).select_move(&pos);
        let b = Searcher::new(quick(99)).select_move(&pos);
        assert_eq!(a, b);
        assert!(matches!(a, SearchOutcome::Move(_)));
    }

    #[test]
    fn test_search_does_not_touch_input() {
        let pos = attempt_place(&Position::new(5).unwrap(), (1, 1)).unwrap();
        let before = pos.clone();
        let _ = Searcher::new(quick(5)).select_move(&pos);
        assert_eq!(pos, before);
    }

    #[test]
    fn test_cancelled_before_start() {
        let searcher = Searcher::new(quick(1));
        searcher.cancel_token().cancel();
        assert_eq!(searcher.select_move(&Position::new(5).unwrap()), SearchOutcome::Cancelled);
        assert_eq!(searcher.evaluate(&Position::new(5).unwrap()), Err(Cancelled));
    }

    #[test]
    fn test_evaluate_lists_every_legal_point() {
        let pos = Position::new(3).unwrap();
        let candidates = Searcher::new(quick(2)).evaluate(&pos).unwrap();
        let points: Vec<_> = candidates.iter().map(|c| c.point).collect();
        assert_eq!(points, legal_moves(&pos));
    }

    #[test]
    fn test_different_seeds_change_only_rng() {
        let pos = Position::new(4).unwrap();
        let a = Searcher::new(quick(1)).evaluate(&pos).unwrap();
        let b = Searcher::new(quick(2)).evaluate(&pos).unwrap();
        assert_eq!(a.len(), b.len());
        assert_eq!(candidate_seed(1, 0), candidate_seed(1, 0));
        assert_ne!(candidate_seed(1, 0), candidate_seed(1, 1));
    }

    #[test]
    fn test_handle_join_and_cancel() {
        let handle = SearchHandle::spawn(Position::new(4).unwrap(), quick(3));
        assert!(matches!(handle.join(), SearchOutcome::Move(_)));

        let big = SearchConfig {
            simulations: 1_000_000,
            seed: 1,
        };
        let handle = SearchHandle::spawn(Position::new(9).unwrap(), big);
        handle.cancel();
        assert_eq!(handle.join(), SearchOutcome::Cancelled);
    }

    #[test]
    fn test_equal_scores_pick_first_candidate() {
        let pos = Position::new(5).unwrap();
        let first = legal_moves(&pos)[0];
        assert_eq!(select_move(&pos, 0), SearchOutcome::Move(first));
        assert_eq!(first, (0, 0));
    }

    #[test]
    fn test_symmetric_candidates_keep_row_major_first() {
        // (1,0) and (0,1) mirror each other across the diagonal
        let pos = Position::from_layout(&["X.", ".X"], Color::Black).unwrap();
        assert_eq!(legal_moves(&pos), vec![(1, 0), (0, 1)]);
        let searcher = Searcher::new(SearchConfig {
            simulations: 0,
            seed: 3,
        });
        assert_eq!(searcher.select_move(&pos), SearchOutcome::Move((1, 0)));
    }

    #[test]
    fn test_best_candidate_tie_break() {
        let a = Candidate { point: (1, 0), total: 5 };
        let b = Candidate { point: (0, 1), total: 5 };
        let c = Candidate { point: (2, 2), total: 6 };
        assert_eq!(best_candidate(&[a, b]), Some(a));
        assert_eq!(best_candidate(&[b, a]), Some(b));
        assert_eq!(best_candidate(&[a, b, c]), Some(c));
        assert_eq!(best_candidate(&[]), None);
    }

    #[test]
    fn test_rejected_candidate_is_skipped() {
        let pos = attempt_place(&Position::new(5).unwrap(), (2, 2)).unwrap();
        let candidates = Searcher::new(quick(1))
            .evaluate_points(&pos, &[(2, 2), (0, 0), (9, 9)])
            .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].point, (0, 0));
    }

    #[test]
    fn test_cancel_stops_running_search() {
        let searcher = Searcher::new(SearchConfig {
            simulations: 1_000_000,
            seed: 1,
        });
        let token = searcher.cancel_token();
        let delay = Duration::from_millis(50);
        let canceller = thread::spawn(move || {
            thread::sleep(delay);
            token.cancel();
        });

        let started = Instant::now();
        let outcome = searcher.select_move(&Position::new(9).unwrap());
        canceller.join().unwrap();
        assert_eq!(outcome, SearchOutcome::Cancelled);
        // The token was still clear when the search began
        assert!(started.elapsed() >= delay);
    }
}
