//! Read-only views and hint handling for analysis collaborators.
//!
//! Collaborators get a [`Snapshot`] of the position and hand back ranked
//! [`Hint`]s. Hints are never trusted: [`validate_hints`] replays each one
//! through the rules engine and drops anything illegal.

use serde::{Deserialize, Serialize};

use crate::board::{Color, Move, Point};
use crate::position::{Captures, HistoryEntry, Position, attempt_place, pass};
use crate::search::{Cancelled, Searcher};

/// Serializable copy of everything an analyser needs to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: usize,
    pub stones: Vec<(Point, Color)>,
    pub turn: Color,
    pub captures: Captures,
    pub history: Vec<HistoryEntry>,
    pub game_over: bool,
}

impl Snapshot {
    pub fn of(pos: &Position) -> Self {
        Snapshot {
            size: pos.size(),
            stones: pos.board().stones().collect(),
            turn: pos.turn(),
            captures: pos.captures(),
            history: pos.history().to_vec(),
            game_over: pos.is_game_over(),
        }
    }
}

/// A suggested move with a score; higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub mv: Move,
    pub score: f64,
}

/// Keep only hints that are legal for the side to move, best first.
///
/// The sort is stable, so equal scores keep the collaborator's order.
pub fn validate_hints(pos: &Position, hints: &[Hint]) -> Vec<Hint> {
    let mut legal: Vec<Hint> = hints
        .iter()
        .filter(|h| match h.mv {
            Move::Play(pt) => attempt_place(pos, pt).is_ok(),
            Move::Pass => pass(pos).is_ok(),
        })
        .copied()
        .collect();
    legal.sort_by(|a, b| b.score.total_cmp(&a.score));
    legal
}

/// Local hints: every legal move ranked by its average playout score.
pub fn rank_candidates(pos: &Position, searcher: &Searcher) -> Result<Vec<Hint>, Cancelled> {
    let sims = searcher.config().simulations.max(1) as f64;
    let hints: Vec<Hint> = searcher
        .evaluate(pos)?
        .into_iter()
        .map(|c| Hint {
            mv: Move::Play(c.point),
            score: c.total as f64 / sims,
        })
        .collect();
    Ok(validate_hints(pos, &hints))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchConfig;

    #[test]
    fn test_snapshot_reflects_position() {
        let pos = attempt_place(&Position::new(9).unwrap(), (2, 3)).unwrap();
        let snap = Snapshot::of(&pos);
        assert_eq!(snap.size, 9);
        assert_eq!(snap.stones, vec![((2, 3), Color::Black)]);
        assert_eq!(snap.turn, Color::White);
        assert_eq!(snap.history.len(), 1);
        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_illegal_hints_are_dropped() {
        let pos = Position::from_layout(&[".O...", "O....", ".....", ".....", "X...."], Color::Black)
            .unwrap();
        let hints = [
            Hint { mv: Move::Play((0, 0)), score: 9.0 }, // suicide
            Hint { mv: Move::Play((0, 4)), score: 8.0 }, // occupied
            Hint { mv: Move::Play((7, 7)), score: 7.0 }, // off board
            Hint { mv: Move::Play((2, 2)), score: 1.0 },
            Hint { mv: Move::Pass, score: 3.0 },
        ];
        let valid = validate_hints(&pos, &hints);
        assert_eq!(
            valid.iter().map(|h| h.mv).collect::<Vec<_>>(),
            vec![Move::Pass, Move::Play((2, 2))]
        );
    }

    #[test]
    fn test_ranked_candidates_are_all_legal() {
        let pos = Position::new(3).unwrap();
        let searcher = Searcher::new(SearchConfig { simulations: 2, seed: 4 });
        let hints = rank_candidates(&pos, &searcher).unwrap();
        assert_eq!(hints.len(), 9);
        assert!(hints.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
