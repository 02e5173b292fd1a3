//! Area scoring (Chinese rules, komi 0).
//!
//! Each color scores its stones plus every empty region bordered only by
//! that color. Regions touching both colors, or none, are dame and count
//! for nobody. Dead stones are not removed: the board is scored as it stands.

use serde::{Deserialize, Serialize};

use crate::board::Color;
use crate::constants::KOMI;
use crate::position::Position;

/// Points for one color.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorScore {
    pub stones: u32,
    pub territory: u32,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub black: ColorScore,
    pub white: ColorScore,
    pub komi: f64,
    /// Higher total; White on a tie
    pub winner: Color,
    /// Absolute difference between the totals
    pub diff: f64,
}

impl ScoreResult {
    pub fn get(&self, color: Color) -> &ColorScore {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    pub fn is_tie(&self) -> bool {
        self.diff == 0.0
    }

    /// Result in the usual short form: `B+3`, `W+0.5`, or `0` for a tie.
    pub fn result_string(&self) -> String {
        if self.is_tie() {
            "0".to_string()
        } else {
            format!("{}+{}", self.winner.letter(), self.diff)
        }
    }
}

/// Score the board as it stands.
pub fn score(pos: &Position) -> ScoreResult {
    let board = pos.board();
    let area = board.area();

    let mut black = ColorScore {
        stones: board.count(Color::Black) as u32,
        ..Default::default()
    };
    let mut white = ColorScore {
        stones: board.count(Color::White) as u32,
        ..Default::default()
    };

    let mut visited = vec![false; area];
    let mut region = Vec::with_capacity(area);
    for start in 0..area {
        if visited[start] || board.at(start).is_some() {
            continue;
        }

        // Flood the empty region and note which colors touch it
        region.clear();
        region.push(start);
        visited[start] = true;
        let (mut touches_black, mut touches_white) = (false, false);
        let mut head = 0;
        while head < region.len() {
            let cur = region[head];
            head += 1;
            for n in board.neighbors(cur) {
                match board.at(n) {
                    None if !visited[n] => {
                        visited[n] = true;
                        region.push(n);
                    }
                    None => {}
                    Some(Color::Black) => touches_black = true,
                    Some(Color::White) => touches_white = true,
                }
            }
        }

        match (touches_black, touches_white) {
            (true, false) => black.territory += region.len() as u32,
            (false, true) => white.territory += region.len() as u32,
            _ => {}
        }
    }

    black.total = f64::from(black.stones + black.territory);
    white.total = f64::from(white.stones + white.territory) + KOMI;

    let winner = if black.total > white.total {
        Color::Black
    } else {
        Color::White
    };

    ScoreResult {
        black,
        white,
        komi: KOMI,
        winner,
        diff: (black.total - white.total).abs(),
    }
}
