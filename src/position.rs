//! Go position representation and move execution.
//!
//! This module is the rules engine:
//! - [`Position`]: stones, side to move, capture tallies and move history
//! - [`attempt_place`]: legal placement with capture resolution and suicide rejection
//! - [`pass`]: pass move, ending the game on the second consecutive pass
//! - [`force_place`]: board editing that bypasses the rules entirely
//!
//! Every public operation takes a `&Position` and returns a new one, so a
//! caller's copy is never changed. Ko is not enforced; repeating a
//! whole-board position is allowed.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Move, Point, Scratch};
use crate::constants::is_supported_size;
use crate::error::MoveError;

/// Stones captured so far, by capturing color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    fn add(&mut self, color: Color, count: u32) {
        match color {
            Color::Black => self.black += count,
            Color::White => self.white += count,
        }
    }
}

/// One recorded ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub color: Color,
    pub mv: Move,
    /// Opponent stones removed by this ply
    pub captured: u32,
}

/// A Go position (board state).
///
/// Positions are values: the rules engine clones and returns a new one for
/// every accepted action, which is what lets the session keep old positions
/// for undo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: Board,
    turn: Color,
    captures: Captures,
    last_move: Option<Point>,
    history: Vec<HistoryEntry>,
    /// Stones present when `history` began (non-empty only after board editing)
    setup: Arc<Vec<(Point, Color)>>,
    game_over: bool,
}

impl Position {
    /// An empty board with Black to move.
    ///
    /// Returns `None` unless `size` is within
    /// [`MIN_SIZE`](crate::constants::MIN_SIZE)..=[`MAX_SIZE`](crate::constants::MAX_SIZE).
    pub fn new(size: usize) -> Option<Self> {
        is_supported_size(size).then(|| Self::blank(size))
    }

    /// Unchecked form of [`Position::new`] for sizes already known to be valid.
    pub(crate) fn blank(size: usize) -> Self {
        debug_assert!(is_supported_size(size));
        Self::from_board(Board::new(size), Color::Black)
    }

    /// Adopt an edited board as a fresh baseline with `turn` to move.
    pub fn from_board(board: Board, turn: Color) -> Self {
        let setup = board.stones().collect();
        Position {
            board,
            turn,
            captures: Captures::default(),
            last_move: None,
            history: Vec::new(),
            setup: Arc::new(setup),
            game_over: false,
        }
    }

    /// Build a baseline position from text rows (see [`Board::from_layout`]).
    pub fn from_layout(rows: &[&str], turn: Color) -> Option<Self> {
        Board::from_layout(rows).map(|b| Self::from_board(b, turn))
    }

    // -- Accessors --

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn get(&self, pt: Point) -> Option<Color> {
        self.board.get(pt)
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn captures(&self) -> Captures {
        self.captures
    }

    pub fn last_move(&self) -> Option<Point> {
        self.last_move
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Number of plies recorded since the game (or setup baseline) began.
    pub fn move_number(&self) -> usize {
        self.history.len()
    }

    pub fn setup(&self) -> &[(Point, Color)] {
        &self.setup
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn last_was_pass(&self) -> bool {
        self.history.last().is_some_and(|h| h.mv.is_pass())
    }

    pub fn stone_count(&self) -> usize {
        self.board.area() - self.board.empty_points().count()
    }

    // -- In-place mutation (crate internal) --

    /// Play a stone for the side to move, in place.
    ///
    /// On `Err` the position is exactly as it was before the call.
    /// Returns the number of opponent stones captured.
    pub(crate) fn play_mut(&mut self, pt: Point, scratch: &mut Scratch) -> Result<u32, MoveError> {
        if self.game_over {
            return Err(MoveError::GameOver);
        }
        if !self.board.on_board(pt) {
            return Err(MoveError::OffBoard);
        }
        let idx = self.board.idx(pt);
        if self.board.at(idx).is_some() {
            return Err(MoveError::Occupied);
        }

        let color = self.turn;
        let opp = color.opp();
        self.board.set(idx, Some(color));

        // Resolve every adjacent enemy group before looking at our own liberties
        let mut captured = 0u32;
        for n in self.board.neighbors(idx) {
            if self.board.at(n) == Some(opp) && self.board.liberties(n, scratch) == 0 {
                captured += self.board.remove_group(n, scratch);
            }
        }

        if captured == 0 && self.board.liberties(idx, scratch) == 0 {
            self.board.set(idx, None);
            return Err(MoveError::Suicide);
        }

        self.turn = opp;
        self.captures.add(color, captured);
        self.last_move = Some(pt);
        self.history.push(HistoryEntry {
            color,
            mv: Move::Play(pt),
            captured,
        });
        Ok(captured)
    }

    /// Pass for the side to move, in place. A second consecutive pass ends the game.
    pub(crate) fn pass_mut(&mut self) -> Result<(), MoveError> {
        if self.game_over {
            return Err(MoveError::GameOver);
        }
        if self.last_was_pass() {
            self.game_over = true;
        }
        self.history.push(HistoryEntry {
            color: self.turn,
            mv: Move::Pass,
            captured: 0,
        });
        self.turn = self.turn.opp();
        self.last_move = None;
        Ok(())
    }

    /// Mark the position terminal without recording a ply (resignation).
    pub(crate) fn finish(&mut self) {
        self.game_over = true;
    }

    /// Same position with a different side to move. Only valid before any ply is recorded.
    pub(crate) fn with_turn(mut self, turn: Color) -> Self {
        debug_assert!(self.history.is_empty());
        self.turn = turn;
        self
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        writeln!(
            f,
            "move {} | {} to play | captures B:{} W:{}{}",
            self.move_number(),
            self.turn,
            self.captures.black,
            self.captures.white,
            if self.game_over { " | game over" } else { "" }
        )
    }
}

/// Place a stone for the side to move.
///
/// Captures are resolved from all adjacent enemy groups before the suicide
/// check, so a capturing move is never suicide. The input is not modified.
///
/// # Errors
/// - [`MoveError::GameOver`] if the game has ended
/// - [`MoveError::OffBoard`] if `pt` is outside the board
/// - [`MoveError::Occupied`] if `pt` already holds a stone
/// - [`MoveError::Suicide`] if the stone's group would have no liberties
pub fn attempt_place(pos: &Position, pt: Point) -> Result<Position, MoveError> {
    let mut next = pos.clone();
    let mut scratch = Scratch::new(pos.board.area());
    next.play_mut(pt, &mut scratch)?;
    Ok(next)
}

/// Pass for the side to move. The second consecutive pass sets the game-over flag.
pub fn pass(pos: &Position) -> Result<Position, MoveError> {
    let mut next = pos.clone();
    next.pass_mut()?;
    Ok(next)
}

/// Put a stone of `cell` at `pt` (or clear it when `cell` is `None`), ignoring the rules.
///
/// This is for board setup only: no captures, no suicide check, the stone
/// may overwrite another. The edited board becomes a new baseline, so the
/// history is cleared; side to move and capture tallies are kept.
pub fn force_place(pos: &Position, pt: Point, cell: Option<Color>) -> Result<Position, MoveError> {
    if !pos.board.on_board(pt) {
        return Err(MoveError::OffBoard);
    }
    let mut board = pos.board.clone();
    let idx = board.idx(pt);
    board.set(idx, cell);
    let mut next = Position::from_board(board, pos.turn);
    next.captures = pos.captures;
    Ok(next)
}

/// Whether the side to move may play at `pt`.
pub fn is_legal(pos: &Position, pt: Point) -> bool {
    attempt_place(pos, pt).is_ok()
}

/// Every legal placement for the side to move, in row-major order.
pub fn legal_moves(pos: &Position) -> Vec<Point> {
    if pos.game_over {
        return Vec::new();
    }
    pos.board
        .empty_points()
        .filter(|&pt| is_legal(pos, pt))
        .collect()
}
