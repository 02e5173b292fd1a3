//! Game session: the current position, undo/redo history and game phase.
//!
//! A [`Session`] is the only owner of mutable game state. Every action goes
//! through the rules engine in [`crate::position`]; a rejected action leaves
//! the session exactly as it was.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::analysis::Snapshot;
use crate::board::{Color, Move, Point};
use crate::constants::DEFAULT_SIZE;
use crate::coord::parse_coord;
use crate::error::{MoveError, SessionError};
use crate::position::{self, Position, attempt_place, force_place};
use crate::scoring::{ScoreResult, score};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Play,
    Setup,
}

/// What a board click does during setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupTool {
    /// Normal alternating legal play
    #[default]
    Alternate,
    /// Force a black stone
    Black,
    /// Force a white stone
    White,
    /// Remove whatever is there
    Erase,
}

impl SetupTool {
    fn forced_cell(self) -> Option<Option<Color>> {
        match self {
            SetupTool::Alternate => None,
            SetupTool::Black => Some(Some(Color::Black)),
            SetupTool::White => Some(Some(Color::White)),
            SetupTool::Erase => Some(None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultReason {
    Resignation,
    Scoring,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Color,
    pub reason: ResultReason,
    /// Board score at the end; informational only for resignations
    pub score: ScoreResult,
}

impl GameResult {
    /// `B+R`, `W+3`, or `0` for a scored tie.
    pub fn result_string(&self) -> String {
        match self.reason {
            ResultReason::Resignation => format!("{}+R", self.winner.letter()),
            ResultReason::Scoring => self.score.result_string(),
        }
    }
}

/// A position together with the result that was showing alongside it.
#[derive(Debug, Clone)]
struct Frame {
    position: Position,
    result: Option<GameResult>,
}

#[derive(Debug, Clone)]
pub struct Session {
    position: Position,
    result: Option<GameResult>,
    /// Oldest first
    undo_stack: Vec<Frame>,
    redo_stack: Vec<Frame>,
    phase: Phase,
    setup_tool: SetupTool,
    /// A forced edit happened since entering setup
    setup_edited: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::from_position(Position::blank(DEFAULT_SIZE))
    }
}

impl Session {
    /// Start a game on an empty `size` x `size` board.
    pub fn new(size: usize) -> Result<Self, SessionError> {
        Position::new(size)
            .map(Self::from_position)
            .ok_or(SessionError::InvalidSize(size))
    }

    /// Start from an arbitrary position with empty undo/redo history.
    pub fn from_position(position: Position) -> Self {
        Session {
            position,
            result: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            phase: Phase::Play,
            setup_tool: SetupTool::default(),
            setup_edited: false,
        }
    }

    // -- Accessors --

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn size(&self) -> usize {
        self.position.size()
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn setup_tool(&self) -> SetupTool {
        self.setup_tool
    }

    pub fn is_over(&self) -> bool {
        self.position.is_game_over()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Read-only view for analysis collaborators.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.position)
    }

    // -- Transitions --

    fn commit(&mut self, next: Position, result: Option<GameResult>) {
        let prev = Frame {
            position: std::mem::replace(&mut self.position, next),
            result: std::mem::replace(&mut self.result, result),
        };
        self.undo_stack.push(prev);
        self.redo_stack.clear();
    }

    /// Click on an intersection.
    ///
    /// In play this is a normal move for the side to move. During setup the
    /// active [`SetupTool`] decides: alternating play goes through the rules,
    /// the forced tools edit the board directly.
    pub fn play_move(&mut self, pt: Point) -> Result<(), SessionError> {
        let forced = match self.phase {
            Phase::Play => None,
            Phase::Setup => self.setup_tool.forced_cell(),
        };
        match forced {
            None => {
                let next = attempt_place(&self.position, pt)?;
                self.commit(next, None);
            }
            Some(cell) => {
                let next = force_place(&self.position, pt, cell)?;
                self.setup_edited = true;
                self.commit(next, None);
            }
        }
        Ok(())
    }

    /// Apply a move computed elsewhere (remote engine, local search, game record).
    ///
    /// Validation is identical to a local click.
    pub fn apply_external_move(&mut self, mv: Move) -> Result<(), SessionError> {
        match mv {
            Move::Play(pt) => self.play_move(pt),
            Move::Pass => self.pass(),
        }
    }

    /// Parse a text coordinate (`D4`, `pass`) and apply it.
    pub fn apply_external_str(&mut self, coord: &str) -> Result<Move, SessionError> {
        let mv = parse_coord(coord, self.size())?;
        self.apply_external_move(mv)?;
        Ok(mv)
    }

    /// Pass for the side to move. A second consecutive pass scores the game.
    pub fn pass(&mut self) -> Result<(), SessionError> {
        if self.phase == Phase::Setup {
            return Err(SessionError::SetupPhase);
        }
        let next = position::pass(&self.position)?;
        let result = next.is_game_over().then(|| {
            let score = score(&next);
            GameResult {
                winner: score.winner,
                reason: ResultReason::Scoring,
                score,
            }
        });
        if let Some(r) = &result {
            info!(
                "game over by scoring: {} (B {} / W {})",
                r.result_string(),
                r.score.black.total,
                r.score.white.total
            );
        }
        self.commit(next, result);
        Ok(())
    }

    /// `color` resigns. The board is still scored so it can be shown.
    pub fn resign(&mut self, color: Color) -> Result<(), SessionError> {
        if self.phase == Phase::Setup {
            return Err(SessionError::SetupPhase);
        }
        if self.position.is_game_over() {
            return Err(MoveError::GameOver.into());
        }
        let mut next = self.position.clone();
        next.finish();
        let result = GameResult {
            winner: color.opp(),
            reason: ResultReason::Resignation,
            score: score(&next),
        };
        info!("{color} resigns at move {}", next.move_number());
        self.commit(next, Some(result));
        Ok(())
    }

    /// Step back one action. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(frame) = self.undo_stack.pop() else {
            return false;
        };
        let current = Frame {
            position: std::mem::replace(&mut self.position, frame.position),
            result: std::mem::replace(&mut self.result, frame.result),
        };
        self.redo_stack.push(current);
        debug!("undo to move {}", self.position.move_number());
        true
    }

    /// Re-apply the last undone action. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(frame) = self.redo_stack.pop() else {
            return false;
        };
        let current = Frame {
            position: std::mem::replace(&mut self.position, frame.position),
            result: std::mem::replace(&mut self.result, frame.result),
        };
        self.undo_stack.push(current);
        debug!("redo to move {}", self.position.move_number());
        true
    }

    /// Throw everything away and start over, on a new size if given.
    pub fn reset(&mut self, size: Option<usize>) -> Result<(), SessionError> {
        let size = size.unwrap_or(self.size());
        *self = Session::new(size)?;
        Ok(())
    }

    pub fn enter_setup(&mut self) {
        if self.phase == Phase::Setup {
            return;
        }
        self.phase = Phase::Setup;
        self.setup_edited = false;
    }

    /// Leave setup. After any forced edit the edited board becomes the new
    /// baseline and both history stacks are dropped.
    pub fn exit_setup(&mut self) {
        if self.phase != Phase::Setup {
            return;
        }
        self.phase = Phase::Play;
        if self.setup_edited {
            self.undo_stack.clear();
            self.redo_stack.clear();
            self.setup_edited = false;
        }
    }

    pub fn set_setup_tool(&mut self, tool: SetupTool) {
        self.setup_tool = tool;
    }

    /// Change the side to move on a position with no recorded plies.
    pub(crate) fn set_baseline_turn(&mut self, turn: Color) {
        if self.position.history().is_empty() {
            self.position = self.position.clone().with_turn(turn);
        }
    }
}
