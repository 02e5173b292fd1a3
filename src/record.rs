//! Game records for import/export.
//!
//! A record is a board size, the stones placed before play began and the
//! ordered list of plies. Importing replays the plies through a fresh
//! [`Session`], so a record is accepted only if every ply is legal, and the
//! caller's own session is replaced only after the whole replay succeeds.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::board::{Color, Move, Point};
use crate::error::{RecordError, SessionError};
use crate::position::{Position, force_place};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedMove {
    pub color: Color,
    pub mv: Move,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub size: usize,
    /// Stones on the board before the first ply
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub setup: Vec<(Point, Color)>,
    /// Side to move at the start, when it is not Black
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_play: Option<Color>,
    pub moves: Vec<RecordedMove>,
}

impl GameRecord {
    pub fn new(size: usize) -> Self {
        GameRecord {
            size,
            setup: Vec::new(),
            to_play: None,
            moves: Vec::new(),
        }
    }

    /// Capture the current session's baseline and plies.
    pub fn from_session(session: &Session) -> Self {
        let pos = session.position();
        let moves: Vec<RecordedMove> = pos
            .history()
            .iter()
            .map(|h| RecordedMove {
                color: h.color,
                mv: h.mv,
            })
            .collect();
        let first = moves.first().map_or(pos.turn(), |m| m.color);
        GameRecord {
            size: pos.size(),
            setup: pos.setup().to_vec(),
            to_play: (first != Color::Black).then_some(first),
            moves,
        }
    }

    /// Rebuild a session by replaying the record. Every ply lands on the undo stack.
    pub fn replay(&self) -> Result<Session, RecordError> {
        let mut pos = Position::new(self.size).ok_or(RecordError::InvalidSize(self.size))?;
        for &((x, y), color) in &self.setup {
            pos = force_place(&pos, (x, y), Some(color))
                .map_err(|_| RecordError::SetupOffBoard { x, y })?;
        }
        let mut session = Session::from_position(pos);

        let start = self
            .to_play
            .or_else(|| self.moves.first().map(|m| m.color))
            .unwrap_or(Color::Black);
        session.set_baseline_turn(start);

        for (i, m) in self.moves.iter().enumerate() {
            let ply = i + 1;
            if m.color != session.position().turn() {
                return Err(RecordError::OutOfTurn {
                    ply,
                    color: m.color,
                });
            }
            session.apply_external_move(m.mv).map_err(|e| match e {
                SessionError::Illegal(source) => RecordError::IllegalMove { ply, source },
                other => RecordError::Malformed(format!("ply {ply}: {other}")),
            })?;
        }
        Ok(session)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> Result<Self, RecordError> {
        serde_json::from_str(text).map_err(|e| RecordError::Malformed(e.to_string()))
    }
}

impl Session {
    /// Replace this session with one rebuilt from `record`.
    ///
    /// On failure the session is untouched.
    pub fn load_record(&mut self, record: &GameRecord) -> Result<(), RecordError> {
        match record.replay() {
            Ok(session) => {
                *self = session;
                Ok(())
            }
            Err(e) => {
                warn!("rejected game record: {e}");
                Err(e)
            }
        }
    }

    pub fn to_record(&self) -> GameRecord {
        GameRecord::from_session(self)
    }
}
