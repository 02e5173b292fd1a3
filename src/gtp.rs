//! Go Text Protocol (GTP) implementation.
//!
//! GTP is a text-based protocol for communicating with Go-playing programs.
//! This module implements GTP version 2 on top of a [`Session`], so moves
//! from a GUI are checked exactly like any other caller's moves.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - Start a new game on a board of that size
//! - `clear_board` - Reset the board to empty
//! - `komi <value>` - Accepted but ignored: komi is fixed at 0
//! - `play <color> <vertex>` - Play a move
//! - `genmove <color>` - Search, play and report a move
//! - `undo` - Take back the last action
//! - `final_score` - Area score of the current board
//! - `showboard` - Print the board
//!
//! ## Example
//!
//! ```ignore
//! use tengen::gtp::GtpEngine;
//! let mut engine = GtpEngine::new();
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use log::{debug, warn};

use crate::board::{Color, Move};
use crate::constants::KOMI;
use crate::coord::str_coord;
use crate::error::SessionError;
use crate::scoring::score;
use crate::search::{SearchConfig, SearchOutcome, Searcher};
use crate::session::Session;

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "final_score",
    "genmove",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "undo",
    "version",
];

/// GTP engine state.
pub struct GtpEngine {
    session: Session,
    search: SearchConfig,
}

impl Default for GtpEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GtpEngine {
    /// Create a new GTP engine with default settings.
    pub fn new() -> Self {
        Self::with_config(Session::default(), SearchConfig::default())
    }

    pub fn with_config(session: Session, search: SearchConfig) -> Self {
        Self { session, search }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the GTP command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!("gtp <- {command_line}");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(stdout, "{prefix}{id_str} {message}\n\n")?;
            stdout.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<usize>() {
                    Ok(size) => match self.session.reset(Some(size)) {
                        Ok(()) => (true, String::new()),
                        Err(_) => (false, "unacceptable size".to_string()),
                    },
                    Err(_) => (false, "invalid size".to_string()),
                }
            }

            "clear_board" => match self.session.reset(None) {
                Ok(()) => (true, String::new()),
                Err(e) => (false, e.to_string()),
            },

            "komi" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<f64>() {
                    Ok(komi) => {
                        if komi != KOMI {
                            warn!("ignoring komi {komi}: scoring uses {KOMI}");
                        }
                        (true, String::new())
                    }
                    Err(_) => (false, "invalid komi".to_string()),
                }
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let Some(color) = Color::parse(args[0]) else {
                    return (false, "invalid color".to_string());
                };
                if color != self.session.position().turn() {
                    return (false, "illegal move: out of turn".to_string());
                }
                match self.session.apply_external_str(args[1]) {
                    Ok(_) => (true, String::new()),
                    Err(SessionError::Coord(_)) => (false, "invalid vertex".to_string()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => {
                let Some(color) = args.first().and_then(|a| Color::parse(a)) else {
                    return (false, "invalid color".to_string());
                };
                if color != self.session.position().turn() {
                    return (false, "illegal move: out of turn".to_string());
                }
                self.genmove()
            }

            "undo" => {
                if self.session.undo() {
                    (true, String::new())
                } else {
                    (false, "cannot undo".to_string())
                }
            }

            "final_score" => (true, score(self.session.position()).result_string()),

            "showboard" => (true, format!("\n{}", self.session.position())),

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn genmove(&mut self) -> (bool, String) {
        let pos = self.session.position();

        // If opponent passed and we're past the opening, pass too
        if pos.last_was_pass() && pos.move_number() > 2 {
            return self.play_pass();
        }

        match Searcher::new(self.search).select_move(pos) {
            SearchOutcome::Move(pt) => {
                let vertex = match str_coord(Move::Play(pt), self.session.size()) {
                    Ok(v) => v,
                    Err(e) => return (false, e.to_string()),
                };
                match self.session.play_move(pt) {
                    Ok(()) => (true, vertex),
                    Err(e) => (false, e.to_string()),
                }
            }
            SearchOutcome::Pass => self.play_pass(),
            SearchOutcome::Cancelled => (false, "search cancelled".to_string()),
        }
    }

    fn play_pass(&mut self) -> (bool, String) {
        match self.session.pass() {
            Ok(()) => (true, "pass".to_string()),
            Err(e) => (false, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_engine() -> GtpEngine {
        let search = SearchConfig {
            simulations: 2,
            seed: 1,
        };
        GtpEngine::with_config(Session::new(5).unwrap(), search)
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = GtpEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = GtpEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_name_command() {
        let mut engine = GtpEngine::new();
        let (success, response) = engine.execute("name", &[]);
        assert!(success);
        assert_eq!(response, "tengen");
    }

    #[test]
    fn test_protocol_version() {
        let mut engine = GtpEngine::new();
        let (success, response) = engine.execute("protocol_version", &[]);
        assert!(success);
        assert_eq!(response, "2");
    }

    #[test]
    fn test_known_command() {
        let mut engine = GtpEngine::new();

        let (success, response) = engine.execute("known_command", &["undo"]);
        assert!(success);
        assert_eq!(response, "true");

        let (success, response) = engine.execute("known_command", &["unknown_cmd"]);
        assert!(success);
        assert_eq!(response, "false");
    }

    #[test]
    fn test_boardsize() {
        let mut engine = GtpEngine::new();

        let (success, _) = engine.execute("boardsize", &["9"]);
        assert!(success);
        assert_eq!(engine.session().size(), 9);

        let (success, _) = engine.execute("boardsize", &["26"]);
        assert!(!success);
        assert_eq!(engine.session().size(), 9);
    }

    #[test]
    fn test_play_and_clear() {
        let mut engine = GtpEngine::new();

        let (success, _) = engine.execute("play", &["black", "D4"]);
        assert!(success);

        let (success, _) = engine.execute("play", &["white", "D4"]);
        assert!(!success);

        let (success, _) = engine.execute("clear_board", &[]);
        assert!(success);
        assert_eq!(engine.session().position().move_number(), 0);
    }

    #[test]
    fn test_play_rejects_bad_vertex_and_color() {
        let mut engine = small_engine();
        assert_eq!(engine.execute("play", &["b", "Z9"]).1, "invalid vertex");
        assert_eq!(engine.execute("play", &["x", "A1"]).1, "invalid color");
        assert!(!engine.execute("play", &["w", "A1"]).0);
    }

    #[test]
    fn test_genmove_plays_for_side_to_move() {
        let mut engine = small_engine();
        let (success, response) = engine.execute("genmove", &["b"]);
        assert!(success, "{response}");
        assert_eq!(engine.session().position().move_number(), 1);
        assert_eq!(engine.session().position().turn(), Color::White);
        assert!(!engine.execute("genmove", &["b"]).0);
    }

    #[test]
    fn test_genmove_answers_pass_with_pass() {
        let mut engine = small_engine();
        engine.execute("play", &["b", "C3"]);
        engine.execute("play", &["w", "pass"]);
        engine.execute("play", &["b", "A1"]);
        engine.execute("play", &["w", "pass"]);
        let (success, response) = engine.execute("genmove", &["b"]);
        assert!(success);
        assert_eq!(response, "pass");
        assert!(engine.session().is_over());
    }

    #[test]
    fn test_undo_and_final_score() {
        let mut engine = small_engine();
        assert!(!engine.execute("undo", &[]).0);
        engine.execute("play", &["b", "C3"]);
        assert_eq!(engine.execute("final_score", &[]).1, "B+25");
        assert!(engine.execute("undo", &[]).0);
        assert_eq!(engine.execute("final_score", &[]).1, "0");
    }

    #[test]
    fn test_komi_accepted() {
        let mut engine = small_engine();
        assert!(engine.execute("komi", &["6.5"]).0);
        assert!(!engine.execute("komi", &["lots"]).0);
    }
}
