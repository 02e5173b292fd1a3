//! Tengen: a small Go engine with a flat Monte Carlo opponent.
//!
//! This crate provides the rules of Go (captures, suicide, passing, area
//! scoring), a game session with undo/redo and board setup, a cancellable
//! flat Monte Carlo move search, and text/SGF/JSON serialization.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits and engine parameters
//! - [`board`] - Stone storage, groups and liberties
//! - [`position`] - Immutable game state and the legality engine
//! - [`scoring`] - Area scoring
//! - [`session`] - Game flow: play, pass, resign, undo/redo, setup
//! - [`playout`] - Random game simulation for position evaluation
//! - [`search`] - Flat Monte Carlo move selection
//! - [`coord`] - `D4`-style and SGF coordinates
//! - [`record`] - Game records and replay
//! - [`sgf`] - SGF reading and writing
//! - [`analysis`] - Snapshots and hint validation for outside analysers
//! - [`gtp`] - Go Text Protocol front end
//!
//! ## Example
//!
//! ```
//! use tengen::coord::parse_coord;
//! use tengen::scoring::score;
//! use tengen::search::{SearchOutcome, select_move};
//! use tengen::session::Session;
//!
//! // Create a new game
//! let mut session = Session::new(9).unwrap();
//!
//! // Play a move
//! session.apply_external_move(parse_coord("E5", 9).unwrap()).unwrap();
//!
//! // Search for the best response
//! if let SearchOutcome::Move(pt) = select_move(session.position(), 4) {
//!     session.play_move(pt).unwrap();
//! }
//! println!("{}", score(session.position()).result_string());
//! ```

pub mod analysis;
pub mod board;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod gtp;
pub mod logging;
pub mod playout;
pub mod position;
pub mod record;
pub mod scoring;
pub mod search;
pub mod session;
pub mod sgf;

pub use board::{Color, Move, Point};
pub use error::{CoordError, MoveError, RecordError, SessionError};
pub use position::{Position, attempt_place, force_place};
pub use scoring::{ScoreResult, score};
pub use search::{SearchOutcome, Searcher};
pub use session::Session;
