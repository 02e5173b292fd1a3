//! Constants for board dimensions, search parameters, and scoring.
//!
//! Board size is chosen at runtime (see [`crate::session::Session::reset`]),
//! so these are defaults and limits rather than compile-time geometry.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN) when none is given.
pub const DEFAULT_SIZE: usize = 19;

/// Smallest supported board.
pub const MIN_SIZE: usize = 2;

/// Largest supported board. Column letters run A-Z without I, which gives 25.
pub const MAX_SIZE: usize = 25;

/// Column letters used by the text coordinate format.
pub const COLUMN_LETTERS: &[u8; MAX_SIZE] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Text used for a pass in both coordinate formats that have one.
pub const PASS_STR: &str = "pass";

// =============================================================================
// Scoring
// =============================================================================

/// Komi is fixed at zero for area scoring.
pub const KOMI: f64 = 0.0;

// =============================================================================
// Move Search Parameters
// =============================================================================

/// Default number of playouts per candidate move.
pub const N_SIMS: usize = 30;

/// Default seed for the playout RNG.
pub const DEFAULT_SEED: u64 = 0x5EED_600D;

/// Playouts stop after `size * size * PLAYOUT_CAP_NUM / PLAYOUT_CAP_DEN` plies (1.5 N²).
pub const PLAYOUT_CAP_NUM: usize = 3;
pub const PLAYOUT_CAP_DEN: usize = 2;

/// Multiplier used to spread per-candidate seeds apart (golden ratio, 64-bit).
pub const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Maximum number of plies in a single playout on a board of the given size.
#[inline]
pub const fn playout_cap(size: usize) -> usize {
    size * size * PLAYOUT_CAP_NUM / PLAYOUT_CAP_DEN
}

/// Whether `size` is a board size this engine accepts.
#[inline]
pub const fn is_supported_size(size: usize) -> bool {
    size >= MIN_SIZE && size <= MAX_SIZE
}
