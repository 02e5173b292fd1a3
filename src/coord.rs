//! Coordinate serialization.
//!
//! Two text forms are supported:
//! - GTP style: a column letter A-Z skipping I, then the row counted from the
//!   far edge (`row = size - y`), so `(0, 0)` on 9x9 is `A9`. `pass` is the sentinel.
//! - SGF style: two lowercase letters `xy` from `aa`, with an empty value
//!   (or `tt` on boards up to 19) meaning pass.
//!
//! Parsing is the boundary where bad input is turned away: anything
//! returned from here is on the board.

use crate::board::{Move, Point};
use crate::constants::{COLUMN_LETTERS, MAX_SIZE, PASS_STR};
use crate::error::CoordError;

/// Convert a move to GTP text (e.g. `D4`, `pass`).
///
/// # Errors
/// [`CoordError::OutOfBounds`] if the point is not on a `size` board.
pub fn str_coord(mv: Move, size: usize) -> Result<String, CoordError> {
    match mv {
        Move::Pass => Ok(PASS_STR.into()),
        Move::Play((x, y)) if x < size && y < size && size <= MAX_SIZE => {
            Ok(format!("{}{}", COLUMN_LETTERS[x] as char, size - y))
        }
        Move::Play((x, y)) => Err(CoordError::OutOfBounds {
            coord: format!("({x}, {y})"),
            size,
        }),
    }
}

/// Parse GTP text such as `D4` or `pass` for a board of the given size.
pub fn parse_coord(s: &str, size: usize) -> Result<Move, CoordError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case(PASS_STR) {
        return Ok(Move::Pass);
    }

    let malformed = || CoordError::Malformed(s.to_string());
    let (head, digits) = s.split_at_checked(1).ok_or_else(malformed)?;
    let col_char = head.as_bytes()[0].to_ascii_uppercase();
    let x = COLUMN_LETTERS
        .iter()
        .position(|&c| c == col_char)
        .ok_or_else(malformed)?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let row: usize = digits.parse().map_err(|_| malformed())?;

    if x >= size || row == 0 || row > size {
        return Err(CoordError::OutOfBounds {
            coord: s.to_string(),
            size,
        });
    }
    Ok(Move::Play((x, size - row)))
}

/// Parse GTP text that must name an intersection (a pass is rejected).
pub fn parse_point(s: &str, size: usize) -> Result<Point, CoordError> {
    match parse_coord(s, size)? {
        Move::Play(pt) => Ok(pt),
        Move::Pass => Err(CoordError::Malformed(s.to_string())),
    }
}

/// Convert a move to SGF text (`aa`.., empty for pass).
///
/// # Errors
/// [`CoordError::OutOfBounds`] if the point is not on a `size` board.
pub fn sgf_coord(mv: Move, size: usize) -> Result<String, CoordError> {
    match mv {
        Move::Pass => Ok(String::new()),
        Move::Play((x, y)) if x < size && y < size && size <= MAX_SIZE => {
            let mut s = String::with_capacity(2);
            s.push((b'a' + x as u8) as char);
            s.push((b'a' + y as u8) as char);
            Ok(s)
        }
        Move::Play((x, y)) => Err(CoordError::OutOfBounds {
            coord: format!("({x}, {y})"),
            size,
        }),
    }
}

/// Parse an SGF move value. Empty text, or `tt` on boards up to 19, is a pass.
pub fn parse_sgf_coord(s: &str, size: usize) -> Result<Move, CoordError> {
    if s.is_empty() || (s == "tt" && size <= 19) {
        return Ok(Move::Pass);
    }
    let bytes = s.as_bytes();
    if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_lowercase) {
        return Err(CoordError::Malformed(s.to_string()));
    }
    let x = (bytes[0] - b'a') as usize;
    let y = (bytes[1] - b'a') as usize;
    if x >= size || y >= size || size > MAX_SIZE {
        return Err(CoordError::OutOfBounds {
            coord: s.to_string(),
            size,
        });
    }
    Ok(Move::Play((x, y)))
}
