//! Minimal SGF reading and writing for [`GameRecord`]s.
//!
//! Only the main line (first variation at every branch) is read, and only
//! `SZ`, `AB`, `AW`, `PL`, `B` and `W` carry meaning; every other property
//! is skipped.

use std::fmt::Write as _;

use crate::board::{Color, Move, Point};
use crate::coord::{parse_sgf_coord, sgf_coord};
use crate::error::{CoordError, RecordError};
use crate::record::{GameRecord, RecordedMove};

type Property = (String, Vec<String>);

/// Write a record as an SGF game tree.
///
/// Fails if a setup stone or ply lies outside the record's board.
pub fn to_sgf(record: &GameRecord) -> Result<String, RecordError> {
    let mut out = String::new();
    let _ = write!(out, "(;GM[1]FF[4]SZ[{}]", record.size);
    for color in [Color::Black, Color::White] {
        let points: Vec<&Point> = record
            .setup
            .iter()
            .filter(|(_, c)| *c == color)
            .map(|(pt, _)| pt)
            .collect();
        if !points.is_empty() {
            let _ = write!(out, "A{}", color.letter());
            for &&pt in &points {
                let _ = write!(out, "[{}]", sgf_coord(Move::Play(pt), record.size)?);
            }
        }
    }
    if let Some(c) = record.to_play {
        let _ = write!(out, "PL[{}]", c.letter());
    }
    for m in &record.moves {
        let _ = write!(out, ";{}[{}]", m.color.letter(), sgf_coord(m.mv, record.size)?);
    }
    out.push(')');
    Ok(out)
}

/// Read the main line of the first game tree in `text`.
pub fn parse_sgf(text: &str) -> Result<GameRecord, RecordError> {
    let nodes = main_line(text)?;
    let Some((root, rest)) = nodes.split_first() else {
        return Err(malformed("game tree has no nodes"));
    };

    let size = match root.iter().find(|(id, _)| id == "SZ") {
        Some((_, values)) => parse_size(values)?,
        None => 19,
    };
    let mut record = GameRecord::new(size);

    for (id, values) in root {
        match id.as_str() {
            "AB" => add_setup(&mut record, values, Color::Black)?,
            "AW" => add_setup(&mut record, values, Color::White)?,
            "PL" => {
                let v = values.first().map(String::as_str).unwrap_or("");
                record.to_play =
                    Some(Color::parse(v).ok_or_else(|| malformed(&format!("bad PL value {v:?}")))?);
            }
            _ => {}
        }
    }
    if let Some(m) = node_move(root, size)? {
        record.moves.push(m);
    }

    for node in rest {
        if node.iter().any(|(id, _)| id == "AB" || id == "AW" || id == "AE") {
            return Err(malformed("setup properties after the root node"));
        }
        if let Some(m) = node_move(node, size)? {
            record.moves.push(m);
        }
    }
    Ok(record)
}

fn malformed(msg: &str) -> RecordError {
    RecordError::Malformed(msg.to_string())
}

fn parse_size(values: &[String]) -> Result<usize, RecordError> {
    let v = values.first().map(String::as_str).unwrap_or("");
    let bad = || malformed(&format!("bad SZ value {v:?}"));
    let size = match v.split_once(':') {
        Some((cols, rows)) if cols.trim() == rows.trim() => cols.trim().parse().map_err(|_| bad())?,
        Some(_) => return Err(RecordError::Malformed(format!("non-square board {v:?}"))),
        None => v.trim().parse().map_err(|_| bad())?,
    };
    Ok(size)
}

/// `AB`/`AW` values are single points or `aa:cc` rectangles.
fn add_setup(record: &mut GameRecord, values: &[String], color: Color) -> Result<(), RecordError> {
    for v in values {
        let (from, to) = v.split_once(':').unwrap_or((v, v));
        let (Move::Play((x0, y0)), Move::Play((x1, y1))) = (
            parse_sgf_coord(from, record.size)?,
            parse_sgf_coord(to, record.size)?,
        ) else {
            return Err(CoordError::Malformed(v.clone()).into());
        };
        for y in y0.min(y1)..=y0.max(y1) {
            for x in x0.min(x1)..=x0.max(x1) {
                record.setup.push(((x, y), color));
            }
        }
    }
    Ok(())
}

fn node_move(node: &[Property], size: usize) -> Result<Option<RecordedMove>, RecordError> {
    for (id, values) in node {
        let color = match id.as_str() {
            "B" => Color::Black,
            "W" => Color::White,
            _ => continue,
        };
        let v = values.first().map(String::as_str).unwrap_or("");
        let mv = parse_sgf_coord(v, size)?;
        return Ok(Some(RecordedMove { color, mv }));
    }
    Ok(None)
}

/// Collect the nodes of the main line. Reading stops at the first `)`,
/// which closes either the first variation or the whole tree.
fn main_line(text: &str) -> Result<Vec<Vec<Property>>, RecordError> {
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '(' {
            break;
        }
        if !c.is_whitespace() {
            return Err(malformed(&format!("expected '(' but found {c:?}")));
        }
    }

    let mut nodes: Vec<Vec<Property>> = Vec::new();
    let mut closed = false;
    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            ';' => nodes.push(Vec::new()),
            '(' => {}
            ')' => {
                closed = true;
                break;
            }
            c if c.is_ascii_uppercase() => {
                let mut id = String::from(c);
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_alphabetic() {
                        if n.is_ascii_uppercase() {
                            id.push(n);
                        }
                        chars.next();
                    } else {
                        break;
                    }
                }
                let mut values = Vec::new();
                loop {
                    while chars.next_if(|c| c.is_whitespace()).is_some() {}
                    if chars.next_if_eq(&'[').is_none() {
                        break;
                    }
                    values.push(read_value(&mut chars)?);
                }
                if values.is_empty() {
                    return Err(malformed(&format!("property {id} has no value")));
                }
                let node = nodes
                    .last_mut()
                    .ok_or_else(|| malformed("property before the first node"))?;
                node.push((id, values));
            }
            other => return Err(malformed(&format!("unexpected character {other:?}"))),
        }
    }

    if !closed {
        return Err(malformed("unexpected end of input"));
    }
    Ok(nodes)
}

fn read_value(chars: &mut impl Iterator<Item = char>) -> Result<String, RecordError> {
    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => value.push(escaped),
                None => break,
            },
            ']' => return Ok(value),
            c => value.push(c),
        }
    }
    Err(malformed("unterminated property value"))
}
