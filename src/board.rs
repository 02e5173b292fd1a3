//! Board storage and group traversal.
//!
//! The board is a flat arena of `size * size` cells indexed by `y * size + x`.
//! Groups and liberties are never stored; they are recomputed by a
//! breadth-first flood fill whenever the rules engine asks for them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{COLUMN_LETTERS, is_supported_size};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opp(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Single-letter form used by GTP and SGF.
    pub fn letter(self) -> char {
        match self {
            Color::Black => 'B',
            Color::White => 'W',
        }
    }

    /// Accepts `b`/`w` and `black`/`white`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Some(Color::Black),
            "w" | "white" => Some(Color::White),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

/// An intersection as `(x, y)`, with `(0, 0)` in the top-left corner.
pub type Point = (usize, usize);

/// A ply: either a stone placement or a pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Play(Point),
    Pass,
}

impl Move {
    pub fn point(self) -> Option<Point> {
        match self {
            Move::Play(pt) => Some(pt),
            Move::Pass => None,
        }
    }

    pub fn is_pass(self) -> bool {
        self == Move::Pass
    }
}

/// Reusable traversal state.
///
/// Visited marks are epoch-stamped, so starting a new traversal is O(1)
/// instead of clearing an array per query.
#[derive(Clone, Debug, Default)]
pub struct Scratch {
    seen: Vec<u32>,
    libs: Vec<u32>,
    epoch: u32,
    group: Vec<usize>,
}

impl Scratch {
    pub fn new(cells: usize) -> Self {
        Self {
            seen: vec![0; cells],
            libs: vec![0; cells],
            epoch: 0,
            group: Vec::with_capacity(cells),
        }
    }

    fn begin(&mut self, cells: usize) -> u32 {
        if self.seen.len() != cells {
            self.seen = vec![0; cells];
            self.libs = vec![0; cells];
            self.epoch = 0;
        }
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            self.seen.fill(0);
            self.libs.fill(0);
            self.epoch = 1;
        }
        self.group.clear();
        self.epoch
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Color>>,
}

impl Board {
    /// Empty board. Public callers go through [`Position::new`](crate::position::Position::new),
    /// which checks the size.
    pub(crate) fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Build a board from text rows: `X`/`B` black, `O`/`W` white, anything else empty.
    ///
    /// Returns `None` unless the rows form a square of a supported size.
    pub fn from_layout(rows: &[&str]) -> Option<Self> {
        let size = rows.len();
        if !is_supported_size(size) || rows.iter().any(|r| r.chars().count() != size) {
            return None;
        }
        let cells = rows
            .iter()
            .flat_map(|r| r.chars())
            .map(|c| match c {
                'X' | 'B' => Some(Color::Black),
                'O' | 'W' => Some(Color::White),
                _ => None,
            })
            .collect();
        Some(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of intersections.
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn idx(&self, (x, y): Point) -> usize {
        y * self.size + x
    }

    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        (idx % self.size, idx / self.size)
    }

    #[inline]
    pub fn on_board(&self, (x, y): Point) -> bool {
        x < self.size && y < self.size
    }

    pub fn get(&self, pt: Point) -> Option<Color> {
        if !self.on_board(pt) {
            return None;
        }
        self.cells[self.idx(pt)]
    }

    #[inline]
    pub(crate) fn at(&self, idx: usize) -> Option<Color> {
        self.cells[idx]
    }

    #[inline]
    pub(crate) fn set(&mut self, idx: usize, cell: Option<Color>) {
        self.cells[idx] = cell;
    }

    /// Orthogonal neighbors of a cell index that lie on the board.
    #[inline]
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + use<> {
        let s = self.size;
        let (x, y) = (idx % s, idx / s);
        [
            (x > 0).then(|| idx - 1),
            (x + 1 < s).then(|| idx + 1),
            (y > 0).then(|| idx - s),
            (y + 1 < s).then(|| idx + s),
        ]
        .into_iter()
        .flatten()
    }

    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Every stone on the board in row-major order.
    pub fn stones(&self) -> impl Iterator<Item = (Point, Color)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|c| (self.point(i), c)))
    }

    /// Every empty intersection in row-major order.
    pub fn empty_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| self.point(i))
    }

    /// Flood-fill the group at `start` into `scratch.group`, returning its liberty count.
    ///
    /// An empty start cell yields an empty group with zero liberties.
    fn flood(&self, start: usize, scratch: &mut Scratch) -> usize {
        let epoch = scratch.begin(self.cells.len());
        let Some(color) = self.cells[start] else {
            return 0;
        };
        scratch.seen[start] = epoch;
        scratch.group.push(start);

        let mut libs = 0;
        let mut head = 0;
        while head < scratch.group.len() {
            let cur = scratch.group[head];
            head += 1;
            for n in self.neighbors(cur) {
                match self.cells[n] {
                    None => {
                        if scratch.libs[n] != epoch {
                            scratch.libs[n] = epoch;
                            libs += 1;
                        }
                    }
                    Some(c) if c == color && scratch.seen[n] != epoch => {
                        scratch.seen[n] = epoch;
                        scratch.group.push(n);
                    }
                    _ => {}
                }
            }
        }
        libs
    }

    /// Number of distinct empty points adjacent to the group at `idx`.
    pub fn liberties(&self, idx: usize, scratch: &mut Scratch) -> usize {
        self.flood(idx, scratch)
    }

    /// Cell indices of the group at `idx`, valid until `scratch` is reused.
    pub fn group<'s>(&self, idx: usize, scratch: &'s mut Scratch) -> &'s [usize] {
        self.flood(idx, scratch);
        &scratch.group
    }

    /// Remove the group at `idx` and return how many stones were taken off.
    pub(crate) fn remove_group(&mut self, idx: usize, scratch: &mut Scratch) -> u32 {
        self.flood(idx, scratch);
        for &i in &scratch.group {
            self.cells[i] = None;
        }
        scratch.group.len() as u32
    }

    /// Points of the group containing `pt` (empty if `pt` is empty or off the board).
    pub fn group_points(&self, pt: Point) -> Vec<Point> {
        if !self.on_board(pt) {
            return Vec::new();
        }
        let mut scratch = Scratch::new(self.cells.len());
        self.group(self.idx(pt), &mut scratch)
            .iter()
            .map(|&i| self.point(i))
            .collect()
    }

    /// Liberty count of the group containing `pt`.
    pub fn group_liberties(&self, pt: Point) -> usize {
        if !self.on_board(pt) {
            return 0;
        }
        let mut scratch = Scratch::new(self.cells.len());
        self.liberties(self.idx(pt), &mut scratch)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for x in 0..self.size {
            write!(f, "{} ", COLUMN_LETTERS[x] as char)?;
        }
        writeln!(f)?;
        for y in 0..self.size {
            write!(f, "{:>2} ", self.size - y)?;
            for x in 0..self.size {
                let ch = match self.get((x, y)) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
