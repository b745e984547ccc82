use std::convert::From;
use std::fmt;

use crate::directions::{Direction, DirectionSet};

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

/// State of one maze cell.
///
/// Only the generator writes to a cell. Once generation is done the cell is read-only input to
/// the renderers.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Default)]
pub struct MazeCell {
    open_directions: DirectionSet,
    visited: bool,
    weaved: bool,
    sequence_number: u32,
}

impl MazeCell {
    #[inline]
    pub fn open_directions(&self) -> DirectionSet {
        self.open_directions
    }

    #[inline]
    pub fn is_open(&self, dir: Direction) -> bool {
        self.open_directions.contains(dir)
    }

    #[inline]
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Does another corridor pass underneath this cell?
    #[inline]
    pub fn is_weaved(&self) -> bool {
        self.weaved
    }

    /// Order in which the generator first entered the cell, starting at 1. Zero if unvisited.
    #[inline]
    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    /// Debugging label: the sequence number followed by the open direction letters, e.g. `"12NS"`.
    pub fn label(&self) -> String {
        let mut text = self.sequence_number.to_string();
        text.extend(self.open_directions.iter().map(Direction::letter));
        text
    }

    #[inline]
    pub(crate) fn open(&mut self, dir: Direction) {
        self.open_directions.insert(dir);
    }

    #[inline]
    pub(crate) fn mark_visited(&mut self, sequence_number: u32) {
        self.visited = true;
        self.sequence_number = sequence_number;
    }

    #[inline]
    pub(crate) fn mark_weaved(&mut self) {
        self.weaved = true;
    }
}

impl fmt::Display for MazeCell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
