use std::fmt;
use std::iter::FromIterator;

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Candidate order the generator shuffles before exploring a cell's neighbours.
    pub const ALL: [Direction; 4] = [Direction::East,
                                     Direction::West,
                                     Direction::South,
                                     Direction::North];

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Unit step in grid space, y grows southwards.
    #[inline]
    pub fn coordinate_delta(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    #[inline]
    pub fn is_vertical(self) -> bool {
        self == Direction::North || self == Direction::South
    }

    /// True if neither this direction nor its opposite is in `dirs`, i.e. a corridor
    /// heading this way would cross the set's passages at a right angle.
    #[inline]
    pub fn is_perpendicular_to(self, dirs: DirectionSet) -> bool {
        let axis = DirectionSet::bit(self) | DirectionSet::bit(self.opposite());
        dirs.0 & axis == 0
    }

    pub fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A set of directions packed into the low 4 bits of a byte.
#[derive(Eq, PartialEq, Copy, Clone, Default, Hash)]
pub struct DirectionSet(u8);

const ALL_BITS: u8 = 0b1111;

// Iteration order of a set.
const ORDERED: [Direction; 4] = [Direction::North,
                                 Direction::East,
                                 Direction::South,
                                 Direction::West];

impl DirectionSet {
    #[inline]
    pub fn empty() -> DirectionSet {
        DirectionSet(0)
    }

    #[inline]
    pub fn all() -> DirectionSet {
        DirectionSet(ALL_BITS)
    }

    #[inline]
    fn bit(dir: Direction) -> u8 {
        match dir {
            Direction::North => 0b0001,
            Direction::East => 0b0010,
            Direction::South => 0b0100,
            Direction::West => 0b1000,
        }
    }

    /// Adds `dir`, returning true if it was not already present.
    #[inline]
    pub fn insert(&mut self, dir: Direction) -> bool {
        let was_absent = !self.contains(dir);
        self.0 |= DirectionSet::bit(dir);
        was_absent
    }

    #[inline]
    pub fn remove(&mut self, dir: Direction) -> bool {
        let was_present = self.contains(dir);
        self.0 &= !DirectionSet::bit(dir);
        was_present
    }

    #[inline]
    pub fn contains(&self, dir: Direction) -> bool {
        self.0 & DirectionSet::bit(dir) != 0
    }

    #[inline]
    pub fn complement(&self) -> DirectionSet {
        DirectionSet(!self.0 & ALL_BITS)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> DirectionSetIter {
        DirectionSetIter {
            set: *self,
            position: 0,
        }
    }
}

impl fmt::Debug for DirectionSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = DirectionSet::empty();
        for dir in iter {
            set.insert(dir);
        }
        set
    }
}

impl<'a> IntoIterator for &'a DirectionSet {
    type Item = Direction;
    type IntoIter = DirectionSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct DirectionSetIter {
    set: DirectionSet,
    position: usize,
}

impl Iterator for DirectionSetIter {
    type Item = Direction;

    fn next(&mut self) -> Option<Direction> {
        while self.position < ORDERED.len() {
            let dir = ORDERED[self.position];
            self.position += 1;
            if self.set.contains(dir) {
                return Some(dir);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools;

    #[test]
    fn opposite_is_an_involution() {
        for dir in &Direction::ALL {
            assert_eq!(dir.opposite().opposite(), *dir);
            assert_ne!(dir.opposite(), *dir);
        }
    }

    #[test]
    fn deltas_are_unit_steps() {
        assert_eq!(Direction::North.coordinate_delta(), (0, -1));
        assert_eq!(Direction::East.coordinate_delta(), (1, 0));
        assert_eq!(Direction::South.coordinate_delta(), (0, 1));
        assert_eq!(Direction::West.coordinate_delta(), (-1, 0));

        for dir in &Direction::ALL {
            let (dx, dy) = dir.coordinate_delta();
            let (ox, oy) = dir.opposite().coordinate_delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn perpendicular_to_set() {
        let empty = DirectionSet::empty();
        assert!(Direction::ALL.iter().all(|d| d.is_perpendicular_to(empty)));

        let north_only: DirectionSet = [Direction::North].iter().cloned().collect();
        assert!(!Direction::North.is_perpendicular_to(north_only));
        assert!(!Direction::South.is_perpendicular_to(north_only));
        assert!(Direction::East.is_perpendicular_to(north_only));
        assert!(Direction::West.is_perpendicular_to(north_only));

        let corner: DirectionSet = [Direction::North, Direction::East].iter().cloned().collect();
        assert!(Direction::ALL.iter().all(|d| !d.is_perpendicular_to(corner)));
    }

    #[test]
    fn set_insert_remove() {
        let mut dirs = DirectionSet::empty();
        assert!(dirs.is_empty());
        assert!(dirs.insert(Direction::West));
        assert!(!dirs.insert(Direction::West));
        assert!(dirs.insert(Direction::North));
        assert_eq!(dirs.len(), 2);
        assert!(dirs.contains(Direction::West));
        assert!(!dirs.contains(Direction::East));

        assert!(dirs.remove(Direction::West));
        assert!(!dirs.remove(Direction::West));
        assert_eq!(dirs.iter().collect_vec(), vec![Direction::North]);
    }

    #[test]
    fn complement_partitions_all_directions() {
        let open: DirectionSet = [Direction::South, Direction::East].iter().cloned().collect();
        let closed = open.complement();
        assert_eq!(closed.iter().collect_vec(), vec![Direction::North, Direction::West]);
        assert_eq!(open.len() + closed.len(), 4);
        assert_eq!(DirectionSet::all().complement(), DirectionSet::empty());
    }

    #[test]
    fn set_iterates_in_compass_order() {
        let dirs: DirectionSet = Direction::ALL.iter().cloned().collect();
        assert_eq!(dirs, DirectionSet::all());
        assert_eq!(dirs.iter().map(Direction::letter).collect::<String>(), "NESW");
        assert_eq!(format!("{:?}", DirectionSet::empty()), "{}");
    }
}
