use std::hash::Hasher;

use fnv::FnvHasher;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use tracing::{debug, trace};

use crate::cells::Cartesian2DCoordinate;
use crate::directions::Direction;
use crate::errors::*;
use crate::grid::MazeGrid;
use crate::units::{Height, Width};

/// Generate a woven maze of the given size.
///
/// The same seed always reproduces the same maze.
pub fn generate(width: Width, height: Height, seed: u64) -> Result<MazeGrid> {
    let mut grid = MazeGrid::new(width, height)?;
    let mut rng = XorShiftRng::seed_from_u64(seed);
    woven_backtracker(&mut grid, &mut rng);
    debug!(width = width.0, height = height.0, seed, weaves = grid.weaved_count(),
           "generated woven maze");
    Ok(grid)
}

/// Turns a seed given as text into a generator seed.
///
/// Surrounding whitespace is ignored. Integers are used as they are (negative ones wrap), any
/// other text is hashed with FNV-1a.
pub fn seed_from_text(text: &str) -> u64 {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<u64>() {
        n
    } else if let Ok(n) = trimmed.parse::<i64>() {
        n as u64
    } else {
        let mut hasher = FnvHasher::default();
        hasher.write(trimmed.as_bytes());
        hasher.finish()
    }
}

/// Apply the recursive backtracker algorithm, with weaving, to a fresh grid.
///
/// Starting at the centre of the grid it carves passages to unvisited neighbours in a random
/// order, backtracking once a cell has no more options. When a neighbour was already visited
/// and the passage would cross that neighbour's corridor at a right angle, the passage instead
/// tunnels underneath it to the unvisited cell beyond, leaving the crossed cell flagged as weaved.
///
/// Weaving adds crossings but every cell is still entered exactly once, so the logical passages
/// form a spanning tree of the grid.
pub fn woven_backtracker<R: Rng>(grid: &mut MazeGrid, rng: &mut R) {
    let start = grid.centre();
    carve_passages_from(grid, start, rng);
}

// One level of the depth first search: a cell and the remaining directions to try from it.
#[derive(Debug)]
struct Frame {
    coord: Cartesian2DCoordinate,
    directions: [Direction; 4],
    next: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Step {
    Carve(Cartesian2DCoordinate),
    Weave {
        under: Cartesian2DCoordinate,
        beyond: Cartesian2DCoordinate,
    },
}

// Explicit stack rather than call recursion, so the depth is bounded by the heap and not the
// thread stack. Frames consume the rng in the same order the recursive formulation would.
pub(crate) fn carve_passages_from<R: Rng>(grid: &mut MazeGrid,
                                          start: Cartesian2DCoordinate,
                                          rng: &mut R) {
    let mut sequence_number = 0;
    let mut weaves = 0;
    let first = enter_cell(grid, start, None, &mut sequence_number, rng);
    let mut stack = vec![first];

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.directions.len() {
            stack.pop();
            continue;
        }
        let dir = frame.directions[frame.next];
        frame.next += 1;
        let coord = frame.coord;

        let next_frame = match next_step(grid, coord, dir) {
            Some(Step::Carve(neighbour)) => {
                open_passage(grid, coord, dir);
                enter_cell(grid, neighbour, Some(dir.opposite()), &mut sequence_number, rng)
            }
            Some(Step::Weave { under, beyond }) => {
                open_passage(grid, coord, dir);
                if let Some(under_cell) = grid.cell_mut(under) {
                    under_cell.mark_weaved();
                }
                weaves += 1;
                trace!(from = ?coord, under = ?under, to = ?beyond, "weaving under a corridor");
                enter_cell(grid, beyond, Some(dir.opposite()), &mut sequence_number, rng)
            }
            None => continue,
        };
        stack.push(next_frame);
    }

    debug!(cells = sequence_number, weaves, "carved passages");
}

fn next_step(grid: &MazeGrid, coord: Cartesian2DCoordinate, dir: Direction) -> Option<Step> {
    let neighbour = grid.offset(coord, dir)?;
    let neighbour_cell = grid.cell(neighbour)?;

    if !neighbour_cell.is_visited() {
        return Some(Step::Carve(neighbour));
    }

    if dir.is_perpendicular_to(neighbour_cell.open_directions()) {
        let beyond = grid.offset(neighbour, dir)?;
        if !grid.cell(beyond)?.is_visited() {
            return Some(Step::Weave {
                under: neighbour,
                beyond,
            });
        }
    }

    None
}

// Opens one side only. The cell entered next records the return passage as its approach.
fn open_passage(grid: &mut MazeGrid, coord: Cartesian2DCoordinate, dir: Direction) {
    if let Some(cell) = grid.cell_mut(coord) {
        cell.open(dir);
    }
}

fn enter_cell<R: Rng>(grid: &mut MazeGrid,
                      coord: Cartesian2DCoordinate,
                      approach: Option<Direction>,
                      sequence_number: &mut u32,
                      rng: &mut R)
                      -> Frame {
    *sequence_number += 1;
    if let Some(cell) = grid.cell_mut(coord) {
        if let Some(dir) = approach {
            cell.open(dir);
        }
        cell.mark_visited(*sequence_number);
    }

    let mut directions = Direction::ALL;
    directions.shuffle(rng);
    Frame {
        coord,
        directions,
        next: 0,
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::directions::DirectionSet;
    use itertools::Itertools;
    use petgraph::algo::connected_components;
    use quickcheck::{quickcheck, TestResult};

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn maze(w: usize, h: usize, seed: u64) -> MazeGrid {
        generate(Width(w), Height(h), seed).expect("valid maze size")
    }

    // Every open direction either has a matching return passage on the neighbour, or runs
    // underneath a weaved neighbour whose own corridor crosses at a right angle and ends at a
    // cell recording the return passage.
    fn passages_are_symmetric(g: &MazeGrid) -> bool {
        g.iter_cells().all(|(coord, cell)| {
            cell.open_directions().iter().all(|dir| {
                let neighbour = g.offset(coord, dir);
                let (neighbour, neighbour_cell) = match neighbour.and_then(|n| g.cell(n).map(|c| (n, c))) {
                    Some(found) => found,
                    None => return false,
                };
                if neighbour_cell.is_open(dir.opposite()) {
                    return true;
                }
                neighbour_cell.is_weaved() &&
                dir.is_perpendicular_to(neighbour_cell.open_directions()) &&
                g.offset(neighbour, dir)
                    .and_then(|beyond| g.cell(beyond))
                    .map_or(false, |beyond| beyond.is_open(dir.opposite()))
            })
        })
    }

    fn open_directions_map(g: &MazeGrid) -> Vec<DirectionSet> {
        g.iter_cells().map(|(_, cell)| cell.open_directions()).collect()
    }

    fn find_woven_maze(w: usize, h: usize) -> MazeGrid {
        (0..1000u64)
            .map(|seed| maze(w, h, seed))
            .find(|g| g.weaved_count() > 0)
            .expect("no seed produced a weave")
    }

    #[test]
    fn every_cell_is_visited() {
        for &(w, h) in &[(1, 1), (1, 9), (9, 1), (2, 2), (7, 7), (16, 5), (40, 40)] {
            for seed in 0..5 {
                let g = maze(w, h, seed);
                assert!(g.iter_cells().all(|(_, c)| c.is_visited()), "{}x{} seed {}", w, h, seed);
            }
        }
    }

    #[test]
    fn single_start_cell_at_centre() {
        for &(w, h) in &[(1, 1), (7, 7), (4, 6), (11, 3)] {
            let g = maze(w, h, 3);
            let starts = g.iter_cells()
                .filter(|&(_, c)| c.sequence_number() == 1)
                .map(|(coord, _)| coord)
                .collect_vec();
            assert_eq!(starts, vec![gc((w / 2) as u32, (h / 2) as u32)]);
        }
    }

    #[test]
    fn sequence_numbers_are_a_permutation() {
        let g = maze(9, 6, 77);
        let numbers = g.iter_cells().map(|(_, c)| c.sequence_number()).sorted().collect_vec();
        assert_eq!(numbers, (1..=54).collect_vec());
    }

    #[test]
    fn start_cell_has_no_approach_passage_on_a_single_cell_grid() {
        let g = maze(1, 1, 0);
        let cell = g.cell(gc(0, 0)).unwrap();
        assert!(cell.open_directions().is_empty());
        assert_eq!(cell.sequence_number(), 1);
        assert!(!cell.is_weaved());
    }

    #[test]
    fn passages_are_symmetric_except_under_weaves() {
        for seed in 0..20 {
            assert!(passages_are_symmetric(&maze(12, 12, seed)), "seed {}", seed);
        }
    }

    #[test]
    fn logical_passages_form_a_spanning_tree() {
        for seed in 0..10 {
            let g = maze(10, 8, seed);
            let graph = g.passage_graph();
            assert_eq!(connected_components(&graph), 1);
            assert_eq!(graph.edge_count(), g.size().0 - 1);
        }
    }

    #[test]
    fn seed_42_is_reproducible() {
        let first = maze(7, 7, 42);
        let second = maze(7, 7, 42);
        assert_eq!(first.cell(gc(3, 3)).unwrap().sequence_number(), 1);
        assert_eq!(open_directions_map(&first), open_directions_map(&second));
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_give_different_mazes() {
        let a = maze(7, 7, 42);
        let b = maze(7, 7, 43);
        assert_ne!(open_directions_map(&a), open_directions_map(&b));
    }

    #[test]
    fn weave_through_a_vertical_corridor() {
        // Column x = 1 is a finished north-south corridor and the corners are taken, so the only
        // way out of (0, 1) is underneath (1, 1) to (2, 1).
        let mut g = MazeGrid::new(Width(3), Height(3)).unwrap();
        for &(coord, dirs) in &[(gc(1, 0), &[Direction::South][..]),
                                (gc(1, 1), &[Direction::North, Direction::South][..]),
                                (gc(1, 2), &[Direction::North][..]),
                                (gc(0, 0), &[][..]),
                                (gc(2, 0), &[][..]),
                                (gc(0, 2), &[][..]),
                                (gc(2, 2), &[][..])] {
            let cell = g.cell_mut(coord).unwrap();
            cell.mark_visited(1);
            for dir in dirs {
                cell.open(*dir);
            }
        }

        let mut rng = XorShiftRng::seed_from_u64(5);
        carve_passages_from(&mut g, gc(0, 1), &mut rng);

        let origin = g.cell(gc(0, 1)).unwrap();
        let under = g.cell(gc(1, 1)).unwrap();
        let beyond = g.cell(gc(2, 1)).unwrap();
        assert!(under.is_weaved());
        assert!(origin.is_open(Direction::East));
        assert!(!under.is_open(Direction::West));
        assert!(!under.is_open(Direction::East));
        assert!(beyond.is_open(Direction::West));
        assert!(beyond.is_visited());
        assert_eq!(g.passage_target(gc(0, 1), Direction::East), Some(gc(2, 1)));
        assert_eq!(g.weaved_count(), 1);
    }

    #[test]
    fn generated_weave_on_small_grid() {
        let g = find_woven_maze(3, 3);
        let mut crossings = 0;
        for (coord, cell) in g.iter_cells() {
            for dir in cell.open_directions().iter() {
                let neighbour = g.offset(coord, dir).unwrap();
                let neighbour_cell = g.cell(neighbour).unwrap();
                if neighbour_cell.is_weaved() && !neighbour_cell.is_open(dir.opposite()) {
                    crossings += 1;
                }
            }
        }
        // Each crossing is seen from both of its ends.
        assert!(crossings >= 2);
        assert_eq!(crossings % 2, 0);
        assert!(passages_are_symmetric(&g));
    }

    #[test]
    fn weaved_cells_keep_a_straight_corridor() {
        let g = find_woven_maze(5, 5);
        for (_, cell) in g.iter_cells().filter(|&(_, c)| c.is_weaved()) {
            let dirs = cell.open_directions();
            let straight = (dirs.contains(Direction::North) && dirs.contains(Direction::South) &&
                            !dirs.contains(Direction::East) && !dirs.contains(Direction::West)) ||
                           (dirs.contains(Direction::East) && dirs.contains(Direction::West) &&
                            !dirs.contains(Direction::North) && !dirs.contains(Direction::South));
            assert!(straight || dirs.len() <= 1, "weaved cell with open directions {:?}", dirs);
        }
    }

    #[test]
    fn large_grids_do_not_overflow_the_stack() {
        let g = maze(400, 400, 9);
        assert!(g.iter_cells().all(|(_, c)| c.is_visited()));
    }

    #[test]
    fn text_seeds() {
        assert_eq!(seed_from_text("42"), 42);
        assert_eq!(seed_from_text(" 7 "), 7);
        assert_eq!(seed_from_text("-1"), u64::MAX);
        assert_eq!(seed_from_text("heart"), seed_from_text("heart"));
        assert_ne!(seed_from_text("heart"), seed_from_text("hearts"));
        assert_eq!(seed_from_text(" heart\t"), seed_from_text("heart"));
    }

    #[test]
    fn quickcheck_generation_invariants() {
        fn p(w: u8, h: u8, seed: u64) -> TestResult {
            let (w, h) = (w as usize % 16, h as usize % 16);
            if w == 0 || h == 0 {
                return TestResult::discard();
            }
            let g = maze(w, h, seed);
            let all_visited = g.iter_cells().all(|(_, c)| c.is_visited());
            let starts = g.iter_cells().filter(|&(_, c)| c.sequence_number() == 1).count();
            let centre_starts = g.cell(g.centre()).unwrap().sequence_number() == 1;
            let reproducible = g == maze(w, h, seed);
            let symmetric = passages_are_symmetric(&g);
            TestResult::from_bool(all_visited && starts == 1 && centre_starts && reproducible &&
                                  symmetric)
        }
        quickcheck(p as fn(u8, u8, u64) -> TestResult)
    }
}
