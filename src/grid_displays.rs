use itertools::Itertools;
use std::{fmt, iter};

use crate::cells::{Cartesian2DCoordinate, MazeCell};
use crate::directions::Direction;
use crate::grid::MazeGrid;

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: Cartesian2DCoordinate, _: &MazeCell) -> String {
        String::from("   ")
    }
}

/// Marks cells that have a corridor running underneath them.
#[derive(Debug, Copy, Clone, Default)]
pub struct WeaveMarkers;

impl GridDisplay for WeaveMarkers {
    fn render_cell_body(&self, _: Cartesian2DCoordinate, cell: &MazeCell) -> String {
        if cell.is_weaved() {
            String::from(" ~ ")
        } else {
            String::from("   ")
        }
    }
}

/// Shows the order the generator visited the cells in.
#[derive(Debug, Copy, Clone, Default)]
pub struct SequenceNumbers;

impl GridDisplay for SequenceNumbers {
    fn render_cell_body(&self, _: Cartesian2DCoordinate, cell: &MazeCell) -> String {
        // centre align, padding 3, lowercase hexadecimal
        format!("{:^3x}", cell.sequence_number())
    }
}

/// A maze paired with the way its cell bodies are written out.
pub struct TextMaze<'a, D: GridDisplay> {
    grid: &'a MazeGrid,
    displayer: &'a D,
}

impl MazeGrid {
    pub fn display_with<'a, D: GridDisplay>(&'a self, displayer: &'a D) -> TextMaze<'a, D> {
        TextMaze {
            grid: self,
            displayer,
        }
    }

    /// Is there a gap in the wall on side `dir` of a cell? Either side of a wall recording a
    /// passage opens it, which shows corridors running underneath a weaved cell.
    pub fn is_passage(&self, coord: Cartesian2DCoordinate, dir: Direction) -> bool {
        self.offset(coord, dir).map_or(false, |neighbour| {
            let open_here = self.cell(coord).map_or(false, |c| c.is_open(dir));
            let open_there = self.cell(neighbour).map_or(false, |c| c.is_open(dir.opposite()));
            open_here || open_there
        })
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_with(&WeaveMarkers))
    }
}

// Wall arms meeting at a corner, as bits of a glyph index.
const UP: usize = 1;
const RIGHT: usize = 2;
const DOWN: usize = 4;
const LEFT: usize = 8;

// Box drawing glyph for every combination of wall arms.
const CORNER_GLYPHS: [&str; 16] = [" ", "╵", "╶", "└", "╷", "│", "┌", "├",
                                   "╴", "┘", "─", "┴", "┐", "┤", "┬", "┼"];

#[inline]
fn coordinate(x: usize, y: usize) -> Cartesian2DCoordinate {
    Cartesian2DCoordinate::new(x as u32, y as u32)
}

impl<'a, D: GridDisplay> TextMaze<'a, D> {
    // Wall along the top edge of cell (x, y). Row `height` is the south boundary.
    fn wall_above(&self, x: usize, y: usize) -> bool {
        y == 0 || y == self.grid.height().0 ||
        !self.grid.is_passage(coordinate(x, y - 1), Direction::South)
    }

    // Wall along the west edge of cell (x, y). Column `width` is the east boundary.
    fn wall_left_of(&self, x: usize, y: usize) -> bool {
        x == 0 || x == self.grid.width().0 ||
        !self.grid.is_passage(coordinate(x - 1, y), Direction::East)
    }

    // The corner at the top left of cell (x, y), which may lie on the east or south boundary.
    fn corner(&self, x: usize, y: usize) -> &'static str {
        let (columns, rows) = (self.grid.width().0, self.grid.height().0);
        let mut walls = 0;
        if y > 0 && self.wall_left_of(x, y - 1) {
            walls |= UP;
        }
        if x < columns && self.wall_above(x, y) {
            walls |= RIGHT;
        }
        if y < rows && self.wall_left_of(x, y) {
            walls |= DOWN;
        }
        if x > 0 && self.wall_above(x - 1, y) {
            walls |= LEFT;
        }
        CORNER_GLYPHS[walls]
    }
}

impl<'a, D: GridDisplay> fmt::Display for TextMaze<'a, D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (columns, rows) = (self.grid.width().0, self.grid.height().0);

        // Each cell row is drawn below the line of corners and walls along its top edge.
        for y in 0..=rows {
            for x in 0..=columns {
                f.write_str(self.corner(x, y))?;
                if x < columns {
                    f.write_str(if self.wall_above(x, y) { "───" } else { "   " })?;
                }
            }
            f.write_str("\n")?;

            if y == rows {
                break;
            }
            for x in 0..=columns {
                f.write_str(if self.wall_left_of(x, y) { "│" } else { " " })?;
                let coord = coordinate(x, y);
                if let Some(cell) = self.grid.cell(coord) {
                    f.write_str(&self.displayer.render_cell_body(coord, cell))?;
                }
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Serialize the maze's logical passages: line 1 is `n m` (cells, passages), every further line
/// is a passage between two cells as 1-based row-major cell indices.
pub fn edge_list(grid: &MazeGrid) -> String {
    let graph = grid.passage_graph();
    let header = format!("{} {}", graph.node_count(), graph.edge_count());
    let edges = graph.raw_edges().iter().map(|edge| {
        let src_as_1_based_index = edge.source().index() + 1;
        let dst_as_1_based_index = edge.target().index() + 1;
        format!("{} {}", src_as_1_based_index, dst_as_1_based_index)
    });

    let mut graph_data = iter::once(header).chain(edges).join("\n");
    graph_data.push('\n');
    graph_data
}
