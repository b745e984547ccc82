use std::fmt;

use error_chain::bail;
use petgraph::graph;
use petgraph::{Graph, Undirected};

use crate::cells::{Cartesian2DCoordinate, MazeCell};
use crate::directions::Direction;
use crate::errors::*;
use crate::grid_iterators::CellIter;
use crate::units::{CellsCount, Height, PassagesCount, Width};

/// Undirected graph of the logical passages of a maze, one node per cell in row-major order.
pub type PassageGraph = Graph<(), (), Undirected, u32>;

/// Rectangular grid of maze cells, stored row-major.
///
/// The grid exclusively owns all cell state. Coordinates outside of the grid are never
/// visitable, every coordinate inside it is.
#[derive(Clone, PartialEq, Eq)]
pub struct MazeGrid {
    cells: Vec<MazeCell>,
    width: Width,
    height: Height,
}

impl fmt::Debug for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MazeGrid :: width: {:?}, height: {:?}, visited: {:?}",
               self.width.0, self.height.0,
               self.cells.iter().filter(|c| c.is_visited()).count())
    }
}

impl MazeGrid {
    /// Allocates `width * height` empty cells.
    ///
    /// Fails if either dimension is zero or the cell count does not fit a `u32` coordinate space.
    pub fn new(width: Width, height: Height) -> Result<MazeGrid> {
        let (Width(w), Height(h)) = (width, height);
        let fits_u32 = w <= u32::MAX as usize && h <= u32::MAX as usize &&
                       w.checked_mul(h).map_or(false, |n| n <= u32::MAX as usize);
        if w == 0 || h == 0 || !fits_u32 {
            bail!(ErrorKind::InvalidGridSize(w, h));
        }

        Ok(MazeGrid {
            cells: vec![MazeCell::default(); w * h],
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> CellsCount {
        CellsCount(self.cells.len())
    }

    /// The generator's start cell.
    #[inline]
    pub fn centre(&self) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new((self.width.0 / 2) as u32, (self.height.0 / 2) as u32)
    }

    /// Pure bounds check, whether or not the cell was already visited.
    #[inline]
    pub fn can_visit(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width.0 && (y as usize) < self.height.0
    }

    /// The in-bounds coordinate one step away in `dir`.
    pub fn offset(&self, coord: Cartesian2DCoordinate, dir: Direction) -> Option<Cartesian2DCoordinate> {
        let (dx, dy) = dir.coordinate_delta();
        let (x, y) = (coord.x as isize + dx, coord.y as isize + dy);
        if self.can_visit(x, y) {
            Some(Cartesian2DCoordinate::new(x as u32, y as u32))
        } else {
            None
        }
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0..grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.can_visit(coord.x as isize, coord.y as isize) {
            Some(coord.y as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn cell(&self, coord: Cartesian2DCoordinate) -> Option<&MazeCell> {
        self.index(coord).map(move |i| &self.cells[i])
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, coord: Cartesian2DCoordinate) -> Option<&mut MazeCell> {
        match self.index(coord) {
            Some(i) => Some(&mut self.cells[i]),
            None => None,
        }
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.width, self.height)
    }

    /// Coordinates paired with their cells, row-major.
    pub fn iter_cells<'a>(&'a self) -> impl Iterator<Item = (Cartesian2DCoordinate, &'a MazeCell)> + 'a {
        self.iter().zip(self.cells.iter())
    }

    pub fn weaved_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_weaved()).count()
    }

    /// The cell an open passage leads to.
    ///
    /// Usually that is the neighbour at `dir`. When the neighbour records no return passage the
    /// corridor runs underneath it and the target is the cell beyond, which must record the
    /// return passage.
    pub fn passage_target(&self,
                          coord: Cartesian2DCoordinate,
                          dir: Direction)
                          -> Option<Cartesian2DCoordinate> {
        if !self.cell(coord)?.is_open(dir) {
            return None;
        }

        let back = dir.opposite();
        let neighbour = self.offset(coord, dir)?;
        if self.cell(neighbour)?.is_open(back) {
            return Some(neighbour);
        }

        let beyond = self.offset(neighbour, dir)?;
        if self.cell(beyond)?.is_open(back) {
            Some(beyond)
        } else {
            None
        }
    }

    /// Builds the undirected graph of logical passages. Weave crossings connect the two cells
    /// on either side of the weaved cell, not the weaved cell itself.
    pub fn passage_graph(&self) -> PassageGraph {
        let nodes = self.cells.len();
        let mut graph = PassageGraph::with_capacity(nodes, nodes);
        for _ in 0..nodes {
            let _ = graph.add_node(());
        }

        for (coord, cell) in self.iter_cells() {
            for dir in cell.open_directions().iter() {
                if let Some(target) = self.passage_target(coord, dir) {
                    let a = self.graph_index(coord);
                    let b = self.graph_index(target);
                    if let (Some(a_index), Some(b_index)) = (a, b) {
                        let _ = graph.update_edge(a_index, b_index, ());
                    }
                }
            }
        }

        graph
    }

    pub fn links_count(&self) -> PassagesCount {
        PassagesCount(self.passage_graph().edge_count())
    }

    #[inline]
    fn graph_index(&self, coord: Cartesian2DCoordinate) -> Option<graph::NodeIndex<u32>> {
        self.index(coord).map(graph::NodeIndex::<u32>::new)
    }
}
