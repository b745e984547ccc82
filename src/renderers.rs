use error_chain::bail;
use tiny_skia::ColorU8;
use tracing::debug;

use crate::cells::MazeCell;
use crate::directions::Direction;
use crate::errors::*;
use crate::grid::MazeGrid;
use crate::surfaces::{Colour, LinearGradient, Paint, Point, Rect, Surface};
use crate::units::PixelLength;

/// Colours used to paint a maze.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Palette {
    pub cell: Colour,
    pub highlight: Colour,
    pub shadow: Colour,
    pub underpass_shadow: Colour,
    pub edge: Colour,
    pub background: Colour,
}

impl Default for Palette {
    fn default() -> Palette {
        Palette {
            cell: ColorU8::from_rgba(249, 205, 173, 255),
            highlight: ColorU8::from_rgba(247, 217, 195, 255),
            shadow: ColorU8::from_rgba(212, 164, 131, 255),
            underpass_shadow: ColorU8::from_rgba(184, 144, 116, 255),
            edge: ColorU8::from_rgba(0, 0, 0, 255),
            background: ColorU8::from_rgba(131, 175, 155, 255),
        }
    }
}

/// Layout of one cell's square.
///
/// An inset of a fifth of the cell size separates the core from the four exits. Each exit sits
/// against one side of the square, aligned with the facing exit of the neighbouring cell.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CellGeometry {
    x: f64,
    y: f64,
    size: f64,
    offset: f64,
}

impl CellGeometry {
    pub fn new(origin_x: f64, origin_y: f64, cell_size: PixelLength) -> CellGeometry {
        let PixelLength(size) = cell_size;
        CellGeometry {
            x: origin_x,
            y: origin_y,
            size,
            offset: size / 5.0,
        }
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn exit(&self, dir: Direction) -> Rect {
        let (x, y, s, o) = (self.x, self.y, self.size, self.offset);
        match dir {
            Direction::North => Rect::new(x + o, y, s - o * 2.0, o),
            Direction::South => Rect::new(x + o, y + s - o, s - o * 2.0, o),
            Direction::West => Rect::new(x, y + o, o, s - o * 2.0),
            Direction::East => Rect::new(x + s - o, y + o, o, s - o * 2.0),
        }
    }

    pub fn core(&self) -> Rect {
        let (x, y, s, o) = (self.x, self.y, self.size, self.offset);
        Rect::new(x + o, y + o, s - o * 2.0, s - o * 2.0)
    }

    /// The core's wall on side `dir`, pulled inside the core by `inset`.
    pub fn core_wall(&self, dir: Direction, inset: f64) -> (Point, Point) {
        let core = self.core();
        let (left, right) = (core.x + inset, core.right() - inset);
        let (top, bottom) = (core.y + inset, core.bottom() - inset);
        match dir {
            Direction::North => (Point::new(left, top), Point::new(right, top)),
            Direction::South => (Point::new(left, bottom), Point::new(right, bottom)),
            Direction::West => (Point::new(left, top), Point::new(left, bottom)),
            Direction::East => (Point::new(right, top), Point::new(right, bottom)),
        }
    }

    fn wall_thickness(&self) -> f64 {
        (self.size / 50.0).max(1.0)
    }
}

/// Axis for a gradient across `rect`.
///
/// North and south facings run vertically, east and west horizontally. North and west facings are
/// reversed so the first stop sits on the bottom or right edge. Without a facing the gradient
/// follows the longer side, horizontal for squares.
pub fn gradient_axis(rect: Rect, facing: Option<Direction>) -> (Point, Point) {
    let (mut x0, mut y0) = (rect.x, rect.y);
    let (mut x1, mut y1) = (rect.right(), rect.bottom());

    if facing == Some(Direction::North) {
        std::mem::swap(&mut y0, &mut y1);
    }
    if facing == Some(Direction::West) {
        std::mem::swap(&mut x0, &mut x1);
    }

    let vertical = match facing {
        Some(dir) => dir.is_vertical(),
        None => rect.height > rect.width,
    };
    if vertical {
        (Point::new(x0, y0), Point::new(x0, y1))
    } else {
        (Point::new(x0, y0), Point::new(x1, y0))
    }
}

fn gradient(rect: Rect, facing: Option<Direction>, stops: &[(f64, Colour)]) -> Paint {
    let (start, end) = gradient_axis(rect, facing);
    Paint::Linear(LinearGradient::new(start, end).with_stops(stops))
}

/// Draw one cell with its square's top left corner at the origin.
///
/// Open directions get their exits filled in the cell colour. A plain cell then gets a flat core
/// with walls stroked on every closed side. A weaved cell is drawn raised: its core is shaded
/// across its own corridor and each closed exit is shaded as the mouth of the passage running
/// underneath.
pub fn render_cell<S: Surface + ?Sized>(cell: &MazeCell,
                                        origin_x: f64,
                                        origin_y: f64,
                                        cell_size: PixelLength,
                                        surface: &mut S,
                                        palette: &Palette) {
    let geometry = CellGeometry::new(origin_x, origin_y, cell_size);
    let open = cell.open_directions();
    let cell_paint = Paint::Solid(palette.cell);

    for dir in open.iter() {
        surface.fill_rect(geometry.exit(dir), &cell_paint);
    }

    let closed = open.complement();
    let core = geometry.core();

    if cell.is_weaved() {
        let core_facing = if !Direction::North.is_perpendicular_to(open) {
            Some(Direction::North)
        } else {
            None
        };
        let core_paint = gradient(core,
                                  core_facing,
                                  &[(0.0, palette.cell),
                                    (0.4, palette.highlight),
                                    (0.6, palette.shadow),
                                    (1.0, palette.cell)]);
        surface.fill_rect(core, &core_paint);

        for wall in closed.iter() {
            let exit = geometry.exit(wall);
            let underpass = gradient(exit,
                                     Some(wall.opposite()),
                                     &[(0.0, palette.cell), (1.0, palette.underpass_shadow)]);
            surface.fill_rect(exit, &underpass);
        }
    } else {
        surface.fill_rect(core, &cell_paint);

        let thickness = geometry.wall_thickness();
        for wall in closed.iter() {
            let (from, to) = geometry.core_wall(wall, thickness / 2.0);
            surface.stroke_line(from, to, palette.edge, thickness);
        }
    }
}

/// Paint the whole maze, one cell at a time, scaled so the grid's columns fill the surface width.
pub fn render_grid<S: Surface + ?Sized>(grid: &MazeGrid, surface: &mut S, palette: &Palette) -> Result<()> {
    let columns = grid.width().0;
    if (surface.width() as usize) < columns {
        bail!(ErrorKind::InvalidSurfaceSize(surface.width(), columns));
    }

    let cell_size = surface.width() as f64 / columns as f64;
    surface.clear(palette.background);

    for (coord, cell) in grid.iter_cells() {
        render_cell(cell,
                    coord.x as f64 * cell_size,
                    coord.y as f64 * cell_size,
                    PixelLength(cell_size),
                    surface,
                    palette);
    }

    debug!(cells = grid.size().0, cell_size, "rendered maze");
    Ok(())
}
