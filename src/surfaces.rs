//! Drawing surfaces the renderers paint on.
//!
//! A surface accepts rectangle fills (solid or linear gradient) and line strokes in pixel space,
//! origin top left. `ImageSurface` rasterizes through `tiny_skia` into a pixmap that can be saved
//! as a PNG, `DrawList` only records the calls.

use std::path::Path;

use smallvec::SmallVec;
use tiny_skia::{Color, ColorU8, GradientStop, PathBuilder, Pixmap, Shader, SpreadMode, Stroke,
                Transform};

use crate::errors::*;

/// Straight (not premultiplied) 8-bit RGBA.
pub type Colour = ColorU8;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area shared with `other`, zero when they only touch along an edge.
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w > 0.0 && h > 0.0 {
            w * h
        } else {
            0.0
        }
    }

    /// Is `inner` entirely inside this rectangle?
    pub fn encloses(&self, inner: &Rect) -> bool {
        inner.x >= self.x && inner.y >= self.y && inner.right() <= self.right() &&
        inner.bottom() <= self.bottom()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColourStop {
    pub offset: f64,
    pub colour: Colour,
}

/// Colour ramp along the axis from `start` to `end`. Points beyond either end take the colour of
/// the nearest stop.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    stops: SmallVec<[ColourStop; 4]>,
}

impl LinearGradient {
    pub fn new(start: Point, end: Point) -> LinearGradient {
        LinearGradient {
            start,
            end,
            stops: SmallVec::new(),
        }
    }

    /// Adds a stop at `offset` in `0.0..=1.0`, keeping the stops ordered by offset.
    pub fn add_colour_stop(&mut self, offset: f64, colour: Colour) {
        let offset = offset.max(0.0).min(1.0);
        let position = self.stops
            .iter()
            .position(|stop| stop.offset > offset)
            .unwrap_or_else(|| self.stops.len());
        self.stops.insert(position, ColourStop { offset, colour });
    }

    pub fn with_stops(mut self, stops: &[(f64, Colour)]) -> LinearGradient {
        for &(offset, colour) in stops {
            self.add_colour_stop(offset, colour);
        }
        self
    }

    pub fn stops(&self) -> &[ColourStop] {
        &self.stops
    }

    /// Is the ramp running along the y axis?
    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x && self.start.y != self.end.y
    }

    // A degenerate axis or a single stop collapses to a solid colour, no stops to transparent.
    fn shader(&self) -> Shader<'static> {
        let stops = self.stops
            .iter()
            .map(|stop| GradientStop::new(stop.offset as f32, skia_colour(stop.colour)))
            .collect::<Vec<_>>();
        let fallback = self.stops.first().map_or(Color::TRANSPARENT, |stop| skia_colour(stop.colour));

        tiny_skia::LinearGradient::new(skia_point(self.start),
                                       skia_point(self.end),
                                       stops,
                                       SpreadMode::Pad,
                                       Transform::identity())
            .unwrap_or(Shader::SolidColor(fallback))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Colour),
    Linear(LinearGradient),
}

impl Paint {
    fn to_skia(&self) -> tiny_skia::Paint<'static> {
        let mut paint = tiny_skia::Paint::default();
        paint.anti_alias = true;
        match *self {
            Paint::Solid(colour) => paint.set_color(skia_colour(colour)),
            Paint::Linear(ref gradient) => paint.shader = gradient.shader(),
        }
        paint
    }
}

#[inline]
fn skia_colour(colour: Colour) -> Color {
    Color::from_rgba8(colour.red(), colour.green(), colour.blue(), colour.alpha())
}

#[inline]
fn skia_point(point: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(point.x as f32, point.y as f32)
}

pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear(&mut self, colour: Colour);
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);
    fn stroke_line(&mut self, from: Point, to: Point, colour: Colour, thickness: f64);
}

/// Anti-aliased raster surface backed by a `tiny_skia` pixmap.
#[derive(Debug, Clone)]
pub struct ImageSurface {
    pixmap: Pixmap,
}

impl ImageSurface {
    /// Fails if either side is zero or the pixmap would be too large to allocate.
    pub fn new(width: u32, height: u32) -> Result<ImageSurface> {
        let pixmap = Pixmap::new(width, height).ok_or(ErrorKind::InvalidImageSize(width, height))?;
        Ok(ImageSurface { pixmap })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// The straight alpha colour at a pixel, None outside of the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Colour> {
        self.pixmap.pixel(x, y).map(|p| p.demultiply())
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.pixmap
            .save_png(path)
            .chain_err(|| format!("Failed to save maze image to {}", path.display()))
    }
}

impl Surface for ImageSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn clear(&mut self, colour: Colour) {
        self.pixmap.fill(skia_colour(colour));
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        // Empty or non-finite rects draw nothing.
        if let Some(area) = tiny_skia::Rect::from_xywh(rect.x as f32,
                                                       rect.y as f32,
                                                       rect.width as f32,
                                                       rect.height as f32) {
            self.pixmap.fill_rect(area, &paint.to_skia(), Transform::identity(), None);
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, colour: Colour, thickness: f64) {
        let mut builder = PathBuilder::new();
        builder.move_to(from.x as f32, from.y as f32);
        builder.line_to(to.x as f32, to.y as f32);
        let path = match builder.finish() {
            Some(path) => path,
            None => return,
        };

        let stroke = Stroke {
            width: thickness as f32,
            ..Stroke::default()
        };
        let paint = Paint::Solid(colour).to_skia();
        self.pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Colour),
    FillRect { rect: Rect, paint: Paint },
    StrokeLine {
        from: Point,
        to: Point,
        colour: Colour,
        thickness: f64,
    },
}

/// Surface that records every draw call in order instead of painting pixels.
#[derive(Debug, Clone)]
pub struct DrawList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> DrawList {
        DrawList {
            width,
            height,
            commands: vec![],
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn filled_rects(&self) -> impl Iterator<Item = (&Rect, &Paint)> {
        self.commands.iter().filter_map(|command| match *command {
            DrawCommand::FillRect { ref rect, ref paint } => Some((rect, paint)),
            _ => None,
        })
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

impl Surface for DrawList {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, colour: Colour) {
        self.commands.push(DrawCommand::Clear(colour));
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            paint: paint.clone(),
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, colour: Colour, thickness: f64) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            colour,
            thickness,
        });
    }
}
