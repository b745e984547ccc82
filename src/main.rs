use docopt::Docopt;
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
    path::Path,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use weaves::{
    generators,
    grid::MazeGrid,
    grid_displays::{self, SequenceNumbers},
    renderers::{self, Palette},
    surfaces::ImageSurface,
    units::{Height, Width},
};

const USAGE: &str = "Weaves

Usage:
    weaves_driver -h | --help
    weaves_driver [(--grid-size=<n>|[--grid-width=<w> --grid-height=<h>])] [--seed=<s>] [--image-out=<path> --image-pixels=<n>] [--text-out=<path> --show-sequence] [--save-edges=<path>] [-v]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n.
    --grid-width=<w>       The grid width in a w*h grid [default: 7].
    --grid-height=<h>      The grid height in a w*h grid [default: 7].
    --seed=<s>             Maze seed, an integer or any text. The same seed gives the same maze [default: 0].
    --image-out=<path>     Output file path for an image rendering of the maze. Always PNG format.
    --image-pixels=<n>     Pixel width of the rendered image, the height follows the grid's aspect [default: 700].
    --text-out=<path>      Output file path for a textual rendering of the maze. Printed when neither output path is given.
    --show-sequence        Show the order the cells were visited in (hexadecimal) in the textual rendering.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
    -v --verbose           Log generation and rendering details. RUST_LOG overrides the level.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_seed: String,
    flag_image_out: String,
    flag_image_pixels: u32,
    flag_text_out: String,
    flag_show_sequence: bool,
    flag_save_edges: String,
    flag_verbose: bool,
}

mod errors {
    #![allow(deprecated)]
    // The driver's errors wrap the library's, so `?` works on both.
    use error_chain::*;
    error_chain! {

        links {
            Maze(::weaves::errors::Error, ::weaves::errors::ErrorKind);
        }

        foreign_links {
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    init_logging(args.flag_verbose);

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };
    let seed = generators::seed_from_text(&args.flag_seed);

    let maze_grid = generators::generate(Width(width), Height(height), seed)?;
    info!(width, height, seed, weaves = maze_grid.weaved_count(), "generated maze");

    if !args.flag_save_edges.is_empty() {
        write_text_to_file(&grid_displays::edge_list(&maze_grid), &args.flag_save_edges)
            .chain_err(|| format!("Failed to write maze graph to text file {}", args.flag_save_edges))?;
        info!(path = %args.flag_save_edges, "saved maze edges");
    }

    let do_image_render = !args.flag_image_out.is_empty();
    let do_text_render = !args.flag_text_out.is_empty() || !do_image_render;

    if do_text_render {
        let text = if args.flag_show_sequence {
            maze_grid.display_with(&SequenceNumbers).to_string()
        } else {
            maze_grid.to_string()
        };

        if args.flag_text_out.is_empty() {
            println!("{}", text);
        } else {
            write_text_to_file(&text, &args.flag_text_out)
                .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
            info!(path = %args.flag_text_out, "saved maze text");
        }
    }

    if do_image_render {
        render_image(&maze_grid, args.flag_image_pixels, Path::new(&args.flag_image_out))?;
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("weaves={0},weaves_driver={0}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn render_image(maze_grid: &MazeGrid, pixels_wide: u32, out_path: &Path) -> Result<()> {
    let Width(columns) = maze_grid.width();
    let Height(rows) = maze_grid.height();
    let cell_size = pixels_wide as f64 / columns as f64;
    let pixels_high = (cell_size * rows as f64).ceil().max(1.0) as u32;

    let mut surface = ImageSurface::new(pixels_wide, pixels_high)?;
    renderers::render_grid(maze_grid, &mut surface, &Palette::default())?;
    surface.save_png(out_path)?;

    info!(path = %out_path.display(), width = pixels_wide, height = pixels_high, "saved maze image");
    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
