// Create the Error, ErrorKind, ResultExt, and Result types for the library.
// Other modules `use crate::errors::*;` to get access to everything `error_chain!` creates.
#![allow(deprecated)]

use error_chain::*;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        InvalidGridSize(width: usize, height: usize) {
            description("invalid grid size")
            display("invalid grid size {}x{}: width and height must both be positive", width, height)
        }
        InvalidSurfaceSize(pixels: u32, columns: usize) {
            description("surface too small for grid")
            display("a surface {} pixels wide cannot hold {} grid columns", pixels, columns)
        }
        InvalidImageSize(width: u32, height: u32) {
            description("invalid image size")
            display("cannot allocate a {}x{} image", width, height)
        }
    }
}
