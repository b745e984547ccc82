//! **weaves** generates woven mazes, where corridors may pass underneath one another, and renders
//! them as layered images or text.

pub mod cells;
pub mod directions;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod renderers;
pub mod surfaces;
pub mod units;
