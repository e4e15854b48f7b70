// src/debug/visualization/mod.rs
pub mod svg;

pub use svg::{create_cell_raster_svg, render_cell_raster_svg};
