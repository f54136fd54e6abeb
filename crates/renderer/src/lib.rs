//! Color mapping for NEXRAD Level 3 products.
//!
//! - Color table (palette) parsing
//! - RGBA colors and gradient blending
//! - 256-entry lookup tables from raw data level to color

pub mod color_table;
pub mod error;
pub mod gradient;
pub mod lut;

pub use color_table::{
    parse_color_table, parse_color_table_with_options, ColorTable, ParseOptions, Step,
};
pub use error::{ColorTableError, ColorTableResult};
pub use gradient::Rgba;
pub use lut::{interpolate, populate_lookup_table, LookupTable, LUT_SIZE};
