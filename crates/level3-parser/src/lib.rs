//! NEXRAD Level 3 product decoder.
//!
//! Decodes WSR-88D Level 3 products into radial scan data:
//! - Product header (site, timing, per-product decoding parameters)
//! - bzip2-compressed digital radial data packet
//! - Conversion of raw data levels to physical units
//!
//! ```no_run
//! let file = std::fs::File::open("KTLX_N0B.l3").unwrap();
//! let product = level3_parser::decode(std::io::BufReader::new(file)).unwrap();
//! println!("{} radials", product.scan.num_radials);
//! ```

pub mod body;
pub mod bzip;
pub mod error;
pub mod header;
pub mod params;
pub mod product;
mod stream;
pub mod tables;

pub use body::{decode_body, Radial, RadialScan};
pub use bzip::Bzip2Reader;
pub use error::{Level3Error, Level3Result};
pub use header::{decode_header, ProductHeader};
pub use params::DecodingParameters;
pub use product::{decode, decode_with_options, DecoderOptions, RadarProduct};
pub use tables::{product_ds_code, product_name, product_string_code, site_location};
