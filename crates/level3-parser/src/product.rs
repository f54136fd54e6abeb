//! Whole-product decoding entry points.

use std::io::Read;

use serde::Serialize;

use crate::body::{decode_body, RadialScan};
use crate::bzip::{Bzip2Reader, DEFAULT_INPUT_BUFFER_SIZE};
use crate::error::Level3Result;
use crate::header::{decode_header, ProductHeader};
use crate::params::DecodingParameters;

/// Tunables for [`decode_with_options`].
#[derive(Debug, Clone, Copy)]
pub struct DecoderOptions {
    /// Size of the compressed input buffer used by the bzip2 adapter.
    pub input_buffer_size: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            input_buffer_size: DEFAULT_INPUT_BUFFER_SIZE,
        }
    }
}

/// A fully decoded Level 3 product.
///
/// Owns every buffer it exposes; moving a `RadarProduct` to another thread
/// hands over the whole scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarProduct {
    pub header: ProductHeader,
    pub scan: RadialScan,
}

impl RadarProduct {
    pub fn product_code(&self) -> i16 {
        self.header.product_code
    }

    pub fn decoding_parameters(&self) -> Option<&DecodingParameters> {
        self.header.decoding_parameters.as_ref()
    }

    /// Physical value at flat data index `index`, if the level is a real
    /// measurement and the product has decoding parameters.
    pub fn physical_value(&self, index: usize) -> Option<f32> {
        let level = *self.scan.data_points().get(index)?;
        self.decoding_parameters()?.physical_value(level)
    }
}

/// Decode a complete product from `reader` with default options.
pub fn decode<R: Read>(reader: R) -> Level3Result<RadarProduct> {
    decode_with_options(reader, DecoderOptions::default())
}

/// Decode a complete product from `reader`.
///
/// Nothing is returned unless both the header and the body decode; a failed
/// call leaves no partial product behind.
pub fn decode_with_options<R: Read>(
    mut reader: R,
    options: DecoderOptions,
) -> Level3Result<RadarProduct> {
    let header = decode_header(&mut reader)?;
    let mut body = Bzip2Reader::with_capacity(options.input_buffer_size, reader);
    let scan = decode_body(&mut body)?;
    Ok(RadarProduct { header, scan })
}
