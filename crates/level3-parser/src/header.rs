//! Level 3 product header decoding.
//!
//! The header is stored uncompressed ahead of the bzip2 symbology block:
//!
//! ```text
//! [ legacy preamble: i16 halfwords ... -1 ]
//! latitude (i32, 0.001 deg)   longitude (i32, 0.001 deg)
//! height (i16, m)             product code (i16)
//! operational mode (i16)      volume coverage pattern (i16)
//! sequence number (u16)       volume scan number (i16)
//! volume scan date (i16)      volume scan time (i32, s)
//! [ 14 reserved bytes ]
//! [ 60-byte product dependent block ]
//! ```

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::Level3Result;
use crate::params::DecodingParameters;
use crate::stream::skip_bytes;

/// Halfword that terminates the legacy preamble.
const PREAMBLE_SENTINEL: i16 = -1;
/// Bytes between the volume scan time and the product dependent block.
const RESERVED_AFTER_SCAN_TIME: u64 = 14;
/// Size of the product dependent block.
const PRODUCT_BLOCK_LEN: u64 = 60;

const SECONDS_PER_DAY: i64 = 86_400;

/// Metadata decoded from the uncompressed product header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductHeader {
    /// Degrees north.
    pub radar_latitude: f32,
    /// Degrees east.
    pub radar_longitude: f32,
    /// Meters above sea level.
    pub radar_height: i16,
    pub product_code: i16,
    pub operational_mode: i16,
    pub volume_coverage_pattern: i16,
    pub volume_scan_number: i16,
    /// Days since 1969-12-31.
    pub volume_scan_date: i16,
    /// Seconds since midnight UTC.
    pub volume_scan_time: i32,
    /// `None` when the product code is not one we know how to decode.
    pub decoding_parameters: Option<DecodingParameters>,
}

impl ProductHeader {
    /// Unix timestamp of the volume scan.
    pub fn epochal_time(&self) -> i64 {
        (self.volume_scan_date as i64 - 1) * SECONDS_PER_DAY + self.volume_scan_time as i64
    }

    /// Volume scan start as a UTC timestamp.
    pub fn scan_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.epochal_time(), 0)
    }
}

/// Decode the product header, leaving `reader` at the first byte of the
/// compressed symbology block.
pub fn decode_header<R: Read>(reader: &mut R) -> Level3Result<ProductHeader> {
    skip_preamble(reader)?;

    let latitude = reader.read_i32::<BigEndian>()?;
    let longitude = reader.read_i32::<BigEndian>()?;
    let radar_height = reader.read_i16::<BigEndian>()?;
    let product_code = reader.read_i16::<BigEndian>()?;
    let operational_mode = reader.read_i16::<BigEndian>()?;
    let volume_coverage_pattern = reader.read_i16::<BigEndian>()?;
    let _sequence_number = reader.read_u16::<BigEndian>()?;
    let volume_scan_number = reader.read_i16::<BigEndian>()?;
    let volume_scan_date = reader.read_i16::<BigEndian>()?;
    let volume_scan_time = reader.read_i32::<BigEndian>()?;

    skip_bytes(reader, RESERVED_AFTER_SCAN_TIME)?;

    let decoding_parameters = read_product_parameters(reader, product_code)?;

    let header = ProductHeader {
        radar_latitude: latitude as f32 / 1000.0,
        radar_longitude: longitude as f32 / 1000.0,
        radar_height,
        product_code,
        operational_mode,
        volume_coverage_pattern,
        volume_scan_number,
        volume_scan_date,
        volume_scan_time,
        decoding_parameters,
    };

    debug!(
        product_code,
        latitude = header.radar_latitude,
        longitude = header.radar_longitude,
        vcp = volume_coverage_pattern,
        epoch = header.epochal_time(),
        scheme = decoding_parameters.map(|p| p.scheme_name()).unwrap_or("none"),
        "Decoded Level 3 header"
    );

    Ok(header)
}

/// The block in front of the product description has no fixed length; its
/// end is marked by a `-1` halfword.
fn skip_preamble<R: Read>(reader: &mut R) -> Level3Result<()> {
    while reader.read_i16::<BigEndian>()? != PREAMBLE_SENTINEL {}
    Ok(())
}

/// Read the product dependent block and consume all of its 60 bytes.
fn read_product_parameters<R: Read>(
    reader: &mut R,
    product_code: i16,
) -> Level3Result<Option<DecodingParameters>> {
    match product_code {
        2 | 94 | 99 | 153 | 154 | 155 | 193 | 195 | 393 => {
            read_linear_increment(reader, 10.0).map(Some)
        }
        // Digital precipitation array carries its increment in thousandths.
        81 => read_linear_increment(reader, 1000.0).map(Some),
        159 | 161 | 163 | 167 | 168 | 170 | 172..=176 => {
            let scale = f32::from_bits(reader.read_u32::<BigEndian>()?);
            let offset = f32::from_bits(reader.read_u32::<BigEndian>()?);
            let max_data_level = reader.read_u32::<BigEndian>()? & 0xffff;
            let leading_flags = reader.read_u16::<BigEndian>()? as u32;
            skip_bytes(reader, PRODUCT_BLOCK_LEN - 14)?;
            Ok(Some(DecodingParameters::ScaledOffset {
                scale,
                offset,
                max_data_level,
                leading_flags,
            }))
        }
        135 => {
            let data_mask = (reader.read_u16::<BigEndian>()? & 0xff) as u8;
            let data_scale = reader.read_u16::<BigEndian>()? as f32;
            let data_offset = reader.read_u16::<BigEndian>()? as f32;
            let topped_mask = (reader.read_u16::<BigEndian>()? & 0xff) as u8;
            skip_bytes(reader, PRODUCT_BLOCK_LEN - 8)?;
            Ok(Some(DecodingParameters::EchoTops {
                topped_mask,
                data_mask,
                data_scale,
                data_offset,
            }))
        }
        _ => {
            skip_bytes(reader, PRODUCT_BLOCK_LEN)?;
            Ok(None)
        }
    }
}

fn read_linear_increment<R: Read>(
    reader: &mut R,
    increment_divisor: f32,
) -> Level3Result<DecodingParameters> {
    let min_value = reader.read_i16::<BigEndian>()? as f32 / 10.0;
    let increment = reader.read_i16::<BigEndian>()? as f32 / increment_divisor;
    let num_levels = reader.read_u16::<BigEndian>()? as u32;
    skip_bytes(reader, PRODUCT_BLOCK_LEN - 6)?;
    Ok(DecodingParameters::LinearIncrement {
        min_value,
        increment,
        num_levels,
    })
}
