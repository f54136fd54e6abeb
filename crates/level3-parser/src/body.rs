//! Digital radial data (packet 16) decoding.
//!
//! Operates on the decompressed symbology block. Only products whose first
//! symbology packet is a digital radial data array are supported.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Level3Error, Level3Result};
use crate::stream::skip_bytes;

/// Message type of a symbology block holding digital radar data.
pub const MESSAGE_TYPE_DIGITAL_RADAR_DATA: u8 = 1;
/// Digital radial data array packet.
pub const PACKET_CODE_DIGITAL_RADIAL: u16 = 0x10;

/// Radial geometry and raw data levels of one scan.
///
/// All buffers are allocated together when the body is decoded and dropped
/// together with the scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RadialScan {
    pub index_of_first_range_bin: i16,
    pub num_range_bins: u16,
    pub sweep_center_i: i16,
    pub sweep_center_j: i16,
    /// Kilometers per range bin.
    pub range_scale_factor: f32,
    pub num_radials: u16,
    /// Start azimuth of each radial in degrees.
    pub radial_starts: Vec<f32>,
    /// Angular width of each radial in degrees.
    pub radial_deltas: Vec<f32>,
    /// `num_range_bins * num_radials` raw levels, radial-major.
    #[serde(skip)]
    pub radial_data: Vec<u8>,
    /// Number of meaningful bytes at the front of `radial_data`.
    pub num_data_points: usize,
}

/// Borrowed view of a single radial.
#[derive(Debug, Clone, Copy)]
pub struct Radial<'a> {
    pub index: usize,
    pub start_angle: f32,
    pub angle_delta: f32,
    pub levels: &'a [u8],
}

impl RadialScan {
    /// Radial at `index`, or `None` past the last populated one.
    pub fn radial(&self, index: usize) -> Option<Radial<'_>> {
        let bins = self.num_range_bins as usize;
        let start = index.checked_mul(bins)?;
        if index >= self.num_radials as usize {
            return None;
        }
        // A scan without range bins still has one empty view per radial.
        if bins != 0 && start >= self.num_data_points {
            return None;
        }
        let end = (start + bins).min(self.num_data_points);
        Some(Radial {
            index,
            start_angle: self.radial_starts[index],
            angle_delta: self.radial_deltas[index],
            levels: &self.radial_data[start..end],
        })
    }

    /// Iterate over populated radials in file order.
    pub fn radials(&self) -> impl Iterator<Item = Radial<'_>> + '_ {
        (0..self.num_radials as usize).map_while(move |i| self.radial(i))
    }

    /// Data levels that were actually populated.
    pub fn data_points(&self) -> &[u8] {
        &self.radial_data[..self.num_data_points]
    }

    /// `(radial, bin)` for a flat data index.
    pub fn position_of(&self, index: usize) -> Option<(usize, usize)> {
        let bins = self.num_range_bins as usize;
        if bins == 0 || index >= self.num_data_points {
            return None;
        }
        Some((index / bins, index % bins))
    }

    /// Slant range in km to the start of `bin`.
    pub fn range_to_bin_km(&self, bin: usize) -> f32 {
        (self.index_of_first_range_bin as f32 + bin as f32) * self.range_scale_factor
    }
}

/// Decode the symbology block. `reader` must yield decompressed bytes.
pub fn decode_body<R: Read>(reader: &mut R) -> Level3Result<RadialScan> {
    skip_bytes(reader, 3)?;
    let message_type = reader.read_u8()?;
    if message_type != MESSAGE_TYPE_DIGITAL_RADAR_DATA {
        return Err(Level3Error::UnsupportedProductType(message_type));
    }

    // Block length, layer count, layer divider and layer length.
    skip_bytes(reader, 12)?;
    let packet_code = reader.read_u16::<BigEndian>()?;
    if packet_code != PACKET_CODE_DIGITAL_RADIAL {
        return Err(Level3Error::UnsupportedGraphicPacketCode(packet_code));
    }

    let index_of_first_range_bin = reader.read_i16::<BigEndian>()?;
    let num_range_bins = reader.read_u16::<BigEndian>()?;
    let sweep_center_i = reader.read_i16::<BigEndian>()?;
    let sweep_center_j = reader.read_i16::<BigEndian>()?;
    let range_scale_factor = reader.read_u16::<BigEndian>()? as f32 / 1000.0;
    let num_radials = reader.read_u16::<BigEndian>()?;

    let bins = num_range_bins as usize;
    let radials = num_radials as usize;
    let mut radial_data = allocate::<u8>(bins * radials)?;
    let mut radial_starts = allocate::<f32>(radials)?;
    let mut radial_deltas = allocate::<f32>(radials)?;

    let mut offset = 0usize;
    for radial in 0..radials {
        let expected = reader.read_u16::<BigEndian>()? as usize;
        radial_starts[radial] = reader.read_i16::<BigEndian>()? as f32 / 10.0;
        radial_deltas[radial] = reader.read_i16::<BigEndian>()? as f32 / 10.0;

        let count = expected.min(bins);
        reader.read_exact(&mut radial_data[offset..offset + count])?;
        offset += count;

        if expected > bins {
            // The RPG occasionally pads a radial to an even byte count.
            trace!(radial, expected, bins, "Discarding excess radial bytes");
            skip_bytes(reader, (expected - bins) as u64)?;
        } else if count < bins {
            trace!(radial, expected, bins, "Short radial, keeping stride");
            offset += bins - count;
        }
    }

    debug!(
        num_radials,
        num_range_bins,
        range_scale_factor,
        num_data_points = offset,
        "Decoded radial data packet"
    );

    Ok(RadialScan {
        index_of_first_range_bin,
        num_range_bins,
        sweep_center_i,
        sweep_center_j,
        range_scale_factor,
        num_radials,
        radial_starts,
        radial_deltas,
        radial_data,
        num_data_points: offset,
    })
}

/// Zero-filled buffer of `len` elements, reporting allocation failure
/// instead of aborting.
fn allocate<T: Default + Clone>(len: usize) -> Level3Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Level3Error::OutOfMemory {
            requested: len.saturating_mul(std::mem::size_of::<T>()),
        })?;
    buf.resize(len, T::default());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet_header(bins: u16, radials: u16) -> Vec<u8> {
        let mut buf = vec![0xff, 0xff, 0x00, MESSAGE_TYPE_DIGITAL_RADAR_DATA];
        buf.extend_from_slice(&[0u8; 12]);
        buf.extend_from_slice(&PACKET_CODE_DIGITAL_RADIAL.to_be_bytes());
        buf.extend_from_slice(&0i16.to_be_bytes());
        buf.extend_from_slice(&bins.to_be_bytes());
        buf.extend_from_slice(&256i16.to_be_bytes());
        buf.extend_from_slice(&280i16.to_be_bytes());
        buf.extend_from_slice(&250u16.to_be_bytes());
        buf.extend_from_slice(&radials.to_be_bytes());
        buf
    }

    fn push_radial(buf: &mut Vec<u8>, start: i16, delta: i16, levels: &[u8]) {
        buf.extend_from_slice(&(levels.len() as u16).to_be_bytes());
        buf.extend_from_slice(&start.to_be_bytes());
        buf.extend_from_slice(&delta.to_be_bytes());
        buf.extend_from_slice(levels);
    }

    #[test]
    fn test_decode_simple_body() {
        let mut buf = packet_header(3, 2);
        push_radial(&mut buf, 0, 10, &[2, 3, 4]);
        push_radial(&mut buf, 10, 10, &[5, 6, 7]);

        let scan = decode_body(&mut buf.as_slice()).unwrap();
        assert_eq!(scan.num_range_bins, 3);
        assert_eq!(scan.num_radials, 2);
        assert_eq!(scan.range_scale_factor, 0.25);
        assert_eq!(scan.radial_starts, vec![0.0, 1.0]);
        assert_eq!(scan.radial_deltas, vec![1.0, 1.0]);
        assert_eq!(scan.data_points(), &[2, 3, 4, 5, 6, 7]);
        assert_eq!(scan.position_of(4), Some((1, 1)));
    }

    #[test]
    fn test_short_radial_keeps_stride() {
        let mut buf = packet_header(4, 2);
        push_radial(&mut buf, 0, 10, &[9, 9]);
        push_radial(&mut buf, 10, 10, &[1, 2, 3, 4]);

        let scan = decode_body(&mut buf.as_slice()).unwrap();
        assert_eq!(scan.num_data_points, 8);
        assert_eq!(scan.data_points(), &[9, 9, 0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_wrong_message_type() {
        let mut buf = packet_header(1, 0);
        buf[3] = 7;
        assert!(matches!(
            decode_body(&mut buf.as_slice()),
            Err(Level3Error::UnsupportedProductType(7))
        ));
    }

    #[test]
    fn test_wrong_packet_code() {
        let mut buf = packet_header(1, 0);
        buf[16..18].copy_from_slice(&0xAF1Fu16.to_be_bytes());
        assert!(matches!(
            decode_body(&mut buf.as_slice()),
            Err(Level3Error::UnsupportedGraphicPacketCode(0xAF1F))
        ));
    }

    #[test]
    fn test_truncated_radial() {
        let mut buf = packet_header(4, 1);
        buf.extend_from_slice(&4u16.to_be_bytes());
        buf.extend_from_slice(&0i16.to_be_bytes());
        buf.extend_from_slice(&10i16.to_be_bytes());
        buf.extend_from_slice(&[1, 2]);
        assert!(matches!(
            decode_body(&mut buf.as_slice()),
            Err(Level3Error::UnexpectedEndOfInput)
        ));
    }

    #[test]
    fn test_radial_views() {
        let mut buf = packet_header(2, 3);
        push_radial(&mut buf, 0, 10, &[2, 3]);
        push_radial(&mut buf, 10, 10, &[4, 5]);
        push_radial(&mut buf, 20, 10, &[6, 7]);

        let scan = decode_body(&mut buf.as_slice()).unwrap();
        let radials: Vec<_> = scan.radials().collect();
        assert_eq!(radials.len(), 3);
        assert_eq!(radials[2].start_angle, 2.0);
        assert_eq!(radials[2].levels, &[6, 7]);
        assert!(scan.radial(3).is_none());
        assert!((scan.range_to_bin_km(4) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_radial_views_without_range_bins() {
        let mut buf = packet_header(0, 2);
        push_radial(&mut buf, 0, 10, &[]);
        push_radial(&mut buf, 10, 10, &[]);

        let scan = decode_body(&mut buf.as_slice()).unwrap();
        assert_eq!(scan.num_data_points, 0);

        let radials: Vec<_> = scan.radials().collect();
        assert_eq!(radials.len(), 2);
        assert!(radials.iter().all(|r| r.levels.is_empty()));
        assert_eq!(radials[1].start_angle, 1.0);
        assert!(scan.radial(2).is_none());
    }
}
