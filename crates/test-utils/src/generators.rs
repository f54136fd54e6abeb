//! Synthetic Level 3 product generators.
//!
//! [`Level3Builder`] writes byte-exact products (uncompressed header followed
//! by a bzip2 symbology block) so decoder tests can control every field,
//! including the malformed ones real radars occasionally emit.

use std::io::Read;

use bzip2::read::BzEncoder;
use bzip2::Compression;

use crate::fixtures::header;

/// Compress `data` into a single bzip2 stream.
pub fn bzip2_compress(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    BzEncoder::new(data, Compression::default())
        .read_to_end(&mut out)
        .expect("in-memory bzip2 compression cannot fail");
    out
}

/// One radial as it will be written to the packet.
#[derive(Debug, Clone)]
pub struct SyntheticRadial {
    /// Start azimuth in tenths of a degree.
    pub start_tenths: i16,
    /// Angular width in tenths of a degree.
    pub delta_tenths: i16,
    /// Byte count written to the radial header. Defaults to `data.len()`.
    pub declared_count: Option<u16>,
    pub data: Vec<u8>,
}

/// Builder for synthetic Level 3 products.
///
/// Defaults describe a KTLX-like base reflectivity product with no radials.
#[derive(Debug, Clone)]
pub struct Level3Builder {
    pub preamble: Vec<i16>,
    pub latitude_millideg: i32,
    pub longitude_millideg: i32,
    pub height: i16,
    pub product_code: i16,
    pub operational_mode: i16,
    pub volume_coverage_pattern: i16,
    pub sequence_number: u16,
    pub volume_scan_number: i16,
    pub volume_scan_date: i16,
    pub volume_scan_time: i32,
    pub product_block: [u8; 60],
    pub message_type: u8,
    pub packet_code: u16,
    pub index_of_first_range_bin: i16,
    pub num_range_bins: u16,
    pub sweep_center_i: i16,
    pub sweep_center_j: i16,
    /// Meters per range bin.
    pub range_scale_meters: u16,
    /// Overrides the radial count written to the packet.
    pub num_radials_override: Option<u16>,
    pub radials: Vec<SyntheticRadial>,
}

impl Level3Builder {
    pub fn new(product_code: i16) -> Self {
        Self {
            // 30-byte WMO heading stand-in plus an 18-byte message header.
            preamble: vec![0x5344; 24],
            latitude_millideg: header::KTLX_LATITUDE_MILLIDEG,
            longitude_millideg: header::KTLX_LONGITUDE_MILLIDEG,
            height: 370,
            product_code,
            operational_mode: 2,
            volume_coverage_pattern: 212,
            sequence_number: 1,
            volume_scan_number: 42,
            volume_scan_date: header::SCAN_DATE,
            volume_scan_time: header::SCAN_TIME,
            product_block: [0u8; 60],
            message_type: 1,
            packet_code: 0x10,
            index_of_first_range_bin: 0,
            num_range_bins: 0,
            sweep_center_i: 256,
            sweep_center_j: 280,
            range_scale_meters: 1000,
            num_radials_override: None,
            radials: Vec::new(),
        }
    }

    pub fn site(mut self, latitude_millideg: i32, longitude_millideg: i32, height: i16) -> Self {
        self.latitude_millideg = latitude_millideg;
        self.longitude_millideg = longitude_millideg;
        self.height = height;
        self
    }

    pub fn mode(mut self, operational_mode: i16, volume_coverage_pattern: i16) -> Self {
        self.operational_mode = operational_mode;
        self.volume_coverage_pattern = volume_coverage_pattern;
        self
    }

    pub fn scan_time(mut self, date: i16, seconds: i32) -> Self {
        self.volume_scan_date = date;
        self.volume_scan_time = seconds;
        self
    }

    /// Linear-increment block: min and increment in tenths, as stored.
    pub fn linear_params(mut self, min_tenths: i16, increment: i16, num_levels: u16) -> Self {
        self.product_block = [0u8; 60];
        self.product_block[0..2].copy_from_slice(&min_tenths.to_be_bytes());
        self.product_block[2..4].copy_from_slice(&increment.to_be_bytes());
        self.product_block[4..6].copy_from_slice(&num_levels.to_be_bytes());
        self
    }

    pub fn scaled_offset_params(
        mut self,
        scale: f32,
        offset: f32,
        max_data_level: u16,
        leading_flags: u16,
    ) -> Self {
        self.product_block = [0u8; 60];
        self.product_block[0..4].copy_from_slice(&scale.to_bits().to_be_bytes());
        self.product_block[4..8].copy_from_slice(&offset.to_bits().to_be_bytes());
        self.product_block[10..12].copy_from_slice(&max_data_level.to_be_bytes());
        self.product_block[12..14].copy_from_slice(&leading_flags.to_be_bytes());
        self
    }

    pub fn echo_tops_params(
        mut self,
        data_mask: u16,
        data_scale: u16,
        data_offset: u16,
        topped_mask: u16,
    ) -> Self {
        self.product_block = [0u8; 60];
        self.product_block[0..2].copy_from_slice(&data_mask.to_be_bytes());
        self.product_block[2..4].copy_from_slice(&data_scale.to_be_bytes());
        self.product_block[4..6].copy_from_slice(&data_offset.to_be_bytes());
        self.product_block[6..8].copy_from_slice(&topped_mask.to_be_bytes());
        self
    }

    pub fn range_bins(mut self, num_range_bins: u16, range_scale_meters: u16) -> Self {
        self.num_range_bins = num_range_bins;
        self.range_scale_meters = range_scale_meters;
        self
    }

    pub fn radial(mut self, start_tenths: i16, delta_tenths: i16, data: Vec<u8>) -> Self {
        self.radials.push(SyntheticRadial {
            start_tenths,
            delta_tenths,
            declared_count: None,
            data,
        });
        self
    }

    /// Radial whose header declares `declared_count` bytes regardless of how
    /// many are actually written.
    pub fn radial_with_count(
        mut self,
        start_tenths: i16,
        delta_tenths: i16,
        declared_count: u16,
        data: Vec<u8>,
    ) -> Self {
        self.radials.push(SyntheticRadial {
            start_tenths,
            delta_tenths,
            declared_count: Some(declared_count),
            data,
        });
        self
    }

    pub fn message_type(mut self, message_type: u8) -> Self {
        self.message_type = message_type;
        self
    }

    pub fn packet_code(mut self, packet_code: u16) -> Self {
        self.packet_code = packet_code;
        self
    }

    /// Uncompressed header bytes, ending right before the symbology block.
    pub fn header_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.preamble.len() * 2 + 96);
        for word in &self.preamble {
            buf.extend_from_slice(&word.to_be_bytes());
        }
        buf.extend_from_slice(&(-1i16).to_be_bytes());
        buf.extend_from_slice(&self.latitude_millideg.to_be_bytes());
        buf.extend_from_slice(&self.longitude_millideg.to_be_bytes());
        buf.extend_from_slice(&self.height.to_be_bytes());
        buf.extend_from_slice(&self.product_code.to_be_bytes());
        buf.extend_from_slice(&self.operational_mode.to_be_bytes());
        buf.extend_from_slice(&self.volume_coverage_pattern.to_be_bytes());
        buf.extend_from_slice(&self.sequence_number.to_be_bytes());
        buf.extend_from_slice(&self.volume_scan_number.to_be_bytes());
        buf.extend_from_slice(&self.volume_scan_date.to_be_bytes());
        buf.extend_from_slice(&self.volume_scan_time.to_be_bytes());
        buf.extend_from_slice(&[0u8; 14]);
        buf.extend_from_slice(&self.product_block);
        buf
    }

    /// Uncompressed symbology block.
    pub fn body_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0xff, 0xff, 0x00, self.message_type];
        buf.extend_from_slice(&[0u8; 12]);
        buf.extend_from_slice(&self.packet_code.to_be_bytes());
        buf.extend_from_slice(&self.index_of_first_range_bin.to_be_bytes());
        buf.extend_from_slice(&self.num_range_bins.to_be_bytes());
        buf.extend_from_slice(&self.sweep_center_i.to_be_bytes());
        buf.extend_from_slice(&self.sweep_center_j.to_be_bytes());
        buf.extend_from_slice(&self.range_scale_meters.to_be_bytes());
        let num_radials = self
            .num_radials_override
            .unwrap_or(self.radials.len() as u16);
        buf.extend_from_slice(&num_radials.to_be_bytes());
        for radial in &self.radials {
            let count = radial.declared_count.unwrap_or(radial.data.len() as u16);
            buf.extend_from_slice(&count.to_be_bytes());
            buf.extend_from_slice(&radial.start_tenths.to_be_bytes());
            buf.extend_from_slice(&radial.delta_tenths.to_be_bytes());
            buf.extend_from_slice(&radial.data);
        }
        buf
    }

    /// Complete product file contents.
    pub fn build(&self) -> Vec<u8> {
        let mut out = self.header_bytes();
        out.extend_from_slice(&bzip2_compress(&self.body_bytes()));
        out
    }
}

/// A 360-radial reflectivity product whose level at `(radial, bin)` is
/// `2 + (radial + bin) % 254`, so every byte is predictable.
///
/// # Example
///
/// ```
/// use test_utils::create_ramp_product;
///
/// let builder = create_ramp_product(8);
/// assert_eq!(builder.radials.len(), 360);
/// assert_eq!(builder.radials[1].data[0], 3);
/// ```
pub fn create_ramp_product(num_range_bins: u16) -> Level3Builder {
    let mut builder = Level3Builder::new(94)
        .linear_params(-320, 5, 254)
        .range_bins(num_range_bins, 1000);
    for radial in 0..360u16 {
        let data = (0..num_range_bins)
            .map(|bin| ramp_level(radial as usize, bin as usize))
            .collect();
        builder = builder.radial((radial * 10) as i16, 10, data);
    }
    builder
}

/// Level written by [`create_ramp_product`] at `(radial, bin)`.
pub fn ramp_level(radial: usize, bin: usize) -> u8 {
    (2 + (radial + bin) % 254) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = Level3Builder::new(94).header_bytes();
        // preamble + divider + 26 bytes of fields + 14 reserved + 60 block
        assert_eq!(header.len(), 24 * 2 + 2 + 26 + 14 + 60);
        assert_eq!(&header[48..50], &[0xff, 0xff]);
    }

    #[test]
    fn test_defaults_use_ktlx_fixture() {
        let builder = Level3Builder::new(94);
        assert_eq!(builder.latitude_millideg, header::KTLX_LATITUDE_MILLIDEG);
        assert_eq!(builder.longitude_millideg, header::KTLX_LONGITUDE_MILLIDEG);

        let bytes = builder.header_bytes();
        // Scan date and time follow the divider and eight header fields.
        assert_eq!(&bytes[70..72], &header::SCAN_DATE.to_be_bytes());
        assert_eq!(&bytes[72..76], &header::SCAN_TIME.to_be_bytes());
    }

    #[test]
    fn test_body_declared_count() {
        let body = Level3Builder::new(94)
            .range_bins(2, 1000)
            .radial_with_count(0, 10, 3, vec![7, 7, 7])
            .body_bytes();
        // 30-byte packet prefix, then the radial header.
        assert_eq!(&body[30..32], &3u16.to_be_bytes());
    }

    #[test]
    fn test_build_is_compressed() {
        let product = create_ramp_product(16).build();
        let header_len = Level3Builder::new(94).header_bytes().len();
        assert_eq!(&product[header_len..header_len + 3], b"BZh");
    }
}
