//! JSON summaries of decoded products.

use level3_parser::tables::site_near;
use level3_parser::{product_name, product_string_code, DecodingParameters, ProductHeader, RadarProduct};
use renderer::LookupTable;
use serde::Serialize;

/// Site match tolerance in degrees.
const SITE_TOLERANCE_DEG: f32 = 0.05;

#[derive(Debug, Clone, Serialize)]
pub struct HeaderSummary {
    pub product_code: i16,
    pub product_name: Option<&'static str>,
    pub string_code: Option<&'static str>,
    pub site: Option<&'static str>,
    pub latitude: f32,
    pub longitude: f32,
    pub height_m: i16,
    pub operational_mode: i16,
    pub volume_coverage_pattern: i16,
    pub volume_scan_number: i16,
    pub epochal_time: i64,
    pub scan_time: Option<String>,
    pub decoding_parameters: Option<DecodingParameters>,
}

impl HeaderSummary {
    pub fn from_header(header: &ProductHeader) -> Self {
        Self {
            product_code: header.product_code,
            product_name: product_name(header.product_code),
            string_code: product_string_code(header.product_code),
            site: site_near(header.radar_latitude, header.radar_longitude, SITE_TOLERANCE_DEG)
                .map(|site| site.icao),
            latitude: header.radar_latitude,
            longitude: header.radar_longitude,
            height_m: header.radar_height,
            operational_mode: header.operational_mode,
            volume_coverage_pattern: header.volume_coverage_pattern,
            volume_scan_number: header.volume_scan_number,
            epochal_time: header.epochal_time(),
            scan_time: header.scan_time().map(|t| t.to_rfc3339()),
            decoding_parameters: header.decoding_parameters,
        }
    }
}

/// Counts of raw levels by category, plus the physical value range.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LevelStats {
    pub below_threshold: usize,
    pub range_folded: usize,
    pub valid: usize,
    pub min_value: Option<f32>,
    pub max_value: Option<f32>,
}

impl LevelStats {
    pub fn from_product(product: &RadarProduct) -> Self {
        let mut stats = Self::default();
        let params = product.decoding_parameters();

        for &level in product.scan.data_points() {
            match level {
                0 => stats.below_threshold += 1,
                1 => stats.range_folded += 1,
                _ => {
                    let Some(value) = params.and_then(|p| p.physical_value(level)) else {
                        continue;
                    };
                    stats.valid += 1;
                    stats.min_value = Some(stats.min_value.map_or(value, |m| m.min(value)));
                    stats.max_value = Some(stats.max_value.map_or(value, |m| m.max(value)));
                }
            }
        }
        stats
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LutSummary {
    pub palette: String,
    pub opaque_entries: usize,
    pub colored_points: usize,
}

impl LutSummary {
    pub fn new(palette: String, lut: &LookupTable, product: &RadarProduct) -> Self {
        let colored_points = product
            .scan
            .data_points()
            .iter()
            .filter(|&&level| lut.color(level)[3] > 0.0)
            .count();
        Self {
            palette,
            opaque_entries: lut.opaque_entries(),
            colored_points,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    #[serde(flatten)]
    pub header: HeaderSummary,
    pub num_radials: u16,
    pub num_range_bins: u16,
    pub range_scale_km: f32,
    pub max_range_km: f32,
    pub num_data_points: usize,
    pub levels: LevelStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lut: Option<LutSummary>,
}

impl ProductSummary {
    pub fn from_product(product: &RadarProduct) -> Self {
        let scan = &product.scan;
        Self {
            header: HeaderSummary::from_header(&product.header),
            num_radials: scan.num_radials,
            num_range_bins: scan.num_range_bins,
            range_scale_km: scan.range_scale_factor,
            max_range_km: scan.range_to_bin_km(scan.num_range_bins as usize),
            num_data_points: scan.num_data_points,
            levels: LevelStats::from_product(product),
            lut: None,
        }
    }

    pub fn with_lut(mut self, lut: LutSummary) -> Self {
        self.lut = Some(lut);
        self
    }
}
