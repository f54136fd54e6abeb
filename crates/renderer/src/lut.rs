//! 256-entry lookup tables mapping raw data levels to colors.
//!
//! A lookup table combines a [`ColorTable`] with a product's
//! [`DecodingParameters`]: every possible data byte is converted to its
//! physical value once and colored by interpolating between the table's steps.
//! Index 0 (below threshold) is always transparent; index 1 (range folded)
//! takes the table's RF color.

use level3_parser::{DecodingParameters, RadarProduct};
use rayon::prelude::*;
use tracing::debug;

use crate::color_table::ColorTable;
use crate::gradient::{blend, NormalizedColor, Rgba, TRANSPARENT};

/// Number of entries in a lookup table, one per data level.
pub const LUT_SIZE: usize = 256;

/// Pixels handed to each rayon task in [`LookupTable::colorize`].
const COLORIZE_CHUNK: usize = 4096;

/// Interpolated, normalized color for physical `level`.
///
/// The table's unit conversion factor is applied to `level` first. Levels
/// below the first step (and NaN) are transparent; a single-step table
/// returns that step's color everywhere at or above it.
pub fn interpolate(table: &ColorTable, level: f32) -> NormalizedColor {
    let level = level * table.unit_conversion_factor;
    let steps = &table.color_steps;

    let Some(first) = steps.first() else {
        return TRANSPARENT;
    };
    if level.is_nan() || level < first.value {
        return TRANSPARENT;
    }
    if steps.len() == 1 {
        return first.color.to_normalized();
    }

    let bottom = steps.iter().rposition(|s| s.value <= level).unwrap_or(0);
    let top = steps
        .iter()
        .position(|s| s.value > level)
        .unwrap_or(steps.len() - 1);

    let bottom = &steps[bottom];
    let top = &steps[top];
    let span = top.value - bottom.value;
    let fraction = if span == 0.0 {
        0.0
    } else {
        (level - bottom.value) / span
    };

    let end = bottom.color_end.unwrap_or(top.color);
    blend(bottom.color.to_normalized(), end.to_normalized(), fraction)
}

/// Fill `out` for a product described by `params`.
///
/// For [`DecodingParameters::ScaledOffset`] only the valid level range is
/// written; entries outside it keep whatever the caller put there.
pub fn populate_lookup_table(
    table: &ColorTable,
    params: &DecodingParameters,
    out: &mut [NormalizedColor; LUT_SIZE],
) {
    out[0] = TRANSPARENT;
    out[1] = table
        .range_folded_color
        .map(Rgba::to_normalized)
        .unwrap_or(TRANSPARENT);

    let factor = table.unit_conversion_factor;

    match *params {
        DecodingParameters::LinearIncrement {
            min_value,
            increment,
            num_levels,
        } => {
            // interpolate() applies the conversion again; palettes for these
            // products are tuned against the doubled factor.
            let last = (num_levels as usize).saturating_add(1).min(LUT_SIZE - 1);
            let mut level = min_value;
            for (i, entry) in out.iter_mut().enumerate().take(last + 1).skip(2) {
                level = min_value + (i - 2) as f32 * increment;
                *entry = interpolate(table, level * factor);
            }

            let fill = interpolate(table, level * factor);
            for entry in out.iter_mut().skip(last.max(1) + 1) {
                *entry = fill;
            }
        }
        DecodingParameters::EchoTops {
            data_mask,
            data_scale,
            data_offset,
            ..
        } => {
            for (i, entry) in out.iter_mut().enumerate().skip(2) {
                let level = ((i as u8) & data_mask) as f32 / data_scale - data_offset;
                *entry = interpolate(table, level);
            }
        }
        DecodingParameters::ScaledOffset {
            scale,
            offset,
            max_data_level,
            leading_flags,
        } => {
            let start = (leading_flags as usize).min(LUT_SIZE);
            let end = (max_data_level as usize)
                .saturating_add(leading_flags as usize)
                .min(LUT_SIZE);
            for (i, entry) in out.iter_mut().enumerate().take(end).skip(start) {
                let level = (i as f32 - offset) / scale;
                *entry = interpolate(table, level);
            }
        }
    }
}

/// An owned, fully initialized lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    entries: [NormalizedColor; LUT_SIZE],
}

impl LookupTable {
    /// Build a lookup table. Entries the decoding scheme does not cover are
    /// transparent.
    pub fn build(table: &ColorTable, params: &DecodingParameters) -> Self {
        let mut entries = [TRANSPARENT; LUT_SIZE];
        populate_lookup_table(table, params, &mut entries);

        debug!(
            product = %table.product,
            scheme = params.scheme_name(),
            opaque = entries.iter().filter(|c| c[3] > 0.0).count(),
            "Built lookup table"
        );

        Self { entries }
    }

    pub fn entries(&self) -> &[NormalizedColor; LUT_SIZE] {
        &self.entries
    }

    /// Normalized color for a raw data level.
    pub fn color(&self, level: u8) -> NormalizedColor {
        self.entries[level as usize]
    }

    /// Byte color for a raw data level.
    pub fn rgba(&self, level: u8) -> Rgba {
        Rgba::from_normalized(self.entries[level as usize])
    }

    /// Number of entries with non-zero alpha.
    pub fn opaque_entries(&self) -> usize {
        self.entries.iter().filter(|c| c[3] > 0.0).count()
    }

    /// Map raw levels to RGBA8 pixels, four bytes per level.
    pub fn colorize_levels(&self, levels: &[u8]) -> Vec<u8> {
        let mut palette = [[0u8; 4]; LUT_SIZE];
        for (slot, color) in palette.iter_mut().zip(self.entries.iter()) {
            *slot = Rgba::from_normalized(*color).to_array();
        }

        let mut pixels = vec![0u8; levels.len() * 4];
        pixels
            .par_chunks_mut(COLORIZE_CHUNK * 4)
            .zip(levels.par_chunks(COLORIZE_CHUNK))
            .for_each(|(out, chunk)| {
                for (pixel, &level) in out.chunks_exact_mut(4).zip(chunk) {
                    pixel.copy_from_slice(&palette[level as usize]);
                }
            });
        pixels
    }

    /// Colorize every populated data point of `product`, radial-major.
    pub fn colorize(&self, product: &RadarProduct) -> Vec<u8> {
        self.colorize_levels(product.scan.data_points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_table::Step;

    fn two_step_table() -> ColorTable {
        ColorTable {
            color_steps: vec![
                Step {
                    value: 0.0,
                    color: Rgba::opaque(0, 0, 0),
                    color_end: None,
                },
                Step {
                    value: 10.0,
                    color: Rgba::opaque(255, 255, 255),
                    color_end: None,
                },
            ],
            ..ColorTable::default()
        }
    }

    #[test]
    fn test_interpolate_empty_table() {
        assert_eq!(interpolate(&ColorTable::default(), 5.0), TRANSPARENT);
    }

    #[test]
    fn test_interpolate_below_first_step() {
        assert_eq!(interpolate(&two_step_table(), -0.1), TRANSPARENT);
    }

    #[test]
    fn test_interpolate_nan_is_transparent() {
        assert_eq!(interpolate(&two_step_table(), f32::NAN), TRANSPARENT);
    }

    #[test]
    fn test_interpolate_blends_toward_next_step() {
        let color = interpolate(&two_step_table(), 5.0);
        assert!((color[0] - 0.5).abs() < 1e-6);
        assert_eq!(color[3], 1.0);
    }

    #[test]
    fn test_interpolate_clamps_above_last_step() {
        assert_eq!(interpolate(&two_step_table(), 99.0), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_interpolate_duplicate_steps() {
        let mut table = two_step_table();
        table.color_steps[1].value = 0.0;
        // Both steps sit at 0; the later one is the bottom and the span is 0.
        assert_eq!(interpolate(&table, 0.0), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_single_step_ignores_level() {
        let mut table = two_step_table();
        table.color_steps.truncate(1);
        assert_eq!(interpolate(&table, 1000.0), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_sentinel_entries() {
        let mut table = two_step_table();
        table.range_folded_color = Some(Rgba::opaque(255, 0, 255));
        let params = DecodingParameters::LinearIncrement {
            min_value: 0.0,
            increment: 1.0,
            num_levels: 10,
        };

        let lut = LookupTable::build(&table, &params);
        assert_eq!(lut.color(0), TRANSPARENT);
        assert_eq!(lut.rgba(1), Rgba::opaque(255, 0, 255));
    }

    #[test]
    fn test_colorize_levels() {
        let params = DecodingParameters::LinearIncrement {
            min_value: 0.0,
            increment: 10.0,
            num_levels: 2,
        };
        let lut = LookupTable::build(&two_step_table(), &params);

        let pixels = lut.colorize_levels(&[0, 2, 3]);
        assert_eq!(pixels, vec![0, 0, 0, 0, 0, 0, 0, 255, 255, 255, 255, 255]);
    }
}
