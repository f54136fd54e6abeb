//! Conversion from raw data levels to physical units.
//!
//! Level 3 products store one byte per range bin. How that byte becomes dBZ,
//! m/s, kft or a correlation coefficient depends on the product, and the
//! header carries the constants for one of three schemes.

use serde::Serialize;

/// Data level meaning "below threshold".
pub const LEVEL_BELOW_THRESHOLD: u8 = 0;
/// Data level meaning "range folded" or otherwise bad.
pub const LEVEL_RANGE_FOLDED: u8 = 1;

/// Per-product decoding constants, selected by product code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum DecodingParameters {
    /// `physical = (level - 2) * increment + min_value`
    LinearIncrement {
        min_value: f32,
        increment: f32,
        num_levels: u32,
    },
    /// Enhanced echo tops: the low bits carry the height, one bit flags a
    /// topped echo.
    EchoTops {
        topped_mask: u8,
        data_mask: u8,
        data_scale: f32,
        data_offset: f32,
    },
    /// Dual-pol style `physical = (level - offset) / scale`.
    ScaledOffset {
        scale: f32,
        offset: f32,
        max_data_level: u32,
        leading_flags: u32,
    },
}

impl DecodingParameters {
    /// Convert a raw level to its physical value.
    ///
    /// Returns `None` for the reserved sentinel levels and, for
    /// [`DecodingParameters::ScaledOffset`], for levels outside
    /// `[leading_flags, max_data_level)`.
    pub fn physical_value(&self, level: u8) -> Option<f32> {
        match *self {
            DecodingParameters::LinearIncrement {
                min_value,
                increment,
                ..
            } => {
                if level < 2 {
                    return None;
                }
                Some((level - 2) as f32 * increment + min_value)
            }
            DecodingParameters::EchoTops {
                data_mask,
                data_scale,
                data_offset,
                ..
            } => {
                if level < 2 {
                    return None;
                }
                Some((level & data_mask) as f32 / data_scale - data_offset)
            }
            DecodingParameters::ScaledOffset {
                scale,
                offset,
                max_data_level,
                leading_flags,
            } => {
                let level = level as u32;
                if level < leading_flags || level >= max_data_level {
                    return None;
                }
                Some((level as f32 - offset) / scale)
            }
        }
    }

    /// Whether an echo-tops level carries the "topped" flag. Always false for
    /// the other schemes.
    pub fn is_topped(&self, level: u8) -> bool {
        match *self {
            DecodingParameters::EchoTops { topped_mask, .. } => level & topped_mask != 0,
            _ => false,
        }
    }

    /// Short scheme name, used in logs and summaries.
    pub fn scheme_name(&self) -> &'static str {
        match self {
            DecodingParameters::LinearIncrement { .. } => "linear_increment",
            DecodingParameters::EchoTops { .. } => "echo_tops",
            DecodingParameters::ScaledOffset { .. } => "scaled_offset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reflectivity() -> DecodingParameters {
        DecodingParameters::LinearIncrement {
            min_value: -32.0,
            increment: 0.5,
            num_levels: 254,
        }
    }

    #[test]
    fn test_linear_increment_sentinels() {
        let params = reflectivity();
        assert_eq!(params.physical_value(LEVEL_BELOW_THRESHOLD), None);
        assert_eq!(params.physical_value(LEVEL_RANGE_FOLDED), None);
    }

    #[test]
    fn test_linear_increment_values() {
        let params = reflectivity();
        assert_eq!(params.physical_value(2), Some(-32.0));
        assert_eq!(params.physical_value(66), Some(0.0));
        assert_eq!(params.physical_value(255), Some(94.5));
    }

    #[test]
    fn test_echo_tops_masking() {
        let params = DecodingParameters::EchoTops {
            topped_mask: 0x80,
            data_mask: 0x7f,
            data_scale: 1.0,
            data_offset: 2.0,
        };
        // 0x80 | 42 -> height bits 42, topped
        let level = 0x80 | 42;
        assert_eq!(params.physical_value(level), Some(40.0));
        assert!(params.is_topped(level));
        assert!(!params.is_topped(42));
    }

    #[test]
    fn test_scaled_offset_valid_range() {
        let params = DecodingParameters::ScaledOffset {
            scale: 300.0,
            offset: -60.5,
            max_data_level: 255,
            leading_flags: 2,
        };
        assert_eq!(params.physical_value(1), None);
        assert_eq!(params.physical_value(255), None);

        let value = params.physical_value(240).unwrap();
        assert!((value - (240.0 + 60.5) / 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_echo_tops_never_topped() {
        assert!(!reflectivity().is_topped(0xff));
    }
}
