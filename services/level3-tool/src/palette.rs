//! Palette inspection: a parsed color table plus the lookup table it yields.

use level3_parser::DecodingParameters;
use renderer::{ColorTable, LookupTable, Rgba};
use serde::Serialize;

/// Typical decoding constants for common products, used when a palette is
/// inspected without a product file to read them from.
pub fn nominal_parameters(product_code: i16) -> Option<DecodingParameters> {
    let params = match product_code {
        19 | 20 | 37 | 38 | 94 | 153 | 180 | 186 => DecodingParameters::LinearIncrement {
            min_value: -32.0,
            increment: 0.5,
            num_levels: 254,
        },
        27 | 56 | 99 | 154 | 182 => DecodingParameters::LinearIncrement {
            min_value: -63.5,
            increment: 0.5,
            num_levels: 254,
        },
        134 => DecodingParameters::LinearIncrement {
            min_value: 0.0,
            increment: 0.3,
            num_levels: 254,
        },
        135 => DecodingParameters::EchoTops {
            topped_mask: 0x80,
            data_mask: 0x7f,
            data_scale: 1.0,
            data_offset: 2.0,
        },
        159 => DecodingParameters::ScaledOffset {
            scale: 16.0,
            offset: 128.0,
            max_data_level: 254,
            leading_flags: 2,
        },
        161 => DecodingParameters::ScaledOffset {
            scale: 300.0,
            offset: -60.5,
            max_data_level: 254,
            leading_flags: 2,
        },
        163 => DecodingParameters::ScaledOffset {
            scale: 20.0,
            offset: 43.0,
            max_data_level: 254,
            leading_flags: 2,
        },
        _ => return None,
    };
    Some(params)
}

/// One lookup table entry in a palette dump.
#[derive(Debug, Clone, Serialize)]
pub struct LutEntry {
    pub level: u8,
    pub physical_value: Option<f32>,
    pub color: Rgba,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaletteDump {
    pub table: ColorTable,
    pub decoding_parameters: DecodingParameters,
    pub opaque_entries: usize,
    /// Only entries with a non-transparent color.
    pub entries: Vec<LutEntry>,
}

impl PaletteDump {
    pub fn new(table: ColorTable, params: DecodingParameters) -> Self {
        let lut = LookupTable::build(&table, &params);
        let entries = (0..=u8::MAX)
            .map(|level| LutEntry {
                level,
                physical_value: params.physical_value(level),
                color: lut.rgba(level),
            })
            .filter(|entry| entry.color.a > 0)
            .collect();

        Self {
            opaque_entries: lut.opaque_entries(),
            table,
            decoding_parameters: params,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::palettes;

    #[test]
    fn test_nominal_parameters() {
        assert!(matches!(
            nominal_parameters(94),
            Some(DecodingParameters::LinearIncrement { num_levels: 254, .. })
        ));
        assert!(matches!(
            nominal_parameters(135),
            Some(DecodingParameters::EchoTops { .. })
        ));
        assert!(nominal_parameters(2).is_none());
    }

    #[test]
    fn test_palette_dump() {
        let table: ColorTable = palettes::REFLECTIVITY.parse().unwrap();
        let params = nominal_parameters(94).unwrap();
        let dump = PaletteDump::new(table, params);

        // RF plus every level at or above 5 dBZ (index 76 onward)
        assert_eq!(dump.entries.len(), 1 + (255 - 76 + 1));
        assert_eq!(dump.entries.len(), dump.opaque_entries);
        assert_eq!(dump.entries[0].level, 1);
        assert_eq!(dump.entries[0].physical_value, None);
        assert_eq!(dump.entries[1].physical_value, Some(5.0));
    }
}
