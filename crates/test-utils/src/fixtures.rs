//! Common test fixtures for Level 3 and color table tests.

/// Color table text fixtures.
pub mod palettes {
    /// A small reflectivity palette with gradient and solid steps, comments,
    /// CRLF endings and irregular spacing.
    pub const REFLECTIVITY: &str = "; NWS style reflectivity\r\n\
        Product: BR\r\n\
        Units: dBZ\r\n\
        Step: 5\r\n\
        \r\n\
        # gradient bands\r\n\
        Color: 5    0 236 236   1 160 246\r\n\
        Color: 20   0 255   0   0 144   0\r\n\
        SolidColor: 35 255 255 0\r\n\
        Color: 50  255   0   0 160 0 0\r\n\
        Color4: 65 255 0 255 255\r\n\
        RF: 119 0 125\r\n";

    /// Velocity palette in knots (triggers the knots to m/s conversion).
    pub const VELOCITY_KNOTS: &str = "Product: BV\n\
        Units: KT\n\
        Scale: 1\n\
        Offset: 0\n\
        Color: -64 0 0 255\n\
        Color: 0 128 128 128\n\
        Color: 64 255 0 0\n\
        RF: 119 0 125\n";

    /// Correlation coefficient palette with explicit alpha.
    pub const CORRELATION: &str = "Product: CC\n\
        Units: \n\
        Color4: 0.2 0 0 0 0\n\
        Color4: 0.7 0 0 255 200 0 255 0 255\n\
        Color4: 0.95 255 255 0 255\n\
        Color4: 1.05 255 0 0 255\n";

    /// Echo tops palette in kft.
    pub const ECHO_TOPS: &str = "Product: ET\n\
        Units: KFT\n\
        SolidColor: 0 100 100 100\n\
        SolidColor: 20 0 200 0\n\
        SolidColor: 40 200 200 0\n\
        SolidColor: 60 200 0 0\n";

    /// Metadata only, no steps.
    pub const EMPTY_STEPS: &str = "Product: BR\nUnits: dbZ\n";
}

/// Header values used by most decoder tests.
pub mod header {
    /// KTLX latitude in millidegrees.
    pub const KTLX_LATITUDE_MILLIDEG: i32 = 35_333;
    /// KTLX longitude in millidegrees.
    pub const KTLX_LONGITUDE_MILLIDEG: i32 = -97_278;
    /// 2024-01-14 in Level 3 day numbering.
    pub const SCAN_DATE: i16 = 19737;
    /// 22:26:06 UTC.
    pub const SCAN_TIME: i32 = 80766;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflectivity_fixture_uses_crlf() {
        assert!(palettes::REFLECTIVITY.contains("\r\n"));
        assert!(palettes::REFLECTIVITY.lines().any(|l| l.starts_with("RF:")));
    }

    #[test]
    fn test_empty_steps_fixture() {
        assert!(!palettes::EMPTY_STEPS.contains("Color"));
    }
}
