//! RGBA colors and linear blending between them.

use serde::Serialize;

/// Normalized RGBA, each channel in `[0, 1]`.
pub type NormalizedColor = [f32; 4];

/// Fully transparent black, normalized.
pub const TRANSPARENT: NormalizedColor = [0.0, 0.0, 0.0, 0.0];

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    pub fn to_normalized(self) -> NormalizedColor {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Quantize a normalized color back to bytes. Channels are clamped.
    pub fn from_normalized(color: NormalizedColor) -> Self {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(
            quantize(color[0]),
            quantize(color[1]),
            quantize(color[2]),
            quantize(color[3]),
        )
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Linear interpolation from `from` toward `to`.
///
/// `t` is not clamped: a fraction outside `[0, 1]` extrapolates.
pub fn blend(from: NormalizedColor, to: NormalizedColor, t: f32) -> NormalizedColor {
    let t_inv = 1.0 - t;
    [
        from[0] * t_inv + to[0] * t,
        from[1] * t_inv + to[1] * t,
        from[2] * t_inv + to[2] * t,
        from[3] * t_inv + to[3] * t,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_round_trip() {
        let color = Rgba::new(255, 128, 64, 0);
        assert_eq!(Rgba::from_normalized(color.to_normalized()), color);
    }

    #[test]
    fn test_from_normalized_clamps() {
        assert_eq!(
            Rgba::from_normalized([1.5, -0.2, 0.5, 1.0]),
            Rgba::new(255, 0, 128, 255)
        );
    }

    #[test]
    fn test_blend_endpoints_and_midpoint() {
        let black = [0.0, 0.0, 0.0, 1.0];
        let white = [1.0, 1.0, 1.0, 1.0];
        assert_eq!(blend(black, white, 0.0), black);
        assert_eq!(blend(black, white, 1.0), white);
        assert_eq!(blend(black, white, 0.5), [0.5, 0.5, 0.5, 1.0]);
    }
}
