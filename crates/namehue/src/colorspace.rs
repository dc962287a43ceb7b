//! RGB and HSL color types for identity color derivation.
//!
//! # HSL to RGB
//!
//! Conversion uses the standard six-sector algorithm. With hue `H` in
//! degrees and saturation `S` / lightness `L` as percentages:
//!
//! | Quantity | Formula |
//! |----------|---------|
//! | chroma   | `C = (100 - abs(2L - 100)) * S / 100 / 100` |
//! | second   | `X = C * (1 - abs((H / 60) mod 2 - 1))` |
//! | offset   | `m = L / 100 - C / 2` |
//!
//! The sector `floor(H / 60)` picks how `(C, X, 0)` is distributed over
//! `(R, G, B)` before `m` is added.
//!
//! Lightness is deliberately not clamped. Values past 0–100 produce channels
//! outside 0.0–1.0, which saturate at the byte boundary when converted to
//! [`Rgb`]. Existing identity colors depend on this exact arithmetic, so the
//! operation order here matters.
//!
//! # Example
//!
//! ```rust
//! use namehue::colorspace::{Hsl, Rgb};
//!
//! let red = Hsl::new(0.0, 100.0, 50.0).to_linear().to_rgb();
//! assert_eq!(red, Rgb(255, 0, 0));
//! assert_eq!(red.to_hex(), "#ff0000");
//! assert_eq!(Rgb::parse_hex("#f00").unwrap(), red);
//! ```

use std::fmt;

// ─── Rgb ────────────────────────────────────────────────────────────────────

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Encodes as lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Parses `#rgb` or `#rrggbb` (the `#` is optional).
    pub fn parse_hex(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.is_ascii() {
            return Err(format!("Invalid hex: {}", s));
        }
        let digit = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| format!("Invalid hex: {}", s))
        };
        match hex.len() {
            // #rgb -> #rrggbb
            3 => Ok(Rgb(digit(0..1)? * 17, digit(1..2)? * 17, digit(2..3)? * 17)),
            6 => Ok(Rgb(digit(0..2)?, digit(2..4)?, digit(4..6)?)),
            _ => Err(format!(
                "Invalid hex color: {} (must be 3 or 6 digits)",
                s
            )),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ─── LinearRgb ──────────────────────────────────────────────────────────────

/// Unquantized RGB channels, nominally 0.0–1.0 but unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl LinearRgb {
    /// Luminance weighted by the cube of each channel.
    ///
    /// Cubing penalizes bright channels far more than the linear Rec. 709
    /// weights alone, so mid-bright colors read as brighter than they would
    /// under the textbook formula.
    pub fn cubed_luminance(&self) -> f64 {
        self.r * self.r * self.r * 0.2126
            + self.g * self.g * self.g * 0.7152
            + self.b * self.b * self.b * 0.0722
    }

    /// Rounds each channel to a byte, saturating at 0 and 255.
    pub fn to_rgb(&self) -> Rgb {
        Rgb(
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b),
        )
    }
}

fn channel_to_byte(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

// ─── Hsl ────────────────────────────────────────────────────────────────────

/// HSL with hue in degrees and saturation/lightness as percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Returns a copy with lightness shifted by `delta` percentage points.
    pub fn lighten(&self, delta: f64) -> Self {
        Self {
            lightness: self.lightness + delta,
            ..*self
        }
    }

    /// Converts to unquantized RGB.
    ///
    /// Hues outside `[0, 360)` fall into no sector and yield the gray `m`.
    pub fn to_linear(&self) -> LinearRgb {
        let Hsl {
            hue: h,
            saturation: s,
            lightness: l,
        } = *self;

        let c = (100.0 - (2.0 * l - 100.0).abs()) * s / 100.0 / 100.0;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l / 100.0 - c / 2.0;

        let (r, g, b) = match (h / 60.0).floor() as i64 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            5 => (c, 0.0, x),
            _ => (0.0, 0.0, 0.0),
        };

        LinearRgb {
            r: r + m,
            g: g + m,
            b: b + m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Rgb
    // =====================================================================

    #[test]
    fn test_to_hex_pads_and_lowercases() {
        assert_eq!(Rgb(0, 10, 255).to_hex(), "#000aff");
        assert_eq!(Rgb(171, 205, 239).to_string(), "#abcdef");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse_hex("#ff6b35").unwrap(), Rgb(255, 107, 53));
        assert_eq!(Rgb::parse_hex("FF6B35").unwrap(), Rgb(255, 107, 53));
        assert_eq!(Rgb::parse_hex("#fff").unwrap(), Rgb(255, 255, 255));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(Rgb::parse_hex("#ff00").is_err());
        assert!(Rgb::parse_hex("#gggggg").is_err());
        assert!(Rgb::parse_hex("red").is_err());
        assert!(Rgb::parse_hex("#ééé").is_err());
    }

    // =====================================================================
    // Hsl → RGB
    // =====================================================================

    #[test]
    fn test_primary_sectors() {
        assert_eq!(Hsl::new(0.0, 100.0, 50.0).to_linear().to_rgb(), Rgb(255, 0, 0));
        assert_eq!(Hsl::new(120.0, 100.0, 50.0).to_linear().to_rgb(), Rgb(0, 255, 0));
        assert_eq!(Hsl::new(240.0, 100.0, 50.0).to_linear().to_rgb(), Rgb(0, 0, 255));
    }

    #[test]
    fn test_secondary_sectors() {
        assert_eq!(Hsl::new(60.0, 100.0, 50.0).to_linear().to_rgb(), Rgb(255, 255, 0));
        assert_eq!(Hsl::new(180.0, 100.0, 50.0).to_linear().to_rgb(), Rgb(0, 255, 255));
        assert_eq!(Hsl::new(300.0, 100.0, 50.0).to_linear().to_rgb(), Rgb(255, 0, 255));
    }

    #[test]
    fn test_zero_saturation_is_gray() {
        let rgb = Hsl::new(200.0, 0.0, 50.0).to_linear().to_rgb();
        assert_eq!(rgb, Rgb(128, 128, 128));
    }

    #[test]
    fn test_out_of_range_lightness_saturates() {
        assert_eq!(Hsl::new(30.0, 80.0, 130.0).to_linear().to_rgb(), Rgb(255, 255, 255));
        assert_eq!(Hsl::new(30.0, 80.0, -20.0).to_linear().to_rgb(), Rgb(0, 0, 0));
    }

    #[test]
    fn test_lighten_only_moves_lightness() {
        let base = Hsl::new(127.0, 62.0, 42.0);
        let shifted = base.lighten(-1.5);
        assert_eq!(shifted.hue, 127.0);
        assert_eq!(shifted.saturation, 62.0);
        assert_eq!(shifted.lightness, 40.5);
    }

    #[test]
    fn test_cubed_luminance_weights() {
        let white = LinearRgb { r: 1.0, g: 1.0, b: 1.0 };
        assert!((white.cubed_luminance() - 1.0).abs() < 1e-12);
        let half_green = LinearRgb { r: 0.0, g: 0.5, b: 0.0 };
        assert!((half_green.cubed_luminance() - 0.0894).abs() < 1e-12);
    }
}
