//! Deterministic identity colors.
//!
//! Every identity gets a color computed purely from its MD5 digest, so the
//! same user is the same color on every server restart and every host.
//!
//! # Algorithm
//!
//! 1. Hash the identity with MD5 and read three big-endian 16-bit words
//!    from disjoint slices of the digest.
//! 2. Seed hue from bytes 2–3 (`0..360`), saturation from bytes 0–1
//!    (`40..90`) and lightness from bytes 4–5 (`30..50`). The narrow ranges
//!    keep names off near-black, near-white and washed-out gray.
//! 3. Convert to RGB, measure [cubed luminance], and correct lightness:
//!    - base shift `(lum - 0.2) * -150`
//!    - above 18, the excess is scaled: `(shift - 18) * 2.5`
//!    - below 0, it is damped: `shift / 3`
//!    - within 15° of 180° or 240° (cyan/blue, hard to read on the chat
//!      background) add `(15 - distance) / 3`
//! 4. Convert again with the corrected lightness and encode as `#rrggbb`.
//!
//! The constants are empirical. Changing any of them recolors existing
//! users.
//!
//! [cubed luminance]: crate::colorspace::LinearRgb::cubed_luminance

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::colorspace::{Hsl, LinearRgb, Rgb};
use crate::identity::Identity;

/// Hues that read poorly on the chat background.
const PROBLEM_HUES: [f64; 2] = [180.0, 240.0];

/// Half-width of the band around a problem hue that gets extra darkening.
const PROBLEM_BAND: f64 = 15.0;

/// The hash-derived HSL values before lightness correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HslSeed {
    /// Degrees, `0..360`.
    pub hue: u16,
    /// Percent, `40..90`.
    pub saturation: u8,
    /// Percent, `30..50`.
    pub lightness: u8,
}

impl HslSeed {
    pub fn from_identity(identity: &Identity) -> Self {
        Self::from_digest(&md5::compute(identity.as_str()).0)
    }

    fn from_digest(digest: &[u8; 16]) -> Self {
        let word = |i: usize| u16::from_be_bytes([digest[i], digest[i + 1]]);
        Self {
            hue: word(2) % 360,
            saturation: (word(0) % 50 + 40) as u8,
            lightness: (word(4) % 20 + 30) as u8,
        }
    }

    pub fn to_hsl(&self) -> Hsl {
        Hsl::new(
            f64::from(self.hue),
            f64::from(self.saturation),
            f64::from(self.lightness),
        )
    }
}

/// Lightness shift, in percentage points, for a color of the given hue whose
/// uncorrected RGB is `base`.
pub fn lightness_correction(hue: f64, base: &LinearRgb) -> f64 {
    let mut shift = (base.cubed_luminance() - 0.2) * -150.0;
    if shift > 18.0 {
        shift = (shift - 18.0) * 2.5;
    } else if shift < 0.0 {
        shift /= 3.0;
    }

    let distance = PROBLEM_HUES
        .iter()
        .map(|problem| (problem - hue).abs())
        .fold(f64::INFINITY, f64::min);
    if distance < PROBLEM_BAND {
        shift += (PROBLEM_BAND - distance) / 3.0;
    }
    shift
}

/// Computes the display color for `identity`. Pure; no caching.
pub fn derive_color(identity: &Identity) -> Rgb {
    let hsl = HslSeed::from_identity(identity).to_hsl();
    let shift = lightness_correction(hsl.hue, &hsl.to_linear());
    hsl.lighten(shift).to_linear().to_rgb()
}

/// Process-lifetime cache of derived colors.
///
/// Entries are never evicted: identities are human user names, so the cache
/// is bounded by the number of distinct users seen.
#[derive(Debug, Default)]
pub struct DerivedColors {
    cache: RwLock<HashMap<Identity, Rgb>>,
}

impl DerivedColors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached color for `identity`, deriving it on first use.
    pub fn get(&self, identity: &Identity) -> Rgb {
        if let Some(rgb) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identity)
        {
            return *rgb;
        }

        let rgb = derive_color(identity);
        tracing::debug!(identity = %identity, color = %rgb, "derived identity color");
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(identity.clone(), rgb);
        rgb
    }

    /// Number of cached identities.
    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
