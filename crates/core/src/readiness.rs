//! Adobe Stock readiness classification.
//!
//! Pure evaluation against pre-computed dimensions; the sniffer
//! ([`crate::imagemeta`]) supplies them.

use serde::Serialize;

use crate::imagemeta::Dimensions;

/// Minimum pixel count Adobe Stock accepts for a submission.
pub const ADOBE_MIN_PIXELS: u64 = 4_000_000;

/// Result of classifying an image against the Adobe minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Readiness {
    /// Total pixel count, when dimensions are known.
    pub pixels: Option<u64>,
    /// True when the pixel count meets [`ADOBE_MIN_PIXELS`]; unknown
    /// dimensions classify as not ready.
    pub meets_adobe_min: bool,
}

/// Classify dimensions against the Adobe Stock minimum.
pub fn adobe_readiness(dims: Option<Dimensions>) -> Readiness {
    match dims {
        Some(d) => {
            let pixels = u64::from(d.width) * u64::from(d.height);
            Readiness {
                pixels: Some(pixels),
                meets_adobe_min: pixels >= ADOBE_MIN_PIXELS,
            }
        }
        None => Readiness {
            pixels: None,
            meets_adobe_min: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> Option<Dimensions> {
        Some(Dimensions { width, height })
    }

    #[test]
    fn exactly_four_megapixels_is_ready() {
        let r = adobe_readiness(dims(2000, 2000));
        assert_eq!(r.pixels, Some(4_000_000));
        assert!(r.meets_adobe_min);
    }

    #[test]
    fn one_pixel_short_is_not_ready() {
        let r = adobe_readiness(dims(1999, 2000));
        assert_eq!(r.pixels, Some(3_998_000));
        assert!(!r.meets_adobe_min);
    }

    #[test]
    fn comfortably_above_the_minimum() {
        assert!(adobe_readiness(dims(2000, 3000)).meets_adobe_min);
    }

    #[test]
    fn unknown_dimensions_are_not_ready() {
        let r = adobe_readiness(None);
        assert_eq!(r.pixels, None);
        assert!(!r.meets_adobe_min);
    }
}
