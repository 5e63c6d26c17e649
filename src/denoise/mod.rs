//! Filter selection and parameter derivation.
//!
//! A single entry point, [`denoise`], maps the `(method, strength)` pair
//! from the upload form onto one of four classical filters:
//!
//! | method      | strength becomes                                     |
//! |-------------|------------------------------------------------------|
//! | `gaussian`  | square kernel size (must be odd)                     |
//! | `median`    | aperture size (must be odd)                          |
//! | `bilateral` | diameter `2*strength+1`, color and spatial sigmas    |
//! | `nlm`       | filter strength `h`; fixed 7x7/21x21 windows         |
//!
//! Any other method name passes the image through untouched. That
//! fallback is part of the contract: a client probing with an unknown
//! method gets its pixels back, not an error.

mod bilateral;
mod nlmeans;

use image::RgbImage;
use thiserror::Error;

pub use bilateral::bilateral_filter;
pub use nlmeans::{nl_means, PATCH_WINDOW, SEARCH_WINDOW};

/// Ceiling on `strength` for recognized methods, far past the useful
/// range for 8-bit images. Oversized values are refused, never clamped;
/// below this bound every derivation fits comfortably in `u32`.
pub const MAX_STRENGTH: u32 = 255;

/// Errors from parameter derivation. Once parameters are valid the
/// filters themselves cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenoiseError {
    /// Strength becomes a kernel size, an aperture, a diameter, or `h`;
    /// zero is meaningless for all four.
    #[error("strength must be at least 1")]
    ZeroStrength,
    /// Strength past [`MAX_STRENGTH`]. Refused before any kernel or
    /// window is sized from it.
    #[error("strength {strength} exceeds the maximum {}", MAX_STRENGTH)]
    ExcessiveStrength { strength: u32 },
    /// Kernel-based methods need an odd window so the kernel has a
    /// center pixel. Bilateral and nlm never hit this.
    #[error("{method} requires an odd strength, got {strength}")]
    EvenStrength { method: &'static str, strength: u32 },
}

/// The four recognized filtering strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenoiseMethod {
    Gaussian,
    Median,
    Bilateral,
    NlMeans,
}

impl DenoiseMethod {
    /// Match a form value to a strategy. Case-sensitive: these are the
    /// exact values the upload page submits.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "gaussian" => Some(Self::Gaussian),
            "median" => Some(Self::Median),
            "bilateral" => Some(Self::Bilateral),
            "nlm" => Some(Self::NlMeans),
            _ => None,
        }
    }

    /// The form value, also used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Gaussian => "gaussian",
            Self::Median => "median",
            Self::Bilateral => "bilateral",
            Self::NlMeans => "nlm",
        }
    }
}

/// Apply the selected filter to `image`, deriving the filter's native
/// parameters from `strength`. Unrecognized `method` values return a
/// copy of the input unchanged; recognized methods accept strengths
/// `1..=MAX_STRENGTH`.
///
/// The output always has the input's dimensions and channel count; no
/// filter crops or pads.
pub fn denoise(image: &RgbImage, method: &str, strength: u32) -> Result<RgbImage, DenoiseError> {
    let Some(method) = DenoiseMethod::parse(method) else {
        return Ok(image.clone());
    };
    if strength == 0 {
        return Err(DenoiseError::ZeroStrength);
    }
    if strength > MAX_STRENGTH {
        return Err(DenoiseError::ExcessiveStrength { strength });
    }
    match method {
        DenoiseMethod::Gaussian => gaussian_blur(image, strength),
        DenoiseMethod::Median => median_blur(image, strength),
        DenoiseMethod::Bilateral => {
            let sigma = strength as f32;
            Ok(bilateral_filter(image, 2 * strength + 1, sigma, sigma))
        }
        DenoiseMethod::NlMeans => Ok(nl_means(image, strength as f32)),
    }
}

/// Sigma OpenCV derives from a kernel size when none is given:
/// `0.3*((k-1)*0.5 - 1) + 0.8`. Keeps blur radius in step with the
/// strength slider.
fn sigma_for_kernel(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Gaussian blur with a square `strength x strength` kernel.
fn gaussian_blur(image: &RgbImage, strength: u32) -> Result<RgbImage, DenoiseError> {
    if strength % 2 == 0 {
        return Err(DenoiseError::EvenStrength {
            method: DenoiseMethod::Gaussian.name(),
            strength,
        });
    }
    // A 1x1 kernel is a single identity tap.
    if strength == 1 {
        return Ok(image.clone());
    }
    Ok(imageproc::filter::gaussian_blur_f32(
        image,
        sigma_for_kernel(strength),
    ))
}

/// Median blur over a square aperture of side `strength`.
fn median_blur(image: &RgbImage, strength: u32) -> Result<RgbImage, DenoiseError> {
    if strength % 2 == 0 {
        return Err(DenoiseError::EvenStrength {
            method: DenoiseMethod::Median.name(),
            strength,
        });
    }
    // Aperture 1 is a single-pixel window, i.e. a copy.
    if strength == 1 {
        return Ok(image.clone());
    }
    let radius = (strength - 1) / 2;
    Ok(imageproc::filter::median_filter(image, radius, radius))
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn uniform(width: u32, height: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([value, value, value]))
    }

    /// Tiled blocks plus a mild per-pixel ripple: enough low-frequency
    /// structure for smoothing effects to survive quantization.
    fn textured(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let tile = if (x / 8 + y / 8) % 2 == 0 { 64u8 } else { 192 };
            let ripple = ((x * 31 + y * 17) % 13) as u8;
            Rgb([tile + ripple, tile, 255 - tile])
        })
    }

    #[test]
    fn kernel_methods_preserve_dimensions_for_odd_strengths() {
        let img = textured(24, 18);
        for method in ["gaussian", "median", "bilateral"] {
            for strength in (1..=15).step_by(2) {
                let out = denoise(&img, method, strength).unwrap();
                assert_eq!(out.dimensions(), (24, 18), "{method} s={strength}");
            }
        }
    }

    #[test]
    fn nlm_preserves_dimensions() {
        let img = textured(16, 12);
        for strength in [1, 5, 15] {
            let out = denoise(&img, "nlm", strength).unwrap();
            assert_eq!(out.dimensions(), (16, 12), "nlm s={strength}");
        }
    }

    #[test]
    fn unknown_method_is_pass_through() {
        let img = textured(20, 20);
        let out = denoise(&img, "unknown-method", 7).unwrap();
        assert_eq!(out.as_raw(), img.as_raw());
        // Strength is irrelevant for the fallback, zero included.
        let out = denoise(&img, "wavelet", 0).unwrap();
        assert_eq!(out.as_raw(), img.as_raw());
    }

    #[test]
    fn method_matching_is_case_sensitive() {
        // "Gaussian" is not a recognized value, so even strength 4 must
        // fall through to the copy rather than the odd-kernel error.
        let img = textured(8, 8);
        let out = denoise(&img, "Gaussian", 4).unwrap();
        assert_eq!(out.as_raw(), img.as_raw());
    }

    #[test]
    fn bilateral_accepts_every_slider_strength() {
        let img = textured(16, 16);
        for strength in 1..=15 {
            let out = denoise(&img, "bilateral", strength).unwrap();
            assert_eq!(out.dimensions(), img.dimensions(), "bilateral s={strength}");
        }
    }

    #[test]
    fn even_strength_fails_kernel_methods() {
        let img = uniform(8, 8, 128);
        for strength in (2..=14).step_by(2) {
            for method in ["gaussian", "median"] {
                let err = denoise(&img, method, strength).unwrap_err();
                assert_eq!(err, DenoiseError::EvenStrength { method, strength });
            }
        }
    }

    #[test]
    fn zero_strength_is_rejected_for_recognized_methods() {
        let img = uniform(8, 8, 128);
        for method in ["gaussian", "median", "bilateral", "nlm"] {
            let err = denoise(&img, method, 0).unwrap_err();
            assert_eq!(err, DenoiseError::ZeroStrength, "{method}");
        }
    }

    #[test]
    fn excessive_strength_is_rejected_for_recognized_methods() {
        let img = uniform(8, 8, 128);
        for method in ["gaussian", "median", "bilateral", "nlm"] {
            let err = denoise(&img, method, u32::MAX).unwrap_err();
            assert_eq!(
                err,
                DenoiseError::ExcessiveStrength { strength: u32::MAX },
                "{method}"
            );
        }
        // The ceiling is checked before parity, so an even 256 is
        // excessive rather than an odd-kernel failure.
        let err = denoise(&img, "gaussian", 256).unwrap_err();
        assert_eq!(err, DenoiseError::ExcessiveStrength { strength: 256 });
    }

    #[test]
    fn bilateral_accepts_the_maximum_strength() {
        let img = uniform(8, 8, 128);
        let out = denoise(&img, "bilateral", MAX_STRENGTH).unwrap();
        assert_eq!(out.dimensions(), (8, 8));
    }

    #[test]
    fn strength_one_gaussian_is_identity() {
        let img = textured(10, 10);
        let out = denoise(&img, "gaussian", 1).unwrap();
        assert_eq!(out.as_raw(), img.as_raw());
    }

    #[test]
    fn strength_one_median_is_identity() {
        let img = textured(10, 10);
        let out = denoise(&img, "median", 1).unwrap();
        assert_eq!(out.as_raw(), img.as_raw());
    }

    #[test]
    fn gaussian_keeps_flat_field_flat() {
        let img = uniform(100, 100, 128);
        let out = denoise(&img, "gaussian", 5).unwrap();
        assert_eq!(out.dimensions(), (100, 100));
        for pixel in out.pixels() {
            for &channel in &pixel.0 {
                assert!(
                    (channel as i16 - 128).abs() <= 1,
                    "expected near 128, got {channel}"
                );
            }
        }
    }

    #[test]
    fn repeated_gaussian_compounds() {
        let img = textured(32, 32);
        let once = denoise(&img, "gaussian", 5).unwrap();
        let twice = denoise(&once, "gaussian", 5).unwrap();
        assert_ne!(once.as_raw(), twice.as_raw());
    }

    #[test]
    fn nlm_completes_beyond_search_window_size() {
        let img = textured(50, 50);
        let out = denoise(&img, "nlm", 5).unwrap();
        assert_eq!(out.dimensions(), (50, 50));
    }

    #[test]
    fn median_removes_impulse_noise() {
        let mut img = uniform(9, 9, 0);
        img.put_pixel(4, 4, Rgb([255, 255, 255]));
        let out = denoise(&img, "median", 3).unwrap();
        assert_eq!(out.get_pixel(4, 4), &Rgb([0, 0, 0]));
    }

    #[test]
    fn default_form_method_is_recognized() {
        assert_eq!(
            DenoiseMethod::parse(crate::config::DEFAULT_METHOD),
            Some(DenoiseMethod::Gaussian)
        );
    }

    #[test]
    fn sigma_derivation_matches_opencv_table() {
        assert!((sigma_for_kernel(3) - 0.8).abs() < 1e-6);
        assert!((sigma_for_kernel(5) - 1.1).abs() < 1e-6);
        assert!((sigma_for_kernel(7) - 1.4).abs() < 1e-6);
    }

    #[test]
    fn method_names_round_trip() {
        for method in [
            DenoiseMethod::Gaussian,
            DenoiseMethod::Median,
            DenoiseMethod::Bilateral,
            DenoiseMethod::NlMeans,
        ] {
            assert_eq!(DenoiseMethod::parse(method.name()), Some(method));
        }
    }
}
