//! Non-local means denoising: each pixel becomes a weighted average of
//! pixels whose surrounding patches look alike, searched over a window
//! much larger than the patch itself.

use image::RgbImage;
use rayon::prelude::*;

/// Side of the square patch compared between pixel neighborhoods.
pub const PATCH_WINDOW: u32 = 7;
/// Side of the square region scanned for similar patches.
pub const SEARCH_WINDOW: u32 = 21;

/// Denoise with patch-similarity weighting. `h` steers how dissimilar a
/// patch may be and still contribute; larger values smooth harder.
pub fn nl_means(image: &RgbImage, h: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    let search_radius = (SEARCH_WINDOW / 2) as i64;
    let patch_radius = (PATCH_WINDOW / 2) as i64;
    let pad = search_radius + patch_radius;

    let padded = pad_mirrored(image, pad as u32);

    // Normalizing the patch distance by its sample count keeps `h` on
    // the same scale regardless of window size.
    let norm = h * h * (PATCH_WINDOW * PATCH_WINDOW * 3) as f32;

    let mut out = RgbImage::new(width, height);
    let row_stride = width as usize * 3;
    let out_pixels: &mut [u8] = &mut out;
    out_pixels
        .par_chunks_exact_mut(row_stride)
        .enumerate()
        .for_each(|(y, row)| {
            let cy = y as i64 + pad;
            for x in 0..width as i64 {
                let cx = x + pad;
                let mut sum = [0.0f32; 3];
                let mut weight_sum = 0.0f32;
                for sy in -search_radius..=search_radius {
                    for sx in -search_radius..=search_radius {
                        let distance =
                            patch_distance(&padded, cx, cy, cx + sx, cy + sy, patch_radius);
                        let weight = (-distance / norm).exp();
                        let candidate = padded.get_pixel((cx + sx) as u32, (cy + sy) as u32).0;
                        sum[0] += candidate[0] as f32 * weight;
                        sum[1] += candidate[1] as f32 * weight;
                        sum[2] += candidate[2] as f32 * weight;
                        weight_sum += weight;
                    }
                }
                // The zero offset compares a patch with itself and
                // contributes weight 1.0, so weight_sum >= 1.
                let base = x as usize * 3;
                for channel in 0..3 {
                    row[base + channel] =
                        (sum[channel] / weight_sum).round().clamp(0.0, 255.0) as u8;
                }
            }
        });
    out
}

/// Sum of squared differences between the patches centered at `a` and `b`
/// in the padded image.
fn patch_distance(
    padded: &RgbImage,
    ax: i64,
    ay: i64,
    bx: i64,
    by: i64,
    patch_radius: i64,
) -> f32 {
    let mut distance = 0.0f32;
    for dy in -patch_radius..=patch_radius {
        for dx in -patch_radius..=patch_radius {
            let pa = padded.get_pixel((ax + dx) as u32, (ay + dy) as u32).0;
            let pb = padded.get_pixel((bx + dx) as u32, (by + dy) as u32).0;
            for channel in 0..3 {
                let d = pa[channel] as f32 - pb[channel] as f32;
                distance += d * d;
            }
        }
    }
    distance
}

/// Extend the image by `pad` pixels on every side, mirroring across the
/// border. Mirroring degrades to a clamp on images smaller than the
/// padding, so any image size is accepted.
fn pad_mirrored(image: &RgbImage, pad: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width + 2 * pad, height + 2 * pad, |x, y| {
        let sx = mirror_index(x as i64 - pad as i64, width);
        let sy = mirror_index(y as i64 - pad as i64, height);
        *image.get_pixel(sx, sy)
    })
}

/// Reflect an out-of-range coordinate back inside `0..len` without
/// duplicating the edge pixel, clamping when the reflection overshoots
/// a tiny dimension.
fn mirror_index(idx: i64, len: u32) -> u32 {
    let len = len as i64;
    let mut i = idx;
    if i < 0 {
        i = -i;
    }
    if i >= len {
        i = 2 * (len - 1) - i;
    }
    i.clamp(0, len - 1) as u32
}
