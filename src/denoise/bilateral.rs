//! Bilateral filtering: noise smoothing that keeps edges, by weighting
//! each neighbor with the product of a spatial Gaussian (distance from
//! the center) and a range Gaussian (RGB distance from the center pixel).

use image::RgbImage;
use rayon::prelude::*;

/// Apply a bilateral filter over a square window of `diameter` pixels.
///
/// `sigma_color` controls how much chromatic difference a neighbor may
/// show and still contribute; `sigma_space` controls how fast influence
/// decays with distance. Borders are handled by clamping sample
/// coordinates, so output dimensions equal input dimensions.
pub fn bilateral_filter(
    image: &RgbImage,
    diameter: u32,
    sigma_color: f32,
    sigma_space: f32,
) -> RgbImage {
    let (width, height) = image.dimensions();
    let radius = (diameter / 2) as i64;
    let window = (2 * radius + 1) as usize;

    let space_coeff = -1.0 / (2.0 * sigma_space * sigma_space);
    let color_coeff = -1.0 / (2.0 * sigma_color * sigma_color);

    // Spatial weights depend only on the offset; build the window once.
    let mut spatial = vec![0.0f32; window * window];
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let idx = (dy + radius) as usize * window + (dx + radius) as usize;
            spatial[idx] = (((dx * dx + dy * dy) as f32) * space_coeff).exp();
        }
    }

    let mut out = RgbImage::new(width, height);
    let row_stride = width as usize * 3;
    let out_pixels: &mut [u8] = &mut out;
    out_pixels
        .par_chunks_exact_mut(row_stride)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i64;
            for x in 0..width as i64 {
                let center = image.get_pixel(x as u32, y as u32).0;
                let mut sum = [0.0f32; 3];
                let mut weight_sum = 0.0f32;
                for dy in -radius..=radius {
                    let ny = (y + dy).clamp(0, height as i64 - 1) as u32;
                    for dx in -radius..=radius {
                        let nx = (x + dx).clamp(0, width as i64 - 1) as u32;
                        let neighbor = image.get_pixel(nx, ny).0;
                        let dr = neighbor[0] as f32 - center[0] as f32;
                        let dg = neighbor[1] as f32 - center[1] as f32;
                        let db = neighbor[2] as f32 - center[2] as f32;
                        let color_dist_sq = dr * dr + dg * dg + db * db;
                        let idx = (dy + radius) as usize * window + (dx + radius) as usize;
                        let weight = spatial[idx] * (color_dist_sq * color_coeff).exp();
                        sum[0] += neighbor[0] as f32 * weight;
                        sum[1] += neighbor[1] as f32 * weight;
                        sum[2] += neighbor[2] as f32 * weight;
                        weight_sum += weight;
                    }
                }
                // The center contributes weight 1.0, so weight_sum >= 1.
                let base = x as usize * 3;
                for channel in 0..3 {
                    row[base + channel] =
                        (sum[channel] / weight_sum).round().clamp(0.0, 255.0) as u8;
                }
            }
        });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn uniform(width: u32, height: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([value, value, value]))
    }

    #[test]
    fn uniform_image_is_unchanged() {
        let img = uniform(12, 12, 200);
        let out = bilateral_filter(&img, 7, 3.0, 3.0);
        for pixel in out.pixels() {
            assert_eq!(pixel.0, [200, 200, 200]);
        }
    }

    #[test]
    fn preserves_dimensions() {
        let img = uniform(21, 9, 80);
        let out = bilateral_filter(&img, 11, 5.0, 5.0);
        assert_eq!(out.dimensions(), (21, 9));
    }

    #[test]
    fn keeps_step_edges_sharp() {
        // Two flat regions 155 levels apart: the range weight shuts out
        // cross-edge neighbors, so both sides stay at their plateau.
        let img = RgbImage::from_fn(16, 8, |x, _| {
            if x < 8 {
                Rgb([50, 50, 50])
            } else {
                Rgb([205, 205, 205])
            }
        });
        let out = bilateral_filter(&img, 7, 25.0, 5.0);
        assert!((out.get_pixel(7, 4).0[0] as i16 - 50).abs() <= 2);
        assert!((out.get_pixel(8, 4).0[0] as i16 - 205).abs() <= 2);
    }

    #[test]
    fn smooths_small_fluctuations() {
        // Ripple of +/-10 around 128 with a generous color sigma: the
        // filter should pull every pixel well inside the input band.
        // Clamped corners smooth the least, so the bound is loose.
        let img = RgbImage::from_fn(20, 20, |x, y| {
            let v = 118 + ((x * 7 + y * 13) % 21) as u8;
            Rgb([v, v, v])
        });
        let out = bilateral_filter(&img, 9, 30.0, 3.0);
        for pixel in out.pixels() {
            assert!(
                (pixel.0[0] as i16 - 128).abs() <= 6,
                "expected flattened ripple, got {}",
                pixel.0[0]
            );
        }
    }
}
