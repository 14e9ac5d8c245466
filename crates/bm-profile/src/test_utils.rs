//! Synthetic beam frames shared by the unit tests.

use bm_core::Image;

/// Uniform disc of `intensity` on `background`; membership by pixel-centre
/// distance in the 1-based convention.
pub(crate) fn draw_disc(
    width: usize,
    height: usize,
    cx: f64,
    cy: f64,
    radius: f64,
    intensity: f32,
    background: f32,
) -> Image<f32> {
    let mut img = Image::new_fill(width, height, background);
    let data = img.data_mut();
    let r2 = radius * radius;
    for y in 0..height {
        let dy = (y + 1) as f64 - cy;
        for x in 0..width {
            let dx = (x + 1) as f64 - cx;
            if dx * dx + dy * dy <= r2 {
                data[y * width + x] = intensity;
            }
        }
    }
    img
}

/// Isotropic Gaussian spot of peak `amplitude` over `background`.
pub(crate) fn draw_gaussian(
    width: usize,
    height: usize,
    cx: f64,
    cy: f64,
    sigma: f64,
    amplitude: f32,
    background: f32,
) -> Image<f32> {
    let mut img = Image::new_fill(width, height, background);
    let data = img.data_mut();
    let denom = 2.0 * sigma * sigma;
    for y in 0..height {
        let dy = (y + 1) as f64 - cy;
        for x in 0..width {
            let dx = (x + 1) as f64 - cx;
            let g = (-(dx * dx + dy * dy) / denom).exp();
            data[y * width + x] = background + amplitude * g as f32;
        }
    }
    img
}
