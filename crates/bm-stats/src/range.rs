use serde::{Deserialize, Serialize};

use bm_core::{Error, ImageView};

/// Noise floor and peak level estimated from order statistics.
///
/// Both values are means over the extreme tails of the sorted pixel
/// population, which smooths the estimate against single hot or dead
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeEstimate {
    pub noise_floor: f64,
    pub peak_level: f64,
}

impl RangeEstimate {
    pub fn span(&self) -> f64 {
        self.peak_level - self.noise_floor
    }

    /// Level at `fraction` of the way from the noise floor to the peak.
    pub fn level_at(&self, fraction: f64) -> f64 {
        self.noise_floor + fraction * self.span()
    }
}

/// Estimates the intensity range of `img`.
///
/// Sorts the full pixel population and averages the bottom
/// `round(sample_fraction * N)` samples as the noise floor and the top
/// same-count samples as the peak level. The tail count is floored at one
/// sample so small frames and `sample_fraction = 0` stay defined.
///
/// `sample_fraction` must lie in `[0, 0.5]`.
pub fn estimate_range(
    img: &ImageView<'_, f32>,
    sample_fraction: f64,
) -> Result<RangeEstimate, Error> {
    if !(0.0..=0.5).contains(&sample_fraction) {
        return Err(Error::InvalidParameter {
            name: "sample_fraction",
            value: sample_fraction,
        });
    }

    let total = img.width() * img.height();
    if total == 0 {
        return Err(Error::MissingInput { name: "image" });
    }

    let mut sorted: Vec<f32> = Vec::with_capacity(total);
    if let Some(data) = img.as_contiguous_slice() {
        sorted.extend_from_slice(data);
    } else {
        for y in 0..img.height() {
            sorted.extend_from_slice(img.row(y));
        }
    }
    sorted.sort_unstable_by(f32::total_cmp);

    let count = ((sample_fraction * total as f64).round() as usize).clamp(1, total);

    Ok(RangeEstimate {
        noise_floor: mean(&sorted[..count]),
        peak_level: mean(&sorted[total - count..]),
    })
}

fn mean(samples: &[f32]) -> f64 {
    let sum: f64 = samples.iter().map(|&v| v as f64).sum();
    sum / samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::estimate_range;
    use bm_core::{Error, Image};

    #[test]
    fn uniform_image_collapses_floor_onto_peak() {
        let img = Image::new_fill(16, 16, 42.0f32);
        let range = estimate_range(&img.as_view(), 0.05).expect("valid fraction");
        assert_eq!(range.noise_floor, 42.0);
        assert_eq!(range.peak_level, 42.0);
        assert_eq!(range.span(), 0.0);
    }

    #[test]
    fn ramp_tails_average_the_extremes() {
        let data: Vec<f32> = (0..100).map(|v| v as f32).collect();
        let img = Image::from_vec(10, 10, data).expect("valid image");

        // round(0.05 * 100) = 5 samples per tail
        let range = estimate_range(&img.as_view(), 0.05).expect("valid fraction");
        assert!((range.noise_floor - 2.0).abs() < 1e-9);
        assert!((range.peak_level - 97.0).abs() < 1e-9);
        assert!((range.level_at(0.5) - 49.5).abs() < 1e-9);
    }

    #[test]
    fn zero_fraction_floors_at_one_sample() {
        let data: Vec<f32> = (0..100).map(|v| v as f32).collect();
        let img = Image::from_vec(10, 10, data).expect("valid image");

        let range = estimate_range(&img.as_view(), 0.0).expect("valid fraction");
        assert_eq!(range.noise_floor, 0.0);
        assert_eq!(range.peak_level, 99.0);
    }

    #[test]
    fn tiny_image_still_estimates() {
        let img = Image::from_vec(2, 1, vec![3.0f32, 7.0]).expect("valid image");
        let range = estimate_range(&img.as_view(), 0.001).expect("valid fraction");
        assert_eq!(range.noise_floor, 3.0);
        assert_eq!(range.peak_level, 7.0);
    }

    #[test]
    fn out_of_range_fraction_is_rejected() {
        let img = Image::new_fill(4, 4, 1.0f32);
        for fraction in [-0.1, 0.6, f64::NAN] {
            assert!(matches!(
                estimate_range(&img.as_view(), fraction).unwrap_err(),
                Error::InvalidParameter {
                    name: "sample_fraction",
                    ..
                }
            ));
        }
    }
}
