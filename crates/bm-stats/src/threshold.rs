use serde::{Deserialize, Serialize};

use bm_core::{Error, Image, ImageView};

use crate::range::RangeEstimate;

/// How the cut level below which pixels are discarded is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSpec {
    /// `noise_floor + fraction * (peak - noise_floor)`, fraction in
    /// `[0, 0.5]`.
    Fraction(f64),
    /// Fixed cut level in intensity counts, bypassing the range estimate;
    /// must be non-negative.
    Absolute(f64),
}

impl Default for ThresholdSpec {
    fn default() -> Self {
        Self::Fraction(0.1)
    }
}

impl ThresholdSpec {
    /// The effective cut level against a measured range.
    pub fn resolve(&self, range: &RangeEstimate) -> Result<f64, Error> {
        match *self {
            Self::Fraction(fraction) => {
                if !(0.0..=0.5).contains(&fraction) {
                    return Err(Error::InvalidParameter {
                        name: "threshold_fraction",
                        value: fraction,
                    });
                }
                Ok(range.level_at(fraction))
            }
            Self::Absolute(level) => {
                if !level.is_finite() || level < 0.0 {
                    return Err(Error::InvalidParameter {
                        name: "threshold",
                        value: level,
                    });
                }
                Ok(level)
            }
        }
    }
}

/// Working copy of `img` with every sample below `threshold` set to zero.
///
/// The input is left untouched; band, width and centroid passes read the
/// copy only.
pub fn apply_threshold(img: &ImageView<'_, f32>, threshold: f64) -> Image<f32> {
    let cut = threshold as f32;
    let mut out = Vec::with_capacity(img.width() * img.height());
    if let Some(data) = img.as_contiguous_slice() {
        out.extend(data.iter().map(|&v| if v < cut { 0.0 } else { v }));
    } else {
        for y in 0..img.height() {
            out.extend(img.row(y).iter().map(|&v| if v < cut { 0.0 } else { v }));
        }
    }
    Image::from_vec(img.width(), img.height(), out).expect("copy preserves dimensions")
}

#[cfg(test)]
mod tests {
    use super::{ThresholdSpec, apply_threshold};
    use crate::range::RangeEstimate;
    use bm_core::{Error, Image};

    fn range() -> RangeEstimate {
        RangeEstimate {
            noise_floor: 10.0,
            peak_level: 110.0,
        }
    }

    #[test]
    fn fraction_interpolates_between_floor_and_peak() {
        let level = ThresholdSpec::Fraction(0.1)
            .resolve(&range())
            .expect("valid fraction");
        assert!((level - 20.0).abs() < 1e-12);

        let level = ThresholdSpec::default().resolve(&range()).expect("valid");
        assert!((level - 20.0).abs() < 1e-12);
    }

    #[test]
    fn absolute_level_bypasses_the_range() {
        let level = ThresholdSpec::Absolute(3.5)
            .resolve(&range())
            .expect("valid level");
        assert_eq!(level, 3.5);
    }

    #[test]
    fn out_of_range_specs_are_rejected() {
        assert!(matches!(
            ThresholdSpec::Fraction(0.51).resolve(&range()).unwrap_err(),
            Error::InvalidParameter {
                name: "threshold_fraction",
                ..
            }
        ));
        assert!(matches!(
            ThresholdSpec::Fraction(-0.01).resolve(&range()).unwrap_err(),
            Error::InvalidParameter { .. }
        ));
        assert!(matches!(
            ThresholdSpec::Absolute(-1.0).resolve(&range()).unwrap_err(),
            Error::InvalidParameter {
                name: "threshold",
                ..
            }
        ));
        assert!(matches!(
            ThresholdSpec::Absolute(f64::NAN).resolve(&range()).unwrap_err(),
            Error::InvalidParameter { .. }
        ));
    }

    #[test]
    fn working_copy_zeroes_below_cut_and_keeps_original() {
        let img = Image::from_vec(3, 1, vec![5.0f32, 20.0, 35.0]).expect("valid image");
        let cut = apply_threshold(&img.as_view(), 20.0);

        assert_eq!(cut.data(), &[0.0, 20.0, 35.0]);
        assert_eq!(img.data(), &[5.0, 20.0, 35.0]);
    }
}
