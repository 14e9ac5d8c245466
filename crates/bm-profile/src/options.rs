use serde::{Deserialize, Serialize};

use bm_core::{Error, Unit};
use bm_stats::ThresholdSpec;

/// Intensity band split for the classification pass.
///
/// Both edges are fractions of the floor-to-peak span: pixels up to
/// `bottom` form the bottom band, pixels from `top` upward the top band,
/// everything strictly between the centre band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamBand {
    pub bottom: f64,
    pub top: f64,
}

impl Default for BeamBand {
    fn default() -> Self {
        Self {
            bottom: 0.1,
            top: 0.9,
        }
    }
}

impl BeamBand {
    /// `bottom` must lie in `[0, 0.5]` and `top` in `[0.5, 1]`.
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=0.5).contains(&self.bottom) {
            return Err(Error::InvalidParameter {
                name: "beam_band.bottom",
                value: self.bottom,
            });
        }
        if !(0.5..=1.0).contains(&self.top) {
            return Err(Error::InvalidParameter {
                name: "beam_band.top",
                value: self.top,
            });
        }
        Ok(())
    }
}

/// Options for the full metrics report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamOptions {
    /// Unit for reported lengths and areas; `None` uses the profiler's
    /// display unit.
    pub unit: Option<Unit>,
    pub threshold: ThresholdSpec,
    /// Tail fraction for the noise-floor/peak estimate.
    pub sample_fraction: f64,
    pub band: BeamBand,
}

impl Default for BeamOptions {
    fn default() -> Self {
        Self {
            unit: None,
            threshold: ThresholdSpec::default(),
            sample_fraction: 0.001,
            band: BeamBand::default(),
        }
    }
}

/// Options for the centroid query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentroidOptions {
    /// Unit for the reported position; `None` uses the profiler's display
    /// unit.
    pub unit: Option<Unit>,
    pub threshold: ThresholdSpec,
    pub sample_fraction: f64,
}

impl Default for CentroidOptions {
    fn default() -> Self {
        Self {
            unit: None,
            threshold: ThresholdSpec::default(),
            sample_fraction: 0.001,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BeamBand, BeamOptions, CentroidOptions};
    use bm_core::Error;
    use bm_stats::ThresholdSpec;

    #[test]
    fn defaults_match_the_documented_values() {
        let opts = BeamOptions::default();
        assert_eq!(opts.unit, None);
        assert_eq!(opts.threshold, ThresholdSpec::Fraction(0.1));
        assert_eq!(opts.sample_fraction, 0.001);
        assert_eq!(opts.band, BeamBand { bottom: 0.1, top: 0.9 });

        let opts = CentroidOptions::default();
        assert_eq!(opts.threshold, ThresholdSpec::Fraction(0.1));
        assert_eq!(opts.sample_fraction, 0.001);
    }

    #[test]
    fn band_edges_are_range_checked() {
        assert!(BeamBand { bottom: 0.0, top: 1.0 }.validate().is_ok());
        assert!(BeamBand { bottom: 0.5, top: 0.5 }.validate().is_ok());

        assert!(matches!(
            BeamBand { bottom: 0.6, top: 0.9 }.validate().unwrap_err(),
            Error::InvalidParameter {
                name: "beam_band.bottom",
                ..
            }
        ));
        assert!(matches!(
            BeamBand { bottom: 0.1, top: 0.4 }.validate().unwrap_err(),
            Error::InvalidParameter {
                name: "beam_band.top",
                ..
            }
        ));
        assert!(matches!(
            BeamBand { bottom: 0.1, top: 1.1 }.validate().unwrap_err(),
            Error::InvalidParameter { .. }
        ));
    }
}
