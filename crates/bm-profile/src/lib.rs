//! Beam-profile metrics from a single calibrated frame.
//!
//! [`BeamProfiler`] owns one frame and measures it: noise floor and peak by
//! order statistics, an intensity-weighted centroid memoized per frame, and
//! a banded metrics report with areas, widths at the lit and half-maximum
//! levels and the top-hat uniformity ratio. Units, regions and threshold
//! rules come from the companion crates `bm-core` and `bm-stats`.
//!
//! The FWHM crossing level is half of the *average top-band* intensity, a
//! deliberate smoothing against single hot pixels; it is not half of the
//! brightest sample.

mod options;
mod profiler;
mod report;

#[cfg(test)]
mod test_utils;

pub use options::{BeamBand, BeamOptions, CentroidOptions};
pub use profiler::{Axis, BeamProfiler};
pub use report::BeamReport;
