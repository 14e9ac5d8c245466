//! Intensity statistics for beam-profile measurement.
//!
//! Order-statistic range estimation averages the extreme tails of the sorted
//! pixel population, which keeps the noise floor and peak level stable
//! against single hot or dead pixels. Thresholding derives a zeroed working
//! copy of the frame; the centroid is an intensity-weighted mean over such a
//! copy. None of the passes mutate the caller's image.

mod centroid;
mod range;
mod threshold;

pub use centroid::{Centroid, weighted_centroid};
pub use range::{RangeEstimate, estimate_range};
pub use threshold::{ThresholdSpec, apply_threshold};
