//! Foundational primitives for beam-profile metrology.
//!
//! ## Coordinate Conventions
//! Buffers are row-major and indexed 0-based at the container level. The
//! measurement surfaces (regions, centroids, reported positions) use the
//! 1-based inclusive pixel convention of beam-camera operator tooling: the
//! first pixel of a row is position 1, bounds include both endpoints.
//!
//! ## Units
//! Reported lengths are pixel counts scaled by the calibrated pixel pitch
//! (stored in microns per pixel). Physical units are unavailable until the
//! pitch is set; requesting one without a pitch is a reported error, never
//! silently zero.

mod error;
mod image;
mod roi;
mod units;

pub use error::Error;
pub use image::{Image, ImageView, to_f32, to_f32_u16};
pub use roi::{Roi, RoiSpec};
pub use units::{Calibration, Unit};
