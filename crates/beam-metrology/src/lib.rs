//! Umbrella crate for the `beam-metrology` workspace.
//!
//! This crate re-exports the measurement crates, so consumers depend on a
//! single name. Higher-level acquisition tooling can layer on top over time.

pub use bm_core::*;
pub use bm_profile::*;
pub use bm_stats::*;
