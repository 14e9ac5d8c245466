use serde::{Deserialize, Serialize};

use bm_core::Unit;

/// Full beam metrics report.
///
/// Lengths and areas are expressed in `unit`; intensities and levels are raw
/// counts. The context fields (`noise_floor` through the band counts) record
/// what the measurement actually used, so a report is auditable on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamReport {
    pub unit: Unit,
    /// Horizontal centroid position.
    pub centroid_x: f64,
    /// Vertical centroid position.
    pub centroid_y: f64,
    /// Mean intensity over all banded pixels.
    pub mean_total: f64,
    /// Mean intensity of the bottom band; absent when the band is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_bottom: Option<f64>,
    /// Mean intensity of the centre band; absent when the band is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_centre: Option<f64>,
    /// Mean intensity of the top band.
    pub mean_top: f64,
    /// Banded pixel count scaled to an area.
    pub area: f64,
    /// Equivalent-circle diameter from the banded pixel count.
    pub diameter: f64,
    /// Lit extent along the row through the centroid.
    pub bottom_width: f64,
    /// Extent above half the top-band mean along the same row.
    pub fwhm_width: f64,
    /// Lit extent along the column through the centroid.
    pub bottom_height: f64,
    /// Extent above half the top-band mean along the same column.
    pub fwhm_height: f64,
    /// Uniformity ratio: 1.0 for an ideal flat-top beam, below 1 for a
    /// peaked one.
    pub top_hat_factor: f64,

    pub noise_floor: f64,
    pub peak_level: f64,
    /// Effective cut level applied to the working copy.
    pub threshold: f64,
    pub count_total: usize,
    pub count_bottom: usize,
    pub count_centre: usize,
    pub count_top: usize,
    /// Pixels at or above the mid-span level.
    pub count_half_max: usize,
}
