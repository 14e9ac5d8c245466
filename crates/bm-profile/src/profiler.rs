use bm_core::{Calibration, Error, Image, ImageView, Roi, RoiSpec, Unit, to_f32, to_f32_u16};
use bm_stats::{Centroid, apply_threshold, estimate_range, weighted_centroid};

use crate::options::{BeamOptions, CentroidOptions};
use crate::report::BeamReport;

/// Axis selector for size queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Single-frame beam profiler.
///
/// Owns one calibrated frame plus the measurement state scoped to it: the
/// region of interest and the memoized centroid. The frame is immutable for
/// the profiler's lifetime; measuring a new frame means constructing a new
/// profiler.
///
/// ```
/// use bm_core::{Image, Unit};
/// use bm_profile::{BeamOptions, BeamProfiler};
///
/// # fn demo(frame: Image<f32>) -> Result<(), bm_core::Error> {
/// let mut profiler = BeamProfiler::new(frame)?;
/// profiler.set_pixel_pitch(5.5, Unit::Microns)?;
/// let report = profiler.beam_parameters(&BeamOptions {
///     unit: Some(Unit::Microns),
///     ..BeamOptions::default()
/// })?;
/// println!("diameter: {} um", report.diameter);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BeamProfiler {
    image: Image<f32>,
    calibration: Calibration,
    roi: Roi,
    centroid: Option<Centroid>,
}

impl BeamProfiler {
    /// Wraps a non-empty frame of finite, non-negative intensities.
    pub fn new(image: Image<f32>) -> Result<Self, Error> {
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::MissingInput { name: "image" });
        }
        for &v in image.data() {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidValue {
                    what: "intensity sample",
                    value: v as f64,
                });
            }
        }

        let roi = Roi::full_frame(image.width(), image.height());
        Ok(Self {
            image,
            calibration: Calibration::new(),
            roi,
            centroid: None,
        })
    }

    /// Widens an 8-bit camera frame to `f32` counts.
    pub fn from_u8(view: &ImageView<'_, u8>) -> Result<Self, Error> {
        Self::new(to_f32(view))
    }

    /// Widens a 16-bit camera frame to `f32` counts.
    pub fn from_u16(view: &ImageView<'_, u16>) -> Result<Self, Error> {
        Self::new(to_f32_u16(view))
    }

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Stored region in pixel bounds.
    pub fn roi_bounds(&self) -> Roi {
        self.roi
    }

    /// Pitch given in `unit`, stored as microns per pixel.
    pub fn set_pixel_pitch(&mut self, value: f64, unit: Unit) -> Result<(), Error> {
        self.calibration.set_pixel_pitch(value, unit)
    }

    /// Default unit for reports and queries that do not name one.
    pub fn set_display_unit(&mut self, unit: Unit) {
        self.calibration.set_display_unit(unit);
    }

    /// Resolves and stores a new region of interest.
    ///
    /// The previous region is kept on any failure.
    pub fn set_roi(&mut self, spec: &RoiSpec) -> Result<(), Error> {
        self.roi = spec
            .resolve(&self.calibration, self.image.width(), self.image.height())?;
        Ok(())
    }

    /// Stored region as `(xmin, ymin, width, height)` in `unit`.
    pub fn roi(&self, unit: Unit) -> Result<(f64, f64, f64, f64), Error> {
        let factor = self.calibration.factor(unit)?;
        Ok((
            self.roi.xmin as f64 * factor,
            self.roi.ymin as f64 * factor,
            self.roi.width() as f64 * factor,
            self.roi.height() as f64 * factor,
        ))
    }

    /// Frame extent along `axis` in `unit`.
    pub fn image_size(&self, axis: Axis, unit: Unit) -> Result<f64, Error> {
        let px = match axis {
            Axis::Horizontal => self.image.width(),
            Axis::Vertical => self.image.height(),
        };
        self.calibration.convert(px as f64, unit)
    }

    /// Intensity-weighted centroid in the requested unit.
    ///
    /// The first call thresholds the full frame with the supplied settings
    /// and memoizes the pixel-space result; every later call, whatever its
    /// settings, converts the cached value only.
    pub fn centroid(&mut self, options: &CentroidOptions) -> Result<Centroid, Error> {
        let unit = options.unit.unwrap_or(self.calibration.display_unit());
        let factor = self.calibration.factor(unit)?;

        let c = match self.centroid {
            Some(c) => c,
            None => {
                let view = self.image.as_view();
                let range = estimate_range(&view, options.sample_fraction)?;
                let cut = options.threshold.resolve(&range)?;
                let work = apply_threshold(&view, cut);
                self.memoize_centroid(&work)?
            }
        };

        Ok(Centroid {
            x: c.x * factor,
            y: c.y * factor,
        })
    }

    /// Full metrics report over the region of interest.
    ///
    /// The noise floor and peak are estimated over the whole frame; band
    /// populations, widths and areas are taken inside the region only.
    pub fn beam_parameters(&mut self, options: &BeamOptions) -> Result<BeamReport, Error> {
        let unit = options.unit.unwrap_or(self.calibration.display_unit());
        let factor = self.calibration.factor(unit)?;
        options.band.validate()?;

        let view = self.image.as_view();
        let range = estimate_range(&view, options.sample_fraction)?;
        let cut = options.threshold.resolve(&range)?;
        let work = apply_threshold(&view, cut);

        let centroid = match self.centroid {
            Some(c) => c,
            None => self.memoize_centroid(&work)?,
        };

        let bottom_level = range.level_at(options.band.bottom);
        let top_level = range.level_at(options.band.top);
        let half_max_level = range.level_at(0.5);

        let work_view = work.as_view();
        let bands = classify_bands(
            &work_view,
            &self.roi,
            cut,
            bottom_level,
            top_level,
            half_max_level,
        );

        let count_total = bands.bottom.count + bands.centre.count + bands.top.count;
        if count_total == 0 {
            return Err(Error::EmptyBand { band: "total" });
        }
        let sum_total = bands.bottom.sum + bands.centre.sum + bands.top.sum;
        let mean_top = bands.top.mean().ok_or(Error::EmptyBand { band: "top" })?;
        let mean_total = sum_total / count_total as f64;

        // Crossing level for the FWHM scans: half of the top-band average,
        // not half of the single brightest sample.
        let half_maximum = mean_top / 2.0;

        let row = nearest_index(centroid.y, self.image.height());
        let col = nearest_index(centroid.x, self.image.width());
        let bottom_width = scan_row_width(&work_view, &self.roi, row, 0.0);
        let fwhm_width = scan_row_width(&work_view, &self.roi, row, half_maximum);
        let bottom_height = scan_col_height(&work_view, &self.roi, col, 0.0);
        let fwhm_height = scan_col_height(&work_view, &self.roi, col, half_maximum);

        let count_f = count_total as f64;
        Ok(BeamReport {
            unit,
            centroid_x: centroid.x * factor,
            centroid_y: centroid.y * factor,
            mean_total,
            mean_bottom: bands.bottom.mean(),
            mean_centre: bands.centre.mean(),
            mean_top,
            area: count_f * factor * factor,
            diameter: 2.0 * (count_f / std::f64::consts::PI).sqrt() * factor,
            bottom_width: bottom_width * factor,
            fwhm_width: fwhm_width * factor,
            bottom_height: bottom_height * factor,
            fwhm_height: fwhm_height * factor,
            top_hat_factor: sum_total / (count_f * mean_top),
            noise_floor: range.noise_floor,
            peak_level: range.peak_level,
            threshold: cut,
            count_total,
            count_bottom: bands.bottom.count,
            count_centre: bands.centre.count,
            count_top: bands.top.count,
            count_half_max: bands.half_max_count,
        })
    }

    fn memoize_centroid(&mut self, work: &Image<f32>) -> Result<Centroid, Error> {
        let c = weighted_centroid(&work.as_view())?;
        self.centroid = Some(c);
        Ok(c)
    }
}

#[derive(Debug, Default)]
struct BandTally {
    count: usize,
    sum: f64,
}

impl BandTally {
    fn add(&mut self, v: f64) {
        self.count += 1;
        self.sum += v;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Debug, Default)]
struct BandPass {
    bottom: BandTally,
    centre: BandTally,
    top: BandTally,
    half_max_count: usize,
}

/// Single pass over the region: each non-zero pixel lands in exactly one of
/// bottom `(threshold, bottom_level]`, top `[top_level, ..)` or the centre
/// strictly between, and is independently tallied against the mid-span
/// level.
fn classify_bands(
    view: &ImageView<'_, f32>,
    roi: &Roi,
    threshold: f64,
    bottom_level: f64,
    top_level: f64,
    half_max_level: f64,
) -> BandPass {
    let cut = threshold as f32;
    let lo = bottom_level as f32;
    let hi = top_level as f32;
    let half = half_max_level as f32;

    let mut pass = BandPass::default();
    for y in roi.y_range() {
        for &v in &view.row(y)[roi.x_range()] {
            if v <= 0.0 {
                continue;
            }
            let w = v as f64;
            if v > cut && v <= lo {
                pass.bottom.add(w);
            } else if v >= hi {
                pass.top.add(w);
            } else if v > lo && v < hi {
                pass.centre.add(w);
            }
            if v >= half {
                pass.half_max_count += 1;
            }
        }
    }
    pass
}

/// Nearest 0-based index for a 1-based position, clamped to the axis.
fn nearest_index(pos: f64, len: usize) -> usize {
    (pos.round() as isize - 1).clamp(0, len as isize - 1) as usize
}

/// Extent of samples above `level` along row `y` (0-based), restricted to
/// the region's columns: distance from the first qualifying column to the
/// last.
fn scan_row_width(view: &ImageView<'_, f32>, roi: &Roi, y: usize, level: f64) -> f64 {
    let cut = level as f32;
    let row = &view.row(y)[roi.x_range()];
    let left = row.iter().position(|&v| v > cut);
    let right = row.iter().rposition(|&v| v > cut);
    match (left, right) {
        (Some(l), Some(r)) => (r - l) as f64,
        _ => {
            log::debug!("row {} has no samples above {level:.3}", y + 1);
            0.0
        }
    }
}

/// Column counterpart of [`scan_row_width`].
fn scan_col_height(view: &ImageView<'_, f32>, roi: &Roi, x: usize, level: f64) -> f64 {
    let cut = level as f32;
    let mut first = None;
    let mut last = None;
    for y in roi.y_range() {
        if view.row(y)[x] > cut {
            if first.is_none() {
                first = Some(y);
            }
            last = Some(y);
        }
    }
    match (first, last) {
        (Some(t), Some(b)) => (b - t) as f64,
        _ => {
            log::debug!("column {} has no samples above {level:.3}", x + 1);
            0.0
        }
    }
}
