use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::units::{Calibration, Unit};
use crate::Error;

/// Stored region of interest, 1-based inclusive pixel bounds.
///
/// Invariants: `1 <= xmin <= xmax <= width` and `1 <= ymin <= ymax <= height`
/// of the image the region was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub xmin: usize,
    pub xmax: usize,
    pub ymin: usize,
    pub ymax: usize,
}

impl Roi {
    pub fn full_frame(width: usize, height: usize) -> Self {
        Self {
            xmin: 1,
            xmax: width,
            ymin: 1,
            ymax: height,
        }
    }

    pub fn width(&self) -> usize {
        self.xmax - self.xmin + 1
    }

    pub fn height(&self) -> usize {
        self.ymax - self.ymin + 1
    }

    /// 0-based column range for buffer indexing.
    pub fn x_range(&self) -> Range<usize> {
        (self.xmin - 1)..self.xmax
    }

    /// 0-based row range for buffer indexing.
    pub fn y_range(&self) -> Range<usize> {
        (self.ymin - 1)..self.ymax
    }
}

/// Region request in the caller's unit of choice.
///
/// Any consistent subset of fields may be supplied; missing bounds resolve
/// against the full frame. Explicit bounds take precedence over
/// centre-derived ones; a centre is only usable together with the matching
/// extent. The empty spec resets the region to the full frame.
///
/// ```
/// use bm_core::RoiSpec;
///
/// let spec = RoiSpec {
///     xcentre: Some(320.0),
///     width: Some(100.0),
///     ..RoiSpec::default()
/// };
/// # let _ = spec;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiSpec {
    pub xmin: Option<f64>,
    pub xmax: Option<f64>,
    pub ymin: Option<f64>,
    pub ymax: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub xcentre: Option<f64>,
    pub ycentre: Option<f64>,
    pub unit: Unit,
}

impl RoiSpec {
    /// The 4-tuple style: origin plus extents, in pixels.
    pub fn rect(xmin: f64, ymin: f64, width: f64, height: f64) -> Self {
        Self {
            xmin: Some(xmin),
            ymin: Some(ymin),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn full_frame() -> Self {
        Self::default()
    }

    /// Resolves the request to pixel bounds against an image of
    /// `img_width x img_height`.
    ///
    /// Values are converted from `self.unit` to pixels first, which requires
    /// a calibrated pitch for physical units. Bounds derived from a centre
    /// are clamped to the frame with a warning; every other violation of the
    /// stored-region invariants is rejected.
    pub fn resolve(
        &self,
        cal: &Calibration,
        img_width: usize,
        img_height: usize,
    ) -> Result<Roi, Error> {
        for (name, value) in [
            ("xmin", self.xmin),
            ("xmax", self.xmax),
            ("ymin", self.ymin),
            ("ymax", self.ymax),
            ("width", self.width),
            ("height", self.height),
            ("xcentre", self.xcentre),
            ("ycentre", self.ycentre),
        ] {
            if let Some(v) = value
                && !v.is_finite()
            {
                return Err(Error::InvalidValue {
                    what: name,
                    value: v,
                });
            }
        }

        // Physical units fail here when the pitch is unset, before any
        // field is interpreted.
        let factor = cal.factor(self.unit)?;
        let px = |v: Option<f64>| v.map(|value| value / factor);

        let (xmin, xmax) = resolve_axis(
            AxisFields {
                min: px(self.xmin),
                max: px(self.xmax),
                extent: px(self.width),
                centre: px(self.xcentre),
            },
            AxisNames {
                min: "xmin",
                max: "xmax",
                extent: "width",
                centre: "xcentre",
            },
            img_width,
        )?;
        let (ymin, ymax) = resolve_axis(
            AxisFields {
                min: px(self.ymin),
                max: px(self.ymax),
                extent: px(self.height),
                centre: px(self.ycentre),
            },
            AxisNames {
                min: "ymin",
                max: "ymax",
                extent: "height",
                centre: "ycentre",
            },
            img_height,
        )?;

        Ok(Roi {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }
}

struct AxisFields {
    min: Option<f64>,
    max: Option<f64>,
    extent: Option<f64>,
    centre: Option<f64>,
}

struct AxisNames {
    min: &'static str,
    max: &'static str,
    extent: &'static str,
    centre: &'static str,
}

fn resolve_axis(f: AxisFields, names: AxisNames, dim: usize) -> Result<(usize, usize), Error> {
    let dim_f = dim as f64;

    if let Some(extent) = f.extent {
        let e = extent.round();
        if e < 1.0 || e > dim_f {
            return Err(Error::InvalidRoi {
                reason: format!("{} {:.2} outside [1, {}]", names.extent, extent, dim),
            });
        }
    }

    let (mut lo, mut hi) = match (f.min, f.max) {
        (Some(lo), Some(hi)) => (lo, hi),
        (Some(lo), None) => match f.extent {
            Some(e) => (lo, lo + e.round() - 1.0),
            None => (lo, dim_f),
        },
        (None, Some(hi)) => match f.extent {
            Some(e) => (hi - e.round() + 1.0, hi),
            None => (1.0, hi),
        },
        (None, None) => match (f.centre, f.extent) {
            (Some(c), Some(e)) => {
                let mut lo = c - e / 2.0;
                let mut hi = c + e / 2.0;
                if lo < 1.0 {
                    log::warn!(
                        "{} {:.2}: {} {:.2} below 1, clamped",
                        names.centre,
                        c,
                        names.min,
                        lo
                    );
                    lo = 1.0;
                }
                if hi > dim_f {
                    log::warn!(
                        "{} {:.2}: {} {:.2} beyond {}, clamped",
                        names.centre,
                        c,
                        names.max,
                        hi,
                        dim
                    );
                    hi = dim_f;
                }
                (lo, hi)
            }
            (Some(_), None) => {
                return Err(Error::MissingInput {
                    name: names.extent,
                });
            }
            (None, Some(e)) => (1.0, e.round()),
            (None, None) => (1.0, dim_f),
        },
    };

    lo = lo.round();
    hi = hi.round();

    // Each bound is checked on its own; any single violation rejects.
    if lo < 1.0 {
        return Err(Error::InvalidRoi {
            reason: format!("{} {:.0} below 1", names.min, lo),
        });
    }
    if hi > dim_f {
        return Err(Error::InvalidRoi {
            reason: format!("{} {:.0} beyond {}", names.max, hi, dim),
        });
    }
    if lo > hi {
        return Err(Error::InvalidRoi {
            reason: format!("{} {:.0} above {} {:.0}", names.min, lo, names.max, hi),
        });
    }

    Ok((lo as usize, hi as usize))
}
