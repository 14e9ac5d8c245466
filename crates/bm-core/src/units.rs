use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Length unit for reported quantities.
///
/// Physical units require a calibrated pixel pitch; `Pixels` is always
/// available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Pixels,
    Microns,
    #[serde(rename = "milli")]
    Millimetres,
    Metres,
}

impl Unit {
    pub fn is_physical(self) -> bool {
        !matches!(self, Self::Pixels)
    }

    /// Canonical lowercase token, also used on the serialized form.
    pub fn token(self) -> &'static str {
        match self {
            Self::Pixels => "pixels",
            Self::Microns => "microns",
            Self::Millimetres => "milli",
            Self::Metres => "metres",
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::Pixels
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Unit {
    type Err = Error;

    // Alias sets follow the beam-camera vocabulary, quirky spellings
    // included, matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pixels" => Ok(Self::Pixels),
            "microns" | "micrometers" | "micronmetres" | "um" => Ok(Self::Microns),
            "milli" | "milimetres" | "milimeters" | "mm" => Ok(Self::Millimetres),
            "metres" | "meters" | "m" => Ok(Self::Metres),
            _ => Err(Error::InvalidUnit {
                token: s.to_string(),
            }),
        }
    }
}

/// Sensor calibration: physical pixel pitch plus the default display unit.
///
/// The pitch is stored normalized to microns per pixel. An unset pitch is a
/// distinct state, not zero: physical-unit conversions fail with
/// [`Error::MissingCalibration`] until the pitch is provided.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Calibration {
    pitch_um: Option<f64>,
    display_unit: Unit,
}

impl Calibration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pixel pitch given in `unit` (`Pixels` is not a pitch unit).
    pub fn set_pixel_pitch(&mut self, value: f64, unit: Unit) -> Result<(), Error> {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidValue {
                what: "pixel pitch",
                value,
            });
        }
        let um = match unit {
            Unit::Pixels => {
                return Err(Error::InvalidUnit {
                    token: unit.token().to_string(),
                });
            }
            Unit::Microns => value,
            Unit::Millimetres => value * 1e3,
            Unit::Metres => value * 1e6,
        };
        self.pitch_um = Some(um);
        Ok(())
    }

    pub fn pixel_pitch_um(&self) -> Option<f64> {
        self.pitch_um
    }

    pub fn display_unit(&self) -> Unit {
        self.display_unit
    }

    pub fn set_display_unit(&mut self, unit: Unit) {
        self.display_unit = unit;
    }

    /// Pixels-to-`unit` multiplier: 1 for pixels, pitch for microns,
    /// pitch/1e3 for millimetres, pitch/1e6 for metres.
    pub fn factor(&self, unit: Unit) -> Result<f64, Error> {
        if !unit.is_physical() {
            return Ok(1.0);
        }
        let pitch = self.pitch_um.ok_or(Error::MissingCalibration)?;
        Ok(match unit {
            Unit::Pixels => 1.0,
            Unit::Microns => pitch,
            Unit::Millimetres => pitch / 1e3,
            Unit::Metres => pitch / 1e6,
        })
    }

    pub fn convert(&self, value_px: f64, unit: Unit) -> Result<f64, Error> {
        Ok(value_px * self.factor(unit)?)
    }

    /// Inverse of [`convert`](Self::convert): a length given in `unit` back
    /// to pixels.
    pub fn to_pixels(&self, value: f64, unit: Unit) -> Result<f64, Error> {
        Ok(value / self.factor(unit)?)
    }
}
