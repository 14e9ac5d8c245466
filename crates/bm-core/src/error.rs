use core::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    SizeMismatch { expected: usize, actual: usize },
    InvalidStride,
    InvalidUnit { token: String },
    InvalidValue { what: &'static str, value: f64 },
    InvalidRoi { reason: String },
    MissingCalibration,
    DegenerateImage,
    EmptyBand { band: &'static str },
    InvalidParameter { name: &'static str, value: f64 },
    MissingInput { name: &'static str },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::InvalidStride => write!(f, "invalid stride"),
            Self::InvalidUnit { token } => write!(f, "unrecognized unit '{token}'"),
            Self::InvalidValue { what, value } => write!(f, "invalid {what}: {value}"),
            Self::InvalidRoi { reason } => write!(f, "invalid roi: {reason}"),
            Self::MissingCalibration => {
                write!(f, "pixel pitch not set; physical units unavailable")
            }
            Self::DegenerateImage => write!(f, "image has zero total intensity"),
            Self::EmptyBand { band } => write!(f, "no pixels in {band} band"),
            Self::InvalidParameter { name, value } => {
                write!(f, "parameter '{name}' out of range: {value}")
            }
            Self::MissingInput { name } => write!(f, "missing required input '{name}'"),
        }
    }
}

impl std::error::Error for Error {}
