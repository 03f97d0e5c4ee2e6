use thiserror::Error;

/// Errors building or indexing a [`ColorMap`](crate::ColorMap).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorMapError {
    #[error("palette size must be at least 1")]
    InvalidSize,
    #[error("palette index {index} out of range 0..{size}")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("unknown palette \"{0}\"")]
    UnknownPalette(String),
}

/// Settings that can't be used to paint a spectrogram.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("dynamic range must be a positive number of dB, got {0}")]
    InvalidDynamicRange(f64),
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },
}

/// Errors building a [`Grid`](crate::Grid).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("frame {frame} has {len} bins but frame 0 has {expected}")]
    RaggedFrames {
        frame: usize,
        len: usize,
        expected: usize,
    },
}
