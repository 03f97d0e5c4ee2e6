//! Paints power spectrograms into colour mapped rasters the way Praat draws them.
//! Power becomes dB, gets pre-emphasis and dynamic compression, is clipped to a dynamic range below the
//! maximum and then looked up in a [`ColorMap`].

/// Palettes mapping intensity to colour.
pub mod colormap;

/// Conversion from power to painted intensity.
pub mod decibels;

pub mod error;

/// Read access to power spectrograms.
pub mod matrix;

/// Painted images.
pub mod raster;

/// Analysis and painting settings.
pub mod settings;

pub use colormap::{ColorMap, Palette};
pub use decibels::{to_decibels, DecibelGrid};
pub use error::{ColorMapError, MatrixError, SettingsError};
pub use matrix::{Grid, PowerSpectrogramMatrix};
pub use raster::{rasterize, RasterOutput};
pub use settings::SpectrogramSettings;
