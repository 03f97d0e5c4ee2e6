//! Command line front end: reads wav files, analyses them and paints their spectrograms.

/// Arguments for the binaries.
/// This is compartmentalized to a module because the binaries share most of their arguments.
pub mod args;

/// Simple helper functions for reading and writing wav files.
pub mod file_io;

/// Sound to painted raster.
pub mod pipeline;

/// Plotting functionality.
#[cfg(feature = "plot")]
pub mod plotting;
