use crate::{
    colormap::ColorMap,
    error::SettingsError,
    matrix::PowerSpectrogramMatrix,
    raster::{flip_row, RasterOutput},
    settings::SpectrogramSettings,
};
use log::{debug, warn};
use std::f64::consts::{LN_10, LN_2};

/// Power in Pa² that reads as 0 dB. The auditory threshold of 20 µPa squared.
pub const REFERENCE_POWER: f64 = 4.0e-10;
/// Added to every power so silence stays finite.
pub const POWER_FLOOR: f64 = 1.0e-30;
/// Pre-emphasis is 0 dB at this frequency.
pub const PRE_EMPHASIS_PIVOT: f64 = 1000.0;

/// Power in Pa² to dB relative to [`REFERENCE_POWER`].
#[must_use]
pub fn power_to_db(power: f64) -> f64 {
    10.0 / LN_10 * ((power + POWER_FLOOR) / REFERENCE_POWER).ln()
}

/// Gain in dB added to `bin`. `pre_emphasis` dB per octave pivoting on 1 kHz.
///
/// No pre-emphasis adds exactly nothing, even to the 0 Hz bin.
#[must_use]
pub fn pre_emphasis_db(pre_emphasis: f64, dy: f64, bin: usize) -> f64 {
    if pre_emphasis == 0.0 {
        0.0
    } else {
        pre_emphasis / LN_2 * (bin as f64 * dy / PRE_EMPHASIS_PIVOT).ln()
    }
}

/// Intensities in dB after pre-emphasis and dynamic compression, with the range that will be painted.
#[derive(Debug, Clone, PartialEq)]
pub struct DecibelGrid {
    num_frames: usize,
    num_bins: usize,
    values: Vec<f64>, // Frame major like the matrix it came from.
    maximum: f64,
    dynamic_range: f64,
}

impl DecibelGrid {
    #[must_use]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    #[must_use]
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    #[must_use]
    pub fn value(&self, frame: usize, bin: usize) -> f64 {
        assert!(bin < self.num_bins);
        self.values[frame * self.num_bins + bin]
    }

    /// Intensity painted with the strongest colour.
    #[must_use]
    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    /// Intensities at or below this are painted with the weakest colour.
    #[must_use]
    pub fn min_intensity(&self) -> f64 {
        self.maximum - self.dynamic_range
    }

    /// Maps every cell onto `palette`. Frames become columns and the highest bin the top row.
    ///
    /// Cells that aren't a number get palette index 0 and are counted in [`RasterOutput::non_finite_cells`].
    #[must_use]
    pub fn colorize(&self, palette: &ColorMap) -> RasterOutput {
        let size = palette.size();
        let top = size - 1;
        let scale = size as f64 / self.dynamic_range;
        let min_intensity = self.min_intensity();
        let mut non_finite_cells = 0;

        let raster = RasterOutput::from_fn(self.num_frames, self.num_bins, |frame, row| {
            let value = self.value(frame, flip_row(row, self.num_bins));
            // Comparison rather than `f64::max` so NaN isn't swallowed.
            let value = if value < min_intensity { min_intensity } else { value };
            let scaled = ((value - min_intensity) * scale).round();
            let index = if scaled.is_finite() {
                (scaled as usize).min(top)
            } else {
                non_finite_cells += 1;
                0
            };
            (index, palette.table()[index])
        });

        if non_finite_cells > 0 {
            warn!("{non_finite_cells} spectrogram cells weren't finite and were painted as the weakest colour");
        }
        raster.with_non_finite_cells(non_finite_cells)
    }
}

/// Converts power to dB, applies pre-emphasis and dynamic compression, and picks the maximum.
///
/// When autoscaling, the maximum is the loudest finite value of any frame but never below 0 dB.
/// Each frame is raised by `dynamic_compression * (maximum - frame maximum)`.
/// # Errors
/// If the settings fail [`SpectrogramSettings::validate`]. Nothing is computed in that case.
pub fn to_decibels<M: PowerSpectrogramMatrix + ?Sized>(
    matrix: &M,
    settings: &SpectrogramSettings,
) -> Result<DecibelGrid, SettingsError> {
    settings.validate()?;
    let num_frames = matrix.num_frames();
    let num_bins = matrix.num_bins();

    let emphasis: Vec<f64> = (0..num_bins)
        .map(|bin| pre_emphasis_db(settings.pre_emphasis, matrix.dy(), bin))
        .collect();

    let mut values = Vec::with_capacity(num_frames * num_bins);
    let mut frame_maxima = vec![0.0; num_frames];
    for (frame, frame_max) in frame_maxima.iter_mut().enumerate() {
        for (bin, emphasis) in emphasis.iter().enumerate() {
            let value = power_to_db(matrix.z(frame, bin)) + emphasis;
            if value.is_finite() && value > *frame_max {
                *frame_max = value;
            }
            values.push(value);
        }
    }

    let maximum = match settings.maximum {
        Some(maximum) => maximum,
        None => frame_maxima.iter().copied().fold(0.0, f64::max),
    };

    if num_bins > 0 {
        for (frame, frame_max) in values.chunks_exact_mut(num_bins).zip(&frame_maxima) {
            let lift = settings.dynamic_compression * (maximum - frame_max);
            for value in frame {
                *value += lift;
            }
        }
    }

    debug!(
        "{num_frames}x{num_bins} spectrogram spans {} dB to {maximum} dB",
        maximum - settings.dynamic_range
    );
    Ok(DecibelGrid {
        num_frames,
        num_bins,
        values,
        maximum,
        dynamic_range: settings.dynamic_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Grid;

    fn flat() -> SpectrogramSettings {
        SpectrogramSettings {
            pre_emphasis: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn reference_power_is_zero_db() {
        assert!(power_to_db(REFERENCE_POWER).abs() < 1e-12);
        assert!((power_to_db(REFERENCE_POWER * 100.0) - 20.0).abs() < 1e-9);
        assert!((power_to_db(0.0) - (-206.02)).abs() < 0.01);
        assert!(power_to_db(-1.0).is_nan());
    }

    #[test]
    fn pre_emphasis_per_octave() {
        assert!(pre_emphasis_db(6.0, 500.0, 2).abs() < 1e-12);
        assert!((pre_emphasis_db(6.0, 500.0, 4) - 6.0).abs() < 1e-12);
        assert!((pre_emphasis_db(6.0, 500.0, 1) + 6.0).abs() < 1e-12);
        assert_eq!(pre_emphasis_db(6.0, 500.0, 0), f64::NEG_INFINITY);
        assert_eq!(pre_emphasis_db(0.0, 500.0, 0), 0.0);
    }

    #[test]
    fn autoscale_never_below_zero() {
        let grid = Grid::from_fn(2, 3, |_, _| REFERENCE_POWER / 1000.0);
        let db = to_decibels(&grid, &flat()).unwrap();
        assert_eq!(db.maximum(), 0.0);
        assert_eq!(db.min_intensity(), -50.0);
    }

    #[test]
    fn fixed_maximum() {
        let grid = Grid::from_fn(1, 1, |_, _| REFERENCE_POWER);
        let settings = SpectrogramSettings {
            maximum: Some(80.0),
            dynamic_range: 30.0,
            ..flat()
        };
        let db = to_decibels(&grid, &settings).unwrap();
        assert_eq!(db.maximum(), 80.0);
        assert_eq!(db.min_intensity(), 50.0);
    }

    #[test]
    fn compression_lifts_quiet_frames() {
        // Frames at 20 dB and 0 dB.
        let grid = Grid::from_frames(vec![vec![REFERENCE_POWER * 100.0], vec![REFERENCE_POWER]]).unwrap();
        let settings = SpectrogramSettings {
            dynamic_compression: 0.5,
            ..flat()
        };
        let db = to_decibels(&grid, &settings).unwrap();
        assert!((db.maximum() - 20.0).abs() < 1e-9);
        assert!((db.value(0, 0) - 20.0).abs() < 1e-9);
        assert!((db.value(1, 0) - 10.0).abs() < 1e-9);

        let settings = SpectrogramSettings {
            dynamic_compression: 1.0,
            ..flat()
        };
        let db = to_decibels(&grid, &settings).unwrap();
        assert!((db.value(1, 0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn colorize_flips_frequency() {
        // Loud top bin, silent bottom bin.
        let grid = Grid::from_frames(vec![vec![0.0, REFERENCE_POWER * 1e6]]).unwrap();
        let palette = ColorMap::jet_default();
        let raster = to_decibels(&grid, &flat()).unwrap().colorize(&palette);
        assert_eq!((raster.width(), raster.height()), (1, 2));
        assert_eq!(raster.palette_index(0, 0), 63);
        assert_eq!(raster.palette_index(0, 1), 0);
        assert_eq!(raster.pixel(0, 0), palette.color(63).unwrap());
    }

    #[test]
    fn infinite_cells_are_counted() {
        let grid = Grid::from_frames(vec![vec![f64::INFINITY, REFERENCE_POWER]]).unwrap();
        let raster = to_decibels(&grid, &flat()).unwrap().colorize(&ColorMap::jet_default());
        assert_eq!(raster.non_finite_cells(), 1);
        // Bin 0 is the bottom row.
        assert_eq!(raster.palette_index(0, 1), 0);
        assert_eq!(raster.palette_index(0, 0), 63);
    }

    #[test]
    fn invalid_dynamic_range_is_rejected() {
        let grid = Grid::from_fn(1, 1, |_, _| 1.0);
        let settings = SpectrogramSettings {
            dynamic_range: 0.0,
            ..flat()
        };
        assert_eq!(
            to_decibels(&grid, &settings),
            Err(SettingsError::InvalidDynamicRange(0.0))
        );
    }
}
