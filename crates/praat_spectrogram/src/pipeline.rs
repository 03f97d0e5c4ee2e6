use log::info;
use spectrogram_raster::{
    to_decibels, ColorMap, DecibelGrid, RasterOutput, SettingsError, SpectrogramSettings,
};
use stft::{sound_to_spectrogram, AnalysisError, PowerSpectrogram, Sound};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}

/// Everything computed while painting a sound.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub spectrogram: PowerSpectrogram,
    pub decibels: DecibelGrid,
    pub raster: RasterOutput,
}

impl Rendered {
    /// Number of pixels painted with each palette index.
    #[must_use]
    pub fn palette_usage(&self, palette: &ColorMap) -> Vec<usize> {
        let mut usage = vec![0; palette.size()];
        for &index in self.raster.palette_indices() {
            usage[index] += 1;
        }
        usage
    }
}

/// Power spectrogram of `sound` with the analysis part of `settings`.
pub fn analyze(
    sound: &Sound,
    settings: &SpectrogramSettings,
) -> Result<PowerSpectrogram, PipelineError> {
    let spectrogram = sound_to_spectrogram(sound, &settings.analysis_params())?;
    info!(
        "Analysed {} s into {} frames of {} bins up to {} Hz",
        sound.duration(),
        spectrogram.nx(),
        spectrogram.ny(),
        spectrogram.ymax()
    );
    Ok(spectrogram)
}

/// Analyses and paints `sound`. Settings are checked before any analysis.
pub fn render(
    sound: &Sound,
    settings: &SpectrogramSettings,
    palette: &ColorMap,
) -> Result<Rendered, PipelineError> {
    settings.validate()?;
    let spectrogram = analyze(sound, settings)?;
    let decibels = to_decibels(&spectrogram, settings)?;
    let raster = decibels.colorize(palette);
    info!(
        "Painted {}x{} raster from {} dB down to {} dB",
        raster.width(),
        raster.height(),
        decibels.maximum(),
        decibels.min_intensity()
    );
    Ok(Rendered {
        spectrogram,
        decibels,
        raster,
    })
}
