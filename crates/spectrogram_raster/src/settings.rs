use crate::error::SettingsError;
use clap::{
    builder::{PossibleValuesParser, TypedValueParser as _},
    Args,
};
use stft::{AnalysisParams, WindowShape};

pub const DEFAULT_WINDOW_LENGTH: f64 = 0.005;
pub const DEFAULT_MAX_FREQUENCY: f64 = 5000.0;
pub const DEFAULT_TIME_STEP: f64 = 0.002;
pub const DEFAULT_FREQUENCY_STEP: f64 = 20.0;
pub const DEFAULT_PRE_EMPHASIS: f64 = 6.0;
pub const DEFAULT_DYNAMIC_RANGE: f64 = 50.0;
pub const DEFAULT_DYNAMIC_COMPRESSION: f64 = 0.0;

/// How to analyse a sound and paint its spectrogram.
#[derive(Args, Clone, Debug, PartialEq)]
pub struct SpectrogramSettings {
    /// Effective analysis window length in seconds.
    #[arg(long, default_value_t = DEFAULT_WINDOW_LENGTH)]
    pub window_length: f64,

    /// Highest analysed frequency in hertz. Capped at the nyquist frequency.
    #[arg(long, default_value_t = DEFAULT_MAX_FREQUENCY)]
    pub max_frequency: f64,

    /// Time between frames in seconds.
    #[arg(long, default_value_t = DEFAULT_TIME_STEP)]
    pub time_step: f64,

    /// Width of a frequency bin in hertz.
    #[arg(long, default_value_t = DEFAULT_FREQUENCY_STEP)]
    pub frequency_step: f64,

    /// Shape of the analysis window.
    #[arg(
        long, default_value_t = WindowShape::Gaussian,
        // Foreign enum so no ValueEnum derive.
        value_parser = PossibleValuesParser::new(WindowShape::ALL.map(WindowShape::name)).map(|s| s.parse::<WindowShape>().unwrap()),
        ignore_case = true
    )]
    pub window_shape: WindowShape,

    /// Boost in dB per octave above 1 kHz.
    #[arg(long, default_value_t = DEFAULT_PRE_EMPHASIS, allow_negative_numbers = true)]
    pub pre_emphasis: f64,

    /// Decibels below the maximum that are still painted. Anything quieter gets the weakest colour.
    #[arg(long, default_value_t = DEFAULT_DYNAMIC_RANGE)]
    pub dynamic_range: f64,

    /// How far to lift quiet frames towards the loudest one. 0 leaves frames alone, 1 lifts every frame to the same peak.
    #[arg(long, default_value_t = DEFAULT_DYNAMIC_COMPRESSION, allow_negative_numbers = true)]
    pub dynamic_compression: f64,

    /// Fixed maximum in dB. Autoscales to the loudest frame when not given.
    #[arg(long, value_name = "DB", allow_negative_numbers = true)]
    pub maximum: Option<f64>,
}

impl Default for SpectrogramSettings {
    fn default() -> Self {
        SpectrogramSettings {
            window_length: DEFAULT_WINDOW_LENGTH,
            max_frequency: DEFAULT_MAX_FREQUENCY,
            time_step: DEFAULT_TIME_STEP,
            frequency_step: DEFAULT_FREQUENCY_STEP,
            window_shape: WindowShape::default(),
            pre_emphasis: DEFAULT_PRE_EMPHASIS,
            dynamic_range: DEFAULT_DYNAMIC_RANGE,
            dynamic_compression: DEFAULT_DYNAMIC_COMPRESSION,
            maximum: None,
        }
    }
}

impl SpectrogramSettings {
    #[must_use]
    pub fn autoscaling(&self) -> bool {
        self.maximum.is_none()
    }

    /// The part of the settings used by [`stft::sound_to_spectrogram`].
    #[must_use]
    pub fn analysis_params(&self) -> AnalysisParams {
        AnalysisParams {
            window_length: self.window_length,
            max_frequency: self.max_frequency,
            time_step: self.time_step,
            frequency_step: self.frequency_step,
            window_shape: self.window_shape,
        }
    }

    /// Checks the painting settings. Analysis settings are checked during analysis.
    /// # Errors
    /// If the dynamic range isn't a positive number or another painting setting isn't finite.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.dynamic_range.is_finite() && self.dynamic_range > 0.0) {
            return Err(SettingsError::InvalidDynamicRange(self.dynamic_range));
        }
        let finite = [
            ("pre-emphasis", Some(self.pre_emphasis)),
            ("dynamic compression", Some(self.dynamic_compression)),
            ("maximum", self.maximum),
        ];
        for (name, value) in finite {
            match value {
                Some(value) if !value.is_finite() => {
                    return Err(SettingsError::NotFinite { name, value })
                }
                _ => {}
            }
        }
        Ok(())
    }
}
