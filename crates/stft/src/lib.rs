//! Crate for finding the short time power spectrogram of a sound the way Praat's `Sound: To Spectrogram` does.

use derive_more::{Add, Div, Mul, Sub};
use fft::{window_fn, PowerSpectrumFft};
use log::{debug, trace};
use std::{f64::consts::PI, time::Duration};
use thiserror::Error;

/// Relating to frequency analysis ex. fft and windowing.
pub mod fft;

pub use fft::window_fn::WindowShape;

/// A window length. Wraps the number of samples with methods for converting to/from time.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Add, Div, Mul, Sub)]
pub struct WindowLength {
    sample_num: usize,
}

impl WindowLength {
    /// [`WindowLength`] constructor.
    #[must_use]
    pub fn from_samples(sample_num: usize) -> Self {
        WindowLength { sample_num }
    }

    /// [`WindowLength`] constructor. Rounds down to a whole sample.
    /// # Arguments
    /// - `duration`: Length of the window in time.
    /// - `sample_rate`: Samples per second.
    #[must_use]
    pub fn from_duration(duration: Duration, sample_rate: f64) -> Self {
        // secs * samples/sec = samples
        WindowLength {
            sample_num: (duration.as_secs_f64() * sample_rate).floor() as usize,
        }
    }

    /// Getter for samples
    #[must_use]
    pub fn samples(&self) -> usize {
        self.sample_num
    }

    /// Converts samples to duration. Samples / (samples/sec)= secs
    /// # Arguments
    /// - `sample_rate`: the samples per second.
    #[must_use]
    pub fn duration(&self, sample_rate: f64) -> Duration {
        Duration::from_secs_f64(self.sample_num as f64 / sample_rate)
    }
}

/// A mono sampled signal. The first sample is centered half a sample period after time 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Sound {
    samples: Vec<f64>,
    sample_rate: f64,
}

impl Sound {
    /// Basic constructor.
    pub fn new(samples: Vec<f64>, sample_rate: f64) -> Self {
        assert!(
            sample_rate.is_finite() && sample_rate > 0.0,
            "sample rate should be a positive value"
        );
        Sound {
            samples,
            sample_rate,
        }
    }

    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    #[must_use]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Sampling period.
    #[must_use]
    pub fn dx(&self) -> f64 {
        1.0 / self.sample_rate
    }

    /// Time of the first sample's center.
    #[must_use]
    pub fn x1(&self) -> f64 {
        0.5 * self.dx()
    }

    /// Length of the sound in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 * self.dx()
    }

    /// Index of the last sample at or before `time`. May be out of range.
    fn time_to_low_index(&self, time: f64) -> isize {
        ((time - self.x1()) / self.dx()).floor() as isize
    }

    /// Sample at `index`, or silence outside the sound.
    fn sample_or_silence(&self, index: isize) -> f64 {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.samples.get(i))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Parameters of the short time analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisParams {
    /// Effective window length in seconds.
    pub window_length: f64,
    /// Highest analysed frequency in hertz. Values `<= 0` or above Nyquist mean Nyquist.
    pub max_frequency: f64,
    /// Requested time between frames in seconds.
    pub time_step: f64,
    /// Requested distance between frequency bands in hertz.
    pub frequency_step: f64,
    pub window_shape: WindowShape,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        AnalysisParams {
            window_length: 0.005,
            max_frequency: 5000.0,
            time_step: 0.002,
            frequency_step: 20.0,
            window_shape: WindowShape::Gaussian,
        }
    }
}

/// Reasons a sound can't be analysed with the given parameters.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("window length must be a positive number of seconds, got {0}")]
    InvalidWindowLength(f64),
    #[error("sound of {duration} s is shorter than the physical analysis window of {window} s")]
    SoundTooShort { duration: f64, window: f64 },
    #[error("analysis window of {0} samples is too short")]
    WindowTooShort(usize),
    #[error("no frequency bands fit below {max_frequency} Hz with a step of {frequency_step} Hz")]
    NoFrequencyBands {
        max_frequency: f64,
        frequency_step: f64,
    },
    #[error("fft failed: {0}")]
    Fft(#[from] realfft::FftError),
}

/// The calculated power spectrogram. Regular grid over time (x) and frequency (y).
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSpectrogram {
    xmin: f64,
    xmax: f64,
    nx: usize,
    dx: f64,
    x1: f64,
    ymax: f64,
    ny: usize,
    dy: f64,
    y1: f64,
    z: Vec<f64>, // Frame major. `z[frame * ny + band]` is power in Pa²/Hz.
}

impl PowerSpectrogram {
    /// Number of frames in time.
    #[must_use]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Time step between frames.
    #[must_use]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Center time of the first frame.
    #[must_use]
    pub fn x1(&self) -> f64 {
        self.x1
    }

    /// Number of frequency bands.
    #[must_use]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Frequency step between bands.
    #[must_use]
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Center frequency of the first band.
    #[must_use]
    pub fn y1(&self) -> f64 {
        self.y1
    }

    #[must_use]
    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    #[must_use]
    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    /// Lowest frequency is always 0 hz.
    #[must_use]
    pub fn ymin(&self) -> f64 {
        0.0
    }

    #[must_use]
    pub fn ymax(&self) -> f64 {
        self.ymax
    }

    /// Power of `band` during `frame`.
    /// # Panics
    /// If either index is out of range.
    #[must_use]
    pub fn z(&self, frame: usize, band: usize) -> f64 {
        assert!(band < self.ny, "band {band} out of range 0..{}", self.ny);
        self.z[frame * self.ny + band]
    }

    /// Center time of `frame`.
    #[must_use]
    pub fn frame_time(&self, frame: usize) -> f64 {
        self.x1 + frame as f64 * self.dx
    }

    /// Center frequency of `band`.
    #[must_use]
    pub fn band_frequency(&self, band: usize) -> f64 {
        self.y1 + band as f64 * self.dy
    }

    /// Each frame's bands from the first frame to the last.
    pub fn frames(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.z.chunks_exact(self.ny.max(1)).take(self.nx)
    }
}

/// Number of frames and the center time of the first one when windows of `window_duration` are stepped by `time_step` over `sound`.
/// Frames are centered so leftover time is split evenly between both ends.
fn short_term_analysis(sound: &Sound, window_duration: f64, time_step: f64) -> (usize, f64) {
    let sound_duration = sound.duration();
    let frame_cnt = ((sound_duration - window_duration) / time_step).floor() as usize + 1;
    let mid_time = sound.x1() - 0.5 * sound.dx() + 0.5 * sound_duration;
    let frames_duration = frame_cnt as f64 * time_step;
    let t1 = mid_time - 0.5 * frames_duration + 0.5 * time_step;
    (frame_cnt, t1)
}

/// Computes the power spectrogram of `sound`.
pub fn sound_to_spectrogram(
    sound: &Sound,
    params: &AnalysisParams,
) -> Result<PowerSpectrogram, AnalysisError> {
    if !(params.window_length.is_finite() && params.window_length > 0.0) {
        return Err(AnalysisError::InvalidWindowLength(params.window_length));
    }
    let dx = sound.dx();
    let nyquist = 0.5 * sound.sample_rate();
    let max_frequency = if params.max_frequency <= 0.0 || params.max_frequency > nyquist {
        nyquist
    } else {
        params.max_frequency
    };

    // The resolution can't be finer than the window allows.
    let physical_duration = params.window_shape.physical_width_factor() * params.window_length;
    let effective_time_width = params.window_length / PI.sqrt();
    let effective_freq_width = 1.0 / effective_time_width;
    let time_step = params
        .time_step
        .max(effective_time_width / 8.0)
        .max(dx);
    let requested_frequency_step = params.frequency_step.max(effective_freq_width / 8.0);

    let duration = sound.duration();
    if physical_duration > duration {
        return Err(AnalysisError::SoundTooShort {
            duration,
            window: physical_duration,
        });
    }

    // Even number of samples so the window is symmetric around the frame's center.
    let window_len =
        WindowLength::from_duration(Duration::from_secs_f64(physical_duration), sound.sample_rate());
    let half_window = (window_len / 2).samples().saturating_sub(1);
    let window_len = WindowLength::from_samples(2 * half_window);
    if window_len.samples() < 2 {
        return Err(AnalysisError::WindowTooShort(window_len.samples()));
    }

    let (frame_cnt, t1) = short_term_analysis(sound, physical_duration, time_step);

    let band_cnt_for = |frequency_step: f64| (max_frequency / frequency_step).floor() as usize;
    let requested_band_cnt = band_cnt_for(requested_frequency_step);
    if requested_band_cnt == 0 {
        return Err(AnalysisError::NoFrequencyBands {
            max_frequency,
            frequency_step: requested_frequency_step,
        });
    }

    // Fft must cover the window and resolve every band up to Nyquist.
    let mut fft_len = 1;
    while fft_len < window_len.samples()
        || (fft_len as f64) < 2.0 * requested_band_cnt as f64 * (nyquist / max_frequency)
    {
        fft_len *= 2;
    }
    // Each band sums a whole number of fft bins.
    let bin_width_samples = ((requested_frequency_step * dx * fft_len as f64).floor() as usize).max(1);
    let bin_width_hertz = 1.0 / (dx * fft_len as f64);
    let frequency_step = bin_width_samples as f64 * bin_width_hertz;
    let band_cnt = band_cnt_for(frequency_step);
    if band_cnt == 0 {
        return Err(AnalysisError::NoFrequencyBands {
            max_frequency,
            frequency_step,
        });
    }
    trace!(
        "Spectrogram geometry: {frame_cnt} frames from {t1} s every {time_step} s, {band_cnt} bands every {frequency_step} Hz, window {} samples, fft {fft_len}",
        window_len.samples()
    );

    let window = params
        .window_shape
        .generate(window_len.samples(), physical_duration / dx);
    let one_by_bin_width = 1.0 / window_fn::energy(&window) / bin_width_samples as f64;

    let mut fft = PowerSpectrumFft::new(fft_len);
    let mut frame = vec![0.0; window_len.samples()];
    let mut z = Vec::with_capacity(frame_cnt * band_cnt);
    for frame_idx in 0..frame_cnt {
        let t = t1 + frame_idx as f64 * time_step;
        let left_sample = sound.time_to_low_index(t);
        let start_sample = left_sample + 1 - half_window as isize;

        // Take the window of samples centered at the frame's time.
        for (offset, sample) in frame.iter_mut().enumerate() {
            *sample = sound.sample_or_silence(start_sample + offset as isize);
        }
        window_fn::apply_window(&mut frame, &window);

        let power = fft.process(&frame)?;

        // Integrate over the fft bins belonging to each band.
        z.extend((0..band_cnt).map(|band| {
            let lower = band * bin_width_samples;
            power
                .iter()
                .skip(lower)
                .take(bin_width_samples)
                .sum::<f64>()
                * one_by_bin_width
        }));
    }
    debug!("Computed spectrogram with {frame_cnt} frames and {band_cnt} bands");

    Ok(PowerSpectrogram {
        xmin: 0.0,
        xmax: duration,
        nx: frame_cnt,
        dx: time_step,
        x1: t1,
        ymax: max_frequency,
        ny: band_cnt,
        dy: frequency_step,
        y1: 0.5 * (frequency_step - bin_width_hertz),
        z,
    })
}

/// Converts a number of time samples to frequency samples.
/// N samples to (N/2)+1 samples.
#[must_use]
pub const fn time_samples_to_frequency(time_samples: usize) -> usize {
    (time_samples / 2) + 1
}

#[cfg(test)]
mod tests;
