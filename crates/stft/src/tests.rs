use crate::{
    fft::{window_fn, PowerSpectrumFft},
    sound_to_spectrogram, time_samples_to_frequency, AnalysisError, AnalysisParams, Sound,
    WindowLength, WindowShape,
};
use proptest::{prelude::ProptestConfig, proptest};
use std::time::Duration;

fn sine(signal_frequency: f64, sample_rate: f64, seconds: f64) -> Sound {
    let samples = (0..(seconds * sample_rate) as usize)
        .map(|n| {
            let t = n as f64 / sample_rate;
            (2.0 * std::f64::consts::PI * signal_frequency * t).sin()
        })
        .collect();
    Sound::new(samples, sample_rate)
}

fn loudest_band(frame: &[f64]) -> usize {
    frame
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .expect("frame has bands")
}

fn test_signal(signal_frequency: f64, sample_rate: f64, window_shape: WindowShape) {
    let sound = sine(signal_frequency, sample_rate, 0.5);
    let params = AnalysisParams {
        window_shape,
        ..Default::default()
    };
    let spectrogram = sound_to_spectrogram(&sound, &params).unwrap();
    assert!(spectrogram.nx() > 0, "No frames in analysis.");
    assert!(spectrogram.ny() > 0, "No bands in analysis.");

    let expected_band = ((signal_frequency - spectrogram.y1()) / spectrogram.dy()).round() as usize;
    for (frame_idx, frame) in spectrogram.frames().enumerate() {
        let band = loudest_band(frame);
        assert!(
            band.abs_diff(expected_band) <= 1,
            "Frame {frame_idx} loudest at band {band} ({} Hz) but signal is {signal_frequency} Hz (band {expected_band}).",
            spectrogram.band_frequency(band)
        );
    }
}

#[test]
fn hz_1000_sin_wave() {
    test_signal(1000.0, 16_000.0, WindowShape::Gaussian);
}

#[test]
fn hz_2000_sin_wave_every_shape() {
    for shape in WindowShape::ALL {
        test_signal(2000.0, 22_050.0, shape);
    }
}

#[test]
fn silence_has_no_power() {
    let sound = Sound::new(vec![0.0; 8000], 8000.0);
    let spectrogram = sound_to_spectrogram(&sound, &AnalysisParams::default()).unwrap();
    assert!(spectrogram.frames().flatten().all(|&x| x == 0.0));
}

#[test]
fn frames_are_centered() {
    let sound = sine(100.0, 10_000.0, 0.3);
    let spectrogram = sound_to_spectrogram(&sound, &AnalysisParams::default()).unwrap();
    let first = spectrogram.frame_time(0) - spectrogram.xmin();
    let last = spectrogram.xmax() - spectrogram.frame_time(spectrogram.nx() - 1);
    assert!((first - last).abs() < 1e-9, "{first} != {last}");
    assert_eq!(spectrogram.frames().count(), spectrogram.nx());
}

#[test]
fn band_step_is_multiple_of_fft_bin() {
    let sound = sine(100.0, 16_000.0, 0.2);
    let spectrogram = sound_to_spectrogram(&sound, &AnalysisParams::default()).unwrap();
    // 512 point fft at 16 kHz.
    assert_eq!(spectrogram.dy(), 31.25);
    assert_eq!(spectrogram.y1(), 0.0);
    assert_eq!(spectrogram.ny(), 160);
    assert_eq!(spectrogram.ymax(), 5000.0);
}

#[test]
fn max_frequency_above_nyquist_is_nyquist() {
    let sound = sine(100.0, 8_000.0, 0.2);
    let params = AnalysisParams {
        max_frequency: 20_000.0,
        ..Default::default()
    };
    let spectrogram = sound_to_spectrogram(&sound, &params).unwrap();
    assert_eq!(spectrogram.ymax(), 4000.0);
    assert!(spectrogram.band_frequency(spectrogram.ny() - 1) <= 4000.0);
}

#[test]
fn too_short_sound() {
    let sound = Sound::new(vec![0.0; 10], 8000.0);
    assert!(matches!(
        sound_to_spectrogram(&sound, &AnalysisParams::default()),
        Err(AnalysisError::SoundTooShort { .. })
    ));
}

#[test]
fn invalid_window_length() {
    let sound = Sound::new(vec![0.0; 8000], 8000.0);
    let params = AnalysisParams {
        window_length: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        sound_to_spectrogram(&sound, &params),
        Err(AnalysisError::InvalidWindowLength(_))
    ));
}

#[test]
fn window_length_conversion() {
    let len = WindowLength::from_duration(Duration::from_millis(10), 48_000.0);
    assert_eq!(len.samples(), 480);
    assert_eq!(len.duration(48_000.0), Duration::from_millis(10));
    assert_eq!((len / 2).samples(), 240);
}

#[test]
fn gaussian_window_peaks_in_middle() {
    let window = WindowShape::Gaussian.generate(100, 100.0);
    let middle = window[49].max(window[50]);
    assert!(middle > 0.99, "{middle}");
    assert!(window[0] < 0.01, "{}", window[0]);
    for n in 0..50 {
        assert!((window[n] - window[99 - n]).abs() < 1e-12);
    }
}

#[test]
fn window_shape_names() {
    for shape in WindowShape::ALL {
        assert_eq!(shape.to_string().parse::<WindowShape>().unwrap(), shape);
    }
    assert_eq!("Gaussian".parse::<WindowShape>().unwrap(), WindowShape::Gaussian);
    assert!("kaiser".parse::<WindowShape>().is_err());
}

#[test]
fn power_spectrum_of_dc() {
    let mut fft = PowerSpectrumFft::new(8);
    let power = fft.process(&[1.0; 8]).unwrap();
    assert_eq!(power.len(), time_samples_to_frequency(8));
    assert!((power[0] - 64.0).abs() < 1e-9);
    assert!(power[1..].iter().all(|x| x.abs() < 1e-9));

    // Short frames are zero padded.
    let power = fft.process(&[1.0; 4]).unwrap();
    assert!((power[0] - 16.0).abs() < 1e-9);
}

#[test]
fn apply_window_scales() {
    let mut data = [2.0; 4];
    window_fn::apply_window(&mut data, &[0.0, 0.5, 1.0, 0.5]);
    assert_eq!(data, [0.0, 1.0, 2.0, 1.0]);
    assert_eq!(window_fn::energy(&[0.0, 0.5, 1.0, 0.5]), 1.5);
}

fn test_signal_for_panics(signal_frequency: f64, sample_rate: f64) {
    let sound = sine(signal_frequency, sample_rate, 0.05);
    match sound_to_spectrogram(&sound, &AnalysisParams::default()) {
        Ok(spectrogram) => {
            assert_eq!(spectrogram.frames().count(), spectrogram.nx());
            for frame in spectrogram.frames() {
                assert_eq!(frame.len(), spectrogram.ny());
                assert!(frame.iter().all(|x| x.is_finite() && *x >= 0.0));
            }
        }
        // Low sample rates may not fit a window or band. That must be reported, not panic.
        Err(AnalysisError::WindowTooShort(_) | AnalysisError::NoFrequencyBands { .. }) => {}
        Err(e) => panic!("Unexpected error {e}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10))] // Decrease case default from 256 to 10 because these test are slow.
    #[test]
    fn proptest_input_space(signal_frequency in 1.0..20_000.0f64, sample_rate in 1_000u32..48_000) {
        test_signal_for_panics(signal_frequency, sample_rate as f64);
    }
}
