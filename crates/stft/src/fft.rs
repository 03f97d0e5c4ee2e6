use realfft::{num_complex::Complex, FftError, RealFftPlanner, RealToComplex};
use std::{fmt, sync::Arc};

/// Forward real fft of a fixed length that reports the squared magnitude of each bin.
pub struct PowerSpectrumFft {
    r2c: Arc<dyn RealToComplex<f64>>,
    input: Vec<f64>,
    spectrum: Vec<Complex<f64>>,
    power: Vec<f64>,
}

impl fmt::Debug for PowerSpectrumFft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerSpectrumFft")
            .field("len", &self.input.len())
            .finish()
    }
}

impl PowerSpectrumFft {
    /// Plans a transform over `len` time samples. Output has `len / 2 + 1` bins.
    #[must_use]
    pub fn new(len: usize) -> Self {
        let mut real_planner = RealFftPlanner::<f64>::new();
        let r2c = real_planner.plan_fft_forward(len);
        let input = r2c.make_input_vec();
        let spectrum = r2c.make_output_vec();
        let power = vec![0.0; spectrum.len()];
        PowerSpectrumFft {
            r2c,
            input,
            spectrum,
            power,
        }
    }

    /// Number of time samples per transform.
    #[must_use]
    pub fn len(&self) -> usize {
        self.input.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Unnormalized power `|X(k)|^2` of `frame` zero padded to the planned length.
    /// Samples past the planned length are ignored.
    pub fn process(&mut self, frame: &[f64]) -> Result<&[f64], FftError> {
        // realfft uses the input as scratch so it must be refilled every call.
        let used = frame.len().min(self.input.len());
        self.input[..used].copy_from_slice(&frame[..used]);
        self.input[used..].fill(0.0);

        self.r2c.process(&mut self.input, &mut self.spectrum)?;

        for (power, bin) in self.power.iter_mut().zip(self.spectrum.iter()) {
            *power = bin.norm_sqr();
        }
        Ok(&self.power)
    }
}

/// Windowing functions used for short time analysis. Shapes and formulas follow Praat's `Sound: To Spectrogram`.
/// See <https://en.wikipedia.org/wiki/Window_function> for background.
pub mod window_fn {
    use std::{f64::consts::PI, fmt, str::FromStr};

    pub type WindowFloat = f64;

    /// The shape of the analysis window.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub enum WindowShape {
        Square,
        Hamming,
        Bartlett,
        Welch,
        Hanning,
        #[default]
        Gaussian,
    }

    impl WindowShape {
        pub const ALL: [WindowShape; 6] = [
            WindowShape::Square,
            WindowShape::Hamming,
            WindowShape::Bartlett,
            WindowShape::Welch,
            WindowShape::Hanning,
            WindowShape::Gaussian,
        ];

        /// Lowercase name accepted by [`FromStr`].
        #[must_use]
        pub const fn name(self) -> &'static str {
            match self {
                WindowShape::Square => "square",
                WindowShape::Hamming => "hamming",
                WindowShape::Bartlett => "bartlett",
                WindowShape::Welch => "welch",
                WindowShape::Hanning => "hanning",
                WindowShape::Gaussian => "gaussian",
            }
        }

        /// Gaussian windows are analysed over twice their effective length.
        #[must_use]
        pub const fn physical_width_factor(self) -> f64 {
            match self {
                WindowShape::Gaussian => 2.0,
                _ => 1.0,
            }
        }

        /// Coefficient for the `n`th (1 based) of `samples` window samples.
        /// `samples_per_window` is the unrounded physical window length in samples.
        #[must_use]
        pub fn coefficient(self, n: usize, samples: usize, samples_per_window: f64) -> WindowFloat {
            let phase = n as WindowFloat / samples_per_window;
            match self {
                WindowShape::Square => 1.0,
                WindowShape::Hamming => 0.54 - 0.46 * WindowFloat::cos(2.0 * PI * phase),
                WindowShape::Bartlett => 1.0 - (2.0 * phase - 1.0).abs(),
                WindowShape::Welch => 1.0 - (2.0 * phase - 1.0) * (2.0 * phase - 1.0),
                WindowShape::Hanning => 0.5 * (1.0 - WindowFloat::cos(2.0 * PI * phase)),
                WindowShape::Gaussian => {
                    let imid = 0.5 * (samples + 1) as WindowFloat;
                    let edge = WindowFloat::exp(-12.0);
                    let phase = (n as WindowFloat - imid) / samples_per_window;
                    (WindowFloat::exp(-48.0 * phase * phase) - edge) / (1.0 - edge)
                }
            }
        }

        /// All coefficients of a window with `samples` entries.
        #[must_use]
        pub fn generate(self, samples: usize, samples_per_window: f64) -> Vec<WindowFloat> {
            (1..=samples)
                .map(|n| self.coefficient(n, samples, samples_per_window))
                .collect()
        }
    }

    impl fmt::Display for WindowShape {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    #[error("unknown window shape \"{0}\"")]
    pub struct UnknownWindowShape(pub String);

    impl FromStr for WindowShape {
        type Err = UnknownWindowShape;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            WindowShape::ALL
                .into_iter()
                .find(|shape| shape.name().eq_ignore_ascii_case(s))
                .ok_or_else(|| UnknownWindowShape(s.to_owned()))
        }
    }

    /// Multiplies `data` by `window` elementwise. Extra samples on either side are left alone.
    pub fn apply_window(data: &mut [WindowFloat], window: &[WindowFloat]) {
        for (elem, coefficient) in data.iter_mut().zip(window) {
            *elem *= coefficient;
        }
    }

    /// Energy of the window. Used to normalize power so it doesn't depend on the window's shape.
    #[must_use]
    pub fn energy(window: &[WindowFloat]) -> WindowFloat {
        window.iter().map(|x| x * x).sum()
    }
}
