use crate::error::MatrixError;

/// Read access to a power spectrogram. Frames run along time, bins along frequency.
///
/// Frame `i` is centred at `x1 + i * dx` seconds and bin `j` at `y1 + j * dy` Hz.
/// `z` is power in Pa², so `4e-10` reads as 0 dB.
pub trait PowerSpectrogramMatrix {
    fn num_frames(&self) -> usize;
    fn num_bins(&self) -> usize;
    fn x1(&self) -> f64;
    fn dx(&self) -> f64;
    fn y1(&self) -> f64;
    fn dy(&self) -> f64;
    /// Power of `bin` in `frame`. Both must be in range.
    fn z(&self, frame: usize, bin: usize) -> f64;
}

impl PowerSpectrogramMatrix for stft::PowerSpectrogram {
    fn num_frames(&self) -> usize {
        self.nx()
    }

    fn num_bins(&self) -> usize {
        self.ny()
    }

    fn x1(&self) -> f64 {
        self.x1()
    }

    fn dx(&self) -> f64 {
        self.dx()
    }

    fn y1(&self) -> f64 {
        self.y1()
    }

    fn dy(&self) -> f64 {
        self.dy()
    }

    fn z(&self, frame: usize, bin: usize) -> f64 {
        self.z(frame, bin)
    }
}

impl<M: PowerSpectrogramMatrix + ?Sized> PowerSpectrogramMatrix for &M {
    fn num_frames(&self) -> usize {
        (**self).num_frames()
    }

    fn num_bins(&self) -> usize {
        (**self).num_bins()
    }

    fn x1(&self) -> f64 {
        (**self).x1()
    }

    fn dx(&self) -> f64 {
        (**self).dx()
    }

    fn y1(&self) -> f64 {
        (**self).y1()
    }

    fn dy(&self) -> f64 {
        (**self).dy()
    }

    fn z(&self, frame: usize, bin: usize) -> f64 {
        (**self).z(frame, bin)
    }
}

/// Owned frame-major matrix. Axes default to unit steps starting at 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    num_frames: usize,
    num_bins: usize,
    x1: f64,
    dx: f64,
    y1: f64,
    dy: f64,
    z: Vec<f64>,
}

impl Grid {
    pub fn from_fn(num_frames: usize, num_bins: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut z = Vec::with_capacity(num_frames * num_bins);
        for frame in 0..num_frames {
            for bin in 0..num_bins {
                z.push(f(frame, bin));
            }
        }
        Grid {
            num_frames,
            num_bins,
            x1: 0.0,
            dx: 1.0,
            y1: 0.0,
            dy: 1.0,
            z,
        }
    }

    /// # Errors
    /// If the frames don't all have the same number of bins.
    pub fn from_frames(frames: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let expected = frames.first().map_or(0, Vec::len);
        if let Some((frame, len)) = frames
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(MatrixError::RaggedFrames {
                frame,
                len,
                expected,
            });
        }
        Ok(Grid {
            num_frames: frames.len(),
            num_bins: expected,
            x1: 0.0,
            dx: 1.0,
            y1: 0.0,
            dy: 1.0,
            z: frames.into_iter().flatten().collect(),
        })
    }

    #[must_use]
    pub fn with_time_axis(self, x1: f64, dx: f64) -> Self {
        Grid { x1, dx, ..self }
    }

    #[must_use]
    pub fn with_frequency_axis(self, y1: f64, dy: f64) -> Self {
        Grid { y1, dy, ..self }
    }
}

impl PowerSpectrogramMatrix for Grid {
    fn num_frames(&self) -> usize {
        self.num_frames
    }

    fn num_bins(&self) -> usize {
        self.num_bins
    }

    fn x1(&self) -> f64 {
        self.x1
    }

    fn dx(&self) -> f64 {
        self.dx
    }

    fn y1(&self) -> f64 {
        self.y1
    }

    fn dy(&self) -> f64 {
        self.dy
    }

    fn z(&self, frame: usize, bin: usize) -> f64 {
        assert!(bin < self.num_bins);
        self.z[frame * self.num_bins + bin]
    }
}
