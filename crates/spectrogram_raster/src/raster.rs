use crate::{
    colormap::{unpack_rgb, ColorMap},
    decibels::to_decibels,
    error::SettingsError,
    matrix::PowerSpectrogramMatrix,
    settings::SpectrogramSettings,
};

/// A painted spectrogram or colour bar. Row 0 is the top of the image.
///
/// Each pixel keeps the palette index it was painted with next to its colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterOutput {
    width: usize,
    height: usize,
    indices: Vec<usize>,
    pixels: Vec<u32>,
    non_finite_cells: usize,
}

impl RasterOutput {
    /// `f(x, y)` gives the palette index and colour of each pixel.
    pub(crate) fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> (usize, u32),
    ) -> Self {
        let mut indices = Vec::with_capacity(width * height);
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let (index, color) = f(x, y);
                indices.push(index);
                pixels.push(color);
            }
        }
        RasterOutput {
            width,
            height,
            indices,
            pixels,
            non_finite_cells: 0,
        }
    }

    pub(crate) fn with_non_finite_cells(self, non_finite_cells: usize) -> Self {
        RasterOutput {
            non_finite_cells,
            ..self
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Packed `0x00RRGGBB` colour at column `x` and row `y`.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[self.offset(x, y)]
    }

    #[must_use]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        unpack_rgb(self.pixel(x, y))
    }

    /// Palette index the pixel was painted with.
    #[must_use]
    pub fn palette_index(&self, x: usize, y: usize) -> usize {
        self.indices[self.offset(x, y)]
    }

    /// Row major colours.
    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Row major palette indices.
    #[must_use]
    pub fn palette_indices(&self) -> &[usize] {
        &self.indices
    }

    /// Rows of colours from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        (0..self.height).map(move |y| &self.pixels[y * self.width..(y + 1) * self.width])
    }

    /// Cells whose intensity wasn't a number and were painted with palette index 0.
    #[must_use]
    pub fn non_finite_cells(&self) -> usize {
        self.non_finite_cells
    }

    /// Nearest neighbour resize to `width` x `height` by replicating or dropping rows and columns.
    /// An empty raster stays empty.
    #[must_use]
    pub fn scaled(&self, width: usize, height: usize) -> RasterOutput {
        if self.is_empty() {
            return self.clone();
        }
        RasterOutput::from_fn(width, height, |x, y| {
            let offset = self.offset(x * self.width / width, y * self.height / height);
            (self.indices[offset], self.pixels[offset])
        })
        .with_non_finite_cells(self.non_finite_cells)
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) outside {}x{}", self.width, self.height);
        y * self.width + x
    }
}

/// Image row of frequency `bin` when the highest bin is drawn at the top.
#[must_use]
pub const fn flip_row(bin: usize, num_bins: usize) -> usize {
    num_bins - 1 - bin
}

/// Paints `matrix` with `palette`. One column per frame and one row per frequency bin.
/// # Errors
/// If the settings fail [`SpectrogramSettings::validate`]. Nothing is computed in that case.
pub fn rasterize<M: PowerSpectrogramMatrix + ?Sized>(
    matrix: &M,
    settings: &SpectrogramSettings,
    palette: &ColorMap,
) -> Result<RasterOutput, SettingsError> {
    Ok(to_decibels(matrix, settings)?.colorize(palette))
}
