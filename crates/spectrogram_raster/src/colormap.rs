use crate::{error::ColorMapError, raster::RasterOutput};
use std::{fmt, str::FromStr};

/// Palette size used when none is given.
pub const DEFAULT_SIZE: usize = 64;
/// Ramps can't tell apart more than this many shades of one channel.
pub const MAX_RAMP_SIZE: usize = 256;
const MAXVAL: usize = u8::MAX as usize;

/// Packs channels into `0x00RRGGBB`.
#[must_use]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Splits `0x00RRGGBB` into `[r, g, b]`.
#[must_use]
pub const fn unpack_rgb(color: u32) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

/// An ordered table of colours. Index 0 is the weakest intensity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorMap {
    table: Vec<u32>,
}

impl ColorMap {
    fn from_channels(r: &[u8], g: &[u8], b: &[u8]) -> Self {
        debug_assert!(r.len() == g.len() && g.len() == b.len());
        let table = r
            .iter()
            .zip(g)
            .zip(b)
            .map(|((&r, &g), &b)| pack_rgb(r, g, b))
            .collect();
        ColorMap { table }
    }

    /// Dark blue through cyan, green and yellow to dark red.
    /// # Errors
    /// If `n` is 0.
    pub fn jet(n: usize) -> Result<Self, ColorMapError> {
        if n == 0 {
            return Err(ColorMapError::InvalidSize);
        }
        Ok(Self::build_jet(n))
    }

    /// [`ColorMap::jet`] with [`DEFAULT_SIZE`] entries.
    #[must_use]
    pub fn jet_default() -> Self {
        Self::build_jet(DEFAULT_SIZE)
    }

    // `n` must be nonzero. Integer arithmetic and write order are significant: each channel is built
    // from the same green ramp shifted around the table.
    fn build_jet(n: usize) -> Self {
        let mut g = vec![0u8; n];
        for x in 0..n / 4 {
            g[x + n / 8] = (MAXVAL * x * 4 / n) as u8;
        }
        g[n * 3 / 8..n * 5 / 8].fill(u8::MAX);
        for x in 0..n / 4 {
            g[x + n * 5 / 8] = (MAXVAL - MAXVAL * x * 4 / n) as u8;
        }
        g[n * 7 / 8..].fill(0);

        let mut b: Vec<u8> = (0..n).map(|x| g[(x + n / 4) % n]).collect();
        b[n * 7 / 8..].fill(0);

        g[..n / 8].fill(0);
        let r: Vec<u8> = (0..n)
            .map(|x| if x < n / 8 { 0 } else { g[(x + n * 6 / 8) % n] })
            .collect();

        Self::from_channels(&r, &g, &b)
    }

    /// White at index 0 darkening evenly towards black. At most [`MAX_RAMP_SIZE`] entries.
    /// # Errors
    /// If `n` is 0.
    pub fn greyscale(n: usize) -> Result<Self, ColorMapError> {
        let shades = Self::ramp(n)?;
        Ok(Self::from_channels(&shades, &shades, &shades))
    }

    /// White at index 0 then blue darkening towards black. At most [`MAX_RAMP_SIZE`] entries.
    /// # Errors
    /// If `n` is 0.
    pub fn blue(n: usize) -> Result<Self, ColorMapError> {
        let mut b = Self::ramp(n)?;
        let mut r = vec![0; b.len()];
        let mut g = vec![0; b.len()];
        r[0] = u8::MAX;
        g[0] = u8::MAX;
        b[0] = u8::MAX;
        Ok(Self::from_channels(&r, &g, &b))
    }

    fn ramp(n: usize) -> Result<Vec<u8>, ColorMapError> {
        if n == 0 {
            return Err(ColorMapError::InvalidSize);
        }
        let n = n.min(MAX_RAMP_SIZE);
        let step = MAXVAL / n;
        Ok((0..n)
            .map(|i| MAXVAL.saturating_sub(i * step) as u8)
            .collect())
    }

    /// Packed `0x00RRGGBB` colour at `index`.
    /// # Errors
    /// If `index >= self.size()`.
    pub fn color(&self, index: usize) -> Result<u32, ColorMapError> {
        self.table
            .get(index)
            .copied()
            .ok_or(ColorMapError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Same as [`ColorMap::color`] split into channels.
    /// # Errors
    /// If `index >= self.size()`.
    pub fn rgb(&self, index: usize) -> Result<[u8; 3], ColorMapError> {
        self.color(index).map(unpack_rgb)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn table(&self) -> &[u32] {
        &self.table
    }

    /// Legend of the palette, `width` pixels wide and one row per entry, strongest colour on top.
    #[must_use]
    pub fn color_bar(&self, width: usize) -> RasterOutput {
        let top = self.size() - 1;
        RasterOutput::from_fn(width, self.size(), |_, y| (top - y, self.table[top - y]))
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::jet_default()
    }
}

/// Palettes that can be picked by name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Palette {
    #[default]
    Jet,
    Greyscale,
    Blue,
}

impl Palette {
    pub const ALL: [Palette; 3] = [Palette::Jet, Palette::Greyscale, Palette::Blue];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Palette::Jet => "jet",
            Palette::Greyscale => "greyscale",
            Palette::Blue => "blue",
        }
    }

    /// # Errors
    /// If `n` is 0.
    pub fn build(self, n: usize) -> Result<ColorMap, ColorMapError> {
        match self {
            Palette::Jet => ColorMap::jet(n),
            Palette::Greyscale => ColorMap::greyscale(n),
            Palette::Blue => ColorMap::blue(n),
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = ColorMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Palette::ALL
            .into_iter()
            .find(|palette| palette.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ColorMapError::UnknownPalette(s.to_owned()))
    }
}
