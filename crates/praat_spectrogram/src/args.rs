use clap::{
    builder::{PossibleValuesParser, RangedU64ValueParser, TypedValueParser as _},
    Args, Parser, ValueHint,
};
use log::Level;
use spectrogram_raster::{colormap, ColorMap, ColorMapError, Palette, SpectrogramSettings};
use std::path::PathBuf;

/// Logging options.
#[derive(Args, Clone, Debug)]
pub struct LoggingOpt {
    /// The logging level to use.
    #[arg(
        short, long, default_value_t = Level::Info,
        // Needed because enum is foreign so can't use ValueEnum derive.
        value_parser = PossibleValuesParser::new(["trace", "debug", "info", "warn", "error"]).map(|s| s.parse::<Level>().unwrap()),
        ignore_case = true
    )]
    pub log_level: Level,
}

#[derive(Args, Clone, Debug)]
pub struct FileInOpt {
    /// The input wav file.
    #[arg(value_hint = ValueHint::FilePath)]
    pub in_file: PathBuf,
}

#[derive(Args, Clone, Debug)]
pub struct FileOutOpt {
    /// The output png file.
    #[arg(value_hint = ValueHint::FilePath)]
    pub out_file: PathBuf,
}

/// Colour palette options.
#[derive(Args, Clone, Debug)]
pub struct PaletteOpt {
    /// The palette to paint with.
    #[arg(
        short, long, default_value_t = Palette::Jet,
        value_parser = PossibleValuesParser::new(Palette::ALL.map(Palette::name)).map(|s| s.parse::<Palette>().unwrap()),
        ignore_case = true
    )]
    pub palette: Palette,

    /// Number of colours in the palette. Greyscale and blue use at most 256.
    #[arg(
        short = 'n', long, default_value_t = colormap::DEFAULT_SIZE,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub palette_size: usize,
}

impl PaletteOpt {
    /// # Errors
    /// If the palette size is 0.
    pub fn build(&self) -> Result<ColorMap, ColorMapError> {
        self.palette.build(self.palette_size)
    }
}

/// Print a summary of a wav file's spectrogram and how it would be painted.
#[derive(Parser, Clone, Debug)]
#[command(version)]
pub struct InfoCli {
    #[command(flatten)]
    pub log_opt: LoggingOpt,

    #[command(flatten)]
    pub file_in: FileInOpt,

    #[command(flatten)]
    pub settings: SpectrogramSettings,

    #[command(flatten)]
    pub palette_opt: PaletteOpt,
}

/// Paint a wav file's spectrogram to a png the way Praat does.
#[derive(Parser, Clone, Debug)]
#[command(version)]
pub struct RenderCli {
    #[command(flatten)]
    pub log_opt: LoggingOpt,

    #[command(flatten)]
    pub file_in: FileInOpt,

    #[command(flatten)]
    pub file_out: FileOutOpt,

    #[command(flatten)]
    pub settings: SpectrogramSettings,

    #[command(flatten)]
    pub palette_opt: PaletteOpt,

    /// Draw time and frequency axes around the spectrogram.
    #[arg(short, long)]
    pub axes: bool,

    /// Image width in pixels. Defaults to one pixel per frame, or 1280 with axes.
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels. Defaults to one pixel per frequency bin, or 720 with axes.
    #[arg(long)]
    pub height: Option<u32>,

    /// Also write the palette's colour bar to this file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub color_bar: Option<PathBuf>,
}
