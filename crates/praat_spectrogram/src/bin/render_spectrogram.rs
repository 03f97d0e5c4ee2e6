#![cfg(feature = "plot")]
//! Paints the spectrogram of a wav file to a png.

use clap::Parser as _;
use praat_spectrogram::{
    args::RenderCli,
    file_io::read_wav,
    pipeline::render,
    plotting::{plot_spectrogram, write_color_bar_png, write_raster_png},
};

const AXES_SIZE: (u32, u32) = (1280, 720);
const COLOR_BAR_WIDTH: u32 = 32;

fn main() -> anyhow::Result<()> {
    // Handle commandline arguments.
    let opt = RenderCli::parse();
    simple_logger::init_with_level(opt.log_opt.log_level).unwrap();

    let sound = read_wav(&opt.file_in.in_file)?;
    let palette = opt.palette_opt.build()?;
    let rendered = render(&sound, &opt.settings, &palette)?;

    if opt.axes {
        let size = (
            opt.width.unwrap_or(AXES_SIZE.0),
            opt.height.unwrap_or(AXES_SIZE.1),
        );
        let title = opt
            .file_in
            .in_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        plot_spectrogram(&rendered, &title, size, &opt.file_out.out_file)?;
    } else {
        let raster = &rendered.raster;
        let width = opt.width.map_or(Ok(raster.width()), usize::try_from)?;
        let height = opt.height.map_or(Ok(raster.height()), usize::try_from)?;
        write_raster_png(&raster.scaled(width, height), &opt.file_out.out_file)?;
    }

    if let Some(color_bar) = &opt.color_bar {
        let height = opt.height.unwrap_or(palette.size().try_into()?);
        write_color_bar_png(&palette, (COLOR_BAR_WIDTH, height), color_bar)?;
    }

    Ok(())
}
