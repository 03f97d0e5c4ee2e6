//! Prints the geometry of a wav file's spectrogram and how its intensities land on the palette.

use clap::Parser as _;
use praat_spectrogram::{args::InfoCli, file_io::read_wav, pipeline::render};

fn main() -> anyhow::Result<()> {
    // Handle commandline arguments.
    let opt = InfoCli::parse();
    simple_logger::init_with_level(opt.log_opt.log_level).unwrap();

    let sound = read_wav(&opt.file_in.in_file)?;
    let palette = opt.palette_opt.build()?;
    let rendered = render(&sound, &opt.settings, &palette)?;
    let spectrogram = &rendered.spectrogram;

    println!("file: {}", opt.file_in.in_file.display());
    println!(
        "sound: {} samples at {} Hz ({} s)",
        sound.samples().len(),
        sound.sample_rate(),
        sound.duration()
    );
    println!(
        "frames: {} every {} s starting at {} s",
        spectrogram.nx(),
        spectrogram.dx(),
        spectrogram.x1()
    );
    println!(
        "bins: {} every {} Hz starting at {} Hz",
        spectrogram.ny(),
        spectrogram.dy(),
        spectrogram.y1()
    );
    println!(
        "maximum: {} dB ({})",
        rendered.decibels.maximum(),
        if opt.settings.autoscaling() {
            "autoscaled"
        } else {
            "fixed"
        }
    );
    println!("floor: {} dB", rendered.decibels.min_intensity());
    println!("non-finite cells: {}", rendered.raster.non_finite_cells());

    println!("palette: {} with {} colours", opt.palette_opt.palette, palette.size());
    for (index, count) in rendered.palette_usage(&palette).into_iter().enumerate() {
        if count > 0 {
            println!("  {index:>3} #{:06x}: {count}", palette.table()[index]);
        }
    }

    Ok(())
}
