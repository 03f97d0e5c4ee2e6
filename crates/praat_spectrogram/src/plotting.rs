use crate::pipeline::Rendered;
use anyhow::bail;
use log::info;
use plotters::prelude::*;
use spectrogram_raster::{colormap::unpack_rgb, raster::flip_row, ColorMap, RasterOutput};
use std::path::Path;

/// Save a raster pixel for pixel.
pub fn write_raster_png(raster: &RasterOutput, file_out: &Path) -> anyhow::Result<()> {
    if raster.is_empty() {
        bail!(
            "can't save empty {}x{} raster to {}",
            raster.width(),
            raster.height(),
            file_out.display()
        );
    }
    let size = (u32::try_from(raster.width())?, u32::try_from(raster.height())?);
    let root = BitMapBackend::new(file_out, size).into_drawing_area();
    for (y, row) in raster.rows().enumerate() {
        for (x, &color) in row.iter().enumerate() {
            let [r, g, b] = unpack_rgb(color);
            root.draw_pixel((x as i32, y as i32), &RGBColor(r, g, b))?;
        }
    }

    root.present()?;
    info!("Successfully saved raster to {}", file_out.display());
    Ok(())
}

/// Save the palette's colour bar with the strongest colour on top.
pub fn write_color_bar_png(
    palette: &ColorMap,
    (width, height): (u32, u32),
    file_out: &Path,
) -> anyhow::Result<()> {
    let bar = palette
        .color_bar(width.try_into()?)
        .scaled(width.try_into()?, height.try_into()?);
    write_raster_png(&bar, file_out)
}

/// Plot the painted spectrogram on time and frequency axes. Each cell is drawn as a rectangle centred on its frame
/// time and bin frequency.
pub fn plot_spectrogram(
    rendered: &Rendered,
    title: &str,
    size: (u32, u32),
    file_out: &Path,
) -> anyhow::Result<()> {
    let spectrogram = &rendered.spectrogram;
    let raster = &rendered.raster;

    // setup graph
    let root = BitMapBackend::new(file_out, size).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 50).into_font())
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(
            spectrogram.xmin()..spectrogram.xmax(),
            spectrogram.ymin()..spectrogram.ymax(),
        )?;

    // draw the tickmarks
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Time (s)")
        .y_desc("Frequency (Hz)")
        .draw()?;

    let (half_dx, half_dy) = (spectrogram.dx() / 2.0, spectrogram.dy() / 2.0);
    chart.draw_series((0..raster.width()).flat_map(|frame| {
        (0..raster.height()).map(move |row| {
            let x = spectrogram.frame_time(frame);
            let y = spectrogram.band_frequency(flip_row(row, raster.height()));
            let [r, g, b] = raster.rgb(frame, row);
            Rectangle::new(
                [(x - half_dx, y - half_dy), (x + half_dx, y + half_dy)],
                RGBColor(r, g, b).filled(),
            )
        })
    }))?;

    root.present()?;
    info!("Successfully saved spectrogram plot to {}", file_out.display());
    Ok(())
}
