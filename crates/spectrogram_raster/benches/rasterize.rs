//! A minute of audio at the default 2 ms time step is 30000 frames. Painting it should stay well below the analysis time.

use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use spectrogram_raster::{rasterize, to_decibels, ColorMap, Grid, SpectrogramSettings};
use std::hint::black_box;

fn random_grid(frames: usize, bins: usize) -> Grid {
    let mut rng = rand::thread_rng();
    Grid::from_fn(frames, bins, |_, _| rng.gen_range(0.0..1e-3)).with_frequency_axis(0.0, 31.25)
}

fn decibels(c: &mut Criterion) {
    let grid = random_grid(1000, 160);
    let settings = SpectrogramSettings {
        dynamic_compression: 0.5,
        ..Default::default()
    };
    c.bench_function("to decibels 1000x160", |b| {
        b.iter(|| to_decibels(black_box(&grid), &settings).unwrap())
    });
}

fn paint(c: &mut Criterion) {
    let grid = random_grid(1000, 160);
    let settings = SpectrogramSettings::default();
    let palette = ColorMap::default();
    c.bench_function("rasterize 1000x160", |b| {
        b.iter(|| rasterize(black_box(&grid), &settings, &palette).unwrap())
    });
}

fn scale(c: &mut Criterion) {
    let raster = rasterize(
        &random_grid(1000, 160),
        &SpectrogramSettings::default(),
        &ColorMap::default(),
    )
    .unwrap();
    c.bench_function("scale 1000x160 to 1920x1080", |b| {
        b.iter(|| black_box(&raster).scaled(1920, 1080))
    });
}

criterion_group!(benches, decibels, paint, scale);
criterion_main!(benches);
