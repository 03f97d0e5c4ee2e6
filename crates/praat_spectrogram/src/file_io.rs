use anyhow::{bail, Context};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, trace};
use std::{fs::File, io::BufReader, path::Path};
use stft::Sound;

/// Read the first channel of a wav file. Integer samples are scaled to `-1.0..1.0`.
pub fn read_wav(file: &Path) -> anyhow::Result<Sound> {
    let file_handle =
        File::open(file).with_context(|| format!("reading file {}", file.display()))?;
    // The WAV file to decode.
    let mut reader = WavReader::new(BufReader::new(file_handle))
        .with_context(|| format!("Invalid wav file {}", file.display()))?;
    let spec = reader.spec();
    trace!("Spec: {:?}", spec);
    if spec.sample_rate == 0 {
        bail!("wav file {} has a sample rate of 0", file.display());
    }

    // Select correct format representation.
    let samples = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .step_by(spec.channels.into()) // Make wav mono for analysis. Ignore all but first channel.
            .map(|x| x.map(f64::from))
            .collect::<Result<Vec<_>, _>>(),
        SampleFormat::Int => {
            let full_scale = f64::from(1u32 << (spec.bits_per_sample - 1));
            reader
                .samples::<i32>()
                .step_by(spec.channels.into()) // Make wav mono for analysis. Ignore all but first channel.
                .map(|x| x.map(|x| f64::from(x) / full_scale))
                .collect::<Result<Vec<_>, _>>()
        }
    }
    .with_context(|| format!("reading samples of {}", file.display()))?;

    debug!(
        "Read {} samples at {} Hz from {}",
        samples.len(),
        spec.sample_rate,
        file.display()
    );
    Ok(Sound::new(samples, f64::from(spec.sample_rate)))
}

/// Write mono float samples to a wav file.
pub fn write_wav(
    file: &Path,
    samples: impl Iterator<Item = f32>,
    sample_rate: u32,
) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(file, spec)
        .with_context(|| format!("creating wav file {}", file.display()))?;
    for sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
