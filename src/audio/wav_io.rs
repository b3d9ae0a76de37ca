// Audio file I/O - WAV reading and writing
//
// Every WAV this crate writes is mono 16-bit PCM. Readers additionally
// accept 32-bit float input and downmix multi-channel audio to mono, so
// user-supplied recordings do not have to be pre-converted.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

/// Read a WAV file into mono i16 samples plus its sample rate.
pub fn read_wav(path: &Path) -> Result<(Vec<i16>, u32)> {
    let reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .collect::<Result<Vec<i16>, _>>()
            .with_context(|| format!("Failed to decode samples: {}", path.display()))?,
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<f32>, _>>()
            .with_context(|| format!("Failed to decode samples: {}", path.display()))?
            .into_iter()
            .map(|s| (s * 32767.0).clamp(-32768.0, 32767.0) as i16)
            .collect(),
        (format, bits) => {
            return Err(anyhow!(
                "Unsupported WAV encoding {:?}/{}-bit in {}",
                format,
                bits,
                path.display()
            ))
        }
    };

    Ok((downmix_to_mono(samples, spec.channels), spec.sample_rate))
}

/// Average interleaved channels down to a single mono channel.
fn downmix_to_mono(samples: Vec<i16>, channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples;
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

/// Write mono 16-bit PCM samples to a WAV file.
pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}

/// Duration of a WAV file in seconds, read from the header without
/// decoding any samples.
pub fn wav_duration_secs(path: &Path) -> Result<f64> {
    let reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
    let sample_rate = reader.spec().sample_rate;

    Ok(reader.duration() as f64 / sample_rate as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_mono_i16() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples: Vec<i16> = (0..1600).map(|i| (i % 100) as i16).collect();

        write_wav(&path, &samples, 16000).unwrap();
        let (read_back, rate) = read_wav(&path).unwrap();

        assert_eq!(rate, 16000);
        assert_eq!(read_back, samples);
    }

    #[test]
    fn reads_float_wavs_as_i16() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("float.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0.0f32).unwrap();
        writer.write_sample(1.0f32).unwrap();
        writer.write_sample(-1.0f32).unwrap();
        writer.finalize().unwrap();

        let (samples, rate) = read_wav(&path).unwrap();
        assert_eq!(rate, 16000);
        assert_eq!(samples, vec![0, 32767, -32767]);
    }

    #[test]
    fn downmixes_stereo_to_mono() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for &sample in &[100i16, 200, -100, 100] {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        let (samples, _) = read_wav(&path).unwrap();
        assert_eq!(samples, vec![150, 0]);
    }

    #[test]
    fn duration_from_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("half_second.wav");
        write_wav(&path, &vec![0i16; 8000], 16000).unwrap();

        let duration = wav_duration_secs(&path).unwrap();
        assert!((duration - 0.5).abs() < 1e-9);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(read_wav(&dir.path().join("nope.wav")).is_err());
        assert!(wav_duration_secs(&dir.path().join("nope.wav")).is_err());
    }
}
