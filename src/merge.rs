// Merging - sequential concatenation of WAV files
//
// Both entry points funnel into one concatenation routine: clips must all
// share a sample rate, and any unreadable input aborts the merge, because
// silently dropping a clip would corrupt the merged recording.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};

use crate::audio::wav_io;
use crate::clips::catalog::scan_clips;
use crate::clips::naming::{merged_file_name, SpeakerId};

/// Concatenate one speaker's clips from `input_dir` in chronological order
/// (by the start time in each clip's name) into
/// `output_dir/merged_speaker_{NN}.wav`. Returns the merged file's path.
pub fn merge_speaker_clips(
    speaker: SpeakerId,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    // scan_clips already sorts by start time
    let clips: Vec<PathBuf> = scan_clips(input_dir)?
        .into_iter()
        .filter(|clip| clip.name.speaker == speaker)
        .map(|clip| clip.path)
        .collect();

    if clips.is_empty() {
        bail!("No clips for {} in {}", speaker, input_dir.display());
    }

    concat_wav_files(&clips, output_dir, &merged_file_name(speaker))
}

/// Concatenate an explicit list of WAV files, in the given order, into
/// `output_dir/{name}.wav`.
pub fn merge_wav_files(name: &str, wav_files: &[PathBuf], output_dir: &Path) -> Result<PathBuf> {
    if wav_files.is_empty() {
        bail!("No WAV files to merge into {}.wav", name);
    }

    concat_wav_files(wav_files, output_dir, &format!("{}.wav", name))
}

fn concat_wav_files(paths: &[PathBuf], output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let mut merged: Vec<i16> = Vec::new();
    let mut sample_rate: Option<u32> = None;

    for path in paths {
        let (samples, rate) = wav_io::read_wav(path)?;

        match sample_rate {
            None => sample_rate = Some(rate),
            Some(expected) if expected != rate => bail!(
                "Sample rate mismatch: {} is {} Hz, expected {} Hz",
                path.display(),
                rate,
                expected
            ),
            Some(_) => {}
        }

        debug!(
            "Appending {} ({:.3}s)",
            path.display(),
            samples.len() as f64 / rate as f64
        );
        merged.extend_from_slice(&samples);
    }

    let rate = sample_rate.ok_or_else(|| anyhow!("No samples to merge"))?;
    let output_path = output_dir.join(file_name);
    wav_io::write_wav(&output_path, &merged, rate)?;

    info!(
        "Merged {} files into {} ({:.1}s total)",
        paths.len(),
        output_path.display(),
        merged.len() as f64 / rate as f64
    );

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clips::naming::ClipName;
    use tempfile::tempdir;

    fn write_clip(dir: &Path, speaker: u32, start: f64, end: f64, samples: &[i16], rate: u32) {
        let name = ClipName::new(SpeakerId(speaker), start, end).file_name();
        wav_io::write_wav(&dir.join(name), samples, rate).unwrap();
    }

    #[test]
    fn merges_one_speaker_in_chronological_order() {
        let dir = tempdir().unwrap();
        // Written out of order; the start time in the name decides.
        write_clip(dir.path(), 0, 5.0, 6.0, &[3, 3], 16000);
        write_clip(dir.path(), 0, 1.0, 2.0, &[1, 1], 16000);
        write_clip(dir.path(), 1, 2.0, 3.0, &[9, 9], 16000);

        let merged = merge_speaker_clips(SpeakerId(0), dir.path(), dir.path()).unwrap();

        assert_eq!(merged, dir.path().join("merged_speaker_00.wav"));
        let (samples, rate) = wav_io::read_wav(&merged).unwrap();
        assert_eq!(rate, 16000);
        assert_eq!(samples, vec![1, 1, 3, 3]);
    }

    #[test]
    fn speaker_without_clips_is_an_error() {
        let dir = tempdir().unwrap();
        write_clip(dir.path(), 0, 1.0, 2.0, &[1], 16000);

        assert!(merge_speaker_clips(SpeakerId(5), dir.path(), dir.path()).is_err());
    }

    #[test]
    fn sample_rate_mismatch_is_an_error() {
        let dir = tempdir().unwrap();
        write_clip(dir.path(), 0, 1.0, 2.0, &[1], 16000);
        write_clip(dir.path(), 0, 3.0, 4.0, &[2], 8000);

        let result = merge_speaker_clips(SpeakerId(0), dir.path(), dir.path());

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Sample rate"));
    }

    #[test]
    fn unreadable_clip_aborts_the_merge() {
        let dir = tempdir().unwrap();
        write_clip(dir.path(), 0, 1.0, 2.0, &[1], 16000);
        let bad_name = ClipName::new(SpeakerId(0), 3.0, 4.0).file_name();
        std::fs::write(dir.path().join(bad_name), b"not a wav").unwrap();

        assert!(merge_speaker_clips(SpeakerId(0), dir.path(), dir.path()).is_err());
    }

    #[test]
    fn merges_explicit_file_list_in_given_order() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.wav");
        let b = dir.path().join("b.wav");
        wav_io::write_wav(&a, &[2, 2], 16000).unwrap();
        wav_io::write_wav(&b, &[1, 1], 16000).unwrap();

        let out_dir = dir.path().join("out");
        let merged = merge_wav_files("combined", &[b, a], &out_dir).unwrap();

        assert_eq!(merged, out_dir.join("combined.wav"));
        let (samples, _) = wav_io::read_wav(&merged).unwrap();
        assert_eq!(samples, vec![1, 1, 2, 2]);
    }

    #[test]
    fn empty_file_list_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(merge_wav_files("combined", &[], dir.path()).is_err());
    }
}
