// Voice separation - export one clip per diarized segment

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::audio::wav_io;
use crate::clips::naming::ClipName;
use crate::diarization::DiarizationEngine;

/// Tallies from one separation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparationSummary {
    /// Speech turns the segmentation model detected.
    pub segments_detected: usize,
    /// Clips written to the output directory.
    pub clips_written: usize,
    /// Turns dropped by the engine (no embedding or no speaker slot).
    pub clips_skipped: usize,
}

/// Diarize a WAV file and write one clip per labeled segment into
/// `output_dir` (created if absent), named by the clip pattern.
///
/// Turns the engine could not label are already logged at warn level and
/// only show up here in the skip count. A clip that cannot be written is a
/// hard error.
pub fn separate_speakers(
    engine: &mut DiarizationEngine,
    input: &Path,
    output_dir: &Path,
) -> Result<SeparationSummary> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let (samples, sample_rate) = wav_io::read_wav(input)?;
    info!(
        "Separating {} ({:.1}s at {} Hz)",
        input.display(),
        samples.len() as f64 / sample_rate as f64,
        sample_rate
    );

    let outcome = engine.diarize(&samples, sample_rate)?;

    let mut summary = SeparationSummary {
        segments_detected: outcome.segments.len() + outcome.dropped,
        clips_skipped: outcome.dropped,
        ..Default::default()
    };

    for segment in outcome.segments {
        let name = ClipName::new(segment.speaker, segment.start_time, segment.end_time);
        let clip_path = output_dir.join(name.file_name());

        wav_io::write_wav(&clip_path, &segment.samples, sample_rate)?;
        debug!("Saved clip: {}", clip_path.display());
        summary.clips_written += 1;
    }

    info!(
        "Separation of {} complete: {} segments detected, {} clips written, {} skipped",
        input.display(),
        summary.segments_detected,
        summary.clips_written,
        summary.clips_skipped
    );

    Ok(summary)
}
