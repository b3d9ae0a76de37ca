// Clip catalog - directory scanning and per-speaker accounting

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use super::naming::{ClipName, SpeakerId};

/// A clip on disk whose filename parsed successfully.
#[derive(Debug, Clone)]
pub struct ClipEntry {
    pub path: PathBuf,
    pub name: ClipName,
}

/// Enumerate the clips in a directory (non-recursive), sorted by start time.
///
/// Files that do not match the clip pattern are ignored.
pub fn scan_clips(dir: &Path) -> Result<Vec<ClipEntry>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read clip directory: {}", dir.display()))?;

    let mut clips = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        match ClipName::parse(file_name) {
            Some(name) => clips.push(ClipEntry { path, name }),
            None => debug!("Ignoring non-clip file: {}", file_name),
        }
    }

    clips.sort_by(|a, b| a.name.start_secs.total_cmp(&b.name.start_secs));
    Ok(clips)
}

/// Clip count per speaker, ordered by speaker id.
pub fn speaker_histogram(clips: &[ClipEntry]) -> BTreeMap<SpeakerId, usize> {
    let mut histogram = BTreeMap::new();
    for clip in clips {
        *histogram.entry(clip.name.speaker).or_insert(0usize) += 1;
    }

    histogram
}

/// The speaker owning the most clips in `dir`, or `None` when the directory
/// holds no clips. Ties break toward the lowest speaker id.
pub fn dominant_speaker(dir: &Path) -> Result<Option<SpeakerId>> {
    let clips = scan_clips(dir)?;
    let histogram = speaker_histogram(&clips);

    let mut best: Option<(SpeakerId, usize)> = None;
    for (speaker, count) in histogram {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((speaker, count));
        }
    }

    Ok(best.map(|(speaker, _)| speaker))
}
