// Clip cleanup - degenerate-clip removal and directory sweeping

use std::path::Path;

use anyhow::{anyhow, Result};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::audio::wav_io;

/// Duration window for clips considered degenerate, plus a dry-run switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupOptions {
    /// Shortest duration (inclusive, seconds) still removed.
    pub min_duration_secs: f64,
    /// Longest duration (inclusive, seconds) still removed.
    pub max_duration_secs: f64,
    /// Report what would be removed without touching the filesystem.
    pub dry_run: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            min_duration_secs: 0.0,
            max_duration_secs: 1.0,
            dry_run: false,
        }
    }
}

/// Tallies from one cleanup sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupStats {
    pub examined: usize,
    pub removed: usize,
    pub kept: usize,
    pub failed: usize,
}

/// Delete the WAV files in `dir` whose duration falls inside the window.
///
/// Unreadable files are logged per file and skipped; the sweep continues.
/// A non-directory argument is a hard error.
pub fn remove_degenerate_clips(dir: &Path, options: &CleanupOptions) -> Result<CleanupStats> {
    if !dir.is_dir() {
        return Err(anyhow!("Not a directory: {}", dir.display()));
    }

    let mut stats = CleanupStats::default();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !has_wav_extension(&path) {
            continue;
        }
        stats.examined += 1;

        let duration = match wav_io::wav_duration_secs(&path) {
            Ok(duration) => duration,
            Err(e) => {
                warn!("Skipping unreadable WAV {}: {}", path.display(), e);
                stats.failed += 1;
                continue;
            }
        };

        if duration >= options.min_duration_secs && duration <= options.max_duration_secs {
            debug!("Removing {} ({:.3}s)", path.display(), duration);
            if !options.dry_run {
                if let Err(e) = std::fs::remove_file(&path) {
                    error!("Failed to remove {}: {}", path.display(), e);
                    stats.failed += 1;
                    continue;
                }
            }
            stats.removed += 1;
        } else {
            debug!("Keeping {} ({:.3}s)", path.display(), duration);
            stats.kept += 1;
        }
    }

    info!(
        "Cleanup of {}: {} examined, {} removed, {} kept{}",
        dir.display(),
        stats.examined,
        stats.removed,
        stats.kept,
        if options.dry_run { " (dry run)" } else { "" }
    );

    Ok(stats)
}

fn has_wav_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

/// Remove every entry directly inside `dir`: files and symlinks with
/// `remove_file`, subdirectories recursively. A missing directory is a
/// no-op. Individual failures are logged and the sweep continues; the
/// first failure is returned once the sweep is done.
pub fn clear_folder(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    let mut first_error: Option<anyhow::Error> = None;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // file_type() does not follow symlinks, so a link to a directory
        // is removed as a link rather than recursed into.
        let file_type = entry.file_type()?;

        let result = if file_type.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };

        if let Err(e) = result {
            warn!("Failed to remove {}: {}", path.display(), e);
            if first_error.is_none() {
                first_error = Some(
                    anyhow::Error::new(e).context(format!("Failed to clear {}", path.display())),
                );
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
