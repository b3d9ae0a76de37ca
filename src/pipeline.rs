// Iterative isolation pipeline - separate, clean, merge, repeat
//
// Each pass diarizes the current input, drops degenerate clips, merges the
// dominant speaker's clips and feeds the merged file into the next pass.
// Pass directories live inside one working directory owned by the run.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::clips::catalog;
use crate::clips::cleanup;
use crate::config::IsolationConfig;
use crate::diarization::{model_manager, DiarizationConfig, DiarizationEngine};
use crate::merge;
use crate::separation;

/// What happened during one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassSummary {
    pub pass: usize,
    pub segments_detected: usize,
    pub clips_written: usize,
    pub clips_skipped: usize,
    pub clips_removed: usize,
    pub dominant_speaker: String,
    pub merged_file: PathBuf,
}

/// Full record of one run, written as pretty JSON into the working
/// directory when the run finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    pub passes: Vec<PassSummary>,
    pub final_output: PathBuf,
}

pub struct IsolationPipeline {
    config: IsolationConfig,
    engine: DiarizationEngine,
    work_dir: PathBuf,
}

impl IsolationPipeline {
    /// Resolve the models directory, download any missing model, and build
    /// the diarization engine. Model problems are a hard error here.
    pub fn new(config: IsolationConfig, work_dir: PathBuf) -> Result<Self> {
        let models_dir = config.models_dir()?;
        let (segmentation_model_path, embedding_model_path) =
            model_manager::ensure_models_downloaded(&models_dir)?;

        let engine = DiarizationEngine::new(DiarizationConfig {
            segmentation_model_path,
            embedding_model_path,
            max_speakers: config.max_speakers,
            similarity_threshold: config.similarity_threshold,
        })?;

        Ok(Self {
            config,
            engine,
            work_dir,
        })
    }

    /// Run the configured number of passes on `input` and write the run
    /// report. Each pass's merged file is the next pass's input.
    pub fn run(&mut self, input: &Path) -> Result<RunReport> {
        let started = Utc::now();
        std::fs::create_dir_all(&self.work_dir).with_context(|| {
            format!(
                "Failed to create working directory: {}",
                self.work_dir.display()
            )
        })?;

        info!(
            "Starting isolation run on {} ({} passes)",
            input.display(),
            self.config.passes
        );

        let mut current_input = input.to_path_buf();
        let mut passes = Vec::new();

        for pass in 0..self.config.passes {
            let summary = self.run_pass(pass, &current_input)?;
            current_input = summary.merged_file.clone();
            passes.push(summary);
        }

        let report = RunReport {
            input: input.to_path_buf(),
            started,
            finished: Utc::now(),
            passes,
            final_output: current_input,
        };
        write_report(&self.work_dir, &report)?;

        info!("Isolation run finished: {}", report.final_output.display());
        Ok(report)
    }

    fn run_pass(&mut self, pass: usize, input: &Path) -> Result<PassSummary> {
        let pass_dir = self.work_dir.join(pass_dir_name(pass));
        info!("Pass {}: separating {}", pass, input.display());

        // Fresh clustering every pass, so speaker indices restart at zero.
        self.engine.reset_session();

        let separation = separation::separate_speakers(&mut self.engine, input, &pass_dir)?;
        let stats = cleanup::remove_degenerate_clips(&pass_dir, &self.config.cleanup)?;

        let speaker = catalog::dominant_speaker(&pass_dir)?
            .ok_or_else(|| anyhow!("Pass {}: no clips survived cleanup", pass))?;
        info!("Pass {}: dominant speaker is {}", pass, speaker);

        let merged_file = merge::merge_speaker_clips(speaker, &pass_dir, &pass_dir)?;

        if !self.config.keep_intermediate {
            sweep_clips(&pass_dir)?;
        }

        Ok(PassSummary {
            pass,
            segments_detected: separation.segments_detected,
            clips_written: separation.clips_written,
            clips_skipped: separation.clips_skipped,
            clips_removed: stats.removed,
            dominant_speaker: speaker.to_string(),
            merged_file,
        })
    }
}

fn pass_dir_name(pass: usize) -> String {
    format!("pass_{:02}", pass)
}

/// Remove the clip files from a pass directory once they are merged. The
/// merged file does not match the clip pattern, so it survives the sweep.
fn sweep_clips(pass_dir: &Path) -> Result<()> {
    for clip in catalog::scan_clips(pass_dir)? {
        if let Err(e) = std::fs::remove_file(&clip.path) {
            warn!("Failed to sweep {}: {}", clip.path.display(), e);
        }
    }
    Ok(())
}

fn write_report(work_dir: &Path, report: &RunReport) -> Result<PathBuf> {
    let path = work_dir.join(format!(
        "run_{}.json",
        report.started.format("%Y-%m-%d_%H-%M-%S")
    ));
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write run report: {}", path.display()))?;

    info!("Run report written to {}", path.display());
    Ok(path)
}
