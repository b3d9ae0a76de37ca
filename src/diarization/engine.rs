// Diarization engine using pyannote-rs
// Wraps segmentation and speaker embedding extraction

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use pyannote_rs::{get_segments, EmbeddingExtractor, EmbeddingManager};

use crate::clips::naming::SpeakerId;

/// Configuration for diarization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarizationConfig {
    /// Path to segmentation model (segmentation-3.0.onnx)
    pub segmentation_model_path: PathBuf,
    /// Path to speaker embedding model (wespeaker_en_voxceleb_CAM++.onnx)
    pub embedding_model_path: PathBuf,
    /// Maximum number of speakers to track
    pub max_speakers: usize,
    /// Similarity threshold for speaker matching (0.0 to 1.0)
    pub similarity_threshold: f32,
}

impl Default for DiarizationConfig {
    fn default() -> Self {
        Self {
            segmentation_model_path: PathBuf::new(),
            embedding_model_path: PathBuf::new(),
            max_speakers: 10,
            similarity_threshold: 0.5,
        }
    }
}

/// One diarized stretch of speech together with the samples it covers.
#[derive(Debug, Clone)]
pub struct SpeakerSegment {
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
    /// Session-local speaker index
    pub speaker: SpeakerId,
    /// Mono 16-bit samples for this stretch
    pub samples: Vec<i16>,
}

/// Result of one diarization run: the labeled segments plus the number
/// of speech turns that had to be dropped along the way.
#[derive(Debug, Clone, Default)]
pub struct DiarizationOutcome {
    pub segments: Vec<SpeakerSegment>,
    pub dropped: usize,
}

/// Diarization engine that attributes speech turns to session-local speakers
pub struct DiarizationEngine {
    config: DiarizationConfig,
    embedding_extractor: EmbeddingExtractor,
    embedding_manager: EmbeddingManager,
}

impl DiarizationEngine {
    /// Create a new diarization engine
    pub fn new(config: DiarizationConfig) -> Result<Self> {
        info!("Initializing diarization engine");
        debug!("Segmentation model: {:?}", config.segmentation_model_path);
        debug!("Embedding model: {:?}", config.embedding_model_path);

        if !config.segmentation_model_path.exists() {
            return Err(anyhow!(
                "Segmentation model not found: {:?}",
                config.segmentation_model_path
            ));
        }
        if !config.embedding_model_path.exists() {
            return Err(anyhow!(
                "Embedding model not found: {:?}",
                config.embedding_model_path
            ));
        }

        // pyannote-rs uses eyre, convert to anyhow
        let embedding_extractor = EmbeddingExtractor::new(&config.embedding_model_path)
            .map_err(|e| anyhow!("Failed to create embedding extractor: {}", e))?;

        let embedding_manager = EmbeddingManager::new(config.max_speakers);

        info!("Diarization engine initialized successfully");

        Ok(Self {
            config,
            embedding_extractor,
            embedding_manager,
        })
    }

    /// Run diarization on mono i16 samples.
    ///
    /// Returns one labeled segment per speech turn. Turns whose embedding
    /// cannot be computed, or that cannot be matched to a speaker slot, are
    /// logged and dropped; the rest of the audio is still processed.
    pub fn diarize(&mut self, samples: &[i16], sample_rate: u32) -> Result<DiarizationOutcome> {
        info!(
            "Running diarization on {} samples at {} Hz",
            samples.len(),
            sample_rate
        );

        let segments_iter = get_segments(samples, sample_rate, &self.config.segmentation_model_path)
            .map_err(|e| anyhow!("Failed to run segmentation: {}", e))?;

        let mut labeled = Vec::new();
        let mut dropped = 0usize;

        for segment_result in segments_iter {
            let segment = match segment_result {
                Ok(seg) => seg,
                Err(e) => {
                    warn!("Failed to process segment: {}", e);
                    dropped += 1;
                    continue;
                }
            };

            let embedding: Vec<f32> = match self.embedding_extractor.compute(&segment.samples) {
                Ok(iter) => iter.collect(),
                Err(e) => {
                    warn!(
                        "Failed to compute embedding for segment [{:.1}s-{:.1}s]: {}",
                        segment.start, segment.end, e
                    );
                    dropped += 1;
                    continue;
                }
            };

            // search_speaker matches against known speakers and adds a new
            // one while capacity allows; None means the cap is hit and no
            // existing speaker is close enough.
            match self
                .embedding_manager
                .search_speaker(embedding, self.config.similarity_threshold)
            {
                Some(speaker_idx) => {
                    labeled.push(SpeakerSegment {
                        start_time: segment.start,
                        end_time: segment.end,
                        speaker: SpeakerId(speaker_idx as u32),
                        samples: segment.samples,
                    });
                }
                None => {
                    warn!(
                        "Max speakers ({}) reached, dropping segment [{:.1}s-{:.1}s]",
                        self.config.max_speakers, segment.start, segment.end
                    );
                    dropped += 1;
                }
            }
        }

        info!(
            "Diarization complete: {} labeled segments, {} dropped",
            labeled.len(),
            dropped
        );

        Ok(DiarizationOutcome {
            segments: labeled,
            dropped,
        })
    }

    /// Reset clustering state so speaker indices start from zero again.
    /// Call this between independent recordings.
    pub fn reset_session(&mut self) {
        self.embedding_manager = EmbeddingManager::new(self.config.max_speakers);
        info!("Diarization session reset");
    }

    pub fn config(&self) -> &DiarizationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DiarizationConfig::default();
        assert_eq!(config.max_speakers, 10);
        assert_eq!(config.similarity_threshold, 0.5);
    }

    #[test]
    fn missing_models_are_rejected() {
        let config = DiarizationConfig {
            segmentation_model_path: PathBuf::from("/nonexistent/segmentation.onnx"),
            embedding_model_path: PathBuf::from("/nonexistent/embedding.onnx"),
            ..Default::default()
        };

        assert!(DiarizationEngine::new(config).is_err());
    }
}
