// voicesep - iterative dominant-speaker isolation for WAV recordings
//
// Diarization itself (VAD, speaker embeddings, clustering) is delegated to
// pyannote-rs. This crate does everything around the model: clip export and
// naming, degenerate-clip cleanup, per-speaker accounting, chronological
// merging, and the pass loop that feeds each merged result back in.

pub mod audio;
pub mod clips;
pub mod config;
pub mod diarization;
pub mod merge;
pub mod pipeline;
pub mod separation;

pub use config::IsolationConfig;
pub use pipeline::{IsolationPipeline, PassSummary, RunReport};
