// Speaker diarization module
// Wraps the pyannote-rs pipeline: segmentation + speaker embeddings + clustering

pub mod engine;
pub mod model_manager;

pub use engine::{DiarizationConfig, DiarizationEngine, DiarizationOutcome, SpeakerSegment};

pub use model_manager::{
    are_models_available, default_models_dir, ensure_models_downloaded, get_model_paths,
    get_models_info, DiarizationModelInfo, EMBEDDING_MODEL_NAME, SEGMENTATION_MODEL_NAME,
};
