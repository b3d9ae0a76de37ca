// Diarization model manager - handles automatic downloading of pyannote models

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use log::info;

/// Model URLs for pyannote diarization
/// These models are the official pyannote-rs releases and are compatible with pyannote-rs 0.3.x
const SEGMENTATION_MODEL_URL: &str =
    "https://github.com/thewh1teagle/pyannote-rs/releases/download/v0.1.0/segmentation-3.0.onnx";
const EMBEDDING_MODEL_URL: &str =
    "https://github.com/thewh1teagle/pyannote-rs/releases/download/v0.1.0/wespeaker_en_voxceleb_CAM++.onnx";

/// Expected file names for the models
pub const SEGMENTATION_MODEL_NAME: &str = "segmentation-3.0.onnx";
pub const EMBEDDING_MODEL_NAME: &str = "wespeaker_en_voxceleb_CAM++.onnx";

/// Model info with status
#[derive(Debug, Clone, serde::Serialize)]
pub struct DiarizationModelInfo {
    pub name: String,
    pub size_mb: f64,
    pub is_downloaded: bool,
    pub path: Option<String>,
}

/// Default models directory under the per-user data dir.
pub fn default_models_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| anyhow!("No user data directory available"))?;
    Ok(data_dir.join("voicesep").join("models"))
}

/// Check if diarization models are available
pub fn are_models_available(models_dir: &Path) -> bool {
    let seg_path = models_dir.join(SEGMENTATION_MODEL_NAME);
    let emb_path = models_dir.join(EMBEDDING_MODEL_NAME);

    seg_path.exists() && emb_path.exists()
}

/// Get the paths for diarization models
pub fn get_model_paths(models_dir: &Path) -> (PathBuf, PathBuf) {
    (
        models_dir.join(SEGMENTATION_MODEL_NAME),
        models_dir.join(EMBEDDING_MODEL_NAME),
    )
}

/// Get info about diarization models
pub fn get_models_info(models_dir: &Path) -> Vec<DiarizationModelInfo> {
    let seg_path = models_dir.join(SEGMENTATION_MODEL_NAME);
    let emb_path = models_dir.join(EMBEDDING_MODEL_NAME);

    vec![
        DiarizationModelInfo {
            name: "Segmentation 3.0".to_string(),
            size_mb: 5.9,
            is_downloaded: seg_path.exists(),
            path: if seg_path.exists() {
                Some(seg_path.to_string_lossy().to_string())
            } else {
                None
            },
        },
        DiarizationModelInfo {
            name: "WeSpeaker Embedding".to_string(),
            size_mb: 26.5,
            is_downloaded: emb_path.exists(),
            path: if emb_path.exists() {
                Some(emb_path.to_string_lossy().to_string())
            } else {
                None
            },
        },
    ]
}

/// Download one model to `dest_path`, writing to a temp file first so a
/// partial download never masquerades as a usable model.
fn download_file(url: &str, dest_path: &Path, model_name: &str) -> Result<()> {
    info!("Downloading {} from {}", model_name, url);

    if let Some(parent) = dest_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // No request timeout: the embedding model is tens of megabytes and slow
    // links are expected.
    let client = reqwest::blocking::Client::builder().timeout(None).build()?;
    let mut response = client
        .get(url)
        .send()
        .map_err(|e| anyhow!("Failed to start download: {}", e))?;

    if !response.status().is_success() {
        return Err(anyhow!("Download failed with status: {}", response.status()));
    }

    let total_size = response.content_length().unwrap_or(0);
    info!(
        "Downloading {} ({:.1} MB)",
        model_name,
        total_size as f64 / (1024.0 * 1024.0)
    );

    let temp_path = dest_path.with_extension("tmp");
    let mut file = std::fs::File::create(&temp_path)
        .map_err(|e| anyhow!("Failed to create temp file: {}", e))?;

    response
        .copy_to(&mut file)
        .map_err(|e| anyhow!("Download error: {}", e))?;

    file.flush()?;
    drop(file);

    std::fs::rename(&temp_path, dest_path)
        .map_err(|e| anyhow!("Failed to rename temp file: {}", e))?;

    info!("Successfully downloaded {} to {:?}", model_name, dest_path);

    Ok(())
}

/// Download diarization models if they don't exist
pub fn ensure_models_downloaded(models_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    if !models_dir.exists() {
        std::fs::create_dir_all(models_dir)?;
    }

    let seg_path = models_dir.join(SEGMENTATION_MODEL_NAME);
    let emb_path = models_dir.join(EMBEDDING_MODEL_NAME);

    if !seg_path.exists() {
        info!("Segmentation model not found, downloading...");
        download_file(SEGMENTATION_MODEL_URL, &seg_path, "Segmentation Model")?;
    } else {
        info!("Segmentation model already exists at {:?}", seg_path);
    }

    if !emb_path.exists() {
        info!("Embedding model not found, downloading...");
        download_file(EMBEDDING_MODEL_URL, &emb_path, "Embedding Model")?;
    } else {
        info!("Embedding model already exists at {:?}", emb_path);
    }

    Ok((seg_path, emb_path))
}
