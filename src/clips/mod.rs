// Per-speaker clip handling - naming, catalog, cleanup

pub mod catalog;
pub mod cleanup;
pub mod naming;

pub use catalog::{dominant_speaker, scan_clips, speaker_histogram, ClipEntry};
pub use cleanup::{clear_folder, remove_degenerate_clips, CleanupOptions, CleanupStats};
pub use naming::{merged_file_name, ClipName, SpeakerId};
