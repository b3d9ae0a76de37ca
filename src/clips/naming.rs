// Clip naming - speaker id and time range encoded in the filename
//
// Pattern: speaker_SPEAKER_00_start_12.3s_end_15.6s.wav
// The filename is the on-disk contract: everything the catalog knows about
// a clip comes from parsing its name.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static CLIP_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^speaker_SPEAKER_(\d+)_start_(\d+\.\d+)s_end_(\d+\.\d+)s\.wav$")
        .expect("clip name pattern is valid")
});

/// Session-local speaker index as assigned by the diarization engine.
///
/// Displays as the zero-padded label used in filenames, e.g. `SPEAKER_03`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeakerId(pub u32);

impl fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SPEAKER_{:02}", self.0)
    }
}

/// Metadata carried by a clip filename.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipName {
    pub speaker: SpeakerId,
    pub start_secs: f64,
    pub end_secs: f64,
}

impl ClipName {
    pub fn new(speaker: SpeakerId, start_secs: f64, end_secs: f64) -> Self {
        Self {
            speaker,
            start_secs,
            end_secs,
        }
    }

    /// Render the on-disk filename for this clip.
    ///
    /// Times are rounded to one decimal place; the rendered name always
    /// parses back via [`ClipName::parse`].
    pub fn file_name(&self) -> String {
        format!(
            "speaker_{}_start_{:.1}s_end_{:.1}s.wav",
            self.speaker, self.start_secs, self.end_secs
        )
    }

    /// Parse a filename, `None` when it does not match the clip pattern.
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = CLIP_NAME_RE.captures(file_name)?;
        let speaker = caps[1].parse::<u32>().ok()?;
        let start_secs = caps[2].parse::<f64>().ok()?;
        let end_secs = caps[3].parse::<f64>().ok()?;

        Some(Self {
            speaker: SpeakerId(speaker),
            start_secs,
            end_secs,
        })
    }
}

/// Filename for a merged per-speaker recording, e.g. `merged_speaker_03.wav`.
pub fn merged_file_name(speaker: SpeakerId) -> String {
    format!("merged_speaker_{:02}.wav", speaker.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_zero_padded_names() {
        let name = ClipName::new(SpeakerId(3), 12.34, 15.68);
        assert_eq!(name.file_name(), "speaker_SPEAKER_03_start_12.3s_end_15.7s.wav");
    }

    #[test]
    fn rendered_names_parse_back() {
        let name = ClipName::new(SpeakerId(0), 0.0, 2.5);
        let parsed = ClipName::parse(&name.file_name()).unwrap();

        assert_eq!(parsed.speaker, SpeakerId(0));
        assert!((parsed.start_secs - 0.0).abs() < 1e-9);
        assert!((parsed.end_secs - 2.5).abs() < 1e-9);
    }

    #[test]
    fn parses_wide_speaker_indices() {
        let parsed = ClipName::parse("speaker_SPEAKER_123_start_4.0s_end_9.9s.wav").unwrap();
        assert_eq!(parsed.speaker, SpeakerId(123));
    }

    #[test]
    fn rejects_non_clip_names() {
        assert!(ClipName::parse("merged_speaker_00.wav").is_none());
        assert!(ClipName::parse("speaker_SPEAKER_xx_start_1.0s_end_2.0s.wav").is_none());
        assert!(ClipName::parse("speaker_SPEAKER_00_start_1.0s_end_2.0s.mp3").is_none());
        assert!(ClipName::parse("prefix_speaker_SPEAKER_00_start_1.0s_end_2.0s.wav").is_none());
        assert!(ClipName::parse("speaker_SPEAKER_00_start_1s_end_2.0s.wav").is_none());
    }

    #[test]
    fn speaker_id_label() {
        assert_eq!(SpeakerId(7).to_string(), "SPEAKER_07");
        assert_eq!(SpeakerId(42).to_string(), "SPEAKER_42");
    }

    #[test]
    fn merged_name_is_zero_padded() {
        assert_eq!(merged_file_name(SpeakerId(0)), "merged_speaker_00.wav");
        assert_eq!(merged_file_name(SpeakerId(11)), "merged_speaker_11.wav");
    }
}
