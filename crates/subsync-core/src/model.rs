use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_NARRATION_SECONDS: f64 = 3.0;
pub const DEFAULT_SPEAKER_COLOR: &str = "#1a1a2e";

/// One pre-rendered narration clip as listed in the audio manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioClipRecord {
    /// Reference transcript the clip was rendered from.
    pub text: String,
    pub file: PathBuf,
    pub duration: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("clip record is not an object")]
    NotAnObject,
    #[error("clip record is missing field `{0}`")]
    MissingField(&'static str),
    #[error("clip record field `{field}` has invalid value {value}")]
    InvalidField { field: &'static str, value: String },
}

impl TryFrom<&Value> for AudioClipRecord {
    type Error = RecordError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let object = value.as_object().ok_or(RecordError::NotAnObject)?;
        let field = |name: &'static str| object.get(name).ok_or(RecordError::MissingField(name));
        let invalid = |name: &'static str, value: &Value| RecordError::InvalidField {
            field: name,
            value: value.to_string(),
        };

        let text = field("text")?;
        let text = text.as_str().ok_or_else(|| invalid("text", text))?;

        let file = field("file")?;
        let file = file.as_str().ok_or_else(|| invalid("file", file))?;

        let duration_value = field("duration")?;
        let duration = duration_value
            .as_f64()
            .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
            .ok_or_else(|| invalid("duration", duration_value))?;

        Ok(Self {
            text: text.to_string(),
            file: PathBuf::from(file),
            duration,
        })
    }
}

/// A single line of dialogue emitted by a scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NarrationEvent {
    pub speaker: String,
    pub text: String,
    pub speaker_color: String,
    /// Hold time used when no audio clip can be resolved.
    pub requested_duration: f64,
}

impl NarrationEvent {
    #[must_use]
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            speaker_color: DEFAULT_SPEAKER_COLOR.to_string(),
            requested_duration: DEFAULT_NARRATION_SECONDS,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.speaker_color = color.into();
        self
    }

    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.requested_duration = seconds;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    /// Matched clip whose audio file was present at narration time.
    pub clip: Option<AudioClipRecord>,
    /// Index of the accepted clip inside its scene group, even if its file was missing.
    pub index: Option<usize>,
    pub ratio: f64,
    pub effective_duration: f64,
}

impl MatchResult {
    #[must_use]
    pub fn unmatched(duration: f64) -> Self {
        Self {
            clip: None,
            index: None,
            ratio: 0.0,
            effective_duration: duration,
        }
    }

    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.clip.is_some()
    }
}

/// Position of the earliest clip in a scene group that has not been consumed yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneCursor {
    speech_index: usize,
}

impl SceneCursor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn speech_index(&self) -> usize {
        self.speech_index
    }

    /// Moves past the clip at `index`, never backwards and never beyond `clip_count`.
    pub fn consume(&mut self, index: usize, clip_count: usize) {
        let next = index.saturating_add(1).min(clip_count);
        if next > self.speech_index {
            self.speech_index = next;
        }
    }
}

/// Derives the manifest group for a scene name: everything before the first `_`.
#[must_use]
pub fn scene_group_key(scene_name: &str) -> &str {
    scene_name
        .split_once('_')
        .map_or(scene_name, |(group, _)| group)
}

/// Scene group for a Rust type, using its bare type name.
#[must_use]
pub fn scene_group_of<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let name = base.rsplit("::").next().unwrap_or(base);
    scene_group_key(name)
}
