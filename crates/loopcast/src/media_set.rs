use serde::{Deserialize, Serialize};

use crate::keyframe::KeyFrames;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputPlaylistType {
    Vod,
    Live,
}

/// Reference to the media of one clip in a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClipRef {
    Source { path: String },
}

impl ClipRef {
    pub fn source(path: impl Into<String>) -> Self {
        Self::Source { path: path.into() }
    }

    pub fn path(&self) -> &str {
        match self {
            ClipRef::Source { path } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequence {
    pub clips: Vec<ClipRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_key_frame_offset: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_frame_durations: Option<Vec<i64>>,
}

impl Sequence {
    pub fn new(clips: Vec<ClipRef>, language: Option<String>) -> Self {
        Self {
            clips,
            language,
            first_key_frame_offset: None,
            key_frame_durations: None,
        }
    }

    pub fn with_key_frames(mut self, key_frames: KeyFrames) -> Self {
        self.first_key_frame_offset = Some(key_frames.first_key_frame_offset);
        self.key_frame_durations = Some(key_frames.durations);
        self
    }
}

/// The JSON media set consumed by the packager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSet {
    pub discontinuity: bool,
    pub playlist_type: OutputPlaylistType,
    pub durations: Vec<i64>,
    pub sequences: Vec<Sequence>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_clip_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_clip_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_segment_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_base_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_window_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation_end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_sequence_media_info: Option<bool>,
}

impl MediaSet {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
