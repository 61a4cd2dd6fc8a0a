use std::{collections::HashMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{LoopcastError, LoopcastResult};

/// Shift applied to the query time to build `presentationEndTime`.
pub const PRESENTATION_END_SHIFT_MILLIS: i64 = 100000;

/// Upper bound of the DVR window and of the safety margin: one week.
pub const MAX_WINDOW_MILLIS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Query times must lie within `±2^53` milliseconds of the epoch.
pub const MAX_QUERY_TIME_MILLIS: i64 = 1 << 53;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PlaylistType {
    /// Every clip once.
    Vod,
    /// Same as [`PlaylistType::Vod`], reported as `vod`.
    Playlist,
    /// The catalog looped forever, windowed by the DVR window.
    Live,
}

impl PlaylistType {
    pub const VALUES: &'static [&'static str] = &["vod", "playlist", "live"];

    pub fn is_live(&self) -> bool {
        matches!(self, PlaylistType::Live)
    }
}

impl FromStr for PlaylistType {
    type Err = LoopcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vod" => Ok(Self::Vod),
            "playlist" => Ok(Self::Playlist),
            "live" => Ok(Self::Live),
            _ => Err(LoopcastError::not_one_of("type", Self::VALUES)),
        }
    }
}

impl TryFrom<String> for PlaylistType {
    type Error = LoopcastError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Whether the presentation end lies in the past or in the future of the query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PresentationEnd {
    Past,
    Future,
}

impl PresentationEnd {
    pub const VALUES: &'static [&'static str] = &["past", "future"];

    pub fn time_from(&self, end_time_millis: i64) -> i64 {
        match self {
            PresentationEnd::Past => end_time_millis.saturating_sub(PRESENTATION_END_SHIFT_MILLIS),
            PresentationEnd::Future => end_time_millis.saturating_add(PRESENTATION_END_SHIFT_MILLIS),
        }
    }
}

impl FromStr for PresentationEnd {
    type Err = LoopcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "past" => Ok(Self::Past),
            "future" => Ok(Self::Future),
            _ => Err(LoopcastError::not_one_of("pet", Self::VALUES)),
        }
    }
}

impl TryFrom<String> for PresentationEnd {
    type Error = LoopcastError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Timing defaults of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Target segment duration, in milliseconds.
    pub segment_duration: i64,
    /// Number of segments kept in the DVR window.
    pub segment_count: i64,
    /// Extra time subtracted from the query time, in milliseconds.
    pub safety_margin: i64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            segment_duration: 10000,
            segment_count: 10,
            safety_margin: 10000,
        }
    }
}

impl ScheduleConfig {
    pub fn dvr_window_millis(&self) -> i64 {
        self.segment_duration.saturating_mul(self.segment_count)
    }
}

/// A validated-on-use playlist query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRequest {
    pub playlist_type: PlaylistType,
    #[serde(default = "default_true")]
    pub discontinuity: bool,
    /// Query time override. Defaults to the current time.
    #[serde(default)]
    pub query_time_millis: Option<i64>,
    pub dvr_window_millis: i64,
    pub segment_duration_millis: i64,
    pub safety_margin_millis: i64,
    #[serde(default)]
    pub presentation_end: Option<PresentationEnd>,
    #[serde(default)]
    pub consistent_sequence_media_info: Option<bool>,
    /// Attach synthetic key-frame durations to every sequence.
    #[serde(default)]
    pub key_frames: bool,
}

fn default_true() -> bool {
    true
}

impl PlaylistRequest {
    pub fn new(playlist_type: PlaylistType, config: &ScheduleConfig) -> Self {
        Self {
            playlist_type,
            discontinuity: true,
            query_time_millis: None,
            dvr_window_millis: config.dvr_window_millis(),
            segment_duration_millis: config.segment_duration,
            safety_margin_millis: config.safety_margin,
            presentation_end: None,
            consistent_sequence_media_info: None,
            key_frames: false,
        }
    }

    pub fn with_discontinuity(mut self, discontinuity: bool) -> Self {
        self.discontinuity = discontinuity;
        self
    }

    pub fn with_query_time(mut self, query_time_millis: i64) -> Self {
        self.query_time_millis = Some(query_time_millis);
        self
    }

    /// Parses the positional form `/type/live/disc/yes/time/1500000000/window/100`.
    ///
    /// Keys and values alternate; the first occurrence of a key wins. `time` and `window` are
    /// in seconds. Parameters missing from the path fall back to `config`, except `type`.
    pub fn from_path(path: &str, config: &ScheduleConfig) -> LoopcastResult<Self> {
        let params = path_params(path);

        let playlist_type: PlaylistType = match params.get("type") {
            Some(value) => value.parse()?,
            None => return Err(LoopcastError::not_one_of("type", PlaylistType::VALUES)),
        };
        let mut request = Self::new(playlist_type, config);

        if let Some(disc) = params.get("disc") {
            request.discontinuity = parse_flag("disc", disc, &["no", "yes"])?;
        }
        if let Some(time) = params.get("time") {
            request.query_time_millis = Some(parse_seconds("time", time)?);
        }
        if let Some(window) = params.get("window") {
            request.dvr_window_millis = parse_seconds("window", window)?;
        }
        if let Some(pet) = params.get("pet") {
            request.presentation_end = Some(pet.parse()?);
        }
        if let Some(csmi) = params.get("csmi") {
            request.consistent_sequence_media_info = Some(parse_flag("csmi", csmi, &["no", "yes"])?);
        }
        if let Some(kf) = params.get("kf") {
            request.key_frames = parse_flag("kf", kf, &["no", "yes"])?;
        }

        request.validate()?;
        Ok(request)
    }

    /// Rejects the request before any scheduling work happens.
    pub fn validate(&self) -> LoopcastResult<()> {
        if self.segment_duration_millis <= 0 {
            return Err(LoopcastError::invalid_value(
                "segmentDuration",
                "a positive number of milliseconds",
            ));
        }
        if self.dvr_window_millis < 0 {
            return Err(LoopcastError::invalid_value(
                "window",
                "a non-negative number",
            ));
        }
        if self.dvr_window_millis > MAX_WINDOW_MILLIS {
            return Err(LoopcastError::invalid_value(
                "window",
                format!("at most {MAX_WINDOW_MILLIS} milliseconds"),
            ));
        }
        if self.safety_margin_millis < 0 {
            return Err(LoopcastError::invalid_value(
                "safetyMargin",
                "a non-negative number",
            ));
        }
        if self.safety_margin_millis > MAX_WINDOW_MILLIS {
            return Err(LoopcastError::invalid_value(
                "safetyMargin",
                format!("at most {MAX_WINDOW_MILLIS} milliseconds"),
            ));
        }
        // an empty window only overlaps a clip when the query falls inside one
        if self.dvr_window_millis + self.safety_margin_millis == 0 {
            return Err(LoopcastError::invalid_value(
                "window",
                "positive when safetyMargin is 0",
            ));
        }
        if let Some(time) = self.query_time_millis {
            if !(-MAX_QUERY_TIME_MILLIS..=MAX_QUERY_TIME_MILLIS).contains(&time) {
                return Err(LoopcastError::invalid_value(
                    "time",
                    format!("within {MAX_QUERY_TIME_MILLIS} milliseconds of the epoch"),
                ));
            }
        }
        Ok(())
    }
}

fn path_params(path: &str) -> HashMap<&str, &str> {
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    let mut params = HashMap::new();
    for pair in parts.chunks(2) {
        if let [key, value] = pair {
            params.entry(*key).or_insert(*value);
        }
    }
    params
}

/// `accepted` lists the false value first.
fn parse_flag(field: &str, value: &str, accepted: &[&str; 2]) -> LoopcastResult<bool> {
    match accepted.iter().position(|a| *a == value) {
        Some(index) => Ok(index == 1),
        None => Err(LoopcastError::not_one_of(field, accepted)),
    }
}

fn parse_number<T>(field: &str, value: &str) -> LoopcastResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|_| LoopcastError::invalid_value(field, "numeric"))
}

/// Seconds from the path form, in milliseconds.
fn parse_seconds(field: &str, value: &str) -> LoopcastResult<i64> {
    parse_number::<i64>(field, value)?
        .checked_mul(1000)
        .ok_or_else(|| {
            LoopcastError::invalid_value(field, "a number of seconds that fits in milliseconds")
        })
}
