//! Resolution of the live DVR window.
//!
//! A looping channel plays its catalog over and over, starting at the reference time:
//!
//! ```text
//!  reference                cycle 1                  cycle 2
//!  |  A  |   B   | C |  A  |   B   | C |  A  |   B   | C |  ...
//!                         [   start  ..............  end )
//!                              ^ first clip overlapping the window
//! ```
//!
//! Clip and segment indices count from the reference time, so any two queries agree on the
//! index and start time of every clip they both include.

use crate::{
    catalog::{Clip, ExpandedCycle},
    error::{LoopcastError, LoopcastResult},
    segment::{floor_div, SegmentCounter},
};

/// Timing parameters of a window query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowParams {
    pub segment_duration_millis: i64,
    pub dvr_window_millis: i64,
    pub safety_margin_millis: i64,
    pub discontinuity: bool,
}

/// A catalog entry materialized at a specific cycle repetition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedClip<'a> {
    pub clip: &'a Clip,
    /// Position of the clip in the original catalog.
    pub catalog_index: usize,
    /// 0-based global clip index counted from the reference time.
    pub clip_index: i64,
    /// 0-based global index of the first segment of this clip.
    pub segment_index_start: i64,
    pub start_time_millis: i64,
}

/// How segments of the window are numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    /// Explicit 1-based indices of the first clip and segment in the window.
    Discontinuity {
        initial_clip_index: i64,
        initial_segment_index: i64,
    },
    /// Segment numbers are derived from the elapsed time since `segment_base_time`.
    Continuous { segment_base_time: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWindow<'a> {
    pub start_time_millis: i64,
    pub end_time_millis: i64,
    pub first_clip_time: i64,
    pub addressing: Addressing,
    pub clips: Vec<ResolvedClip<'a>>,
}

impl ResolvedWindow<'_> {
    pub fn durations(&self) -> Vec<i64> {
        self.clips.iter().map(|c| c.clip.duration_millis).collect()
    }
}

/// Collects the clips of `cycle` that overlap `[end - margin - dvr_window, end)`.
pub fn resolve_window<'a>(
    cycle: &ExpandedCycle<'a>,
    params: &WindowParams,
    reference_time: i64,
    end_time_millis: i64,
) -> LoopcastResult<ResolvedWindow<'a>> {
    let cycle_duration = cycle.cycle_duration_millis();
    if cycle_duration <= 0 || cycle.is_empty() {
        return Err(LoopcastError::InvalidCatalog(
            "total cycle duration is zero".into(),
        ));
    }
    if params.segment_duration_millis <= 0 {
        return Err(LoopcastError::invalid_value(
            "segmentDuration",
            "a positive number of milliseconds",
        ));
    }

    let start_time = end_time_millis - params.safety_margin_millis - params.dvr_window_millis;
    let cycle_index = floor_div(start_time - reference_time, cycle_duration);

    let cycle_clip_count = cycle.len() as i64;
    let cycle_segment_count = SegmentCounter::count(cycle.durations(), params.segment_duration_millis);

    let mut current_time = reference_time + cycle_index * cycle_duration;
    let mut counter = SegmentCounter::new(
        params.segment_duration_millis,
        cycle_index * cycle_clip_count,
        cycle_index * cycle_segment_count,
    );
    tracing::debug!(
        start_time,
        end_time = end_time_millis,
        cycle_index,
        cycle_duration,
        "Resolving live window"
    );

    let entries = cycle.entries();
    let mut position = counter.clip_index.rem_euclid(cycle_clip_count) as usize;
    let mut clips = Vec::new();
    let mut first: Option<(i64, SegmentCounter)> = None;
    while current_time < end_time_millis {
        let entry = entries[position];
        let duration = entry.clip.duration_millis;

        if current_time + duration > start_time {
            if first.is_none() {
                first = Some((current_time, counter));
            }
            clips.push(ResolvedClip {
                clip: entry.clip,
                catalog_index: entry.catalog_index,
                clip_index: counter.clip_index,
                segment_index_start: counter.segment_index,
                start_time_millis: current_time,
            });
        }

        current_time += duration;
        counter.advance(duration);
        position = (position + 1) % entries.len();
    }

    // the cursor starts at or before `start_time` and the cycle is non-empty in time,
    // so at least one clip overlaps the window
    let (first_clip_time, first_counter) = first.ok_or_else(|| {
        LoopcastError::InvalidCatalog("no clip overlaps the live window".into())
    })?;
    let addressing = if params.discontinuity {
        Addressing::Discontinuity {
            initial_clip_index: first_counter.clip_index + 1,
            initial_segment_index: first_counter.segment_index + 1,
        }
    } else {
        Addressing::Continuous {
            segment_base_time: reference_time,
        }
    };

    Ok(ResolvedWindow {
        start_time_millis: start_time,
        end_time_millis,
        first_clip_time,
        addressing,
        clips,
    })
}
