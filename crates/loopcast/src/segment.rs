/// Floor division that rounds toward negative infinity.
///
/// Cycle indices of windows starting before the reference time are negative,
/// so truncating `/` would land one cycle too late.
pub fn floor_div(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    if (numerator % denominator != 0) && ((numerator < 0) != (denominator < 0)) {
        quotient - 1
    } else {
        quotient
    }
}

/// Ceiling division that rounds toward positive infinity.
pub fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    -floor_div(-numerator, denominator)
}

/// Number of segments a clip of `duration_millis` is split into.
pub fn segments_for(duration_millis: i64, segment_duration_millis: i64) -> i64 {
    ceil_div(duration_millis, segment_duration_millis)
}

/// Running clip and segment numbering.
///
/// Both counters advance together so that the clip-based and the segment-based
/// numbering never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentCounter {
    segment_duration_millis: i64,
    pub clip_index: i64,
    pub segment_index: i64,
}

impl SegmentCounter {
    pub fn new(segment_duration_millis: i64, clip_index: i64, segment_index: i64) -> Self {
        Self {
            segment_duration_millis,
            clip_index,
            segment_index,
        }
    }

    /// Total segment count of a sequence of clip durations.
    pub fn count(durations: impl IntoIterator<Item = i64>, segment_duration_millis: i64) -> i64 {
        durations
            .into_iter()
            .map(|d| segments_for(d, segment_duration_millis))
            .sum()
    }

    /// Moves past one clip.
    pub fn advance(&mut self, duration_millis: i64) {
        self.clip_index += 1;
        self.segment_index += segments_for(duration_millis, self.segment_duration_millis);
    }
}
