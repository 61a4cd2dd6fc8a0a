use chrono::{DateTime, TimeDelta, Utc};

#[derive(Debug, Clone, Copy)]
pub struct Clock {
    /// How much time the local clock is behind the playout clock
    offset: TimeDelta,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            offset: TimeDelta::zero(),
        }
    }

    pub fn with_offset(offset: TimeDelta) -> Self {
        tracing::info!(offset_milliseconds = %offset.num_milliseconds(), "Clock offset set");
        Self { offset }
    }

    pub fn now(&self) -> DateTime<Utc> {
        Utc::now() + self.offset
    }

    pub fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}
