//! Reproducible key-frame layouts for test fixtures.

const MULTIPLIER: u64 = 125;
const MODULUS: u64 = 2796203;
const SEED_RANGE: u64 = 9999999;
/// Replaces normalized seeds that are multiples of [`MODULUS`], which would pin the state to zero.
const FALLBACK_SEED: u64 = 1;

/// Offset of the first key frame relative to the clip start.
pub const FIRST_KEY_FRAME_OFFSET: i64 = -500;
pub const MIN_KEY_FRAME_DURATION: i64 = 1000;
pub const MAX_KEY_FRAME_DURATION: i64 = 5000;

/// Linear congruential generator, `state' = state * 125 mod 2796203`.
#[derive(Debug, Clone)]
pub struct KeyFrameRandom {
    state: u64,
}

impl KeyFrameRandom {
    pub fn new(seed: i64) -> Self {
        let mut state = seed.unsigned_abs() % SEED_RANGE + 1;
        if state % MODULUS == 0 {
            state = FALLBACK_SEED;
        }

        let mut random = Self { state };
        random.step();
        random
    }

    fn step(&mut self) -> u64 {
        self.state = (self.state * MULTIPLIER) % MODULUS;
        self.state
    }

    /// Next number in `[min, max]`.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn num(&mut self, min: i64, max: i64) -> i64 {
        assert!(min <= max, "empty key-frame range [{min}, {max}]");
        let value = self.step();
        match max.abs_diff(min).checked_add(1) {
            Some(span) => (value % span) as i64 + min,
            // the whole i64 range
            None => value as i64 + min,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFrames {
    pub first_key_frame_offset: i64,
    pub durations: Vec<i64>,
}

/// Key-frame durations covering `[FIRST_KEY_FRAME_OFFSET, total_millis)`.
pub fn synthesize(seed: i64, total_millis: i64) -> KeyFrames {
    let mut random = KeyFrameRandom::new(seed);
    let mut position = FIRST_KEY_FRAME_OFFSET;
    let mut durations = Vec::new();
    while position < total_millis {
        let duration = random.num(MIN_KEY_FRAME_DURATION, MAX_KEY_FRAME_DURATION);
        durations.push(duration);
        position += duration;
    }

    KeyFrames {
        first_key_frame_offset: FIRST_KEY_FRAME_OFFSET,
        durations,
    }
}
