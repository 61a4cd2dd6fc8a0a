use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::{
    duration::DurationProvider,
    error::{LoopcastError, LoopcastResult},
};

/// Expanded cycles never hold more entries than this.
pub const MAX_EXPANDED_CLIPS: usize = 1 << 20;

/// One playable media source with its resolved duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    pub path: String,
    pub duration_millis: i64,
}

impl Clip {
    pub fn new(path: impl Into<String>, duration_millis: i64) -> Self {
        Self {
            path: path.into(),
            duration_millis,
        }
    }
}

/// Ordered clips forming exactly one playback cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    clips: Vec<Clip>,
}

impl Catalog {
    pub fn new(clips: Vec<Clip>) -> LoopcastResult<Self> {
        if clips.is_empty() {
            return Err(LoopcastError::InvalidCatalog("catalog is empty".into()));
        }
        if let Some(clip) = clips.iter().find(|c| c.duration_millis < 0) {
            return Err(LoopcastError::InvalidCatalog(format!(
                "negative duration {} for {}",
                clip.duration_millis, clip.path
            )));
        }
        if clips
            .iter()
            .try_fold(0i64, |total, c| total.checked_add(c.duration_millis))
            .is_none()
        {
            return Err(LoopcastError::InvalidCatalog(
                "total cycle duration overflows".into(),
            ));
        }

        Ok(Self { clips })
    }

    /// Resolves the duration of every path through `provider`, keeping the given order.
    pub async fn resolve<P, S>(paths: &[S], provider: &P) -> LoopcastResult<Self>
    where
        P: DurationProvider,
        S: AsRef<str>,
    {
        let durations = try_join_all(
            paths
                .iter()
                .map(|path| provider.resolve_duration_millis(path.as_ref())),
        )
        .await?;

        let clips = paths
            .iter()
            .zip(durations)
            .map(|(path, duration)| Clip::new(path.as_ref(), duration))
            .collect();
        Self::new(clips)
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.clips.iter().map(|c| c.path.as_str())
    }

    pub fn cycle_duration_millis(&self) -> i64 {
        self.clips.iter().map(|c| c.duration_millis).sum()
    }

    /// Repeats the catalog until one cycle is longer than `dvr_window_millis + safety_margin_millis`.
    ///
    /// The window walk can then never run out of clips close to a cycle boundary.
    pub fn expand(
        &self,
        dvr_window_millis: i64,
        safety_margin_millis: i64,
    ) -> LoopcastResult<ExpandedCycle<'_>> {
        let mut cycle_duration_millis = self.cycle_duration_millis();
        if cycle_duration_millis == 0 {
            return Err(LoopcastError::InvalidCatalog(
                "total cycle duration is zero".into(),
            ));
        }

        let mut entries: Vec<CycleEntry> = self
            .clips
            .iter()
            .enumerate()
            .map(|(catalog_index, clip)| CycleEntry { catalog_index, clip })
            .collect();
        let covered_millis = dvr_window_millis
            .checked_add(safety_margin_millis)
            .ok_or_else(|| {
                LoopcastError::invalid_value("window", "at most i64::MAX with the safety margin")
            })?;
        while cycle_duration_millis <= covered_millis {
            if entries.len() * 2 > MAX_EXPANDED_CLIPS {
                return Err(LoopcastError::invalid_value(
                    "window",
                    format!("covered by at most {MAX_EXPANDED_CLIPS} repeated clips"),
                ));
            }
            entries.extend_from_within(..);
            cycle_duration_millis = cycle_duration_millis.checked_mul(2).ok_or_else(|| {
                LoopcastError::InvalidCatalog("expanded cycle duration overflows".into())
            })?;
        }

        tracing::trace!(
            repeats = entries.len() / self.clips.len(),
            cycle_duration_millis,
            "Expanded catalog cycle"
        );
        Ok(ExpandedCycle {
            entries,
            cycle_duration_millis,
        })
    }
}

/// A catalog entry at some position of an [`ExpandedCycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleEntry<'a> {
    /// Position of the clip in the original catalog.
    pub catalog_index: usize,
    pub clip: &'a Clip,
}

/// The catalog repeated `k >= 1` times.
#[derive(Debug, Clone)]
pub struct ExpandedCycle<'a> {
    entries: Vec<CycleEntry<'a>>,
    cycle_duration_millis: i64,
}

impl<'a> ExpandedCycle<'a> {
    pub fn entries(&self) -> &[CycleEntry<'a>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cycle_duration_millis(&self) -> i64 {
        self.cycle_duration_millis
    }

    pub fn durations(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.iter().map(|e| e.clip.duration_millis)
    }
}
