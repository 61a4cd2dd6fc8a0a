use std::{
    collections::HashMap,
    future::Future,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use serde::Deserialize;
use tokio::process::Command;

use crate::error::{LoopcastError, LoopcastResult};

/// Resolves the playback duration of a media file.
pub trait DurationProvider: Send + Sync {
    /// Duration of the media at `path`, in milliseconds.
    fn resolve_duration_millis(
        &self,
        path: &str,
    ) -> impl Future<Output = LoopcastResult<i64>> + Send;
}

impl<P> DurationProvider for Arc<P>
where
    P: DurationProvider,
{
    fn resolve_duration_millis(
        &self,
        path: &str,
    ) -> impl Future<Output = LoopcastResult<i64>> + Send {
        self.as_ref().resolve_duration_millis(path)
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Probes durations with the `ffprobe` executable.
pub struct FfprobeDurationProvider {
    ffprobe: PathBuf,
}

impl FfprobeDurationProvider {
    /// Locates `ffprobe` in `PATH`.
    pub fn new() -> LoopcastResult<Self> {
        Ok(Self {
            ffprobe: which::which("ffprobe")?,
        })
    }

    pub fn with_executable(ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
        }
    }
}

impl DurationProvider for FfprobeDurationProvider {
    async fn resolve_duration_millis(&self, path: &str) -> LoopcastResult<i64> {
        tracing::debug!(path, ffprobe = %self.ffprobe.display(), "Probing duration");
        let output = Command::new(&self.ffprobe)
            .arg("-i")
            .arg(path)
            .args(["-show_format", "-print_format", "json", "-v", "quiet"])
            .output()
            .await
            .map_err(|e| LoopcastError::probe_failure(path, e))?;

        if !output.status.success() {
            return Err(LoopcastError::probe_failure(
                path,
                format!("ffprobe exited with {}", output.status),
            ));
        }

        parse_ffprobe_duration(path, &output.stdout)
    }
}

/// Extracts `format.duration` (seconds, as a decimal string) and truncates it to milliseconds.
fn parse_ffprobe_duration(path: &str, stdout: &[u8]) -> LoopcastResult<i64> {
    let output: FfprobeOutput =
        serde_json::from_slice(stdout).map_err(|e| LoopcastError::probe_failure(path, e))?;
    let duration = output
        .format
        .duration
        .ok_or_else(|| LoopcastError::probe_failure(path, "missing format.duration"))?;
    let seconds: f64 = duration
        .trim()
        .parse()
        .map_err(|e| LoopcastError::probe_failure(path, e))?;
    if !seconds.is_finite() || seconds < 0. {
        return Err(LoopcastError::probe_failure(
            path,
            format!("invalid duration {duration}"),
        ));
    }

    Ok((seconds * 1000.) as i64)
}

/// Durations known up front, e.g. from a configuration file.
#[derive(Debug, Default)]
pub struct StaticDurationProvider {
    durations: HashMap<String, i64>,
}

impl StaticDurationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, duration_millis: i64) -> &mut Self {
        self.durations.insert(path.into(), duration_millis);
        self
    }
}

impl FromIterator<(String, i64)> for StaticDurationProvider {
    fn from_iter<T: IntoIterator<Item = (String, i64)>>(iter: T) -> Self {
        Self {
            durations: iter.into_iter().collect(),
        }
    }
}

impl DurationProvider for StaticDurationProvider {
    async fn resolve_duration_millis(&self, path: &str) -> LoopcastResult<i64> {
        self.durations
            .get(path)
            .copied()
            .ok_or_else(|| LoopcastError::probe_failure(path, "no known duration"))
    }
}

/// Memoizes the durations resolved by another provider for the lifetime of the process.
///
/// Source files are immutable, so a resolved duration never expires. Failures are not cached.
pub struct CachedDurationProvider<P> {
    inner: P,
    cache: Mutex<HashMap<String, i64>>,
}

impl<P> CachedDurationProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Seeds the cache with an already known duration.
    pub fn prime(&self, path: impl Into<String>, duration_millis: i64) {
        self.cache
            .lock()
            .unwrap()
            .insert(path.into(), duration_millis);
    }

    fn cached(&self, path: &str) -> Option<i64> {
        self.cache.lock().unwrap().get(path).copied()
    }
}

impl<P> DurationProvider for CachedDurationProvider<P>
where
    P: DurationProvider,
{
    async fn resolve_duration_millis(&self, path: &str) -> LoopcastResult<i64> {
        if let Some(duration) = self.cached(path) {
            return Ok(duration);
        }

        let duration = self.inner.resolve_duration_millis(path).await?;
        let mut cache = self.cache.lock().unwrap();
        if let Some(existing) = cache.get(path) {
            // another query probed the same path concurrently
            return Ok(*existing);
        }
        log::debug!("Caching duration {duration}ms for {path}");
        cache.insert(path.to_string(), duration);
        Ok(duration)
    }
}
