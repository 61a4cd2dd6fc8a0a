use std::{
    collections::HashMap,
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use fd_lock::RwLock;

use crate::error::LoopcastResult;

/// Storage of the reference time of each catalog.
///
/// A reference time is written at most once per key. Every implementation must make
/// [`AnchorStore::set_reference_time_if_absent`] an atomic check-and-set, otherwise two
/// concurrent first queries could each store a different anchor.
pub trait AnchorStore: Send + Sync {
    fn get_reference_time(&self, catalog_key: &str) -> LoopcastResult<Option<i64>>;

    /// Stores `value` unless a reference time already exists.
    ///
    /// Returns `true` if this call established the reference time.
    fn set_reference_time_if_absent(&self, catalog_key: &str, value: i64) -> LoopcastResult<bool>;

    /// Returns the stored reference time, establishing it as `candidate` on first use.
    fn get_or_init(&self, catalog_key: &str, candidate: i64) -> LoopcastResult<i64> {
        if let Some(reference_time) = self.get_reference_time(catalog_key)? {
            return Ok(reference_time);
        }

        if self.set_reference_time_if_absent(catalog_key, candidate)? {
            tracing::info!(catalog_key, reference_time = candidate, "Reference time established");
            return Ok(candidate);
        }

        // lost the race against another first query
        Ok(self
            .get_reference_time(catalog_key)?
            .unwrap_or(candidate))
    }
}

impl<S> AnchorStore for Arc<S>
where
    S: AnchorStore,
{
    fn get_reference_time(&self, catalog_key: &str) -> LoopcastResult<Option<i64>> {
        self.as_ref().get_reference_time(catalog_key)
    }

    fn set_reference_time_if_absent(&self, catalog_key: &str, value: i64) -> LoopcastResult<bool> {
        self.as_ref().set_reference_time_if_absent(catalog_key, value)
    }
}

/// Process-wide anchors kept in memory.
#[derive(Debug, Default)]
pub struct MemoryAnchorStore {
    anchors: Mutex<HashMap<String, i64>>,
}

impl MemoryAnchorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnchorStore for MemoryAnchorStore {
    fn get_reference_time(&self, catalog_key: &str) -> LoopcastResult<Option<i64>> {
        Ok(self.anchors.lock().unwrap().get(catalog_key).copied())
    }

    fn set_reference_time_if_absent(&self, catalog_key: &str, value: i64) -> LoopcastResult<bool> {
        let mut anchors = self.anchors.lock().unwrap();
        if anchors.contains_key(catalog_key) {
            return Ok(false);
        }
        anchors.insert(catalog_key.to_string(), value);
        Ok(true)
    }
}

/// A store that always answers with the same reference time.
///
/// Useful to replay a schedule deterministically.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnchorStore(pub i64);

impl AnchorStore for FixedAnchorStore {
    fn get_reference_time(&self, _catalog_key: &str) -> LoopcastResult<Option<i64>> {
        Ok(Some(self.0))
    }

    fn set_reference_time_if_absent(&self, _catalog_key: &str, _value: i64) -> LoopcastResult<bool> {
        Ok(false)
    }
}

/// Anchors persisted as a JSON object in a single file, so they survive restarts.
///
/// Writers serialize on an advisory lock taken on a `.lock` file next to the anchors,
/// so separate processes sharing the file agree on the first reference time. The
/// anchors file itself is replaced atomically on every write.
pub struct FileAnchorStore {
    path: PathBuf,
}

impl FileAnchorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn open_lock(&self) -> LoopcastResult<RwLock<File>> {
        let dir = self.dir();
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        Ok(RwLock::new(file))
    }

    fn load(&self) -> LoopcastResult<HashMap<String, i64>> {
        match std::fs::read(&self.path) {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, anchors: &HashMap<String, i64>) -> LoopcastResult<()> {
        let mut temp = tempfile::NamedTempFile::new_in(self.dir())?;
        serde_json::to_writer(&mut temp, anchors)?;
        temp.flush()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl AnchorStore for FileAnchorStore {
    fn get_reference_time(&self, catalog_key: &str) -> LoopcastResult<Option<i64>> {
        Ok(self.load()?.get(catalog_key).copied())
    }

    fn set_reference_time_if_absent(&self, catalog_key: &str, value: i64) -> LoopcastResult<bool> {
        let mut lock = self.open_lock()?;
        let _guard = lock.write()?;

        let mut anchors = self.load()?;
        if anchors.contains_key(catalog_key) {
            log::debug!("Reference time of {catalog_key} already stored in {}", self.path.display());
            return Ok(false);
        }

        anchors.insert(catalog_key.to_string(), value);
        self.store(&anchors)?;
        Ok(true)
    }
}
