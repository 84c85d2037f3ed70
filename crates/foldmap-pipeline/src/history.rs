//! Capped history of generated mindmaps.
//!
//! A small key-value history keyed by video id: newest first, deduplicated
//! by video (a regenerated video keeps its entry id but refreshes its
//! timestamp and moves to the front), capped at 50 retained entries.
//! Storage goes through [`HistoryBackend`] — in-memory for tests and
//! ephemeral use, JSON file with atomic write-then-rename for real
//! persistence.
//!
//! Failure behavior mirrors the storage rules used elsewhere in the
//! stack: a missing or corrupt file loads as empty history, and a full
//! backend triggers one halve-and-retry before the error surfaces.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Maximum retained entries.
pub const MAX_ENTRIES: usize = 50;
/// Fallback cap when the backend rejects a full write.
const REDUCED_ENTRIES: usize = 25;

const FORMAT_VERSION: u32 = 1;

/// One remembered generation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub url: String,
    pub video_id: String,
    pub title: String,
    pub markdown: String,
    /// Unix timestamp in milliseconds.
    pub created_at: u64,
}

/// History storage failure.
#[derive(Debug)]
pub enum HistoryError {
    Io(std::io::Error),
    Serialization(String),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(_) => None,
        }
    }
}

impl From<std::io::Error> for HistoryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Pluggable history storage.
///
/// `save` replaces all stored entries (not a merge) and should be atomic;
/// `load` is resilient: no stored history is an empty list, not an error.
pub trait HistoryBackend: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError>;

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError>;

    fn clear(&self) -> Result<(), HistoryError>;
}

/// In-memory backend for testing and ephemeral history.
#[derive(Default)]
pub struct MemoryBackend {
    data: RwLock<Vec<HistoryEntry>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryBackend for MemoryBackend {
    fn name(&self) -> &str {
        "MemoryBackend"
    }

    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let guard = self
            .data
            .read()
            .map_err(|_| HistoryError::Serialization("lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| HistoryError::Serialization("lock poisoned".into()))?;
        *guard = entries.to_vec();
        Ok(())
    }

    fn clear(&self) -> Result<(), HistoryError> {
        self.save(&[])
    }
}

/// JSON file format for stored history.
#[derive(Serialize, Deserialize)]
struct HistoryFile {
    format_version: u32,
    entries: Vec<HistoryEntry>,
}

/// File-backed history with atomic write-then-rename.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryBackend for FileBackend {
    fn name(&self) -> &str {
        "FileBackend"
    }

    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str::<HistoryFile>(&raw) {
            Ok(file) if file.format_version == FORMAT_VERSION => Ok(file.entries),
            Ok(file) => {
                warn!(version = file.format_version, "unknown history format, starting empty");
                Ok(Vec::new())
            }
            Err(err) => {
                warn!(%err, path = %self.path.display(), "corrupt history file, starting empty");
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let file = HistoryFile {
            format_version: FORMAT_VERSION,
            entries: entries.to_vec(),
        };
        let json = serde_json::to_string(&file)
            .map_err(|err| HistoryError::Serialization(err.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), HistoryError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Capped, deduplicating history store over a backend.
pub struct HistoryStore<B: HistoryBackend> {
    backend: B,
}

impl HistoryStore<MemoryBackend> {
    /// Ephemeral store for tests and in-process use.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

impl HistoryStore<FileBackend> {
    /// File-backed store at `path`.
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self::new(FileBackend::new(path))
    }
}

impl<B: HistoryBackend> HistoryStore<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// All entries, newest first.
    pub fn entries(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut entries = self.backend.load()?;
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    /// Record a generation result.
    ///
    /// Deduplicates by video id: an existing entry keeps its id, gets the
    /// new content and a refreshed timestamp, and moves to the front.
    /// At most [`MAX_ENTRIES`] entries survive; if the backend rejects the
    /// write, the store halves to 25 entries and retries once.
    pub fn save(
        &self,
        url: impl Into<String>,
        video_id: impl Into<String>,
        title: impl Into<String>,
        markdown: impl Into<String>,
    ) -> Result<HistoryEntry, HistoryError> {
        let video_id = video_id.into();
        let mut entries = self.entries()?;

        let existing_id = entries
            .iter()
            .position(|e| e.video_id == video_id)
            .map(|pos| entries.remove(pos).id);

        let entry = HistoryEntry {
            id: existing_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            url: url.into(),
            video_id,
            title: title.into(),
            markdown: markdown.into(),
            created_at: now_millis(),
        };
        entries.insert(0, entry.clone());
        entries.truncate(MAX_ENTRIES);

        if let Err(err) = self.backend.save(&entries) {
            warn!(backend = self.backend.name(), %err, "history write failed, halving");
            entries.truncate(REDUCED_ENTRIES);
            self.backend.save(&entries)?;
        }
        Ok(entry)
    }

    /// Remove one entry by its id.
    pub fn delete(&self, id: &str) -> Result<(), HistoryError> {
        let mut entries = self.entries()?;
        entries.retain(|e| e.id != id);
        self.backend.save(&entries)
    }

    /// Forget everything.
    pub fn clear(&self) -> Result<(), HistoryError> {
        self.backend.clear()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
