//! Song repository: the persisted song collection.
//!
//! The collection is stored as one opaque JSON blob under a fixed key
//! ([`STORAGE_KEY`]). Loading never fails: missing or unparsable data is
//! replaced by the built-in [`default_catalog`]. Saving is best-effort;
//! failures are logged and dropped.

mod catalog;

pub use catalog::default_catalog;

use std::path::PathBuf;

use crate::error::{Result, ResultExt};
use crate::model::Song;

/// Key the collection is stored under.
pub const STORAGE_KEY: &str = "music_library_songs";

/// Load/save access to the persisted collection.
///
/// Implement this trait to substitute storage in tests.
pub trait SongRepository {
    /// Read the stored collection, falling back to the default catalog.
    fn load(&self) -> Vec<Song>;

    /// Replace the stored collection. Failures are logged, not returned.
    fn save(&self, songs: &[Song]);
}

/// Decode a stored blob.
pub fn decode(blob: &str) -> Result<Vec<Song>> {
    serde_json::from_str(blob).with_context("decoding stored library")
}

/// Encode a collection as a blob.
pub fn encode(songs: &[Song]) -> Result<String> {
    serde_json::to_string(songs).with_context("encoding library")
}

// ============================================================================
// File-backed store
// ============================================================================

/// Key-value store with one JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileRepository {
    dir: PathBuf,
}

impl FileRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing [`STORAGE_KEY`].
    pub fn blob_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", STORAGE_KEY))
    }

    /// Read the blob; `Ok(None)` when nothing has been stored yet.
    pub fn try_load(&self) -> Result<Option<Vec<Song>>> {
        let path = self.blob_path();
        if !path.exists() {
            return Ok(None);
        }
        let blob = std::fs::read_to_string(&path).with_context("reading stored library")?;
        decode(&blob).map(Some)
    }

    /// Write the blob atomically (write to temp, then rename).
    pub fn try_save(&self, songs: &[Song]) -> Result<()> {
        std::fs::create_dir_all(&self.dir).with_context("creating data directory")?;

        let blob = encode(songs)?;
        let path = self.blob_path();
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, blob).with_context("writing library")?;
        std::fs::rename(&temp_path, &path).with_context("replacing stored library")?;
        Ok(())
    }
}

impl SongRepository for FileRepository {
    fn load(&self) -> Vec<Song> {
        match self.try_load() {
            Ok(Some(songs)) => {
                tracing::info!(count = songs.len(), path = ?self.blob_path(), "Loaded library");
                songs
            }
            Ok(None) => {
                tracing::info!(path = ?self.blob_path(), "No stored library, using default catalog");
                default_catalog()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored library unreadable, using default catalog");
                default_catalog()
            }
        }
    }

    fn save(&self, songs: &[Song]) {
        match self.try_save(songs) {
            Ok(()) => tracing::debug!(count = songs.len(), "Saved library"),
            Err(e) => tracing::error!(error = %e, "Failed to save library"),
        }
    }
}

impl<R: SongRepository + ?Sized> SongRepository for std::sync::Arc<R> {
    fn load(&self) -> Vec<Song> {
        (**self).load()
    }

    fn save(&self, songs: &[Song]) {
        (**self).save(songs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MemoryRepository, mock_song};

    #[test]
    fn test_missing_blob_yields_default_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(dir.path());
        let songs = repo.load();
        assert_eq!(songs, default_catalog());
        assert!(songs.len() >= 10);
    }

    #[test]
    fn test_corrupt_blob_yields_default_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(dir.path());
        std::fs::write(repo.blob_path(), "{ not a song list").unwrap();

        assert!(repo.try_load().is_err());
        assert_eq!(repo.load(), default_catalog());
    }

    #[test]
    fn test_file_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(dir.path().join("nested"));
        let songs = vec![mock_song("1", "First"), mock_song("2", "Second")];

        repo.save(&songs);
        assert!(repo.blob_path().exists());
        assert!(!repo.blob_path().with_extension("json.tmp").exists());
        assert_eq!(repo.load(), songs);
    }

    #[test]
    fn test_empty_collection_is_stored_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(dir.path());
        repo.save(&[]);
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_unwritable_location_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, "x").unwrap();

        // A file where the data directory should be
        let repo = FileRepository::new(&file);
        assert!(repo.try_save(&[]).is_err());
        repo.save(&[mock_song("1", "First")]);
    }

    #[test]
    fn test_memory_repository() {
        let repo = MemoryRepository::new();
        assert_eq!(repo.load(), default_catalog());

        repo.save(&[mock_song("1", "Only")]);
        assert_eq!(repo.save_count(), 1);
        assert_eq!(repo.load().len(), 1);

        let corrupt = MemoryRepository::with_blob("[{\"id\": 3}]");
        assert_eq!(corrupt.load(), default_catalog());
    }
}
