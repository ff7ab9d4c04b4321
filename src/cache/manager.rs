//! Cache manager for persisting response bodies to disk
//!
//! Provides a `CacheManager` that stores raw bodies verbatim in JSON files,
//! one per key, overwriting the previous copy on every write.

use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Manages reading and writing cached bodies to disk
///
/// The cache manager stores files in an XDG-compliant cache directory
/// (`~/.cache/mcage/` on Linux). Freshness is not tracked here; the caller
/// decides when a stored body is too old to trust.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "mcage")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path to a cache file for the given key
    pub fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Writes a body to the cache, replacing any previous copy
    ///
    /// The body is written to a sibling temporary file first and renamed into
    /// place, so a reader never sees a half-written file.
    pub fn write(&self, key: &str, body: &str) -> io::Result<()> {
        self.ensure_dir()?;

        let path = self.cache_path(key);
        let tmp = self.cache_dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &path)
    }

    /// Reads a body from the cache
    ///
    /// Fails with `io::ErrorKind::NotFound` if nothing was stored under `key`.
    pub fn read(&self, key: &str) -> io::Result<String> {
        fs::read_to_string(self.cache_path(key))
    }
}
