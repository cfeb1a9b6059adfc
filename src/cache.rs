//! On-disk thumbnail cache.
//!
//! Decoding and re-encoding is the expensive part of a render. This module
//! lets the renderer skip it whenever the requested variant already exists.
//!
//! # Design
//!
//! ## Layout
//!
//! The cache has no manifest. Each source directory gets its own cache
//! directory (`thumbs/` by default), and each variant is a file in it named
//! by [`naming::artifact_name`]:
//!
//! ```text
//! photos/
//! ├── beach.jpg
//! └── thumbs/
//!     ├── beach-0x0px-200x150size.jpg
//!     └── beach-40x0px-120x120size.jpg
//! ```
//!
//! Because the name encodes the geometry, "is this variant cached?" is a
//! single existence check. Artifacts are never rewritten or deleted here;
//! removing the directory is the only invalidation.
//!
//! ## Single flight
//!
//! Two concurrent requests for the same variant would both miss and both
//! encode. [`ThumbCache::get_or_create`] serializes generation per artifact
//! path: the first caller generates, later callers wait on the same key and
//! then find the file on their re-check. Requests for different artifacts
//! never block each other.

use crate::imaging::ResizePlan;
use crate::naming;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the per-directory cache folder unless configured otherwise.
pub const DEFAULT_DIR_NAME: &str = "thumbs";

/// How a thumbnail request was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// The artifact was already on disk.
    Cached,
    /// The artifact was encoded by this request.
    Generated,
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cached => write!(f, "cached"),
            Self::Generated => write!(f, "generated"),
        }
    }
}

pub struct ThumbCache {
    dir_name: String,
    /// Artifact path → generation lock, present only while someone is generating.
    in_flight: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl Default for ThumbCache {
    fn default() -> Self {
        Self::new(DEFAULT_DIR_NAME)
    }
}

impl ThumbCache {
    pub fn new(dir_name: impl Into<String>) -> Self {
        Self {
            dir_name: dir_name.into(),
            in_flight: DashMap::new(),
        }
    }

    /// Cache directory for `source`: a sibling folder in the source's directory.
    ///
    /// Pure path computation; nothing is created.
    pub fn directory_for(&self, source: &Path) -> PathBuf {
        source
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&self.dir_name)
    }

    /// Full path of the artifact for `plan` applied to `source`.
    pub fn artifact_path(&self, source: &Path, plan: &ResizePlan) -> PathBuf {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        self.directory_for(source)
            .join(naming::artifact_name(&file_name, plan))
    }

    /// Create `dir` if it does not exist yet.
    ///
    /// Succeeds if the directory already exists, including when another
    /// thread or process created it a moment ago.
    pub fn ensure_directory(&self, dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(dir)
    }

    pub fn exists(&self, artifact: &Path) -> bool {
        artifact.is_file()
    }

    /// Return [`CacheStatus::Cached`] if `artifact` exists, otherwise run
    /// `create` (which must write `artifact`) and return
    /// [`CacheStatus::Generated`].
    ///
    /// At most one `create` runs per artifact path at a time. Callers arriving
    /// while it runs wait, then re-check the disk.
    pub fn get_or_create<E>(
        &self,
        artifact: &Path,
        create: impl FnOnce() -> Result<(), E>,
    ) -> Result<CacheStatus, E> {
        if self.exists(artifact) {
            return Ok(CacheStatus::Cached);
        }

        let lock = self
            .in_flight
            .entry(artifact.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock();
            if self.exists(artifact) {
                Ok(CacheStatus::Cached)
            } else {
                create().map(|()| CacheStatus::Generated)
            }
        };

        drop(lock);
        self.in_flight
            .remove_if(artifact, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    /// Number of artifacts currently being generated.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

/// Summary of cache performance for a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn record(&mut self, status: CacheStatus) {
        match status {
            CacheStatus::Cached => self.hits += 1,
            CacheStatus::Generated => self.misses += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} generated ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} generated", self.misses)
        }
    }
}
