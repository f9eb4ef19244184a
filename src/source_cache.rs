//! Cached access to C/C++ source files
//!
//! The cache keeps at most [`CACHE_CAPACITY`] files decoded in memory and
//! evicts random entries when over budget, so linting a large tree never
//! holds the whole tree in memory. Virtual entries back the embedded sample
//! translation units and in-memory tests; they are never evicted.

use rand::Rng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// File extensions treated as C/C++ sources.
pub const SOURCE_SUFFIXES: &[&str] = &["c", "cpp", "h", "hpp"];

/// Number of real files kept decoded in the cache.
pub const CACHE_CAPACITY: usize = 16;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("not a C/C++ source file: {0}")]
    NotSourceFile(PathBuf),
    #[error("no such source file: {0}")]
    NotFound(PathBuf),
    #[error("({start}, {end}) is out of {len}")]
    OutOfRange {
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Default)]
pub struct SourceCache {
    files: HashMap<PathBuf, String>,
    virtuals: HashMap<PathBuf, String>,
    capacity: usize,
}

impl SourceCache {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            virtuals: HashMap::new(),
            capacity: CACHE_CAPACITY,
        }
    }

    #[cfg(test)]
    fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::new()
        }
    }

    /// Register an in-memory translation unit under a pseudo path.
    pub fn insert_virtual(&mut self, path: impl Into<PathBuf>, code: impl Into<String>) {
        self.virtuals.insert(path.into(), code.into());
    }

    /// True when the path exists on disk and carries a C/C++ suffix.
    pub fn is_source_file(&self, path: &Path) -> bool {
        if self.virtuals.contains_key(path) {
            return true;
        }
        if !path.is_file() {
            return false;
        }
        has_source_suffix(path)
    }

    /// Full decoded text of a source file.
    pub fn code_of_file(&mut self, path: &Path) -> Result<&str, SourceError> {
        if !self.virtuals.contains_key(path) && !self.files.contains_key(path) {
            self.load(path)?;
        }
        if let Some(code) = self.virtuals.get(path) {
            return Ok(code);
        }
        self.files
            .get(path)
            .map(String::as_str)
            .ok_or_else(|| SourceError::NotFound(path.to_path_buf()))
    }

    /// The `[offset, offset + length)` segment of a file, clamped at EOF.
    pub fn code_segment(
        &mut self,
        path: &Path,
        offset: usize,
        length: usize,
    ) -> Result<&str, SourceError> {
        let code = self.code_of_file(path)?;
        let len = code.len();
        if offset >= len && !(offset == 0 && len == 0) {
            return Err(SourceError::OutOfRange {
                start: offset,
                end: offset + length,
                len,
            });
        }
        let end = offset.saturating_add(length).min(len);
        code.get(offset..end).ok_or(SourceError::OutOfRange {
            start: offset,
            end,
            len,
        })
    }

    fn load(&mut self, path: &Path) -> Result<(), SourceError> {
        if !has_source_suffix(path) {
            return Err(SourceError::NotSourceFile(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        // UTF-8 first, lossy as the fallback decoding
        let code = match String::from_utf8(raw) {
            Ok(code) => code,
            Err(err) => {
                tracing::debug!("lossy decode for {}", path.display());
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        self.evict_random();
        self.files.insert(path.to_path_buf(), code);
        Ok(())
    }

    /// Drop random entries until the cache fits its capacity again.
    fn evict_random(&mut self) -> Vec<PathBuf> {
        let mut evicted = Vec::new();
        let mut rng = rand::thread_rng();
        while self.files.len() >= self.capacity.max(1) {
            let index = rng.gen_range(0..self.files.len());
            let Some(victim) = self.files.keys().nth(index).cloned() else {
                break;
            };
            self.files.remove(&victim);
            evicted.push(victim);
        }
        evicted
    }

    /// All C/C++ source files under `root`, in deterministic (sorted) order.
    pub fn source_files_in(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| has_source_suffix(path))
            .collect();
        files.sort();
        files
    }

    #[cfg(test)]
    fn cached_file_count(&self) -> usize {
        self.files.len()
    }
}

fn has_source_suffix(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_SUFFIXES.contains(&ext))
}
