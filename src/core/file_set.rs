//! File discovery for wrapper layers.
//!
//! The coordinator itself never walks the filesystem; callers hand it the
//! paths to analyze. `FileSet` is the pre-filter those callers use: it walks
//! a root directory respecting `.gitignore`, drops excluded globs, and can
//! keep only files whose extension appears in an allow-list, typically the
//! coordinator's aggregated
//! [`supported_extensions`](crate::coordinator::AnalysisCoordinator::supported_extensions).

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use super::{Error, Result};
use crate::config::Config;

/// A sorted, deterministic set of candidate files under a root directory.
#[derive(Debug, Clone)]
pub struct FileSet {
    /// Root directory.
    root: PathBuf,
    /// All files in the set, sorted.
    files: Vec<PathBuf>,
}

impl FileSet {
    /// Collect every non-ignored file under `path`, applying the config's
    /// exclude patterns.
    pub fn from_path(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        Self::collect(path, &config.exclude, None)
    }

    /// Collect files under `path`, keeping only those whose extension appears
    /// in `extensions` (compared without the leading dot, case-insensitive).
    pub fn from_path_filtered(
        path: impl AsRef<Path>,
        config: &Config,
        extensions: &[String],
    ) -> Result<Self> {
        Self::collect(path, &config.exclude, Some(extensions))
    }

    fn collect(
        path: impl AsRef<Path>,
        exclude_patterns: &[String],
        extensions: Option<&[String]>,
    ) -> Result<Self> {
        let root = path.as_ref().canonicalize()?;
        let exclude = build_glob_set(exclude_patterns)?;

        let walker = WalkBuilder::new(&root)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .build();

        let mut files = Vec::new();
        for entry in walker.flatten() {
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            if exclude.is_match(path) {
                continue;
            }
            if let Some(allowed) = extensions {
                if !extension_allowed(path, allowed) {
                    continue;
                }
            }
            files.push(path.to_path_buf());
        }

        // Sort for deterministic ordering
        files.sort();

        Ok(Self { root, files })
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get all files in the set.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Get the number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the file set is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over files.
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }

    /// Get relative path from root.
    pub fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

impl IntoIterator for FileSet {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| Error::config(format!("invalid exclude pattern {pattern:?}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::config(format!("invalid exclude patterns: {e}")))
}

fn extension_allowed(path: &Path, allowed: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    allowed.iter().any(|a| a.eq_ignore_ascii_case(ext))
}
