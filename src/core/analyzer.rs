//! The capability contract implemented once per supported language.

use std::path::Path;

use super::{AnalysisResult, Result};

/// Trait implemented by all language analyzers.
///
/// One implementation exists per supported language. Implementations are
/// stateless with respect to the coordinator: the coordinator only queries
/// capability and invokes analysis, it never manages analyzer-internal state.
/// `Send + Sync` is required so a single registered analyzer can serve files
/// from multiple worker threads during a bounded-concurrency batch.
pub trait LanguageAnalyzer: Send + Sync {
    /// Whether this analyzer can handle the given file.
    ///
    /// Must be a pure, fast predicate with no side effects, and must answer
    /// consistently for the same path for the duration of a coordinator run.
    /// Typically an extension check; the file is not read here.
    fn can_analyze(&self, path: &Path) -> bool;

    /// Analyze the given file and produce its result.
    ///
    /// May block on I/O. Fails with [`Error::Io`] or [`Error::FileNotFound`]
    /// when the file cannot be read, and [`Error::Parse`] when it cannot be
    /// parsed as the claimed language. The returned result's `language` field
    /// must match the key this analyzer was registered under; the coordinator
    /// does not verify this.
    ///
    /// [`Error::Io`]: super::Error::Io
    /// [`Error::FileNotFound`]: super::Error::FileNotFound
    /// [`Error::Parse`]: super::Error::Parse
    fn analyze(&self, path: &Path) -> Result<AnalysisResult>;

    /// File extensions this analyzer handles, without the leading dot.
    ///
    /// Advisory only. Routing always goes through [`can_analyze`]; this list
    /// exists so callers can pre-filter candidate files (see
    /// [`FileSet::from_path_filtered`]) instead of submitting every path.
    ///
    /// [`can_analyze`]: Self::can_analyze
    /// [`FileSet::from_path_filtered`]: super::FileSet::from_path_filtered
    fn supported_extensions(&self) -> &[&str];
}
