//! Cytrac - multi-language static analysis coordination core.
//!
//! Cytrac routes source files to capable language analyzers, aggregates
//! per-file results, and defines the capability contract every analyzer
//! implements. Concrete language analyzers, CLI handling, and network
//! transports live outside this crate and plug into the
//! [`coordinator::AnalysisCoordinator`].
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//!
//! use cytrac::core::{AnalysisMetrics, AnalysisResult, LanguageAnalyzer, Result};
//! use cytrac::coordinator::AnalysisCoordinator;
//!
//! struct PlainText;
//!
//! impl LanguageAnalyzer for PlainText {
//!     fn can_analyze(&self, path: &Path) -> bool {
//!         path.extension().and_then(|e| e.to_str()) == Some("txt")
//!     }
//!
//!     fn analyze(&self, path: &Path) -> Result<AnalysisResult> {
//!         Ok(AnalysisResult::new(path, "text", 1.0, AnalysisMetrics::default()))
//!     }
//!
//!     fn supported_extensions(&self) -> &[&str] {
//!         &["txt"]
//!     }
//! }
//!
//! let mut coordinator = AnalysisCoordinator::new();
//! coordinator.register_analyzer("text", Box::new(PlainText));
//!
//! let report = coordinator.analyze_files(&["notes.txt".into(), "logo.png".into()]);
//! assert_eq!(report.analyzed(), 1);
//! ```

pub mod config;
pub mod coordinator;
pub mod core;

pub use coordinator::{AnalysisCoordinator, BatchOptions, BatchReport, CancelToken, FileFailure};
pub use core::{
    AnalysisIssue, AnalysisMetrics, AnalysisResult, Error, FileSet, IssueKind, LanguageAnalyzer,
    Result,
};
