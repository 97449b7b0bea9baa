//! Core types and traits for analysis coordination.

mod analyzer;
mod error;
mod file_set;
mod result;

pub use analyzer::LanguageAnalyzer;
pub use error::{Error, Result};
pub use file_set::FileSet;
pub use result::{AnalysisIssue, AnalysisMetrics, AnalysisResult, IssueKind};
