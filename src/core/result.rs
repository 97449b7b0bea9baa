//! Per-file analysis result types.
//!
//! These are immutable value types: an analyzer constructs one
//! [`AnalysisResult`] per file, and nothing mutates it afterwards. The
//! coordinator hands results back to the caller without holding references
//! to them, so there is no caching across calls.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The outcome of analyzing one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Path of the analyzed file. Stable and unique within a run.
    pub file_path: PathBuf,
    /// Language tag, e.g. `"typescript"`. Must match the key the producing
    /// analyzer was registered under.
    pub language: String,
    /// Analyzer-reported certainty in `[0, 1]` that the file belongs to the
    /// claimed language. Informational only: routing never consults it.
    pub confidence: f64,
    /// Quantitative metrics for the file.
    pub metrics: AnalysisMetrics,
    /// Detected issues, in the analyzer's detection order.
    pub issues: Vec<AnalysisIssue>,
    /// Module or path identifiers this file references.
    pub dependencies: BTreeSet<String>,
}

impl AnalysisResult {
    /// Create a result with no issues and no dependencies.
    pub fn new(
        file_path: impl Into<PathBuf>,
        language: impl Into<String>,
        confidence: f64,
        metrics: AnalysisMetrics,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            language: language.into(),
            confidence,
            metrics,
            issues: Vec::new(),
            dependencies: BTreeSet::new(),
        }
    }

    /// Attach issues, preserving their order.
    pub fn with_issues(mut self, issues: Vec<AnalysisIssue>) -> Self {
        self.issues = issues;
        self
    }

    /// Attach the set of referenced modules.
    pub fn with_dependencies(mut self, dependencies: BTreeSet<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Number of issues at or above the given severity.
    pub fn issue_count(&self, min_kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind >= min_kind).count()
    }
}

/// Quantitative summary for one file. Scales are analyzer-defined and
/// self-consistent per language; the coordinator never averages or compares
/// metrics across languages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisMetrics {
    /// Physical lines of code.
    pub lines_of_code: u64,
    /// Complexity score, non-negative.
    pub complexity_score: f64,
    /// Maintainability index, higher is better.
    pub maintainability_index: f64,
    /// Estimated remediation effort, non-negative (unit analyzer-defined,
    /// e.g. minutes).
    pub technical_debt: f64,
}

/// Severity of a detected issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single finding at a specific position within an analyzed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisIssue {
    /// Severity of the finding.
    #[serde(rename = "type")]
    pub kind: IssueKind,
    /// Human-readable description.
    pub message: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// Identifier of the violated check, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl AnalysisIssue {
    /// Create an issue without a rule identifier.
    pub fn new(kind: IssueKind, message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column,
            rule: None,
        }
    }

    /// Name the rule that produced this issue.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }
}
