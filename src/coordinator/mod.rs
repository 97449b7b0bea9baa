//! Analysis coordination: analyzer registry, routing, and batch aggregation.
//!
//! The [`AnalysisCoordinator`] owns a registry mapping language keys to
//! analyzers, routes each submitted file to the first analyzer that claims
//! it, and aggregates per-file outcomes into an ordered [`BatchReport`].
//! It performs no parsing itself and holds no results across calls.

mod batch;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::core::{AnalysisResult, Error, LanguageAnalyzer, Result};

pub use batch::{BatchOptions, BatchReport, CancelToken, FileFailure};

/// Routes files to capable analyzers and aggregates their results.
///
/// Registration happens-before analysis: the `&mut self` receiver on
/// [`register_analyzer`] means the registry cannot change while a batch
/// borrows the coordinator. Construct one per run (or share behind `&`);
/// there is no process-wide instance.
///
/// Routing iterates registered analyzers in lexicographic key order, which is
/// stable for the lifetime of the registry. The first analyzer whose
/// [`can_analyze`] returns true wins; result confidence is never consulted
/// for routing.
///
/// [`register_analyzer`]: Self::register_analyzer
/// [`can_analyze`]: LanguageAnalyzer::can_analyze
#[derive(Default)]
pub struct AnalysisCoordinator {
    analyzers: BTreeMap<String, Box<dyn LanguageAnalyzer>>,
}

impl AnalysisCoordinator {
    /// Create a coordinator with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an analyzer under a language key.
    ///
    /// `language` must be non-empty. Registering a second analyzer under an
    /// existing key silently replaces the first; overwrite is the defined
    /// behavior, not an error. The analyzer is not validated here; a
    /// misbehaving implementation surfaces failures only when invoked.
    pub fn register_analyzer(
        &mut self,
        language: impl Into<String>,
        analyzer: Box<dyn LanguageAnalyzer>,
    ) {
        let language = language.into();
        if self.analyzers.insert(language.clone(), analyzer).is_some() {
            tracing::debug!(language = %language, "replaced previously registered analyzer");
        } else {
            tracing::debug!(language = %language, "registered analyzer");
        }
    }

    /// Language keys currently registered, in routing order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.analyzers.keys().map(String::as_str)
    }

    /// Number of registered analyzers.
    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    /// Whether no analyzers are registered.
    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    /// Aggregated advisory extension list across all registered analyzers,
    /// deduplicated, in routing order.
    ///
    /// Useful as the allow-list for
    /// [`FileSet::from_path_filtered`](crate::core::FileSet::from_path_filtered)
    /// to avoid submitting files nothing will claim. Routing itself never
    /// uses this list.
    pub fn supported_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = Vec::new();
        for analyzer in self.analyzers.values() {
            for ext in analyzer.supported_extensions() {
                if !extensions.iter().any(|e| e == ext) {
                    extensions.push((*ext).to_string());
                }
            }
        }
        extensions
    }

    /// Analyze a single file.
    ///
    /// Returns `Ok(None)` when no registered analyzer claims the file; an
    /// unrecognized extension is a normal outcome, not an error. When an
    /// analyzer does claim the file, its result or failure is returned
    /// unmodified; the coordinator performs no retry and no suppression.
    ///
    /// The file's existence is not checked here; the selected analyzer fails
    /// with its own error kind if the file is unreadable.
    pub fn analyze_file(&self, path: impl AsRef<Path>) -> Result<Option<AnalysisResult>> {
        let path = path.as_ref();
        for (language, analyzer) in &self.analyzers {
            if !analyzer.can_analyze(path) {
                tracing::trace!(language = %language, path = %path.display(), "analyzer declined");
                continue;
            }
            tracing::debug!(language = %language, path = %path.display(), "routing file");
            return analyzer.analyze(path).map(Some);
        }
        Ok(None)
    }

    /// Analyze a batch of files sequentially.
    ///
    /// Paths are processed in order, one fully-completed analysis at a time.
    /// Duplicates are processed independently. Unroutable files are omitted
    /// from the report; analyzer failures are captured per file rather than
    /// aborting the batch, so the report always covers the whole input.
    /// Successes and failures each preserve the input's relative order.
    pub fn analyze_files(&self, paths: &[PathBuf]) -> BatchReport {
        let start = Instant::now();
        let mut report = BatchReport::default();

        for path in paths {
            match self.analyze_file(path) {
                Ok(Some(result)) => report.results.push(result),
                Ok(None) => {}
                Err(error) => report.failures.push(FileFailure {
                    path: path.clone(),
                    error,
                }),
            }
        }

        tracing::info!(
            files = paths.len(),
            analyzed = report.analyzed(),
            failed = report.failed(),
            elapsed = ?start.elapsed(),
            "batch analysis completed"
        );
        report
    }

    /// Analyze a batch of files on a bounded worker pool.
    ///
    /// Semantics match [`analyze_files`] (per-file failure isolation,
    /// unroutable files omitted, results reassembled in original input order
    /// regardless of completion order), with up to
    /// [`BatchOptions::workers`] files in flight at once.
    ///
    /// Cancellation via [`BatchOptions::cancel`] is cooperative: once the
    /// token is cancelled no new per-file analysis starts, in-flight ones run
    /// to completion, and the report comes back with `cancelled` set and the
    /// outcomes gathered so far. Callers who need cancellation with serial
    /// execution can pass `workers = 1`.
    ///
    /// Errors only if the worker pool itself cannot be created.
    ///
    /// [`analyze_files`]: Self::analyze_files
    pub fn analyze_files_bounded(
        &self,
        paths: &[PathBuf],
        options: &BatchOptions,
    ) -> Result<BatchReport> {
        let start = Instant::now();
        let workers = options.effective_workers();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| Error::analysis(format!("failed to build worker pool: {e}")))?;

        let cancel = options.cancel.clone();
        let outcomes: Vec<FileOutcome> = pool.install(|| {
            paths
                .par_iter()
                .map(|path| {
                    if cancel.is_cancelled() {
                        return FileOutcome::NotStarted;
                    }
                    match self.analyze_file(path) {
                        Ok(Some(result)) => FileOutcome::Analyzed(result),
                        Ok(None) => FileOutcome::Unroutable,
                        Err(error) => FileOutcome::Failed(path.clone(), error),
                    }
                })
                .collect()
        });

        let mut report = BatchReport {
            cancelled: cancel.is_cancelled(),
            ..BatchReport::default()
        };
        for outcome in outcomes {
            match outcome {
                FileOutcome::Analyzed(result) => report.results.push(result),
                FileOutcome::Unroutable | FileOutcome::NotStarted => {}
                FileOutcome::Failed(path, error) => {
                    report.failures.push(FileFailure { path, error })
                }
            }
        }

        tracing::info!(
            files = paths.len(),
            analyzed = report.analyzed(),
            failed = report.failed(),
            workers,
            cancelled = report.cancelled,
            elapsed = ?start.elapsed(),
            "bounded batch analysis completed"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for AnalysisCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisCoordinator")
            .field("languages", &self.analyzers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Tagged per-file outcome used to reassemble parallel results in input order.
enum FileOutcome {
    Analyzed(AnalysisResult),
    Unroutable,
    Failed(PathBuf, Error),
    NotStarted,
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::core::AnalysisMetrics;

    /// Claims paths by extension and fabricates a fixed result.
    struct StubAnalyzer {
        language: &'static str,
        extensions: Vec<&'static str>,
        lines_of_code: u64,
        calls: Arc<AtomicUsize>,
    }

    impl StubAnalyzer {
        fn new(language: &'static str, extension: &'static str, lines_of_code: u64) -> Self {
            Self {
                language,
                extensions: vec![extension],
                lines_of_code,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn call_counter(&self) -> Arc<AtomicUsize> {
            self.calls.clone()
        }
    }

    impl LanguageAnalyzer for StubAnalyzer {
        fn can_analyze(&self, path: &Path) -> bool {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| self.extensions.contains(&ext))
        }

        fn analyze(&self, path: &Path) -> Result<AnalysisResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AnalysisResult::new(
                path,
                self.language,
                1.0,
                AnalysisMetrics {
                    lines_of_code: self.lines_of_code,
                    complexity_score: 1.0,
                    ..AnalysisMetrics::default()
                },
            ))
        }

        fn supported_extensions(&self) -> &[&str] {
            &self.extensions
        }
    }

    /// Claims `.bad` files and always fails to analyze them.
    struct FailingAnalyzer;

    impl LanguageAnalyzer for FailingAnalyzer {
        fn can_analyze(&self, path: &Path) -> bool {
            path.extension().and_then(|e| e.to_str()) == Some("bad")
        }

        fn analyze(&self, path: &Path) -> Result<AnalysisResult> {
            Err(Error::parse(path, "always fails"))
        }

        fn supported_extensions(&self) -> &[&str] {
            &["bad"]
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_unroutable_file_is_absence() {
        let mut coordinator = AnalysisCoordinator::new();
        coordinator.register_analyzer("demo", Box::new(StubAnalyzer::new("demo", "demo", 10)));

        let result = coordinator.analyze_file("notes.txt").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_empty_registry_routes_nothing() {
        let coordinator = AnalysisCoordinator::new();
        assert!(coordinator.is_empty());
        assert!(coordinator.analyze_file("a.demo").unwrap().is_none());
    }

    #[test]
    fn test_demo_batch_scenario() {
        let mut coordinator = AnalysisCoordinator::new();
        coordinator.register_analyzer("demo", Box::new(StubAnalyzer::new("demo", "demo", 10)));

        let report = coordinator.analyze_files(&paths(&["a.demo", "b.txt", "c.demo"]));
        assert!(report.is_complete());
        assert_eq!(report.analyzed(), 2);
        assert_eq!(report.results[0].file_path, PathBuf::from("a.demo"));
        assert_eq!(report.results[1].file_path, PathBuf::from("c.demo"));
        assert!(report.results.iter().all(|r| r.metrics.lines_of_code == 10));
    }

    #[test]
    fn test_empty_batch() {
        let mut coordinator = AnalysisCoordinator::new();
        coordinator.register_analyzer("demo", Box::new(StubAnalyzer::new("demo", "demo", 10)));

        let report = coordinator.analyze_files(&[]);
        assert!(report.results.is_empty());
        assert!(report.failures.is_empty());
        assert!(!report.cancelled);
    }

    #[test]
    fn test_first_match_wins_is_exclusive() {
        // Both claim ".demo"; "alpha" sorts before "beta" in routing order.
        let alpha = StubAnalyzer::new("alpha", "demo", 1);
        let beta = StubAnalyzer::new("beta", "demo", 2);
        let alpha_calls = alpha.call_counter();
        let beta_calls = beta.call_counter();

        let mut coordinator = AnalysisCoordinator::new();
        coordinator.register_analyzer("beta", Box::new(beta));
        coordinator.register_analyzer("alpha", Box::new(alpha));

        let result = coordinator.analyze_file("x.demo").unwrap().unwrap();
        assert_eq!(result.language, "alpha");
        assert_eq!(alpha_calls.load(Ordering::SeqCst), 1);
        assert_eq!(beta_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut coordinator = AnalysisCoordinator::new();
        coordinator.register_analyzer("demo", Box::new(StubAnalyzer::new("demo", "old", 1)));
        coordinator.register_analyzer("demo", Box::new(StubAnalyzer::new("demo", "new", 2)));

        assert_eq!(coordinator.len(), 1);
        // Routing for the replaced analyzer's extension now fails...
        assert!(coordinator.analyze_file("a.old").unwrap().is_none());
        // ...and depends solely on the new analyzer's can_analyze.
        let result = coordinator.analyze_file("a.new").unwrap().unwrap();
        assert_eq!(result.metrics.lines_of_code, 2);
    }

    #[test]
    fn test_single_file_failure_propagates() {
        let mut coordinator = AnalysisCoordinator::new();
        coordinator.register_analyzer("fail", Box::new(FailingAnalyzer));

        let err = coordinator.analyze_file("x.bad").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_batch_failure_is_isolated() {
        let mut coordinator = AnalysisCoordinator::new();
        coordinator.register_analyzer("demo", Box::new(StubAnalyzer::new("demo", "demo", 10)));
        coordinator.register_analyzer("fail", Box::new(FailingAnalyzer));

        let report = coordinator.analyze_files(&paths(&["x.bad", "a.demo"]));
        assert_eq!(report.analyzed(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].path, PathBuf::from("x.bad"));
        assert!(matches!(report.failures[0].error, Error::Parse { .. }));
        // No synthetic zero-value result for the failed file.
        assert!(report
            .results
            .iter()
            .all(|r| r.file_path != PathBuf::from("x.bad")));
    }

    #[test]
    fn test_duplicates_processed_independently() {
        let stub = StubAnalyzer::new("demo", "demo", 10);
        let calls = stub.call_counter();
        let mut coordinator = AnalysisCoordinator::new();
        coordinator.register_analyzer("demo", Box::new(stub));

        let report = coordinator.analyze_files(&paths(&["a.demo", "a.demo"]));
        assert_eq!(report.analyzed(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_supported_extensions_aggregated() {
        let mut coordinator = AnalysisCoordinator::new();
        coordinator.register_analyzer(
            "javascript",
            Box::new(StubAnalyzer {
                language: "javascript",
                extensions: vec!["js", "mjs"],
                lines_of_code: 1,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        );
        coordinator.register_analyzer(
            "typescript",
            Box::new(StubAnalyzer {
                language: "typescript",
                extensions: vec!["ts", "mjs"],
                lines_of_code: 1,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        );

        // Routing order is lexicographic by key; duplicates collapse.
        assert_eq!(coordinator.supported_extensions(), ["js", "mjs", "ts"]);
    }

    #[test]
    fn test_bounded_matches_sequential() {
        let mut coordinator = AnalysisCoordinator::new();
        coordinator.register_analyzer("demo", Box::new(StubAnalyzer::new("demo", "demo", 10)));
        coordinator.register_analyzer("fail", Box::new(FailingAnalyzer));

        let batch = paths(&["a.demo", "x.bad", "b.txt", "c.demo", "d.demo", "y.bad"]);
        let sequential = coordinator.analyze_files(&batch);
        let bounded = coordinator
            .analyze_files_bounded(&batch, &BatchOptions::new().with_workers(3))
            .unwrap();

        assert_eq!(bounded.results, sequential.results);
        let bounded_failed: Vec<_> = bounded.failures.iter().map(|f| f.path.clone()).collect();
        let sequential_failed: Vec<_> =
            sequential.failures.iter().map(|f| f.path.clone()).collect();
        assert_eq!(bounded_failed, sequential_failed);
        assert!(!bounded.cancelled);
    }

    #[test]
    fn test_bounded_cancelled_before_start() {
        let mut coordinator = AnalysisCoordinator::new();
        coordinator.register_analyzer("demo", Box::new(StubAnalyzer::new("demo", "demo", 10)));

        let cancel = CancelToken::new();
        cancel.cancel();
        let options = BatchOptions::new().with_workers(2).with_cancel(cancel);
        let report = coordinator
            .analyze_files_bounded(&paths(&["a.demo", "b.demo"]), &options)
            .unwrap();

        assert!(report.cancelled);
        assert!(report.results.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_bounded_cancellation_mid_batch() {
        /// Cancels the shared token from inside the first analysis.
        struct CancellingAnalyzer {
            cancel: CancelToken,
        }

        impl LanguageAnalyzer for CancellingAnalyzer {
            fn can_analyze(&self, path: &Path) -> bool {
                path.extension().and_then(|e| e.to_str()) == Some("demo")
            }

            fn analyze(&self, path: &Path) -> Result<AnalysisResult> {
                self.cancel.cancel();
                Ok(AnalysisResult::new(
                    path,
                    "demo",
                    1.0,
                    AnalysisMetrics::default(),
                ))
            }

            fn supported_extensions(&self) -> &[&str] {
                &["demo"]
            }
        }

        let cancel = CancelToken::new();
        let mut coordinator = AnalysisCoordinator::new();
        coordinator.register_analyzer(
            "demo",
            Box::new(CancellingAnalyzer {
                cancel: cancel.clone(),
            }),
        );

        // One worker: files are attempted one at a time, the first analysis
        // cancels, and the remaining two are never started.
        let options = BatchOptions::new().with_workers(1).with_cancel(cancel);
        let report = coordinator
            .analyze_files_bounded(&paths(&["a.demo", "b.demo", "c.demo"]), &options)
            .unwrap();

        assert!(report.cancelled);
        assert_eq!(report.analyzed(), 1);
    }
}
