//! Main review engine.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::future;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::api::results::{BatchReport, BatchSummary, ReviewReport, ReviewSuggestions, SkippedFile};
use crate::core::ast_service::{AstContext, AstService};
use crate::core::config::MentorConfig;
use crate::core::errors::{MentorError, Result};
use crate::core::file_utils::{discover_files, FileReader};
use crate::detectors::complexity::{ComplexityEstimator, ComplexityReport};
use crate::detectors::debug::{DebugReport, StaticDebugger};
use crate::lang::registry::Language;

/// Label used for sources that did not come from a file
pub const INPUT_LABEL: &str = "<input>";

const READ_BATCH_SIZE: usize = 64;

/// Runs the static debugger and the complexity estimator over sources
#[derive(Debug)]
pub struct MentorEngine {
    config: Arc<MentorConfig>,
    ast_service: Arc<AstService>,
    debugger: StaticDebugger,
    estimator: ComplexityEstimator,
}

impl MentorEngine {
    /// Create an engine after validating `config`
    pub fn new(config: MentorConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "Initializing mentor engine for {} language(s)",
            config.analysis.languages.len()
        );

        Ok(Self {
            debugger: StaticDebugger::new(config.debug.clone()),
            estimator: ComplexityEstimator::new(config.complexity.clone()),
            ast_service: Arc::new(AstService::new()),
            config: Arc::new(config),
        })
    }

    /// Engine configuration
    pub fn config(&self) -> &MentorConfig {
        &self.config
    }

    /// Shared parse cache
    pub fn ast_service(&self) -> &AstService {
        &self.ast_service
    }

    /// Debug a source snippet.
    pub fn debug_source(&self, source: &str, language: Language) -> DebugReport {
        self.debug_at(INPUT_LABEL, source, language)
    }

    /// Estimate complexity of a source snippet.
    pub fn analyze_complexity(&self, source: &str, language: Language) -> ComplexityReport {
        self.complexity_at(INPUT_LABEL, source, language)
    }

    /// Debug and estimate one source, then distil suggestions.
    pub fn review_source(&self, path: &str, source: &str, language: Language) -> ReviewReport {
        let debug = self.debug_at(path, source, language);
        let complexity = self.complexity_at(path, source, language);
        let suggestions = ReviewSuggestions::from_reports(&debug, &complexity);
        let rendered_suggestions = suggestions.render(self.config.review.max_words);

        ReviewReport {
            file_path: path.to_string(),
            language,
            debug,
            complexity,
            suggestions,
            rendered_suggestions,
        }
    }

    /// Read and review one file, detecting its language from the extension.
    pub async fn review_file(&self, path: &Path) -> Result<ReviewReport> {
        let language = self.language_for(path)?;
        let source = FileReader::read_to_string_async(path).await?;
        Ok(self.review_source(&path.display().to_string(), &source, language))
    }

    /// Review every analyzable file under `paths`.
    pub async fn review_paths(&self, paths: &[PathBuf]) -> Result<BatchReport> {
        self.review_paths_with_progress(paths, |_| {}).await
    }

    /// Review every analyzable file under `paths`, calling `on_file` after each file.
    ///
    /// Files are read concurrently on the tokio runtime and analyzed in
    /// parallel on the rayon pool. Unreadable files are reported as skipped.
    /// Parsed trees are evicted from the cache once their file is reviewed.
    pub async fn review_paths_with_progress<F>(
        &self,
        paths: &[PathBuf],
        on_file: F,
    ) -> Result<BatchReport>
    where
        F: Fn(&Path) + Sync,
    {
        let started = Instant::now();
        let files = discover_files(paths, &self.config.analysis)?;
        info!("Reviewing {} file(s)", files.len());

        let mut sources = Vec::with_capacity(files.len());
        let mut skipped = Vec::new();
        for batch in files.chunks(READ_BATCH_SIZE) {
            let reads = batch.iter().map(|path| async move {
                let result = match self.language_for(path) {
                    Ok(language) => FileReader::read_to_string_async(path)
                        .await
                        .map(|source| (language, source)),
                    Err(err) => Err(err),
                };
                (path, result)
            });

            for (path, result) in future::join_all(reads).await {
                match result {
                    Ok((language, source)) => sources.push((path, language, source)),
                    Err(err) => {
                        warn!("Skipping {}: {err}", path.display());
                        on_file(path);
                        skipped.push(SkippedFile {
                            path: path.display().to_string(),
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        let reports: Vec<ReviewReport> = sources
            .par_iter()
            .map(|(path, language, source)| {
                let label = path.display().to_string();
                let report = self.review_source(&label, source, *language);
                self.ast_service.invalidate(&label);
                on_file(path);
                report
            })
            .collect();

        let summary = BatchSummary::from_reports(&reports, skipped.len(), started.elapsed());
        info!(
            "Reviewed {} file(s), skipped {}, {} issue(s)",
            summary.files_reviewed, summary.files_skipped, summary.total_issues
        );

        Ok(BatchReport {
            files: reports,
            skipped,
            summary,
        })
    }

    /// Languages enabled in the configuration
    pub fn supported_languages(&self) -> &[Language] {
        &self.config.analysis.languages
    }

    fn language_for(&self, path: &Path) -> Result<Language> {
        Language::from_path(path).ok_or_else(|| {
            MentorError::unsupported(format!("No language registered for {}", path.display()))
        })
    }

    fn debug_at(&self, path: &str, source: &str, language: Language) -> DebugReport {
        if !self.config.debug.enabled {
            return DebugReport::failed(source, "Debug analysis is disabled.");
        }
        self.with_context(path, source, language, |context| self.debugger.debug(context))
            .unwrap_or_else(|err| {
                warn!("Debug analysis failed for {path}: {err}");
                DebugReport::failed(source, format!("Analysis failed: {err}"))
            })
    }

    fn complexity_at(&self, path: &str, source: &str, language: Language) -> ComplexityReport {
        if !self.config.complexity.enabled {
            return ComplexityReport::failed("Complexity analysis is disabled.");
        }
        self.with_context(path, source, language, |context| self.estimator.estimate(context))
            .unwrap_or_else(|err| {
                warn!("Complexity analysis failed for {path}: {err}");
                ComplexityReport::failed(format!("Analysis failed: {err}"))
            })
    }

    fn with_context<T>(
        &self,
        path: &str,
        source: &str,
        language: Language,
        run: impl FnOnce(&AstContext<'_>) -> T,
    ) -> Result<T> {
        if !self.config.language_enabled(language) {
            return Err(MentorError::unsupported(format!(
                "{} analysis is disabled in the configuration",
                language.info().name
            )));
        }
        let tree = self.ast_service.parse(path, source, language)?;
        let context = self.ast_service.create_context(&tree, path);
        debug!("Analyzing {} as {}", path, language);
        Ok(run(&context))
    }
}
