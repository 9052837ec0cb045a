use chrono::Utc;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::cache::ResultCache;
use crate::config::AnalysisConfig;
use crate::core::{AiInsights, AnalysisResult, AnalysisSummary, CodeIssue, FileAnalysisResult};
use crate::engine::Engine;
use crate::errors::AnalyzeError;
use crate::insights::generate_insights;
use crate::insights::recommendations::recommend;
use crate::metrics::aggregate::aggregate_metrics;

/// Push-based lifecycle hooks for external progress reporting. For any
/// file, `file_started` is always delivered before `file_completed` or
/// `file_failed`. Observers run on worker threads and must be cheap.
pub trait AnalysisObserver: Send + Sync {
    fn file_started(&self, _path: &Path) {}
    fn file_completed(&self, _path: &Path, _result: &FileAnalysisResult) {}
    fn file_failed(&self, _path: &Path, _error: &anyhow::Error) {}
    fn analysis_completed(&self, _result: &AnalysisResult) {}
    fn analysis_failed(&self, _error: &AnalyzeError) {}
}

/// Whole-run coordinator: resolves globs, schedules per-file analysis on
/// a bounded pool, aggregates, generates insights and caches the result.
pub struct Orchestrator {
    config: Arc<AnalysisConfig>,
    engine: Engine,
    cache: ResultCache,
    observers: Vec<Arc<dyn AnalysisObserver>>,
}

impl Orchestrator {
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalyzeError> {
        config.validate()?;
        let config = Arc::new(config);
        Ok(Self {
            engine: Engine::new(Arc::clone(&config)),
            config,
            cache: ResultCache::new(),
            observers: Vec::new(),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn AnalysisObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Analyze every file matched by the given glob patterns. Fails with
    /// `NoFilesFound` when nothing matches; any per-file failure aborts
    /// the whole run with no partial result.
    pub fn analyze(&self, patterns: &[String]) -> Result<AnalysisResult, AnalyzeError> {
        let outcome = self.run(patterns);
        match &outcome {
            Ok(result) => {
                for observer in &self.observers {
                    observer.analysis_completed(result);
                }
            }
            Err(error) => {
                for observer in &self.observers {
                    observer.analysis_failed(error);
                }
            }
        }
        outcome
    }

    fn run(&self, patterns: &[String]) -> Result<AnalysisResult, AnalyzeError> {
        let started = Instant::now();
        let files = self.resolve_files(patterns)?;
        log::info!("analyzing {} files", files.len());

        let cache_key = ResultCache::key_for(&files);
        if self.config.model.cache_results {
            if let Some(cached) = self.cache.get(&cache_key) {
                log::debug!("cache hit for {} files", files.len());
                return Ok(cached);
            }
        }

        let file_results = self.analyze_files(&files)?;

        let issues: Vec<CodeIssue> = file_results
            .iter()
            .flat_map(|f| f.issues.iter().cloned())
            .collect();
        let metrics = aggregate_metrics(&file_results, &issues);
        let recommendations = recommend(&metrics, &issues, &self.config);
        let insights = if self.config.enable_ai {
            generate_insights(&file_results, &metrics, &issues, &self.config)
        } else {
            AiInsights::default()
        };

        let result = AnalysisResult {
            timestamp: Utc::now(),
            duration_ms: started.elapsed().as_millis() as u64,
            summary: AnalysisSummary::from_issues(file_results.len(), &issues),
            files: file_results,
            metrics,
            issues,
            recommendations,
            insights,
        };

        if self.config.model.cache_results {
            self.cache.insert(cache_key, result.clone());
        }
        Ok(result)
    }

    /// Union the pattern matches, apply excludes first, then intersect
    /// with configured includes, and normalize to absolute paths.
    fn resolve_files(&self, patterns: &[String]) -> Result<Vec<PathBuf>, AnalyzeError> {
        let excludes = compile_patterns(&self.config.exclude)?;
        let includes = compile_patterns(&self.config.include)?;

        let mut resolved = BTreeSet::new();
        for pattern in patterns {
            let matches = glob::glob(pattern).map_err(|e| AnalyzeError::Pattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            for entry in matches {
                let path = match entry {
                    Ok(path) => path,
                    Err(error) => {
                        log::warn!("skipping unreadable match: {error}");
                        continue;
                    }
                };
                if !path.is_file() {
                    continue;
                }
                if excludes.iter().any(|p| p.matches_path(&path)) {
                    continue;
                }
                if !includes.is_empty() && !includes.iter().any(|p| p.matches_path(&path)) {
                    continue;
                }
                let absolute = path.canonicalize().unwrap_or(path);
                resolved.insert(absolute);
            }
        }

        if resolved.is_empty() {
            return Err(AnalyzeError::NoFilesFound);
        }
        Ok(resolved.into_iter().collect())
    }

    /// Fan the file set out over a fixed pool of worker threads. The pool
    /// size bounds how many files are in flight at any instant; the
    /// fan-in barrier below means aggregation only ever sees a complete
    /// set of per-file results.
    fn analyze_files(
        &self,
        files: &[PathBuf],
    ) -> Result<Vec<FileAnalysisResult>, AnalyzeError> {
        let workers = self
            .config
            .model
            .update_frequency
            .concurrency_limit()
            .min(files.len())
            .max(1);

        let (job_tx, job_rx) = crossbeam::channel::unbounded::<PathBuf>();
        let (result_tx, result_rx) = crossbeam::channel::unbounded();
        for file in files {
            let _ = job_tx.send(file.clone());
        }
        drop(job_tx);

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let engine = &self.engine;
                let observers = &self.observers;
                scope.spawn(move || {
                    while let Ok(path) = job_rx.recv() {
                        for observer in observers {
                            observer.file_started(&path);
                        }
                        match engine.analyze_file(&path) {
                            Ok(result) => {
                                for observer in observers {
                                    observer.file_completed(&path, &result);
                                }
                                let _ = result_tx.send((path, Ok(result)));
                            }
                            Err(error) => {
                                for observer in observers {
                                    observer.file_failed(&path, &error);
                                }
                                let _ = result_tx.send((path, Err(error)));
                            }
                        }
                    }
                });
            }
        });
        drop(result_tx);

        let mut results = Vec::with_capacity(files.len());
        for (path, outcome) in result_rx.iter() {
            match outcome {
                Ok(result) => results.push(result),
                Err(source) => return Err(AnalyzeError::FileAnalysis { path, source }),
            }
        }
        results.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(results)
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &ResultCache {
        &self.cache
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<glob::Pattern>, AnalyzeError> {
    patterns
        .iter()
        .map(|pattern| {
            glob::Pattern::new(pattern).map_err(|e| AnalyzeError::Pattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}
