use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;

use crate::analyzers::{dependencies, AnalyzerContext, AnalyzerKind};
use crate::config::AnalysisConfig;
use crate::core::ast::SourceFile;
use crate::core::{CodeIssue, FileAnalysisResult, Language};
use crate::metrics::compute_file_metrics;
use crate::parsers::provider_for;

/// Per-file orchestrator: parse, fan the category analyzers out over the
/// immutable tree, compute metrics, filter by model confidence.
pub struct Engine {
    config: Arc<AnalysisConfig>,
}

impl Engine {
    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self { config }
    }

    pub fn analyze_file(&self, path: &Path) -> Result<FileAnalysisResult> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let modified = file_mtime(path);

        let language = Language::detect(path, &content);
        if language == Language::Unknown {
            log::debug!("skipping {}: language not detected", path.display());
            return Ok(FileAnalysisResult::unknown(path.to_path_buf()));
        }

        let source = SourceFile {
            path: path.to_path_buf(),
            language,
            content,
            modified,
        };
        self.analyze_source(&source)
    }

    /// Analyze an already-read source file. Exposed for callers that
    /// manage file contents themselves.
    pub fn analyze_source(&self, source: &SourceFile) -> Result<FileAnalysisResult> {
        let provider = match provider_for(source.language) {
            Some(provider) => provider,
            None => return Ok(FileAnalysisResult::unknown(source.path.clone())),
        };

        let outcome = provider.parse(&source.content, &source.path)?;
        for diagnostic in &outcome.errors {
            log::warn!(
                "parse problem in {}:{}:{}: {}",
                source.path.display(),
                diagnostic.line,
                diagnostic.column,
                diagnostic.message
            );
        }

        let dependencies = dependencies::extract_dependencies(&outcome.tree);

        let ctx = AnalyzerContext {
            tree: &outcome.tree,
            source,
            config: &self.config,
        };
        // Each analyzer is a pure read-only pass over the same immutable
        // tree; their issue lists are concatenated in analyzer order.
        let issues: Vec<CodeIssue> = AnalyzerKind::enabled(&self.config)
            .par_iter()
            .map(|kind| kind.run(&ctx))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        let issues = self.filter_by_confidence(issues);
        let metrics = compute_file_metrics(&outcome.tree, &source.content, &dependencies);

        Ok(FileAnalysisResult {
            path: source.path.clone(),
            language: source.language,
            metrics,
            issues,
            dependencies: dependencies.into_iter().map(|d| d.name).collect(),
            parse_errors: outcome.errors.len(),
        })
    }

    /// Confidence filtering only applies when AI-assisted scoring is on;
    /// otherwise every finding is kept.
    fn filter_by_confidence(&self, issues: Vec<CodeIssue>) -> Vec<CodeIssue> {
        if !self.config.enable_ai {
            return issues;
        }
        let threshold = self.config.model.confidence_threshold;
        issues
            .into_iter()
            .filter(|issue| issue.ai_confidence >= threshold)
            .collect()
    }
}

fn file_mtime(path: &Path) -> DateTime<Utc> {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(DateTime::from)
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::fs;
    use tempfile::TempDir;

    fn engine_with(config: AnalysisConfig) -> Engine {
        Engine::new(Arc::new(config))
    }

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_unknown_extension_degrades_gracefully() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "data.csv", "a,b,c\n1,2,3\n");
        let result = engine_with(AnalysisConfig::default())
            .analyze_file(&path)
            .unwrap();
        assert_eq!(result.language, Language::Unknown);
        assert_eq!(result.metrics.functions, 0);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_javascript_file_end_to_end() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "guard.js",
            indoc! {r#"
                // Guard helper.
                function guard(a, b) {
                    if (a && b) {
                        return a;
                    }
                    return b;
                }
            "#},
        );
        let result = engine_with(AnalysisConfig::default())
            .analyze_file(&path)
            .unwrap();
        assert_eq!(result.language, Language::JavaScript);
        assert_eq!(result.metrics.functions, 1);
        // base 1 + if + &&
        assert_eq!(result.metrics.complexity.cyclomatic, 3);
        // if at nesting 0 plus flat logical operator
        assert_eq!(result.metrics.complexity.cognitive, 2);
        assert_eq!(result.parse_errors, 0);
    }

    #[test]
    fn test_parse_errors_do_not_abort() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "broken.js", "function broken( {\nconst x = 1;\n");
        let result = engine_with(AnalysisConfig::default())
            .analyze_file(&path)
            .unwrap();
        assert!(result.parse_errors > 0);
        assert_eq!(result.language, Language::JavaScript);
    }

    #[test]
    fn test_confidence_filter_applies_only_with_ai() {
        let dir = TempDir::new().unwrap();
        // long-line has confidence 0.6; undocumented-function 0.65.
        let content = format!("function pay(a) {{ return a; }} // {}\n", "x".repeat(130));
        let path = write_file(&dir, "pay.js", &content);

        let strict = AnalysisConfig {
            model: crate::config::ModelConfig {
                confidence_threshold: 0.64,
                ..Default::default()
            },
            ..AnalysisConfig::default()
        };
        let filtered = engine_with(strict).analyze_file(&path).unwrap();
        assert!(filtered.issues.iter().all(|i| i.ai_confidence >= 0.64));
        assert!(!filtered.issues.iter().any(|i| i.rule == "long-line"));

        let unfiltered_config = AnalysisConfig {
            enable_ai: false,
            ..AnalysisConfig::default()
        };
        let unfiltered = engine_with(unfiltered_config).analyze_file(&path).unwrap();
        assert!(unfiltered.issues.iter().any(|i| i.rule == "long-line"));
    }

    #[test]
    fn test_dependencies_surface_on_result() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "api.js",
            "import axios from 'axios';\nimport helper from './helper';\n",
        );
        let result = engine_with(AnalysisConfig::default())
            .analyze_file(&path)
            .unwrap();
        assert!(result.dependencies.contains(&"axios".to_string()));
        assert!(result.dependencies.contains(&"./helper".to_string()));
        assert_eq!(result.metrics.coupling.efferent, 1);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let engine = engine_with(AnalysisConfig::default());
        assert!(engine.analyze_file(Path::new("/nonexistent/nope.js")).is_err());
    }
}
