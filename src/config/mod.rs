use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::AnalyzeError;

/// Immutable configuration value, constructed once at startup and passed
/// by reference into each component. Changing configuration means
/// rebuilding the orchestrator, never mutating in place.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub enable_ai: bool,
    pub enable_security_scan: bool,
    pub enable_performance_analysis: bool,
    pub enable_documentation_analysis: bool,
    pub enable_test_analysis: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub thresholds: Thresholds,
    pub model: ModelConfig,
    pub output: OutputConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enable_ai: true,
            enable_security_scan: true,
            enable_performance_analysis: true,
            enable_documentation_analysis: true,
            enable_test_analysis: true,
            include: Vec::new(),
            exclude: Vec::new(),
            thresholds: Thresholds::default(),
            model: ModelConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub cyclomatic: u32,
    pub cognitive: u32,
    pub maintainability: f64,
    pub test_coverage: f64,
    pub documentation_coverage: f64,
    pub security_score: f64,
    pub performance_score: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cyclomatic: 15,
            cognitive: 20,
            maintainability: 65.0,
            test_coverage: 70.0,
            documentation_coverage: 60.0,
            security_score: 80.0,
            performance_score: 70.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateFrequency {
    Realtime,
    Batch,
}

impl UpdateFrequency {
    /// Realtime trades throughput for lower per-file latency variance.
    pub fn concurrency_limit(&self) -> usize {
        match self {
            UpdateFrequency::Realtime => 4,
            UpdateFrequency::Batch => 8,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub confidence_threshold: f64,
    pub cache_results: bool,
    pub update_frequency: UpdateFrequency,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            cache_results: true,
            update_frequency: UpdateFrequency::Batch,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Html,
    Markdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Normal,
    Detailed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: ReportFormat,
    pub include_recommendations: bool,
    pub include_metrics: bool,
    pub verbosity: Verbosity,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Json,
            include_recommendations: true,
            include_metrics: true,
            verbosity: Verbosity::Normal,
        }
    }
}

impl AnalysisConfig {
    /// Load from a TOML file, falling back to defaults when absent.
    pub fn load(path: &Path) -> Result<Self, AnalyzeError> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AnalyzeError::Configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, AnalyzeError> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| AnalyzeError::Configuration(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate invariants at construction time. Scores are percentages,
    /// confidence is a probability.
    pub fn validate(&self) -> Result<(), AnalyzeError> {
        let t = &self.thresholds;
        let percent_fields = [
            ("maintainability", t.maintainability),
            ("test_coverage", t.test_coverage),
            ("documentation_coverage", t.documentation_coverage),
            ("security_score", t.security_score),
            ("performance_score", t.performance_score),
        ];
        for (name, value) in percent_fields {
            if !(0.0..=100.0).contains(&value) {
                return Err(AnalyzeError::Configuration(format!(
                    "threshold '{name}' must be in [0,100], got {value}"
                )));
            }
        }
        if t.cyclomatic == 0 || t.cognitive == 0 {
            return Err(AnalyzeError::Configuration(
                "complexity thresholds must be positive".to_string(),
            ));
        }
        let confidence = self.model.confidence_threshold;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(AnalyzeError::Configuration(format!(
                "confidence_threshold must be in [0,1], got {confidence}"
            )));
        }
        Ok(())
    }
}
