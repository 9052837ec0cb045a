pub mod patterns;
pub mod predictions;
pub mod recommendations;
pub mod risks;

use crate::config::AnalysisConfig;
use crate::core::{AiInsights, CodeIssue, CodeMetrics, FileAnalysisResult};

/// Synthesize the full insight bundle from aggregated metrics and issues.
/// All four sub-lists are always present; callers that disable AI get
/// `AiInsights::default()` instead, never a partial value.
pub fn generate_insights(
    files: &[FileAnalysisResult],
    metrics: &CodeMetrics,
    issues: &[CodeIssue],
    config: &AnalysisConfig,
) -> AiInsights {
    AiInsights {
        patterns: patterns::detect_patterns(files),
        predictions: predictions::predict(metrics, issues),
        recommendations: recommendations::recommend(metrics, issues, config),
        risks: risks::assess(files, metrics, config),
    }
}
