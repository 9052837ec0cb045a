use crate::config::AnalysisConfig;
use crate::core::{CodeIssue, CodeMetrics, IssueCategory, Priority, StrategicRecommendation};

/// Rule-based strategic recommendations, threshold-triggered and sorted
/// by priority (critical first). At most one recommendation per rule.
pub fn recommend(
    metrics: &CodeMetrics,
    issues: &[CodeIssue],
    config: &AnalysisConfig,
) -> Vec<StrategicRecommendation> {
    let thresholds = &config.thresholds;
    let mut recommendations = Vec::new();

    if metrics.average_complexity > f64::from(thresholds.cyclomatic) {
        recommendations.push(StrategicRecommendation {
            area: "Architecture".to_string(),
            title: "Reduce Code Complexity".to_string(),
            priority: Priority::High,
            rationale: format!(
                "Average cyclomatic complexity {:.1} exceeds the threshold of {}",
                metrics.average_complexity, thresholds.cyclomatic
            ),
        });
    }

    let security_issues = issues
        .iter()
        .filter(|i| i.category == IssueCategory::Security)
        .count();
    if security_issues > 5 {
        recommendations.push(StrategicRecommendation {
            area: "Security".to_string(),
            title: "Harden Security Posture".to_string(),
            priority: Priority::Critical,
            rationale: format!("{security_issues} security findings across the codebase"),
        });
    }

    if metrics.quality.performance < thresholds.performance_score {
        recommendations.push(StrategicRecommendation {
            area: "Performance".to_string(),
            title: "Address Performance Hotspots".to_string(),
            priority: Priority::Medium,
            rationale: format!(
                "Performance score {:.0} is below the target of {:.0}",
                metrics.quality.performance, thresholds.performance_score
            ),
        });
    }

    if metrics.coverage.test < thresholds.test_coverage {
        recommendations.push(StrategicRecommendation {
            area: "Testing".to_string(),
            title: "Expand Test Coverage".to_string(),
            priority: Priority::High,
            rationale: format!(
                "Estimated test coverage {:.0}% is below the target of {:.0}%",
                metrics.coverage.test, thresholds.test_coverage
            ),
        });
    }

    if metrics.coverage.documentation < thresholds.documentation_coverage {
        recommendations.push(StrategicRecommendation {
            area: "Documentation".to_string(),
            title: "Document Public Interfaces".to_string(),
            priority: Priority::Low,
            rationale: format!(
                "Documentation coverage {:.0}% is below the target of {:.0}%",
                metrics.coverage.documentation, thresholds.documentation_coverage
            ),
        });
    }

    if metrics.maintainability < thresholds.maintainability {
        recommendations.push(StrategicRecommendation {
            area: "Maintainability".to_string(),
            title: "Schedule Refactoring Iterations".to_string(),
            priority: Priority::Medium,
            rationale: format!(
                "Maintainability index {:.0} is below the target of {:.0}",
                metrics.maintainability, thresholds.maintainability
            ),
        });
    }

    recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use std::path::Path;

    fn healthy_metrics() -> CodeMetrics {
        CodeMetrics {
            average_complexity: 3.0,
            maintainability: 90.0,
            coverage: crate::core::CoverageMetrics {
                test: 85.0,
                documentation: 80.0,
            },
            quality: crate::core::QualityScore {
                security: 95.0,
                performance: 90.0,
                reliability: 95.0,
                testability: 90.0,
            },
            ..CodeMetrics::default()
        }
    }

    #[test]
    fn test_healthy_project_needs_nothing() {
        let recs = recommend(&healthy_metrics(), &[], &AnalysisConfig::default());
        assert!(recs.is_empty());
    }

    #[test]
    fn test_complexity_over_threshold_triggers_architecture() {
        let metrics = CodeMetrics {
            average_complexity: 18.0,
            ..healthy_metrics()
        };
        let recs = recommend(&metrics, &[], &AnalysisConfig::default());
        let arch: Vec<_> = recs.iter().filter(|r| r.area == "Architecture").collect();
        assert_eq!(arch.len(), 1);
        assert_eq!(arch[0].title, "Reduce Code Complexity");
        assert_eq!(arch[0].priority, Priority::High);
    }

    #[test]
    fn test_security_volume_is_critical_and_sorted_first() {
        let metrics = CodeMetrics {
            average_complexity: 18.0,
            ..healthy_metrics()
        };
        let issues: Vec<CodeIssue> = (0..6)
            .map(|i| {
                CodeIssue::new(
                    "eval-usage",
                    IssueCategory::Security,
                    Severity::Critical,
                    Path::new("a.js"),
                    i,
                    "m",
                )
            })
            .collect();
        let recs = recommend(&metrics, &issues, &AnalysisConfig::default());
        assert_eq!(recs[0].priority, Priority::Critical);
        assert_eq!(recs[0].area, "Security");
    }

    #[test]
    fn test_low_coverage_triggers_testing() {
        let metrics = CodeMetrics {
            coverage: crate::core::CoverageMetrics {
                test: 20.0,
                documentation: 80.0,
            },
            ..healthy_metrics()
        };
        let recs = recommend(&metrics, &[], &AnalysisConfig::default());
        assert!(recs.iter().any(|r| r.area == "Testing"));
    }
}
