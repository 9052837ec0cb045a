use crate::config::AnalysisConfig;
use crate::core::{CodeMetrics, FileAnalysisResult, RiskAssessment};

/// Independent thresholded risk checks. Likelihood and impact are fixed
/// per rule and always lie in [0,1]; mitigation text is static.
pub fn assess(
    files: &[FileAnalysisResult],
    metrics: &CodeMetrics,
    config: &AnalysisConfig,
) -> Vec<RiskAssessment> {
    let thresholds = &config.thresholds;
    let mut risks = Vec::new();

    if metrics.quality.security < thresholds.security_score {
        risks.push(RiskAssessment {
            name: "Security exposure".to_string(),
            likelihood: 0.7,
            impact: 0.9,
            mitigations: vec![
                "Triage critical security findings first".to_string(),
                "Add dependency and secret scanning to CI".to_string(),
            ],
        });
    }

    if metrics.maintainability < thresholds.maintainability {
        risks.push(RiskAssessment {
            name: "Maintainability erosion".to_string(),
            likelihood: 0.6,
            impact: 0.6,
            mitigations: vec![
                "Reserve capacity for refactoring each iteration".to_string(),
                "Enforce complexity budgets in review".to_string(),
            ],
        });
    }

    if metrics.debt.score > 50.0 {
        risks.push(RiskAssessment {
            name: "Debt accumulation".to_string(),
            likelihood: 0.65,
            impact: 0.7,
            mitigations: vec![
                "Burn down the highest-severity findings".to_string(),
                "Track the debt score trend per release".to_string(),
            ],
        });
    }

    let anomalies = complexity_anomalies(files, metrics);
    if anomalies > 3 {
        risks.push(RiskAssessment {
            name: "Complexity hotspots".to_string(),
            likelihood: 0.6,
            impact: 0.65,
            mitigations: vec![
                format!("Review the {anomalies} files far above average complexity"),
                "Pair hotspot changes with characterization tests".to_string(),
            ],
        });
    }

    risks
}

/// Files whose cyclomatic complexity is more than twice the project
/// average count as anomalies.
fn complexity_anomalies(files: &[FileAnalysisResult], metrics: &CodeMetrics) -> usize {
    if metrics.average_complexity <= 0.0 {
        return 0;
    }
    files
        .iter()
        .filter(|f| {
            f64::from(f.metrics.complexity.cyclomatic) > metrics.average_complexity * 2.0
        })
        .count()
}
