use crate::core::{CodeIssue, CodeMetrics, IssueCategory, QualityPrediction};

/// Project three fixed quality metrics forward. The numeric models are
/// deliberately simple linear extrapolations; the factor lists are
/// explanatory metadata and never feed back into the formulas.
pub fn predict(metrics: &CodeMetrics, issues: &[CodeIssue]) -> Vec<QualityPrediction> {
    let complexity_issues = count_category(issues, IssueCategory::Complexity);
    let maintainability_issues = count_category(issues, IssueCategory::Maintainability);

    vec![
        complexity_growth(metrics, complexity_issues),
        debt_trend(metrics, issues.len()),
        maintainability_decline(metrics, maintainability_issues),
    ]
}

fn count_category(issues: &[CodeIssue], category: IssueCategory) -> usize {
    issues.iter().filter(|i| i.category == category).count()
}

fn complexity_growth(metrics: &CodeMetrics, complexity_issues: usize) -> QualityPrediction {
    let current = metrics.average_complexity;
    let predicted = current * (1.0 + 0.02 * complexity_issues as f64);

    let mut factors = vec![format!("current average complexity {current:.1}")];
    if complexity_issues > 0 {
        factors.push(format!("{complexity_issues} functions already over threshold"));
    }

    QualityPrediction {
        metric: "complexity-growth".to_string(),
        current,
        predicted,
        confidence: 0.75,
        factors,
    }
}

fn debt_trend(metrics: &CodeMetrics, total_issues: usize) -> QualityPrediction {
    let current = metrics.debt.score;
    let reduction = (total_issues as f64 * 0.005).min(0.5);
    let predicted = current * (1.0 - reduction);

    QualityPrediction {
        metric: "technical-debt".to_string(),
        current,
        predicted,
        confidence: 0.7,
        factors: vec![format!("{total_issues} open findings drive remediation")],
    }
}

fn maintainability_decline(
    metrics: &CodeMetrics,
    maintainability_issues: usize,
) -> QualityPrediction {
    let current = metrics.maintainability;
    let predicted = (current - maintainability_issues as f64 * 0.8).max(0.0);

    QualityPrediction {
        metric: "maintainability".to_string(),
        current,
        predicted,
        confidence: 0.8,
        factors: vec![format!(
            "{maintainability_issues} maintainability findings outstanding"
        )],
    }
}
