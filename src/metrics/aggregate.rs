use std::path::Path;

use crate::core::{
    CodeIssue, CodeMetrics, CoverageMetrics, DebtScore, FileAnalysisResult, IssueCategory,
    QualityScore, Severity,
};

const HOURLY_RATE: f64 = 75.0;

/// Roll per-file results into the project-level metric set. Every score
/// is clamped into [0,100]; debt time and cost are non-negative.
pub fn aggregate_metrics(files: &[FileAnalysisResult], issues: &[CodeIssue]) -> CodeMetrics {
    let total_files = files.len();
    let total_lines: usize = files.iter().map(|f| f.metrics.lines).sum();
    let total_functions: usize = files.iter().map(|f| f.metrics.functions).sum();
    let total_classes: usize = files.iter().map(|f| f.metrics.classes).sum();

    let average_complexity = if total_files == 0 {
        0.0
    } else {
        files
            .iter()
            .map(|f| f64::from(f.metrics.complexity.cyclomatic))
            .sum::<f64>()
            / total_files as f64
    };
    let max_complexity = files
        .iter()
        .map(|f| f.metrics.complexity.cyclomatic)
        .max()
        .unwrap_or(0);

    let maintainability_issues = count_category(issues, IssueCategory::Maintainability);

    CodeMetrics {
        total_files,
        total_lines,
        total_functions,
        total_classes,
        average_complexity,
        max_complexity,
        maintainability: (100.0
            - average_complexity * 2.0
            - maintainability_issues as f64 * 1.5)
            .clamp(0.0, 100.0),
        coverage: coverage(files, issues, total_functions),
        quality: quality(issues, average_complexity),
        debt: debt(issues),
    }
}

fn count_category(issues: &[CodeIssue], category: IssueCategory) -> usize {
    issues.iter().filter(|i| i.category == category).count()
}

/// Coverage proxies: test coverage from the ratio of test files to source
/// files, documentation coverage from undocumented-function findings.
fn coverage(
    files: &[FileAnalysisResult],
    issues: &[CodeIssue],
    total_functions: usize,
) -> CoverageMetrics {
    let test_files = files.iter().filter(|f| is_test_path(&f.path)).count();
    let source_files = files.len() - test_files;

    let test = if source_files == 0 {
        100.0
    } else {
        (test_files as f64 / source_files as f64 * 100.0).min(100.0)
    };

    let undocumented = issues
        .iter()
        .filter(|i| i.rule == "undocumented-function")
        .count();
    let documentation = if total_functions == 0 {
        100.0
    } else {
        ((1.0 - undocumented as f64 / total_functions as f64) * 100.0).clamp(0.0, 100.0)
    };

    CoverageMetrics {
        test,
        documentation,
    }
}

pub fn is_test_path(path: &Path) -> bool {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();
    name.contains(".test.")
        || name.contains(".spec.")
        || name.starts_with("test_")
        || name.ends_with("_test.py")
        || path.components().any(|c| {
            matches!(c.as_os_str().to_str(), Some("__tests__") | Some("tests"))
        })
}

fn quality(issues: &[CodeIssue], average_complexity: f64) -> QualityScore {
    let security_critical = issues
        .iter()
        .filter(|i| i.category == IssueCategory::Security && i.severity == Severity::Critical)
        .count();
    let security_other = count_category(issues, IssueCategory::Security) - security_critical;

    let performance_issues = count_category(issues, IssueCategory::Performance);
    let testing_issues = count_category(issues, IssueCategory::Testing);

    let critical = issues.iter().filter(|i| i.severity == Severity::Critical).count();
    let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();

    QualityScore {
        security: (100.0 - security_critical as f64 * 15.0 - security_other as f64 * 5.0)
            .clamp(0.0, 100.0),
        performance: (100.0 - performance_issues as f64 * 8.0).clamp(0.0, 100.0),
        reliability: (100.0 - critical as f64 * 10.0 - errors as f64 * 4.0).clamp(0.0, 100.0),
        testability: (100.0 - average_complexity * 4.0 - testing_issues as f64 * 2.0)
            .clamp(0.0, 100.0),
    }
}

/// Debt grows with severity-weighted issue volume on a saturating curve,
/// so the score stays in [0,100] no matter how large the backlog gets.
fn debt(issues: &[CodeIssue]) -> DebtScore {
    let raw: f64 = issues
        .iter()
        .map(|issue| match issue.severity {
            Severity::Critical => 10.0,
            Severity::Error => 5.0,
            Severity::Warning => 2.0,
            Severity::Info => 0.5,
        })
        .sum();

    let estimated_hours = raw * 0.5;
    DebtScore {
        score: 100.0 * raw / (raw + 50.0),
        estimated_hours,
        estimated_cost: estimated_hours * HOURLY_RATE,
    }
}
