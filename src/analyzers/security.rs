use once_cell::sync::Lazy;
use regex::Regex;

use super::AnalyzerContext;
use crate::core::ast::NodeKind;
use crate::core::{CodeIssue, IssueCategory, Severity};

static SECRET_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r#"(?i)(api[_-]?key|apikey)\s*[:=]\s*['"][\w\-]{16,}['"]"#).unwrap(),
            "API key",
        ),
        (
            Regex::new(r#"(?i)(secret|password|passwd|pwd)\s*[:=]\s*['"][^'"]{8,}['"]"#)
                .unwrap(),
            "password or secret",
        ),
        (
            Regex::new(r#"(?i)(token|bearer)\s*[:=]\s*['"][\w\-\.]{20,}['"]"#).unwrap(),
            "authentication token",
        ),
        (
            Regex::new(r"sk[_-]live[_-][0-9a-zA-Z]{24,}").unwrap(),
            "live API key",
        ),
        (
            Regex::new(r#"(?i)private[_-]?key\s*[:=]\s*['"]-----BEGIN"#).unwrap(),
            "private key",
        ),
    ]
});

static SQL_CONCAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)['"](select|insert|update|delete)\b[^'"]*['"]\s*(\+|%|\|\|)"#).unwrap()
});

static DOM_SINKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.innerHTML\s*=|document\.write\s*\(").unwrap());

/// Calls that evaluate strings as code or spawn shells.
const DANGEROUS_CALLS: &[(&str, &str, Severity, f64)] = &[
    ("eval", "eval-usage", Severity::Critical, 0.95),
    ("Function", "dynamic-function", Severity::Error, 0.7),
    ("exec", "python-exec", Severity::Critical, 0.9),
    ("execSync", "shell-exec", Severity::Warning, 0.8),
    ("spawnSync", "shell-exec", Severity::Warning, 0.75),
    ("os.system", "shell-exec", Severity::Warning, 0.85),
];

pub fn analyze(ctx: &AnalyzerContext) -> Vec<CodeIssue> {
    let mut issues = Vec::new();
    let path = &ctx.source.path;

    // Tree pass: dangerous call targets.
    ctx.tree.root.walk(&mut |node| {
        if node.kind != NodeKind::Call {
            return;
        }
        let Some(callee) = node.name.as_deref() else {
            return;
        };
        if let Some((_, rule, severity, confidence)) = DANGEROUS_CALLS
            .iter()
            .find(|(name, _, _, _)| *name == callee)
        {
            issues.push(
                CodeIssue::new(
                    *rule,
                    IssueCategory::Security,
                    *severity,
                    path,
                    node.start.line(),
                    format!("Call to '{callee}' can execute untrusted input"),
                )
                .with_confidence(*confidence)
                .with_recommendation("Replace dynamic execution with a safe, explicit API"),
            );
        }
    });

    // Text pass: secrets, SQL concatenation, DOM sinks.
    for (line_num, line) in ctx.source.content.lines().enumerate() {
        let line_no = line_num + 1;

        for (pattern, what) in SECRET_PATTERNS.iter() {
            if pattern.is_match(line) {
                issues.push(
                    CodeIssue::new(
                        "hardcoded-secret",
                        IssueCategory::Security,
                        Severity::Critical,
                        path,
                        line_no,
                        format!("Hardcoded {what} detected"),
                    )
                    .with_confidence(0.85)
                    .with_recommendation(
                        "Move the value to an environment variable or secret store",
                    ),
                );
                break;
            }
        }

        if SQL_CONCAT.is_match(line) {
            issues.push(
                CodeIssue::new(
                    "sql-string-concat",
                    IssueCategory::Security,
                    Severity::Error,
                    path,
                    line_no,
                    "SQL statement built by string concatenation",
                )
                .with_confidence(0.7)
                .with_recommendation("Use parameterized queries instead of concatenation"),
            );
        }

        if DOM_SINKS.is_match(line) {
            issues.push(
                CodeIssue::new(
                    "unsafe-dom-sink",
                    IssueCategory::Security,
                    Severity::Warning,
                    path,
                    line_no,
                    "Assignment to an HTML injection sink",
                )
                .with_confidence(0.7)
                .with_recommendation("Sanitize the value or use textContent"),
            );
        }
    }

    issues
}
