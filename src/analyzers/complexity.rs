use super::AnalyzerContext;
use crate::core::ast::Node;
use crate::core::{CodeIssue, IssueCategory, Severity};
use crate::metrics::{cognitive, cyclomatic};

/// Flag functions whose cyclomatic or cognitive complexity exceeds the
/// configured thresholds.
pub fn analyze(ctx: &AnalyzerContext) -> Vec<CodeIssue> {
    let mut issues = Vec::new();
    let thresholds = &ctx.config.thresholds;

    ctx.tree.root.walk(&mut |node| {
        if !node.kind.is_function_like() {
            return;
        }
        let name = display_name(node);
        let line = node.start.line();

        let cyclo = cyclomatic(node);
        if cyclo > thresholds.cyclomatic {
            let severity = if cyclo > thresholds.cyclomatic * 2 {
                Severity::Error
            } else {
                Severity::Warning
            };
            issues.push(
                CodeIssue::new(
                    "high-cyclomatic-complexity",
                    IssueCategory::Complexity,
                    severity,
                    &ctx.source.path,
                    line,
                    format!(
                        "Function '{name}' has cyclomatic complexity {cyclo} (threshold: {})",
                        thresholds.cyclomatic
                    ),
                )
                .with_span((line, node.start.column), (node.end.line(), node.end.column))
                .with_confidence(0.9)
                .with_recommendation(
                    "Split the function into smaller units with a single decision focus",
                ),
            );
        }

        let cog = cognitive(node);
        if cog > thresholds.cognitive {
            let severity = if cog > thresholds.cognitive * 2 {
                Severity::Error
            } else {
                Severity::Warning
            };
            issues.push(
                CodeIssue::new(
                    "high-cognitive-complexity",
                    IssueCategory::Complexity,
                    severity,
                    &ctx.source.path,
                    line,
                    format!(
                        "Function '{name}' has cognitive complexity {cog} (threshold: {})",
                        thresholds.cognitive
                    ),
                )
                .with_span((line, node.start.column), (node.end.line(), node.end.column))
                .with_confidence(0.85)
                .with_recommendation("Flatten nested control flow or extract guard clauses"),
            );
        }
    });

    issues
}

fn display_name(node: &Node) -> &str {
    node.name.as_deref().unwrap_or("<anonymous>")
}
