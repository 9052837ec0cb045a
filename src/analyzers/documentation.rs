use super::AnalyzerContext;
use crate::core::ast::{Node, NodeKind};
use crate::core::{CodeIssue, IssueCategory, Language, Severity};

/// Flag named functions, methods and classes that carry no documentation.
/// JS/TS look for a comment on the preceding line; Python also accepts a
/// docstring as the first statement of the body.
pub fn analyze(ctx: &AnalyzerContext) -> Vec<CodeIssue> {
    let mut issues = Vec::new();
    let lines: Vec<&str> = ctx.source.content.lines().collect();
    let language = ctx.source.language;

    ctx.tree.root.walk(&mut |node| {
        let rule = match node.kind {
            NodeKind::Function | NodeKind::Method => "undocumented-function",
            NodeKind::Class => "undocumented-class",
            _ => return,
        };
        let Some(name) = node.name.as_deref() else {
            return;
        };

        if is_documented(node, &lines, language) {
            return;
        }

        let what = if node.kind == NodeKind::Class {
            "Class"
        } else {
            "Function"
        };
        issues.push(
            CodeIssue::new(
                rule,
                IssueCategory::Documentation,
                Severity::Info,
                &ctx.source.path,
                node.start.line(),
                format!("{what} '{name}' has no documentation"),
            )
            .with_confidence(0.65)
            .with_recommendation("Describe purpose, parameters and return value"),
        );
    });

    issues
}

fn is_documented(node: &Node, lines: &[&str], language: Language) -> bool {
    if has_preceding_comment(node, lines, language) {
        return true;
    }
    language == Language::Python && has_docstring(node, lines)
}

fn has_preceding_comment(node: &Node, lines: &[&str], language: Language) -> bool {
    let Some(row) = node.start.row.checked_sub(1) else {
        return false;
    };
    let Some(line) = lines.get(row) else {
        return false;
    };
    let trimmed = line.trim();
    match language {
        Language::Python => trimmed.starts_with('#'),
        _ => {
            trimmed.starts_with("//")
                || trimmed.starts_with("/*")
                || trimmed.starts_with('*')
                || trimmed.ends_with("*/")
        }
    }
}

fn has_docstring(node: &Node, lines: &[&str]) -> bool {
    // The def header may span lines; scan a few lines into the body.
    let start = node.start.row + 1;
    lines
        .iter()
        .skip(start)
        .take(3)
        .any(|line| line.trim_start().starts_with("\"\"\"") || line.trim_start().starts_with("'''"))
}
