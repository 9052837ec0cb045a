use once_cell::sync::Lazy;
use regex::Regex;

use super::AnalyzerContext;
use crate::core::ast::{Node, NodeKind};
use crate::core::{CodeIssue, IssueCategory, Severity};

const BLOCKING_CALLS: &[&str] = &[
    "readFileSync",
    "writeFileSync",
    "appendFileSync",
    "existsSync",
    "fs.readFileSync",
    "fs.writeFileSync",
    "fs.existsSync",
];

static STRING_APPEND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\+=\s*['"`]|\+=\s*\w+\s*\+\s*['"`]"#).unwrap());

fn is_loop(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::For | NodeKind::While | NodeKind::DoWhile)
}

pub fn analyze(ctx: &AnalyzerContext) -> Vec<CodeIssue> {
    let mut issues = Vec::new();
    let path = &ctx.source.path;
    let lines: Vec<&str> = ctx.source.content.lines().collect();

    ctx.tree.root.walk(&mut |node| {
        if is_loop(node.kind) {
            // A loop nested inside this loop's own body.
            if let Some(inner) = first_inner_loop(node) {
                issues.push(
                    CodeIssue::new(
                        "nested-loops",
                        IssueCategory::Performance,
                        Severity::Warning,
                        path,
                        inner.start.line(),
                        "Nested loop multiplies iteration cost",
                    )
                    .with_confidence(0.8)
                    .with_recommendation(
                        "Hoist invariant work or restructure with a lookup table",
                    ),
                );
            }

            // String append inside the loop body.
            let start = node.start.row.min(lines.len());
            let end = (node.end.row + 1).min(lines.len());
            for (offset, line) in lines[start..end].iter().enumerate() {
                if STRING_APPEND.is_match(line) {
                    issues.push(
                        CodeIssue::new(
                            "string-concat-in-loop",
                            IssueCategory::Performance,
                            Severity::Info,
                            path,
                            start + offset + 1,
                            "String concatenation inside a loop",
                        )
                        .with_confidence(0.6)
                        .with_recommendation("Collect parts and join once after the loop"),
                    );
                }
            }
        }

        if node.kind == NodeKind::Call {
            if let Some(callee) = node.name.as_deref() {
                if BLOCKING_CALLS.contains(&callee) {
                    issues.push(
                        CodeIssue::new(
                            "blocking-io",
                            IssueCategory::Performance,
                            Severity::Warning,
                            path,
                            node.start.line(),
                            format!("Blocking call '{callee}' stalls the event loop"),
                        )
                        .with_confidence(0.75)
                        .with_recommendation("Use the async variant of the API"),
                    );
                }
            }
        }
    });

    issues
}

/// The first loop found strictly inside another loop's subtree.
fn first_inner_loop(outer: &Node) -> Option<&Node> {
    fn find(node: &Node) -> Option<&Node> {
        for child in &node.children {
            if is_loop(child.kind) {
                return Some(child);
            }
            if let Some(found) = find(child) {
                return Some(found);
            }
        }
        None
    }
    find(outer)
}
