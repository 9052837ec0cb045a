use super::AnalyzerContext;
use crate::core::ast::{Node, NodeKind};
use crate::core::{CodeIssue, IssueCategory, Language, Severity};
use crate::metrics::aggregate::is_test_path;

const JS_TEST_CALLEES: &[&str] = &["it", "test"];
const ASSERTION_MARKERS: &[&str] = &["expect(", "assert", "should."];

pub fn analyze(ctx: &AnalyzerContext) -> Vec<CodeIssue> {
    if is_test_path(&ctx.source.path) {
        analyze_test_file(ctx)
    } else {
        analyze_source_file(ctx)
    }
}

/// Inside test files, find test cases whose body never asserts anything.
fn analyze_test_file(ctx: &AnalyzerContext) -> Vec<CodeIssue> {
    let mut issues = Vec::new();
    let lines: Vec<&str> = ctx.source.content.lines().collect();

    ctx.tree.root.walk(&mut |node| {
        let case_name = match test_case_name(node, ctx.source.language) {
            Some(name) => name,
            None => return,
        };

        let start = node.start.row.min(lines.len());
        let end = (node.end.row + 1).min(lines.len());
        let asserts = lines[start..end]
            .iter()
            .any(|line| ASSERTION_MARKERS.iter().any(|marker| line.contains(marker)));

        if !asserts {
            issues.push(
                CodeIssue::new(
                    "assertion-free-test",
                    IssueCategory::Testing,
                    Severity::Warning,
                    &ctx.source.path,
                    node.start.line(),
                    format!("Test '{case_name}' contains no assertions"),
                )
                .with_confidence(0.7)
                .with_recommendation("Assert on observable behavior or remove the test"),
            );
        }
    });

    issues
}

/// Source modules with several functions and no tests anywhere near them
/// get a single advisory finding.
fn analyze_source_file(ctx: &AnalyzerContext) -> Vec<CodeIssue> {
    let functions = ctx
        .tree
        .root
        .count_where(|n| n.kind.is_function_like() && n.name.is_some());
    if functions < 3 {
        return Vec::new();
    }

    let has_test_constructs = ctx.source.content.contains("describe(")
        || ctx.source.content.contains("it(")
        || ctx.source.content.contains("def test_");
    if has_test_constructs {
        return Vec::new();
    }

    vec![CodeIssue::new(
        "missing-tests",
        IssueCategory::Testing,
        Severity::Info,
        &ctx.source.path,
        1,
        format!("Module defines {functions} functions but no tests reference it"),
    )
    .with_confidence(0.6)
    .with_recommendation("Add unit tests for the module's public functions")]
}

fn test_case_name(node: &Node, language: Language) -> Option<String> {
    match language {
        Language::Python => {
            if matches!(node.kind, NodeKind::Function | NodeKind::Method) {
                let name = node.name.as_deref()?;
                if name.starts_with("test_") {
                    return Some(name.to_string());
                }
            }
            None
        }
        _ => {
            if node.kind == NodeKind::Call {
                let callee = node.name.as_deref()?;
                if JS_TEST_CALLEES.contains(&callee) {
                    return Some(callee.to_string());
                }
            }
            None
        }
    }
}
