use once_cell::sync::Lazy;
use regex::Regex;

use super::AnalyzerContext;
use crate::core::{CodeIssue, IssueCategory, Severity};
use crate::metrics::max_nesting;

const LONG_FUNCTION_LINES: usize = 50;
const LONG_PARAMETER_COUNT: usize = 5;
const DEEP_NESTING: u32 = 4;
const LARGE_FILE_LINES: usize = 300;
const LONG_LINE_CHARS: usize = 120;

static TODO_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(TODO|FIXME|HACK|XXX)\b:?\s*(.*)").unwrap());

pub fn analyze(ctx: &AnalyzerContext) -> Vec<CodeIssue> {
    let mut issues = Vec::new();
    let path = &ctx.source.path;

    // Function-level smells.
    ctx.tree.root.walk(&mut |node| {
        if !node.kind.is_function_like() {
            return;
        }
        let name = node.name.as_deref().unwrap_or("<anonymous>");
        let line = node.start.line();

        let length = node.line_span();
        if length > LONG_FUNCTION_LINES {
            let severity = if length > LONG_FUNCTION_LINES * 2 {
                Severity::Error
            } else {
                Severity::Warning
            };
            issues.push(
                CodeIssue::new(
                    "long-function",
                    IssueCategory::Maintainability,
                    severity,
                    path,
                    line,
                    format!(
                        "Function '{name}' spans {length} lines (threshold: {LONG_FUNCTION_LINES})"
                    ),
                )
                .with_confidence(0.85)
                .with_recommendation("Extract cohesive sections into helper functions"),
            );
        }

        if node.param_count > LONG_PARAMETER_COUNT {
            issues.push(
                CodeIssue::new(
                    "long-parameter-list",
                    IssueCategory::Maintainability,
                    Severity::Warning,
                    path,
                    line,
                    format!(
                        "Function '{name}' takes {} parameters (threshold: {LONG_PARAMETER_COUNT})",
                        node.param_count
                    ),
                )
                .with_confidence(0.8)
                .with_recommendation("Group related parameters into an options object"),
            );
        }

        let nesting = max_nesting(node);
        if nesting > DEEP_NESTING {
            issues.push(
                CodeIssue::new(
                    "deep-nesting",
                    IssueCategory::Maintainability,
                    Severity::Warning,
                    path,
                    line,
                    format!("Function '{name}' nests {nesting} levels deep (threshold: {DEEP_NESTING})"),
                )
                .with_confidence(0.85)
                .with_recommendation("Invert conditions and return early"),
            );
        }
    });

    // Module-level smells.
    let line_count = ctx.source.content.lines().count();
    if line_count > LARGE_FILE_LINES {
        issues.push(
            CodeIssue::new(
                "large-file",
                IssueCategory::Maintainability,
                Severity::Warning,
                path,
                1,
                format!("File has {line_count} lines (threshold: {LARGE_FILE_LINES})"),
            )
            .with_confidence(0.75)
            .with_recommendation("Split the module along responsibility boundaries"),
        );
    }

    for (line_num, line) in ctx.source.content.lines().enumerate() {
        let line_no = line_num + 1;

        if line.len() > LONG_LINE_CHARS {
            issues.push(
                CodeIssue::new(
                    "long-line",
                    IssueCategory::Maintainability,
                    Severity::Info,
                    path,
                    line_no,
                    format!("Line exceeds {LONG_LINE_CHARS} characters ({})", line.len()),
                )
                .with_confidence(0.6),
            );
        }

        if let Some(captures) = TODO_MARKER.captures(line) {
            let marker = captures
                .get(1)
                .map(|m| m.as_str().to_uppercase())
                .unwrap_or_default();
            let severity = match marker.as_str() {
                "FIXME" | "XXX" => Severity::Warning,
                _ => Severity::Info,
            };
            issues.push(
                CodeIssue::new(
                    "todo-marker",
                    IssueCategory::Maintainability,
                    severity,
                    path,
                    line_no,
                    format!("{marker} marker left in code"),
                )
                .with_confidence(0.9),
            );
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::testkit::context_for_js;

    fn run(content: &str) -> Vec<CodeIssue> {
        let (source, tree, config) = context_for_js(content);
        analyze(&AnalyzerContext {
            tree: &tree,
            source: &source,
            config: &config,
        })
    }

    #[test]
    fn test_long_parameter_list_flagged() {
        let issues = run("function f(a, b, c, d, e, g) { return a; }");
        assert!(issues.iter().any(|i| i.rule == "long-parameter-list"));
    }

    #[test]
    fn test_long_function_flagged() {
        let mut content = String::from("function f() {\n");
        for i in 0..60 {
            content.push_str(&format!("  call{i}();\n"));
        }
        content.push_str("}\n");
        let issues = run(&content);
        assert!(issues.iter().any(|i| i.rule == "long-function"));
    }

    #[test]
    fn test_deep_nesting_flagged() {
        let issues = run(
            "function f(a) {\n  if (a) {\n    for (;;) {\n      while (a) {\n        if (a) {\n          if (a) { a(); }\n        }\n      }\n    }\n  }\n}\n",
        );
        assert!(issues.iter().any(|i| i.rule == "deep-nesting"));
    }

    #[test]
    fn test_todo_markers() {
        let issues = run("// TODO: handle retries\n// FIXME: leaks handles\nconst x = 1;\n");
        let markers: Vec<_> = issues.iter().filter(|i| i.rule == "todo-marker").collect();
        assert_eq!(markers.len(), 2);
        assert!(markers.iter().any(|i| i.severity == Severity::Warning));
        assert!(markers.iter().any(|i| i.severity == Severity::Info));
    }

    #[test]
    fn test_short_clean_function_produces_nothing() {
        let issues = run("function f(a, b) { return a + b; }");
        assert!(issues.is_empty());
    }
}
