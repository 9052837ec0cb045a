use anyhow::{Context, Result};
use std::path::Path;
use tree_sitter::Parser;

use super::{collect_errors, collect_tokens, ParserProvider};
use crate::core::ast::{LogicalOp, Node, NodeKind, ParseOutcome, Position, SyntaxTree};
use crate::core::Language;

/// Parser provider for Python backed by tree-sitter.
pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserProvider for PythonParser {
    fn parse(&self, content: &str, path: &Path) -> Result<ParseOutcome> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .context("failed to set Python grammar")?;

        let tree = parser
            .parse(content, None)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let root = tree.root_node();
        let mut tokens = Vec::new();
        collect_tokens(root, content, &mut tokens);
        let mut errors = Vec::new();
        collect_errors(root, &mut errors);

        let mapped = map_node(root, content, false);
        Ok(ParseOutcome {
            tree: SyntaxTree::new(mapped, Language::Python),
            tokens,
            errors,
        })
    }

    fn language(&self) -> Language {
        Language::Python
    }
}

fn position(point: tree_sitter::Point) -> Position {
    Position::new(point.row, point.column)
}

fn node_text<'a>(node: tree_sitter::Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Map a tree-sitter node; `in_class_body` distinguishes methods and
/// class-level fields from plain functions and assignments.
fn map_node(ts: tree_sitter::Node, source: &str, in_class_body: bool) -> Node {
    let kind = classify(ts, source, in_class_body);

    let mut node = Node::new(kind)
        .with_span(position(ts.start_position()), position(ts.end_position()));

    match kind {
        NodeKind::Function | NodeKind::Method => {
            node.name = ts
                .child_by_field_name("name")
                .map(|n| node_text(n, source).to_string());
            node.param_count = param_count(ts, source);
        }
        NodeKind::Class => {
            node.name = ts
                .child_by_field_name("name")
                .map(|n| node_text(n, source).to_string());
        }
        NodeKind::Field => {
            node.name = field_name(ts, source);
        }
        NodeKind::Import => {
            node.name = import_specifier(ts, source);
        }
        NodeKind::Call => {
            node.name = ts
                .child_by_field_name("function")
                .map(|n| node_text(n, source).to_string());
        }
        _ => {}
    }

    let child_scope = match ts.kind() {
        "class_definition" => true,
        // The class body block keeps the scope; anything deeper leaves it.
        "block" | "decorated_definition" => in_class_body,
        _ => false,
    };

    node.children = ts
        .children(&mut ts.walk())
        .map(|child| map_node(child, source, child_scope))
        .collect();
    node
}

fn classify(ts: tree_sitter::Node, source: &str, in_class_body: bool) -> NodeKind {
    match ts.kind() {
        "module" => NodeKind::Program,
        "function_definition" => {
            if in_class_body {
                NodeKind::Method
            } else {
                NodeKind::Function
            }
        }
        "lambda" => NodeKind::ArrowFunction,
        "class_definition" => NodeKind::Class,
        "if_statement" | "elif_clause" => NodeKind::If,
        "conditional_expression" => NodeKind::Ternary,
        "match_statement" => NodeKind::Switch,
        "case_clause" => NodeKind::SwitchCase,
        "for_statement" => NodeKind::For,
        "while_statement" => NodeKind::While,
        "try_statement" => NodeKind::Try,
        "except_clause" => NodeKind::Catch,
        "boolean_operator" => match logical_operator(ts, source) {
            Some(op) => NodeKind::Logical(op),
            None => NodeKind::Other,
        },
        "import_statement" | "import_from_statement" => NodeKind::Import,
        "call" => NodeKind::Call,
        "return_statement" => NodeKind::Return,
        "expression_statement" => {
            if in_class_body && has_assignment(ts) {
                NodeKind::Field
            } else {
                NodeKind::Statement
            }
        }
        "raise_statement" | "pass_statement" | "break_statement" | "continue_statement"
        | "assert_statement" | "with_statement" | "delete_statement" | "global_statement" => {
            NodeKind::Statement
        }
        _ => NodeKind::Other,
    }
}

fn logical_operator(ts: tree_sitter::Node, source: &str) -> Option<LogicalOp> {
    let op = ts.child_by_field_name("operator")?;
    match node_text(op, source) {
        "and" => Some(LogicalOp::And),
        "or" => Some(LogicalOp::Or),
        _ => None,
    }
}

fn has_assignment(ts: tree_sitter::Node) -> bool {
    ts.children(&mut ts.walk())
        .any(|child| child.kind() == "assignment")
}

fn field_name(ts: tree_sitter::Node, source: &str) -> Option<String> {
    let assignment = ts
        .children(&mut ts.walk())
        .find(|child| child.kind() == "assignment")?;
    assignment
        .child_by_field_name("left")
        .map(|n| node_text(n, source).to_string())
}

fn import_specifier(ts: tree_sitter::Node, source: &str) -> Option<String> {
    if ts.kind() == "import_from_statement" {
        return ts
            .child_by_field_name("module_name")
            .map(|n| node_text(n, source).to_string());
    }
    ts.children(&mut ts.walk())
        .find(|child| matches!(child.kind(), "dotted_name" | "aliased_import"))
        .map(|child| {
            let text = node_text(child, source);
            text.split_whitespace().next().unwrap_or(text).to_string()
        })
}

/// Parameter count excluding the implicit receiver.
fn param_count(ts: tree_sitter::Node, source: &str) -> usize {
    let Some(params) = ts.child_by_field_name("parameters") else {
        return 0;
    };
    let mut count = 0;
    for child in params.children(&mut params.walk()) {
        if !child.is_named() {
            continue;
        }
        let text = node_text(child, source);
        if text == "self" || text == "cls" {
            continue;
        }
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn parse(content: &str) -> ParseOutcome {
        PythonParser::new()
            .parse(content, Path::new("test.py"))
            .unwrap()
    }

    #[test]
    fn test_module_functions_vs_methods() {
        let outcome = parse(indoc! {r#"
            def helper(x):
                return x

            class Service:
                retries = 3

                def run(self, job):
                    if job and self.retries:
                        return job
        "#});

        let mut functions = 0;
        let mut methods = 0;
        let mut fields = 0;
        outcome.tree.root.walk(&mut |node| match node.kind {
            NodeKind::Function => functions += 1,
            NodeKind::Method => methods += 1,
            NodeKind::Field => fields += 1,
            _ => {}
        });
        assert_eq!(functions, 1);
        assert_eq!(methods, 1);
        assert_eq!(fields, 1);
    }

    #[test]
    fn test_method_params_exclude_self() {
        let outcome = parse("class A:\n    def f(self, a, b):\n        pass\n");
        let mut params = None;
        outcome.tree.root.walk(&mut |node| {
            if node.kind == NodeKind::Method {
                params = Some(node.param_count);
            }
        });
        assert_eq!(params, Some(2));
    }

    #[test]
    fn test_boolean_operator_maps_to_logical() {
        let outcome = parse("x = a and b or c\n");
        let ands = outcome
            .tree
            .root
            .count_where(|n| n.kind == NodeKind::Logical(LogicalOp::And));
        let ors = outcome
            .tree
            .root
            .count_where(|n| n.kind == NodeKind::Logical(LogicalOp::Or));
        assert_eq!(ands, 1);
        assert_eq!(ors, 1);
    }

    #[test]
    fn test_import_extraction() {
        let outcome = parse(indoc! {r#"
            import os
            import requests
            from flask import Flask
            from .local import helper
        "#});
        let mut imports = Vec::new();
        outcome.tree.root.walk(&mut |node| {
            if node.kind == NodeKind::Import {
                imports.push(node.name.clone().unwrap_or_default());
            }
        });
        assert!(imports.contains(&"os".to_string()));
        assert!(imports.contains(&"requests".to_string()));
        assert!(imports.contains(&"flask".to_string()));
        assert!(imports.iter().any(|name| name.starts_with('.')));
    }

    #[test]
    fn test_except_maps_to_catch() {
        let outcome = parse(indoc! {r#"
            try:
                risky()
            except ValueError:
                pass
        "#});
        assert_eq!(outcome.tree.root.count_where(|n| n.kind == NodeKind::Try), 1);
        assert_eq!(
            outcome.tree.root.count_where(|n| n.kind == NodeKind::Catch),
            1
        );
    }
}
