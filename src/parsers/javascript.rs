use anyhow::{Context, Result};
use std::path::Path;
use tree_sitter::Parser;

use super::{collect_errors, collect_tokens, ParserProvider};
use crate::core::ast::{LogicalOp, Node, NodeKind, ParseOutcome, Position, SyntaxTree};
use crate::core::Language;

/// Parser provider for JavaScript and TypeScript backed by tree-sitter.
pub struct JavaScriptParser {
    language: Language,
}

impl JavaScriptParser {
    pub fn javascript() -> Self {
        Self {
            language: Language::JavaScript,
        }
    }

    pub fn typescript() -> Self {
        Self {
            language: Language::TypeScript,
        }
    }

    fn grammar(&self) -> tree_sitter::Language {
        match self.language {
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            _ => tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

impl ParserProvider for JavaScriptParser {
    fn parse(&self, content: &str, path: &Path) -> Result<ParseOutcome> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.grammar())
            .context("failed to set JS/TS grammar")?;

        let tree = parser
            .parse(content, None)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let root = tree.root_node();
        let mut tokens = Vec::new();
        collect_tokens(root, content, &mut tokens);
        let mut errors = Vec::new();
        collect_errors(root, &mut errors);

        let mapped = map_node(root, content);
        Ok(ParseOutcome {
            tree: SyntaxTree::new(mapped, self.language),
            tokens,
            errors,
        })
    }

    fn language(&self) -> Language {
        self.language
    }
}

fn position(point: tree_sitter::Point) -> Position {
    Position::new(point.row, point.column)
}

fn node_text<'a>(node: tree_sitter::Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Map a tree-sitter node into the closed metric vocabulary. ES imports,
/// `require()` calls and dynamic `import()` all normalize to Import.
fn map_node(ts: tree_sitter::Node, source: &str) -> Node {
    let kind = classify(ts, source);

    let mut node = Node::new(kind)
        .with_span(position(ts.start_position()), position(ts.end_position()));

    match kind {
        NodeKind::Function | NodeKind::ArrowFunction | NodeKind::Method => {
            node.name = function_name(ts, source);
            node.param_count = param_count(ts);
            node.is_abstract = ts.kind() == "abstract_method_signature";
        }
        NodeKind::Class => {
            node.name = ts
                .child_by_field_name("name")
                .map(|n| node_text(n, source).to_string());
            node.is_abstract = ts.kind() == "abstract_class_declaration";
        }
        NodeKind::Field => {
            node.name = ts
                .child_by_field_name("property")
                .or_else(|| ts.child_by_field_name("name"))
                .map(|n| node_text(n, source).to_string());
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

    node.children = ts
        .children(&mut ts.walk())
        .map(|child| map_node(child, source))
        .collect();
    node
}

fn classify(ts: tree_sitter::Node, source: &str) -> NodeKind {
    match ts.kind() {
        "program" => NodeKind::Program,
        "function_declaration"
        | "function_expression"
        | "function"
        | "generator_function"
        | "generator_function_declaration" => NodeKind::Function,
        "arrow_function" => NodeKind::ArrowFunction,
        "method_definition" | "abstract_method_signature" => NodeKind::Method,
        "class_declaration" | "class" | "abstract_class_declaration" => NodeKind::Class,
        "field_definition" | "public_field_definition" => NodeKind::Field,
        "if_statement" => NodeKind::If,
        "ternary_expression" => NodeKind::Ternary,
        "switch_statement" => NodeKind::Switch,
        "switch_case" => NodeKind::SwitchCase,
        "for_statement" => NodeKind::For,
        "for_in_statement" | "for_of_statement" => NodeKind::For,
        "while_statement" => NodeKind::While,
        "do_statement" => NodeKind::DoWhile,
        "try_statement" => NodeKind::Try,
        "catch_clause" => NodeKind::Catch,
        "binary_expression" => match logical_operator(ts, source) {
            Some(op) => NodeKind::Logical(op),
            None => NodeKind::Other,
        },
        "import_statement" => NodeKind::Import,
        "call_expression" => {
            if require_argument(ts, source).is_some() {
                NodeKind::Import
            } else {
                NodeKind::Call
            }
        }
        "return_statement" => NodeKind::Return,
        "expression_statement" | "lexical_declaration" | "variable_declaration"
        | "throw_statement" | "break_statement" | "continue_statement" => NodeKind::Statement,
        _ => NodeKind::Other,
    }
}

fn logical_operator(ts: tree_sitter::Node, source: &str) -> Option<LogicalOp> {
    let op = ts.child_by_field_name("operator")?;
    match node_text(op, source) {
        "&&" => Some(LogicalOp::And),
        "||" => Some(LogicalOp::Or),
        _ => None,
    }
}

/// Module specifier for either an ES import or a require()/import() call.
fn import_specifier(ts: tree_sitter::Node, source: &str) -> Option<String> {
    if ts.kind() == "import_statement" {
        return ts
            .child_by_field_name("source")
            .map(|n| trim_quotes(node_text(n, source)));
    }
    require_argument(ts, source)
}

fn require_argument(ts: tree_sitter::Node, source: &str) -> Option<String> {
    if ts.kind() != "call_expression" {
        return None;
    }
    let function = ts.child_by_field_name("function")?;
    let callee = node_text(function, source);
    if callee != "require" && function.kind() != "import" {
        return None;
    }
    let args = ts.child_by_field_name("arguments")?;
    args.children(&mut args.walk())
        .find(|child| child.kind() == "string")
        .map(|child| trim_quotes(node_text(child, source)))
}

fn trim_quotes(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}

fn function_name(ts: tree_sitter::Node, source: &str) -> Option<String> {
    if let Some(name) = ts.child_by_field_name("name") {
        return Some(node_text(name, source).to_string());
    }

    // Arrow functions borrow the name of the variable they are bound to.
    if ts.kind() == "arrow_function" {
        if let Some(parent) = ts.parent() {
            if parent.kind() == "variable_declarator" {
                if let Some(name) = parent.child_by_field_name("name") {
                    return Some(node_text(name, source).to_string());
                }
            }
        }
    }

    None
}

fn param_count(ts: tree_sitter::Node) -> usize {
    ts.child_by_field_name("parameters")
        .map(|params| params.named_child_count())
        .unwrap_or(0)
}
