use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::Language;

/// A position in a source file, zero-based like tree-sitter points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// One-based line number for issue reporting.
    pub fn line(&self) -> usize {
        self.row + 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

/// Closed set of node kinds the metrics and analyzers understand.
///
/// Grammar kinds outside this set are mapped to `Other` and ignored by
/// every calculation, so new grammar versions cannot break metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Program,
    Function,
    ArrowFunction,
    Method,
    Class,
    Field,
    If,
    Ternary,
    Switch,
    SwitchCase,
    For,
    While,
    DoWhile,
    Try,
    Catch,
    Logical(LogicalOp),
    Import,
    Call,
    Return,
    Statement,
    Other,
}

impl NodeKind {
    /// Decision points for cyclomatic complexity.
    pub fn is_decision_point(&self) -> bool {
        matches!(
            self,
            NodeKind::If
                | NodeKind::Ternary
                | NodeKind::SwitchCase
                | NodeKind::For
                | NodeKind::While
                | NodeKind::DoWhile
                | NodeKind::Catch
        )
    }

    /// Control-flow nodes that contribute to cognitive complexity.
    pub fn is_control_flow(&self) -> bool {
        matches!(
            self,
            NodeKind::If
                | NodeKind::Ternary
                | NodeKind::Switch
                | NodeKind::For
                | NodeKind::While
                | NodeKind::DoWhile
                | NodeKind::Catch
        )
    }

    /// Nodes that open a new nesting level for their subtree.
    pub fn increases_nesting(&self) -> bool {
        matches!(
            self,
            NodeKind::If
                | NodeKind::Switch
                | NodeKind::For
                | NodeKind::While
                | NodeKind::DoWhile
                | NodeKind::Try
                | NodeKind::Catch
        )
    }

    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeKind::Function | NodeKind::ArrowFunction | NodeKind::Method
        )
    }

    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            NodeKind::Statement
                | NodeKind::If
                | NodeKind::Switch
                | NodeKind::For
                | NodeKind::While
                | NodeKind::DoWhile
                | NodeKind::Try
                | NodeKind::Return
                | NodeKind::Import
        )
    }
}

/// A node in the language-neutral syntax tree.
///
/// Ownership is strictly tree-shaped: children are owned by their parent
/// and the whole tree is owned by one file's analysis task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub name: Option<String>,
    pub is_abstract: bool,
    pub param_count: usize,
    pub start: Position,
    pub end: Position,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            is_abstract: false,
            param_count: 0,
            start: Position::default(),
            end: Position::default(),
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_span(mut self, start: Position, end: Position) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Pre-order traversal visiting every node once.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Count nodes matching a predicate anywhere in the subtree.
    pub fn count_where(&self, predicate: impl Fn(&Node) -> bool + Copy) -> usize {
        let mut count = 0;
        self.walk(&mut |node| {
            if predicate(node) {
                count += 1;
            }
        });
        count
    }

    pub fn line_span(&self) -> usize {
        self.end.row.saturating_sub(self.start.row) + 1
    }
}

/// The parsed representation of one source file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub root: Node,
    pub language: Language,
}

impl SyntaxTree {
    pub fn new(root: Node, language: Language) -> Self {
        Self { root, language }
    }

    /// An empty tree for files that could not be parsed at all.
    pub fn empty(language: Language) -> Self {
        Self {
            root: Node::new(NodeKind::Program),
            language,
        }
    }
}

/// A lexical token surfaced alongside the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub line: usize,
}

/// A non-fatal problem reported by a parser provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostic {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// Everything a parser provider returns for one file.
#[derive(Clone, Debug)]
pub struct ParseOutcome {
    pub tree: SyntaxTree,
    pub tokens: Vec<Token>,
    pub errors: Vec<ParseDiagnostic>,
}

/// A source file handed to the pipeline. Read-only input owned by the
/// caller; the pipeline never mutates it.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: Language,
    pub content: String,
    pub modified: chrono::DateTime<chrono::Utc>,
}
