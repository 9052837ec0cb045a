pub mod aggregate;

use crate::core::ast::{Node, NodeKind, SyntaxTree};
use crate::core::{ComplexityMetrics, CouplingMetrics, Dependency, FileMetrics, Language};

/// Comment delimiters used by the line counter, keyed by language.
#[derive(Clone, Copy, Debug)]
pub struct CommentSyntax {
    pub line_prefixes: &'static [&'static str],
    pub block: Option<(&'static str, &'static str)>,
}

impl CommentSyntax {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Python => Self {
                line_prefixes: &["#"],
                block: None,
            },
            _ => Self {
                line_prefixes: &["//"],
                block: Some(("/*", "*/")),
            },
        }
    }
}

/// Count non-blank, non-comment lines. Block-comment state carries across
/// lines, so the interior of a multi-line comment never counts.
pub fn count_code_lines(content: &str, syntax: &CommentSyntax) -> usize {
    let mut in_block = false;
    let mut count = 0;

    for line in content.lines() {
        if line_has_code(line.trim(), syntax, &mut in_block) {
            count += 1;
        }
    }

    count
}

fn line_has_code(line: &str, syntax: &CommentSyntax, in_block: &mut bool) -> bool {
    let mut rest = line;
    let mut has_code = false;

    loop {
        if *in_block {
            let Some((_, close)) = syntax.block else {
                *in_block = false;
                continue;
            };
            match rest.find(close) {
                Some(idx) => {
                    rest = rest[idx + close.len()..].trim_start();
                    *in_block = false;
                }
                None => break,
            }
            continue;
        }

        if rest.is_empty() {
            break;
        }

        let line_idx = syntax
            .line_prefixes
            .iter()
            .filter_map(|prefix| rest.find(prefix))
            .min();
        let block_idx = syntax.block.and_then(|(open, _)| rest.find(open));

        match (line_idx, block_idx) {
            (Some(l), Some(b)) if l <= b => {
                has_code |= !rest[..l].trim().is_empty();
                break;
            }
            (Some(l), None) => {
                has_code |= !rest[..l].trim().is_empty();
                break;
            }
            (_, Some(b)) => {
                has_code |= !rest[..b].trim().is_empty();
                let open_len = syntax.block.map(|(open, _)| open.len()).unwrap_or(0);
                rest = &rest[b + open_len..];
                *in_block = true;
            }
            (None, None) => {
                has_code = true;
                break;
            }
        }
    }

    has_code
}

/// Cyclomatic complexity: base 1, +1 per decision point, +1 per logical
/// short-circuit operator.
pub fn cyclomatic(node: &Node) -> u32 {
    1 + node.count_where(|n| {
        n.kind.is_decision_point() || matches!(n.kind, NodeKind::Logical(_))
    }) as u32
}

/// Cognitive complexity: control-flow nodes cost `1 + nesting`, logical
/// operators cost a flat 1, and nesting increments are local to the
/// subtree of the node that introduced them.
pub fn cognitive(root: &Node) -> u32 {
    root.children
        .iter()
        .map(|child| cognitive_node(child, 0))
        .sum()
}

fn cognitive_node(node: &Node, nesting: u32) -> u32 {
    let own = if node.kind.is_control_flow() {
        1 + nesting
    } else if matches!(node.kind, NodeKind::Logical(_)) {
        1
    } else {
        0
    };

    let child_nesting = if node.kind.increases_nesting() {
        nesting + 1
    } else {
        nesting
    };

    own + node
        .children
        .iter()
        .map(|child| cognitive_node(child, child_nesting))
        .sum::<u32>()
}

/// Deepest chain of nesting-inducing nodes.
pub fn max_nesting(root: &Node) -> u32 {
    fn walk(node: &Node, current: u32) -> u32 {
        let depth = if node.kind.increases_nesting() {
            current + 1
        } else {
            current
        };
        node.children
            .iter()
            .map(|child| walk(child, depth))
            .max()
            .unwrap_or(depth)
            .max(depth)
    }
    walk(root, 0)
}

pub fn count_statements(root: &Node) -> usize {
    root.count_where(|n| n.kind.is_statement())
}

pub fn count_functions(root: &Node) -> usize {
    root.count_where(|n| n.kind.is_function_like())
}

pub fn count_classes(root: &Node) -> usize {
    root.count_where(|n| n.kind == NodeKind::Class)
}

/// Efferent coupling counts distinct external dependency names; afferent
/// stays 0 in single-file scope, so instability is e/(a+e) guarded to 0.
pub fn coupling(root: &Node, dependencies: &[Dependency]) -> CouplingMetrics {
    let mut external: Vec<&str> = dependencies
        .iter()
        .filter(|dep| !dep.is_local)
        .map(|dep| dep.name.as_str())
        .collect();
    external.sort_unstable();
    external.dedup();

    let efferent = external.len() as u32;
    let afferent = 0u32;
    let instability = if afferent + efferent == 0 {
        0.0
    } else {
        f64::from(efferent) / f64::from(afferent + efferent)
    };

    CouplingMetrics {
        afferent,
        efferent,
        instability,
        abstractness: abstractness(root),
    }
}

/// Fraction of classes that are abstract, either via an explicit marker
/// or by declaring only abstract methods.
pub fn abstractness(root: &Node) -> f64 {
    let mut classes = 0usize;
    let mut abstract_classes = 0usize;

    root.walk(&mut |node| {
        if node.kind != NodeKind::Class {
            return;
        }
        classes += 1;
        if node.is_abstract {
            abstract_classes += 1;
            return;
        }
        let (methods, abstract_methods) = method_counts(node);
        if methods > 0 && methods == abstract_methods {
            abstract_classes += 1;
        }
    });

    if classes == 0 {
        0.0
    } else {
        abstract_classes as f64 / classes as f64
    }
}

fn method_counts(class: &Node) -> (usize, usize) {
    let mut methods = 0;
    let mut abstract_methods = 0;
    visit_members(class, &mut |member| {
        if member.kind == NodeKind::Method {
            methods += 1;
            if member.is_abstract {
                abstract_methods += 1;
            }
        }
    });
    (methods, abstract_methods)
}

/// Visit a class's own members, stopping at nested classes and not
/// descending into member bodies.
fn visit_members(node: &Node, visit: &mut impl FnMut(&Node)) {
    for child in &node.children {
        match child.kind {
            NodeKind::Class => continue,
            NodeKind::Method | NodeKind::Field => visit(child),
            _ => visit_members(child, visit),
        }
    }
}

/// Simplified lack-of-cohesion proxy: per class `min(1, fields/methods)`
/// with divide-by-zero guarded to 1; file value is the unweighted mean,
/// or 1 when the file defines no classes.
pub fn cohesion(root: &Node) -> f64 {
    let mut scores = Vec::new();

    root.walk(&mut |node| {
        if node.kind != NodeKind::Class {
            return;
        }
        let mut methods = 0usize;
        let mut fields = 0usize;
        visit_members(node, &mut |member| match member.kind {
            NodeKind::Method => methods += 1,
            NodeKind::Field => fields += 1,
            _ => {}
        });
        let score = if methods == 0 || fields == 0 {
            1.0
        } else {
            (fields as f64 / methods as f64).min(1.0)
        };
        scores.push(score);
    });

    if scores.is_empty() {
        1.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// Derive the full per-file metric set from tree, raw text and extracted
/// dependencies. Deterministic: same inputs always yield the same value.
pub fn compute_file_metrics(
    tree: &SyntaxTree,
    content: &str,
    dependencies: &[Dependency],
) -> FileMetrics {
    let syntax = CommentSyntax::for_language(tree.language);
    let lines_of_code = count_code_lines(content, &syntax);

    FileMetrics {
        lines: content.lines().count(),
        statements: count_statements(&tree.root),
        functions: count_functions(&tree.root),
        classes: count_classes(&tree.root),
        complexity: ComplexityMetrics {
            cyclomatic: cyclomatic(&tree.root),
            cognitive: cognitive(&tree.root),
            nesting: max_nesting(&tree.root),
            lines_of_code,
        },
        coupling: coupling(&tree.root, dependencies),
        cohesion: cohesion(&tree.root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ast::LogicalOp;

    fn js_syntax() -> CommentSyntax {
        CommentSyntax::for_language(Language::JavaScript)
    }

    #[test]
    fn test_straight_line_code_has_cyclomatic_one() {
        let root = Node::new(NodeKind::Program).with_children(vec![
            Node::new(NodeKind::Statement),
            Node::new(NodeKind::Statement),
        ]);
        assert_eq!(cyclomatic(&root), 1);
    }

    #[test]
    fn test_cyclomatic_counts_branches_and_logicals() {
        // if (a && b) {} => base 1 + if + &&
        let root = Node::new(NodeKind::Program).with_children(vec![Node::new(NodeKind::If)
            .with_children(vec![Node::new(NodeKind::Logical(LogicalOp::And))])]);
        assert_eq!(cyclomatic(&root), 3);
    }

    #[test]
    fn test_cognitive_flat_if_with_logical() {
        let root = Node::new(NodeKind::Program).with_children(vec![Node::new(NodeKind::If)
            .with_children(vec![Node::new(NodeKind::Logical(LogicalOp::And))])]);
        // 1 for the if at nesting 0, flat 1 for the operator.
        assert_eq!(cognitive(&root), 2);
    }

    #[test]
    fn test_cognitive_monotone_in_nesting() {
        // Same node count, increasing depth: cognitive must strictly grow.
        fn nested_ifs(depth: usize) -> Node {
            let mut node = Node::new(NodeKind::If);
            for _ in 1..depth {
                node = Node::new(NodeKind::If).with_children(vec![node]);
            }
            Node::new(NodeKind::Program).with_children(vec![node])
        }
        fn flat_ifs(count: usize) -> Node {
            Node::new(NodeKind::Program)
                .with_children((0..count).map(|_| Node::new(NodeKind::If)).collect())
        }

        let mut previous = cognitive(&nested_ifs(1));
        for depth in 2..=6 {
            let current = cognitive(&nested_ifs(depth));
            assert!(current > previous, "depth {depth} did not increase cost");
            assert!(current > cognitive(&flat_ifs(depth)));
            previous = current;
        }
    }

    #[test]
    fn test_sibling_branches_do_not_inherit_nesting() {
        // Two sibling ifs at top level: each costs 1, not 1 then 2.
        let root = Node::new(NodeKind::Program)
            .with_children(vec![Node::new(NodeKind::If), Node::new(NodeKind::If)]);
        assert_eq!(cognitive(&root), 2);
    }

    #[test]
    fn test_try_nests_but_does_not_contribute() {
        let root = Node::new(NodeKind::Program).with_children(vec![Node::new(NodeKind::Try)
            .with_children(vec![Node::new(NodeKind::If)])]);
        // try adds nesting only; the inner if costs 1 + 1.
        assert_eq!(cognitive(&root), 2);
    }

    #[test]
    fn test_max_nesting_depth() {
        let root = Node::new(NodeKind::Program).with_children(vec![Node::new(NodeKind::If)
            .with_children(vec![Node::new(NodeKind::For)
                .with_children(vec![Node::new(NodeKind::While)])])]);
        assert_eq!(max_nesting(&root), 3);
    }

    #[test]
    fn test_count_code_lines_skips_comments_and_blanks() {
        let content = "const x = 1;\n\n// comment\nconst y = 2; // trailing\n";
        assert_eq!(count_code_lines(content, &js_syntax()), 2);
    }

    #[test]
    fn test_block_comment_only_file_counts_zero() {
        let content = "/*\n * header\n * more\n */\n";
        assert_eq!(count_code_lines(content, &js_syntax()), 0);
    }

    #[test]
    fn test_code_around_block_comment_counts() {
        let content = "const a = 1; /* start\nstill comment\nend */ const b = 2;\n";
        assert_eq!(count_code_lines(content, &js_syntax()), 2);
    }

    #[test]
    fn test_python_hash_comments() {
        let syntax = CommentSyntax::for_language(Language::Python);
        let content = "# module docs\nx = 1\n   # indented comment\ny = 2  # inline\n";
        assert_eq!(count_code_lines(content, &syntax), 2);
    }

    #[test]
    fn test_coupling_distinct_external_names() {
        let root = Node::new(NodeKind::Program);
        let deps = vec![
            Dependency::new("express"),
            Dependency::new("express"),
            Dependency::new("lodash"),
            Dependency::new("./local"),
        ];
        let coupling = coupling(&root, &deps);
        assert_eq!(coupling.efferent, 2);
        assert_eq!(coupling.afferent, 0);
        assert_eq!(coupling.instability, 1.0);
    }

    #[test]
    fn test_instability_zero_when_no_dependencies() {
        let root = Node::new(NodeKind::Program);
        assert_eq!(coupling(&root, &[]).instability, 0.0);
    }

    #[test]
    fn test_abstractness_counts_marker_and_all_abstract() {
        let explicit = {
            let mut class = Node::new(NodeKind::Class);
            class.is_abstract = true;
            class
        };
        let implicit = Node::new(NodeKind::Class).with_children(vec![{
            let mut m = Node::new(NodeKind::Method);
            m.is_abstract = true;
            m
        }]);
        let concrete =
            Node::new(NodeKind::Class).with_children(vec![Node::new(NodeKind::Method)]);
        let root =
            Node::new(NodeKind::Program).with_children(vec![explicit, implicit, concrete]);
        let value = abstractness(&root);
        assert!((value - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_cohesion_file_without_classes_is_one() {
        let root = Node::new(NodeKind::Program)
            .with_children(vec![Node::new(NodeKind::Function)]);
        assert_eq!(cohesion(&root), 1.0);
    }

    #[test]
    fn test_cohesion_guards_divide_by_zero() {
        // No fields: guard returns 1 for the class.
        let methods_only =
            Node::new(NodeKind::Class).with_children(vec![Node::new(NodeKind::Method)]);
        let root = Node::new(NodeKind::Program).with_children(vec![methods_only]);
        assert_eq!(cohesion(&root), 1.0);

        // No methods: also 1.
        let fields_only =
            Node::new(NodeKind::Class).with_children(vec![Node::new(NodeKind::Field)]);
        let root = Node::new(NodeKind::Program).with_children(vec![fields_only]);
        assert_eq!(cohesion(&root), 1.0);
    }

    #[test]
    fn test_cohesion_ratio_capped_at_one() {
        let class = Node::new(NodeKind::Class).with_children(vec![
            Node::new(NodeKind::Field),
            Node::new(NodeKind::Field),
            Node::new(NodeKind::Field),
            Node::new(NodeKind::Method),
            Node::new(NodeKind::Method),
        ]);
        let root = Node::new(NodeKind::Program).with_children(vec![class]);
        assert_eq!(cohesion(&root), 1.0);

        let sparse = Node::new(NodeKind::Class).with_children(vec![
            Node::new(NodeKind::Field),
            Node::new(NodeKind::Method),
            Node::new(NodeKind::Method),
        ]);
        let root = Node::new(NodeKind::Program).with_children(vec![sparse]);
        assert_eq!(cohesion(&root), 0.5);
    }
}
