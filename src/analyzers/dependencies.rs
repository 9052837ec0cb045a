use crate::core::ast::{NodeKind, SyntaxTree};
use crate::core::Dependency;

/// Extract import/require relationships from a parsed tree. The parser
/// providers already normalize every import form to `NodeKind::Import`,
/// so this pass is language-independent.
pub fn extract_dependencies(tree: &SyntaxTree) -> Vec<Dependency> {
    let mut dependencies = Vec::new();
    tree.root.walk(&mut |node| {
        if node.kind != NodeKind::Import {
            return;
        }
        if let Some(name) = &node.name {
            if !name.is_empty() {
                dependencies.push(Dependency::new(name.clone()));
            }
        }
    });
    dependencies
}
