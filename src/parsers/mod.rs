pub mod javascript;
pub mod python;

use anyhow::Result;
use std::path::Path;

use crate::core::ast::{ParseDiagnostic, ParseOutcome, Token};
use crate::core::Language;

/// Pluggable parsing capability keyed by detected language.
///
/// Providers return a language-neutral tree plus the token stream and any
/// parse diagnostics; diagnostics never abort analysis.
pub trait ParserProvider: Send + Sync {
    fn parse(&self, content: &str, path: &Path) -> Result<ParseOutcome>;
    fn language(&self) -> Language;
}

pub fn provider_for(language: Language) -> Option<Box<dyn ParserProvider>> {
    match language {
        Language::JavaScript => Some(Box::new(javascript::JavaScriptParser::javascript())),
        Language::TypeScript => Some(Box::new(javascript::JavaScriptParser::typescript())),
        Language::Python => Some(Box::new(python::PythonParser::new())),
        Language::Unknown => None,
    }
}

/// Collect leaf tokens from a tree-sitter parse.
pub(crate) fn collect_tokens(node: tree_sitter::Node, source: &str, tokens: &mut Vec<Token>) {
    if node.child_count() == 0 {
        if let Ok(text) = node.utf8_text(source.as_bytes()) {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                tokens.push(Token {
                    text: trimmed.to_string(),
                    line: node.start_position().row + 1,
                });
            }
        }
        return;
    }
    for child in node.children(&mut node.walk()) {
        collect_tokens(child, source, tokens);
    }
}

/// Collect error and missing nodes as diagnostics.
pub(crate) fn collect_errors(node: tree_sitter::Node, errors: &mut Vec<ParseDiagnostic>) {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        errors.push(ParseDiagnostic {
            message: if node.is_missing() {
                format!("missing {}", node.kind())
            } else {
                "syntax error".to_string()
            },
            line: pos.row + 1,
            column: pos.column,
        });
        return;
    }
    if !node.has_error() {
        return;
    }
    for child in node.children(&mut node.walk()) {
        collect_errors(child, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_registry_covers_known_languages() {
        for lang in [Language::JavaScript, Language::TypeScript, Language::Python] {
            let provider = provider_for(lang).unwrap();
            assert_eq!(provider.language(), lang);
        }
        assert!(provider_for(Language::Unknown).is_none());
    }
}
