//! Shared fixtures for analyzer unit tests.

use std::path::{Path, PathBuf};

use crate::config::AnalysisConfig;
use crate::core::ast::{SourceFile, SyntaxTree};
use crate::core::Language;
use crate::parsers::provider_for;

pub fn context_for_js(content: &str) -> (SourceFile, SyntaxTree, AnalysisConfig) {
    context_for(content, Language::JavaScript, "src/app.js")
}

pub fn context_for_python(content: &str) -> (SourceFile, SyntaxTree, AnalysisConfig) {
    context_for(content, Language::Python, "src/app.py")
}

pub fn context_at_path(
    content: &str,
    language: Language,
    path: &str,
) -> (SourceFile, SyntaxTree, AnalysisConfig) {
    context_for(content, language, path)
}

fn context_for(
    content: &str,
    language: Language,
    path: &str,
) -> (SourceFile, SyntaxTree, AnalysisConfig) {
    let provider = provider_for(language).expect("provider registered");
    let outcome = provider
        .parse(content, Path::new(path))
        .expect("fixture parses");
    let source = SourceFile {
        path: PathBuf::from(path),
        language,
        content: content.to_string(),
        modified: chrono::Utc::now(),
    };
    (source, outcome.tree, AnalysisConfig::default())
}
