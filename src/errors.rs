use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors surfaced to the caller of an analysis run.
///
/// Parse problems are deliberately absent here: they degrade gracefully
/// (logged, counted on the per-file result) and never abort a run.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("no files matched the given patterns")]
    NoFilesFound,

    #[error("invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("analysis of {path} failed: {source}")]
    FileAnalysis {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl AnalyzeError {
    /// Whether the user can fix the condition without touching the tool.
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            AnalyzeError::NoFilesFound
                | AnalyzeError::Pattern { .. }
                | AnalyzeError::Configuration(_)
        )
    }
}
