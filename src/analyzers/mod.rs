pub mod complexity;
pub mod dependencies;
pub mod documentation;
pub mod performance;
pub mod security;
pub mod smells;
pub mod testing;

#[cfg(test)]
pub(crate) mod testkit;

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::core::ast::{SourceFile, SyntaxTree};
use crate::core::CodeIssue;

/// Closed set of category analyzers. Configuration toggles select which
/// variants run; there is no open-ended runtime registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalyzerKind {
    Complexity,
    Security,
    Performance,
    Documentation,
    Testing,
    CodeSmell,
}

/// Read-only inputs shared by every analyzer pass over one file. All
/// passes see the same immutable tree and write to independent issue
/// lists, so they can run concurrently without locks.
pub struct AnalyzerContext<'a> {
    pub tree: &'a SyntaxTree,
    pub source: &'a SourceFile,
    pub config: &'a AnalysisConfig,
}

impl AnalyzerKind {
    /// The analyzers enabled by the given configuration. Complexity and
    /// code-smell detection always run; the rest are gated.
    pub fn enabled(config: &AnalysisConfig) -> Vec<AnalyzerKind> {
        let mut kinds = vec![AnalyzerKind::Complexity];
        if config.enable_security_scan {
            kinds.push(AnalyzerKind::Security);
        }
        if config.enable_performance_analysis {
            kinds.push(AnalyzerKind::Performance);
        }
        if config.enable_documentation_analysis {
            kinds.push(AnalyzerKind::Documentation);
        }
        if config.enable_test_analysis {
            kinds.push(AnalyzerKind::Testing);
        }
        kinds.push(AnalyzerKind::CodeSmell);
        kinds
    }

    /// Uniform entry point: one pure pass over the tree and text.
    pub fn run(&self, ctx: &AnalyzerContext) -> Vec<CodeIssue> {
        match self {
            AnalyzerKind::Complexity => complexity::analyze(ctx),
            AnalyzerKind::Security => security::analyze(ctx),
            AnalyzerKind::Performance => performance::analyze(ctx),
            AnalyzerKind::Documentation => documentation::analyze(ctx),
            AnalyzerKind::Testing => testing::analyze(ctx),
            AnalyzerKind::CodeSmell => smells::analyze(ctx),
        }
    }
}
