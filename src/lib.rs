// Export modules for library usage
pub mod analyzers;
pub mod cache;
pub mod config;
pub mod core;
pub mod engine;
pub mod errors;
pub mod insights;
pub mod io;
pub mod metrics;
pub mod orchestrator;
pub mod parsers;

// Re-export commonly used types
pub use crate::core::{
    AiInsights, AnalysisResult, AnalysisSummary, CodeIssue, CodeMetrics, DetectedPattern,
    FileAnalysisResult, FileMetrics, IssueCategory, Language, Priority, QualityPrediction,
    RiskAssessment, Severity, StrategicRecommendation,
};

pub use crate::config::{AnalysisConfig, ReportFormat, Thresholds, UpdateFrequency};

pub use crate::engine::Engine;
pub use crate::errors::AnalyzeError;
pub use crate::orchestrator::{AnalysisObserver, Orchestrator};

pub use crate::io::output::{create_writer, render_terminal_summary, OutputWriter};

pub use crate::parsers::{provider_for, ParserProvider};
