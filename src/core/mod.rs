pub mod ast;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Unknown,
}

impl Language {
    pub fn from_extension(ext: &str) -> Self {
        static EXTENSION_MAP: &[(&[&str], Language)] = &[
            (&["js", "jsx", "mjs", "cjs"], Language::JavaScript),
            (&["ts", "tsx", "mts", "cts"], Language::TypeScript),
            (&["py", "pyi"], Language::Python),
        ];

        EXTENSION_MAP
            .iter()
            .find(|(exts, _)| exts.contains(&ext))
            .map(|(_, lang)| *lang)
            .unwrap_or(Language::Unknown)
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Detect by extension first, falling back to content heuristics for
    /// extensionless scripts (shebangs, keyword scan).
    pub fn detect(path: &Path, content: &str) -> Self {
        let by_extension = Self::from_path(path);
        if by_extension != Language::Unknown {
            return by_extension;
        }
        Self::from_content(content)
    }

    fn from_content(content: &str) -> Self {
        let first_line = content.lines().next().unwrap_or("");
        if first_line.starts_with("#!") {
            if first_line.contains("python") {
                return Language::Python;
            }
            if first_line.contains("node") || first_line.contains("deno") {
                return Language::JavaScript;
            }
        }

        let head: String = content.lines().take(50).collect::<Vec<_>>().join("\n");
        if head.contains("def ") && head.contains("import ") && !head.contains("function ") {
            return Language::Python;
        }
        if head.contains("function ") || head.contains("=> ") || head.contains("const ") {
            return Language::JavaScript;
        }

        Language::Unknown
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(Language, &str)] = &[
            (Language::JavaScript, "JavaScript"),
            (Language::TypeScript, "TypeScript"),
            (Language::Python, "Python"),
            (Language::Unknown, "Unknown"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(l, _)| l == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Complexity,
    Security,
    Performance,
    Documentation,
    Testing,
    Maintainability,
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(IssueCategory, &str)] = &[
            (IssueCategory::Complexity, "Complexity"),
            (IssueCategory::Security, "Security"),
            (IssueCategory::Performance, "Performance"),
            (IssueCategory::Documentation, "Documentation"),
            (IssueCategory::Testing, "Testing"),
            (IssueCategory::Maintainability, "Maintainability"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(c, _)| c == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(Priority, &str)] = &[
            (Priority::Low, "Low"),
            (Priority::Medium, "Medium"),
            (Priority::High, "High"),
            (Priority::Critical, "Critical"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(p, _)| p == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// One finding produced by a single category analyzer. Immutable after
/// creation; lives for one analysis run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CodeIssue {
    pub id: String,
    pub file: PathBuf,
    pub severity: Severity,
    pub category: IssueCategory,
    pub rule: String,
    pub message: String,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub ai_confidence: f64,
    pub recommendation: Option<String>,
}

impl CodeIssue {
    /// Identity is derived from rule and location so repeated runs over
    /// the same tree produce identical issue ids.
    pub fn new(
        rule: impl Into<String>,
        category: IssueCategory,
        severity: Severity,
        file: &Path,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        let rule = rule.into();
        Self {
            id: format!("{}-{}-{}", rule, file.display(), line),
            file: file.to_path_buf(),
            severity,
            category,
            rule,
            message: message.into(),
            start_line: line,
            start_column: 0,
            end_line: line,
            end_column: 0,
            ai_confidence: 0.5,
            recommendation: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.ai_confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn with_span(mut self, start: (usize, usize), end: (usize, usize)) -> Self {
        self.start_line = start.0;
        self.start_column = start.1;
        self.end_line = end.0;
        self.end_column = end.1;
        self
    }
}

/// An outgoing dependency extracted from import/require forms. Relative
/// specifiers are local and excluded from efferent coupling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub is_local: bool,
}

impl Dependency {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let is_local = name.starts_with('.') || name.starts_with('/');
        Self { name, is_local }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    pub cyclomatic: u32,
    pub cognitive: u32,
    pub nesting: u32,
    pub lines_of_code: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CouplingMetrics {
    /// Incoming dependencies. Always 0 in single-file scope; cross-file
    /// afferent coupling is an explicit extension point, not computed here.
    pub afferent: u32,
    pub efferent: u32,
    pub instability: f64,
    pub abstractness: f64,
}

impl Default for CouplingMetrics {
    fn default() -> Self {
        Self {
            afferent: 0,
            efferent: 0,
            instability: 0.0,
            abstractness: 0.0,
        }
    }
}

/// Structural metrics for one file, derived deterministically from its
/// tree, raw text and extracted dependencies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub lines: usize,
    pub statements: usize,
    pub functions: usize,
    pub classes: usize,
    pub complexity: ComplexityMetrics,
    pub coupling: CouplingMetrics,
    pub cohesion: f64,
}

impl Default for FileMetrics {
    fn default() -> Self {
        Self {
            lines: 0,
            statements: 0,
            functions: 0,
            classes: 0,
            complexity: ComplexityMetrics::default(),
            coupling: CouplingMetrics::default(),
            // Non-OOP code is treated as maximally cohesive.
            cohesion: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub security: f64,
    pub performance: f64,
    pub reliability: f64,
    pub testability: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtScore {
    pub score: f64,
    pub estimated_hours: f64,
    pub estimated_cost: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageMetrics {
    pub test: f64,
    pub documentation: f64,
}

/// Project-level aggregate. All component scores lie in [0,100]; debt
/// hours and cost are non-negative.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeMetrics {
    pub total_files: usize,
    pub total_lines: usize,
    pub total_functions: usize,
    pub total_classes: usize,
    pub average_complexity: f64,
    pub max_complexity: u32,
    pub maintainability: f64,
    pub coverage: CoverageMetrics,
    pub quality: QualityScore,
    pub debt: DebtScore,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysisResult {
    pub path: PathBuf,
    pub language: Language,
    pub metrics: FileMetrics,
    pub issues: Vec<CodeIssue>,
    pub dependencies: Vec<String>,
    pub parse_errors: usize,
}

impl FileAnalysisResult {
    /// Graceful-degradation result for files whose language could not be
    /// detected: empty metrics, no issues, no failure.
    pub fn unknown(path: PathBuf) -> Self {
        Self {
            path,
            language: Language::Unknown,
            metrics: FileMetrics::default(),
            issues: Vec::new(),
            dependencies: Vec::new(),
            parse_errors: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub files_analyzed: usize,
    pub total_issues: usize,
    pub critical_issues: usize,
    pub error_issues: usize,
    pub warning_issues: usize,
    pub info_issues: usize,
}

impl AnalysisSummary {
    pub fn from_issues(files_analyzed: usize, issues: &[CodeIssue]) -> Self {
        let count = |sev: Severity| issues.iter().filter(|i| i.severity == sev).count();
        Self {
            files_analyzed,
            total_issues: issues.len(),
            critical_issues: count(Severity::Critical),
            error_issues: count(Severity::Error),
            warning_issues: count(Severity::Warning),
            info_issues: count(Severity::Info),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Design,
    AntiPattern,
    Structural,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedPattern {
    pub name: String,
    pub kind: PatternKind,
    pub occurrences: usize,
    pub confidence: f64,
    pub files: Vec<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityPrediction {
    pub metric: String,
    pub current: f64,
    pub predicted: f64,
    pub confidence: f64,
    pub factors: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategicRecommendation {
    pub area: String,
    pub title: String,
    pub priority: Priority,
    pub rationale: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub name: String,
    pub likelihood: f64,
    pub impact: f64,
    pub mitigations: Vec<String>,
}

/// Derived insight bundle. All four lists are always present, possibly
/// empty when AI-assisted analysis is disabled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AiInsights {
    pub patterns: Vec<DetectedPattern>,
    pub predictions: Vec<QualityPrediction>,
    pub recommendations: Vec<StrategicRecommendation>,
    pub risks: Vec<RiskAssessment>,
}

/// The top-level value produced by one orchestrator run. Immutable after
/// construction and serializable to JSON without loss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub files: Vec<FileAnalysisResult>,
    pub summary: AnalysisSummary,
    pub metrics: CodeMetrics,
    pub issues: Vec<CodeIssue>,
    pub recommendations: Vec<StrategicRecommendation>,
    pub insights: AiInsights,
}
