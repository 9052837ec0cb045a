use colored::Colorize;
use std::io::Write;

use crate::config::{OutputConfig, ReportFormat, Verbosity};
use crate::core::{AnalysisResult, CodeIssue, Severity};

/// Renderers are pure projections of an `AnalysisResult`: they never
/// mutate it, and the JSON form round-trips without loss.
pub trait OutputWriter {
    fn write_results(&mut self, results: &AnalysisResult) -> anyhow::Result<()>;
}

pub fn create_writer<W: Write + 'static>(
    writer: W,
    config: &OutputConfig,
) -> Box<dyn OutputWriter> {
    match config.format {
        ReportFormat::Json => Box::new(JsonWriter::new(writer)),
        ReportFormat::Markdown => Box::new(MarkdownWriter::new(writer, config.clone())),
        ReportFormat::Html => Box::new(HtmlWriter::new(writer, config.clone())),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_results(&mut self, results: &AnalysisResult) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(results)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
    config: OutputConfig,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W, config: OutputConfig) -> Self {
        Self { writer, config }
    }

    fn issue_limit(&self) -> usize {
        match self.config.verbosity {
            Verbosity::Normal => 20,
            Verbosity::Detailed => usize::MAX,
        }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_results(&mut self, results: &AnalysisResult) -> anyhow::Result<()> {
        writeln!(self.writer, "# Code Quality Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            results.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;

        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(
            self.writer,
            "| Files analyzed | {} |",
            results.summary.files_analyzed
        )?;
        writeln!(
            self.writer,
            "| Total issues | {} |",
            results.summary.total_issues
        )?;
        writeln!(
            self.writer,
            "| Critical | {} |",
            results.summary.critical_issues
        )?;
        writeln!(
            self.writer,
            "| Maintainability | {:.0} |",
            results.metrics.maintainability
        )?;
        writeln!(self.writer)?;

        if self.config.include_metrics {
            writeln!(self.writer, "## Project Metrics")?;
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "- Lines: {} across {} files",
                results.metrics.total_lines, results.metrics.total_files
            )?;
            writeln!(
                self.writer,
                "- Average cyclomatic complexity: {:.1} (max {})",
                results.metrics.average_complexity, results.metrics.max_complexity
            )?;
            writeln!(
                self.writer,
                "- Quality: security {:.0}, performance {:.0}, reliability {:.0}, testability {:.0}",
                results.metrics.quality.security,
                results.metrics.quality.performance,
                results.metrics.quality.reliability,
                results.metrics.quality.testability
            )?;
            writeln!(
                self.writer,
                "- Debt score {:.0} (~{:.0}h, ${:.0})",
                results.metrics.debt.score,
                results.metrics.debt.estimated_hours,
                results.metrics.debt.estimated_cost
            )?;
            writeln!(self.writer)?;
        }

        if !results.issues.is_empty() {
            writeln!(self.writer, "## Issues")?;
            writeln!(self.writer)?;
            let mut sorted: Vec<&CodeIssue> = results.issues.iter().collect();
            sorted.sort_by(|a, b| b.severity.cmp(&a.severity));
            for issue in sorted.into_iter().take(self.issue_limit()) {
                writeln!(
                    self.writer,
                    "- **{:?}** [{}] {}:{} — {}",
                    issue.severity,
                    issue.rule,
                    issue.file.display(),
                    issue.start_line,
                    issue.message
                )?;
            }
            writeln!(self.writer)?;
        }

        if self.config.include_recommendations && !results.recommendations.is_empty() {
            writeln!(self.writer, "## Recommendations")?;
            writeln!(self.writer)?;
            for rec in &results.recommendations {
                writeln!(
                    self.writer,
                    "- [{}] **{}** ({}): {}",
                    rec.priority, rec.title, rec.area, rec.rationale
                )?;
            }
            writeln!(self.writer)?;
        }

        Ok(())
    }
}

pub struct HtmlWriter<W: Write> {
    writer: W,
    config: OutputConfig,
}

impl<W: Write> HtmlWriter<W> {
    pub fn new(writer: W, config: OutputConfig) -> Self {
        Self { writer, config }
    }
}

impl<W: Write> OutputWriter for HtmlWriter<W> {
    fn write_results(&mut self, results: &AnalysisResult) -> anyhow::Result<()> {
        let esc = |s: &str| html_escape::encode_text(s).into_owned();

        writeln!(self.writer, "<!DOCTYPE html>")?;
        writeln!(
            self.writer,
            "<html><head><meta charset=\"utf-8\"><title>Code Quality Report</title></head><body>"
        )?;
        writeln!(self.writer, "<h1>Code Quality Report</h1>")?;
        writeln!(
            self.writer,
            "<p>Generated: {}</p>",
            results.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(
            self.writer,
            "<p>{} files, {} issues ({} critical)</p>",
            results.summary.files_analyzed,
            results.summary.total_issues,
            results.summary.critical_issues
        )?;

        if self.config.include_metrics {
            writeln!(
                self.writer,
                "<h2>Metrics</h2><ul><li>Maintainability: {:.0}</li><li>Average complexity: {:.1}</li><li>Debt score: {:.0}</li></ul>",
                results.metrics.maintainability,
                results.metrics.average_complexity,
                results.metrics.debt.score
            )?;
        }

        if !results.issues.is_empty() {
            writeln!(self.writer, "<h2>Issues</h2><ul>")?;
            for issue in &results.issues {
                writeln!(
                    self.writer,
                    "<li>[{:?}] {}:{} — {}</li>",
                    issue.severity,
                    esc(&issue.file.display().to_string()),
                    issue.start_line,
                    esc(&issue.message)
                )?;
            }
            writeln!(self.writer, "</ul>")?;
        }

        if self.config.include_recommendations && !results.recommendations.is_empty() {
            writeln!(self.writer, "<h2>Recommendations</h2><ul>")?;
            for rec in &results.recommendations {
                writeln!(
                    self.writer,
                    "<li>[{}] {} — {}</li>",
                    rec.priority,
                    esc(&rec.title),
                    esc(&rec.rationale)
                )?;
            }
            writeln!(self.writer, "</ul>")?;
        }

        writeln!(self.writer, "</body></html>")?;
        Ok(())
    }
}

/// Colored one-screen summary for interactive runs.
pub fn render_terminal_summary(results: &AnalysisResult) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} files analyzed in {}ms\n",
        "✓".green().bold(),
        results.summary.files_analyzed,
        results.duration_ms
    ));
    out.push_str(&format!(
        "  issues: {} ({} critical, {} error, {} warning, {} info)\n",
        results.summary.total_issues,
        results.summary.critical_issues.to_string().red(),
        results.summary.error_issues,
        results.summary.warning_issues,
        results.summary.info_issues
    ));
    out.push_str(&format!(
        "  maintainability {:.0}  debt {:.0}  avg complexity {:.1}\n",
        results.metrics.maintainability,
        results.metrics.debt.score,
        results.metrics.average_complexity
    ));

    for severity in [Severity::Critical, Severity::Error] {
        for issue in results.issues.iter().filter(|i| i.severity == severity) {
            out.push_str(&format!(
                "  {} {}:{} {}\n",
                format!("{severity:?}").red(),
                issue.file.display(),
                issue.start_line,
                issue.message
            ));
        }
    }

    for rec in &results.recommendations {
        out.push_str(&format!(
            "  {} [{}] {}\n",
            "→".cyan(),
            rec.priority,
            rec.title
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        AiInsights, AnalysisSummary, CodeIssue, CodeMetrics, IssueCategory,
    };
    use chrono::Utc;
    use std::path::Path;

    fn sample_result() -> AnalysisResult {
        let issues = vec![CodeIssue::new(
            "eval-usage",
            IssueCategory::Security,
            Severity::Critical,
            Path::new("src/<img>.js"),
            3,
            "Call to 'eval' can execute untrusted input",
        )];
        AnalysisResult {
            timestamp: Utc::now(),
            duration_ms: 5,
            summary: AnalysisSummary::from_issues(1, &issues),
            files: vec![],
            metrics: CodeMetrics::default(),
            issues,
            recommendations: vec![],
            insights: AiInsights::default(),
        }
    }

    #[test]
    fn test_json_round_trips_without_loss() {
        let result = sample_result();
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer).write_results(&result).unwrap();
        let parsed: AnalysisResult = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_markdown_contains_sections() {
        let result = sample_result();
        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer, OutputConfig::default())
            .write_results(&result)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("# Code Quality Report"));
        assert!(text.contains("## Summary"));
        assert!(text.contains("eval-usage"));
    }

    #[test]
    fn test_markdown_respects_include_metrics() {
        let result = sample_result();
        let config = OutputConfig {
            include_metrics: false,
            ..OutputConfig::default()
        };
        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer, config)
            .write_results(&result)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(!text.contains("## Project Metrics"));
    }

    #[test]
    fn test_html_escapes_paths() {
        let result = sample_result();
        let mut buffer = Vec::new();
        HtmlWriter::new(&mut buffer, OutputConfig::default())
            .write_results(&result)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("&lt;img&gt;"));
        assert!(!text.contains("<img>"));
    }

    #[test]
    fn test_terminal_summary_mentions_counts() {
        let text = render_terminal_summary(&sample_result());
        assert!(text.contains("1 files analyzed"));
        assert!(text.contains("eval"));
    }
}
