use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use crate::core::{AnalysisResult, FileAnalysisResult};
use crate::errors::AnalyzeError;
use crate::orchestrator::AnalysisObserver;

const TEMPLATE_COUNTER: &str = "{spinner:.cyan} {pos} files analyzed {msg}";

/// Terminal progress feedback wired into the orchestrator as an observer.
/// The file count is not known until glob resolution, so this renders a
/// counter rather than a bounded bar.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template(TEMPLATE_COUNTER)
                .expect("Invalid counter template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// A reporter that renders nothing, for quiet and non-tty runs.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisObserver for ProgressReporter {
    fn file_started(&self, path: &Path) {
        if let Some(name) = path.file_name() {
            self.bar.set_message(name.to_string_lossy().into_owned());
        }
    }

    fn file_completed(&self, _path: &Path, _result: &FileAnalysisResult) {
        self.bar.inc(1);
    }

    fn file_failed(&self, _path: &Path, _error: &anyhow::Error) {
        self.bar.inc(1);
    }

    fn analysis_completed(&self, _result: &AnalysisResult) {
        self.bar.finish_and_clear();
    }

    fn analysis_failed(&self, _error: &AnalyzeError) {
        self.bar.finish_and_clear();
    }
}
