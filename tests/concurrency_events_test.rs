use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use codegauge::config::{AnalysisConfig, ModelConfig, UpdateFrequency};
use codegauge::core::{AnalysisResult, FileAnalysisResult};
use codegauge::orchestrator::{AnalysisObserver, Orchestrator};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Started(PathBuf),
    Completed(PathBuf),
    RunCompleted,
}

/// Observer that tracks how many files are in flight at once and records
/// the full event sequence.
#[derive(Default)]
struct PoolProbe {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    events: Mutex<Vec<Event>>,
}

impl AnalysisObserver for PoolProbe {
    fn file_started(&self, path: &Path) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.events
            .lock()
            .unwrap()
            .push(Event::Started(path.to_path_buf()));
    }

    fn file_completed(&self, path: &Path, _result: &FileAnalysisResult) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.events
            .lock()
            .unwrap()
            .push(Event::Completed(path.to_path_buf()));
    }

    fn analysis_completed(&self, _result: &AnalysisResult) {
        self.events.lock().unwrap().push(Event::RunCompleted);
    }
}

fn project_with_files(count: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    for i in 0..count {
        // Enough work per file that analyses overlap.
        let mut content = String::new();
        for j in 0..40 {
            content.push_str(&format!(
                "function f{i}_{j}(a, b) {{ if (a && b) {{ return a; }} return b; }}\n"
            ));
        }
        fs::write(dir.path().join(format!("mod{i:02}.js")), content).unwrap();
    }
    dir
}

fn realtime_config() -> AnalysisConfig {
    AnalysisConfig {
        model: ModelConfig {
            update_frequency: UpdateFrequency::Realtime,
            ..Default::default()
        },
        ..AnalysisConfig::default()
    }
}

#[test]
fn test_pool_bounds_files_in_flight() {
    let dir = project_with_files(12);
    let probe = Arc::new(PoolProbe::default());
    let orchestrator = Orchestrator::new(realtime_config())
        .unwrap()
        .with_observer(Arc::clone(&probe) as Arc<dyn AnalysisObserver>);

    let pattern = vec![format!("{}/*.js", dir.path().display())];
    let result = orchestrator.analyze(&pattern).unwrap();

    assert_eq!(result.files.len(), 12);
    let peak = probe.max_in_flight.load(Ordering::SeqCst);
    assert!(peak >= 1);
    // Realtime mode caps the pool at 4 concurrent files.
    assert!(peak <= 4, "observed {peak} files in flight");
}

#[test]
fn test_started_always_precedes_completed() {
    let dir = project_with_files(6);
    let probe = Arc::new(PoolProbe::default());
    let orchestrator = Orchestrator::new(realtime_config())
        .unwrap()
        .with_observer(Arc::clone(&probe) as Arc<dyn AnalysisObserver>);

    let pattern = vec![format!("{}/*.js", dir.path().display())];
    orchestrator.analyze(&pattern).unwrap();

    let events = probe.events.lock().unwrap();
    for (index, event) in events.iter().enumerate() {
        if let Event::Completed(path) = event {
            let started_before = events[..index]
                .iter()
                .any(|e| matches!(e, Event::Started(p) if p == path));
            assert!(started_before, "{} completed before starting", path.display());
        }
    }
}

#[test]
fn test_run_completion_event_is_last() {
    let dir = project_with_files(4);
    let probe = Arc::new(PoolProbe::default());
    let orchestrator = Orchestrator::new(realtime_config())
        .unwrap()
        .with_observer(Arc::clone(&probe) as Arc<dyn AnalysisObserver>);

    let pattern = vec![format!("{}/*.js", dir.path().display())];
    orchestrator.analyze(&pattern).unwrap();

    let events = probe.events.lock().unwrap();
    assert_eq!(events.last(), Some(&Event::RunCompleted));
    let completions = events
        .iter()
        .filter(|e| matches!(e, Event::Completed(_)))
        .count();
    assert_eq!(completions, 4);
}

#[test]
fn test_cached_second_run_emits_no_file_events() {
    let dir = project_with_files(3);
    let probe = Arc::new(PoolProbe::default());
    let orchestrator = Orchestrator::new(realtime_config())
        .unwrap()
        .with_observer(Arc::clone(&probe) as Arc<dyn AnalysisObserver>);

    let pattern = vec![format!("{}/*.js", dir.path().display())];
    orchestrator.analyze(&pattern).unwrap();
    let events_after_first = probe.events.lock().unwrap().len();

    // Second run inside the TTL is served from the cache: the run-level
    // completion event still fires, per-file events do not.
    orchestrator.analyze(&pattern).unwrap();
    let events = probe.events.lock().unwrap();
    assert_eq!(events.len(), events_after_first + 1);
    assert_eq!(events.last(), Some(&Event::RunCompleted));
}
