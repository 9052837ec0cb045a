use std::collections::HashMap;

use crate::core::{DetectedPattern, FileAnalysisResult, PatternKind};

const TOP_PATTERNS: usize = 10;

/// One pattern observation in a single file.
struct PatternMatch {
    name: &'static str,
    kind: PatternKind,
    occurrences: usize,
    confidence: f64,
}

/// Detect structural patterns per file, then merge matches by name:
/// occurrence counts are summed, confidence is the maximum observed, and
/// the merged list is ranked by occurrences and truncated to the top 10.
pub fn detect_patterns(files: &[FileAnalysisResult]) -> Vec<DetectedPattern> {
    let mut merged: HashMap<&'static str, DetectedPattern> = HashMap::new();

    for file in files {
        for found in file_patterns(file) {
            let entry = merged
                .entry(found.name)
                .or_insert_with(|| DetectedPattern {
                    name: found.name.to_string(),
                    kind: found.kind,
                    occurrences: 0,
                    confidence: 0.0,
                    files: Vec::new(),
                });
            entry.occurrences += found.occurrences;
            entry.confidence = entry.confidence.max(found.confidence);
            if !entry.files.contains(&file.path) {
                entry.files.push(file.path.clone());
            }
        }
    }

    let mut patterns: Vec<DetectedPattern> = merged.into_values().collect();
    patterns.sort_by(|a, b| {
        b.occurrences
            .cmp(&a.occurrences)
            .then_with(|| a.name.cmp(&b.name))
    });
    patterns.truncate(TOP_PATTERNS);
    patterns
}

fn file_patterns(file: &FileAnalysisResult) -> Vec<PatternMatch> {
    let mut matches = Vec::new();
    let metrics = &file.metrics;

    if metrics.classes >= 1 && metrics.functions > 15 {
        matches.push(PatternMatch {
            name: "God Object",
            kind: PatternKind::AntiPattern,
            occurrences: 1,
            confidence: 0.7,
        });
    }

    if metrics.complexity.nesting > 4 {
        matches.push(PatternMatch {
            name: "Deeply Nested Logic",
            kind: PatternKind::AntiPattern,
            occurrences: 1,
            confidence: 0.75,
        });
    }

    if metrics.lines > 400 {
        matches.push(PatternMatch {
            name: "Monolithic Module",
            kind: PatternKind::AntiPattern,
            occurrences: 1,
            confidence: 0.65,
        });
    }

    if metrics.coupling.efferent > 10 {
        matches.push(PatternMatch {
            name: "High Fan-Out",
            kind: PatternKind::Structural,
            occurrences: 1,
            confidence: 0.7,
        });
    }

    if (1..=8).contains(&metrics.coupling.efferent) && metrics.lines <= 300 {
        matches.push(PatternMatch {
            name: "Focused Module",
            kind: PatternKind::Design,
            occurrences: 1,
            confidence: 0.6,
        });
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FileMetrics, Language};
    use std::path::PathBuf;

    fn file_with(path: &str, edit: impl FnOnce(&mut FileMetrics)) -> FileAnalysisResult {
        let mut metrics = FileMetrics::default();
        edit(&mut metrics);
        FileAnalysisResult {
            path: PathBuf::from(path),
            language: Language::JavaScript,
            metrics,
            issues: vec![],
            dependencies: vec![],
            parse_errors: 0,
        }
    }

    #[test]
    fn test_matches_merge_by_name() {
        let files = vec![
            file_with("a.js", |m| m.complexity.nesting = 6),
            file_with("b.js", |m| m.complexity.nesting = 7),
        ];
        let patterns = detect_patterns(&files);
        let nested = patterns
            .iter()
            .find(|p| p.name == "Deeply Nested Logic")
            .unwrap();
        assert_eq!(nested.occurrences, 2);
        assert_eq!(nested.files.len(), 2);
        assert_eq!(nested.confidence, 0.75);
    }

    #[test]
    fn test_ranked_by_occurrences() {
        let mut files: Vec<FileAnalysisResult> = (0..3)
            .map(|i| file_with(&format!("n{i}.js"), |m| m.complexity.nesting = 6))
            .collect();
        files.push(file_with("big.js", |m| m.lines = 500));
        let patterns = detect_patterns(&files);
        assert_eq!(patterns[0].name, "Deeply Nested Logic");
        assert!(patterns.iter().any(|p| p.name == "Monolithic Module"));
    }

    #[test]
    fn test_empty_input_yields_no_patterns() {
        assert!(detect_patterns(&[]).is_empty());
    }
}
