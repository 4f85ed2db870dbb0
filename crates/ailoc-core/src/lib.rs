use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Content format of a language file, fixed at discovery time and derived
/// purely from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranslationFormat {
    Plain,
    Json,
    PhpArray,
}

impl TranslationFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TranslationFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("php") => TranslationFormat::PhpArray,
            _ => TranslationFormat::Plain,
        }
    }

    /// Tag used in fenced code blocks and prompt framing.
    pub fn tag(&self) -> &'static str {
        match self {
            TranslationFormat::Plain => "plain",
            TranslationFormat::Json => "json",
            TranslationFormat::PhpArray => "php",
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, TranslationFormat::Json | TranslationFormat::PhpArray)
    }
}

/// Terminal outcome of a single (source file, target language) job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed(String),
    Skipped(String),
}

/// Per-target-language counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LangStats {
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Aggregate statistics for one translation run. Owned by the orchestrator
/// for the duration of the run and returned by value at the end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub by_language: BTreeMap<String, LangStats>,
}

impl RunStats {
    pub fn new(target_langs: &[String]) -> Self {
        let by_language = target_langs
            .iter()
            .map(|lang| (lang.clone(), LangStats::default()))
            .collect();
        RunStats {
            by_language,
            ..RunStats::default()
        }
    }

    /// Record a per-file failure that is not attributable to any single
    /// target language (e.g. the source file could not be read).
    pub fn record_file_failure(&mut self) {
        self.failed += 1;
    }

    pub fn record(&mut self, lang: &str, outcome: &Outcome) {
        let per_lang = self.by_language.entry(lang.to_string()).or_default();
        match outcome {
            Outcome::Success => {
                self.successful += 1;
                per_lang.successful += 1;
            }
            Outcome::Failed(_) => {
                self.failed += 1;
                per_lang.failed += 1;
            }
            Outcome::Skipped(_) => {
                self.skipped += 1;
                per_lang.skipped += 1;
            }
        }
    }

    pub fn jobs_processed(&self) -> usize {
        self.successful + self.failed + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            TranslationFormat::from_path(&PathBuf::from("lang/en/messages.php")),
            TranslationFormat::PhpArray
        );
        assert_eq!(
            TranslationFormat::from_path(&PathBuf::from("lang/en.json")),
            TranslationFormat::Json
        );
        assert_eq!(
            TranslationFormat::from_path(&PathBuf::from("notes/en.txt")),
            TranslationFormat::Plain
        );
        assert_eq!(
            TranslationFormat::from_path(&PathBuf::from("README")),
            TranslationFormat::Plain
        );
    }

    #[test]
    fn stats_counters_sum_to_jobs() {
        let mut stats = RunStats::new(&["uk".to_string(), "de".to_string()]);
        stats.record("uk", &Outcome::Success);
        stats.record("uk", &Outcome::Skipped("exists".into()));
        stats.record("de", &Outcome::Failed("backend".into()));
        assert_eq!(stats.jobs_processed(), 3);
        assert_eq!(stats.by_language["uk"].successful, 1);
        assert_eq!(stats.by_language["uk"].skipped, 1);
        assert_eq!(stats.by_language["de"].failed, 1);
    }
}
