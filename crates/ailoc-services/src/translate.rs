//! Orchestrates one translation run: discovery, per-job skip/overwrite
//! policy, backend calls, response cleaning, writes, and statistics.
//! Per-file and per-job failures become statistics entries; only
//! configuration-level problems abort the run.

use std::fs;
use std::path::{Path, PathBuf};

use ailoc_backend::Translator;
use ailoc_core::{Outcome, Result, RunStats, TranslationFormat};
use tracing::{error, info, warn};

use crate::clean::clean_response;
use crate::discover::find_translation_files;
use crate::resolve::resolve_target_path;
use crate::scope::ScopeMatcher;

#[derive(Debug, Clone)]
pub struct TranslateOptions {
    pub source_lang: String,
    pub target_langs: Vec<String>,
    pub lang_dirs: Vec<PathBuf>,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub force_overwrite: bool,
}

/// One (source file, target language) unit of planned work.
#[derive(Debug, Clone)]
pub struct PlannedJob {
    pub source: PathBuf,
    pub target_lang: String,
    pub target: PathBuf,
    pub skip_existing: bool,
}

#[derive(Debug, Clone)]
pub struct TranslatePlan {
    pub files: Vec<PathBuf>,
    pub jobs: Vec<PlannedJob>,
}

/// Preview the run without reading file contents or calling the backend.
pub fn plan_translations(opts: &TranslateOptions) -> Result<TranslatePlan> {
    let matcher = ScopeMatcher::new(&opts.include_patterns, &opts.exclude_patterns)?;
    let files = find_translation_files(&opts.lang_dirs, &matcher, &opts.source_lang);
    let mut jobs = Vec::with_capacity(files.len() * opts.target_langs.len());
    for source in &files {
        for lang in &opts.target_langs {
            let target = target_path(source, &opts.source_lang, lang);
            let skip_existing = target.exists() && !opts.force_overwrite;
            jobs.push(PlannedJob {
                source: source.clone(),
                target_lang: lang.clone(),
                target,
                skip_existing,
            });
        }
    }
    Ok(TranslatePlan { files, jobs })
}

/// Translate every discovered source file into every target language.
/// The run never aborts on a per-job failure; complete statistics are
/// returned at the end.
pub fn translate_all(translator: &dyn Translator, opts: &TranslateOptions) -> Result<RunStats> {
    let matcher = ScopeMatcher::new(&opts.include_patterns, &opts.exclude_patterns)?;
    let files = find_translation_files(&opts.lang_dirs, &matcher, &opts.source_lang);

    let mut stats = RunStats::new(&opts.target_langs);
    stats.total_files = files.len();

    for source in &files {
        // Format is fixed at discovery time; content is read at most once
        // per file regardless of how many target languages consume it.
        let format = TranslationFormat::from_path(source);
        let content = match fs::read_to_string(source) {
            Ok(content) => content,
            Err(e) => {
                warn!(source = %source.display(), error = %e, "could not read source file");
                stats.record_file_failure();
                continue;
            }
        };

        for lang in &opts.target_langs {
            let outcome = run_job(
                translator,
                source,
                &content,
                format,
                &opts.source_lang,
                lang,
                opts.force_overwrite,
            );
            match &outcome {
                Outcome::Success => {
                    info!(source = %source.display(), target_lang = %lang, "translated")
                }
                Outcome::Skipped(reason) => {
                    info!(source = %source.display(), target_lang = %lang, %reason, "skipped")
                }
                Outcome::Failed(reason) => {
                    error!(source = %source.display(), target_lang = %lang, %reason, "failed")
                }
            }
            stats.record(lang, &outcome);
        }
    }

    Ok(stats)
}

fn run_job(
    translator: &dyn Translator,
    source: &Path,
    content: &str,
    format: TranslationFormat,
    source_lang: &str,
    target_lang: &str,
    force_overwrite: bool,
) -> Outcome {
    let target = target_path(source, source_lang, target_lang);

    if target.exists() && !force_overwrite {
        return Outcome::Skipped(format!("target exists: {}", target.display()));
    }

    let translated = match translator.translate(content, source_lang, target_lang, format) {
        Ok(text) => text,
        Err(e) => return Outcome::Failed(format!("backend: {e}")),
    };
    let cleaned = clean_response(&translated, format);

    match write_translation(&target, &cleaned) {
        Ok(()) => Outcome::Success,
        Err(e) => Outcome::Failed(format!("write {}: {e}", target.display())),
    }
}

fn target_path(source: &Path, source_lang: &str, target_lang: &str) -> PathBuf {
    let normalized = source.to_string_lossy().replace('\\', "/");
    PathBuf::from(resolve_target_path(&normalized, source_lang, target_lang))
}

fn write_translation(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailoc_backend::TranslateError;
    use std::cell::Cell;
    use tempfile::tempdir;

    /// Wraps backend output in a fence, like a chatty model would.
    struct FencedTranslator {
        calls: Cell<usize>,
    }

    impl FencedTranslator {
        fn new() -> Self {
            Self { calls: Cell::new(0) }
        }
    }

    impl Translator for FencedTranslator {
        fn translate(
            &self,
            text: &str,
            _source_lang: &str,
            target_lang: &str,
            format: TranslationFormat,
        ) -> std::result::Result<String, TranslateError> {
            self.calls.set(self.calls.get() + 1);
            Ok(format!(
                "```{}\n[{target_lang}] {text}\n```",
                format.tag()
            ))
        }
    }

    struct FailingTranslator;

    impl Translator for FailingTranslator {
        fn translate(
            &self,
            _text: &str,
            _source_lang: &str,
            _target_lang: &str,
            _format: TranslationFormat,
        ) -> std::result::Result<String, TranslateError> {
            Err(TranslateError::Status {
                status: 500,
                body: "boom".into(),
            })
        }
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn options(root: &Path, targets: &[&str], force: bool) -> TranslateOptions {
        TranslateOptions {
            source_lang: "en".into(),
            target_langs: targets.iter().map(|s| s.to_string()).collect(),
            lang_dirs: vec![root.to_path_buf()],
            include_patterns: vec!["*.php".into(), "*.json".into(), "*.txt".into()],
            exclude_patterns: vec!["vendor/**".into()],
            force_overwrite: force,
        }
    }

    #[test]
    fn translates_subtree_and_flat_json() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("resources/lang");
        write(&root.join("en/messages.php"), "<?php return ['hi' => 'Hi'];");
        write(&root.join("en.json"), "{\"hi\":\"Hi\"}");

        let translator = FencedTranslator::new();
        let stats = translate_all(&translator, &options(&root, &["uk"], false)).unwrap();

        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.successful, 2);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.skipped, 0);
        assert_eq!(stats.jobs_processed(), 2);
        assert!(root.join("uk/messages.php").is_file());
        assert!(root.join("uk.json").is_file());
    }

    #[test]
    fn fenced_output_is_cleaned_before_writing() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        write(&root.join("en.json"), "{\"hi\":\"Hi\"}");

        let translator = FencedTranslator::new();
        translate_all(&translator, &options(&root, &["uk"], false)).unwrap();

        let written = fs::read_to_string(root.join("uk.json")).unwrap();
        assert!(!written.contains("```"));
        assert!(written.starts_with('['));
    }

    #[test]
    fn existing_target_is_skipped_without_calling_backend() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        write(&root.join("en/messages.php"), "<?php return [];");
        write(&root.join("uk/messages.php"), "already translated");

        let translator = FencedTranslator::new();
        let stats = translate_all(&translator, &options(&root, &["uk"], false)).unwrap();

        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.by_language["uk"].skipped, 1);
        assert_eq!(translator.calls.get(), 0);
        assert_eq!(
            fs::read_to_string(root.join("uk/messages.php")).unwrap(),
            "already translated"
        );
    }

    #[test]
    fn force_overwrite_retranslates_existing_target() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        write(&root.join("en/messages.php"), "<?php return [];");
        write(&root.join("uk/messages.php"), "stale");

        let translator = FencedTranslator::new();
        let stats = translate_all(&translator, &options(&root, &["uk"], true)).unwrap();

        assert_eq!(stats.successful, 1);
        assert_eq!(translator.calls.get(), 1);
        assert_ne!(
            fs::read_to_string(root.join("uk/messages.php")).unwrap(),
            "stale"
        );
    }

    #[test]
    fn backend_failure_is_recorded_and_nothing_is_written() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        write(&root.join("en/messages.php"), "<?php return [];");

        let stats = translate_all(&FailingTranslator, &options(&root, &["uk"], false)).unwrap();

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.by_language["uk"].failed, 1);
        assert!(!root.join("uk/messages.php").exists());
    }

    #[test]
    fn write_failure_is_recorded_and_the_run_continues() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        write(&root.join("en/messages.php"), "<?php return [];");
        // A directory squatting on the resolved target path makes the
        // write fail; force overwrite keeps the skip gate out of the way.
        fs::create_dir_all(root.join("uk/messages.php")).unwrap();

        let translator = FencedTranslator::new();
        let stats = translate_all(&translator, &options(&root, &["uk", "de"], true)).unwrap();

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.by_language["uk"].failed, 1);
        // the de job after the failed uk write still runs to completion
        assert_eq!(stats.successful, 1);
        assert_eq!(stats.by_language["de"].failed, 0);
        assert_eq!(stats.jobs_processed(), 2);
        assert!(root.join("de/messages.php").is_file());
    }

    #[test]
    fn run_continues_past_failures_and_covers_every_job() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        write(&root.join("en/a.php"), "<?php return [];");
        write(&root.join("en/b.php"), "<?php return [];");

        let stats =
            translate_all(&FailingTranslator, &options(&root, &["uk", "de"], false)).unwrap();

        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.failed, 4);
        assert_eq!(stats.jobs_processed(), 4);
        assert_eq!(stats.by_language["uk"].failed, 2);
        assert_eq!(stats.by_language["de"].failed, 2);
    }

    #[test]
    fn unreadable_file_counts_one_global_failure() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        write(&root.join("en/good.php"), "<?php return [];");
        fs::create_dir_all(root.join("en")).unwrap();
        fs::write(root.join("en/bad.txt"), [0xFF, 0xFE, 0x00, 0x01]).unwrap();

        let translator = FencedTranslator::new();
        let stats = translate_all(&translator, &options(&root, &["uk", "de"], false)).unwrap();

        assert_eq!(stats.total_files, 2);
        // bad.txt fails once globally; good.php succeeds for both languages
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.successful, 2);
        assert_eq!(stats.by_language["uk"].failed, 0);
        assert_eq!(stats.by_language["de"].failed, 0);
        assert_eq!(translator.calls.get(), 2);
    }

    #[test]
    fn plan_lists_jobs_without_touching_the_backend() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        write(&root.join("en/messages.php"), "<?php return [];");
        write(&root.join("uk/messages.php"), "already there");

        let plan = plan_translations(&options(&root, &["uk", "de"], false)).unwrap();
        assert_eq!(plan.files.len(), 1);
        assert_eq!(plan.jobs.len(), 2);

        let uk = plan.jobs.iter().find(|j| j.target_lang == "uk").unwrap();
        assert!(uk.skip_existing);
        assert_eq!(uk.target, root.join("uk/messages.php"));

        let de = plan.jobs.iter().find(|j| j.target_lang == "de").unwrap();
        assert!(!de.skip_existing);
        assert!(!de.target.exists());
    }
}
