//! Locates source-language files under the configured root directories.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::scope::ScopeMatcher;

/// Walk each root in order and collect source-language files. Two layouts
/// are recognized per root: a `<root>/<source_lang>/` subtree (filtered
/// through the scope matcher against paths relative to that subtree) and a
/// flat `<root>/<source_lang>.json` file (always in scope, its name already
/// encodes the language match). Roots that do not exist are skipped.
pub fn find_translation_files(
    roots: &[PathBuf],
    matcher: &ScopeMatcher,
    source_lang: &str,
) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for root in roots {
        if !root.exists() {
            debug!(root = %root.display(), "skipping missing root directory");
            continue;
        }

        let lang_dir = root.join(source_lang);
        if lang_dir.is_dir() {
            for entry in WalkDir::new(&lang_dir)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                let Ok(rel) = entry.path().strip_prefix(&lang_dir) else {
                    continue;
                };
                if matcher.is_in_scope(&normalize(rel)) {
                    files.push(entry.into_path());
                }
            }
        }

        let flat_json = root.join(format!("{source_lang}.json"));
        if flat_json.is_file() {
            files.push(flat_json);
        }
    }

    debug!(count = files.len(), "discovered source files");
    files
}

fn normalize(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}
