//! Discovery and translation pipeline over the leaf crates.
//! Intentionally thin: exposes stable entrypoints used by the CLI.

pub mod clean;
pub mod discover;
pub mod resolve;
pub mod scope;
pub mod translate;

pub use ailoc_core::{LangStats, Outcome, Result, RunStats, TranslationFormat};
pub use clean::clean_response;
pub use discover::find_translation_files;
pub use resolve::resolve_target_path;
pub use scope::ScopeMatcher;
pub use translate::{
    plan_translations, translate_all, PlannedJob, TranslateOptions, TranslatePlan,
};
