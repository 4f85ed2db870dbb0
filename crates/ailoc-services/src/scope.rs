//! Include/exclude filtering over paths relative to a language directory.

use globset::{Glob, GlobSet, GlobSetBuilder};

/// Compiled include/exclude pattern sets. `*` matches across path segments
/// (the source convention treats `vendor/*` and `vendor/**` alike), which is
/// globset's default when the separator is not marked literal.
#[derive(Debug)]
pub struct ScopeMatcher {
    include: GlobSet,
    exclude: GlobSet,
}

impl ScopeMatcher {
    /// Compile both pattern lists. An invalid pattern is a configuration
    /// error and fails the whole run before any file I/O.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, globset::Error> {
        Ok(Self {
            include: build_set(include)?,
            exclude: build_set(exclude)?,
        })
    }

    /// A file is in scope iff at least one include pattern matches and no
    /// exclude pattern does.
    pub fn is_in_scope(&self, relative_path: &str) -> bool {
        self.include.is_match(relative_path) && !self.exclude.is_match(relative_path)
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    builder.build()
}
