//! Recursive file search over a directory tree.

use crate::match_policy::MatchPolicy;
use crate::query::Query;
use glob::Pattern;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Controls how the directory tree is walked.
///
/// Built from the `[walk]` table of the configuration file, see
/// [`crate::config::WalkRules::compile`].
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Follow symbolic links to directories. Link cycles are detected and skipped.
    pub follow_links: bool,
    /// Maximum depth below the root; `None` walks the whole tree.
    pub max_depth: Option<usize>,
    /// When false, dot-files and dot-directories are left out.
    pub include_hidden: bool,
    /// Glob patterns matched against the path relative to the root.
    pub exclude_patterns: Vec<Pattern>,
    /// Regexes matched against the file name.
    pub exclude_regexes: Vec<Regex>,
}

impl WalkOptions {
    /// Walks everything, including hidden files, without following links.
    pub fn everything() -> Self {
        Self {
            include_hidden: true,
            ..Self::default()
        }
    }

    fn keeps_entry(&self, entry: &DirEntry) -> bool {
        entry.depth() == 0 || self.include_hidden || !is_hidden(entry)
    }

    fn is_excluded(&self, relative: &Path, file_name: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative))
            || self
                .exclude_regexes
                .iter()
                .any(|regex| regex.is_match(file_name))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Walks a directory tree and collects files whose names match a query.
///
/// The engine keeps no state between calls; two searches over the same root
/// are independent.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    options: WalkOptions,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(WalkOptions::everything())
    }
}

impl SearchEngine {
    pub fn new(options: WalkOptions) -> Self {
        Self { options }
    }

    /// Returns the absolute paths of every regular file under `root` whose
    /// name matches `query`.
    ///
    /// Entries within a directory are visited in file-name order, so the
    /// result is reproducible for a fixed tree. Unreadable directories are
    /// skipped; a missing root yields an empty result.
    pub fn search(&self, root: &Path, query: &Query) -> Vec<PathBuf> {
        let policy = MatchPolicy::new(query);
        if policy.matches_nothing() {
            debug!(query = %query.text, "Extension query has no letters or digits, nothing to match");
            return Vec::new();
        }

        let root = match std::path::absolute(root) {
            Ok(root) => root,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "Cannot resolve search root");
                return Vec::new();
            }
        };

        let mut walker = WalkDir::new(&root)
            .follow_links(self.options.follow_links)
            .sort_by_file_name();
        if let Some(depth) = self.options.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut found = Vec::new();
        let mut skipped = 0usize;

        for entry in walker
            .into_iter()
            .filter_entry(|entry| self.options.keeps_entry(entry))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(
                        path = ?e.path(),
                        error = %e,
                        "Skipping unreadable entry"
                    );
                    skipped += 1;
                    continue;
                }
            };

            if !is_regular_file(&entry) {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if !policy.matches(&file_name) {
                continue;
            }

            let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            if self.options.is_excluded(relative, &file_name) {
                debug!(path = %entry.path().display(), "Match excluded by walk rules");
                continue;
            }

            found.push(entry.into_path());
        }

        info!(
            root = %root.display(),
            query = %query.text,
            mode = %query.mode,
            fuzzy = query.fuzzy,
            matches = found.len(),
            skipped,
            "Search complete"
        );

        found
    }
}

/// Regular files, plus links to regular files when links are not followed.
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}
