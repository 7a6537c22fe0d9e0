//! Path and line filtering.
//!
//! [`PathFilter`] decides which directory entries take part in a merge and
//! [`CommentFilter`] decides which source lines are dropped from it.

use crate::config::Config;
use std::collections::HashSet;

/// Name-based entry filter built from a [`Config`].
///
/// Folder and file skip lists match exact names; allowed extensions match
/// name suffixes.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    skip_folders: HashSet<String>,
    skip_files: HashSet<String>,
    allowed_extensions: Vec<String>,
}

impl PathFilter {
    /// Creates a filter from the configuration's skip and allow lists.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::from_lists(
            &config.skip_folders,
            &config.skip_files,
            &config.allowed_extensions,
        )
    }

    /// Creates a filter from explicit lists.
    #[must_use]
    pub fn from_lists(
        skip_folders: &[String],
        skip_files: &[String],
        allowed_extensions: &[String],
    ) -> Self {
        Self {
            skip_folders: skip_folders.iter().cloned().collect(),
            skip_files: skip_files.iter().cloned().collect(),
            allowed_extensions: allowed_extensions.to_vec(),
        }
    }

    /// Returns true if an entry with this name prunes its whole subtree.
    #[must_use]
    pub fn is_skipped_folder(&self, name: &str) -> bool {
        self.skip_folders.contains(name)
    }

    /// Returns true if a file with this name should be merged.
    #[must_use]
    pub fn is_eligible_file(&self, name: &str) -> bool {
        self.has_allowed_extension(name) && !self.skip_files.contains(name)
    }

    fn has_allowed_extension(&self, name: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
    }
}

/// Drops lines that hold nothing but an inline comment.
///
/// This is a line heuristic, not a lexer: block comments spanning several
/// lines are kept, and so is a marker that appears after code.
#[derive(Debug, Clone)]
pub struct CommentFilter {
    marker: String,
}

impl CommentFilter {
    /// Creates a comment filter for the given inline marker.
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Returns the inline marker.
    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Returns true if the line should be dropped from the output.
    #[must_use]
    pub fn is_comment_only_line(&self, line: &str) -> bool {
        is_comment_only_line(line, &self.marker)
    }
}

/// Returns true if `line`, with leading whitespace removed, starts with `marker`.
#[must_use]
pub fn is_comment_only_line(line: &str, marker: &str) -> bool {
    line.trim_start().starts_with(marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn python_filter() -> PathFilter {
        PathFilter::from_lists(
            &strings(&["__pycache__", ".git", "venv"]),
            &strings(&["setup.py", "conftest.py"]),
            &strings(&[".py", ".pyi"]),
        )
    }

    #[test]
    fn test_skipped_folder_exact_match() {
        let filter = python_filter();

        assert!(filter.is_skipped_folder("venv"));
        assert!(filter.is_skipped_folder(".git"));
        assert!(!filter.is_skipped_folder("venv2"));
        assert!(!filter.is_skipped_folder("Venv"));
        assert!(!filter.is_skipped_folder("src"));
    }

    #[test]
    fn test_eligible_by_extension() {
        let filter = python_filter();

        assert!(filter.is_eligible_file("main.py"));
        assert!(filter.is_eligible_file("types.pyi"));
        assert!(!filter.is_eligible_file("README.md"));
        assert!(!filter.is_eligible_file("main.py.bak"));
    }

    #[test]
    fn test_skip_files_override_extension() {
        let filter = python_filter();

        assert!(!filter.is_eligible_file("setup.py"));
        assert!(!filter.is_eligible_file("conftest.py"));
        assert!(filter.is_eligible_file("my_setup.py"));
    }

    #[test]
    fn test_extension_is_plain_suffix() {
        let filter = PathFilter::from_lists(&[], &[], &strings(&["py"]));

        // Suffix match, not an extension parse.
        assert!(filter.is_eligible_file("happy"));
        assert!(filter.is_eligible_file("a.py"));
    }

    #[test]
    fn test_no_allowed_extensions_rejects_everything() {
        let filter = PathFilter::default();
        assert!(!filter.is_eligible_file("main.rs"));
    }

    #[test]
    fn test_comment_only_lines() {
        let filter = CommentFilter::new("#");

        assert!(filter.is_comment_only_line("# comment\n"));
        assert!(filter.is_comment_only_line("    # indented\n"));
        assert!(filter.is_comment_only_line("\t#\n"));
        assert!(filter.is_comment_only_line("#"));
        assert!(!filter.is_comment_only_line("x = 1  # trailing\n"));
        assert!(!filter.is_comment_only_line("\n"));
        assert!(!filter.is_comment_only_line(""));
    }

    #[test]
    fn test_multi_char_marker() {
        assert!(is_comment_only_line("  // note", "//"));
        assert!(is_comment_only_line("/// doc", "//"));
        assert!(!is_comment_only_line("/* block */", "//"));
        assert!(!is_comment_only_line("let url = \"http://x\";", "//"));
    }

    #[test]
    fn test_block_comment_lines_are_kept() {
        let filter = CommentFilter::new("#");

        assert!(!filter.is_comment_only_line("\"\"\"\n"));
        assert!(!filter.is_comment_only_line("docstring body\n"));
    }
}
