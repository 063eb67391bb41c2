//! Include/exclude glob matching and the size ceiling

use std::num::NonZeroU64;

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use log::{debug, warn};

use crate::pattern::to_glob;

/// Compiled filters for candidate paths
///
/// Patterns are shell wildcards matched against the whole candidate path.
/// `*` and `?` both cross path separators, so `*.py` matches `pkg/mod.py` and
/// `.git/*` blankets the whole `.git` subtree.
#[derive(Debug, Clone)]
pub struct PathFilter {
    /// `None` keeps every path
    include:       Option<GlobSet>,
    /// `None` drops nothing
    exclude:       Option<GlobSet>,
    /// Size ceiling in bytes
    max_file_size: Option<NonZeroU64>,
}

impl PathFilter {
    /// Compile the include and exclude patterns
    ///
    /// Every pattern is accepted. Text that is not a wildcard, including an
    /// unclosed `[`, matches literally.
    #[must_use]
    pub fn new<'a, I, E>(include: I, exclude: E, max_file_size: Option<NonZeroU64>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
        E: IntoIterator<Item = &'a str>,
    {
        Self { include: compile_set(include), exclude: compile_set(exclude), max_file_size }
    }

    /// Whether `candidate` passes the include patterns
    #[must_use]
    pub fn is_included(&self, candidate: &str) -> bool {
        self.include.as_ref().is_none_or(|set| set.is_match(candidate))
    }

    /// Whether `candidate` hits an exclude pattern
    #[must_use]
    pub fn is_excluded(&self, candidate: &str) -> bool {
        self.exclude.as_ref().is_some_and(|set| set.is_match(candidate))
    }

    /// Whether `candidate` is included and not excluded
    #[must_use]
    pub fn admits(&self, candidate: &str) -> bool {
        self.is_included(candidate) && !self.is_excluded(candidate)
    }

    /// The size ceiling, if any
    #[must_use]
    pub const fn max_file_size(&self) -> Option<NonZeroU64> {
        self.max_file_size
    }

    /// Whether a file of `size` bytes is over the ceiling
    #[must_use]
    pub fn exceeds_size(&self, size: u64) -> bool {
        self.max_file_size.is_some_and(|max| size > max.get())
    }
}

/// Compile one shell pattern, `None` when it can never match
///
/// Backslash is literal and case folding follows the host platform.
fn compile_glob(pattern: &str) -> Option<Glob> {
    let Some(glob) = to_glob(pattern) else {
        debug!("Pattern '{pattern}' holds an empty class and never matches");
        return None;
    };

    GlobBuilder::new(&glob)
        .literal_separator(false)
        .backslash_escape(false)
        .case_insensitive(cfg!(windows))
        .build()
        .map_err(|e| warn!("Ignoring pattern '{pattern}': {e}"))
        .ok()
}

/// Compile a pattern list, `None` when it is empty
fn compile_set<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let mut count = 0_usize;

    for pattern in patterns {
        count += 1;
        if let Some(glob) = compile_glob(pattern) {
            builder.add(glob);
        }
    }

    if count == 0 {
        return None;
    }

    Some(builder.build().unwrap_or_else(|e| {
        warn!("Ignoring {count} patterns: {e}");
        GlobSet::empty()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(include: &[&str], exclude: &[&str]) -> PathFilter {
        PathFilter::new(include.iter().copied(), exclude.iter().copied(), None)
    }

    #[test]
    fn test_empty_filter_admits_everything() {
        let f = filter(&[], &[]);
        assert!(f.admits("a.py"));
        assert!(f.admits("deep/nested/file.bin"));
        assert!(!f.exceeds_size(u64::MAX));
    }

    #[test]
    fn test_star_crosses_separators() {
        let f = filter(&["*.py"], &[]);
        assert!(f.admits("a.py"));
        assert!(f.admits("pkg/mod/a.py"));
        assert!(!f.admits("a.pyc"));
        assert!(!f.admits("img.png"));
    }

    #[test]
    fn test_directory_prefix_blankets_subtree() {
        let f = filter(&[], &["__pycache__/*", ".git/*"]);
        assert!(!f.admits("__pycache__/mod.cpython-312.pyc"));
        assert!(!f.admits(".git/objects/ab/cdef"));
        assert!(f.admits("src/.gitignore"));
        // Anchored at the start of the candidate path
        assert!(f.admits("src/__pycache__/mod.pyc"));
    }

    #[test]
    fn test_question_mark_matches_one_char() {
        let f = filter(&["file?.txt"], &[]);
        assert!(f.admits("file1.txt"));
        assert!(!f.admits("file10.txt"));
        assert!(!f.admits("file.txt"));

        let f = filter(&["a?b"], &[]);
        assert!(f.admits("a/b"));
    }

    #[test]
    fn test_character_classes() {
        let f = filter(&["[ab].txt"], &["[!a].txt"]);
        assert!(f.admits("a.txt"));
        assert!(!f.admits("b.txt"));
        assert!(!f.admits("c.txt"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let f = filter(&["*.py"], &["tests/*"]);
        assert!(f.admits("a.py"));
        assert!(f.is_included("tests/b.py"));
        assert!(f.is_excluded("tests/b.py"));
        assert!(!f.admits("tests/b.py"));
    }

    #[test]
    fn test_any_include_pattern_suffices() {
        let f = filter(&["*.rs", "*.toml"], &[]);
        assert!(f.admits("src/lib.rs"));
        assert!(f.admits("Cargo.toml"));
        assert!(!f.admits("README.md"));
    }

    #[test]
    fn test_absolute_candidates() {
        let f = filter(&["*.py"], &["*/tests/*"]);
        assert!(f.admits("/repo/a.py"));
        assert!(!f.admits("/repo/tests/b.py"));
    }

    #[cfg(unix)]
    #[test]
    fn test_case_sensitive_on_unix() {
        let f = filter(&["*.PY"], &[]);
        assert!(!f.admits("a.py"));
        assert!(f.admits("A.PY"));
    }

    #[cfg(unix)]
    #[test]
    fn test_backslash_is_literal() {
        let f = filter(&[r"a\*"], &[]);
        assert!(f.admits(r"a\b"));
        assert!(!f.admits("a*"));
    }

    #[test]
    fn test_size_ceiling() {
        let none: [&str; 0] = [];
        let f = PathFilter::new(none, none, NonZeroU64::new(1000));
        assert!(!f.exceeds_size(1000));
        assert!(f.exceeds_size(1001));
        assert_eq!(f.max_file_size().map(NonZeroU64::get), Some(1000));
    }

    #[test]
    fn test_unclosed_class_matches_literally() {
        let f = filter(&[], &["[abc", "x{.py"]);
        assert!(f.is_excluded("[abc"));
        assert!(f.is_excluded("x{.py"));
        assert!(!f.is_excluded("a"));
        assert!(!f.is_excluded("x.py"));
    }

    #[test]
    fn test_braces_are_literal() {
        let f = filter(&["{a}.py"], &[]);
        assert!(f.admits("{a}.py"));
        assert!(!f.admits("a.py"));

        let f = filter(&["{a,b}"], &[]);
        assert!(f.admits("{a,b}"));
        assert!(!f.admits("a"));
    }

    #[test]
    fn test_double_star_is_a_single_star() {
        let f = filter(&["**/x.py"], &[]);
        assert!(!f.admits("x.py"));
        assert!(f.admits("pkg/x.py"));
        assert!(f.admits("a/b/x.py"));

        let f = filter(&["a/**/b"], &[]);
        assert!(!f.admits("a/b"));
        assert!(f.admits("a/x/b"));
    }

    #[test]
    fn test_caret_in_class_is_literal() {
        let f = filter(&["[^a].txt"], &[]);
        assert!(f.admits("a.txt"));
        assert!(f.admits("^.txt"));
        assert!(!f.admits("b.txt"));
    }

    #[test]
    fn test_empty_class_never_matches() {
        let f = filter(&["[z-a].txt"], &[]);
        assert!(!f.admits("a.txt"));
        assert!(!f.admits("z.txt"));

        let f = filter(&[], &["[!z-a]"]);
        assert!(!f.admits("x"));
        assert!(f.admits("xy"));
    }
}
