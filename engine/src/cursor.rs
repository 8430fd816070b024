//! Mutable path builder used by the traversal.
//!
//! A `PathCursor` tracks the current directory position on one side of the
//! mirror (source or destination). The walker drives two cursors in lockstep,
//! replacing the trailing segment as it moves between siblings and popping a
//! full component when recursion returns. All operations edit one owned
//! buffer in place, so walking a large tree performs no per-entry path
//! allocation.

use std::path::{Path, MAIN_SEPARATOR};

/// Upper bound on the cursor buffer, in bytes.
///
/// On Windows the directory-creation APIs stop well short of the generic
/// path limit (MAX_PATH minus room for an 8.3 file name), so the cap keeps
/// that headroom. Elsewhere the usual PATH_MAX applies.
#[cfg(windows)]
pub const MAX_PATH_BYTES: usize = 248;
#[cfg(not(windows))]
pub const MAX_PATH_BYTES: usize = 4096;

/// A bounded, stack-disciplined path buffer.
///
/// The buffer always holds a well-formed path with no trailing separator,
/// except transiently between a [`push_separator`](Self::push_separator) and
/// the following [`push_segment`](Self::push_segment). Push operations that
/// would exceed [`MAX_PATH_BYTES`] stop at the cap and report it through
/// their return value; truncation is a policy, not a panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCursor {
    buf: String,
}

impl PathCursor {
    /// Create an empty cursor.
    pub fn new() -> Self {
        PathCursor { buf: String::new() }
    }

    /// Seed a cursor from an existing directory path, truncating at the
    /// capacity cap.
    ///
    /// Trailing separators are stripped so that push/pop round-trips are
    /// exact; a path that is nothing but separators (the filesystem root)
    /// keeps a single one. Non-Unicode path bytes are replaced lossily;
    /// callers validate roots before seeding. Use
    /// [`try_from_path`](Self::try_from_path) when truncation must be
    /// detected.
    pub fn from_path(path: &Path) -> Self {
        Self::seed(path).0
    }

    /// Seed a cursor from an existing directory path, refusing paths that
    /// do not fit the capacity cap.
    pub fn try_from_path(path: &Path) -> Option<Self> {
        match Self::seed(path) {
            (cursor, true) => Some(cursor),
            _ => None,
        }
    }

    fn seed(path: &Path) -> (Self, bool) {
        let text = path.to_string_lossy();
        let trimmed = text.trim_end_matches(MAIN_SEPARATOR);
        let mut cursor = PathCursor::new();
        let fit = if trimmed.is_empty() && !text.is_empty() {
            cursor.push_separator()
        } else {
            cursor.push_segment(trimmed)
        };
        (cursor, fit)
    }

    /// Append `text` to the buffer, character by character, stopping silently
    /// at the capacity cap.
    ///
    /// Returns `false` when the append was cut short; the caller decides
    /// whether that is worth a diagnostic.
    pub fn push_segment(&mut self, text: &str) -> bool {
        for ch in text.chars() {
            if self.buf.len() + ch.len_utf8() > MAX_PATH_BYTES {
                return false;
            }
            self.buf.push(ch);
        }
        true
    }

    /// Append the platform separator unless the buffer already ends with one.
    pub fn push_separator(&mut self) -> bool {
        if self.buf.ends_with(MAIN_SEPARATOR) {
            return true;
        }
        if self.buf.len() + MAIN_SEPARATOR.len_utf8() > MAX_PATH_BYTES {
            return false;
        }
        self.buf.push(MAIN_SEPARATOR);
        true
    }

    /// Remove the trailing path component back to (but keeping) the nearest
    /// separator, so a sibling segment can be pushed in its place.
    ///
    /// A cursor holding no separator is cleared rather than scanned past
    /// index 0. A buffer already ending in a separator is left unchanged.
    pub fn pop_last_segment(&mut self) {
        match self.buf.rfind(MAIN_SEPARATOR) {
            Some(i) => self.buf.truncate(i + MAIN_SEPARATOR.len_utf8()),
            None => self.buf.clear(),
        }
    }

    /// Remove the trailing component entirely, including its separator,
    /// restoring the parent directory path with no trailing separator.
    ///
    /// A component hanging directly off the filesystem root keeps the root
    /// separator, so popping never produces an empty absolute path.
    pub fn pop_full_directory(&mut self) {
        match self.buf.rfind(MAIN_SEPARATOR) {
            Some(0) => self.buf.truncate(MAIN_SEPARATOR.len_utf8()),
            Some(i) => self.buf.truncate(i),
            None => self.buf.clear(),
        }
    }

    /// Append `other`'s final `<separator><leaf>` component onto `self`.
    ///
    /// Used once per run so the destination tree is rooted at
    /// `<dest><separator><source leaf>` instead of spilling the source's
    /// contents directly into the destination root.
    pub fn push_leaf_of(&mut self, other: &PathCursor) -> bool {
        match other.buf.rfind(MAIN_SEPARATOR) {
            Some(i) => self.push_segment(&other.buf[i..]),
            None => self.push_separator() && self.push_segment(&other.buf),
        }
    }

    /// The current path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// The current path, borrowed for filesystem calls.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.buf)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for PathCursor {
    fn default() -> Self {
        PathCursor::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(path: &str) -> PathCursor {
        let mut cursor = PathCursor::new();
        cursor.push_segment(path);
        cursor
    }

    #[test]
    fn push_pop_round_trip_is_exact() {
        let mut cursor = seeded("/data/photos");
        let original = cursor.as_str().to_owned();

        cursor.push_separator();
        cursor.push_segment("2021");
        cursor.pop_last_segment();
        cursor.push_segment("2022");
        cursor.pop_full_directory();

        assert_eq!(cursor.as_str(), original);
    }

    #[test]
    fn pop_last_segment_keeps_separator() {
        let mut cursor = seeded("/data/photos/a.jpg");
        cursor.pop_last_segment();
        assert_eq!(cursor.as_str(), "/data/photos/");
    }

    #[test]
    fn pop_last_segment_on_trailing_separator_is_noop() {
        let mut cursor = seeded("/data/");
        cursor.pop_last_segment();
        assert_eq!(cursor.as_str(), "/data/");
    }

    #[test]
    fn pop_full_directory_strips_component_and_separator() {
        let mut cursor = seeded("/data/photos");
        cursor.pop_full_directory();
        assert_eq!(cursor.as_str(), "/data");
    }

    #[test]
    fn pop_full_directory_on_trailing_separator_strips_it() {
        // An empty directory leaves the cursor on its separator; popping must
        // still restore the parent exactly.
        let mut cursor = seeded("/data/photos/");
        cursor.pop_full_directory();
        assert_eq!(cursor.as_str(), "/data/photos");
    }

    #[test]
    fn pops_at_depth_zero_stop_at_index_zero() {
        let mut cursor = seeded("name-without-separator");
        cursor.pop_last_segment();
        assert_eq!(cursor.as_str(), "");

        let mut cursor = seeded("name-without-separator");
        cursor.pop_full_directory();
        assert_eq!(cursor.as_str(), "");

        // Popping an already-empty cursor must not underflow.
        cursor.pop_full_directory();
        assert_eq!(cursor.as_str(), "");
    }

    #[test]
    fn push_segment_truncates_at_capacity() {
        let mut cursor = PathCursor::new();
        let long = "x".repeat(MAX_PATH_BYTES + 100);

        let fit = cursor.push_segment(&long);
        assert!(!fit);
        assert_eq!(cursor.len(), MAX_PATH_BYTES);

        // Further pushes keep refusing without growing the buffer.
        assert!(!cursor.push_segment("more"));
        assert_eq!(cursor.len(), MAX_PATH_BYTES);
    }

    #[test]
    fn push_segment_never_splits_a_character() {
        let mut cursor = PathCursor::new();
        cursor.push_segment(&"x".repeat(MAX_PATH_BYTES - 1));
        // A two-byte character cannot fit in the single remaining byte.
        assert!(!cursor.push_segment("é"));
        assert_eq!(cursor.len(), MAX_PATH_BYTES - 1);
    }

    #[test]
    fn push_leaf_of_appends_source_leaf() {
        let src = seeded("/data/photos");
        let mut dst = seeded("/backup");
        assert!(dst.push_leaf_of(&src));
        assert_eq!(dst.as_str(), "/backup/photos");
    }

    #[test]
    fn push_leaf_of_without_separator_appends_whole_path() {
        let src = seeded("photos");
        let mut dst = seeded("/backup");
        assert!(dst.push_leaf_of(&src));
        assert_eq!(dst.as_str(), "/backup/photos");
    }

    #[test]
    fn from_path_strips_trailing_separator() {
        let cursor = PathCursor::from_path(Path::new("/data/photos/"));
        assert_eq!(cursor.as_str(), "/data/photos");
    }

    #[test]
    fn from_path_preserves_filesystem_root() {
        let cursor = PathCursor::from_path(Path::new("/"));
        assert_eq!(cursor.as_str(), "/");
    }

    #[test]
    fn pop_full_directory_keeps_root_separator() {
        let mut cursor = seeded("/data");
        cursor.pop_full_directory();
        assert_eq!(cursor.as_str(), "/");

        cursor.pop_full_directory();
        assert_eq!(cursor.as_str(), "/");
    }

    #[test]
    fn try_from_path_refuses_overlong_paths() {
        let long = format!("/{}", "x".repeat(MAX_PATH_BYTES + 10));
        assert!(PathCursor::try_from_path(Path::new(&long)).is_none());
        assert!(PathCursor::try_from_path(Path::new("/data/photos")).is_some());
    }

    #[test]
    fn push_leaf_of_reports_truncation() {
        let src = seeded("/data/photos");
        let mut dst = PathCursor::new();
        dst.push_segment(&"x".repeat(MAX_PATH_BYTES - 4));

        assert!(!dst.push_leaf_of(&src));
        // Whatever fit stays behind; the caller decides what to do with it.
        assert_eq!(dst.len(), MAX_PATH_BYTES);
    }

    #[test]
    fn sibling_replacement_sequence() {
        // The exact sequence the walker performs for each enumerated entry.
        let mut cursor = seeded("/data");
        cursor.push_separator();

        for name in ["a.txt", "b.txt", "sub"] {
            cursor.pop_last_segment();
            cursor.push_segment(name);
            assert_eq!(cursor.as_str(), format!("/data/{name}"));
        }

        cursor.pop_full_directory();
        assert_eq!(cursor.as_str(), "/data");
    }
}
