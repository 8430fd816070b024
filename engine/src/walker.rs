//! The recursive mirroring traversal.
//!
//! [`MirrorWalker::mirror`] walks one source directory and its destination
//! counterpart in lockstep, copying stale files, recursing into
//! subdirectories, and recording every per-item failure into the
//! [`RunReport`] without ever aborting the run. [`run_mirror`] is the
//! entry point: it validates the two roots, seeds the cursors, and drives
//! the walk.

use std::fs;
use std::io;
use std::path::Path;

use crate::change::{self, CompareBuffers};
use crate::cursor::PathCursor;
use crate::error::MirrorError;
use crate::fs_ops;
use crate::report::RunReport;

/// Recursive tree walker for one mirror run.
///
/// Owns the scratch buffers for fallback byte comparison so they are
/// allocated once per run rather than once per failed copy.
pub struct MirrorWalker {
    buffers: CompareBuffers,
}

impl MirrorWalker {
    pub fn new() -> Self {
        MirrorWalker {
            buffers: CompareBuffers::new(),
        }
    }

    /// Mirror the directory named by `src` into the directory named by
    /// `dst`.
    ///
    /// On entry both cursors point at the same directory on their
    /// respective sides; on exit they are restored to exactly that state,
    /// so the caller can keep iterating siblings without cursor drift.
    ///
    /// Failures local to one entry are recorded and the walk continues
    /// with the next sibling. Failing to create or enumerate the current
    /// directory skips this whole subtree, and the parent's walk continues.
    /// No error crosses this boundary.
    pub fn mirror(&mut self, src: &mut PathCursor, dst: &mut PathCursor, report: &mut RunReport) {
        if let Err(e) = fs_ops::create_dir(dst.as_path()) {
            report.record_error(format!(
                "could not create directory '{}': {}; this folder and its subfolders will not be mirrored",
                dst.as_str(),
                e
            ));
            return;
        }

        let entries = match fs::read_dir(src.as_path()) {
            Ok(entries) => entries,
            Err(e) => {
                report.record_error(format!(
                    "could not enumerate '{}': {}; this folder and its subfolders will not be mirrored",
                    src.as_str(),
                    e
                ));
                return;
            }
        };

        // Kept for diagnostics; the cursors mutate per entry below.
        let dir_display = src.as_str().to_owned();

        let src_sep = src.push_separator();
        let dst_sep = dst.push_separator();
        if !src_sep || !dst_sep {
            // A side already at the cap would have its pops eat a real
            // component; undo the side that did grow and skip the subtree.
            if src_sep {
                src.pop_full_directory();
            }
            if dst_sep {
                dst.pop_full_directory();
            }
            report.record_error(format!(
                "path under '{}' exceeds the path length cap; this folder and its subfolders will not be mirrored",
                dir_display
            ));
            return;
        }

        // `read_dir` never yields the self/parent pseudo-entries, and its
        // order is whatever the filesystem returns; nothing here depends
        // on it.
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    report.record_error(format!(
                        "could not read an entry of '{}': {}",
                        dir_display, e
                    ));
                    continue;
                }
            };

            let name_os = entry.file_name();
            let name = match name_os.to_str() {
                Some(name) => name,
                None => {
                    report.record_error(format!(
                        "entry {:?} in '{}' has a non-Unicode name and was skipped",
                        name_os, dir_display
                    ));
                    continue;
                }
            };

            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    report.record_error(format!(
                        "could not classify '{}' in '{}': {}",
                        name, dir_display, e
                    ));
                    continue;
                }
            };

            // Swap the previous sibling's segment for this entry's name on
            // both sides. On the first entry this pops back to the
            // separator pushed above.
            src.pop_last_segment();
            dst.pop_last_segment();
            let src_fit = src.push_segment(name);
            let dst_fit = dst.push_segment(name);
            if !src_fit || !dst_fit {
                // The truncated segment is discarded by the next pop; the
                // entry is skipped instead of being mirrored under a wrong
                // path.
                report.record_error(format!(
                    "path for '{}' under '{}' exceeds the path length cap; entry skipped",
                    name, dir_display
                ));
                continue;
            }

            if file_type.is_dir() {
                self.mirror(src, dst, report);
            } else {
                self.mirror_file(src, dst, report);
            }
        }

        report.folders_checked += 1;

        src.pop_full_directory();
        dst.pop_full_directory();
    }

    /// Process one regular file: staleness test, copy, and the fallback
    /// reclassification when the copy fails but the destination already
    /// matches byte for byte.
    fn mirror_file(&mut self, src: &PathCursor, dst: &PathCursor, report: &mut RunReport) {
        report.files_checked += 1;

        if !change::should_copy(src.as_path(), dst.as_path()) {
            return;
        }
        report.should_copy += 1;

        match fs_ops::copy_file(src.as_path(), dst.as_path()) {
            Ok(_) => report.copies_succeeded += 1,
            Err(e) => {
                if change::contents_equal(&mut self.buffers, src.as_path(), dst.as_path()) {
                    // The copy was refused but the destination already holds
                    // the same bytes: a false-positive staleness call, not
                    // an error.
                    report.should_copy -= 1;
                } else {
                    report.record_error(format!("{}: '{}' was not copied", e, src.as_str()));
                }
            }
        }
    }
}

impl Default for MirrorWalker {
    fn default() -> Self {
        MirrorWalker::new()
    }
}

/// Run a full mirror of `source` into `destination`.
///
/// The mirrored tree is rooted at `<destination>/<source leaf>`, so
/// mirroring `/data/photos` into `/backup` produces `/backup/photos/...`.
///
/// # Errors
/// Returns `MirrorError` only when a root path cannot be validated. Every
/// failure after that point is recorded in the returned [`RunReport`].
pub fn run_mirror(source: &Path, destination: &Path) -> Result<RunReport, MirrorError> {
    validate_root(source, true)?;
    validate_root(destination, false)?;

    // Seeding must not truncate: a clipped root would make the whole run
    // mirror into a wrong directory.
    let mut src = PathCursor::try_from_path(source).ok_or_else(|| MirrorError::InvalidPath {
        path: source.to_path_buf(),
        reason: "path exceeds the path length cap".to_string(),
    })?;
    let mut dst =
        PathCursor::try_from_path(destination).ok_or_else(|| MirrorError::InvalidPath {
            path: destination.to_path_buf(),
            reason: "path exceeds the path length cap".to_string(),
        })?;
    if !dst.push_leaf_of(&src) {
        return Err(MirrorError::InvalidPath {
            path: destination.to_path_buf(),
            reason: "destination plus the source leaf exceeds the path length cap".to_string(),
        });
    }

    let mut report = RunReport::new();
    let mut walker = MirrorWalker::new();
    walker.mirror(&mut src, &mut dst, &mut report);
    report.finish();

    Ok(report)
}

fn validate_root(path: &Path, is_source: bool) -> Result<(), MirrorError> {
    if path.as_os_str().is_empty() {
        return Err(MirrorError::InvalidPath {
            path: path.to_path_buf(),
            reason: "path is empty".to_string(),
        });
    }

    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(MirrorError::InvalidPath {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if is_source {
                Err(MirrorError::SourceNotFound {
                    path: path.to_path_buf(),
                })
            } else {
                Err(MirrorError::DestinationNotFound {
                    path: path.to_path_buf(),
                })
            }
        }
        Err(e) => {
            if is_source {
                Err(MirrorError::SourceAccessDenied {
                    path: path.to_path_buf(),
                    source: e,
                })
            } else {
                Err(MirrorError::DestinationAccessDenied {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        }
    }
}
