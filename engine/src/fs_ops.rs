//! Low-level filesystem operations: the copy primitive and destination
//! directory creation.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use filetime::FileTime;

/// Create a single directory level; an already-existing directory is not an
/// error.
///
/// The parent is expected to exist (the walker creates destination
/// directories top-down). A missing parent or an unwritable volume is a
/// structural failure the caller turns into a subtree skip.
pub fn create_dir(path: &Path) -> io::Result<()> {
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e),
    }
}

/// Copy `src` over `dst`, clobbering any existing destination file.
///
/// The source's modification time is carried over to the destination after
/// the data is written: the destination mtime is the "already mirrored"
/// marker the next run's staleness test relies on. A failure to set the
/// mtime is tolerated (the worst outcome is one redundant recopy).
///
/// # Returns
/// Number of bytes copied
///
/// # Errors
/// Returns the underlying `io::Error` when the source cannot be read or the
/// destination cannot be written.
pub fn copy_file(src: &Path, dst: &Path) -> io::Result<u64> {
    let mut src_file = File::open(src)?;
    let src_meta = src_file.metadata()?;
    let src_mtime = FileTime::from_last_modification_time(&src_meta);

    let mut dst_file = File::create(dst)?;
    let bytes_copied = io::copy(&mut src_file, &mut dst_file)?;

    // Close before stamping the mtime, or the final flush would bump it.
    drop(dst_file);
    let _ = filetime::set_file_mtime(dst, src_mtime);

    Ok(bytes_copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn create_dir_is_idempotent() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let dir = temp_dir.path().join("new");

        create_dir(&dir).expect("First create should succeed");
        create_dir(&dir).expect("Second create should also succeed");
        assert!(dir.is_dir());
    }

    #[test]
    fn create_dir_fails_without_parent() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let dir = temp_dir.path().join("missing").join("child");

        assert!(create_dir(&dir).is_err());
    }

    #[test]
    fn copy_file_clobbers_destination() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src.txt");
        let dst = temp_dir.path().join("dst.txt");

        fs::write(&src, b"fresh").expect("Failed to write source");
        fs::write(&dst, b"stale destination contents").expect("Failed to write dest");

        let bytes = copy_file(&src, &dst).expect("Copy should succeed");
        assert_eq!(bytes, 5);
        assert_eq!(fs::read(&dst).expect("Failed to read dest"), b"fresh");
    }

    #[test]
    fn copy_file_preserves_modification_time() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src.txt");
        let dst = temp_dir.path().join("dst.txt");

        let mut file = File::create(&src).expect("Failed to create source");
        file.write_all(b"content").expect("Failed to write source");
        drop(file);

        let mtime = FileTime::from_unix_time(1_500_000_000, 0);
        filetime::set_file_mtime(&src, mtime).expect("Failed to set source mtime");

        copy_file(&src, &dst).expect("Copy should succeed");

        let dst_meta = fs::metadata(&dst).expect("Failed to stat dest");
        let dst_mtime = FileTime::from_last_modification_time(&dst_meta);
        assert_eq!(dst_mtime.unix_seconds(), mtime.unix_seconds());
    }

    #[test]
    fn copy_file_fails_on_missing_source() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let result = copy_file(
            &temp_dir.path().join("missing.txt"),
            &temp_dir.path().join("dst.txt"),
        );
        assert!(result.is_err());
    }
}
