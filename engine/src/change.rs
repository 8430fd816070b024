//! Change detection: decides whether a destination file is stale.
//!
//! The primary test compares last-write timestamps with a coarse tolerance.
//! The byte-level comparison is a fallback used only after a copy attempt
//! fails, to tell a real error apart from a false-positive "should copy"
//! (for example a sharing violation on a file that already matches).

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use filetime::FileTime;

/// Minimum last-write difference, in seconds, before a file counts as
/// changed.
///
/// Filesystem timestamp resolution can be as coarse as two seconds (FAT),
/// so the tolerance must stay well above that or every run recopies
/// everything. Ten seconds is a safety margin, not a correctness knob.
pub const MTIME_TOLERANCE_SECS: i64 = 10;

/// Chunk size for the byte-level fallback comparison.
pub const COMPARE_BUF_BYTES: usize = 1024 * 1024;

/// Last-write time of `path`, or the epoch when the path is missing or
/// unreadable.
///
/// The zero fallback is what makes a brand-new file copy without a special
/// case: any real source timestamp differs from the epoch by far more than
/// the tolerance.
pub fn last_write_or_epoch(path: &Path) -> FileTime {
    fs::metadata(path)
        .map(|meta| FileTime::from_last_modification_time(&meta))
        .unwrap_or_else(|_| FileTime::zero())
}

/// True when two timestamps differ by more than [`MTIME_TOLERANCE_SECS`].
pub fn outside_tolerance(a: FileTime, b: FileTime) -> bool {
    let a_ns = a.unix_seconds() as i128 * 1_000_000_000 + a.nanoseconds() as i128;
    let b_ns = b.unix_seconds() as i128 * 1_000_000_000 + b.nanoseconds() as i128;
    (a_ns - b_ns).abs() > MTIME_TOLERANCE_SECS as i128 * 1_000_000_000
}

/// Decide whether `dst` is stale relative to `src`.
pub fn should_copy(src: &Path, dst: &Path) -> bool {
    outside_tolerance(last_write_or_epoch(src), last_write_or_epoch(dst))
}

/// Reusable scratch space for [`contents_equal`].
///
/// One pair of buffers serves the whole run; the walker owns it and lends it
/// to each fallback comparison, so there is no process-wide state.
pub struct CompareBuffers {
    src: Vec<u8>,
    dst: Vec<u8>,
}

impl CompareBuffers {
    pub fn new() -> Self {
        CompareBuffers {
            src: vec![0; COMPARE_BUF_BYTES],
            dst: vec![0; COMPARE_BUF_BYTES],
        }
    }
}

impl Default for CompareBuffers {
    fn default() -> Self {
        CompareBuffers::new()
    }
}

/// Compare two files byte for byte.
///
/// Returns `false` on any failure to open or read either file: "not
/// confirmed equal" is treated the same as "different", which keeps the
/// caller's error accounting honest. Sizes are checked first as a fast fail.
/// Both handles are dropped on every return path.
pub fn contents_equal(bufs: &mut CompareBuffers, src: &Path, dst: &Path) -> bool {
    let mut src_file = match File::open(src) {
        Ok(file) => file,
        Err(_) => return false,
    };
    let mut dst_file = match File::open(dst) {
        Ok(file) => file,
        Err(_) => return false,
    };

    let src_len = match src_file.metadata() {
        Ok(meta) => meta.len(),
        Err(_) => return false,
    };
    let dst_len = match dst_file.metadata() {
        Ok(meta) => meta.len(),
        Err(_) => return false,
    };
    if src_len != dst_len {
        return false;
    }

    loop {
        let src_read = match fill_chunk(&mut src_file, &mut bufs.src) {
            Ok(n) => n,
            Err(_) => return false,
        };
        let dst_read = match fill_chunk(&mut dst_file, &mut bufs.dst) {
            Ok(n) => n,
            Err(_) => return false,
        };

        // With the size check above a length mismatch here should not
        // happen, but a file changing mid-comparison still lands on the
        // safe answer.
        if src_read != dst_read {
            return false;
        }
        if src_read == 0 {
            return true;
        }
        if bufs.src[..src_read] != bufs.dst[..dst_read] {
            return false;
        }
    }
}

/// Read until `buf` is full or end of file, so both sides are compared over
/// identical chunk boundaries regardless of short reads.
fn fill_chunk(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
