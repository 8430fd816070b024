//! # Mirror Engine - Incremental Directory Mirroring Library
//!
//! A headless engine for one-way, incremental mirroring of a source
//! directory tree into a destination tree. Designed as the foundation for
//! thin frontends (CLI, automation).
//!
//! ## Overview
//!
//! The engine recreates the source's directory structure under
//! `<destination>/<source leaf>` and copies only the files whose last-write
//! time differs meaningfully from the mirrored copy. It features:
//! - Allocation-free path tracking during traversal (a pair of lockstep
//!   path cursors)
//! - Timestamp-tolerance change detection with a byte-level fallback
//! - Per-item error isolation: failures are recorded and the walk continues
//! - Run statistics and ordered diagnostics for the caller's reporter
//!
//! ## Basic Usage
//!
//! ```no_run
//! use engine::run_mirror;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = run_mirror("/data/photos".as_ref(), "/backup".as_ref())?;
//!
//! println!(
//!     "{} of {} files copied, {} errors",
//!     report.copies_succeeded, report.should_copy, report.errors
//! );
//! for line in report.diagnostics() {
//!     eprintln!("{line}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **cursor**: the mutable, bounded path builder driven by the walker
//! - **change**: staleness test and byte-level fallback comparison
//! - **walker**: the recursive traversal and the `run_mirror` entry point
//! - **report**: per-run counters and diagnostics
//! - **fs_ops**: copy primitive and directory creation
//! - **error**: run-level error type

pub mod change;
pub mod cursor;
pub mod error;
pub mod fs_ops;
pub mod report;
pub mod walker;

// Re-export main types and functions
pub use change::{contents_equal, should_copy, CompareBuffers, MTIME_TOLERANCE_SECS};
pub use cursor::{PathCursor, MAX_PATH_BYTES};
pub use error::MirrorError;
pub use report::{RunReport, RunSummary};
pub use walker::{run_mirror, MirrorWalker};
