//! Error types for the mirror engine.
//!
//! `MirrorError` covers run-level problems that prevent a mirror from
//! starting at all (unusable root paths). Per-item failures during the walk
//! never surface as errors; they are absorbed into the RunReport counters
//! and diagnostics so the traversal can continue.

use std::error::Error;
use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

/// Run-level errors: the roots could not be validated.
///
/// Everything past root validation is recoverable-and-recorded, so this
/// enum stays deliberately small.
#[derive(Debug)]
pub enum MirrorError {
    /// Source directory does not exist
    SourceNotFound { path: PathBuf },

    /// Source directory is not accessible (permissions)
    SourceAccessDenied { path: PathBuf, source: io::Error },

    /// Destination directory does not exist
    DestinationNotFound { path: PathBuf },

    /// Destination directory is not accessible
    DestinationAccessDenied { path: PathBuf, source: io::Error },

    /// A root path is empty or not a directory
    InvalidPath { path: PathBuf, reason: String },
}

impl Display for MirrorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceNotFound { path } => {
                write!(f, "Source directory not found: {}", path.display())
            }
            Self::SourceAccessDenied { path, .. } => {
                write!(f, "Source directory access denied: {}", path.display())
            }
            Self::DestinationNotFound { path } => {
                write!(f, "Destination directory not found: {}", path.display())
            }
            Self::DestinationAccessDenied { path, .. } => {
                write!(f, "Destination directory access denied: {}", path.display())
            }
            Self::InvalidPath { path, reason } => {
                write!(f, "Invalid path: {} ({})", path.display(), reason)
            }
        }
    }
}

impl Error for MirrorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SourceAccessDenied { source, .. }
            | Self::DestinationAccessDenied { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl MirrorError {
    /// Extract the OS error code from this error, if available.
    pub fn raw_os_error(&self) -> Option<u32> {
        match self {
            Self::SourceAccessDenied { source, .. }
            | Self::DestinationAccessDenied { source, .. } => {
                source.raw_os_error().map(|e| e as u32)
            }
            _ => None,
        }
    }
}
