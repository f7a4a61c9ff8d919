//! Error types for packaging operations.

use crate::arch::Arch;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during packaging operations.
#[derive(Debug, Error)]
pub enum PackError {
    /// Product name is empty or contains path separators.
    #[error("Invalid product name: {0:?}")]
    InvalidProductName(String),

    /// Per-architecture bundle directory not found.
    #[error("Cannot find {arch} bundle at {}", .path.display())]
    MissingBundle {
        /// Architecture the bundle was expected for.
        arch: Arch,
        /// Path that was checked.
        path: PathBuf,
    },

    /// Bundle exists but its executable is missing.
    #[error("Cannot find {arch} executable at {}", .path.display())]
    MissingExecutable {
        /// Architecture the executable was expected for.
        arch: Arch,
        /// Path that was checked.
        path: PathBuf,
    },

    /// Fat bundle merge needs at least two inputs.
    #[error("Fat bundle merge requires at least two bundles, got {0}")]
    NotEnoughBundles(usize),

    /// Two merge inputs claim the same architecture.
    #[error("Duplicate architecture in merge inputs: {0}")]
    DuplicateArchitecture(Arch),

    /// A path appears more than once across the codesign manifest lists.
    #[error("Duplicate codesign manifest entry: {0}")]
    DuplicateManifestEntry(String),

    /// A codesign manifest path is absent from the archive contents.
    #[error("Codesign manifest entry not found in archive contents: {0}")]
    ManifestPathNotFound(String),

    /// External tool could not be launched.
    #[error("Failed to launch {tool}: {source}")]
    ToolSpawn {
        /// Tool that failed to start.
        tool: &'static str,
        /// Underlying launch error.
        #[source]
        source: std::io::Error,
    },

    /// External tool exited unsuccessfully.
    #[error("{tool} exited with status {code}: {stderr}")]
    Tool {
        /// Tool that failed.
        tool: &'static str,
        /// Exit code, or -1 when the tool was killed by a signal.
        code: i32,
        /// Captured standard error output.
        stderr: String,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path fell outside the tree being walked.
    #[error("Path prefix error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Directory traversal error.
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// ZIP archive error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Property list serialization error.
    #[error("Plist error: {0}")]
    Plist(#[from] plist::Error),
}
