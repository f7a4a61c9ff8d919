//! Release packaging for multi-architecture framework bundles
//!
//! This crate turns per-architecture framework builds into the artifacts a
//! release ships: one fat bundle whose executable covers every input
//! architecture, an xcframework-style distribution container, codesign
//! eligibility manifests, and the legacy double-zip archives downstream
//! release infrastructure consumes.
//!
//! # Pipeline
//!
//! ```text
//! arm64/Kit.framework ──┐
//!                       ├──► Kit.framework ──► Kit.xcframework ──► archives
//! x64/Kit.framework ────┘      (merge)           (assemble)       (publish)
//! ```
//!
//! # Output layout
//!
//! After a full run with stripping, debug-symbol extraction, and archive
//! publication, the destination holds:
//!
//! ```text
//! dst/
//! ├── Kit.framework/            # fat bundle
//! ├── Kit.unstripped            # unstripped executable copy
//! ├── Kit.xcframework/          # distribution container
//! ├── entitlements.txt          # codesign manifests for framework.zip
//! ├── without_entitlements.txt
//! ├── Kit.framework.zip         # double-zipped bundle archive
//! ├── framework.zip             # container archive
//! ├── Kit.dSYM/                 # debug symbols under their legacy name
//! └── Kit.dSYM.zip              # double-zipped debug-symbol archive
//! ```
//!
//! # Example
//!
//! ```no_run
//! use framepack::{Arch, ArchBundle, ArtifactNaming, MergeOptions, Toolchain};
//! use std::path::Path;
//!
//! let naming = ArtifactNaming::new("Kit")?;
//! let dst = Path::new("out/release");
//!
//! let bundles = vec![
//!     ArchBundle::locate(Arch::Arm64, Path::new("out/arm64"), &naming)?,
//!     ArchBundle::locate(Arch::X64, Path::new("out/x64"), &naming)?,
//! ];
//! let merged = framepack::create_fat_bundle(
//!     &bundles,
//!     dst,
//!     &naming,
//!     &Toolchain::host(),
//!     MergeOptions { strip: true, extract_dsym: true },
//! )?;
//! let container = framepack::assemble(dst, &naming, std::slice::from_ref(&merged), true)?;
//! framepack::publish_archives(dst, &naming, &container, vec![])?;
//! # Ok::<(), framepack::PackError>(())
//! ```

mod arch;
mod bundle;
mod error;
mod naming;

pub mod archive;
pub mod codesign;
pub mod container;
pub mod fsops;
pub mod merge;
pub mod paths;
pub mod publish;
pub mod tools;

pub use arch::Arch;
pub use archive::ArchiveSpec;
pub use bundle::{ArchBundle, MergedBundle};
pub use codesign::{CodesignManifest, collect_archive_contents};
pub use container::{ContainerSlice, DistributionContainer, assemble};
pub use error::PackError;
pub use merge::{MergeOptions, create_fat_bundle};
pub use naming::ArtifactNaming;
pub use publish::{PublishedArchives, publish_archives};
pub use tools::{
    BinaryMerger, DsymExtractor, Dsymutil, Lipo, Strip, SymbolStripper, Toolchain,
};

/// Result type for packaging operations.
pub type PackResult<T> = Result<T, PackError>;

/// Manifest of archive paths signed with entitlements.
pub const ENTITLEMENTS_FILE: &str = "entitlements.txt";

/// Manifest of archive paths signed without entitlements.
pub const WITHOUT_ENTITLEMENTS_FILE: &str = "without_entitlements.txt";

/// Platform tag used in container slice identifiers.
pub const SUPPORTED_PLATFORM: &str = "macos";
