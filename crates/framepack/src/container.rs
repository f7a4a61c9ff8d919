//! Distribution container assembly.
//!
//! A container wraps one or more merged bundles into a single directory
//! consumers can link against regardless of architecture. Layout:
//!
//! ```text
//! <P>.xcframework/
//! ├── Info.plist
//! └── macos-arm64_x86_64/           (one slice per merged bundle)
//!     ├── <P>.framework/
//!     └── dSYMs/                    (when debug symbols are attached)
//!         └── <P>.framework.dSYM/
//! ```
//!
//! The returned [`DistributionContainer`] carries the container-relative
//! codesign entry paths for each slice, so later stages work from the
//! assembled value and never re-derive paths from the filesystem.

use crate::PackResult;
use crate::SUPPORTED_PLATFORM;
use crate::arch::Arch;
use crate::bundle::MergedBundle;
use crate::fsops;
use crate::naming::ArtifactNaming;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Container metadata file name.
const INFO_PLIST: &str = "Info.plist";

/// Slice subdirectory holding attached debug-symbol bundles.
const DSYMS_DIR: &str = "dSYMs";

/// Container bundle package type.
const PACKAGE_TYPE: &str = "XFWK";

/// Container format version.
const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerInfo {
    available_libraries: Vec<LibraryRecord>,
    #[serde(rename = "CFBundlePackageType")]
    package_type: String,
    #[serde(rename = "XCFrameworkFormatVersion")]
    format_version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct LibraryRecord {
    binary_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug_symbols_path: Option<String>,
    library_identifier: String,
    library_path: String,
    supported_architectures: Vec<String>,
    supported_platform: String,
}

/// One architecture-set slice of an assembled container.
#[derive(Debug, Clone)]
pub struct ContainerSlice {
    identifier: String,
    archs: Vec<Arch>,
    executable_entry: String,
    dsym_binary_entry: Option<String>,
}

impl ContainerSlice {
    /// Slice identifier, e.g. `macos-arm64_x86_64`.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Architectures the slice's executable covers.
    #[must_use]
    pub fn archs(&self) -> &[Arch] {
        &self.archs
    }

    /// Container-relative path of the slice executable.
    #[must_use]
    pub fn executable_entry(&self) -> &str {
        &self.executable_entry
    }

    /// Container-relative path of the slice's debug-symbol binary, when a
    /// debug-symbol bundle was attached.
    #[must_use]
    pub fn dsym_binary_entry(&self) -> Option<&str> {
        self.dsym_binary_entry.as_deref()
    }
}

/// An assembled distribution container on disk.
#[derive(Debug, Clone)]
pub struct DistributionContainer {
    name: String,
    root: PathBuf,
    slices: Vec<ContainerSlice>,
}

impl DistributionContainer {
    /// Product name the container was assembled for.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Container root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Assembled slices in input order.
    #[must_use]
    pub fn slices(&self) -> &[ContainerSlice] {
        &self.slices
    }

    /// Container-relative executable paths across all slices.
    #[must_use]
    pub fn executable_entries(&self) -> Vec<String> {
        self.slices
            .iter()
            .map(|slice| slice.executable_entry.clone())
            .collect()
    }

    /// Container-relative debug-symbol binary paths across all slices
    /// that have one attached.
    #[must_use]
    pub fn dsym_binary_entries(&self) -> Vec<String> {
        self.slices
            .iter()
            .filter_map(|slice| slice.dsym_binary_entry.clone())
            .collect()
    }
}

/// Assemble a distribution container under `dst` from merged bundles.
///
/// Any container already at the destination is replaced wholesale. When
/// `include_dsyms` is set, each bundle's debug-symbol bundle is attached
/// under the slice's `dSYMs/` directory if it exists on disk; a missing
/// one is skipped rather than treated as an error, since extraction is
/// itself optional.
pub fn assemble(
    dst: &Path,
    naming: &ArtifactNaming,
    merged: &[MergedBundle],
    include_dsyms: bool,
) -> PackResult<DistributionContainer> {
    let root = dst.join(naming.container_dir());
    tracing::info!("Assembling {}", root.display());

    fsops::remove_existing(&root)?;
    fs::create_dir_all(&root)?;

    let mut slices = Vec::with_capacity(merged.len());
    let mut records = Vec::with_capacity(merged.len());
    for bundle in merged {
        let identifier = bundle.slice_identifier();
        let slice_dir = root.join(&identifier);
        fs::create_dir_all(&slice_dir)?;
        fsops::copy_dir(bundle.root(), &slice_dir.join(naming.bundle_dir()))?;

        let mut dsym_attached = false;
        if include_dsyms
            && let Some(dsym) = bundle.dsym_bundle()
            && dsym.exists()
        {
            let dsyms_dir = slice_dir.join(DSYMS_DIR);
            fs::create_dir_all(&dsyms_dir)?;
            fsops::copy_dir(dsym, &dsyms_dir.join(naming.dsym_bundle()))?;
            dsym_attached = true;
        }

        let mut components: Vec<String> = bundle
            .archs()
            .iter()
            .map(|arch| arch.slice_component().to_string())
            .collect();
        components.sort_unstable();

        records.push(LibraryRecord {
            binary_path: format!("{}/{}", naming.bundle_dir(), naming.executable_rel()),
            debug_symbols_path: dsym_attached.then(|| DSYMS_DIR.to_string()),
            library_identifier: identifier.clone(),
            library_path: naming.bundle_dir(),
            supported_architectures: components,
            supported_platform: SUPPORTED_PLATFORM.to_string(),
        });

        let executable_entry = format!(
            "{}/{}/{}/{}",
            naming.container_dir(),
            identifier,
            naming.bundle_dir(),
            naming.executable_rel()
        );
        let dsym_binary_entry = dsym_attached.then(|| {
            format!(
                "{}/{}/{}/{}/{}",
                naming.container_dir(),
                identifier,
                DSYMS_DIR,
                naming.dsym_bundle(),
                naming.dsym_binary_rel()
            )
        });

        slices.push(ContainerSlice {
            identifier,
            archs: bundle.archs().to_vec(),
            executable_entry,
            dsym_binary_entry,
        });
    }

    let info = ContainerInfo {
        available_libraries: records,
        package_type: PACKAGE_TYPE.to_string(),
        format_version: FORMAT_VERSION.to_string(),
    };
    plist::to_file_xml(root.join(INFO_PLIST), &info)?;

    Ok(DistributionContainer {
        name: naming.product().to_string(),
        root,
        slices,
    })
}
