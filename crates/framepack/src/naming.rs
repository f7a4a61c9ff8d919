//! Legacy naming conventions for release artifacts.
//!
//! Downstream release infrastructure addresses artifacts by fixed names
//! derived from the product name. Every such name is produced here so the
//! conventions live in exactly one place; other modules never format
//! artifact names themselves.

use crate::PackResult;
use crate::error::PackError;

/// Derives the legacy artifact names for a product.
///
/// # Example
///
/// ```
/// use framepack::ArtifactNaming;
///
/// let naming = ArtifactNaming::new("Kit").unwrap();
/// assert_eq!(naming.bundle_dir(), "Kit.framework");
/// assert_eq!(naming.container_dir(), "Kit.xcframework");
/// assert_eq!(naming.inner_archive(), "Kit.framework.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNaming {
    product: String,
}

impl ArtifactNaming {
    /// Create the naming table for a product.
    ///
    /// The product name becomes part of file names, so it must be non-empty
    /// and must not contain path separators.
    pub fn new(product: &str) -> PackResult<Self> {
        if product.is_empty() || product.contains('/') || product.contains('\\') {
            return Err(PackError::InvalidProductName(product.to_string()));
        }
        Ok(Self {
            product: product.to_string(),
        })
    }

    /// The product name the table was built from.
    #[must_use]
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Versioned bundle directory name: `<P>.framework`.
    #[must_use]
    pub fn bundle_dir(&self) -> String {
        format!("{}.framework", self.product)
    }

    /// Executable path relative to the bundle root: `Versions/A/<P>`.
    #[must_use]
    pub fn executable_rel(&self) -> String {
        format!("Versions/A/{}", self.product)
    }

    /// Distribution container directory name: `<P>.xcframework`.
    #[must_use]
    pub fn container_dir(&self) -> String {
        format!("{}.xcframework", self.product)
    }

    /// Debug-symbol bundle name as produced by extraction:
    /// `<P>.framework.dSYM`.
    #[must_use]
    pub fn dsym_bundle(&self) -> String {
        format!("{}.framework.dSYM", self.product)
    }

    /// Debug-symbol bundle name expected by downstream consumers:
    /// `<P>.dSYM`.
    #[must_use]
    pub fn legacy_dsym_bundle(&self) -> String {
        format!("{}.dSYM", self.product)
    }

    /// Debug-symbol binary path relative to the debug-symbol bundle root:
    /// `Contents/Resources/DWARF/<P>`.
    #[must_use]
    pub fn dsym_binary_rel(&self) -> String {
        format!("Contents/Resources/DWARF/{}", self.product)
    }

    /// Inner bundle archive name, also the published bundle archive name:
    /// `<P>.framework.zip`.
    #[must_use]
    pub fn inner_archive(&self) -> String {
        format!("{}.framework.zip", self.product)
    }

    /// Intermediate outer bundle archive name: `<P>.framework_.zip`.
    ///
    /// The trailing underscore keeps the intermediate from colliding with
    /// the published archive, which reuses the inner archive's name.
    #[must_use]
    pub fn outer_archive(&self) -> String {
        format!("{}.framework_.zip", self.product)
    }

    /// Container archive name: `framework.zip`. Fixed, not derived from
    /// the product name.
    #[must_use]
    pub fn container_archive(&self) -> String {
        "framework.zip".to_string()
    }

    /// Inner debug-symbol archive name, also the published debug-symbol
    /// archive name: `<P>.dSYM.zip`.
    #[must_use]
    pub fn dsym_inner_archive(&self) -> String {
        format!("{}.dSYM.zip", self.product)
    }

    /// Intermediate outer debug-symbol archive name: `<P>.dSYM_.zip`.
    #[must_use]
    pub fn dsym_outer_archive(&self) -> String {
        format!("{}.dSYM_.zip", self.product)
    }

    /// Name of the unstripped executable copy kept next to the bundle:
    /// `<P>.unstripped`.
    #[must_use]
    pub fn unstripped_copy(&self) -> String {
        format!("{}.unstripped", self.product)
    }

    /// Executable path as seen through the inner archive:
    /// `<P>.framework.zip/Versions/A/<P>`.
    ///
    /// This is the form codesign manifests use to address the executable
    /// inside the published double-zip.
    #[must_use]
    pub fn inner_archive_executable(&self) -> String {
        format!("{}/{}", self.inner_archive(), self.executable_rel())
    }
}
