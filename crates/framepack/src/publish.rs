//! Release archive publication.
//!
//! Published artifacts keep their legacy double-zip shape: the download
//! is an outer zip whose top level holds the real artifact zip next to
//! the codesign manifests, so signing infrastructure can read the
//! manifests without unpacking the artifact itself. The outer archive is
//! staged under an underscore-suffixed name and moved over the published
//! name last, which is also why the published archive and the inner
//! archive share a name.

use crate::archive::ArchiveSpec;
use crate::codesign::{self, CodesignManifest};
use crate::container::DistributionContainer;
use crate::fsops;
use crate::naming::ArtifactNaming;
use crate::{ENTITLEMENTS_FILE, PackResult, WITHOUT_ENTITLEMENTS_FILE};
use std::fs;
use std::path::{Path, PathBuf};

/// Paths of the archives a publish run produced.
#[derive(Debug, Clone)]
pub struct PublishedArchives {
    /// Published double-zipped bundle archive (`<P>.framework.zip`).
    pub bundle_archive: PathBuf,
    /// Container archive (`framework.zip`).
    pub container_archive: PathBuf,
    /// Published double-zipped debug-symbol archive (`<P>.dSYM.zip`),
    /// when a debug-symbol bundle was present.
    pub dsym_archive: Option<PathBuf>,
}

/// Package the merged bundle and assembled container into the published
/// release archives under `dst`.
///
/// Writes the bundle and container codesign manifests, validates the
/// container manifest against the exact container archive contents, and
/// only then creates archives; a stale manifest aborts the run with no
/// archive written. The debug-symbol bundle, when present on disk, is
/// renamed to its legacy name and double-zipped as well.
pub fn publish_archives(
    dst: &Path,
    naming: &ArtifactNaming,
    container: &DistributionContainer,
    with_entitlements: Vec<String>,
) -> PackResult<PublishedArchives> {
    tracing::info!("Publishing archives to {}", dst.display());
    let bundle_root = dst.join(naming.bundle_dir());

    // The bundle manifest addresses the executable through the inner
    // archive. Both manifest files land inside the bundle root so the
    // inner zip carries them too.
    let bundle_manifest = CodesignManifest::new(vec![], vec![naming.inner_archive_executable()]);
    bundle_manifest.write_to(&bundle_root)?;

    let container_manifest = CodesignManifest::for_container(container, with_entitlements);
    container_manifest.write_to(dst)?;

    let container_entries = vec![
        naming.container_dir(),
        ENTITLEMENTS_FILE.to_string(),
        WITHOUT_ENTITLEMENTS_FILE.to_string(),
    ];
    let contents = codesign::collect_archive_contents(dst, &container_entries)?;
    container_manifest.validate(&contents)?;

    let bundle_archive = double_zip(
        &bundle_root,
        &naming.inner_archive(),
        &naming.outer_archive(),
        vec![
            naming.inner_archive(),
            ENTITLEMENTS_FILE.to_string(),
            WITHOUT_ENTITLEMENTS_FILE.to_string(),
        ],
        &dst.join(naming.inner_archive()),
    )?;

    let container_archive =
        ArchiveSpec::new(dst, naming.container_archive(), container_entries).create()?;

    let dsym_archive = publish_dsym_archive(dst, naming)?;

    Ok(PublishedArchives {
        bundle_archive,
        container_archive,
        dsym_archive,
    })
}

/// Rename the extracted debug-symbol bundle to its legacy name and
/// double-zip it.
///
/// Driven by presence on disk so runs without extraction skip it. The
/// rename replaces any stale legacy bundle from an earlier run.
fn publish_dsym_archive(dst: &Path, naming: &ArtifactNaming) -> PackResult<Option<PathBuf>> {
    let extracted = dst.join(naming.dsym_bundle());
    if !extracted.exists() {
        return Ok(None);
    }

    let legacy = dst.join(naming.legacy_dsym_bundle());
    fsops::remove_existing(&legacy)?;
    fs::rename(&extracted, &legacy)?;

    let published = double_zip(
        &legacy,
        &naming.dsym_inner_archive(),
        &naming.dsym_outer_archive(),
        vec![naming.dsym_inner_archive()],
        &dst.join(naming.dsym_inner_archive()),
    )?;
    Ok(Some(published))
}

/// Inner archive of the whole root, outer archive of the listed contents,
/// then move the outer archive over the published path.
fn double_zip(
    root: &Path,
    inner_name: &str,
    outer_name: &str,
    outer_contents: Vec<String>,
    published: &Path,
) -> PackResult<PathBuf> {
    ArchiveSpec::new(root, inner_name, vec![".".to_string()]).create()?;
    let outer = ArchiveSpec::new(root, outer_name, outer_contents).create()?;
    fsops::replace_file(&outer, published)?;
    Ok(published.to_path_buf())
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::arch::Arch;
    use crate::bundle::MergedBundle;
    use crate::container;
    use crate::error::PackError;
    use std::fs::File;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn naming() -> ArtifactNaming {
        ArtifactNaming::new("Kit").unwrap()
    }

    fn setup_container(dst: &Path, with_dsym: bool) -> DistributionContainer {
        let root = dst.join("Kit.framework");
        fs::create_dir_all(root.join("Versions/A")).unwrap();
        fs::write(root.join("Versions/A/Kit"), "fat binary").unwrap();

        let dsym = with_dsym.then(|| {
            let bundle = dst.join("Kit.framework.dSYM");
            fs::create_dir_all(bundle.join("Contents/Resources/DWARF")).unwrap();
            fs::write(bundle.join("Contents/Resources/DWARF/Kit"), "dwarf").unwrap();
            bundle
        });

        let merged = MergedBundle::new(
            root.clone(),
            root.join("Versions/A/Kit"),
            vec![Arch::Arm64, Arch::X64],
            dsym,
        );
        container::assemble(dst, &naming(), std::slice::from_ref(&merged), with_dsym).unwrap()
    }

    fn entry_names(archive_path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(archive_path).unwrap()).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn publish_archives___produces_double_zipped_bundle() {
        let dir = TempDir::new().unwrap();
        let container = setup_container(dir.path(), false);

        let published =
            publish_archives(dir.path(), &naming(), &container, vec![]).unwrap();

        assert_eq!(published.bundle_archive, dir.path().join("Kit.framework.zip"));
        assert_eq!(
            entry_names(&published.bundle_archive),
            vec![
                "Kit.framework.zip",
                "entitlements.txt",
                "without_entitlements.txt"
            ]
        );
        // The staging archive is moved away, not left behind.
        assert!(!dir.path().join("Kit.framework/Kit.framework_.zip").exists());
    }

    #[test]
    fn publish_archives___container_archive_holds_container_and_manifests() {
        let dir = TempDir::new().unwrap();
        let container = setup_container(dir.path(), false);

        let published =
            publish_archives(dir.path(), &naming(), &container, vec![]).unwrap();

        assert_eq!(published.container_archive, dir.path().join("framework.zip"));
        let names = entry_names(&published.container_archive);
        assert!(names.contains(&"entitlements.txt".to_string()));
        assert!(names.contains(&"without_entitlements.txt".to_string()));
        assert!(
            names.contains(
                &"Kit.xcframework/macos-arm64_x86_64/Kit.framework/Versions/A/Kit".to_string()
            )
        );
    }

    #[test]
    fn publish_archives___bundle_manifest_written_into_bundle() {
        let dir = TempDir::new().unwrap();
        let container = setup_container(dir.path(), false);

        publish_archives(dir.path(), &naming(), &container, vec![]).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("Kit.framework/entitlements.txt")).unwrap(),
            "\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("Kit.framework/without_entitlements.txt")).unwrap(),
            "Kit.framework.zip/Versions/A/Kit\n"
        );
    }

    #[test]
    fn publish_archives___stale_manifest___aborts_before_archives() {
        let dir = TempDir::new().unwrap();
        let container = setup_container(dir.path(), false);
        // The assembled value still claims the executable entry.
        fs::remove_file(
            dir.path()
                .join("Kit.xcframework/macos-arm64_x86_64/Kit.framework/Versions/A/Kit"),
        )
        .unwrap();

        let err = publish_archives(dir.path(), &naming(), &container, vec![]).unwrap_err();

        assert!(matches!(err, PackError::ManifestPathNotFound(_)));
        assert!(!dir.path().join("framework.zip").exists());
        assert!(!dir.path().join("Kit.framework.zip").exists());
    }

    #[test]
    fn publish_archives___dsym_present___renamed_and_double_zipped() {
        let dir = TempDir::new().unwrap();
        let container = setup_container(dir.path(), true);

        let published =
            publish_archives(dir.path(), &naming(), &container, vec![]).unwrap();

        let dsym_archive = published.dsym_archive.unwrap();
        assert_eq!(dsym_archive, dir.path().join("Kit.dSYM.zip"));
        assert_eq!(entry_names(&dsym_archive), vec!["Kit.dSYM.zip"]);
        assert!(dir.path().join("Kit.dSYM").is_dir());
        assert!(!dir.path().join("Kit.framework.dSYM").exists());
    }

    #[test]
    fn publish_archives___no_dsym___skips_dsym_archive() {
        let dir = TempDir::new().unwrap();
        let container = setup_container(dir.path(), false);

        let published =
            publish_archives(dir.path(), &naming(), &container, vec![]).unwrap();

        assert!(published.dsym_archive.is_none());
        assert!(!dir.path().join("Kit.dSYM.zip").exists());
    }

    #[test]
    fn publish_archives___stale_legacy_dsym___replaced() {
        let dir = TempDir::new().unwrap();
        let container = setup_container(dir.path(), true);
        let stale = dir.path().join("Kit.dSYM/stale-marker");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old run").unwrap();

        publish_archives(dir.path(), &naming(), &container, vec![]).unwrap();

        assert!(!stale.exists());
        assert!(
            dir.path()
                .join("Kit.dSYM/Contents/Resources/DWARF/Kit")
                .is_file()
        );
    }
}
