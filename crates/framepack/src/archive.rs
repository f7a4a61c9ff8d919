//! Deterministic zip archive creation.
//!
//! Legacy distribution wraps artifacts twice: an inner archive of the
//! artifact tree, then an outer archive holding the inner archive next to
//! the codesign manifests. [`ArchiveSpec`] models a single archive;
//! nesting falls out of listing a previously created archive as a content
//! entry of the next one.

use crate::PackResult;
use crate::fsops;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// One zip archive to create: a root directory, a destination file name
/// inside that root, and the content entries to store.
///
/// Entries are root-relative; the entry `"."` stores the whole root tree.
///
/// # Example
///
/// ```no_run
/// use framepack::ArchiveSpec;
///
/// let spec = ArchiveSpec::new(
///     "/build/out/Kit.framework",
///     "Kit.framework.zip",
///     vec![".".to_string()],
/// );
/// let archive = spec.create()?;
/// # Ok::<(), framepack::PackError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveSpec {
    root: PathBuf,
    destination: String,
    contents: Vec<String>,
}

impl ArchiveSpec {
    /// Describe an archive rooted at `root`, written to `root/destination`,
    /// storing `contents`.
    #[must_use]
    pub fn new(
        root: impl Into<PathBuf>,
        destination: impl Into<String>,
        contents: Vec<String>,
    ) -> Self {
        Self {
            root: root.into(),
            destination: destination.into(),
            contents,
        }
    }

    /// Path the archive is written to.
    #[must_use]
    pub fn destination_path(&self) -> PathBuf {
        self.root.join(&self.destination)
    }

    /// Create the archive, replacing any file already at the destination.
    ///
    /// Files are stored with deflate compression and their unix permission
    /// bits; symlinks are stored as symlink entries. Directory trees are
    /// walked in sorted order, so repeated runs produce identical entry
    /// lists. The destination file is excluded from walks, which keeps an
    /// archive created inside its own root from swallowing itself.
    ///
    /// A content entry missing on disk is an error; validation against the
    /// codesign manifests happens before any archive is created.
    pub fn create(&self) -> PackResult<PathBuf> {
        let destination = self.destination_path();
        tracing::info!("Creating {}", destination.display());

        fsops::remove_existing(&destination)?;
        let file = File::create(&destination)?;
        let mut zip = ZipWriter::new(file);

        for entry in &self.contents {
            if entry == "." {
                self.add_tree(&mut zip, &self.root, None, &destination)?;
                continue;
            }
            let path = self.root.join(entry);
            let meta = fs::symlink_metadata(&path)?;
            if meta.file_type().is_symlink() {
                add_symlink(&mut zip, entry, &path)?;
            } else if meta.is_dir() {
                self.add_tree(&mut zip, &path, Some(entry), &destination)?;
            } else {
                add_file(&mut zip, entry, &path, &meta)?;
            }
        }

        zip.finish()?;
        Ok(destination)
    }

    fn add_tree(
        &self,
        zip: &mut ZipWriter<File>,
        base: &Path,
        prefix: Option<&str>,
        exclude: &Path,
    ) -> PackResult<()> {
        for result in fsops::sorted_walk(base) {
            let entry = result?;
            if entry.path() == exclude {
                continue;
            }
            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            let rel = fsops::slash_path(entry.path().strip_prefix(base)?);
            let name = match prefix {
                Some(prefix) => format!("{prefix}/{rel}"),
                None => rel,
            };
            if file_type.is_symlink() {
                add_symlink(zip, &name, entry.path())?;
            } else {
                add_file(zip, &name, entry.path(), &entry.metadata()?)?;
            }
        }
        Ok(())
    }
}

fn add_file(
    zip: &mut ZipWriter<File>,
    name: &str,
    path: &Path,
    meta: &fs::Metadata,
) -> PackResult<()> {
    zip.start_file(name, file_options(meta))?;
    let mut file = File::open(path)?;
    io::copy(&mut file, zip)?;
    Ok(())
}

fn add_symlink(zip: &mut ZipWriter<File>, name: &str, path: &Path) -> PackResult<()> {
    let target = fs::read_link(path)?;
    zip.add_symlink(
        name,
        target.to_string_lossy().into_owned(),
        SimpleFileOptions::default(),
    )?;
    Ok(())
}

#[cfg(unix)]
fn file_options(meta: &fs::Metadata) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(meta.permissions().mode())
}

#[cfg(not(unix))]
fn file_options(_meta: &fs::Metadata) -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated)
}
