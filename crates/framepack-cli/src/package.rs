//! Packaging command implementation.
//!
//! Drives the library pipeline end to end: locate the per-architecture
//! bundles, merge them into a fat bundle, assemble the distribution
//! container, and publish the release archives when requested.

use crate::Cli;
use anyhow::{Context, Result};
use framepack::{
    Arch, ArchBundle, ArtifactNaming, MergeOptions, Toolchain, assemble, create_fat_bundle, paths,
    publish_archives,
};
use std::env;
use std::fs;

/// Run the packaging pipeline.
pub fn run(cli: &Cli) -> Result<()> {
    let naming = ArtifactNaming::new(&cli.name)?;

    let buildroot = match &cli.buildroot {
        Some(root) => root.clone(),
        None => env::current_dir().context("Failed to determine current directory")?,
    };
    let dst = paths::resolve(&buildroot, &cli.dst);
    let arm64_out = paths::resolve(&buildroot, &cli.arm64_out_dir);
    let x64_out = paths::resolve(&buildroot, &cli.x64_out_dir);
    tracing::debug!("build root: {}", buildroot.display());

    println!("Packaging {} into: {}", cli.name, dst.display());

    fs::create_dir_all(&dst)
        .with_context(|| format!("Failed to create destination: {}", dst.display()))?;

    // Both architectures are validated before any merge work starts.
    let bundles = vec![
        ArchBundle::locate(Arch::Arm64, &arm64_out, &naming)?,
        ArchBundle::locate(Arch::X64, &x64_out, &naming)?,
    ];
    for bundle in &bundles {
        println!(
            "  Found {} bundle: {}",
            bundle.arch(),
            bundle.root().display()
        );
    }

    let tools = Toolchain::host();
    let options = MergeOptions {
        strip: cli.strip,
        extract_dsym: cli.dsym,
    };
    let merged = create_fat_bundle(&bundles, &dst, &naming, &tools, options)
        .context("Failed to merge architecture bundles")?;
    println!("  Merged bundle: {}", merged.root().display());

    let container = assemble(&dst, &naming, std::slice::from_ref(&merged), cli.dsym)
        .context("Failed to assemble distribution container")?;
    println!("  Container: {}", container.root().display());

    if cli.zip {
        let published = publish_archives(&dst, &naming, &container, Vec::new())
            .context("Failed to publish release archives")?;
        println!("  Published: {}", published.bundle_archive.display());
        println!("  Published: {}", published.container_archive.display());
        if let Some(dsym_archive) = &published.dsym_archive {
            println!("  Published: {}", dsym_archive.display());
        }
    }

    println!("Packaging complete: {}", dst.display());
    Ok(())
}
