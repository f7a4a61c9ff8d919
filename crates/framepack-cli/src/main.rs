//! framepack CLI - Release packaging for multi-architecture framework bundles
//!
//! Merges per-architecture framework bundles into a fat bundle, wraps the
//! result in a distribution container, and publishes the legacy double-zipped
//! release archives together with their codesign manifests.

use clap::Parser;
use framepack::PackError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod package;

#[derive(Parser)]
#[command(name = "framepack")]
#[command(author, version, about = "Release packaging for multi-architecture framework bundles", long_about = None)]
struct Cli {
    /// Product name of the framework bundle
    #[arg(long)]
    name: String,

    /// Destination directory for the packaged artifacts
    #[arg(long)]
    dst: PathBuf,

    /// Build output directory holding the arm64 bundle
    #[arg(long)]
    arm64_out_dir: PathBuf,

    /// Build output directory holding the x64 bundle
    #[arg(long)]
    x64_out_dir: PathBuf,

    /// Root against which relative paths resolve (default: current directory)
    #[arg(long)]
    buildroot: Option<PathBuf>,

    /// Strip the merged executable, keeping an unstripped copy
    #[arg(long)]
    strip: bool,

    /// Extract and package debug-symbol bundles
    #[arg(long)]
    dsym: bool,

    /// Produce the published zip archives
    #[arg(long)]
    zip: bool,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match package::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// External tool exit codes pass through; everything else exits 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<PackError>() {
        Some(PackError::Tool { code, .. }) if *code > 0 => u8::try_from(*code).unwrap_or(1),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn cli___parses_full_flag_surface() {
        let cli = Cli::parse_from([
            "framepack",
            "--name",
            "Kit",
            "--dst",
            "out",
            "--arm64-out-dir",
            "arm64",
            "--x64-out-dir",
            "x64",
            "--buildroot",
            "/build",
            "--strip",
            "--dsym",
            "--zip",
        ]);

        assert_eq!(cli.name, "Kit");
        assert_eq!(cli.dst, PathBuf::from("out"));
        assert_eq!(cli.arm64_out_dir, PathBuf::from("arm64"));
        assert_eq!(cli.x64_out_dir, PathBuf::from("x64"));
        assert_eq!(cli.buildroot, Some(PathBuf::from("/build")));
        assert!(cli.strip);
        assert!(cli.dsym);
        assert!(cli.zip);
    }

    #[test]
    fn cli___flags_default_off() {
        let cli = Cli::parse_from([
            "framepack",
            "--name",
            "Kit",
            "--dst",
            "out",
            "--arm64-out-dir",
            "arm64",
            "--x64-out-dir",
            "x64",
        ]);

        assert_eq!(cli.buildroot, None);
        assert!(!cli.strip);
        assert!(!cli.dsym);
        assert!(!cli.zip);
    }

    #[test]
    fn exit_code___tool_failure___propagates_tool_status() {
        let err = anyhow::Error::new(PackError::Tool {
            tool: "lipo",
            code: 6,
            stderr: String::new(),
        });

        assert_eq!(exit_code(&err), 6);
    }

    #[test]
    fn exit_code___context_wrapped_tool_failure___still_propagates() {
        let err = anyhow::Error::new(PackError::Tool {
            tool: "strip",
            code: 2,
            stderr: String::new(),
        })
        .context("Failed to strip merged executable");

        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn exit_code___validation_failure___exits_one() {
        let err = anyhow::Error::new(PackError::InvalidProductName("a/b".to_string()));

        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn exit_code___signal_termination___exits_one() {
        let err = anyhow::Error::new(PackError::Tool {
            tool: "dsymutil",
            code: -1,
            stderr: String::new(),
        });

        assert_eq!(exit_code(&err), 1);
    }
}
