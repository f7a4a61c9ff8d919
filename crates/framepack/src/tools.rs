//! External tool seams for binary manipulation.
//!
//! Three operations in the pipeline genuinely require host toolchain
//! binaries: merging per-architecture executables into one fat executable,
//! stripping symbols, and extracting a debug-symbol bundle. Each is a
//! one-operation trait so tests can substitute in-process fakes, and the
//! host implementations shell out to `lipo`, `strip`, and `dsymutil`.

use crate::PackResult;
use crate::error::PackError;
use std::path::Path;
use std::process::Command;

/// Merges per-architecture executables into one fat executable.
pub trait BinaryMerger {
    /// Merge `inputs` into a single executable at `output`.
    fn merge(&self, inputs: &[&Path], output: &Path) -> PackResult<()>;
}

/// Strips symbols from an executable in place.
pub trait SymbolStripper {
    /// Strip local symbols and debug info from the executable.
    fn strip(&self, executable: &Path) -> PackResult<()>;
}

/// Extracts a debug-symbol bundle from an executable.
pub trait DsymExtractor {
    /// Extract debug symbols from `executable` into a bundle at `output`.
    fn extract(&self, executable: &Path, output: &Path) -> PackResult<()>;
}

/// Host `lipo` binary merger.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lipo;

impl BinaryMerger for Lipo {
    fn merge(&self, inputs: &[&Path], output: &Path) -> PackResult<()> {
        let mut command = Command::new("lipo");
        command.arg("-create").args(inputs).arg("-output").arg(output);
        run_tool("lipo", &mut command)
    }
}

/// Host `strip` symbol stripper.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strip;

impl SymbolStripper for Strip {
    fn strip(&self, executable: &Path) -> PackResult<()> {
        let mut command = Command::new("strip");
        command.arg("-x").arg("-S").arg(executable);
        run_tool("strip", &mut command)
    }
}

/// Host `dsymutil` debug-symbol extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dsymutil;

impl DsymExtractor for Dsymutil {
    fn extract(&self, executable: &Path, output: &Path) -> PackResult<()> {
        let mut command = Command::new("dsymutil");
        command.arg("-o").arg(output).arg(executable);
        run_tool("dsymutil", &mut command)
    }
}

/// The set of external tools a pipeline run uses.
pub struct Toolchain {
    /// Fat executable merger.
    pub merger: Box<dyn BinaryMerger>,
    /// Symbol stripper.
    pub stripper: Box<dyn SymbolStripper>,
    /// Debug-symbol extractor.
    pub dsym_extractor: Box<dyn DsymExtractor>,
}

impl Toolchain {
    /// The host toolchain: `lipo`, `strip`, and `dsymutil` from `PATH`.
    #[must_use]
    pub fn host() -> Self {
        Self {
            merger: Box::new(Lipo),
            stripper: Box::new(Strip),
            dsym_extractor: Box::new(Dsymutil),
        }
    }
}

fn run_tool(tool: &'static str, command: &mut Command) -> PackResult<()> {
    tracing::debug!("running {command:?}");
    let output = command
        .output()
        .map_err(|source| PackError::ToolSpawn { tool, source })?;
    if !output.status.success() {
        return Err(PackError::Tool {
            tool,
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    struct NoopMerger;

    impl BinaryMerger for NoopMerger {
        fn merge(&self, _inputs: &[&Path], _output: &Path) -> PackResult<()> {
            Ok(())
        }
    }

    #[test]
    fn Toolchain___host___constructs() {
        let tools = Toolchain::host();

        // Host tool values are unit structs; constructing the toolchain
        // must not probe PATH.
        let _ = &tools.merger;
        let _ = &tools.stripper;
        let _ = &tools.dsym_extractor;
    }

    #[test]
    fn Toolchain___accepts_custom_implementations() {
        let tools = Toolchain {
            merger: Box::new(NoopMerger),
            stripper: Box::new(Strip),
            dsym_extractor: Box::new(Dsymutil),
        };

        tools
            .merger
            .merge(&[Path::new("/a"), Path::new("/b")], Path::new("/out"))
            .unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn run_tool___nonzero_exit___captures_code_and_stderr() {
        let mut command = Command::new("sh");
        command.arg("-c").arg("echo broken >&2; exit 3");

        let err = run_tool("sh", &mut command).unwrap_err();

        match err {
            PackError::Tool { tool, code, stderr } => {
                assert_eq!(tool, "sh");
                assert_eq!(code, 3);
                assert_eq!(stderr, "broken");
            }
            other => panic!("expected Tool, got {other:?}"),
        }
    }

    #[test]
    fn run_tool___missing_binary___reports_spawn_failure() {
        let mut command = Command::new("definitely-not-a-real-tool");

        let err = run_tool("definitely-not-a-real-tool", &mut command).unwrap_err();

        assert!(matches!(err, PackError::ToolSpawn { .. }));
    }
}
