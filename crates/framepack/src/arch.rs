//! Architecture identification for per-architecture build outputs.

use std::fmt;

/// CPU architectures a release build can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Arch {
    /// 64-bit ARM (Apple Silicon).
    Arm64,
    /// 64-bit Intel.
    X64,
}

impl Arch {
    /// Get the short architecture tag used in build directory names
    /// (e.g., "arm64").
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::X64 => "x64",
        }
    }

    /// Get the architecture component used in container slice identifiers.
    ///
    /// This is the toolchain's spelling of the architecture, which differs
    /// from [`Arch::tag`] for Intel ("x86_64" rather than "x64").
    #[must_use]
    pub fn slice_component(&self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::X64 => "x86_64",
        }
    }

    /// Parse an architecture from its tag.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "arm64" => Some(Self::Arm64),
            "x64" => Some(Self::X64),
            _ => None,
        }
    }

    /// Get all supported architectures.
    #[must_use]
    pub fn all() -> &'static [Arch] {
        &[Self::Arm64, Self::X64]
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
