//! Single source file compilation
//!
//! Compiles one `.c`/`.cpp` file straight to an executable next to it,
//! without going through meson.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::CompilerConfig;
use crate::error::DevGlError;
use crate::exec::Invocation;

/// Recognized source language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    C,
    Cxx,
}

impl SourceLanguage {
    /// Map a file extension to a language
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "c" => Some(SourceLanguage::C),
            "cc" | "cpp" | "cxx" => Some(SourceLanguage::Cxx),
            _ => None,
        }
    }

    /// Extensions accepted by `build`, for error messages
    pub fn known_extensions() -> &'static str {
        ".c, .cc, .cpp, .cxx"
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLanguage::C => write!(f, "C"),
            SourceLanguage::Cxx => write!(f, "C++"),
        }
    }
}

/// A source file with a recognized extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: SourceLanguage,
}

impl SourceFile {
    /// Classify `path` by extension; does not check that it exists
    pub fn parse(path: &Path) -> Result<Self> {
        let language = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(SourceLanguage::from_extension)
            .ok_or_else(|| DevGlError::UnsupportedSource {
                path: path.to_path_buf(),
                expected: SourceLanguage::known_extensions().to_string(),
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            language,
        })
    }

    /// Executable produced from this source: the path without its extension
    pub fn output_path(&self) -> PathBuf {
        executable_for(&self.path)
    }

    /// Display name used in messages
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Path of the executable a file would be compiled to, whatever its extension
pub fn executable_for(path: &Path) -> PathBuf {
    path.with_extension("")
}

/// Build the compiler command line for one source file
pub fn compile_invocation(
    source: &SourceFile,
    compiler: &CompilerConfig,
    link_flags: &[String],
) -> Invocation {
    let program = match source.language {
        SourceLanguage::C => &compiler.cc,
        SourceLanguage::Cxx => &compiler.cxx,
    };

    Invocation::new(program.as_str())
        .arg(source.path.display().to_string())
        .arg("-o")
        .arg(source.output_path().display().to_string())
        .args(compiler.flags.iter().cloned())
        .args(link_flags.iter().cloned())
}
