//! Error types and helpers for user-friendly error messages
//!
//! Operations return `anyhow::Result`; the variants here are what they bail
//! with, so the top-level handler in `main` can print a hint and pick the
//! exit code, and tests can downcast to assert on the kind.

use std::path::PathBuf;

use thiserror::Error;

/// Custom error types with helpful context and suggestions
#[derive(Error, Debug)]
pub enum DevGlError {
    /// Bad or missing command-line arguments
    #[error("{message}")]
    Usage { message: String },

    /// Project name not present in the project table
    #[error("Project {name} does not exist.")]
    UnknownProject {
        name: String,
        available: Vec<String>,
    },

    /// Host OS has no platform profile
    #[error("Unsupported platform: {os}")]
    UnsupportedPlatform { os: String },

    /// Input file is not recognized as compilable source
    #[error("Unsupported file type: {path} (expected one of: {expected})")]
    UnsupportedSource { path: PathBuf, expected: String },

    /// Source file does not exist
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Expected executable is missing
    #[error("Executable for {name} not found at {path}. Please build it first.")]
    ExecutableNotFound { name: String, path: PathBuf },

    /// Tool/executable not found on PATH
    #[error("Missing tool: {tool}")]
    MissingTool {
        tool: String,
        required_for: String,
        hint: String,
    },

    /// An external tool exited nonzero
    #[error("{action} failed: {tool} exited with {}", describe_code(.code))]
    ToolFailed {
        tool: String,
        action: String,
        code: Option<i32>,
    },

    /// The program being run exited nonzero
    #[error("{name} exited with {}", describe_code(.code))]
    ChildExit { name: String, code: Option<i32> },

    /// Configuration file errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

impl DevGlError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    pub fn unknown_project(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::UnknownProject {
            name: name.into(),
            available,
        }
    }

    pub fn tool_failed(
        tool: impl Into<String>,
        action: impl Into<String>,
        code: Option<i32>,
    ) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            action: action.into(),
            code,
        }
    }

    pub fn missing_tool(
        tool: impl Into<String>,
        required_for: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            required_for: required_for.into(),
            hint: hint.into(),
        }
    }

    pub fn config_error(message: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::Config {
            message: message.into(),
            source,
        }
    }

    /// Process exit code for this error
    ///
    /// Everything is 1 except a failing run step, whose code is forwarded.
    pub fn exit_code(&self) -> i32 {
        match self {
            DevGlError::ChildExit {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }

    fn hint(&self) -> Option<String> {
        match self {
            DevGlError::Usage { .. } => Some(hints::usage().to_string()),
            DevGlError::UnknownProject { available, .. } => {
                if available.is_empty() {
                    Some(hints::no_projects().to_string())
                } else {
                    Some(format!("Available projects: {}", available.join(", ")))
                }
            }
            DevGlError::UnsupportedPlatform { .. } => Some(hints::platform().to_string()),
            DevGlError::ExecutableNotFound { .. } => Some(hints::build_first().to_string()),
            DevGlError::MissingTool { hint, .. } => Some(hint.clone()),
            DevGlError::Config { .. } => Some(hints::invalid_devgl_toml().to_string()),
            _ => None,
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("{} {}", style("ERROR:").red().bold(), self);

        if let DevGlError::MissingTool { required_for, .. } = self {
            eprintln!("  required for: {}", required_for);
        }

        if let DevGlError::Config {
            source: Some(source),
            ..
        } = self
        {
            eprintln!("  caused by: {:#}", source);
        }

        if let Some(hint) = self.hint() {
            eprintln!("{} {}", style("HINT:").yellow().bold(), hint);
        }
    }
}

/// Common error hints
pub mod hints {
    pub fn usage() -> &'static str {
        "Use 'devgl --help' to see usage."
    }

    pub fn no_projects() -> &'static str {
        "No projects are configured. Add a [projects.<name>] table to DevGL.toml."
    }

    pub fn build_first() -> &'static str {
        "Run 'devgl build <target>' first, or 'devgl run <project>' to build and run in one step."
    }

    pub fn platform() -> &'static str {
        "devgl supports Linux (apt-get) and macOS (Homebrew) hosts."
    }

    /// Get hint for missing Meson
    pub fn meson() -> &'static str {
        "Install Meson and Ninja:\n\
         • Ubuntu: sudo apt install meson ninja-build\n\
         • macOS: brew install meson ninja\n\
         • Or run: devgl download dependencies"
    }

    /// Get hint for missing Homebrew
    pub fn homebrew() -> &'static str {
        "Install Homebrew from https://brew.sh/ and make sure 'brew' is on PATH."
    }

    /// Get hint for missing apt-get
    pub fn apt() -> &'static str {
        "Automatic installation needs a Debian-based distribution with apt-get.\n\
         Install the packages listed in 'devgl --help' with your package manager."
    }

    /// Get hint for a missing C/C++ compiler
    pub fn compiler() -> &'static str {
        "Install a C/C++ compiler:\n\
         • Ubuntu: sudo apt install build-essential\n\
         • macOS: xcode-select --install\n\
         Or set [compiler] cc/cxx in DevGL.toml."
    }

    /// Pick the install hint for a program that is not on PATH
    pub fn for_tool(program: &str) -> &'static str {
        let name = std::path::Path::new(program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(program);
        match name {
            "meson" | "ninja" => meson(),
            "brew" => homebrew(),
            "apt-get" => apt(),
            "sudo" => "Install sudo, or run devgl as root.",
            "cc" | "c++" | "gcc" | "g++" | "clang" | "clang++" => compiler(),
            _ => "Make sure the program exists and is executable.",
        }
    }

    pub fn invalid_devgl_toml() -> &'static str {
        "DevGL.toml is invalid. Common issues:\n\
         • Invalid TOML syntax (check quotes, brackets, commas)\n\
         • A [projects.<name>] table without a 'source' key"
    }
}
