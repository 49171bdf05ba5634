//! DevGL.toml configuration parsing
//!
//! The file is optional. Without it devgl falls back to the built-in project
//! table rooted at the current directory.
//!
//! ```toml
//! [projects.app]
//! source = "app/src"
//!
//! [projects.demo]
//! source = "demos/demo/src"
//! build_dir = "out/demo"
//! executable = "demo-bin"
//!
//! [dependencies]
//! linux = ["build-essential", "libglfw3-dev"]
//! macos = ["glfw", "glew"]
//!
//! [compiler]
//! cc = "clang"
//! flags = ["-Wall", "-O2"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::DevGlError;
use crate::utils::paths::{find_upward, normalize};

/// Configuration file name
pub const CONFIG_FILE: &str = "DevGL.toml";

/// Projects shipped with the repository layout devgl was written for
const DEFAULT_PROJECTS: &[(&str, &str)] = &[
    ("app", "app/src"),
    ("advanced_app", "advanced_app/src"),
    ("colorful_triangle", "colorful_triangle/src"),
];

/// Raw DevGL.toml contents
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevGlToml {
    /// Project table, replaces the built-in one when present
    pub projects: Option<BTreeMap<String, ProjectEntry>>,

    /// Per-platform package list overrides
    #[serde(default)]
    pub dependencies: DependencyLists,

    /// Single-source compiler settings
    #[serde(default)]
    pub compiler: CompilerConfig,
}

/// One `[projects.<name>]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectEntry {
    /// Meson source directory (contains meson.build)
    pub source: PathBuf,

    /// Build directory, defaults to `<source>/../build`
    pub build_dir: Option<PathBuf>,

    /// Executable name inside the build directory, defaults to the project name
    pub executable: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyLists {
    pub linux: Option<Vec<String>>,
    pub macos: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerConfig {
    /// C compiler
    #[serde(default = "default_cc")]
    pub cc: String,

    /// C++ compiler
    #[serde(default = "default_cxx")]
    pub cxx: String,

    /// Extra flags placed before the platform link flags
    #[serde(default)]
    pub flags: Vec<String>,
}

fn default_cc() -> String {
    "cc".to_string()
}

fn default_cxx() -> String {
    "c++".to_string()
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            cc: default_cc(),
            cxx: default_cxx(),
            flags: Vec::new(),
        }
    }
}

impl DevGlToml {
    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            DevGlError::config_error(format!("Failed to parse {}: {}", CONFIG_FILE, e), None)
                .into()
        })
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DevGlError::config_error(
                format!("Failed to read configuration from {}", path.display()),
                Some(e.into()),
            )
        })?;
        Self::parse(&content)
    }
}

/// A resolved project: absolute source, build and executable paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectProfile {
    pub name: String,
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub executable: PathBuf,
}

impl ProjectProfile {
    fn resolve(root: &Path, name: &str, entry: &ProjectEntry) -> Self {
        let source_dir = normalize(&root.join(&entry.source));
        let build_dir = match &entry.build_dir {
            Some(dir) => normalize(&root.join(dir)),
            None => default_build_dir(&source_dir),
        };
        let executable = build_dir.join(entry.executable.as_deref().unwrap_or(name));

        Self {
            name: name.to_string(),
            source_dir,
            build_dir,
            executable,
        }
    }

    /// Whether meson has configured the build directory
    pub fn is_configured(&self) -> bool {
        self.build_dir.is_dir()
    }

    /// Whether the executable has been built
    pub fn is_built(&self) -> bool {
        self.executable.is_file()
    }
}

/// Sibling `build` directory of the source directory
fn default_build_dir(source_dir: &Path) -> PathBuf {
    match source_dir.parent() {
        Some(parent) => parent.join("build"),
        None => source_dir.join("build"),
    }
}

/// Effective configuration handed to the dispatcher
#[derive(Debug, Clone)]
pub struct DevGlConfig {
    /// Directory relative paths are resolved against
    pub root: PathBuf,

    /// Config file in use, if any
    pub file: Option<PathBuf>,

    projects: BTreeMap<String, ProjectProfile>,

    pub dependencies: DependencyLists,

    pub compiler: CompilerConfig,
}

impl DevGlConfig {
    /// Find DevGL.toml from the current directory upward, or use defaults
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover(&cwd)
    }

    /// Find DevGL.toml from `start` upward, or use defaults rooted at `start`
    pub fn discover(start: &Path) -> Result<Self> {
        match find_upward(start, CONFIG_FILE) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::defaults(start)),
        }
    }

    /// Load a specific DevGL.toml; its directory becomes the root
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = DevGlToml::load_from_path(path)?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut config = Self::from_toml(&root, raw);
        config.file = Some(path.to_path_buf());
        Ok(config)
    }

    /// Built-in project table rooted at `root`
    pub fn defaults(root: &Path) -> Self {
        Self::from_toml(root, DevGlToml::default())
    }

    /// Resolve raw TOML against a root directory
    pub fn from_toml(root: &Path, raw: DevGlToml) -> Self {
        let entries: Vec<(String, ProjectEntry)> = match raw.projects {
            Some(projects) => projects.into_iter().collect(),
            None => DEFAULT_PROJECTS
                .iter()
                .map(|(name, source)| {
                    (
                        name.to_string(),
                        ProjectEntry {
                            source: PathBuf::from(source),
                            build_dir: None,
                            executable: None,
                        },
                    )
                })
                .collect(),
        };

        let projects = entries
            .iter()
            .map(|(name, entry)| (name.clone(), ProjectProfile::resolve(root, name, entry)))
            .collect();

        Self {
            root: root.to_path_buf(),
            file: None,
            projects,
            dependencies: raw.dependencies,
            compiler: raw.compiler,
        }
    }

    /// Look up a project by name
    pub fn project(&self, name: &str) -> Option<&ProjectProfile> {
        self.projects.get(name)
    }

    /// Look up a project by name, failing with the list of known names
    pub fn require_project(&self, name: &str) -> Result<&ProjectProfile> {
        self.project(name)
            .ok_or_else(|| DevGlError::unknown_project(name, self.project_names()).into())
    }

    /// Project names in sorted order
    pub fn project_names(&self) -> Vec<String> {
        self.projects.keys().cloned().collect()
    }

    pub fn projects(&self) -> impl Iterator<Item = &ProjectProfile> {
        self.projects.values()
    }
}
