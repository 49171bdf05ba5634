//! Linux profile: apt-get packages, GL/GLEW/GLFW link flags

use crate::exec::Invocation;
use crate::utils::tools::with_sudo;

use super::PlatformProfile;

/// Debian/Ubuntu package set for OpenGL development
const APT_PACKAGES: &[&str] = &[
    "build-essential",
    "libgl1-mesa-dev",
    "libglew-dev",
    "libglfw3",
    "libglfw3-dev",
    "mesa-utils",
    "x11-apps",
    "libfreetype6-dev",
    "pciutils",
    "libbox2d-dev",
    "meson",
    "ninja-build",
    "pkg-config",
];

/// Linux (Debian-based) platform profile
pub struct LinuxProfile;

impl LinuxProfile {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformProfile for LinuxProfile {
    fn name(&self) -> &str {
        "linux"
    }

    fn package_manager(&self) -> &str {
        "apt-get"
    }

    fn default_packages(&self) -> Vec<String> {
        APT_PACKAGES.iter().map(|p| p.to_string()).collect()
    }

    fn install_invocation(&self, packages: &[String]) -> Invocation {
        with_sudo(
            Invocation::new("apt-get")
                .arg("install")
                .arg("-y")
                .args(packages.iter().cloned()),
        )
    }

    fn link_flags(&self) -> Vec<String> {
        ["-lGLEW", "-lglfw", "-lGL", "-lm"]
            .iter()
            .map(|f| f.to_string())
            .collect()
    }
}
