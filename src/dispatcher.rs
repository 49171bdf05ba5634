//! Command dispatcher
//!
//! Maps a project name or source file to the sequence of external commands
//! that sets it up, builds it and runs it. Each step waits for its command
//! and stops at the first nonzero exit.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;

use crate::build::compiler::{compile_invocation, executable_for, SourceFile};
use crate::build::meson::MesonConfig;
use crate::build::platforms::{HostPlatform, PlatformProfile};
use crate::config::{DevGlConfig, ProjectProfile};
use crate::error::DevGlError;
use crate::exec::{CommandResult, CommandRunner, Invocation};
use crate::utils::paths::{dir_size, format_size};
use crate::utils::terminal::{print_command, print_info, print_success, print_warning};

/// What a positional `<target>` argument refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A configured project
    Project(String),
    /// A single source file (or its compiled executable)
    Source(PathBuf),
}

pub struct Dispatcher {
    config: DevGlConfig,
    platform: HostPlatform,
    runner: Box<dyn CommandRunner>,
    verbose: bool,
    jobs: Option<usize>,
}

impl Dispatcher {
    pub fn new(
        config: DevGlConfig,
        platform: HostPlatform,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            platform,
            runner,
            verbose: false,
            jobs: None,
        }
    }

    /// Echo every command before running it
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Parallel jobs passed to `meson compile`
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Configured project names in sorted order
    pub fn project_names(&self) -> Vec<String> {
        self.config.project_names()
    }

    /// Decide whether `arg` names a project or a source file
    ///
    /// Project names win; anything with an extension is treated as a file.
    pub fn classify(&self, arg: &str) -> Result<Target> {
        if self.config.project(arg).is_some() {
            return Ok(Target::Project(arg.to_string()));
        }

        let path = Path::new(arg);
        if path.extension().is_some() {
            return Ok(Target::Source(path.to_path_buf()));
        }

        Err(DevGlError::unknown_project(arg, self.config.project_names()).into())
    }

    /// Install the platform's OpenGL development packages
    pub fn install_dependencies(&self) -> Result<()> {
        let platform = self.platform.profile()?;
        let packages = self.packages(platform);
        print_info(&format!(
            "Installing dependencies with {}...",
            platform.package_manager()
        ));

        let invocation = platform.install_invocation(&packages);
        self.execute(
            &invocation,
            platform.package_manager(),
            "Dependency installation",
        )?;

        print_success("Dependencies installed successfully.");
        Ok(())
    }

    /// Package list for this platform, DevGL.toml overrides first
    fn packages(&self, platform: &dyn PlatformProfile) -> Vec<String> {
        let overridden = match platform.name() {
            "linux" => self.config.dependencies.linux.clone(),
            "macos" => self.config.dependencies.macos.clone(),
            _ => None,
        };
        overridden.unwrap_or_else(|| platform.default_packages())
    }

    /// Run `meson setup` unless the build directory already exists
    pub fn setup_build(&self, name: &str) -> Result<()> {
        let project = self.config.require_project(name)?;
        let meson = self.meson(project);

        if meson.is_configured() {
            print_info(&format!(
                "Meson build directory already exists for {}.",
                name
            ));
            if !meson.has_meson_state() {
                print_warning(&format!(
                    "{} has no meson-private/ directory; run 'devgl clean {}' if the build fails",
                    project.build_dir.display(),
                    name
                ));
            }
            return Ok(());
        }

        if !project.source_dir.is_dir() {
            return Err(DevGlError::SourceNotFound {
                path: project.source_dir.clone(),
            }
            .into());
        }

        print_info(&format!("Setting up Meson build directory for {}...", name));
        self.execute(
            &meson.setup_invocation(),
            "meson",
            &format!("Meson setup for {}", name),
        )?;
        print_success(&format!("Meson build directory created for {}.", name));
        Ok(())
    }

    /// Compile a configured project with `meson compile`
    pub fn build_project(&self, name: &str) -> Result<()> {
        let project = self.config.require_project(name)?;
        let meson = self.meson(project);

        print_info(&format!("Building {} using Meson...", name));
        self.execute(
            &meson.compile_invocation(),
            "meson",
            &format!("Building {}", name),
        )?;
        print_success(&format!("Built {} successfully.", name));
        Ok(())
    }

    /// Compile one source file next to itself with the platform link flags
    pub fn build_source(&self, path: &Path) -> Result<PathBuf> {
        let source = SourceFile::parse(path)?;
        if !source.path.is_file() {
            return Err(DevGlError::SourceNotFound { path: source.path }.into());
        }

        let platform = self.platform.profile()?;
        let invocation =
            compile_invocation(&source, &self.config.compiler, &platform.link_flags());
        let compiler = invocation.program.clone();

        print_info(&format!(
            "Compiling {} ({})...",
            source.display_name(),
            source.language
        ));
        self.execute(
            &invocation,
            &compiler,
            &format!("Compiling {}", source.display_name()),
        )?;

        let output = source.output_path();
        print_success(&format!("Built {}", output.display()));
        Ok(output)
    }

    /// Run a project's executable from its build directory
    pub fn run_project(&self, name: &str, args: &[String]) -> Result<()> {
        let project = self.config.require_project(name)?;
        self.run_executable(name, &project.executable, args)
    }

    /// Run the executable previously compiled from `path`
    pub fn run_source(&self, path: &Path, args: &[String]) -> Result<()> {
        let executable = executable_for(path);
        self.run_executable(&path.display().to_string(), &executable, args)
    }

    /// `build <target>`: setup + compile for projects, direct compile for files
    pub fn build_target(&self, target: &Target) -> Result<()> {
        match target {
            Target::Project(name) => {
                self.setup_build(name)?;
                self.build_project(name)
            }
            Target::Source(path) => self.build_source(path).map(|_| ()),
        }
    }

    /// `run <target>`: setup + build + run for projects, run only for files
    pub fn run_target(&self, target: &Target, args: &[String]) -> Result<()> {
        match target {
            Target::Project(name) => {
                self.setup_build(name)?;
                self.build_project(name)?;
                self.run_project(name, args)
            }
            Target::Source(path) => self.run_source(path, args),
        }
    }

    /// Delete a project's build directory
    pub fn clean_project(&self, name: &str) -> Result<()> {
        let project = self.config.require_project(name)?;
        let build_dir = &project.build_dir;

        if !build_dir.exists() {
            print_info(&format!("Nothing to clean for {}.", name));
            return Ok(());
        }

        let size = dir_size(build_dir);
        std::fs::remove_dir_all(build_dir)
            .with_context(|| format!("Failed to remove {}", build_dir.display()))?;
        print_success(&format!(
            "Removed {} ({})",
            build_dir.display(),
            format_size(size)
        ));
        Ok(())
    }

    /// Print every configured project with its build state
    pub fn list_projects(&self) {
        if let Some(file) = &self.config.file {
            println!("Projects from {}:", file.display());
        } else {
            println!("Available projects:");
        }

        for project in self.config.projects() {
            let state = if project.is_built() {
                style("built").green()
            } else if project.is_configured() {
                style("configured").yellow()
            } else {
                style("not configured").dim()
            };
            let source = project
                .source_dir
                .strip_prefix(&self.config.root)
                .unwrap_or(&project.source_dir);
            println!(
                "  {:<20} {:<28} {}",
                project.name,
                source.display().to_string(),
                state
            );
        }
    }

    fn meson(&self, project: &ProjectProfile) -> MesonConfig {
        MesonConfig::new(project.source_dir.clone(), project.build_dir.clone())
            .jobs(self.jobs)
            .verbose(self.verbose)
    }

    fn run_executable(&self, name: &str, executable: &Path, args: &[String]) -> Result<()> {
        if !executable.is_file() {
            return Err(DevGlError::ExecutableNotFound {
                name: name.to_string(),
                path: executable.to_path_buf(),
            }
            .into());
        }

        // a bare relative name would otherwise be looked up on PATH
        let executable = if executable.is_relative() {
            std::env::current_dir()
                .context("Failed to get current directory")?
                .join(executable)
        } else {
            executable.to_path_buf()
        };

        print_info(&format!("Running {}...", name));
        let invocation =
            Invocation::new(executable.display().to_string()).args(args.iter().cloned());
        if self.verbose {
            print_command(&invocation.to_string());
        }

        let result = self.runner.run(&invocation)?;
        if !result.success {
            return Err(DevGlError::ChildExit {
                name: name.to_string(),
                code: result.exit_code,
            }
            .into());
        }
        Ok(())
    }

    /// Run an external tool, turning a nonzero exit into `ToolFailed`
    fn execute(&self, invocation: &Invocation, tool: &str, action: &str) -> Result<CommandResult> {
        if self.verbose {
            print_command(&invocation.to_string());
        }

        let result = self.runner.run(invocation)?;
        if self.verbose {
            print_command(&format!(
                "{} finished in {:.1}s",
                tool,
                result.duration.as_secs_f64()
            ));
        }
        if !result.success {
            return Err(DevGlError::tool_failed(tool, action, result.exit_code).into());
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    use tempfile::TempDir;

    type Calls = Rc<RefCell<Vec<Invocation>>>;

    /// Records invocations and imitates the side effects of the real tools
    struct RecordingRunner {
        calls: Calls,
        exit_code: i32,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
            self.calls.borrow_mut().push(invocation.clone());
            if self.exit_code != 0 {
                return Ok(CommandResult::from_code(self.exit_code));
            }

            let args = &invocation.args;
            if invocation.program == "meson" && args.first().map(String::as_str) == Some("setup") {
                std::fs::create_dir_all(&args[1])?;
            }
            if let Some(pos) = args.iter().position(|a| a == "-o") {
                std::fs::write(&args[pos + 1], b"")?;
            }
            Ok(CommandResult::from_code(0))
        }
    }

    struct FakeProfile;

    impl PlatformProfile for FakeProfile {
        fn name(&self) -> &str {
            "linux"
        }

        fn package_manager(&self) -> &str {
            "apt-get"
        }

        fn default_packages(&self) -> Vec<String> {
            vec!["libglfw3-dev".to_string()]
        }

        fn install_invocation(&self, packages: &[String]) -> Invocation {
            Invocation::new("apt-get")
                .arg("install")
                .arg("-y")
                .args(packages.iter().cloned())
        }

        fn link_flags(&self) -> Vec<String> {
            vec!["-lglfw".to_string()]
        }
    }

    fn dispatcher_in(root: &Path, config: Option<DevGlConfig>, exit_code: i32) -> (Dispatcher, Calls) {
        let profile: Box<dyn PlatformProfile> = Box::new(FakeProfile);
        dispatcher_on(root, config, exit_code, profile.into())
    }

    fn dispatcher_on(
        root: &Path,
        config: Option<DevGlConfig>,
        exit_code: i32,
        platform: HostPlatform,
    ) -> (Dispatcher, Calls) {
        let calls: Calls = Rc::new(RefCell::new(Vec::new()));
        let runner = RecordingRunner {
            calls: calls.clone(),
            exit_code,
        };
        let config = config.unwrap_or_else(|| DevGlConfig::defaults(root));
        (
            Dispatcher::new(config, platform, Box::new(runner)),
            calls,
        )
    }

    fn workspace_with_app() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("app").join("src")).unwrap();
        dir
    }

    fn kind(err: &anyhow::Error) -> &DevGlError {
        err.downcast_ref::<DevGlError>()
            .unwrap_or_else(|| panic!("not a DevGlError: {:#}", err))
    }

    #[test]
    fn test_classify() {
        let dir = tempfile::tempdir().unwrap();
        let (dispatcher, _) = dispatcher_in(dir.path(), None, 0);

        assert_eq!(
            dispatcher.classify("app").unwrap(),
            Target::Project("app".to_string())
        );
        assert_eq!(
            dispatcher.classify("src/foo.c").unwrap(),
            Target::Source(PathBuf::from("src/foo.c"))
        );
        assert!(matches!(
            kind(&dispatcher.classify("nope").unwrap_err()),
            DevGlError::UnknownProject { .. }
        ));
    }

    #[test]
    fn test_install_dependencies_runs_once() {
        let dir = tempfile::tempdir().unwrap();
        let (dispatcher, calls) = dispatcher_in(dir.path(), None, 0);

        dispatcher.install_dependencies().unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].to_string(), "apt-get install -y libglfw3-dev");
    }

    #[test]
    fn test_install_dependencies_uses_config_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DevGlConfig::defaults(dir.path());
        config.dependencies.linux = Some(vec!["meson".to_string(), "ninja-build".to_string()]);
        let (dispatcher, calls) = dispatcher_in(dir.path(), Some(config), 0);

        dispatcher.install_dependencies().unwrap();
        assert_eq!(calls.borrow()[0].args, vec!["install", "-y", "meson", "ninja-build"]);
    }

    #[test]
    fn test_install_failure_is_tool_failed() {
        let dir = tempfile::tempdir().unwrap();
        let (dispatcher, calls) = dispatcher_in(dir.path(), None, 100);

        let err = dispatcher.install_dependencies().unwrap_err();
        match kind(&err) {
            DevGlError::ToolFailed { tool, code, .. } => {
                assert_eq!(tool, "apt-get");
                assert_eq!(*code, Some(100));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(kind(&err).exit_code(), 1);
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_unknown_project_invokes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (dispatcher, calls) = dispatcher_in(dir.path(), None, 0);

        let err = dispatcher
            .run_target(&Target::Project("nope".to_string()), &[])
            .unwrap_err();
        assert!(matches!(kind(&err), DevGlError::UnknownProject { .. }));
        assert!(dispatcher.setup_build("nope").is_err());
        assert!(dispatcher.build_project("nope").is_err());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_setup_build_is_idempotent() {
        let dir = workspace_with_app();
        let (dispatcher, calls) = dispatcher_in(dir.path(), None, 0);

        dispatcher.setup_build("app").unwrap();
        dispatcher.setup_build("app").unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "meson");
        assert_eq!(calls[0].args[0], "setup");
        assert!(dir.path().join("app").join("build").is_dir());
    }

    #[test]
    fn test_setup_build_skips_existing_directory() {
        let dir = workspace_with_app();
        std::fs::create_dir_all(dir.path().join("app").join("build")).unwrap();
        let (dispatcher, calls) = dispatcher_in(dir.path(), None, 0);

        dispatcher.setup_build("app").unwrap();
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_setup_build_missing_source_dir() {
        let dir = tempfile::tempdir().unwrap();
        let (dispatcher, calls) = dispatcher_in(dir.path(), None, 0);

        let err = dispatcher.setup_build("app").unwrap_err();
        assert!(matches!(kind(&err), DevGlError::SourceNotFound { .. }));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_setup_failure_stops_the_sequence() {
        let dir = workspace_with_app();
        let (dispatcher, calls) = dispatcher_in(dir.path(), None, 1);

        let err = dispatcher
            .run_target(&Target::Project("app".to_string()), &[])
            .unwrap_err();
        assert!(matches!(kind(&err), DevGlError::ToolFailed { .. }));
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_run_project_sequence() {
        let dir = workspace_with_app();
        let build_dir = dir.path().join("app").join("build");
        let (dispatcher, calls) = dispatcher_in(dir.path(), None, 0);

        // meson compile is simulated, so put the executable in place up front
        std::fs::create_dir_all(&build_dir).unwrap();
        std::fs::write(build_dir.join("app"), b"").unwrap();

        dispatcher
            .run_target(&Target::Project("app".to_string()), &["--fullscreen".to_string()])
            .unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0].args,
            vec!["compile".to_string(), "-C".to_string(), build_dir.display().to_string()]
        );
        assert_eq!(calls[1].program, build_dir.join("app").display().to_string());
        assert_eq!(calls[1].args, vec!["--fullscreen"]);
    }

    #[test]
    fn test_run_project_without_executable() {
        let dir = workspace_with_app();
        let (dispatcher, calls) = dispatcher_in(dir.path(), None, 0);

        let err = dispatcher.run_project("app", &[]).unwrap_err();
        assert!(matches!(kind(&err), DevGlError::ExecutableNotFound { .. }));
        assert!(err.to_string().contains("not found"));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_build_source_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("foo.txt");
        std::fs::write(&file, "not code").unwrap();
        let (dispatcher, calls) = dispatcher_in(dir.path(), None, 0);

        let err = dispatcher.build_source(&file).unwrap_err();
        assert!(matches!(kind(&err), DevGlError::UnsupportedSource { .. }));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_build_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (dispatcher, calls) = dispatcher_in(dir.path(), None, 0);

        let err = dispatcher
            .build_source(&dir.path().join("missing.c"))
            .unwrap_err();
        assert!(matches!(kind(&err), DevGlError::SourceNotFound { .. }));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_run_source_before_and_after_build() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("triangle.c");
        std::fs::write(&file, "int main(void) { return 0; }").unwrap();
        let (dispatcher, calls) = dispatcher_in(dir.path(), None, 0);

        let err = dispatcher.run_source(&file, &[]).unwrap_err();
        assert!(matches!(kind(&err), DevGlError::ExecutableNotFound { .. }));
        assert!(calls.borrow().is_empty());

        let output = dispatcher.build_source(&file).unwrap();
        assert_eq!(output, dir.path().join("triangle"));

        dispatcher.run_source(&file, &[]).unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program, "cc");
        assert!(calls[0].args.ends_with(&["-lglfw".to_string()]));
        assert_eq!(calls[1].program, output.display().to_string());
    }

    #[test]
    fn test_compiler_failure_is_tool_failed() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.c");
        std::fs::write(&file, "int main(").unwrap();
        let (dispatcher, _) = dispatcher_in(dir.path(), None, 1);

        let err = dispatcher.build_source(&file).unwrap_err();
        match kind(&err) {
            DevGlError::ToolFailed { tool, .. } => assert_eq!(tool, "cc"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_child_exit_code_is_forwarded() {
        let dir = workspace_with_app();
        let build_dir = dir.path().join("app").join("build");
        std::fs::create_dir_all(&build_dir).unwrap();
        std::fs::write(build_dir.join("app"), b"").unwrap();
        let (dispatcher, _) = dispatcher_in(dir.path(), None, 3);

        let err = dispatcher.run_project("app", &[]).unwrap_err();
        assert!(matches!(kind(&err), DevGlError::ChildExit { .. }));
        assert_eq!(kind(&err).exit_code(), 3);
    }

    #[test]
    fn test_clean_project() {
        let dir = workspace_with_app();
        let build_dir = dir.path().join("app").join("build");
        std::fs::create_dir_all(&build_dir).unwrap();
        std::fs::write(build_dir.join("app"), b"binary").unwrap();
        let (dispatcher, calls) = dispatcher_in(dir.path(), None, 0);

        dispatcher.clean_project("app").unwrap();
        assert!(!build_dir.exists());
        // second clean is a no-op
        dispatcher.clean_project("app").unwrap();
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_unsupported_platform_only_blocks_what_needs_it() {
        let dir = workspace_with_app();
        let build_dir = dir.path().join("app").join("build");
        let source = dir.path().join("triangle.c");
        std::fs::write(&source, "int main(void) { return 0; }").unwrap();
        let (dispatcher, calls) =
            dispatcher_on(dir.path(), None, 0, HostPlatform::for_os("freebsd"));

        for err in [
            dispatcher.install_dependencies().unwrap_err(),
            dispatcher.build_source(&source).unwrap_err(),
        ] {
            match kind(&err) {
                DevGlError::UnsupportedPlatform { os } => assert_eq!(os, "freebsd"),
                other => panic!("unexpected error: {:?}", other),
            }
        }
        assert!(calls.borrow().is_empty());

        dispatcher.setup_build("app").unwrap();
        std::fs::write(build_dir.join("app"), b"").unwrap();
        dispatcher
            .run_target(&Target::Project("app".to_string()), &[])
            .unwrap();
        dispatcher.clean_project("app").unwrap();
        assert!(!build_dir.exists());

        let calls = calls.borrow();
        let programs: Vec<&str> = calls.iter().map(|c| c.program.as_str()).collect();
        assert_eq!(programs[..2], ["meson", "meson"]);
        assert_eq!(calls.len(), 3);
    }
}
