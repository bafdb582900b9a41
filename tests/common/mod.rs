// Shared helpers for integration tests.
//
// Provides a temporary repository and home directory pair plus a fluent
// builder, so each integration test can lay out sources and a link file
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser as _;
use dotlink::cli::{Cli, GlobalOpts};
use dotlink::config::{Config, Overrides, Settings};
use dotlink::exec::{ExecResult, Executor};

/// A repository and home directory inside one [`tempfile::TempDir`].
///
/// Everything is deleted when the context is dropped.
pub struct IntegrationTestContext {
    dir: tempfile::TempDir,
    /// Dotfiles repository root (`<tmp>/repo`).
    pub root: PathBuf,
    /// Home directory targets are placed in (`<tmp>/home`).
    pub home: PathBuf,
}

impl IntegrationTestContext {
    /// Path of the link file.
    pub fn config_path(&self) -> PathBuf {
        self.root.join("dotlink.toml")
    }

    /// Path of `rel` inside the home directory.
    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home.join(rel)
    }

    /// Path of `rel` inside the repository.
    pub fn repo_path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Settings pointing at this context, with the given profiles.
    pub fn settings(&self, profiles: &[&str]) -> Settings {
        Settings::resolve(
            Overrides {
                config: Some(self.config_path()),
                root: None,
                home: Some(self.home.clone()),
                profiles: profiles.iter().map(ToString::to_string).collect(),
            },
            |_| None,
            || None,
        )
        .expect("resolve settings")
    }

    /// Load the link file with an empty variable environment.
    pub fn load_config(&self, profiles: &[&str]) -> Config {
        Config::load_with(&self.settings(profiles), &|_| None).expect("load config")
    }

    /// Parse global flags as the binary would, pointing at this context.
    pub fn global(&self, extra: &[&str]) -> GlobalOpts {
        let config = self.config_path();
        let home = self.home.clone();
        let mut argv = vec![
            "dotlink".to_string(),
            "--config".to_string(),
            config.display().to_string(),
            "--home".to_string(),
            home.display().to_string(),
        ];
        argv.extend(extra.iter().map(ToString::to_string));
        argv.push("apply".to_string());
        Cli::parse_from(argv).global
    }

    /// Whether `path` is a symlink pointing at `dest`.
    pub fn is_link_to(path: &Path, dest: &Path) -> bool {
        std::fs::read_link(path).is_ok_and(|d| d == dest)
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin with an empty repository, an empty home, and no link file.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path().join("repo");
        let home = dir.path().join("home");
        std::fs::create_dir_all(&root).expect("create repo dir");
        std::fs::create_dir_all(&home).expect("create home dir");
        Self {
            ctx: IntegrationTestContext { dir, root, home },
        }
    }

    /// Write the link file.
    pub fn with_config(self, content: &str) -> Self {
        std::fs::write(self.ctx.config_path(), content).expect("write dotlink.toml");
        self
    }

    /// Create a source file at `rel` inside the repository.
    pub fn with_source(self, rel: &str, content: &str) -> Self {
        write_file(&self.ctx.root.join(rel), content);
        self
    }

    /// Create a source directory at `rel` inside the repository.
    pub fn with_source_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.ctx.root.join(rel)).expect("create source dir");
        self
    }

    /// Create a regular file at `rel` inside the home directory.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write_file(&self.ctx.home.join(rel), content);
        self
    }

    /// Create a directory at `rel` inside the home directory.
    pub fn with_home_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.ctx.home.join(rel)).expect("create home dir");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

/// [`Executor`] that records every call and answers from fixed results.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<String>>,
    missing: Vec<String>,
    failing: Vec<String>,
}

impl RecordingExecutor {
    /// Report `programs` as absent from `PATH`.
    pub fn with_missing(mut self, programs: &[&str]) -> Self {
        self.missing.extend(programs.iter().map(ToString::to_string));
        self
    }

    /// Make runs of `programs` exit non-zero.
    pub fn with_failing(mut self, programs: &[&str]) -> Self {
        self.failing.extend(programs.iter().map(ToString::to_string));
        self
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, program: &str, args: &[String]) -> anyhow::Result<ExecResult> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().expect("calls lock").push(line);
        let failed = self.failing.iter().any(|p| p == program);
        Ok(ExecResult {
            stdout: String::new(),
            stderr: if failed { "boom".to_string() } else { String::new() },
            success: !failed,
            code: Some(i32::from(failed)),
        })
    }

    fn which(&self, program: &str) -> bool {
        !self.missing.iter().any(|p| p == program)
    }
}
