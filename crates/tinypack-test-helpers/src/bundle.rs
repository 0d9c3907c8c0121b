//! Bundling helpers for tests
//!
//! Provides on-disk projects in temporary directories and in-memory file systems,
//! wired through the same `Container` the CLI uses.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tinypack_core::config::BundlerConfig;
use tinypack_core::di::Container;
use tinypack_core::emitter::EmittedAsset;
use tinypack_core::errors::Result;
use tinypack_core::fs::MockFileSystem;
use tinypack_core::Compiler;

/// A project written to a temporary directory
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Write every `(relative path, source)` pair under a fresh temporary root
    pub fn new(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        for (path, source) in files {
            let path = dir.path().join(path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, source).unwrap();
        }
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Bundle `entry` into `dist/bundle.js` with otherwise default configuration
    pub fn bundle(&self, entry: &str) -> Result<EmittedAsset> {
        let config = BundlerConfig {
            entry: entry.to_string(),
            ..BundlerConfig::default()
        };
        self.bundle_with(config)
    }

    pub fn bundle_with(&self, config: BundlerConfig) -> Result<EmittedAsset> {
        Compiler::new(Container::new(config), self.root())?.run()
    }
}

/// In-memory file system holding `files` under `root`
pub fn mock_fs(root: &str, files: &[(&str, &str)]) -> MockFileSystem {
    let mut fs = MockFileSystem::new();
    for (path, source) in files {
        fs.add_file(Path::new(root).join(path), *source);
    }
    fs
}

/// Run `script` with node and return its stdout, or `None` when node is not installed.
///
/// Panics if node runs but the script fails.
pub fn node_output(script: &Path, cwd: &Path) -> Option<String> {
    let output = Command::new("node")
        .arg(script)
        .current_dir(cwd)
        .output()
        .ok()?;
    assert!(
        output.status.success(),
        "node {} failed: {}",
        script.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}
