use std::path::{Path, PathBuf};

use crate::config::CycleLevel;

/// Everything one build needs to know about where it reads and writes.
///
/// Constructed once from configuration and never changed afterwards.
#[derive(Debug, Clone)]
pub struct BuildContext {
    entry: PathBuf,
    root: PathBuf,
    output_path: PathBuf,
    output_filename: String,
    options: BuildOptions,
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub default_extension: String,
    pub circular_dependencies: CycleLevel,
    pub template: Option<PathBuf>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            default_extension: ".js".to_string(),
            circular_dependencies: CycleLevel::default(),
            template: None,
        }
    }
}

impl BuildContext {
    pub fn new(
        entry: PathBuf,
        root: PathBuf,
        output_path: PathBuf,
        output_filename: String,
        options: BuildOptions,
    ) -> Self {
        Self {
            entry,
            root,
            output_path,
            output_filename,
            options,
        }
    }

    /// Absolute path of the entry module
    pub fn entry(&self) -> &Path {
        &self.entry
    }

    /// Working root all module ids are relative to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Output directory
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn output_filename(&self) -> &str {
        &self.output_filename
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }
}
