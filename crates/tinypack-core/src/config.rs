use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::context::{BuildContext, BuildOptions};
use crate::errors::{BundleError, Result};

/// Default configuration file looked up in the working root
pub const DEFAULT_CONFIG_FILE: &str = "tinypack.config.json";

/// How the graph builder treats a module that requires one of its own ancestors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleLevel {
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "error")]
    Error,
}

impl Default for CycleLevel {
    fn default() -> Self {
        CycleLevel::Warning
    }
}

/// Where and how the bundle is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    /// Output directory, relative to the working root (default: dist)
    #[serde(default = "default_out_dir")]
    pub path: String,

    /// Output file name; `[hash]` is replaced with a content hash (default: bundle.js)
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Custom loader template file instead of the built-in one
    #[serde(default)]
    pub template: Option<String>,
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_filename() -> String {
    "bundle.js".to_string()
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            path: default_out_dir(),
            filename: default_filename(),
            template: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOptions {
    /// Extension appended to references that have none (default: .js)
    #[serde(default = "default_extension")]
    pub default_extension: String,
}

fn default_extension() -> String {
    ".js".to_string()
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            default_extension: default_extension(),
        }
    }
}

/// Main bundler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
    /// Entry module, relative to the working root
    #[serde(default = "default_entry")]
    pub entry: String,

    #[serde(default)]
    pub output: OutputOptions,

    #[serde(default)]
    pub resolve: ResolveOptions,

    /// Circular dependency handling (default: warning)
    #[serde(default)]
    pub circular_dependencies: CycleLevel,
}

fn default_entry() -> String {
    "./src/index.js".to_string()
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            entry: default_entry(),
            output: OutputOptions::default(),
            resolve: ResolveOptions::default(),
            circular_dependencies: CycleLevel::default(),
        }
    }
}

/// Values given on the command line that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub entry: Option<String>,
    pub out_dir: Option<String>,
    pub out_file: Option<String>,
}

impl BundlerConfig {
    /// Load configuration from a JSON or YAML file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BundleError::io(path, e))?;
        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            Self::from_yaml(&content)?
        } else {
            Self::from_json(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| BundleError::Config(e.to_string()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| BundleError::Config(e.to_string()))
    }

    /// Create a default configuration and write it to a file
    pub fn init_file(path: &Path) -> Result<()> {
        let config = BundlerConfig::default();
        let json = serde_json::to_string_pretty(&config)
            .map_err(|e| BundleError::Config(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| BundleError::io(path, e))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.entry.trim().is_empty() {
            return Err(BundleError::Config("`entry` must not be empty".to_string()));
        }
        if self.output.filename.trim().is_empty() {
            return Err(BundleError::Config(
                "`output.filename` must not be empty".to_string(),
            ));
        }
        if self.output.filename.contains(|c: char| c == '/' || c == '\\') {
            return Err(BundleError::Config(format!(
                "`output.filename` must be a file name, got '{}'",
                self.output.filename
            )));
        }
        if !self.resolve.default_extension.starts_with('.') {
            return Err(BundleError::Config(format!(
                "`resolve.defaultExtension` must start with '.', got '{}'",
                self.resolve.default_extension
            )));
        }
        Ok(())
    }

    /// Merge CLI overrides into this configuration
    pub fn merge(&mut self, overrides: &CliOverrides) {
        if let Some(entry) = &overrides.entry {
            self.entry = entry.clone();
        }
        if let Some(out_dir) = &overrides.out_dir {
            self.output.path = out_dir.clone();
        }
        if let Some(out_file) = &overrides.out_file {
            self.output.filename = out_file.clone();
        }
    }

    /// Resolve this configuration against a working root
    pub fn build_context(&self, root: &Path) -> Result<BuildContext> {
        self.validate()?;
        Ok(BuildContext::new(
            join_relative(root, &self.entry),
            root.to_path_buf(),
            join_relative(root, &self.output.path),
            self.output.filename.clone(),
            BuildOptions {
                default_extension: self.resolve.default_extension.clone(),
                circular_dependencies: self.circular_dependencies,
                template: self.output.template.as_ref().map(|t| join_relative(root, t)),
            },
        ))
    }
}

/// Join a configured path onto the root, dropping `.` segments
fn join_relative(root: &Path, path: &str) -> PathBuf {
    Path::new(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .fold(root.to_path_buf(), |acc, c| acc.join(c))
}

/// Config file to use for `root` when none is given explicitly
pub fn find_config_file(root: &Path) -> Option<PathBuf> {
    let path = root.join(DEFAULT_CONFIG_FILE);
    path.exists().then_some(path)
}
