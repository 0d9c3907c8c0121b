use crate::config::BundlerConfig;
use crate::fs::{FileSystem, RealFileSystem};
use std::sync::Arc;

/// Dependency injection container
/// Holds the shared dependencies a build is wired with
pub struct Container {
    config: Arc<BundlerConfig>,
    file_system: Arc<dyn FileSystem>,
}

impl Container {
    /// Create a new container with production dependencies
    pub fn new(config: BundlerConfig) -> Self {
        Container {
            config: Arc::new(config),
            file_system: Arc::new(RealFileSystem::new()),
        }
    }

    /// Create a container with custom dependencies (for testing)
    pub fn with_dependencies(config: BundlerConfig, file_system: Arc<dyn FileSystem>) -> Self {
        Container {
            config: Arc::new(config),
            file_system,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Arc<BundlerConfig> {
        &self.config
    }

    /// Get the file system
    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.file_system
    }
}
