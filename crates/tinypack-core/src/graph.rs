//! Dependency graph construction
//!
//! Walks the `require` references from the entry module, depth first, and records
//! every reachable module in a [`ModuleRegistry`]. A module is registered before its
//! dependencies are walked, so the registry doubles as the visited set: diamonds are
//! built once and cycles terminate.

use std::path::Path;
use tracing::{debug, trace, warn};

use crate::config::CycleLevel;
use crate::context::BuildContext;
use crate::errors::{format_cycle, BundleError, Result};
use crate::fs::FileSystem;
use crate::module_id::ModuleId;
use crate::registry::{ModuleRecord, ModuleRegistry};
use crate::rewriter::{rewrite_module, RewrittenModule};

/// The result of graph construction
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    pub entry_id: ModuleId,
    pub registry: ModuleRegistry,
}

pub struct GraphBuilder<'a> {
    fs: &'a dyn FileSystem,
    root: &'a Path,
    default_extension: &'a str,
    circular_dependencies: CycleLevel,
}

/// Accumulator threaded through the recursion
#[derive(Default)]
struct BuildState {
    registry: ModuleRegistry,
    /// Modules whose dependencies are currently being walked, outermost first
    active: Vec<ModuleId>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(fs: &'a dyn FileSystem, ctx: &'a BuildContext) -> Self {
        Self {
            fs,
            root: ctx.root(),
            default_extension: &ctx.options().default_extension,
            circular_dependencies: ctx.options().circular_dependencies,
        }
    }

    pub fn with_root(fs: &'a dyn FileSystem, root: &'a Path) -> Self {
        Self {
            fs,
            root,
            default_extension: ".js",
            circular_dependencies: CycleLevel::default(),
        }
    }

    pub fn circular_dependencies(mut self, level: CycleLevel) -> Self {
        self.circular_dependencies = level;
        self
    }

    /// Build the graph reachable from the module at `entry`.
    pub fn build(&self, entry: &Path) -> Result<ModuleGraph> {
        let entry_id = ModuleId::from_path(self.root, entry);
        let mut state = BuildState::default();
        self.build_module(entry, entry_id.clone(), &mut state)?;

        Ok(ModuleGraph {
            entry_id,
            registry: state.registry,
        })
    }

    fn build_module(&self, path: &Path, id: ModuleId, state: &mut BuildState) -> Result<()> {
        let source = self
            .fs
            .read_file(path)
            .map_err(|e| BundleError::io(path, e))?;

        let RewrittenModule {
            source_code,
            dependencies,
        } = rewrite_module(&id, &source, self.default_extension)?;
        debug!("Module {} -> {} reference(s)", id, dependencies.len());

        state.registry.insert(ModuleRecord {
            id: id.clone(),
            source_code,
        });

        state.active.push(id);
        for dep in dependencies {
            if state.registry.contains(dep.as_str()) {
                if let Some(start) = state.active.iter().position(|m| *m == dep) {
                    let mut cycle = state.active[start..].to_vec();
                    cycle.push(dep);
                    self.report_cycle(cycle)?;
                } else {
                    trace!("Already registered: {}", dep);
                }
                continue;
            }
            self.build_module(&dep.to_path(self.root), dep, state)?;
        }
        state.active.pop();

        Ok(())
    }

    fn report_cycle(&self, cycle: Vec<ModuleId>) -> Result<()> {
        match self.circular_dependencies {
            CycleLevel::Off => {
                debug!("Circular dependency: {}", format_cycle(&cycle));
                Ok(())
            }
            CycleLevel::Warning => {
                warn!("Circular dependency: {}", format_cycle(&cycle));
                Ok(())
            }
            CycleLevel::Error => Err(BundleError::CircularDependency { cycle }),
        }
    }
}
