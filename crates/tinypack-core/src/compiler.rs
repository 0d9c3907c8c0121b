use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::context::BuildContext;
use crate::di::Container;
use crate::emitter::{BundleEmitter, BundleRenderer, EmittedAsset};
use crate::errors::Result;
use crate::graph::{GraphBuilder, ModuleGraph};

/// One build: graph construction followed by a single emit.
pub struct Compiler {
    container: Container,
    ctx: BuildContext,
}

impl Compiler {
    /// Resolve the container's configuration against `root`.
    pub fn new(container: Container, root: &Path) -> Result<Self> {
        let ctx = container.config().build_context(root)?;
        Ok(Self { container, ctx })
    }

    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    pub fn build_graph(&self) -> Result<ModuleGraph> {
        let fs = self.container.file_system().as_ref();
        GraphBuilder::new(fs, &self.ctx).build(self.ctx.entry())
    }

    pub fn emit(&self, graph: &ModuleGraph) -> Result<EmittedAsset> {
        let emitter = BundleEmitter::new(self.container.file_system().as_ref(), &self.ctx);
        let renderer = emitter.renderer()?;
        emitter.emit(graph, &renderer)
    }

    pub fn emit_with(
        &self,
        graph: &ModuleGraph,
        renderer: &dyn BundleRenderer,
    ) -> Result<EmittedAsset> {
        BundleEmitter::new(self.container.file_system().as_ref(), &self.ctx).emit(graph, renderer)
    }

    /// Build the graph from the entry and write the bundle.
    pub fn run(&self) -> Result<EmittedAsset> {
        let start = Instant::now();
        info!("Bundling {}", self.ctx.entry().display());

        let graph = self.build_graph()?;
        info!(
            "Resolved {} module(s) from {}",
            graph.registry.len(),
            graph.entry_id
        );

        let asset = self.emit(&graph)?;
        info!("Bundle completed in {:.2?}", start.elapsed());
        Ok(asset)
    }
}
