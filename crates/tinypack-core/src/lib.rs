pub mod compiler;
pub mod config;
pub mod context;
pub mod di;
pub mod emitter;
pub mod errors;
pub mod fs;
pub mod graph;
pub mod module_id;
pub mod registry;
pub mod rewriter;

pub use compiler::Compiler;
pub use config::{BundlerConfig, CliOverrides, CycleLevel};
pub use context::{BuildContext, BuildOptions};
pub use di::Container;
pub use emitter::{BundleData, BundleEmitter, BundleRenderer, EmittedAsset, LoaderTemplate};
pub use errors::BundleError;
pub use graph::{GraphBuilder, ModuleGraph};
pub use module_id::ModuleId;
pub use registry::{ModuleRecord, ModuleRegistry};
pub use rewriter::{rewrite_module, RewrittenModule};
