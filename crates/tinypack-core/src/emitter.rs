//! Bundle emission
//!
//! The emitter knows where the bundle goes; what it looks like is up to a
//! [`BundleRenderer`]. The default renderer fills the loader template shipped in
//! `tinypack-runtime`.

use serde::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tinypack_runtime::loader::{LOADER_TEMPLATE, MODULE_PARAMS, REQUIRE_FN};
use tracing::{debug, info};

use crate::context::BuildContext;
use crate::errors::{BundleError, Result};
use crate::fs::FileSystem;
use crate::graph::ModuleGraph;
use crate::module_id::ModuleId;
use crate::registry::ModuleRegistry;

/// Placeholder in `output.filename` replaced with a content hash
pub const HASH_PLACEHOLDER: &str = "[hash]";

const HASH_LENGTH: usize = 8;

/// Everything a renderer gets to see
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleData<'a> {
    pub entry_id: &'a ModuleId,
    pub modules: &'a ModuleRegistry,
}

/// Turns bundle data into the text of the output file
pub trait BundleRenderer {
    fn render(&self, data: &BundleData<'_>) -> Result<String>;
}

/// Text template with `{{require}}`, `{{entry}}` and `{{modules}}` placeholders
#[derive(Debug, Clone)]
pub struct LoaderTemplate {
    template: Cow<'static, str>,
}

impl LoaderTemplate {
    pub fn builtin() -> Self {
        Self {
            template: Cow::Borrowed(LOADER_TEMPLATE),
        }
    }

    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        for required in ["{{entry}}", "{{modules}}"] {
            if !template.contains(required) {
                return Err(BundleError::Template(format!(
                    "template is missing the {} placeholder",
                    required
                )));
            }
        }
        Ok(Self {
            template: Cow::Owned(template),
        })
    }

    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let template = fs.read_file(path).map_err(|e| BundleError::io(path, e))?;
        Self::new(template)
    }

    fn render_modules(&self, modules: &ModuleRegistry) -> Result<String> {
        let params = MODULE_PARAMS.join(", ");
        let mut out = String::new();
        for record in modules.iter() {
            out.push_str("  ");
            out.push_str(&quote(record.id.as_str())?);
            out.push_str(": function (");
            out.push_str(&params);
            out.push_str(") {\n");
            out.push_str(&record.source_code);
            if !record.source_code.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("  },\n");
        }
        Ok(out.trim_end_matches('\n').to_string())
    }
}

impl Default for LoaderTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BundleRenderer for LoaderTemplate {
    fn render(&self, data: &BundleData<'_>) -> Result<String> {
        let entry = quote(data.entry_id.as_str())?;
        let modules = self.render_modules(data.modules)?;

        Ok(substitute(&self.template, |name| match name {
            "require" => Some(REQUIRE_FN),
            "entry" => Some(entry.as_str()),
            "modules" => Some(modules.as_str()),
            _ => None,
        }))
    }
}

fn quote(value: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|e| BundleError::Template(e.to_string()))
}

/// Single pass over `template`, so substituted text is never scanned for placeholders.
fn substitute<'v>(template: &str, lookup: impl Fn(&str) -> Option<&'v str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => match lookup(after[..end].trim()) {
                Some(value) => {
                    out.push_str(value);
                    rest = &after[end + 2..];
                }
                None => {
                    out.push_str("{{");
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// A file written by the emitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedAsset {
    pub path: PathBuf,
    pub size: usize,
}

pub struct BundleEmitter<'a> {
    fs: &'a dyn FileSystem,
    ctx: &'a BuildContext,
}

impl<'a> BundleEmitter<'a> {
    pub fn new(fs: &'a dyn FileSystem, ctx: &'a BuildContext) -> Self {
        Self { fs, ctx }
    }

    /// The configured template, or the built-in one
    pub fn renderer(&self) -> Result<LoaderTemplate> {
        match &self.ctx.options().template {
            Some(path) => {
                debug!("Using loader template {}", path.display());
                LoaderTemplate::load(self.fs, path)
            }
            None => Ok(LoaderTemplate::builtin()),
        }
    }

    /// Render `graph` and write it to the output path, replacing any existing file.
    pub fn emit(&self, graph: &ModuleGraph, renderer: &dyn BundleRenderer) -> Result<EmittedAsset> {
        let data = BundleData {
            entry_id: &graph.entry_id,
            modules: &graph.registry,
        };
        let code = renderer.render(&data)?;

        let dir = self.ctx.output_path();
        let path = dir.join(output_filename(self.ctx.output_filename(), &code));

        self.fs
            .create_dir_all(dir)
            .map_err(|e| BundleError::io(dir, e))?;
        self.fs
            .write_file(&path, &code)
            .map_err(|e| BundleError::io(&path, e))?;

        info!("Emitted {} ({} bytes)", path.display(), code.len());
        Ok(EmittedAsset {
            path,
            size: code.len(),
        })
    }
}

fn output_filename(filename: &str, code: &str) -> String {
    if !filename.contains(HASH_PLACEHOLDER) {
        return filename.to_string();
    }
    let hash = blake3::hash(code.as_bytes()).to_hex();
    filename.replace(HASH_PLACEHOLDER, &hash.as_str()[..HASH_LENGTH])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BuildOptions;
    use crate::fs::MockFileSystem;
    use crate::registry::ModuleRecord;

    fn graph(modules: &[(&str, &str)]) -> ModuleGraph {
        let mut registry = ModuleRegistry::new();
        for (id, code) in modules {
            registry.insert(ModuleRecord {
                id: ModuleId::from_normalized(*id),
                source_code: code.to_string(),
            });
        }
        ModuleGraph {
            entry_id: ModuleId::from_normalized(modules[0].0),
            registry,
        }
    }

    fn context(filename: &str, template: Option<PathBuf>) -> BuildContext {
        BuildContext::new(
            PathBuf::from("/project/index.js"),
            PathBuf::from("/project"),
            PathBuf::from("/project/dist"),
            filename.to_string(),
            BuildOptions {
                template,
                ..BuildOptions::default()
            },
        )
    }

    #[test]
    fn test_builtin_render_embeds_modules_in_order() {
        let graph = graph(&[("./index.js", "const a = __tinypack_require__(\"./a.js\");"), ("./a.js", "module.exports = 1;")]);
        let data = BundleData {
            entry_id: &graph.entry_id,
            modules: &graph.registry,
        };
        let out = LoaderTemplate::builtin().render(&data).unwrap();

        let index_pos = out.find("\"./index.js\": function (module, exports, __tinypack_require__) {").unwrap();
        let a_pos = out.find("\"./a.js\": function (module, exports, __tinypack_require__) {").unwrap();
        assert!(index_pos < a_pos);
        assert!(out.contains("return __tinypack_require__(\"./index.js\");"));
        assert!(out.contains("function __tinypack_require__(moduleId)"));
        assert!(!out.contains("{{"));
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        let graph = graph(&[("./index.js", "const s = '{{entry}}';")]);
        let data = BundleData {
            entry_id: &graph.entry_id,
            modules: &graph.registry,
        };
        let out = LoaderTemplate::builtin().render(&data).unwrap();
        assert!(out.contains("const s = '{{entry}}';"));
    }

    #[test]
    fn test_ids_are_escaped() {
        let graph = graph(&[("./it's \"quoted\".js", "")]);
        let data = BundleData {
            entry_id: &graph.entry_id,
            modules: &graph.registry,
        };
        let out = LoaderTemplate::new("{{entry}}|{{modules}}").unwrap().render(&data).unwrap();
        assert!(out.starts_with("\"./it's \\\"quoted\\\".js\"|"));
    }

    #[test]
    fn test_custom_template_requires_placeholders() {
        assert!(matches!(
            LoaderTemplate::new("run({{entry}})"),
            Err(BundleError::Template(_))
        ));
    }

    #[test]
    fn test_unknown_placeholder_is_left_alone() {
        assert_eq!(
            substitute("a {{ x }} {{y}} {{", |name| (name == "x").then_some("1")),
            "a 1 {{y}} {{"
        );
    }

    #[test]
    fn test_emit_writes_output_file() {
        let fs = MockFileSystem::new();
        let ctx = context("bundle.js", None);
        let graph = graph(&[("./index.js", "console.log(1);")]);

        let emitter = BundleEmitter::new(&fs, &ctx);
        let renderer = emitter.renderer().unwrap();
        let asset = emitter.emit(&graph, &renderer).unwrap();

        assert_eq!(asset.path, PathBuf::from("/project/dist/bundle.js"));
        let written = fs.file("/project/dist/bundle.js").unwrap();
        assert_eq!(written.len(), asset.size);
        assert!(written.contains("console.log(1);"));
    }

    #[test]
    fn test_emit_overwrites_existing_file() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/project/dist/bundle.js", "stale");
        let ctx = context("bundle.js", None);

        let emitter = BundleEmitter::new(&fs, &ctx);
        emitter
            .emit(&graph(&[("./index.js", "fresh();")]), &LoaderTemplate::builtin())
            .unwrap();

        let written = fs.file("/project/dist/bundle.js").unwrap();
        assert!(!written.contains("stale"));
        assert!(written.contains("fresh();"));
    }

    #[test]
    fn test_hashed_filename() {
        let fs = MockFileSystem::new();
        let ctx = context("bundle.[hash].js", None);

        let asset = BundleEmitter::new(&fs, &ctx)
            .emit(&graph(&[("./index.js", "x();")]), &LoaderTemplate::builtin())
            .unwrap();

        let name = asset.path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("bundle."));
        assert!(name.ends_with(".js"));
        assert_eq!(name.len(), "bundle..js".len() + HASH_LENGTH);
        assert!(!name.contains(HASH_PLACEHOLDER));
    }

    #[test]
    fn test_custom_template_from_file() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/project/loader.tpl", "// custom\n{{entry}}\n{{modules}}\n");
        let ctx = context("bundle.js", Some(PathBuf::from("/project/loader.tpl")));

        let emitter = BundleEmitter::new(&fs, &ctx);
        let renderer = emitter.renderer().unwrap();
        emitter
            .emit(&graph(&[("./index.js", "y();")]), &renderer)
            .unwrap();

        let written = fs.file("/project/dist/bundle.js").unwrap();
        assert!(written.starts_with("// custom\n\"./index.js\"\n"));
    }

    #[test]
    fn test_renderer_sees_data_as_json() {
        let graph = graph(&[("./index.js", "a();"), ("./b.js", "b();")]);
        let data = BundleData {
            entry_id: &graph.entry_id,
            modules: &graph.registry,
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["entryId"], "./index.js");
        assert_eq!(json["modules"]["./b.js"]["sourceCode"], "b();");
    }
}
