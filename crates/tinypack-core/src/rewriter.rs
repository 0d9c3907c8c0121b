//! Reference rewriting
//!
//! Turns one module's source into the form it takes inside a bundle: every
//! `require("<path>")` call becomes a call to the bundle's internal loader with the
//! resolved [`ModuleId`] as its argument. Each invocation parses into its own arena, so
//! no syntax tree is ever shared between modules.

use oxc_allocator::Allocator;
use oxc_ast::ast::{Argument, CallExpression, Expression};
use oxc_ast::visit::walk_mut;
use oxc_ast::{AstBuilder, VisitMut};
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::SourceType;
use tinypack_runtime::loader::REQUIRE_FN;
use tracing::trace;

use crate::errors::{BundleError, Result};
use crate::module_id::ModuleId;

/// Name of the function treated as a dependency reference
pub const REQUIRE_KEYWORD: &str = "require";

/// A module after reference rewriting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenModule {
    pub source_code: String,
    /// Resolved references in source order, duplicates included
    pub dependencies: Vec<ModuleId>,
}

/// Rewrite the source of `module`.
///
/// References are resolved against `module.dir()`. JSON modules are validated and wrapped
/// instead of parsed as JavaScript.
pub fn rewrite_module(
    module: &ModuleId,
    source: &str,
    default_extension: &str,
) -> Result<RewrittenModule> {
    if module.extension() == Some("json") {
        return wrap_json(module, source);
    }

    let allocator = Allocator::default();
    // Module bodies run inside a function wrapper, so only script grammar is accepted.
    let source_type = SourceType::from_path(module.as_str())
        .unwrap_or_default()
        .with_script(true);
    let ret = Parser::new(&allocator, source, source_type).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(BundleError::Parse {
            module: module.clone(),
            message,
        });
    }

    let mut program = ret.program;
    // A hashbang is only legal at the very start of a file, not inside a module wrapper.
    program.hashbang = None;

    let mut rewriter = RequireRewriter {
        ast: AstBuilder::new(&allocator),
        dir: module.dir(),
        default_extension,
        dependencies: Vec::new(),
    };
    rewriter.visit_program(&mut program);

    let source_code = Codegen::new().build(&program).code;
    trace!(
        "Rewrote {} ({} reference(s))",
        module,
        rewriter.dependencies.len()
    );

    Ok(RewrittenModule {
        source_code,
        dependencies: rewriter.dependencies,
    })
}

fn wrap_json(module: &ModuleId, source: &str) -> Result<RewrittenModule> {
    let json = source.trim_start_matches('\u{feff}').trim();
    serde_json::from_str::<serde_json::Value>(json).map_err(|source| BundleError::Json {
        module: module.clone(),
        source,
    })?;

    Ok(RewrittenModule {
        source_code: format!("module.exports = {};\n", json),
        dependencies: Vec::new(),
    })
}

struct RequireRewriter<'a, 'r> {
    ast: AstBuilder<'a>,
    dir: &'r str,
    default_extension: &'r str,
    dependencies: Vec<ModuleId>,
}

impl<'a, 'r> RequireRewriter<'a, 'r> {
    fn rewrite_call(&mut self, call: &mut CallExpression<'a>) {
        let Expression::Identifier(callee) = &mut call.callee else {
            return;
        };
        if callee.name.as_str() != REQUIRE_KEYWORD {
            return;
        }
        let Some(Argument::StringLiteral(literal)) = call.arguments.first_mut() else {
            return;
        };

        let id = ModuleId::resolve(self.dir, literal.value.as_str(), self.default_extension);
        literal.value = self.ast.atom(id.as_str());
        callee.name = self.ast.atom(REQUIRE_FN);
        self.dependencies.push(id);
    }
}

impl<'a, 'r> VisitMut<'a> for RequireRewriter<'a, 'r> {
    fn visit_call_expression(&mut self, call: &mut CallExpression<'a>) {
        self.rewrite_call(call);
        walk_mut::walk_call_expression(self, call);
    }
}
