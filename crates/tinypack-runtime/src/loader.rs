//! Module loader runtime for bundled output.

/// Name the rewriter gives to every `require` call inside a bundle.
pub const REQUIRE_FN: &str = "__tinypack_require__";

/// Loader template.
///
/// Placeholders:
/// - `{{require}}`: the internal loader name
/// - `{{entry}}`: the entry module id as a quoted string literal
/// - `{{modules}}`: the module map body, one `"<id>": function (...) { ... },` per module
pub const LOADER_TEMPLATE: &str = include_str!("loader.js");

/// Parameters every module wrapper function receives, in order.
pub const MODULE_PARAMS: [&str; 3] = ["module", "exports", REQUIRE_FN];
