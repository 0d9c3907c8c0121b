//! Test fixtures - small module graphs as `(path, source)` pairs

/// Entry with a single dependency and no further requires
pub fn two_modules() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "index.js",
            "const x = require('./a');\nconsole.log('value: ' + x.value);\n",
        ),
        ("a.js", "exports.value = 42;\n"),
    ]
}

/// A -> B, A -> C, B -> D, C -> D with D spelled differently from B and C
pub fn diamond() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "a.js",
            "const b = require('./b');\nconst c = require('./lib/c');\nconsole.log(b + c);\n",
        ),
        ("b.js", "module.exports = require('./shared/d') + 1;\n"),
        (
            "lib/c.js",
            "module.exports = require('../shared/d.js') * 10;\n",
        ),
        (
            "shared/d.js",
            "globalThis.dLoads = (globalThis.dLoads || 0) + 1;\nmodule.exports = 2;\n",
        ),
    ]
}

/// Two modules that require each other
pub fn cycle() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "a.js",
            "exports.name = 'a';\nconst b = require('./b');\nconsole.log('a sees ' + b.name + ', b saw ' + b.seen);\n",
        ),
        (
            "b.js",
            "const a = require('./a');\nexports.name = 'b';\nexports.seen = a.name;\n",
        ),
    ]
}

/// Entry that reads a JSON module from a subdirectory
pub fn json_dependency() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "src/index.js",
            "const pkg = require('../package.json');\nconsole.log(pkg.name + '@' + pkg.version);\n",
        ),
        (
            "package.json",
            "{\n  \"name\": \"demo\",\n  \"version\": \"1.0.0\"\n}\n",
        ),
    ]
}

/// Source with a syntax error
pub fn syntax_error() -> &'static str {
    "function broken( {\n  return 1;\n"
}
