//! Runtime support code for tinypack bundles.
//! Provides JavaScript snippets embedded via `include_str!` for the bundle emitter.

pub mod loader;
