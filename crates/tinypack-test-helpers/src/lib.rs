//! Test utilities and fixtures for tinypack
//!
//! This crate provides shared test helpers that can be used by the integration
//! tests (tests/ directory) of every crate in the workspace.

pub mod bundle;
pub mod fixtures;
pub mod mocks;
