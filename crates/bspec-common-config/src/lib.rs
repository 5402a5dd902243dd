//! Configuration types for BSpec.
//!
//! This crate provides the configuration types used by the `bspec` tool
//! for `.bspec/config.yaml` files.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;
