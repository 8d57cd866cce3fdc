//! Recipe generation for ros-conda
//!
//! This crate ties manifest parsing, distribution lookup and dependency
//! mapping together into a conda recipe with a build script.

pub mod baseline;
pub mod build_script;
pub mod input_globs;
pub mod orchestrator;

pub use build_script::{assemble, BuildScriptContext, Templates, SRC_DIR_PLACEHOLDER};
pub use input_globs::build_input_globs;
pub use orchestrator::{distribution_provider, mapping_table, GeneratedRecipe, RecipeGenerator};
