//! targen-core: target synthesis and document splicing for generated
//! project descriptors
//!
//! This crate reconciles two documents: a user-authored intent file
//! declaring which targets should exist, and a generated project
//! document that materializes them. The `targets:` section of the
//! project document is located textually, decoded, extended by
//! inheritance resolution, re-encoded canonically and spliced back in
//! place; every line outside that section is preserved byte-for-byte.

pub mod intent;
pub mod migrate;
pub mod model;
pub mod project;
pub mod resolve;
pub mod section;
pub mod shell;

mod error;
mod ops;

pub use error::Error;
pub use model::{MaterializedTarget, PostCompileScript, TargetConfig, TargetSettings};
pub use ops::{RegenerateOutcome, add_dependency, regenerate};
pub use shell::Shell;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
