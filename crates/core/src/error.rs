//! Error types for targen-core

use thiserror::Error;

/// Errors that can occur while synthesizing targets
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("document root is not a mapping")]
    NotAMapping,

    #[error("no `project` key found in the targets file")]
    MissingProjectName,

    #[error("no `targets` mapping found in the targets file")]
    MissingTargets,

    #[error("no `{0}` section found in the document")]
    SectionMissing(String),

    #[error("`{0}` section has no body")]
    SectionEmpty(String),

    #[error("dependency `{0}` is neither a known package nor a declared target")]
    DependencyNotFound(String),

    #[error("command `{command}` failed with {status}")]
    CommandFailed { command: String, status: String },
}
