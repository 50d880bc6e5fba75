//! Error types for pipeline construction.

use thiserror::Error;

/// Errors raised while building a pipeline.
///
/// Normalizing an address never fails; these only surface from
/// construction and configuration loading.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Two override keys collapse to the same canonical domain.
    #[error("override domains {first:?} and {second:?} both normalize to {canonical:?}")]
    DuplicateDomain {
        canonical: String,
        first: String,
        second: String,
    },
    /// Following the alias table from `alias` revisits a domain.
    #[error("domain alias {alias:?} leads into a cycle")]
    AliasCycle { alias: String },
    #[error("invalid normalizer configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
