//! Typed configuration errors
//!
//! Execution errors (engine rejections, filesystem failures) are propagated
//! as `eyre::Report` with context attached at the call site. Configuration
//! mistakes get a typed enum so callers and tests can tell them apart from
//! transient failures.

use crate::etl::StorageBackend;
use thiserror::Error;

/// Errors raised while validating pipeline, connector, or secret configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A location list was configured but contains no entries
    #[error("location list is empty")]
    EmptyLocation,

    /// Locations in one endpoint infer to different storage backends
    #[error("locations mix storage backends ({0} and {1})")]
    MixedBackends(StorageBackend, StorageBackend),

    /// A secret was requested by name but is not in the secrets config
    #[error("\"{0}\" is not a key in the secrets config")]
    UnknownSecret(String),

    /// A transformer config sets both a query path and a function
    #[error("transformer config must set either \"query_path\" or \"function\", not both")]
    AmbiguousTransformer,

    /// A transformer config sets neither a query path nor a function
    #[error("transformer config must set a \"query_path\" or \"function\" key")]
    EmptyTransformer,

    /// A pipeline was requested by name but is not in the config
    #[error("\"{0}\" is not a pipeline in the config")]
    UnknownPipeline(String),
}
