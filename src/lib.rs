//! Mallard
//!
//! A config-driven ETL engine for tabular files, powered by DuckDB

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod etl;
pub mod storage;

// Re-exports for convenience
pub use config::{Config, EndpointConfig, Location, PipelineConfig, TransformerConfig};
pub use engine::{Engine, OptionValue, Options, Relation, SecretStore};
pub use error::ConfigError;
pub use etl::{
    ConnectorRole, Extract, FileConnector, FileFormat, Load, Pipeline, StorageBackend,
    TransformFn, Transformer, UpdateMode,
};
pub use storage::uniquify;
