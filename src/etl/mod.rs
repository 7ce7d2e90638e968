//! Core ETL (Extract, Transform, Load) abstractions
//!
//! This module provides the connector/transform/pipeline contract: extract
//! relations from a source endpoint, optionally transform them, and load
//! them to a destination endpoint, with storage-backend inference and
//! per-format capabilities underneath.

mod backend;
mod connector;
mod extract;
mod format;
mod load;
mod pipeline;
mod transform;

pub use backend::StorageBackend;
pub use connector::{ConnectorRole, FileConnector};
pub use extract::Extract;
pub use format::{FileFormat, UpdateMode};
pub use load::Load;
pub use pipeline::Pipeline;
pub use transform::{TransformFn, Transformer};
