//! DuckDB engine bindings
//!
//! This module is the only place that talks to the engine:
//! - Session and query execution
//! - Opaque relation handles
//! - Option-list formatting
//! - Secret declaration and revocation

mod options;
mod relation;
mod secrets;
mod session;

pub use options::{OptionValue, Options};
pub(crate) use options::ordered_pairs;
pub use relation::Relation;
pub use secrets::{SecretStore, create_scoped_secret};
pub use session::Engine;
