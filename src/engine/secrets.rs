//! DuckDB secret lifecycle
//!
//! Secrets are named, scoped credential bundles the engine uses to
//! authenticate to remote object storage. Two flavors exist:
//!
//! - process-wide secrets declared up front from the secrets config
//!   (`SecretStore::create_all`), reusable by any connector that references
//!   the name
//! - ad-hoc secrets a connector synthesizes lazily for its own role
//!   ([`create_scoped_secret`])
//!
//! All declarations use `CREATE OR REPLACE TEMPORARY SECRET`, so declaring
//! the same name twice replaces the bundle rather than accumulating, and
//! racing identical declarations is safe (last writer wins).

use super::{Engine, Options};
use crate::config::SecretsConfig;
use crate::error::ConfigError;
use eyre::{Context, Result};

/// Declares and drops named engine secrets from a backing config
///
/// # Example
/// ```no_run
/// use mallard::engine::{Engine, SecretStore};
/// use mallard::config::SecretsConfig;
/// # use eyre::Result;
/// # fn example(secrets_config: SecretsConfig) -> Result<()> {
/// let engine = Engine::new()?;
/// let secrets = SecretStore::new(engine, secrets_config);
/// secrets.create_all()?;
/// // ... run pipelines ...
/// secrets.drop_all()?;
/// # Ok(())
/// # }
/// ```
pub struct SecretStore {
    engine: Engine,
    config: SecretsConfig,
}

impl SecretStore {
    pub fn new(engine: Engine, config: SecretsConfig) -> Self {
        Self { engine, config }
    }

    /// Declare a single secret by name from the backing config
    ///
    /// Replaces any prior bundle of the same name.
    ///
    /// # Errors
    /// [`ConfigError::UnknownSecret`] if the name is not configured; engine
    /// errors if the declaration is rejected.
    pub fn create_secret(&self, name: &str) -> Result<()> {
        let options = self
            .config
            .get(name)
            .ok_or_else(|| ConfigError::UnknownSecret(name.to_string()))?;
        create_scoped_secret(&self.engine, name, options)
    }

    /// Declare every configured secret, in config order, failing fast
    pub fn create_all(&self) -> Result<()> {
        for (name, _) in self.config.iter() {
            self.create_secret(name)?;
        }
        Ok(())
    }

    /// Drop a single named secret
    ///
    /// Dropping a name that was never declared is an engine error, surfaced
    /// to the caller rather than silently ignored.
    pub fn drop_secret(&self, name: &str) -> Result<()> {
        self.engine
            .execute(&format!("drop secret {};", name))
            .with_context(|| format!("Failed to drop secret \"{}\"", name))
    }

    /// Drop every configured secret, in config order
    pub fn drop_all(&self) -> Result<()> {
        for (name, _) in self.config.iter() {
            self.drop_secret(name)?;
        }
        Ok(())
    }
}

/// Declare a named secret with explicit options, replacing any prior bundle
///
/// Used by connectors for lazily synthesized, role-scoped credentials, and
/// by [`SecretStore`] for configured ones.
pub fn create_scoped_secret(engine: &Engine, name: &str, options: &Options) -> Result<()> {
    engine
        .execute(&format!(
            "create or replace temporary secret {} ({});",
            name,
            options.to_copy_options()
        ))
        .with_context(|| format!("Failed to create secret \"{}\"", name))
}
