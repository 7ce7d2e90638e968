//! File connector: paired extract/load capability for one endpoint
//!
//! A connector binds a format, location(s), per-format options, an update
//! mode, and optional credentials to one configured endpoint. The storage
//! backend is inferred from the location at construction; remote backends
//! get a credential secret synthesized lazily, once per connector instance,
//! just before the first engine call that needs it.

use super::{Extract, FileFormat, Load, StorageBackend, UpdateMode};
use crate::config::{EndpointConfig, Location};
use crate::engine::{Engine, Options, Relation, create_scoped_secret};
use eyre::Result;
use std::cell::Cell;
use std::fmt;
use std::path::Path;

/// The role a connector plays in a pipeline, used to scope synthesized
/// secret names so that reading and writing the same backend with different
/// credentials cannot clobber each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorRole {
    Extractor,
    Loader,
}

impl fmt::Display for ConnectorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectorRole::Extractor => "extractor",
            ConnectorRole::Loader => "loader",
        })
    }
}

/// A connector for reading from and writing to files in local storage or
/// cloud object storage
///
/// # Example
/// ```no_run
/// use mallard::config::EndpointConfig;
/// use mallard::engine::Engine;
/// use mallard::etl::{ConnectorRole, Extract, FileConnector, FileFormat};
/// # use eyre::Result;
/// # fn example() -> Result<()> {
/// let engine = Engine::new()?;
/// let config = EndpointConfig::new(FileFormat::Csv, "data/events.csv");
/// let connector = FileConnector::new(engine, ConnectorRole::Extractor, &config)?;
/// let records = connector.extract()?;
/// # Ok(())
/// # }
/// ```
pub struct FileConnector {
    engine: Engine,
    role: ConnectorRole,
    format: FileFormat,
    location: Location,
    options: Options,
    update_mode: UpdateMode,
    backend: StorageBackend,
    credentials: Option<Options>,
    secret_name: Option<String>,
    secret_ready: Cell<bool>,
}

impl FileConnector {
    /// Validate an endpoint config and bind it to the engine
    ///
    /// # Errors
    /// [`crate::error::ConfigError`] for an empty location list or locations
    /// spanning different backends. Format and update-mode validity are
    /// enforced by the types at the config boundary.
    pub fn new(engine: Engine, role: ConnectorRole, config: &EndpointConfig) -> Result<Self> {
        let backend = StorageBackend::of_location(&config.location)?;
        Ok(Self {
            engine,
            role,
            format: config.format,
            location: config.location.clone(),
            options: config.options.clone(),
            update_mode: config.update_mode,
            backend,
            credentials: config.credentials.clone(),
            secret_name: config.secret_name.clone(),
            secret_ready: Cell::new(false),
        })
    }

    pub fn backend(&self) -> StorageBackend {
        self.backend
    }

    /// Name of the secret this connector declares for remote access
    fn scoped_secret_name(&self) -> String {
        self.secret_name
            .clone()
            .unwrap_or_else(|| format!("{}_{}", self.backend, self.role))
    }

    /// Declare this connector's credential secret if the backend needs one.
    /// Idempotent per instance.
    fn ensure_secret(&self) -> Result<()> {
        if self.secret_ready.get() || !self.backend.requires_credentials() {
            return Ok(());
        }

        let options = match &self.credentials {
            Some(explicit) => explicit.clone(),
            None => {
                // default bundle: backend type + ambient credential chain
                let mut options = Options::new();
                if let Some(secret_type) = self.backend.secret_type() {
                    options.push("type", secret_type);
                }
                options.push("provider", "credential_chain");
                options
            }
        };

        let name = self.scoped_secret_name();
        log::debug!("declaring secret {} for {} {}", name, self.backend, self.role);
        create_scoped_secret(&self.engine, &name, &options)?;
        self.secret_ready.set(true);
        Ok(())
    }

    /// Delete partial artifacts of a failed new-file write
    ///
    /// Only the local filesystem gets cleanup: existence checks and deletes
    /// are cheap and reliable there, and remote delete semantics are not
    /// guessed at.
    fn remove_partial_artifacts(&self, target: &Location) {
        for path in target.iter() {
            let path = Path::new(path);
            if path.exists() {
                if let Err(err) = std::fs::remove_file(path) {
                    log::warn!(
                        "Failed to remove partial artifact {}: {}",
                        path.display(),
                        err
                    );
                } else {
                    log::debug!("removed partial artifact {}", path.display());
                }
            }
        }
    }
}

impl Extract for FileConnector {
    /// Read the configured location(s) into a relation
    ///
    /// No retries; a read failure propagates immediately.
    fn extract(&self) -> Result<Relation> {
        self.ensure_secret()?;
        self.format
            .read_relation(&self.engine, &self.location, &self.options)
    }
}

impl Load for FileConnector {
    /// Write a relation to the configured location
    ///
    /// Under `new_file`, the target is a uniquified variant of the location
    /// and a failed local write removes whatever partial artifact was left
    /// before re-raising the error. Under `overwrite`, no cleanup is
    /// attempted.
    fn load(&self, records: &Relation) -> Result<()> {
        self.ensure_secret()?;

        let target = match self.update_mode {
            UpdateMode::Overwrite => self.location.clone(),
            UpdateMode::NewFile => self.location.uniquify(),
        };

        match self.format.write_relation(records, &target, &self.options) {
            Ok(()) => Ok(()),
            Err(err) => {
                if self.update_mode == UpdateMode::NewFile
                    && self.backend == StorageBackend::Local
                {
                    self.remove_partial_artifacts(&target);
                }
                Err(err)
            }
        }
    }
}
