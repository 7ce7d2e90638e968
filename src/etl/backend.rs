//! Storage backend inference
//!
//! The backend is derived, never configured: a location's URI scheme decides
//! which object store (if any) the engine must authenticate to.

use crate::config::Location;
use crate::error::ConfigError;
use std::fmt;
use url::Url;

/// Storage medium behind a location, inferred from its scheme prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    S3,
    Gcs,
    Azure,
}

impl StorageBackend {
    /// Infer the backend of a single location string
    ///
    /// `s3://` → S3, `gs://` → GCS, `az://` or `azure://` → Azure; anything
    /// else (including unparseable strings and plain paths) is the local
    /// filesystem.
    pub fn infer(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) => match url.scheme() {
                "s3" => StorageBackend::S3,
                "gs" => StorageBackend::Gcs,
                "az" | "azure" => StorageBackend::Azure,
                _ => StorageBackend::Local,
            },
            Err(_) => StorageBackend::Local,
        }
    }

    /// Infer the backend of every entry in a location, requiring agreement
    ///
    /// # Errors
    /// [`ConfigError::EmptyLocation`] for an empty list;
    /// [`ConfigError::MixedBackends`] when entries disagree.
    pub fn of_location(location: &Location) -> Result<Self, ConfigError> {
        let mut entries = location.iter();
        let first = entries.next().ok_or(ConfigError::EmptyLocation)?;
        let backend = StorageBackend::infer(first);
        for entry in entries {
            let other = StorageBackend::infer(entry);
            if other != backend {
                return Err(ConfigError::MixedBackends(backend, other));
            }
        }
        Ok(backend)
    }

    /// Whether the engine needs a credential bundle for this backend
    pub fn requires_credentials(&self) -> bool {
        !matches!(self, StorageBackend::Local)
    }

    /// The engine's secret type tag for this backend, if any
    pub fn secret_type(&self) -> Option<&'static str> {
        match self {
            StorageBackend::Local => None,
            StorageBackend::S3 => Some("s3"),
            StorageBackend::Gcs => Some("gcs"),
            StorageBackend::Azure => Some("azure"),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageBackend::Local => "local",
            StorageBackend::S3 => "s3",
            StorageBackend::Gcs => "gcs",
            StorageBackend::Azure => "azure",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_inference() {
        assert_eq!(StorageBackend::infer("s3://bucket/key.csv"), StorageBackend::S3);
        assert_eq!(StorageBackend::infer("gs://bucket/key.csv"), StorageBackend::Gcs);
        assert_eq!(StorageBackend::infer("az://container/blob"), StorageBackend::Azure);
        assert_eq!(StorageBackend::infer("azure://container/blob"), StorageBackend::Azure);
        assert_eq!(StorageBackend::infer("data/local.csv"), StorageBackend::Local);
        assert_eq!(StorageBackend::infer("/abs/path.parquet"), StorageBackend::Local);
    }

    #[test]
    fn test_mixed_backends_rejected() {
        let location = Location::Many(vec![
            "s3://bucket/a.csv".to_string(),
            "data/b.csv".to_string(),
        ]);
        assert!(matches!(
            StorageBackend::of_location(&location),
            Err(ConfigError::MixedBackends(StorageBackend::S3, StorageBackend::Local))
        ));
    }

    #[test]
    fn test_empty_location_rejected() {
        assert!(matches!(
            StorageBackend::of_location(&Location::Many(vec![])),
            Err(ConfigError::EmptyLocation)
        ));
    }

    #[test]
    fn test_uniform_list() {
        let location = Location::Many(vec![
            "s3://bucket/a.csv".to_string(),
            "s3://bucket/b.csv".to_string(),
        ]);
        assert_eq!(
            StorageBackend::of_location(&location).unwrap(),
            StorageBackend::S3
        );
    }
}
