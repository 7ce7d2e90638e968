//! Typed configuration surface
//!
//! Pipelines, endpoints, transformer specs, and secrets are plain data
//! loaded from a JSON5 file (or built programmatically). Connector kinds are
//! a closed enum rather than live constructor references; function-mode
//! transformers are API-only and never appear in files.

use crate::engine::{Options, ordered_pairs};
use crate::etl::{FileFormat, TransformFn, UpdateMode};
use crate::storage;
use eyre::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Top-level config: named secrets plus named pipelines, both in file order
#[derive(Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub secrets: SecretsConfig,

    #[serde(default, deserialize_with = "pipeline_pairs")]
    pub pipelines: Vec<(String, PipelineConfig)>,
}

impl Config {
    /// Parse a config from JSON5 text
    pub fn from_json5(text: &str) -> Result<Self> {
        json5::from_str(text).context("Failed to parse config")
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json5(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

fn pipeline_pairs<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<(String, PipelineConfig)>, D::Error> {
    ordered_pairs(deserializer)
}

/// Extractor + optional transformer + loader for one named pipeline
#[derive(Deserialize)]
pub struct PipelineConfig {
    pub extractor: ConnectorConfig,

    #[serde(default)]
    pub transformer: Option<TransformerConfig>,

    pub loader: ConnectorConfig,
}

/// Closed set of connector kinds
///
/// The `kind` tag replaces the constructor reference a dynamic config would
/// carry; each variant has a factory in the pipeline builder.
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConnectorConfig {
    File(EndpointConfig),
}

/// One configured endpoint: format, location(s), options, update mode, and
/// optional explicit credentials
#[derive(Clone, Deserialize)]
pub struct EndpointConfig {
    pub format: FileFormat,

    /// A path or URI, or an ordered list of them
    #[serde(alias = "filepath")]
    pub location: Location,

    /// Per-format options, passed to the engine verbatim
    #[serde(default)]
    pub options: Options,

    #[serde(default)]
    pub update_mode: UpdateMode,

    /// Explicit credential options; when absent, remote backends get a
    /// synthesized default bundle
    #[serde(default)]
    pub credentials: Option<Options>,

    /// Custom name for the connector's synthesized secret
    #[serde(default)]
    pub secret_name: Option<String>,
}

impl EndpointConfig {
    pub fn new(format: FileFormat, location: impl Into<Location>) -> Self {
        Self {
            format,
            location: location.into(),
            options: Options::new(),
            update_mode: UpdateMode::default(),
            credentials: None,
            secret_name: None,
        }
    }
}

/// A single path/URI or an ordered list of them
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Location {
    Single(String),
    Many(Vec<String>),
}

impl Location {
    /// Iterate entries in order; a single location yields once
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            Location::Single(path) => std::slice::from_ref(path).iter(),
            Location::Many(paths) => paths.iter(),
        }
        .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        match self {
            Location::Single(_) => 1,
            Location::Many(paths) => paths.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply the path uniquifier element-wise, preserving order
    pub fn uniquify(&self) -> Location {
        match self {
            Location::Single(path) => Location::Single(storage::uniquify(path)),
            Location::Many(paths) => {
                Location::Many(paths.iter().map(|p| storage::uniquify(p)).collect())
            }
        }
    }
}

impl From<&str> for Location {
    fn from(path: &str) -> Self {
        Location::Single(path.to_string())
    }
}

impl From<String> for Location {
    fn from(path: String) -> Self {
        Location::Single(path)
    }
}

impl From<Vec<String>> for Location {
    fn from(paths: Vec<String>) -> Self {
        Location::Many(paths)
    }
}

/// Transformer spec: a query source XOR a function
///
/// Exactly one of `query_path` and `function` must be set; the pipeline
/// builder rejects anything else. `function` cannot come from a file and is
/// only set programmatically via [`TransformerConfig::function`].
#[derive(Default, Deserialize)]
pub struct TransformerConfig {
    /// Path to a plain-text query file, optionally containing `{name}`
    /// placeholders
    #[serde(default)]
    pub query_path: Option<PathBuf>,

    /// Named values substituted literally into the query text
    #[serde(default)]
    pub values: Option<Options>,

    #[serde(skip)]
    pub function: Option<TransformFn>,
}

impl TransformerConfig {
    /// Query-mode spec reading from the given file
    pub fn query(path: impl Into<PathBuf>) -> Self {
        Self {
            query_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Function-mode spec wrapping a callable
    pub fn function(f: TransformFn) -> Self {
        Self {
            function: Some(f),
            ..Self::default()
        }
    }

    /// Set substitution values for a query-mode spec
    pub fn with_values(mut self, values: Options) -> Self {
        self.values = Some(values);
        self
    }
}

/// Named credential bundles, in config order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecretsConfig(Vec<(String, Options)>);

impl SecretsConfig {
    pub fn get(&self, name: &str) -> Option<&Options> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, options)| options)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Options)> {
        self.0.iter().map(|(name, options)| (name.as_str(), options))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for SecretsConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(SecretsConfig(ordered_pairs(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        secrets: {
            s3_default: { type: "s3", provider: "credential_chain" },
        },
        pipelines: {
            events: {
                extractor: { kind: "file", format: "csv", filepath: "data/events.csv" },
                transformer: { query_path: "queries/events.sql" },
                loader: {
                    kind: "file",
                    format: "parquet",
                    location: "data/events.parquet",
                    update_mode: "new_file",
                },
            },
            copy_only: {
                extractor: {
                    kind: "file",
                    format: "json",
                    location: ["a.json", "b.json"],
                },
                loader: { kind: "file", format: "csv", location: "out.csv" },
            },
        },
    }"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_json5(SAMPLE).unwrap();

        let names: Vec<&str> = config.pipelines.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["events", "copy_only"]);

        assert!(config.secrets.get("s3_default").is_some());
        assert!(config.secrets.get("missing").is_none());
    }

    #[test]
    fn test_filepath_alias_and_update_mode_default() {
        let config = Config::from_json5(SAMPLE).unwrap();
        let (_, events) = &config.pipelines[0];

        let ConnectorConfig::File(extractor) = &events.extractor;
        assert_eq!(extractor.location, Location::from("data/events.csv"));
        assert_eq!(extractor.update_mode, UpdateMode::Overwrite);

        let ConnectorConfig::File(loader) = &events.loader;
        assert_eq!(loader.update_mode, UpdateMode::NewFile);
    }

    #[test]
    fn test_location_list() {
        let config = Config::from_json5(SAMPLE).unwrap();
        let (_, copy_only) = &config.pipelines[1];
        let ConnectorConfig::File(extractor) = &copy_only.extractor;
        assert_eq!(extractor.location.len(), 2);
    }

    #[test]
    fn test_unsupported_format_rejected_at_parse() {
        let result = Config::from_json5(
            r#"{ pipelines: { bad: {
                extractor: { kind: "file", format: "xml", location: "x.xml" },
                loader: { kind: "file", format: "csv", location: "y.csv" },
            } } }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unsupported_update_mode_rejected_at_parse() {
        let result = Config::from_json5(
            r#"{ pipelines: { bad: {
                extractor: { kind: "file", format: "csv", location: "x.csv" },
                loader: {
                    kind: "file",
                    format: "csv",
                    location: "y.csv",
                    update_mode: "append",
                },
            } } }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_location_iter_order() {
        let location = Location::Many(vec!["a".into(), "b".into(), "c".into()]);
        let entries: Vec<&str> = location.iter().collect();
        assert_eq!(entries, vec!["a", "b", "c"]);
    }
}
