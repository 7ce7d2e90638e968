//! Pipeline orchestration
//!
//! A pipeline composes one extractor-capable connector, an optional
//! transformer, and one loader-capable connector into a three-stage run
//! with wall-clock timing. Runs are all-or-nothing: the first failing stage
//! aborts the run and its error is surfaced uncaught.

use super::{ConnectorRole, Extract, FileConnector, Load, Transformer};
use crate::config::{ConnectorConfig, PipelineConfig};
use crate::engine::Engine;
use eyre::Result;
use std::time::{Duration, Instant};

/// ETL pipeline: extract, optionally transform, load
///
/// # Example
/// ```no_run
/// use mallard::config::Config;
/// use mallard::engine::Engine;
/// use mallard::etl::Pipeline;
/// # use eyre::Result;
/// # fn example() -> Result<()> {
/// let engine = Engine::new()?;
/// let config = Config::load("mallard.json5")?;
/// for (name, pipeline_config) in config.pipelines {
///     let pipeline = Pipeline::from_config(&engine, pipeline_config)?;
///     let elapsed = pipeline.run()?;
///     log::info!("{} finished in {:.3}s", name, elapsed.as_secs_f64());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    extractor: Box<dyn Extract>,
    transformer: Option<Transformer>,
    loader: Box<dyn Load>,
}

impl Pipeline {
    /// Compose a pipeline from already-built stages
    pub fn new(
        extractor: Box<dyn Extract>,
        transformer: Option<Transformer>,
        loader: Box<dyn Load>,
    ) -> Self {
        Self {
            extractor,
            transformer,
            loader,
        }
    }

    /// Build all three stages from a pipeline config
    ///
    /// This is the factory point: each connector kind in the closed
    /// [`ConnectorConfig`] enum maps to one constructor, and the transformer
    /// spec is validated here, before any engine call.
    pub fn from_config(engine: &Engine, config: PipelineConfig) -> Result<Self> {
        let extractor: Box<dyn Extract> =
            Box::new(build_connector(engine, ConnectorRole::Extractor, &config.extractor)?);
        let transformer = config
            .transformer
            .map(|spec| Transformer::from_config(engine.clone(), spec))
            .transpose()?;
        let loader: Box<dyn Load> =
            Box::new(build_connector(engine, ConnectorRole::Loader, &config.loader)?);
        Ok(Self::new(extractor, transformer, loader))
    }

    /// Run extract → transform → load, timing the whole run
    ///
    /// # Errors
    /// The first error from any stage, unmodified. No stage-level recovery
    /// and no rollback of earlier stages' effects.
    pub fn run(&self) -> Result<Duration> {
        let started = Instant::now();

        log::debug!("extracting...");
        let records = self.extractor.extract()?;

        let records = match &self.transformer {
            Some(transformer) => {
                log::debug!("transforming...");
                transformer.apply(records)?
            }
            None => records,
        };

        log::debug!("loading...");
        self.loader.load(&records)?;

        let elapsed = started.elapsed();
        log::info!("Run complete in {:.3}s", elapsed.as_secs_f64());
        Ok(elapsed)
    }
}

/// Factory for the closed set of connector kinds
fn build_connector(
    engine: &Engine,
    role: ConnectorRole,
    config: &ConnectorConfig,
) -> Result<FileConnector> {
    match config {
        ConnectorConfig::File(endpoint) => FileConnector::new(engine.clone(), role, endpoint),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EndpointConfig, TransformerConfig};
    use crate::engine::Relation;
    use crate::etl::FileFormat;
    use std::io::Write;

    fn csv_fixture(dir: &std::path::Path) -> String {
        let path = dir.join("in.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"id,name\n1,ada\n2,grace\n3,edsger\n").unwrap();
        path.to_string_lossy().into_owned()
    }

    fn file_connector(config: EndpointConfig) -> ConnectorConfig {
        ConnectorConfig::File(config)
    }

    #[test]
    fn test_identity_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Engine::new().unwrap();
        let input = csv_fixture(dir.path());
        let output = dir.path().join("out.parquet").to_string_lossy().into_owned();

        let config = PipelineConfig {
            extractor: file_connector(EndpointConfig::new(FileFormat::Csv, input)),
            transformer: None,
            loader: file_connector(EndpointConfig::new(FileFormat::Parquet, output.clone())),
        };

        let pipeline = Pipeline::from_config(&engine, config).unwrap();
        pipeline.run().unwrap();

        assert!(std::path::Path::new(&output).exists());
    }

    #[test]
    fn test_function_transform_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Engine::new().unwrap();
        let input = csv_fixture(dir.path());
        let output = dir.path().join("out.csv").to_string_lossy().into_owned();

        let inner = engine.clone();
        let config = PipelineConfig {
            extractor: file_connector(EndpointConfig::new(FileFormat::Csv, input)),
            transformer: Some(TransformerConfig::function(Box::new(
                move |records: Relation| {
                    inner.query(&format!("select name from {} where id > 1", records.name()))
                },
            ))),
            loader: file_connector(EndpointConfig::new(FileFormat::Csv, output.clone())),
        };

        let pipeline = Pipeline::from_config(&engine, config).unwrap();
        pipeline.run().unwrap();

        let written = engine
            .query(&format!("select * from read_csv('{}')", output))
            .unwrap();
        assert_eq!(written.row_count().unwrap(), 2);
        assert_eq!(written.columns().unwrap(), vec!["name"]);
    }

    #[test]
    fn test_failing_extract_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Engine::new().unwrap();
        let output = dir.path().join("out.csv").to_string_lossy().into_owned();

        let config = PipelineConfig {
            extractor: file_connector(EndpointConfig::new(
                FileFormat::Csv,
                "no/such/input.csv",
            )),
            transformer: None,
            loader: file_connector(EndpointConfig::new(FileFormat::Csv, output.clone())),
        };

        let pipeline = Pipeline::from_config(&engine, config).unwrap();
        assert!(pipeline.run().is_err());
        assert!(!std::path::Path::new(&output).exists());
    }

    #[test]
    fn test_bad_transformer_config_fails_at_build() {
        let engine = Engine::new().unwrap();
        let config = PipelineConfig {
            extractor: file_connector(EndpointConfig::new(FileFormat::Csv, "in.csv")),
            transformer: Some(TransformerConfig::default()),
            loader: file_connector(EndpointConfig::new(FileFormat::Csv, "out.csv")),
        };
        assert!(Pipeline::from_config(&engine, config).is_err());
    }
}
