//! CLI helper functions

use crate::config::Config;
use crate::engine::{Engine, SecretStore};
use crate::error::ConfigError;
use crate::etl::Pipeline;
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::Path;

/// Run configured pipelines, in config order
///
/// When `names` is empty every pipeline runs; otherwise only the named ones,
/// in the order given. Configured secrets are created up front and dropped
/// after the last pipeline, whether or not a run failed.
pub fn run_pipelines(config: Config, names: &[String]) -> Result<()> {
    let engine = Engine::new()?;
    let secrets = SecretStore::new(engine.clone(), config.secrets.clone());
    secrets.create_all()?;

    let result = run_selected(&engine, config, names);

    // best effort: secret bundles are session-scoped anyway
    if let Err(err) = secrets.drop_all() {
        log::warn!("Failed to drop secrets: {}", err);
    }

    result
}

fn run_selected(engine: &Engine, config: Config, names: &[String]) -> Result<()> {
    let mut pipelines = config.pipelines;

    let selected = if names.is_empty() {
        pipelines
    } else {
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let index = pipelines
                .iter()
                .position(|(key, _)| key == name)
                .ok_or_else(|| ConfigError::UnknownPipeline(name.clone()))?;
            selected.push(pipelines.remove(index));
        }
        selected
    };

    for (name, pipeline_config) in selected {
        log::info!("Running pipeline {}", name.cyan());
        let pipeline = Pipeline::from_config(engine, pipeline_config)?;
        let elapsed = pipeline.run()?;
        log::info!(
            "✓ Pipeline {} finished in {}",
            name.cyan(),
            format!("{:.3}s", elapsed.as_secs_f64()).bright_black()
        );
    }

    Ok(())
}

/// Parse a config file and construct everything without running anything
///
/// Catches unsupported formats and update modes, malformed transformer
/// specs, empty or mixed-backend locations, and unreadable files.
pub fn validate_config(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let config = Config::load(path)?;
    let engine = Engine::new()?;

    let pipeline_count = config.pipelines.len();
    for (name, pipeline_config) in config.pipelines {
        Pipeline::from_config(&engine, pipeline_config)
            .map_err(|err| err.wrap_err(format!("pipeline \"{}\" is invalid", name)))?;
        log::debug!("pipeline {} ok", name);
    }

    log::info!(
        "✓ {} valid: {} pipeline(s), {} secret(s)",
        path.display(),
        pipeline_count,
        config.secrets.iter().count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_unknown_pipeline_name() {
        let config = Config::from_json5("{}").unwrap();
        let err = run_pipelines(config, &["nope".to_string()]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnknownPipeline(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_run_all_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let mut file = std::fs::File::create(&input).unwrap();
        file.write_all(b"id,name\n1,ada\n2,grace\n").unwrap();
        let output = dir.path().join("out.parquet");

        let config = Config::from_json5(&format!(
            r#"{{ pipelines: {{ copy: {{
                extractor: {{ kind: "file", format: "csv", location: "{}" }},
                loader: {{ kind: "file", format: "parquet", location: "{}" }},
            }} }} }}"#,
            input.display(),
            output.display()
        ))
        .unwrap();

        run_pipelines(config, &[]).unwrap();
        assert!(output.exists());
    }
}
