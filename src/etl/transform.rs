//! Query-mode and function-mode transforms
//!
//! A transformer applies either a declarative query (read from a file, with
//! optional named-value substitution) or a caller-supplied function to a
//! relation, producing a new relation. The two modes are mutually exclusive
//! and decided when the transformer is built; absence of a transformer is
//! the identity transform, handled by the pipeline.

use crate::config::TransformerConfig;
use crate::engine::{Engine, Options, Relation};
use crate::error::ConfigError;
use eyre::{Context, Result};
use std::path::PathBuf;

/// A caller-supplied transform; parameters are captured by the closure
pub type TransformFn = Box<dyn Fn(Relation) -> Result<Relation>>;

/// View name under which query text sees the pipeline's current relation
const INPUT_VIEW: &str = "records";

enum TransformSpec {
    Query {
        path: PathBuf,
        values: Option<Options>,
    },
    Function(TransformFn),
}

/// Applies a query or function to a relation
///
/// Query text refers to its input as the relation `records`:
///
/// ```sql
/// select vin, county, city from records where state = '{state}'
/// ```
///
/// Placeholders like `{state}` are substituted literally from the configured
/// values before execution. The substitution is textual, not parameterized
/// binding; callers are responsible for the safety of substituted values.
pub struct Transformer {
    engine: Engine,
    spec: TransformSpec,
}

impl Transformer {
    /// Build from a transformer config, validating eagerly
    ///
    /// # Errors
    /// [`ConfigError::AmbiguousTransformer`] when both a query path and a
    /// function are set, [`ConfigError::EmptyTransformer`] when neither is.
    pub fn from_config(engine: Engine, config: TransformerConfig) -> Result<Self> {
        let spec = match (config.query_path, config.function) {
            (Some(_), Some(_)) => return Err(ConfigError::AmbiguousTransformer.into()),
            (None, None) => return Err(ConfigError::EmptyTransformer.into()),
            (Some(path), None) => TransformSpec::Query {
                path,
                values: config.values,
            },
            (None, Some(function)) => TransformSpec::Function(function),
        };
        Ok(Self { engine, spec })
    }

    /// Apply the transform, producing a new relation
    pub fn apply(&self, records: Relation) -> Result<Relation> {
        match &self.spec {
            TransformSpec::Query { path, values } => {
                let mut query = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read query file: {}", path.display()))?;

                if let Some(values) = values {
                    for (name, value) in values.iter() {
                        query = query.replace(&format!("{{{}}}", name), &value.plain());
                    }
                }

                self.engine.register_view(INPUT_VIEW, &records)?;
                self.engine
                    .query(&query)
                    .with_context(|| format!("Transform query failed: {}", path.display()))
            }
            TransformSpec::Function(function) => function(records),
        }
    }
}
