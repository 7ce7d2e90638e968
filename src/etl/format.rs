//! Per-format read/write capability
//!
//! Each supported file format knows how to read a location into a relation
//! and write a relation out, so connectors compose a format instead of
//! branching on one. Reads go through the engine's `read_*` table functions;
//! writes go through `COPY ... TO`.

use crate::config::Location;
use crate::engine::{Engine, OptionValue, Options, Relation};
use eyre::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Json,
    Parquet,
}

/// Write policy for a loader endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Write to the configured location unchanged. No atomicity guarantee: a
    /// failed overwrite may leave the original truncated.
    #[default]
    Overwrite,
    /// Write to a uniquified variant of the location, never colliding with
    /// an existing file. Failed local writes are cleaned up.
    NewFile,
}

impl FileFormat {
    /// Read the location(s) into a relation, applying options verbatim
    pub fn read_relation(
        &self,
        engine: &Engine,
        location: &Location,
        options: &Options,
    ) -> Result<Relation> {
        let source = location_literal(location);
        let query = if options.is_empty() {
            format!("select * from {}({})", self.reader_function(), source)
        } else {
            format!(
                "select * from {}({}, {})",
                self.reader_function(),
                source,
                options.to_function_args()
            )
        };
        engine.query(&query)
    }

    /// Write a relation to the target location, applying options verbatim
    ///
    /// Writing accepts a single target only; location lists are a read-side
    /// capability of the engine.
    pub fn write_relation(
        &self,
        records: &Relation,
        target: &Location,
        options: &Options,
    ) -> Result<()> {
        let path = match target {
            Location::Single(path) => path,
            Location::Many(_) => bail!("writing to a list of locations is not supported"),
        };

        let mut copy_options = Options::new();
        copy_options.push("format", self.name());
        for (name, value) in options.iter() {
            copy_options.push(name, value.clone());
        }

        records.engine().execute(&format!(
            "copy (select * from {}) to {} ({});",
            records.name(),
            OptionValue::from(path.as_str()).argument_literal(),
            copy_options.to_copy_options()
        ))
    }

    fn reader_function(&self) -> &'static str {
        match self {
            FileFormat::Csv => "read_csv",
            FileFormat::Json => "read_json",
            FileFormat::Parquet => "read_parquet",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
            FileFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render a location as a path literal or list of path literals
fn location_literal(location: &Location) -> String {
    match location {
        Location::Single(path) => OptionValue::from(path.as_str()).argument_literal(),
        Location::Many(paths) => {
            let list = OptionValue::List(
                paths
                    .iter()
                    .map(|p| OptionValue::from(p.as_str()))
                    .collect(),
            );
            list.argument_literal()
        }
    }
}
