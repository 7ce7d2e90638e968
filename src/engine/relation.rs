//! Opaque relation handles
//!
//! A relation is a uniquely named temporary view in the shared session.
//! Every extract or transform produces a new handle; the core never
//! materializes rows outside the engine.

use super::Engine;
use eyre::{Context, Result};

/// Opaque handle to a tabular result set in the engine
///
/// Immutable from the pipeline's perspective: transformations produce new
/// handles rather than mutating this one. Inspection re-executes the
/// underlying query, so treat `row_count` and `columns` as diagnostics, not
/// hot-path calls.
#[derive(Clone)]
pub struct Relation {
    engine: Engine,
    view: String,
}

impl Relation {
    pub(crate) fn new(engine: Engine, view: String) -> Self {
        Self { engine, view }
    }

    /// The engine-side view name; valid wherever a table reference is
    pub fn name(&self) -> &str {
        &self.view
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Number of rows the relation produces
    pub fn row_count(&self) -> Result<usize> {
        let count: i64 = self
            .engine
            .conn()
            .query_row(&format!("select count(*) from {}", self.view), [], |row| {
                row.get(0)
            })
            .with_context(|| format!("Failed to count rows of relation {}", self.view))?;
        Ok(count as usize)
    }

    /// Column names, in relation order
    pub fn columns(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .engine
            .conn()
            .prepare(&format!("describe {}", self.view))
            .with_context(|| format!("Failed to describe relation {}", self.view))?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_in_order() {
        let engine = Engine::new().unwrap();
        let records = engine
            .query("select 1 as zulu, 'x' as alpha, true as mike")
            .unwrap();
        assert_eq!(records.columns().unwrap(), vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_name_is_usable_in_queries() {
        let engine = Engine::new().unwrap();
        let records = engine.query("select 3 as n").unwrap();
        let squared = engine
            .query(&format!("select n * n as n from {}", records.name()))
            .unwrap();
        assert_eq!(squared.row_count().unwrap(), 1);
    }
}
