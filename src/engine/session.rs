//! DuckDB session wrapper
//!
//! One `Engine` owns one in-process DuckDB connection. Every component in a
//! pipeline run shares the same session so that temporary views and
//! temporary secrets are visible across stages. The engine itself is treated
//! as an opaque capability: read, write, query, and secret calls are all SQL
//! text issued through here.

use super::Relation;
use eyre::{Context, Result};
use std::cell::Cell;
use std::rc::Rc;

/// Shared handle to an in-memory DuckDB session
///
/// Cloning is cheap and yields a handle to the same session. Pipeline
/// execution is single-threaded, so the connection is shared with `Rc`
/// rather than a lock.
///
/// # Example
/// ```no_run
/// use mallard::engine::Engine;
/// # use eyre::Result;
/// # fn example() -> Result<()> {
/// let engine = Engine::new()?;
/// let records = engine.query("select 1 as id, 'a' as name")?;
/// assert_eq!(records.row_count()?, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Engine {
    inner: Rc<EngineInner>,
}

struct EngineInner {
    conn: duckdb::Connection,
    next_view: Cell<u64>,
}

impl Engine {
    /// Open a fresh in-memory session
    pub fn new() -> Result<Self> {
        let conn =
            duckdb::Connection::open_in_memory().context("Failed to open DuckDB session")?;
        Ok(Self {
            inner: Rc::new(EngineInner {
                conn,
                next_view: Cell::new(0),
            }),
        })
    }

    /// Execute SQL for its side effects (secret declarations, COPY, DDL)
    pub fn execute(&self, sql: &str) -> Result<()> {
        self.inner
            .conn
            .execute_batch(sql)
            .with_context(|| format!("Engine rejected statement: {}", sql))
    }

    /// Execute query text, yielding a relation
    ///
    /// The query is registered as a freshly named temporary view; the
    /// returned [`Relation`] is an opaque handle to it. Nothing is
    /// materialized until the relation is written or inspected.
    pub fn query(&self, sql: &str) -> Result<Relation> {
        let view = self.fresh_view_name();
        let body = sql.trim().trim_end_matches(';').trim_end();
        self.inner
            .conn
            .execute_batch(&format!(
                "create or replace temporary view {} as ({})",
                view, body
            ))
            .with_context(|| format!("Engine rejected query: {}", body))?;
        Ok(Relation::new(self.clone(), view))
    }

    /// Re-register an existing relation under a caller-chosen view name
    ///
    /// Used by query-mode transforms to expose the pipeline's current
    /// relation to external query text under a stable name.
    pub fn register_view(&self, name: &str, relation: &Relation) -> Result<()> {
        self.execute(&format!(
            "create or replace temporary view {} as (select * from {})",
            name,
            relation.name()
        ))
    }

    pub(crate) fn conn(&self) -> &duckdb::Connection {
        &self.inner.conn
    }

    fn fresh_view_name(&self) -> String {
        let id = self.inner.next_view.get();
        self.inner.next_view.set(id + 1);
        format!("mallard_rel_{}", id)
    }
}
