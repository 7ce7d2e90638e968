//! Extract trait for producing relations from a source

use crate::engine::Relation;
use eyre::Result;

/// Extract capability: read a configured source into a relation
///
/// Implementors bind one endpoint (format, location, options) and produce an
/// opaque relation handle on demand. Extraction is synchronous and
/// unretried; failures propagate to the pipeline.
///
/// # Example
/// ```no_run
/// use mallard::engine::{Engine, Relation};
/// use mallard::etl::Extract;
/// use eyre::Result;
///
/// struct InlineExtractor {
///     engine: Engine,
/// }
///
/// impl Extract for InlineExtractor {
///     fn extract(&self) -> Result<Relation> {
///         self.engine.query("select 1 as id")
///     }
/// }
/// ```
pub trait Extract {
    /// Read the source, returning a relation
    ///
    /// # Errors
    /// Returns an error if the engine rejects the read (missing file,
    /// credential failure, malformed data)
    fn extract(&self) -> Result<Relation>;
}
