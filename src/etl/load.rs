//! Load trait for persisting relations to a destination

use crate::engine::Relation;
use eyre::Result;

/// Load capability: write a relation to a configured destination
///
/// Persistence only happens here; the core never materializes intermediate
/// results itself. Atomicity is the implementor's concern; see
/// [`super::FileConnector`] for the new-file cleanup contract.
///
/// # Example
/// ```no_run
/// use mallard::engine::Relation;
/// use mallard::etl::Load;
/// use eyre::Result;
///
/// struct DiscardLoader;
///
/// impl Load for DiscardLoader {
///     fn load(&self, _records: &Relation) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait Load {
    /// Write the relation to the destination
    ///
    /// # Errors
    /// Returns an error if the engine rejects the write (I/O failure,
    /// credential failure, invalid options)
    fn load(&self, records: &Relation) -> Result<()>;
}
