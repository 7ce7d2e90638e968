//! Path-level storage helpers
//!
//! File reads and writes themselves go through the engine; this module only
//! handles path manipulation the engine does not do for us.

mod path;

pub use path::uniquify;
