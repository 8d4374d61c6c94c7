//! Core traits: Reader, Writer, Apply.

use crate::{Error, Path, Value};

/// Read nodes from paths.
pub trait Reader {
    /// Read the node at a path.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - The path does not resolve.
    /// * `Ok(Some(value))` - A copy of the node at the path.
    /// * `Err(Error)` - An error occurred.
    fn read(&self, from: &Path) -> Result<Option<Value>, Error>;
}

/// Write nodes to paths.
///
/// Implementations must be all-or-nothing: when `write` or `remove` returns
/// an error the tree is unchanged.
pub trait Writer {
    /// Replace the node at `to`, creating intermediate mappings as needed.
    ///
    /// Returns the path that was written.
    fn write(&mut self, to: &Path, value: Value) -> Result<Path, Error>;

    /// Remove the node at `at`, returning it if it existed.
    fn remove(&mut self, at: &Path) -> Result<Option<Value>, Error>;
}

/// Named commands against a store.
///
/// This is the single mutation entry point used by the RPC layer. A method
/// outside the implementor's vocabulary is `Error::UnknownMethod`; params of
/// the wrong shape are `Error::InvalidParams`. Either way nothing changes.
pub trait Apply {
    fn apply(&mut self, method: &str, params: Value) -> Result<Value, Error>;
}
