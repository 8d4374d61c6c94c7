//! Superstar core store: paths, errors and the read/write traits shared by
//! every store implementation.
//!
//! - `Path`: slash-delimited address into the document
//! - `Value`: a node of the document (`serde_json::Value`, insertion ordered)
//! - `Reader` / `Writer`: path-addressed access to a tree of values
//! - `Apply`: named commands, the mutation surface exposed over RPC
//!
//! # Example
//!
//! ```rust
//! use superstar_core_store::{path, Reader, Value};
//!
//! fn pilot(store: &dyn Reader) -> Result<Option<Value>, superstar_core_store::Error> {
//!     store.read(&path!("uaf/demo/pilot"))
//! }
//! ```

mod error;
mod path;
mod traits;

pub use error::Error;
pub use path::{Path, PathError, MAX_PATH_BYTES};
pub use traits::{Apply, Reader, Writer};

/// A node of the document tree.
///
/// Mappings keep insertion order (`serde_json` is built with
/// `preserve_order`), so a document serializes the way it was assembled.
pub type Value = serde_json::Value;

/// A mapping node.
pub type Map = serde_json::Map<String, Value>;
