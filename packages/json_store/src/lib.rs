//! JSON document store for Superstar: the in-memory tree, the mutation
//! vocabulary applied to it, and the snapshot file that persists it.

pub mod command;
pub mod in_memory;
pub mod snapshot;
pub mod value_utils;

pub use superstar_core_store::{path, Error, Path, PathError, Value};

pub use command::Command;
pub use in_memory::DocumentStore;
pub use snapshot::{SnapshotError, SnapshotFile};
