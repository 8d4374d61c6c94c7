//! The in-memory document store.

use superstar_core_store::{Apply, Error, Map, Path, Reader, Value, Writer};

use crate::command::Command;
use crate::snapshot::{SnapshotError, SnapshotFile};
use crate::value_utils;

/// The authoritative copy of the document.
///
/// Reads resolve paths against the tree; every mutation goes through
/// [`DocumentStore::apply`] (or the [`Writer`] impl it is built on) and is
/// all-or-nothing. An optional [`SnapshotFile`] backs [`load`] and [`save`].
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use superstar_json_store::DocumentStore;
/// use superstar_core_store::path;
///
/// let mut store = DocumentStore::new();
/// store.apply("set", json!({"path": "a/b", "value": 5})).unwrap();
///
/// assert_eq!(store.get(&path!("a/b")).unwrap(), &json!(5));
/// assert!(store.get(&path!("a/z")).unwrap_err().is_not_found());
/// ```
///
/// [`load`]: DocumentStore::load
/// [`save`]: DocumentStore::save
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: Value,
    snapshot: Option<SnapshotFile>,
}

impl DocumentStore {
    /// Create a store holding an empty mapping and no snapshot file.
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
            snapshot: None,
        }
    }

    /// Create a store with initial data.
    pub fn with_data(root: Value) -> Self {
        Self {
            root,
            snapshot: None,
        }
    }

    /// Create an empty store persisted to `snapshot`.
    ///
    /// Nothing is read until [`DocumentStore::load`] is called.
    pub fn with_snapshot(snapshot: SnapshotFile) -> Self {
        Self {
            root: Value::Object(Map::new()),
            snapshot: Some(snapshot),
        }
    }

    /// Get a reference to the root value.
    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn snapshot(&self) -> Option<&SnapshotFile> {
        self.snapshot.as_ref()
    }

    /// Resolve `path` against the document.
    ///
    /// The empty path returns the whole document. Anything that does not
    /// resolve is [`Error::NotFound`].
    pub fn get(&self, path: &Path) -> Result<&Value, Error> {
        value_utils::get_path(&self.root, path).ok_or_else(|| Error::NotFound { path: path.clone() })
    }

    /// Like [`DocumentStore::get`], with a miss folded into `null`.
    pub fn query(&self, path: &Path) -> Value {
        self.read(path).ok().flatten().unwrap_or(Value::Null)
    }

    /// Run one command from the mutation vocabulary (see [`crate::command`]).
    ///
    /// Unknown methods are [`Error::UnknownMethod`] and badly shaped params
    /// are [`Error::InvalidParams`]. On any error the document is unchanged.
    pub fn apply(&mut self, method: &str, params: Value) -> Result<Value, Error> {
        let command = Command::parse(method, params)?;
        self.execute(command)
    }

    /// Run an already parsed command.
    pub fn execute(&mut self, command: Command) -> Result<Value, Error> {
        log::debug!("Applying {:?}", command);

        match command {
            Command::Get { path } => Ok(self.query(&path)),
            Command::Sub { path } => Ok(Value::Array(
                value_utils::child_keys(&self.root, &path)
                    .into_iter()
                    .map(Value::String)
                    .collect(),
            )),
            Command::Set { path, value } => {
                self.write(&path, value).map_err(into_invalid_params)?;
                Ok(Value::Null)
            }
            Command::Push {
                path,
                value,
                length,
            } => {
                let len = value_utils::push_path(&mut self.root, &path, value, length)
                    .map_err(into_invalid_params)?;
                Ok(Value::from(len))
            }
            Command::Delete { path } => Ok(self.remove(&path)?.unwrap_or(Value::Null)),
        }
    }

    /// Replace the document with the snapshot's contents.
    ///
    /// Returns `Ok(false)` when there is no snapshot file configured or none
    /// on disk yet. On error the current document is kept as is.
    pub fn load(&mut self) -> Result<bool, SnapshotError> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(false);
        };

        match snapshot.read()? {
            Some(root) => {
                self.root = root;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Write the document to the snapshot file, replacing its contents.
    ///
    /// Returns `Ok(false)` when there is no snapshot file configured.
    pub fn save(&self) -> Result<bool, SnapshotError> {
        match &self.snapshot {
            Some(snapshot) => {
                snapshot.write(&self.root)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Path errors raised while applying a command are the caller's params at
/// fault, so they surface as `InvalidParams`.
fn into_invalid_params(error: Error) -> Error {
    match error {
        Error::InvalidPath { message } => Error::InvalidParams { message },
        Error::Path(e) => Error::invalid_params(e.to_string()),
        other => other,
    }
}

impl Apply for DocumentStore {
    fn apply(&mut self, method: &str, params: Value) -> Result<Value, Error> {
        DocumentStore::apply(self, method, params)
    }
}

impl Reader for DocumentStore {
    fn read(&self, from: &Path) -> Result<Option<Value>, Error> {
        Ok(value_utils::get_path(&self.root, from).cloned())
    }
}

impl Writer for DocumentStore {
    fn write(&mut self, to: &Path, value: Value) -> Result<Path, Error> {
        value_utils::set_path(&mut self.root, to, value)?;
        Ok(to.clone())
    }

    fn remove(&mut self, at: &Path) -> Result<Option<Value>, Error> {
        Ok(value_utils::remove_path(&mut self.root, at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use superstar_core_store::path;

    fn serialized(store: &DocumentStore) -> String {
        serde_json::to_string(store.root()).unwrap()
    }

    #[test]
    fn starts_as_empty_map() {
        let store = DocumentStore::new();
        assert_eq!(store.get(&path!("")).unwrap(), &json!({}));
    }

    #[test]
    fn get_resolves_paths() {
        let store = DocumentStore::with_data(json!({"a": {"b": 5}}));
        assert_eq!(store.get(&path!("a/b")).unwrap(), &json!(5));
        assert_eq!(store.get(&path!("")).unwrap(), &json!({"a": {"b": 5}}));

        let err = store.get(&path!("a/z")).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.query(&path!("a/z")), Value::Null);
        assert_eq!(store.query(&path!("a/b/c")), Value::Null);
    }

    #[test]
    fn apply_set_then_get() {
        let mut store = DocumentStore::new();
        let result = store
            .apply("set", json!({"path": "uaf/demo/pilot", "value": {"power": 1}}))
            .unwrap();
        assert_eq!(result, Value::Null);
        assert_eq!(
            store.apply("get", json!({"path": "uaf/demo"})).unwrap(),
            json!({"pilot": {"power": 1}})
        );
        assert_eq!(store.apply("get", json!({"path": "nope"})).unwrap(), Value::Null);
    }

    #[test]
    fn apply_sub_lists_children() {
        let mut store = DocumentStore::new();
        store.apply("set", json!({"path": "uaf/b", "value": 1})).unwrap();
        store.apply("set", json!({"path": "uaf/a", "value": 2})).unwrap();
        store.apply("set", json!({"path": "cmu/x", "value": 3})).unwrap();

        assert_eq!(store.apply("sub", json!({"path": ""})).unwrap(), json!(["uaf", "cmu"]));
        assert_eq!(store.apply("sub", json!({"path": "uaf"})).unwrap(), json!(["b", "a"]));
        assert_eq!(store.apply("sub", json!({"path": "zzz"})).unwrap(), json!([]));
    }

    #[test]
    fn apply_push_and_delete() {
        let mut store = DocumentStore::new();
        for i in 0..5 {
            store
                .apply("push", json!({"path": "chat", "value": i, "length": 3}))
                .unwrap();
        }
        assert_eq!(store.get(&path!("chat")).unwrap(), &json!([2, 3, 4]));

        assert_eq!(store.apply("delete", json!({"path": "chat/0"})).unwrap(), json!(2));
        assert_eq!(store.apply("delete", json!({"path": "chat/9"})).unwrap(), Value::Null);
        assert_eq!(store.get(&path!("chat")).unwrap(), &json!([3, 4]));
    }

    #[test]
    fn unknown_method_leaves_document_unchanged() {
        let mut store = DocumentStore::with_data(json!({"a": 1}));
        let before = serialized(&store);
        let err = store.apply("drop_tables", json!({})).unwrap_err();
        assert!(matches!(err, Error::UnknownMethod { .. }));
        assert_eq!(serialized(&store), before);
    }

    #[test]
    fn invalid_params_leave_document_byte_identical() {
        let mut store = DocumentStore::with_data(json!({
            "name": "moose",
            "list": [1, 2],
            "nested": {"k": "v"},
        }));
        let before = serialized(&store);

        for (method, params) in [
            ("set", json!({"path": "name/first", "value": 1})),
            ("set", json!({"path": "list/5", "value": 1})),
            ("set", json!({"path": "list/x/y", "value": 1})),
            ("set", json!({"path": "nested/k"})),
            ("push", json!({"path": "nested", "value": 1})),
            ("push", json!({"path": "name/x", "value": 1})),
            ("delete", json!({"path": 3})),
            ("get", json!("nested")),
        ] {
            let err = store.apply(method, params).unwrap_err();
            assert!(
                matches!(err, Error::InvalidParams { .. }),
                "{method}: unexpected {err:?}"
            );
            assert_eq!(serialized(&store), before, "{method} mutated the document");
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = SnapshotFile::new(dir.path().join("db.json"));

        let mut store = DocumentStore::with_snapshot(snapshot.clone());
        store.apply("set", json!({"path": "z", "value": [1, {"b": 2.5}]})).unwrap();
        store.apply("set", json!({"path": "a", "value": null})).unwrap();
        assert!(store.save().unwrap());

        let mut restored = DocumentStore::with_snapshot(snapshot);
        assert!(restored.load().unwrap());
        assert_eq!(serialized(&restored), serialized(&store));
    }

    #[test]
    fn deep_paths_survive_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = SnapshotFile::new(dir.path().join("db.json"));
        let deep = vec!["k"; 200].join("/");

        let mut store = DocumentStore::with_snapshot(snapshot.clone());
        store.apply("set", json!({"path": &deep, "value": 1})).unwrap();
        assert!(store.save().unwrap());

        let mut restored = DocumentStore::with_snapshot(snapshot);
        assert!(restored.load().unwrap());
        assert_eq!(restored.query(&Path::parse(&deep).unwrap()), json!(1));
        assert_eq!(serialized(&restored), serialized(&store));
    }

    #[test]
    fn load_without_snapshot_file_keeps_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DocumentStore::with_snapshot(SnapshotFile::new(dir.path().join("db.json")));
        assert!(!store.load().unwrap());
        assert_eq!(store.root(), &json!({}));
    }

    #[test]
    fn load_of_garbage_keeps_current_document() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("db.json");
        std::fs::write(&file_path, "definitely not json").unwrap();

        let mut store = DocumentStore::with_snapshot(SnapshotFile::new(file_path));
        assert!(store.load().is_err());
        assert_eq!(store.root(), &json!({}));
    }

    #[test]
    fn in_memory_store_has_nothing_to_persist() {
        let mut store = DocumentStore::new();
        assert!(!store.save().unwrap());
        assert!(!store.load().unwrap());
    }
}
