//! Utilities for navigating and modifying document trees.
//!
//! Every mutating function here checks the whole path before it touches the
//! tree, so an `Err` always leaves the tree exactly as it was.

use superstar_core_store::{Error, Map, Path, Value};

/// Parse a component as a sequence index.
fn parse_index(component: &str) -> Option<usize> {
    // "+1" and "01" parse as usize but are not indices a client would write.
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if component.len() > 1 && component.starts_with('0') {
        return None;
    }
    component.parse().ok()
}

/// Get a reference to a sub-tree at the given path.
///
/// Returns `None` for a missing key, an out-of-range or non-numeric sequence
/// index, or an attempt to descend through a scalar.
pub fn get_path<'a>(tree: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut cursor = tree;
    for component in path.iter() {
        cursor = match cursor {
            Value::Object(map) => map.get(component.as_str())?,
            Value::Array(arr) => arr.get(parse_index(component)?)?,
            _ => return None,
        };
    }
    Some(cursor)
}

/// Get a mutable reference to a sub-tree at the given path.
pub fn get_path_mut<'a>(tree: &'a mut Value, path: &Path) -> Option<&'a mut Value> {
    let mut cursor = tree;
    for component in path.iter() {
        cursor = match cursor {
            Value::Object(map) => map.get_mut(component.as_str())?,
            Value::Array(arr) => arr.get_mut(parse_index(component)?)?,
            _ => return None,
        };
    }
    Some(cursor)
}

/// Check that `set_path(tree, path, _)` would succeed, without mutating.
///
/// Walks existing nodes only. The first missing key (or a `null` node) means
/// the rest of the path will be freshly created maps, which cannot fail.
pub fn check_settable(tree: &Value, path: &Path) -> Result<(), Error> {
    let mut cursor = tree;
    for (i, component) in path.iter().enumerate() {
        let is_last = i + 1 == path.len();
        cursor = match cursor {
            Value::Object(map) => match map.get(component.as_str()) {
                Some(next) => next,
                None => return Ok(()),
            },
            Value::Array(arr) => {
                let index = parse_index(component).ok_or_else(|| {
                    Error::invalid_path(format!(
                        "'{}' at position {} is not a sequence index",
                        component, i
                    ))
                })?;
                if is_last && index <= arr.len() {
                    return Ok(());
                }
                arr.get(index).ok_or_else(|| {
                    Error::invalid_path(format!(
                        "sequence index {} out of bounds (len={}) at position {}",
                        index,
                        arr.len(),
                        i
                    ))
                })?
            }
            Value::Null => return Ok(()),
            _ => {
                return Err(Error::invalid_path(format!(
                    "cannot descend through scalar at '{}' (position {})",
                    component, i
                )))
            }
        };
    }
    Ok(())
}

/// Set a value at the given path.
///
/// Missing keys along the way become empty maps, as do `null` nodes. A
/// sequence accepts an index equal to its length as an append.
pub fn set_path(tree: &mut Value, path: &Path, value: Value) -> Result<(), Error> {
    check_settable(tree, path)?;

    let Some((parent_path, last)) = path.split_last() else {
        *tree = value;
        return Ok(());
    };

    let mut cursor = tree;
    for component in parent_path.iter() {
        if cursor.is_null() {
            *cursor = Value::Object(Map::new());
        }
        cursor = match cursor {
            Value::Object(map) => map
                .entry(component.clone())
                .or_insert_with(|| Value::Object(Map::new())),
            Value::Array(arr) => {
                let index = parse_index(component)
                    .ok_or_else(|| Error::invalid_path("not a sequence index"))?;
                arr.get_mut(index)
                    .ok_or_else(|| Error::invalid_path("sequence index out of bounds"))?
            }
            _ => return Err(Error::invalid_path("cannot descend through scalar")),
        };
    }

    set_child(cursor, last, value)
}

/// Set a child value on a map or sequence.
fn set_child(parent: &mut Value, key: &str, value: Value) -> Result<(), Error> {
    if parent.is_null() {
        *parent = Value::Object(Map::new());
    }
    match parent {
        Value::Object(map) => {
            map.insert(key.to_string(), value);
            Ok(())
        }
        Value::Array(arr) => {
            let index = parse_index(key)
                .ok_or_else(|| Error::invalid_path(format!("'{}' is not a sequence index", key)))?;
            if index < arr.len() {
                arr[index] = value;
            } else if index == arr.len() {
                arr.push(value);
            } else {
                return Err(Error::invalid_path(format!(
                    "sequence index {} out of bounds (len={})",
                    index,
                    arr.len()
                )));
            }
            Ok(())
        }
        _ => Err(Error::invalid_path(format!(
            "cannot set child '{}' on scalar value",
            key
        ))),
    }
}

/// Remove a value at a path, returning it if it existed.
///
/// Removing the root leaves an empty mapping behind.
pub fn remove_path(tree: &mut Value, path: &Path) -> Option<Value> {
    let Some((parent_path, last)) = path.split_last() else {
        return Some(std::mem::replace(tree, Value::Object(Map::new())));
    };

    match get_path_mut(tree, &parent_path)? {
        Value::Object(map) => map.shift_remove(last),
        Value::Array(arr) => {
            let index = parse_index(last)?;
            (index < arr.len()).then(|| arr.remove(index))
        }
        _ => None,
    }
}

/// Child keys of the node at `path`.
///
/// Mappings list their keys in insertion order, sequences list their
/// indices, and scalars or missing nodes have no children.
pub fn child_keys(tree: &Value, path: &Path) -> Vec<String> {
    match get_path(tree, path) {
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        Some(Value::Array(arr)) => (0..arr.len()).map(|i| i.to_string()).collect(),
        _ => Vec::new(),
    }
}

/// Append `value` to the sequence at `path`, creating it when absent.
///
/// With `keep`, only the last `keep` entries survive. Returns the new length.
pub fn push_path(
    tree: &mut Value,
    path: &Path,
    value: Value,
    keep: Option<usize>,
) -> Result<usize, Error> {
    match get_path_mut(tree, path) {
        Some(Value::Array(arr)) => {
            arr.push(value);
            if let Some(keep) = keep {
                let excess = arr.len().saturating_sub(keep);
                arr.drain(..excess);
            }
            Ok(arr.len())
        }
        Some(Value::Null) | None => {
            let fresh = match keep {
                Some(0) => Vec::new(),
                _ => vec![value],
            };
            let len = fresh.len();
            set_path(tree, path, Value::Array(fresh))?;
            Ok(len)
        }
        Some(_) => Err(Error::invalid_path(format!(
            "cannot push onto '{}': existing node is not a sequence",
            path
        ))),
    }
}
