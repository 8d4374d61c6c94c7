//! The mutation vocabulary understood by [`DocumentStore::apply`].
//!
//! | method   | params                             | result                     |
//! |----------|------------------------------------|----------------------------|
//! | `get`    | `path`                             | node, or `null`            |
//! | `set`    | `path`, `value` or `opts`          | `null`                     |
//! | `sub`    | `path`                             | list of child keys         |
//! | `push`   | `path`, `value`, optional `length` | new sequence length        |
//! | `delete` | `path`                             | removed node, or `null`    |
//!
//! `path` defaults to the root. `opts` is the older client encoding of a
//! `set`: a string holding `{"value": <node>}` as JSON text.
//!
//! [`DocumentStore::apply`]: crate::DocumentStore::apply

use superstar_core_store::{Error, Map, Path, Value};

/// A parsed, validated store command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Get { path: Path },
    Set { path: Path, value: Value },
    Sub { path: Path },
    Push {
        path: Path,
        value: Value,
        length: Option<usize>,
    },
    Delete { path: Path },
}

impl Command {
    pub const METHODS: [&'static str; 5] = ["get", "set", "sub", "push", "delete"];

    /// Parse a method name and its params into a command.
    ///
    /// `params` may be absent (`null`) for verbs that only need a path.
    pub fn parse(method: &str, params: Value) -> Result<Command, Error> {
        if !Self::METHODS.contains(&method) {
            return Err(Error::UnknownMethod {
                method: method.to_string(),
            });
        }

        let params = Params::new(params)?;
        let path = params.path()?;

        Ok(match method {
            "get" => Command::Get { path },
            "sub" => Command::Sub { path },
            "delete" => Command::Delete { path },
            "set" => Command::Set {
                path,
                value: params.set_value()?,
            },
            "push" => Command::Push {
                path,
                value: params
                    .get("value")
                    .cloned()
                    .ok_or_else(|| Error::invalid_params("push requires a value"))?,
                length: params.length()?,
            },
            other => {
                return Err(Error::UnknownMethod {
                    method: other.to_string(),
                })
            }
        })
    }
}

/// The `params` object of a request.
struct Params(Map);

impl Params {
    fn new(params: Value) -> Result<Self, Error> {
        match params {
            Value::Null => Ok(Params(Map::new())),
            Value::Object(map) => Ok(Params(map)),
            other => Err(Error::invalid_params(format!(
                "params must be an object, got {}",
                kind_of(&other)
            ))),
        }
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn path(&self) -> Result<Path, Error> {
        match self.get("path") {
            None | Some(Value::Null) => Ok(Path::root()),
            Some(Value::String(s)) => Path::parse(s).map_err(|e| Error::invalid_params(e.to_string())),
            Some(other) => Err(Error::invalid_params(format!(
                "path must be a string, got {}",
                kind_of(other)
            ))),
        }
    }

    fn set_value(&self) -> Result<Value, Error> {
        if let Some(value) = self.get("value") {
            return Ok(value.clone());
        }

        let opts = match self.get("opts") {
            Some(Value::String(opts)) => opts,
            Some(other) => {
                return Err(Error::invalid_params(format!(
                    "opts must be a string, got {}",
                    kind_of(other)
                )))
            }
            None => return Err(Error::invalid_params("set requires a value or opts")),
        };

        let parsed: Value = serde_json::from_str(opts)
            .map_err(|e| Error::invalid_params(format!("opts is not valid JSON: {}", e)))?;
        match parsed {
            Value::Object(mut map) => map
                .remove("value")
                .ok_or_else(|| Error::invalid_params("opts has no value field")),
            other => Err(Error::invalid_params(format!(
                "opts must encode an object, got {}",
                kind_of(&other)
            ))),
        }
    }

    fn length(&self) -> Result<Option<usize>, Error> {
        match self.get("length") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| {
                    Error::invalid_params(format!("length must be a non-negative integer, got {}", n))
                }),
            Some(other) => Err(Error::invalid_params(format!(
                "length must be a number, got {}",
                kind_of(other)
            ))),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use superstar_core_store::path;

    #[test]
    fn unknown_method_rejected_before_params() {
        let err = Command::parse("frobnicate", json!(42)).unwrap_err();
        assert!(matches!(err, Error::UnknownMethod { method } if method == "frobnicate"));
    }

    #[test]
    fn missing_params_default_to_root() {
        assert_eq!(
            Command::parse("get", Value::Null).unwrap(),
            Command::Get { path: Path::root() }
        );
        assert_eq!(
            Command::parse("sub", json!({})).unwrap(),
            Command::Sub { path: Path::root() }
        );
    }

    #[test]
    fn set_with_value() {
        let cmd = Command::parse("set", json!({"path": "uaf/demo", "value": {"x": 1}})).unwrap();
        assert_eq!(
            cmd,
            Command::Set {
                path: path!("uaf/demo"),
                value: json!({"x": 1})
            }
        );
    }

    #[test]
    fn set_with_explicit_null_value() {
        let cmd = Command::parse("set", json!({"path": "a", "value": null})).unwrap();
        assert_eq!(
            cmd,
            Command::Set {
                path: path!("a"),
                value: Value::Null
            }
        );
    }

    #[test]
    fn set_with_legacy_opts() {
        let cmd = Command::parse(
            "set",
            json!({
                "path": "uaf/demo/pilot",
                "opts": "{\"value\":{\"power\":{\"L\":10,\"R\":-10}}}",
                "auth": "ignored",
            }),
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::Set {
                path: path!("uaf/demo/pilot"),
                value: json!({"power": {"L": 10, "R": -10}})
            }
        );
    }

    #[test]
    fn set_without_value_is_invalid() {
        for params in [
            json!({"path": "a"}),
            json!({"path": "a", "opts": "not json"}),
            json!({"path": "a", "opts": "[1]"}),
            json!({"path": "a", "opts": "{\"other\":1}"}),
            json!({"path": "a", "opts": 5}),
        ] {
            let err = Command::parse("set", params).unwrap_err();
            assert!(matches!(err, Error::InvalidParams { .. }), "{err}");
        }
    }

    #[test]
    fn non_object_params_are_invalid() {
        let err = Command::parse("get", json!(["a"])).unwrap_err();
        assert!(err.to_string().contains("params must be an object"));
    }

    #[test]
    fn non_string_path_is_invalid() {
        let err = Command::parse("get", json!({"path": 7})).unwrap_err();
        assert!(err.to_string().contains("path must be a string"));
    }

    #[test]
    fn push_length_validation() {
        let cmd = Command::parse("push", json!({"path": "log", "value": 1, "length": 3})).unwrap();
        assert_eq!(
            cmd,
            Command::Push {
                path: path!("log"),
                value: json!(1),
                length: Some(3)
            }
        );

        for bad in [json!(-1), json!(1.5), json!("3")] {
            let err =
                Command::parse("push", json!({"path": "log", "value": 1, "length": bad})).unwrap_err();
            assert!(matches!(err, Error::InvalidParams { .. }));
        }

        let err = Command::parse("push", json!({"path": "log"})).unwrap_err();
        assert!(err.to_string().contains("push requires a value"));
    }
}
