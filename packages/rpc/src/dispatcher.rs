//! Turn POST bodies into store commands and responses.

use serde_json::Value;
use superstar_core_store::{Apply, Error};

use crate::envelope::{
    ErrorKind, Reply, Request, Response, RpcError, INTERNAL_ERROR, INVALID_PARAMS,
    METHOD_NOT_FOUND,
};

/// Handle a raw request body.
///
/// Never fails: every problem with the body or the call is reported inside
/// the returned envelope. A JSON array is a batch and yields one response
/// per element, in order.
pub fn handle_raw_request<S: Apply + ?Sized>(raw: &[u8], store: &mut S) -> Reply {
    let body = match serde_json::from_slice::<Value>(raw) {
        Ok(body) => body,
        Err(error) => {
            log::debug!("Unparsable RPC body: {}", error);
            return Reply::Single(Response::error(
                Value::Null,
                RpcError::parse_error(format!("Parse error: {}", error)),
            ));
        }
    };

    match body {
        Value::Array(calls) if calls.is_empty() => Reply::Single(Response::error(
            Value::Null,
            RpcError::invalid_request("Invalid Request: empty batch"),
        )),
        Value::Array(calls) => Reply::Batch(
            calls
                .into_iter()
                .map(|call| handle_value(call, store))
                .collect(),
        ),
        single => Reply::Single(handle_value(single, store)),
    }
}

/// Handle one decoded envelope.
pub fn handle_value<S: Apply + ?Sized>(value: Value, store: &mut S) -> Response {
    match request_from_value(value) {
        Ok(request) => dispatch_request(request, store),
        Err((id, error)) => Response::error(id, error),
    }
}

/// Run a well-formed request against the store.
pub fn dispatch_request<S: Apply + ?Sized>(request: Request, store: &mut S) -> Response {
    let Request {
        method, params, id, ..
    } = request;

    match store.apply(&method, params) {
        Ok(result) => Response::success(id, result),
        Err(error) => {
            log::warn!("RPC '{}' failed: {}", method, error);
            Response::error(id, rpc_error(&error))
        }
    }
}

/// Map a store error onto its wire code and kind.
pub fn rpc_error(error: &Error) -> RpcError {
    let (code, kind) = match error {
        Error::UnknownMethod { .. } => (METHOD_NOT_FOUND, ErrorKind::UnknownMethod),
        Error::InvalidParams { .. } | Error::InvalidPath { .. } | Error::Path(_) => {
            (INVALID_PARAMS, ErrorKind::InvalidParams)
        }
        Error::NotFound { .. } | Error::Other { .. } => {
            (INTERNAL_ERROR, ErrorKind::UnexpectedFailure)
        }
    };
    RpcError::new(code, kind, error.to_string())
}

/// Validate the envelope shape by hand so a bad envelope can still echo
/// its id.
fn request_from_value(value: Value) -> Result<Request, (Value, RpcError)> {
    let Value::Object(mut map) = value else {
        return Err((
            Value::Null,
            RpcError::invalid_request("Invalid Request: envelope must be an object"),
        ));
    };

    let id = map.remove("id").unwrap_or(Value::Null);
    let method = match map.remove("method") {
        Some(Value::String(method)) => method,
        Some(_) => {
            return Err((
                id,
                RpcError::invalid_request("Invalid Request: method must be a string"),
            ))
        }
        None => {
            return Err((
                id,
                RpcError::invalid_request("Invalid Request: missing method"),
            ))
        }
    };
    let jsonrpc = match map.remove("jsonrpc") {
        Some(Value::String(version)) => Some(version),
        _ => None,
    };

    Ok(Request {
        jsonrpc,
        method,
        params: map.remove("params").unwrap_or(Value::Null),
        id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{Outcome, INVALID_REQUEST, PARSE_ERROR};
    use serde_json::json;
    use superstar_json_store::DocumentStore;

    fn single(reply: Reply) -> Response {
        match reply {
            Reply::Single(response) => response,
            Reply::Batch(_) => panic!("expected a single response"),
        }
    }

    fn error_of(response: &Response) -> &RpcError {
        match &response.outcome {
            Outcome::Error(error) => error,
            Outcome::Result(result) => panic!("expected an error, got {result}"),
        }
    }

    #[test]
    fn set_then_get() {
        let mut store = DocumentStore::new();
        let set = single(handle_raw_request(
            br#"{"jsonrpc":"2.0","method":"set","params":{"path":"a/b","value":5},"id":1}"#,
            &mut store,
        ));
        assert_eq!(set, Response::success(json!(1), Value::Null));

        let get = single(handle_raw_request(
            br#"{"jsonrpc":"2.0","method":"get","params":{"path":"a"},"id":"two"}"#,
            &mut store,
        ));
        assert_eq!(get, Response::success(json!("two"), json!({"b": 5})));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let mut store = DocumentStore::new();
        let response = single(handle_raw_request(b"{not json", &mut store));
        let error = error_of(&response);
        assert_eq!(error.code, PARSE_ERROR);
        assert_eq!(error.kind, ErrorKind::MalformedRequest);
        assert_eq!(response.id, Value::Null);
    }

    #[test]
    fn envelope_without_method_echoes_id() {
        let mut store = DocumentStore::new();
        let response = single(handle_raw_request(br#"{"id":7,"params":{}}"#, &mut store));
        assert_eq!(error_of(&response).code, INVALID_REQUEST);
        assert_eq!(response.id, json!(7));

        let response = single(handle_raw_request(br#"{"method":3}"#, &mut store));
        assert_eq!(error_of(&response).code, INVALID_REQUEST);

        let response = single(handle_raw_request(b"\"get\"", &mut store));
        assert_eq!(error_of(&response).kind, ErrorKind::MalformedRequest);
    }

    #[test]
    fn unknown_method_and_bad_params() {
        let mut store = DocumentStore::with_data(json!({"name": "moose"}));

        let response = single(handle_raw_request(br#"{"method":"drop","id":1}"#, &mut store));
        let error = error_of(&response);
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert_eq!(error.kind, ErrorKind::UnknownMethod);

        let response = single(handle_raw_request(
            br#"{"method":"set","params":{"path":"name/first","value":1},"id":2}"#,
            &mut store,
        ));
        let error = error_of(&response);
        assert_eq!(error.code, INVALID_PARAMS);
        assert_eq!(error.kind, ErrorKind::InvalidParams);
        assert_eq!(store.root(), &json!({"name": "moose"}));
    }

    #[test]
    fn missing_id_echoes_null() {
        let mut store = DocumentStore::new();
        let response = single(handle_raw_request(br#"{"method":"sub"}"#, &mut store));
        assert_eq!(response, Response::success(Value::Null, json!([])));
    }

    #[test]
    fn batch_runs_in_order() {
        let mut store = DocumentStore::new();
        let body = json!([
            {"jsonrpc": "2.0", "method": "set", "params": {
                "path": "uaf/demo/pilot",
                "opts": "{\"value\":{\"power\":1}}",
                "auth": "",
            }, "id": 4},
            {"jsonrpc": "2.0", "method": "nope", "id": 5},
            {"jsonrpc": "2.0", "method": "get", "params": {"path": "uaf/demo/pilot/power"}, "id": 6},
        ]);

        let Reply::Batch(responses) =
            handle_raw_request(body.to_string().as_bytes(), &mut store)
        else {
            panic!("expected a batch reply");
        };
        assert_eq!(responses.len(), 3);
        assert!(responses[0].is_success());
        assert_eq!(error_of(&responses[1]).code, METHOD_NOT_FOUND);
        assert_eq!(responses[2], Response::success(json!(6), json!(1)));
    }

    #[test]
    fn empty_batch_is_invalid() {
        let mut store = DocumentStore::new();
        let response = single(handle_raw_request(b"[]", &mut store));
        assert_eq!(error_of(&response).code, INVALID_REQUEST);
    }

    struct FailingStore;

    impl Apply for FailingStore {
        fn apply(&mut self, _method: &str, _params: Value) -> Result<Value, Error> {
            Err(Error::Other {
                message: "disk on fire".to_string(),
            })
        }
    }

    #[test]
    fn other_failures_are_internal_errors() {
        let response = single(handle_raw_request(br#"{"method":"get","id":1}"#, &mut FailingStore));
        let error = error_of(&response);
        assert_eq!(error.code, INTERNAL_ERROR);
        assert_eq!(error.kind, ErrorKind::UnexpectedFailure);
        assert_eq!(error.message, "disk on fire");
    }
}
