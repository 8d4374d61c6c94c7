//! JSON-RPC for Superstar.
//!
//! POST bodies carry `{jsonrpc, method, params, id}` envelopes (or arrays of
//! them). [`handle_raw_request`] decodes a body, runs each call through
//! [`Apply`](superstar_core_store::Apply) and always produces a response
//! envelope, never a transport error.

pub mod dispatcher;
pub mod envelope;

pub use dispatcher::{dispatch_request, handle_raw_request, handle_value, rpc_error};
pub use envelope::{
    ErrorKind, Outcome, Reply, Request, Response, RpcError, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, JSONRPC_VERSION, METHOD_NOT_FOUND, PARSE_ERROR,
};
