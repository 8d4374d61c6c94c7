use std::io;

use http::{Method, StatusCode};

/// What the transport sends back for one request.
///
/// Every reply goes out as `Content-Type: text/html` with an exact
/// `Content-Length`, whatever the body holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl Reply {
    pub const CONTENT_TYPE: &'static str = "text/html";

    /// `200 OK` with `body`.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
        }
    }

    /// A reply with no body.
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }

    pub fn bad_request() -> Self {
        Self::empty(StatusCode::BAD_REQUEST)
    }

    pub fn not_found() -> Self {
        Self::empty(StatusCode::NOT_FOUND)
    }

    pub fn method_not_allowed() -> Self {
        Self::empty(StatusCode::METHOD_NOT_ALLOWED)
    }
}

/// One inbound request as the router sees it.
///
/// Implemented for the transport's request type; tests provide their own.
pub trait Exchange {
    /// The request method, or the raw token when it is not a valid method.
    fn method(&self) -> Result<Method, String>;

    /// The request target: path plus optional `?query`.
    fn target(&self) -> &str;

    /// Address of the peer, without the port.
    fn client(&self) -> String;

    /// Read the whole request body.
    fn read_body(&mut self) -> io::Result<Vec<u8>>;
}

/// Split a request target into its path and query string.
pub fn split_target(target: &str) -> (&str, &str) {
    match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    }
}
