//! Request classification.
//!
//! The router only decides what kind of request it is looking at; the
//! [`Service`](crate::Service) carries each kind out.

use http::Method;

/// Every request is exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    /// `GET` under the data prefix. Holds the still-encoded remainder of
    /// the path, empty for the prefix itself.
    PathQuery(&'a str),
    /// `POST` to any path.
    RpcCommand,
    /// Any other `GET`.
    DocumentFetch(&'a str),
    /// Anything else.
    Rejected,
}

/// Classify a request by method and URL path (no query string).
///
/// `prefix` is the data prefix without slashes, e.g. `superstar`. It
/// matches only as a whole segment: `/superstar`, `/superstar/` and
/// `/superstar/a/b` do, `/superstarx` does not.
pub fn classify<'a>(method: &Method, path: &'a str, prefix: &str) -> Route<'a> {
    if *method == Method::POST {
        return Route::RpcCommand;
    }
    if *method != Method::GET {
        return Route::Rejected;
    }

    match strip_data_prefix(path, prefix) {
        Some(rest) => Route::PathQuery(rest),
        None => Route::DocumentFetch(path),
    }
}

fn strip_data_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    let rest = trimmed.strip_prefix('/')?.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}
