//! Static files served from the document root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::RequestError;
use crate::types::Reply;

const INDEX_FILE: &str = "index.html";

/// Serves any GET outside the data prefix.
///
/// No directory listings: a directory serves its `index.html` or nothing.
/// Paths with a `..` segment are refused.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve the document at a URL path (query already removed).
    ///
    /// Missing files are a 404 reply; other I/O failures are errors.
    pub fn fetch(&self, url_path: &str) -> Result<Reply, RequestError> {
        let Some(mut file) = self.resolve(url_path) else {
            return Ok(Reply::not_found());
        };

        if file.is_dir() {
            file.push(INDEX_FILE);
        }

        if !file.is_file() {
            log::debug!("No document at {}", file.display());
            return Ok(Reply::not_found());
        }

        match fs::read(&file) {
            Ok(body) => Ok(Reply::ok(body)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Reply::not_found()),
            Err(e) => Err(RequestError::Document(e)),
        }
    }

    fn resolve(&self, url_path: &str) -> Option<PathBuf> {
        let mut file = self.root.clone();
        for segment in url_path.split('/').filter(|s| !s.is_empty()) {
            let segment = urlencoding::decode(segment).ok()?;
            let unsafe_char = |c: char| matches!(c, '/' | '\\' | '\0');
            if segment == ".." || segment == "." || segment.contains(unsafe_char) {
                return None;
            }
            file.push(&*segment);
        }
        Some(file)
    }
}
