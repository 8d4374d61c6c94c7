//! Slash-delimited paths into the document tree.

use std::fmt;

/// Longest path string accepted by [`Path::parse`], in bytes.
pub const MAX_PATH_BYTES: usize = 4096;

/// Errors related to path parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A path component could not be decoded.
    #[error("invalid path component '{component}' at position {position}: {message}")]
    InvalidComponent {
        component: String,
        position: usize,
        message: String,
    },
    /// The path string is invalid.
    #[error("invalid path: {message}")]
    InvalidPath { message: String },
}

/// An address into the document.
///
/// Components are arbitrary non-empty strings. A component that parses as a
/// decimal `usize` doubles as a sequence index when the tree is walked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    pub components: Vec<String>,
}

impl Path {
    /// The empty path, addressing the whole document.
    pub fn root() -> Self {
        Path::default()
    }

    /// Parse a path string.
    ///
    /// Empty components are dropped, so `/a//b/` and `a/b` are the same path.
    ///
    /// ```rust
    /// use superstar_core_store::Path;
    ///
    /// let path = Path::parse("uaf/demo/pilot").unwrap();
    /// assert_eq!(path.len(), 3);
    /// assert_eq!(Path::parse("uaf/demo/").unwrap(), Path::parse("/uaf/demo").unwrap());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        Self::validate_length(s)?;

        Ok(Path {
            components: s
                .split('/')
                .filter(|c| !c.is_empty())
                .map(str::to_owned)
                .collect(),
        })
    }

    /// Parse the path portion of a request URI, percent-decoding each segment.
    ///
    /// Decoding happens after splitting, so an encoded `%2F` stays inside its
    /// component instead of introducing a new level.
    pub fn from_uri(raw: &str) -> Result<Self, PathError> {
        Self::validate_length(raw)?;

        let mut components = Vec::new();
        for (position, segment) in raw.split('/').filter(|c| !c.is_empty()).enumerate() {
            let decoded =
                urlencoding::decode(segment).map_err(|e| PathError::InvalidComponent {
                    component: segment.to_string(),
                    position,
                    message: format!("not valid percent-encoded UTF-8: {}", e),
                })?;
            components.push(decoded.into_owned());
        }
        Ok(Path { components })
    }

    fn validate_length(s: &str) -> Result<(), PathError> {
        if s.len() > MAX_PATH_BYTES {
            return Err(PathError::InvalidPath {
                message: format!(
                    "path is {} bytes, longer than the {} byte limit",
                    s.len(),
                    MAX_PATH_BYTES
                ),
            });
        }
        Ok(())
    }

    /// Check if this path is empty (root path).
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Get the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Iterate over components.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.components.iter()
    }

    /// Split into the parent path and the last component.
    ///
    /// Returns `None` for the root path.
    pub fn split_last(&self) -> Option<(Path, &str)> {
        let (last, parent) = self.components.split_last()?;
        Some((
            Path {
                components: parent.to_vec(),
            },
            last.as_str(),
        ))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

/// Macro for creating paths from literals.
///
/// ```rust
/// use superstar_core_store::path;
///
/// let p = path!("uaf/demo/sensors");
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! path {
    ($s:expr) => {
        $crate::Path::parse($s).expect("invalid path literal")
    };
}
