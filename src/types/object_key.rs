// ABOUTME: Object storage keys built from a key prefix and a local relative path.
// ABOUTME: Keys always use '/' separators regardless of the local platform.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::fmt;
use std::path::{Component, Path};
use thiserror::Error;

/// Characters RFC 1738 calls unsafe. Non-ASCII bytes are always encoded.
const CDN_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObjectKeyError {
    #[error("object key cannot be empty")]
    Empty,

    #[error("path is not valid UTF-8: {0}")]
    NonUtf8(String),

    #[error("path must stay below the source directory: {0}")]
    EscapesRoot(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Parse a literal key. Leading and repeated separators are dropped.
    pub fn new(key: &str) -> Result<Self, ObjectKeyError> {
        let segments = split_segments(key);
        if segments.is_empty() {
            return Err(ObjectKeyError::Empty);
        }
        Ok(Self(segments.join("/")))
    }

    /// Join `prefix` and a path relative to a local root.
    pub fn join(prefix: &str, relative: &Path) -> Result<Self, ObjectKeyError> {
        let mut segments = split_segments(prefix);

        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    let part = part.to_str().ok_or_else(|| {
                        ObjectKeyError::NonUtf8(relative.to_string_lossy().into_owned())
                    })?;
                    segments.push(part);
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(ObjectKeyError::EscapesRoot(
                        relative.to_string_lossy().into_owned(),
                    ));
                }
            }
        }

        if segments.len() == split_segments(prefix).len() {
            return Err(ObjectKeyError::Empty);
        }

        Ok(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of this object on a CDN in front of the bucket.
    ///
    /// Only unsafe and non-ASCII characters are percent-encoded. Reserved
    /// characters such as `@` or `+` stay literal, otherwise the path no
    /// longer names the cached object.
    pub fn cdn_path(&self) -> String {
        format!("/{}", utf8_percent_encode(&self.0, CDN_UNSAFE))
    }
}

fn split_segments(value: &str) -> Vec<&str> {
    value.split('/').filter(|s| !s.is_empty()).collect()
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
