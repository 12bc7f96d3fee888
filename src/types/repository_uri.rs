// ABOUTME: Container repository URI parsing and validation.
// ABOUTME: Accepts registry/name references without tag or digest, e.g. 123.ecr.aws/app.

use super::CommitId;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryUriError {
    #[error("repository uri cannot be empty")]
    Empty,

    #[error("invalid character in repository uri: {0}")]
    InvalidChar(char),

    #[error("repository uri must not carry a tag: {0}")]
    HasTag(String),

    #[error("repository uri must not carry a digest: {0}")]
    HasDigest(String),

    #[error("invalid repository uri format: {0}")]
    InvalidFormat(String),
}

/// A repository reference that images are tagged into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryUri {
    raw: String,
    registry: Option<String>,
    name: String,
}

impl RepositoryUri {
    pub fn parse(input: &str) -> Result<Self, RepositoryUriError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RepositoryUriError::Empty);
        }

        for c in input.chars() {
            if !c.is_ascii_alphanumeric()
                && c != '/'
                && c != ':'
                && c != '.'
                && c != '-'
                && c != '_'
                && c != '@'
            {
                return Err(RepositoryUriError::InvalidChar(c));
            }
        }

        if input.contains('@') {
            return Err(RepositoryUriError::HasDigest(input.to_string()));
        }

        // A colon after the last slash is a tag; before it, a registry port.
        if let Some((_, after)) = input.rsplit_once(':')
            && !after.contains('/')
        {
            return Err(RepositoryUriError::HasTag(input.to_string()));
        }

        if input.starts_with('/') || input.ends_with('/') || input.contains("//") {
            return Err(RepositoryUriError::InvalidFormat(input.to_string()));
        }

        let (registry, name) = match input.split_once('/') {
            Some((first, rest))
                if first.contains('.') || first.contains(':') || first == "localhost" =>
            {
                (Some(first.to_string()), rest.to_string())
            }
            _ => (None, input.to_string()),
        };

        Ok(Self {
            raw: input.to_string(),
            registry,
            name,
        })
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Image reference for a build of `commit`: `<uri>:<commit>`.
    pub fn image_for(&self, commit: &CommitId) -> String {
        format!("{}:{}", self.raw, commit)
    }
}

impl fmt::Display for RepositoryUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
