// ABOUTME: Validated commit identifier used as image tag and artifact key suffix.
// ABOUTME: Enforces the container image tag grammar so the derived image is always valid.

use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommitIdError {
    #[error("commit id cannot be empty")]
    Empty,

    #[error("commit id exceeds maximum length of 128 characters")]
    TooLong,

    #[error("commit id cannot start with '{0}'")]
    InvalidStart(char),

    #[error("invalid character in commit id: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(value: &str) -> Result<Self, CommitIdError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CommitIdError::Empty);
        }

        if value.len() > MAX_LEN {
            return Err(CommitIdError::TooLong);
        }

        if let Some(first) = value.chars().next()
            && (first == '.' || first == '-')
        {
            return Err(CommitIdError::InvalidStart(first));
        }

        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && c != '_' && c != '.' && c != '-' {
                return Err(CommitIdError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
