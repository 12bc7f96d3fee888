// ABOUTME: Serverless function target name validation.
// ABOUTME: Accepts bare function names as well as full or partial ARNs.

use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 170;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FunctionNameError {
    #[error("function name cannot be empty")]
    Empty,

    #[error("function name exceeds maximum length of 170 characters")]
    TooLong,

    #[error("function name cannot contain whitespace")]
    Whitespace,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionName(String);

impl FunctionName {
    pub fn new(value: &str) -> Result<Self, FunctionNameError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(FunctionNameError::Empty);
        }

        if value.len() > MAX_LEN {
            return Err(FunctionNameError::TooLong);
        }

        if value.chars().any(char::is_whitespace) {
            return Err(FunctionNameError::Whitespace);
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
