// ABOUTME: Diagnostics accumulator for non-fatal warnings during a deploy run.
// ABOUTME: Collects warnings that shouldn't fail an invocation but should be shown to users.

use serde::Serialize;

/// Collects non-fatal warnings during deploy operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during a deploy run.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// A task definition with more than one container had only its first image replaced.
    pub fn multiple_containers(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::MultipleContainers,
            message: message.into(),
        }
    }

    /// A tag value was rewritten to satisfy the tag grammar.
    pub fn tag_sanitized(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::TagSanitized,
            message: message.into(),
        }
    }

    /// An invalidation batch exceeds what the CDN processes concurrently.
    pub fn invalidation_limit(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::InvalidationLimit,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a deploy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Only the first container definition received the new image.
    MultipleContainers,
    /// A build tag value was sanitized or truncated.
    TagSanitized,
    /// Invalidation path count is above the in-progress limit.
    InvalidationLimit,
}
