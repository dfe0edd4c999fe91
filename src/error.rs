//! Validation error types.
//!
//! Three kinds, all equally fatal: a spec either parses, type-checks and
//! cross-references cleanly, or the first violation found is returned.
//! There is no error aggregation; callers depend on first-error
//! determinism.

use std::fmt;
use thiserror::Error;

/// Coarse classification of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The payload is not parseable as JSON at all.
    MalformedInput,
    /// Structurally present but violates a type, cardinality,
    /// enumeration, or uniqueness rule.
    SchemaViolation,
    /// Structurally valid but refers to an entity that does not exist
    /// or has the wrong kind.
    SemanticViolation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedInput => write!(f, "malformed input"),
            ErrorKind::SchemaViolation => write!(f, "schema violation"),
            ErrorKind::SemanticViolation => write!(f, "semantic violation"),
        }
    }
}

/// Error produced by spec validation.
///
/// `context`, where present, names the offending entity: `node 'n0'`,
/// `link 'l0'`, or a positional `nodes[2]` before a name is known.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Not valid JSON; carries the underlying parser message.
    #[error("invalid JSON: {0}")]
    MalformedInput(String),

    #[error("schema violation: {message}")]
    SchemaViolation {
        message: String,
        context: Option<String>,
    },

    #[error("semantic violation: {message}")]
    SemanticViolation {
        message: String,
        context: Option<String>,
    },
}

impl ValidationError {
    pub fn malformed(err: impl fmt::Display) -> Self {
        Self::MalformedInput(err.to_string())
    }

    /// Schema violation with no single offending entity (top-level shape).
    pub fn schema(message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            message: message.into(),
            context: None,
        }
    }

    /// Schema violation inside a named or positional entity.
    pub fn schema_in(context: impl Into<String>, message: impl fmt::Display) -> Self {
        let context = context.into();
        Self::SchemaViolation {
            message: format!("{context}: {message}"),
            context: Some(context),
        }
    }

    /// Semantic violation inside a named entity.
    pub fn semantic_in(context: impl Into<String>, message: impl fmt::Display) -> Self {
        let context = context.into();
        Self::SemanticViolation {
            message: format!("{context}: {message}"),
            context: Some(context),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::SchemaViolation { .. } => ErrorKind::SchemaViolation,
            Self::SemanticViolation { .. } => ErrorKind::SemanticViolation,
        }
    }

    /// The offending entity, if one was identified.
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::MalformedInput(_) => None,
            Self::SchemaViolation { context, .. } | Self::SemanticViolation { context, .. } => {
                context.as_deref()
            }
        }
    }
}
