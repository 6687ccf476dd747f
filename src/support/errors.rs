use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid {what}: {reason}")]
    InvalidFormat { what: String, reason: String },

    #[error("Missing identifier for {entity}")]
    MissingIdentifier { entity: &'static str },

    #[error("Conflicting {entity} identifier: body has '{body}', route has '{route}'")]
    ConflictingIdentifier {
        entity: &'static str,
        body: String,
        route: String,
    },

    #[error("Invalid {child} in {entity}: {message}")]
    ChildParseFailure {
        entity: &'static str,
        child: String,
        message: String,
    },

    #[error("Patching the '{field}' property of a {entity} is not allowed")]
    ProtectedFieldViolation { entity: &'static str, field: String },

    #[error("Stale last_updated: {supplied} is not newer than {current}")]
    StaleTimestamp {
        current: DateTime<Utc>,
        supplied: DateTime<Utc>,
    },

    #[error("Validation: {}", .0.join("; "))]
    ValidationFailure(Vec<String>),
}

impl DomainError {
    pub fn invalid_format(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error came from a patch that was refused as a whole
    /// (as opposed to a document that could not be read at all).
    pub fn is_patch_rejection(&self) -> bool {
        matches!(
            self,
            Self::ProtectedFieldViolation { .. } | Self::StaleTimestamp { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
