//! Error types for location and team administration

use std::path::PathBuf;
use thiserror::Error;

use crate::client::FhirError;
use crate::location::FieldError;

/// Main error type for administration operations
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Form input rejected by the validation rules
    #[error("Validation failed: {}", format_field_errors(.errors))]
    ValidationError { errors: Vec<FieldError> },

    /// Form or resource (de)serialization errors
    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    /// A referenced resource could not be found locally (e.g. a parent node)
    #[error("{resource_type} '{id}' not found")]
    NotFound { resource_type: String, id: String },

    /// Errors surfaced by the remote FHIR server or transport
    #[error(transparent)]
    Fhir(#[from] FhirError),
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
    Validation,
    Serialization,
    NotFound,
    Remote,
}

impl AdminError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::ConfigError { .. } => ErrorKind::Config,
            AdminError::IoError { .. } => ErrorKind::Io,
            AdminError::ValidationError { .. } => ErrorKind::Validation,
            AdminError::SerializationError { .. } => ErrorKind::Serialization,
            AdminError::NotFound { .. } => ErrorKind::NotFound,
            AdminError::Fhir(_) => ErrorKind::Remote,
        }
    }

    /// Whether the user can fix this by editing their input and retrying
    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::Serialization | ErrorKind::NotFound
        )
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization_error(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convert from std::io::Error
impl From<std::io::Error> for AdminError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_error(err.to_string())
    }
}
