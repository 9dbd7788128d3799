//! Error types for bulmaform.
//!
//! Rendering failures are programming errors in the form definition (an association that
//! does not exist, a nested block registered twice) and surface at render time. The remaining
//! variants cover configuration, reading blueprint files and parsing them for the CLI.

use std::path::PathBuf;
use thiserror::Error;

use bulmaform_rows::RowError;

/// The main error type for bulmaform operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Rendering Errors ===
    /// A nested-fields block was registered twice for the same template.
    #[error("nested fields for '{association}' already registered (template '{template_id}')")]
    DuplicateNestedFields {
        /// Association name.
        association: String,
        /// Id of the template the block would have produced.
        template_id: String,
    },

    /// The record has no association of this name.
    #[error("unknown association '{association}' on '{object_name}'")]
    UnknownAssociation {
        /// Object name of the form builder.
        object_name: String,
        /// Association that was requested.
        association: String,
    },

    /// A delete button was requested outside of a nested row.
    #[error("delete row button requires a nested form builder (object '{object_name}')")]
    NotNested {
        /// Object name of the builder that was used.
        object_name: String,
    },

    /// A rendering block failed.
    #[error("render error: {0}")]
    Render(String),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Blueprint Errors ===
    /// A form blueprint is malformed.
    #[error("invalid blueprint: {message}")]
    InvalidBlueprint {
        /// Description of the problem.
        message: String,
    },

    /// A simulated interaction could not find its element.
    #[error("simulation failed: {0}")]
    Simulation(String),

    // === Row Errors ===
    /// A row behavior failed (simulation).
    #[error("row action failed: {0}")]
    Rows(#[from] RowError),

    // === I/O Errors ===
    /// Failed to read an input file.
    #[error("failed to read {path}: {source}")]
    FileRead {
        /// Path that couldn't be read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for bulmaform operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new render error.
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an unknown association error.
    #[must_use]
    pub fn unknown_association(
        object_name: impl Into<String>,
        association: impl Into<String>,
    ) -> Self {
        Self::UnknownAssociation {
            object_name: object_name.into(),
            association: association.into(),
        }
    }

    /// Create a duplicate nested fields error.
    #[must_use]
    pub fn duplicate_nested_fields(
        association: impl Into<String>,
        template_id: impl Into<String>,
    ) -> Self {
        Self::DuplicateNestedFields {
            association: association.into(),
            template_id: template_id.into(),
        }
    }

    /// Create an invalid blueprint error.
    #[must_use]
    pub fn invalid_blueprint(message: impl Into<String>) -> Self {
        Self::InvalidBlueprint {
            message: message.into(),
        }
    }

    /// Create a simulation error.
    #[must_use]
    pub fn simulation(message: impl Into<String>) -> Self {
        Self::Simulation(message.into())
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error is a mistake in the form definition.
    #[must_use]
    pub fn is_form_definition_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateNestedFields { .. }
                | Self::UnknownAssociation { .. }
                | Self::NotNested { .. }
        )
    }
}
