//! Error types for the consent workflow.
//!
//! Workflow failures come in two flavours: a step ran before the step that
//! produces its identifier (`Precondition`), or the API answered with
//! something the scenario did not expect (`StepAssertion` and friends).
//! Transport and encoding errors are wrapped as-is.

use thiserror::Error;

use crate::context::ContextField;
use crate::steps::StepName;

/// Main error type for consent workflow operations.
#[derive(Debug, Error)]
pub enum ConsentFlowError {
    /// A step needed an identifier that no earlier step has stored.
    #[error("{step} requires {field}, but no earlier step stored it")]
    Precondition { step: StepName, field: ContextField },

    /// The API returned an unexpected status code.
    #[error("{step} expected HTTP {expected}, got HTTP {actual}")]
    StepAssertion {
        step: StepName,
        expected: u16,
        actual: u16,
    },

    /// A creation response carried neither a body field nor a Location header
    /// from which the new identifier could be read.
    #[error("{step} response did not contain {field}")]
    MissingIdentifier { step: StepName, field: ContextField },

    /// The consent returned by the API is not the one the scenario created.
    #[error("{step} returned consent '{actual}', expected '{expected}'")]
    ConsentMismatch {
        step: StepName,
        expected: String,
        actual: String,
    },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base URL is not an absolute http(s) URL.
    #[error("Invalid base URL: '{0}'. Expected an absolute http(s) URL (e.g., http://localhost:8080)")]
    InvalidBaseUrl(String),

    /// Number of path parameters does not match the template placeholders.
    #[error("URL template '{template}' has {placeholders} placeholder(s) but {params} parameter(s) were given")]
    TemplateMismatch {
        template: String,
        placeholders: usize,
        params: usize,
    },

    /// PSU identifier is empty or contains characters unsafe for a header.
    #[error("Invalid PSU ID: '{0}'")]
    InvalidPsuId(String),

    /// Unknown SCA approach name.
    #[error("Unknown SCA approach: '{0}'. Expected one of REDIRECT, EMBEDDED, DECOUPLED, OAUTH")]
    UnknownScaApproach(String),
}

impl ConsentFlowError {
    /// True for errors caused by misordered steps in the scenario itself.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }

    /// True for errors where the API under test misbehaved.
    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            Self::StepAssertion { .. }
                | Self::MissingIdentifier { .. }
                | Self::ConsentMismatch { .. }
        )
    }

    /// The step that failed, when the error is tied to one.
    pub fn step(&self) -> Option<StepName> {
        match self {
            Self::Precondition { step, .. }
            | Self::StepAssertion { step, .. }
            | Self::MissingIdentifier { step, .. }
            | Self::ConsentMismatch { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Result type alias for consent workflow operations.
pub type Result<T> = std::result::Result<T, ConsentFlowError>;
