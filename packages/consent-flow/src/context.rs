//! Workflow context threaded between steps.
//!
//! The context carries the identifiers minted by the API mid-scenario. Only
//! creation steps write to it; every later step reads through
//! [`WorkflowContext::require`], which fails with a precondition error if the
//! identifier was never stored. That check happens before any request is
//! built, so a misordered scenario never reaches the network.

use std::fmt;

use crate::error::{ConsentFlowError, Result};
use crate::steps::StepName;

/// Identifier slots held by the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextField {
    ConsentId,
    AuthorisationId,
}

impl ContextField {
    /// Field name as the API spells it in JSON bodies.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConsentId => "consentId",
            Self::AuthorisationId => "authorisationId",
        }
    }
}

impl fmt::Display for ContextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiers produced during a single scenario run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowContext {
    consent_id: Option<String>,
    authorisation_id: Option<String>,
}

impl WorkflowContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an identifier, replacing any previous value.
    pub fn set(&mut self, field: ContextField, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!(field = %field, value = %value, "Storing identifier");
        match field {
            ContextField::ConsentId => self.consent_id = Some(value),
            ContextField::AuthorisationId => self.authorisation_id = Some(value),
        }
    }

    /// Look up an identifier without failing.
    pub fn get(&self, field: ContextField) -> Option<&str> {
        match field {
            ContextField::ConsentId => self.consent_id.as_deref(),
            ContextField::AuthorisationId => self.authorisation_id.as_deref(),
        }
    }

    /// Look up an identifier that `step` depends on.
    ///
    /// # Returns
    /// * `Ok(value)` if an earlier step stored it
    /// * `Err(ConsentFlowError::Precondition)` otherwise
    pub fn require(&self, field: ContextField, step: StepName) -> Result<&str> {
        self.get(field)
            .ok_or(ConsentFlowError::Precondition { step, field })
    }

    /// Current consent identifier, if any.
    pub fn consent_id(&self) -> Option<&str> {
        self.get(ContextField::ConsentId)
    }

    /// Current authorisation identifier, if any.
    pub fn authorisation_id(&self) -> Option<&str> {
        self.get(ContextField::AuthorisationId)
    }
}
