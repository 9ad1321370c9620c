//! Step executors for the consent authorisation flow.
//!
//! Steps are grouped the way the scenario reads:
//!
//! - [`given`]: create the consent and its authorisation
//! - [`when`]: authenticate the PSU and confirm
//! - [`then`]: read back consent status and object
//!
//! Each executor issues exactly one request. Identifiers it depends on are
//! read from the [`WorkflowContext`](crate::context::WorkflowContext) before
//! the request is built.

pub mod given;
pub mod then;
pub mod when;

use std::fmt;

use serde_json::Value;

use crate::context::ContextField;
use crate::error::{ConsentFlowError, Result};
use crate::http::{ApiRequest, ApiResponse, HttpClient};

/// HTTP 200 OK.
pub const STATUS_OK: u16 = 200;

/// HTTP 201 Created.
pub const STATUS_CREATED: u16 = 201;

/// Scenario phase a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Given,
    When,
    Then,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
        })
    }
}

/// The steps of the consent authorisation flow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepName {
    CreateGlobalConsent,
    CreateAuthorizationRedirect,
    AuthenticatePsu,
    ConfirmOperation,
    GetConsentStatus,
    GetConsentObject,
}

impl StepName {
    /// All steps in the only supported order.
    pub const ALL: [StepName; 6] = [
        Self::CreateGlobalConsent,
        Self::CreateAuthorizationRedirect,
        Self::AuthenticatePsu,
        Self::ConfirmOperation,
        Self::GetConsentStatus,
        Self::GetConsentObject,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateGlobalConsent => "CreateGlobalConsent",
            Self::CreateAuthorizationRedirect => "CreateAuthorizationRedirect",
            Self::AuthenticatePsu => "AuthenticatePsu",
            Self::ConfirmOperation => "ConfirmOperation",
            Self::GetConsentStatus => "GetConsentStatus",
            Self::GetConsentObject => "GetConsentObject",
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::CreateGlobalConsent | Self::CreateAuthorizationRedirect => Phase::Given,
            Self::AuthenticatePsu | Self::ConfirmOperation => Phase::When,
            Self::GetConsentStatus | Self::GetConsentObject => Phase::Then,
        }
    }

    /// Status code the step requires.
    #[must_use]
    pub fn expected_status(&self) -> u16 {
        match self {
            Self::CreateGlobalConsent | Self::CreateAuthorizationRedirect => STATUS_CREATED,
            _ => STATUS_OK,
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a passed step hands back to its caller.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub step: StepName,
    pub status: u16,
    pub body: Value,
}

impl StepOutcome {
    fn new(step: StepName, response: ApiResponse) -> Self {
        Self {
            step,
            status: response.status,
            body: response.body,
        }
    }

    /// `consentStatus` field of the response body, if present.
    pub fn consent_status(&self) -> Option<&str> {
        self.body.get("consentStatus").and_then(Value::as_str)
    }
}

/// Fail with a step assertion error unless `response` has the expected status.
pub fn expect_status(step: StepName, expected: u16, response: &ApiResponse) -> Result<()> {
    if response.status == expected {
        return Ok(());
    }

    tracing::warn!(
        step = %step,
        expected,
        actual = response.status,
        body = %response.body,
        "Unexpected status code"
    );
    Err(ConsentFlowError::StepAssertion {
        step,
        expected,
        actual: response.status,
    })
}

/// Send the step's request and check the status code.
fn execute(client: &impl HttpClient, step: StepName, request: &ApiRequest) -> Result<ApiResponse> {
    tracing::debug!(
        step = %step,
        method = %request.method,
        template = %request.template,
        "Executing step"
    );

    let response = client.request(request)?;
    expect_status(step, step.expected_status(), &response)?;

    tracing::info!(step = %step, status = response.status, "Step passed");
    Ok(response)
}

/// Read a freshly minted identifier from a creation response.
///
/// The body field wins; the last segment of `Location` is the fallback.
fn extract_identifier(step: StepName, response: &ApiResponse, field: ContextField) -> Result<String> {
    response
        .body_str(field.as_str())
        .filter(|id| !id.is_empty())
        .map(String::from)
        .or_else(|| response.location_id())
        .ok_or(ConsentFlowError::MissingIdentifier { step, field })
}
