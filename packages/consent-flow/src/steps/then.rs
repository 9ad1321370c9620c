//! Then steps: read back the consent after authorisation.

use crate::config::open_banking_v2;
use crate::context::{ContextField, WorkflowContext};
use crate::error::{ConsentFlowError, Result};
use crate::http::{ApiRequest, HttpClient, Method};

use super::{execute, StepName, StepOutcome};

const CONSENT_STATUS: &str = "consents/account-access/{consent_id}/status";
const CONSENT_OBJECT: &str = "/consents/account-access/{consent_id}";

/// GET the status sub-resource of the stored consent.
///
/// The returned outcome exposes `consentStatus` via
/// [`StepOutcome::consent_status`].
pub fn get_consent_status(ctx: &WorkflowContext, client: &impl HttpClient) -> Result<StepOutcome> {
    let step = StepName::GetConsentStatus;
    let consent_id = ctx.require(ContextField::ConsentId, step)?;

    let request =
        ApiRequest::new(Method::GET, open_banking_v2(CONSENT_STATUS)).with_path_param(consent_id);
    let response = execute(client, step, &request)?;

    let outcome = StepOutcome::new(step, response);
    tracing::info!(
        consent_id,
        consent_status = outcome.consent_status().unwrap_or("<absent>"),
        "Consent status"
    );
    Ok(outcome)
}

/// GET the stored consent and check it is the one the scenario created.
pub fn get_consent_object(ctx: &WorkflowContext, client: &impl HttpClient) -> Result<StepOutcome> {
    let step = StepName::GetConsentObject;
    let consent_id = ctx.require(ContextField::ConsentId, step)?;

    let request =
        ApiRequest::new(Method::GET, open_banking_v2(CONSENT_OBJECT)).with_path_param(consent_id);
    let response = execute(client, step, &request)?;

    // Some banks omit the id from the consent object; only a conflicting one fails
    if let Some(returned) = response.body_str(ContextField::ConsentId.as_str()) {
        if returned != consent_id {
            return Err(ConsentFlowError::ConsentMismatch {
                step,
                expected: consent_id.to_string(),
                actual: returned.to_string(),
            });
        }
    }

    Ok(StepOutcome::new(step, response))
}
