//! Given steps: create the consent and start its authorisation.

use crate::config::{open_banking_v2, validate_psu_id};
use crate::context::{ContextField, WorkflowContext};
use crate::error::Result;
use crate::http::{
    ApiRequest, HttpClient, Method, PSU_ID_HEADER, TPP_REDIRECT_PREFERRED_HEADER,
};
use crate::types::{GlobalConsentRequest, ScaApproach};

use super::{execute, extract_identifier, StepName, StepOutcome};

const CREATE_CONSENT: &str = "/consents/account-access";
const CREATE_AUTHORIZATION: &str = "/consents/{consent_id}/authorisations";

/// POST a global, non-recurring consent and store the returned `consentId`.
///
/// Every call creates a new consent; a previously stored id is replaced.
pub fn create_global_consent(
    ctx: &mut WorkflowContext,
    client: &impl HttpClient,
    psu_id: &str,
    sca_approach: ScaApproach,
) -> Result<StepOutcome> {
    let step = StepName::CreateGlobalConsent;
    validate_psu_id(psu_id)?;

    let request = ApiRequest::new(Method::POST, open_banking_v2(CREATE_CONSENT))
        .with_header(PSU_ID_HEADER, psu_id)
        .with_header(
            TPP_REDIRECT_PREFERRED_HEADER,
            sca_approach.redirect_preferred().to_string(),
        )
        .with_json(&GlobalConsentRequest::fixed())?;

    let response = execute(client, step, &request)?;
    let consent_id = extract_identifier(step, &response, ContextField::ConsentId)?;
    ctx.set(ContextField::ConsentId, consent_id);

    Ok(StepOutcome::new(step, response))
}

/// POST an authorisation for the stored consent and store its `authorisationId`.
pub fn create_authorization_redirect(
    ctx: &mut WorkflowContext,
    client: &impl HttpClient,
) -> Result<StepOutcome> {
    let step = StepName::CreateAuthorizationRedirect;
    let consent_id = ctx.require(ContextField::ConsentId, step)?;

    let request = ApiRequest::new(Method::POST, open_banking_v2(CREATE_AUTHORIZATION))
        .with_path_param(consent_id);

    let response = execute(client, step, &request)?;
    let authorisation_id = extract_identifier(step, &response, ContextField::AuthorisationId)?;
    ctx.set(ContextField::AuthorisationId, authorisation_id);

    Ok(StepOutcome::new(step, response))
}
