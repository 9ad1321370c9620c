//! When steps: PSU authentication on the authorisation resource.
//!
//! Both steps PUT to the same authorisation URL. The redirect flow under test
//! takes the credentials first and then an empty confirmation.

use crate::config::{open_banking_v2, validate_psu_id};
use crate::context::{ContextField, WorkflowContext};
use crate::error::Result;
use crate::http::{ApiRequest, HttpClient, Method, PSU_ID_HEADER};
use crate::types::PsuDataRequest;

use super::{execute, StepName, StepOutcome};

const AUTHORISATION: &str = "/consents/{consent_id}/authorisations/{authorisation_id}";

/// PUT the PSU password to the stored authorisation.
pub fn authenticate_psu(
    ctx: &WorkflowContext,
    client: &impl HttpClient,
    psu_id: &str,
    password: &str,
) -> Result<StepOutcome> {
    let step = StepName::AuthenticatePsu;
    let request = authorisation_update(ctx, step, psu_id, &PsuDataRequest::with_password(password))?;
    let response = execute(client, step, &request)?;
    Ok(StepOutcome::new(step, response))
}

/// PUT an empty PSU data block to confirm the operation.
pub fn confirm_operation(
    ctx: &WorkflowContext,
    client: &impl HttpClient,
    psu_id: &str,
) -> Result<StepOutcome> {
    let step = StepName::ConfirmOperation;
    let request = authorisation_update(ctx, step, psu_id, &PsuDataRequest::empty())?;
    let response = execute(client, step, &request)?;
    Ok(StepOutcome::new(step, response))
}

fn authorisation_update(
    ctx: &WorkflowContext,
    step: StepName,
    psu_id: &str,
    body: &PsuDataRequest,
) -> Result<ApiRequest> {
    let consent_id = ctx.require(ContextField::ConsentId, step)?;
    let authorisation_id = ctx.require(ContextField::AuthorisationId, step)?;
    validate_psu_id(psu_id)?;

    ApiRequest::new(Method::PUT, open_banking_v2(AUTHORISATION))
        .with_path_param(consent_id)
        .with_path_param(authorisation_id)
        .with_header(PSU_ID_HEADER, psu_id)
        .with_json(body)
}
