//! Scenario runner for the redirect consent authorisation flow.
//!
//! Runs the Given, When and Then phases strictly in order on one
//! [`WorkflowContext`]. The first failing step ends the run; nothing after it
//! is sent.

use std::fmt;

use crate::context::WorkflowContext;
use crate::error::Result;
use crate::http::HttpClient;
use crate::steps::{given, then, when, Phase, StepName, StepOutcome};
use crate::types::ScaApproach;

/// PSU used by the reference scenario.
pub const EXAMPLE_PSU_ID: &str = "john.doe";

/// Password used by the reference scenario.
pub const EXAMPLE_PASSWORD: &str = "12345";

/// Inputs of a consent authorisation scenario.
#[derive(Clone)]
pub struct ConsentScenario {
    pub psu_id: String,
    pub password: String,
    pub sca_approach: ScaApproach,
}

impl fmt::Debug for ConsentScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsentScenario")
            .field("psu_id", &self.psu_id)
            .field("password", &"<redacted>")
            .field("sca_approach", &self.sca_approach)
            .finish()
    }
}

impl ConsentScenario {
    pub fn new(
        psu_id: impl Into<String>,
        password: impl Into<String>,
        sca_approach: ScaApproach,
    ) -> Self {
        Self {
            psu_id: psu_id.into(),
            password: password.into(),
            sca_approach,
        }
    }

    /// Global consent, redirect SCA, confirmed in two steps.
    pub fn redirect_example() -> Self {
        Self::new(EXAMPLE_PSU_ID, EXAMPLE_PASSWORD, ScaApproach::Redirect)
    }

    /// Run all six steps against `client`.
    ///
    /// # Returns
    /// A report of every step on success, or the first step's error.
    pub fn run(&self, client: &impl HttpClient) -> Result<ScenarioReport> {
        let span = tracing::info_span!(
            "consent_scenario",
            psu_id = %self.psu_id,
            sca_approach = %self.sca_approach
        );
        let _enter = span.enter();

        let mut ctx = WorkflowContext::new();
        let mut report = ScenarioReport::default();

        self.run_given(&mut ctx, client, &mut report)?;
        self.run_when(&ctx, client, &mut report)?;
        self.run_then(&ctx, client, &mut report)?;

        report.consent_id = ctx.consent_id().map(String::from);
        report.authorisation_id = ctx.authorisation_id().map(String::from);

        tracing::info!(steps = report.steps.len(), "Scenario passed");
        Ok(report)
    }

    fn run_given(
        &self,
        ctx: &mut WorkflowContext,
        client: &impl HttpClient,
        report: &mut ScenarioReport,
    ) -> Result<()> {
        report.record(given::create_global_consent(
            ctx,
            client,
            &self.psu_id,
            self.sca_approach,
        )?);
        report.record(given::create_authorization_redirect(ctx, client)?);
        Ok(())
    }

    fn run_when(
        &self,
        ctx: &WorkflowContext,
        client: &impl HttpClient,
        report: &mut ScenarioReport,
    ) -> Result<()> {
        report.record(when::authenticate_psu(
            ctx,
            client,
            &self.psu_id,
            &self.password,
        )?);
        report.record(when::confirm_operation(ctx, client, &self.psu_id)?);
        Ok(())
    }

    fn run_then(
        &self,
        ctx: &WorkflowContext,
        client: &impl HttpClient,
        report: &mut ScenarioReport,
    ) -> Result<()> {
        let status = then::get_consent_status(ctx, client)?;
        report.consent_status = status.consent_status().map(String::from);
        report.record(status);
        report.record(then::get_consent_object(ctx, client)?);
        Ok(())
    }
}

/// One passed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRecord {
    pub phase: Phase,
    pub step: StepName,
    pub status: u16,
}

/// Summary of a passed scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioReport {
    pub steps: Vec<StepRecord>,
    pub consent_id: Option<String>,
    pub authorisation_id: Option<String>,
    pub consent_status: Option<String>,
}

impl ScenarioReport {
    fn record(&mut self, outcome: StepOutcome) {
        self.steps.push(StepRecord {
            phase: outcome.step.phase(),
            step: outcome.step,
            status: outcome.status,
        });
    }

    /// Steps in the order they ran.
    pub fn step_names(&self) -> Vec<StepName> {
        self.steps.iter().map(|record| record.step).collect()
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut current: Option<Phase> = None;
        for record in &self.steps {
            let label = if current == Some(record.phase) {
                "And".to_string()
            } else {
                current = Some(record.phase);
                record.phase.to_string()
            };
            writeln!(f, "{label:>5} {} -> HTTP {}", record.step, record.status)?;
        }
        if let Some(status) = &self.consent_status {
            writeln!(f, "consentStatus: {status}")?;
        }
        Ok(())
    }
}
