//! World struct for Cucumber BDD tests
//!
//! Holds the mock bank and the workflow context for one scenario.

use consentflow_ais::{
    ClientConfig, ConsentFlowError, ReqwestClient, Result, ScenarioReport, StepOutcome,
    WorkflowContext,
};
use cucumber::World;
use std::fmt;
use wiremock::MockServer;

/// Test world that holds state across steps in a Cucumber scenario.
#[derive(World)]
#[world(init = Self::new)]
pub struct ConsentWorld {
    /// Mock bank, started by the first Given step
    pub server: Option<MockServer>,
    /// Identifiers threaded between steps
    pub context: WorkflowContext,
    /// Outcomes of steps that passed
    pub outcomes: Vec<StepOutcome>,
    /// Report of a full scenario run
    pub report: Option<ScenarioReport>,
    /// Last error (if a step failed)
    pub error: Option<ConsentFlowError>,
}

impl fmt::Debug for ConsentWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsentWorld")
            .field("server", &self.server.as_ref().map(MockServer::uri))
            .field("context", &self.context)
            .field("outcomes", &self.outcomes.len())
            .field("report", &self.report)
            .field("error", &self.error.as_ref().map(|e| e.to_string()))
            .finish()
    }
}

impl Default for ConsentWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsentWorld {
    /// Create a world with no bank running and an empty context.
    pub fn new() -> Self {
        Self {
            server: None,
            context: WorkflowContext::new(),
            outcomes: Vec::new(),
            report: None,
            error: None,
        }
    }

    /// The mock bank started by a Given step.
    pub fn server(&self) -> &MockServer {
        self.server
            .as_ref()
            .expect("a Given step must start the open banking API first")
    }

    /// Run one blocking step executor against the mock bank and record its result.
    ///
    /// The context travels into the blocking task and back, so identifiers
    /// stored by the step are visible to the next one.
    pub async fn execute<F>(&mut self, step: F)
    where
        F: FnOnce(&mut WorkflowContext, &ReqwestClient) -> Result<StepOutcome> + Send + 'static,
    {
        let base_url = self.server().uri();
        let mut ctx = self.context.clone();

        let (ctx, result) = tokio::task::spawn_blocking(move || {
            let result = ClientConfig::new(&base_url)
                .and_then(|config| ReqwestClient::new(&config))
                .and_then(|client| step(&mut ctx, &client));
            (ctx, result)
        })
        .await
        .expect("blocking step panicked");

        self.context = ctx;
        match result {
            Ok(outcome) => {
                self.outcomes.push(outcome);
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
    }

    /// Panic with the recorded error, if any.
    pub fn assert_passed(&self) {
        if let Some(e) = &self.error {
            panic!("Expected step to pass, got error: {e}");
        }
    }

    /// Outcome of the most recent passed step.
    pub fn last_outcome(&self) -> &StepOutcome {
        self.outcomes.last().expect("no step has passed yet")
    }
}
