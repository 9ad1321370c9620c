//! Consentflow AIS - Given/When/Then steps for open banking consent flows.
//!
//! This crate drives the account-information consent authorisation flow of
//! an open banking v2 API: create a global consent, start a redirect
//! authorisation, authenticate the PSU, confirm, and read the consent back.
//!
//! # Example
//!
//! ```no_run
//! use consentflow_ais::{ClientConfig, ConsentScenario, ReqwestClient};
//!
//! let config = ClientConfig::new("http://localhost:8080")?;
//! let client = ReqwestClient::new(&config)?;
//! let report = ConsentScenario::redirect_example().run(&client)?;
//! println!("{report}");
//! # Ok::<(), consentflow_ais::ConsentFlowError>(())
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, client settings and input validation
//! - [`error`]: Error types and Result alias
//! - [`types`]: Request bodies and the SCA approach enum
//! - [`http`]: HTTP client trait and the `reqwest` implementation
//! - [`context`]: Identifiers threaded between steps
//! - [`steps`]: Given/When/Then step executors
//! - [`scenario`]: Fixed-order scenario runner

pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod scenario;
pub mod steps;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export commonly used items
pub use config::ClientConfig;
pub use context::{ContextField, WorkflowContext};
pub use error::{ConsentFlowError, Result};
pub use http::{ApiRequest, ApiResponse, HttpClient, ReqwestClient};
pub use scenario::{ConsentScenario, ScenarioReport, StepRecord};
pub use steps::{Phase, StepName, StepOutcome};
pub use types::ScaApproach;
