//! Scripted [`HttpClient`] double for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::{json, Value};

use crate::error::Result;
use crate::http::{ApiRequest, ApiResponse, HttpClient};

/// Replays canned responses in order and records every request it receives.
#[derive(Default)]
pub struct ScriptedClient {
    responses: RefCell<VecDeque<ApiResponse>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedClient {
    pub fn new(responses: impl IntoIterator<Item = ApiResponse>) -> Self {
        Self {
            responses: RefCell::new(responses.into_iter().collect()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Responses of a bank that accepts the whole redirect flow.
    pub fn compliant(consent_id: &str, authorisation_id: &str) -> Self {
        Self::new([
            ApiResponse::new(201, json!({"consentId": consent_id, "consentStatus": "received"})),
            ApiResponse::new(201, json!({"authorisationId": authorisation_id, "scaStatus": "received"})),
            ApiResponse::new(200, json!({"scaStatus": "psuAuthenticated"})),
            ApiResponse::new(200, json!({"scaStatus": "finalised"})),
            ApiResponse::new(200, json!({"consentStatus": "valid"})),
            ApiResponse::new(200, json!({"consentId": consent_id, "consentStatus": "valid"})),
        ])
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl HttpClient for ScriptedClient {
    fn request(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.requests.borrow_mut().push(request.clone());
        // Running off the end of the script reads as a server error
        Ok(self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| ApiResponse::new(500, Value::Null)))
    }
}
