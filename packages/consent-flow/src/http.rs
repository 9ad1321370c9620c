//! HTTP client adapter for talking to the consent API.
//!
//! Steps never touch `reqwest` directly: they build an [`ApiRequest`] and hand
//! it to an [`HttpClient`]. [`ReqwestClient`] is the real implementation;
//! tests swap in scripted doubles.

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub use reqwest::Method;

use crate::config::ClientConfig;
use crate::error::{ConsentFlowError, Result};

/// User agent string identifying this client.
const USER_AGENT: &str = concat!("consentflow-ais/", env!("CARGO_PKG_VERSION"));

/// Media type for every request and expected response.
const APPLICATION_JSON: &str = "application/json";

/// Header carrying the PSU identifier.
pub const PSU_ID_HEADER: &str = "PSU-ID";

/// Header telling the bank whether the TPP prefers the redirect SCA approach.
pub const TPP_REDIRECT_PREFERRED_HEADER: &str = "TPP-Redirect-Preferred";

/// Header carrying a unique id per request.
pub const X_REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Placeholder pattern in URL templates, e.g. `{consent_id}`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[a-z_]+\}").expect("valid regex"));

/// Base for resolving relative `Location` values; only the path is used.
const RELATIVE_LOCATION_BASE: &str = "http://localhost/";

/// A request as described by a step, before URL expansion.
#[derive(Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path template relative to the base URL, with `{name}` placeholders.
    pub template: String,
    /// Values for the placeholders, in order of appearance.
    pub path_params: Vec<String>,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, template: impl Into<String>) -> Self {
        Self {
            method,
            template: template.into(),
            path_params: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_path_param(mut self, value: impl Into<String>) -> Self {
        self.path_params.push(value.into());
        self
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Attach a JSON body.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Expanded request path.
    pub fn path(&self) -> Result<String> {
        expand_template(&self.template, &self.path_params)
    }

    /// Value of a header set on this request.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// Manual impl so a PSU password in the body never ends up in logs or panic messages.
impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self.body.clone().map(|mut body| {
            if let Some(password) = body.pointer_mut("/psuData/password") {
                *password = Value::String("<redacted>".to_string());
            }
            body
        });
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("template", &self.template)
            .field("path_params", &self.path_params)
            .field("headers", &self.headers)
            .field("body", &body)
            .finish()
    }
}

/// Status, `Location` header and JSON body of a response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub location: Option<String>,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            location: None,
            body,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Top-level string field of the body.
    pub fn body_str(&self, field: &str) -> Option<&str> {
        self.body.get(field).and_then(Value::as_str)
    }

    /// Last non-empty path segment of the `Location` header, percent-decoded.
    ///
    /// Absolute and relative values are both accepted. A `Location` without
    /// a path (e.g. `http://bank.example`) yields `None`.
    pub fn location_id(&self) -> Option<String> {
        let location = self.location.as_deref()?;
        let url = match Url::parse(location) {
            Ok(url) => url,
            Err(_) => Url::parse(RELATIVE_LOCATION_BASE).ok()?.join(location).ok()?,
        };
        let segment = url.path_segments()?.rev().find(|s| !s.is_empty())?;
        urlencoding::decode(segment).ok().map(|id| id.into_owned())
    }
}

/// Transport used by the step executors.
pub trait HttpClient {
    /// Send `request` and return the response, whatever its status code.
    fn request(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn request(&self, request: &ApiRequest) -> Result<ApiResponse> {
        (**self).request(request)
    }
}

/// Substitute `{name}` placeholders positionally with `params`.
///
/// Placeholder names are informational; the n-th placeholder receives the
/// n-th parameter. Values are percent-encoded as single path segments.
///
/// # Examples
/// ```
/// use consentflow_ais::http::expand_template;
///
/// let path = expand_template(
///     "/consents/{consent_id}/authorisations/{authorisation_id}",
///     &["c1".to_string(), "a1".to_string()],
/// ).unwrap();
/// assert_eq!(path, "/consents/c1/authorisations/a1");
///
/// let path = expand_template("/consents/{consent_id}", &["c?1/x".to_string()]).unwrap();
/// assert_eq!(path, "/consents/c%3F1%2Fx");
/// ```
pub fn expand_template(template: &str, params: &[String]) -> Result<String> {
    let placeholders: Vec<_> = PLACEHOLDER_PATTERN.find_iter(template).collect();
    if placeholders.len() != params.len() {
        return Err(ConsentFlowError::TemplateMismatch {
            template: template.to_string(),
            placeholders: placeholders.len(),
            params: params.len(),
        });
    }

    let mut expanded = String::with_capacity(template.len());
    let mut last_end = 0;
    for (placeholder, value) in placeholders.iter().zip(params) {
        expanded.push_str(&template[last_end..placeholder.start()]);
        expanded.push_str(&urlencoding::encode(value));
        last_end = placeholder.end();
    }
    expanded.push_str(&template[last_end..]);

    Ok(expanded)
}

/// Decode a response body.
///
/// Empty bodies become `Null`; bodies that are not JSON are kept verbatim as
/// a string so assertion messages can show them.
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Create a configured blocking HTTP client.
pub fn create_client(timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// [`HttpClient`] backed by `reqwest::blocking`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
    base_url: String,
}

impl ReqwestClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(config.timeout_secs)?,
            base_url: config.base_url.clone(),
        })
    }
}

impl HttpClient for ReqwestClient {
    fn request(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path()?);
        let request_id = Uuid::new_v4().to_string();

        tracing::debug!(
            method = %request.method,
            url = %url,
            request_id = %request_id,
            "Sending request"
        );

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(ACCEPT, APPLICATION_JSON)
            .header(X_REQUEST_ID_HEADER, request_id.as_str());

        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }

        builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder.header(CONTENT_TYPE, APPLICATION_JSON),
        };

        let response = builder.send()?;
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let text = response.text()?;

        tracing::debug!(status, request_id = %request_id, "Received response");

        Ok(ApiResponse {
            status,
            location,
            body: parse_body(&text),
        })
    }
}
