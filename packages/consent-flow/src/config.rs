//! Configuration constants and validation functions for the consent workflow.

use regex::Regex;
use reqwest::Url;
use std::sync::LazyLock;

use crate::error::{ConsentFlowError, Result};

/// Base path of the open banking v2 API namespace.
pub const OPEN_BANKING_V2_PREFIX: &str = "/open-banking/v2";

/// HTTP timeout in seconds.
///
/// Consent creation on sandbox banks can be slow, so this is generous.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// `validTo` of the global consent created by the scenario.
pub const GLOBAL_CONSENT_VALID_TO: &str = "2034-01-09";

/// `frequencyPerDay` of the global consent created by the scenario.
pub const GLOBAL_CONSENT_FREQUENCY_PER_DAY: u32 = 4;

/// PSU ID pattern: non-empty, header-safe characters only.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PSU_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._@+\-]+$").expect("valid regex"));

/// Settings for the HTTP client adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme, host and port of the API under test, without trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Create a config for the given base URL with the default timeout.
    ///
    /// The URL is validated and normalized via [`validate_base_url`].
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: validate_base_url(base_url)?,
            timeout_secs: HTTP_TIMEOUT_SECS,
        })
    }

    /// Override the request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Validate a base URL and strip any trailing slash.
///
/// # Returns
/// * `Ok(normalized)` for an absolute http(s) URL
/// * `Err(ConsentFlowError::InvalidBaseUrl)` otherwise
///
/// # Examples
/// ```
/// use consentflow_ais::config::validate_base_url;
///
/// assert_eq!(validate_base_url("http://localhost:8080/").unwrap(), "http://localhost:8080");
/// assert!(validate_base_url("localhost:8080").is_err());
/// ```
pub fn validate_base_url(base_url: &str) -> Result<String> {
    let parsed =
        Url::parse(base_url).map_err(|_| ConsentFlowError::InvalidBaseUrl(base_url.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ConsentFlowError::InvalidBaseUrl(base_url.to_string()));
    }

    Ok(base_url.trim_end_matches('/').to_string())
}

/// Validate a PSU identifier before it is sent as the `PSU-ID` header.
///
/// # Examples
/// ```
/// use consentflow_ais::config::validate_psu_id;
///
/// assert!(validate_psu_id("john.doe").is_ok());
/// assert!(validate_psu_id("").is_err());
/// assert!(validate_psu_id("john\ndoe").is_err());
/// ```
pub fn validate_psu_id(psu_id: &str) -> Result<()> {
    if PSU_ID_PATTERN.is_match(psu_id) {
        Ok(())
    } else {
        Err(ConsentFlowError::InvalidPsuId(psu_id.to_string()))
    }
}

/// Prefix a resource path with the open banking v2 namespace.
///
/// A missing leading slash on `path` is tolerated.
///
/// # Examples
/// ```
/// use consentflow_ais::config::open_banking_v2;
///
/// assert_eq!(open_banking_v2("/consents/account-access"), "/open-banking/v2/consents/account-access");
/// assert_eq!(open_banking_v2("consents/account-access"), "/open-banking/v2/consents/account-access");
/// ```
pub fn open_banking_v2(path: &str) -> String {
    format!("{OPEN_BANKING_V2_PREFIX}/{}", path.trim_start_matches('/'))
}
