//! Request bodies and enums exchanged with the consent API.
//!
//! Field names are serialized exactly as the API schema spells them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{GLOBAL_CONSENT_FREQUENCY_PER_DAY, GLOBAL_CONSENT_VALID_TO};
use crate::error::ConsentFlowError;

/// Strong Customer Authentication approach requested by the TPP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScaApproach {
    /// PSU is redirected to the bank to authenticate.
    Redirect,
    /// PSU credentials pass through the TPP.
    Embedded,
    /// PSU confirms out of band, e.g. in a banking app.
    Decoupled,
    /// OAuth2 authorisation code flow.
    Oauth,
}

impl ScaApproach {
    /// Get the string value used in headers and feature files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Redirect => "REDIRECT",
            Self::Embedded => "EMBEDDED",
            Self::Decoupled => "DECOUPLED",
            Self::Oauth => "OAUTH",
        }
    }

    /// Value of the `TPP-Redirect-Preferred` header for this approach.
    #[must_use]
    pub fn redirect_preferred(&self) -> bool {
        matches!(self, Self::Redirect)
    }
}

impl fmt::Display for ScaApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScaApproach {
    type Err = ConsentFlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "REDIRECT" => Ok(Self::Redirect),
            "EMBEDDED" => Ok(Self::Embedded),
            "DECOUPLED" => Ok(Self::Decoupled),
            "OAUTH" => Ok(Self::Oauth),
            _ => Err(ConsentFlowError::UnknownScaApproach(s.to_string())),
        }
    }
}

/// Account access block of a consent request. A global consent leaves it empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAccess {}

/// Body of the consent-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConsentRequest {
    pub access: AccountAccess,
    pub consent_type: String,
    pub recurring_indicator: bool,
    pub valid_to: NaiveDate,
    pub frequency_per_day: u32,
}

impl GlobalConsentRequest {
    /// The fixed global, non-recurring consent used by the scenario.
    #[allow(clippy::expect_used)] // Constant date that is guaranteed to be valid
    pub fn fixed() -> Self {
        Self {
            access: AccountAccess::default(),
            consent_type: "global".to_string(),
            recurring_indicator: false,
            valid_to: NaiveDate::parse_from_str(GLOBAL_CONSENT_VALID_TO, "%Y-%m-%d")
                .expect("valid date"),
            frequency_per_day: GLOBAL_CONSENT_FREQUENCY_PER_DAY,
        }
    }
}

/// PSU data sent when updating an authorisation.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsuData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// Manual impl so the password never ends up in logs or panic messages.
impl fmt::Debug for PsuData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = self.password.as_ref().map(|_| "<redacted>");
        f.debug_struct("PsuData")
            .field("password", &password)
            .finish()
    }
}

/// Body of the authorisation update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsuDataRequest {
    pub psu_data: PsuData,
}

impl PsuDataRequest {
    /// Credentials update carrying the PSU password.
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            psu_data: PsuData {
                password: Some(password.into()),
            },
        }
    }

    /// Confirmation without additional PSU data.
    pub fn empty() -> Self {
        Self::default()
    }
}
