//! Token endpoint response.
//!
//! # Example Response
//!
//! ```json
//! {
//!     "access_token": "BQD...",
//!     "token_type": "Bearer",
//!     "scope": "user-read-private user-read-email",
//!     "expires_in": 3600,
//!     "refresh_token": "AQC..."
//! }
//! ```
//!
//! Only `access_token` is used. Tokens are assumed to live one hour
//! regardless of `expires_in`, and refresh tokens are never exchanged.

use std::time::Duration;

use serde::Deserialize;
use serde_with::{formats::Flexible, serde_as, DurationSeconds};
use veil::Redact;

#[serde_as]
#[derive(Clone, Eq, PartialEq, Deserialize, Redact, Hash)]
pub struct TokenResponse {
    #[redact]
    pub access_token: String,

    #[serde(default)]
    pub token_type: Option<String>,

    #[serde(default)]
    pub scope: Option<String>,

    #[serde_as(as = "Option<DurationSeconds<u64, Flexible>>")]
    pub expires_in: Option<Duration>,

    #[redact]
    #[serde(default)]
    pub refresh_token: Option<String>,
}
