use std::{
    fmt,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};
use serde_with::{formats::Flexible, serde_as, TimestampMilliSeconds};
use veil::Redact;

/// An access token together with the moment it stops being accepted.
///
/// Serialized as `{"access_token": "...", "expires_at": <unix millis>}`.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Redact)]
pub struct TokenEnvelope {
    #[redact]
    pub access_token: String,

    #[serde_as(as = "TimestampMilliSeconds<i64, Flexible>")]
    pub expires_at: SystemTime,
}

impl TokenEnvelope {
    /// Lifetime of every token issued by the provider. The token response
    /// is not consulted for it.
    pub const LIFETIME: Duration = Duration::from_secs(3600);

    /// Tokens this close to expiry are no longer used, so that a sequence
    /// of requests does not outlive its token halfway through.
    pub const EXPIRY_MARGIN: Duration = Duration::from_secs(5 * 60);

    /// Wraps a freshly issued token, expiring [`Self::LIFETIME`] after
    /// `issued_at`.
    ///
    /// The expiry is truncated to whole milliseconds, the precision it is
    /// stored with, so that a stored envelope reads back unchanged.
    #[must_use]
    pub fn issued(access_token: impl Into<String>, issued_at: SystemTime) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: truncate_to_millis(issued_at + Self::LIFETIME),
        }
    }

    /// Whether the token may still be used at `now`, honoring
    /// [`Self::EXPIRY_MARGIN`].
    #[must_use]
    pub fn is_usable_at(&self, now: SystemTime) -> bool {
        now + Self::EXPIRY_MARGIN < self.expires_at
    }

    #[must_use]
    pub fn time_to_live(&self) -> Duration {
        self.expires_at
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO)
    }
}

/// Drops the sub-millisecond part of `time`.
fn truncate_to_millis(time: SystemTime) -> SystemTime {
    match time.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(since_epoch) => {
            let excess = Duration::from_nanos(u64::from(since_epoch.subsec_nanos() % 1_000_000));
            time - excess
        }
        Err(_) => time,
    }
}

impl fmt::Display for TokenEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usable_until_five_minutes_before_expiry() {
        let expires_at = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let token = TokenEnvelope {
            access_token: "token".to_owned(),
            expires_at,
        };

        assert!(token.is_usable_at(expires_at - Duration::from_secs(6 * 60)));
        assert!(!token.is_usable_at(expires_at - Duration::from_secs(4 * 60)));
        assert!(!token.is_usable_at(expires_at - TokenEnvelope::EXPIRY_MARGIN));
        assert!(!token.is_usable_at(expires_at));
    }

    #[test]
    fn issued_tokens_live_one_hour() {
        let now = SystemTime::now();
        let token = TokenEnvelope::issued("token", now);

        let lifetime = token.expires_at.duration_since(now).unwrap();
        assert!(lifetime <= Duration::from_secs(3600));
        assert!(lifetime > Duration::from_secs(3600) - Duration::from_millis(1));
        assert!(token.is_usable_at(now));
    }

    #[test]
    fn issued_expiry_has_millisecond_precision() {
        let issued_at = SystemTime::UNIX_EPOCH + Duration::from_nanos(1_700_000_000_123_456_789);
        let token = TokenEnvelope::issued("token", issued_at);
        assert_eq!(
            token.expires_at,
            SystemTime::UNIX_EPOCH + Duration::from_millis(1_700_003_600_123)
        );
    }

    #[test]
    fn issued_tokens_survive_serialization_unchanged() {
        let token = TokenEnvelope::issued("token", SystemTime::now());
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(serde_json::from_str::<TokenEnvelope>(&json).unwrap(), token);
    }

    #[test]
    fn serializes_expiry_as_unix_millis() {
        let token = TokenEnvelope {
            access_token: "token".to_owned(),
            expires_at: SystemTime::UNIX_EPOCH + Duration::from_millis(1_700_000_000_123),
        };

        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(
            json,
            r#"{"access_token":"token","expires_at":1700000000123}"#
        );
        assert_eq!(serde_json::from_str::<TokenEnvelope>(&json).unwrap(), token);
    }

    #[test]
    fn debug_output_redacts_the_token() {
        let token = TokenEnvelope::issued("very-secret", SystemTime::now());
        assert!(!format!("{token:?}").contains("very-secret"));
    }
}
