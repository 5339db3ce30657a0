//! An authenticated client context and the verification endpoint's reply.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::session_verifier::VerifiedUser;

/// Read-only after creation. Only [`SessionVerifier`] builds one, so
/// `verified` is always true for sessions obtained through the public API.
///
/// [`SessionVerifier`]: crate::auth::session_verifier::SessionVerifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: VerifiedUser,
    verified: bool,
    issued_at: DateTime<Utc>,
    max_age: Duration,
}

impl Session {
    pub(crate) fn new(user: VerifiedUser, issued_at: DateTime<Utc>, max_age: Duration) -> Self {
        Self {
            user,
            verified: true,
            issued_at,
            max_age,
        }
    }

    pub fn user(&self) -> &VerifiedUser {
        &self.user
    }

    pub fn verified(&self) -> bool {
        self.verified
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Expiry follows the payload's `auth_date`, not the moment the session
    /// was established.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.user.auth_date) > self.max_age
    }

    /// Seconds since `auth_date`, for error reporting.
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.user.auth_date).num_seconds()
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }
}

/// `{ok, user_id, username}` as answered by the verification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub ok: bool,
    pub user_id: Option<i64>,
    pub username: Option<String>,
}

impl VerifyResponse {
    pub fn rejected() -> Self {
        Self {
            ok: false,
            user_id: None,
            username: None,
        }
    }
}

impl From<&VerifiedUser> for VerifyResponse {
    fn from(user: &VerifiedUser) -> Self {
        Self {
            ok: true,
            user_id: Some(user.id),
            username: user.username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(auth_date: i64) -> VerifiedUser {
        VerifiedUser {
            id: 7,
            username: Some("knight".to_owned()),
            first_name: None,
            auth_date: DateTime::from_timestamp(auth_date, 0).expect("timestamp in range"),
        }
    }

    #[test]
    fn expiry_counts_from_auth_date() {
        let session = Session::new(
            user(1_000),
            DateTime::from_timestamp(1_500, 0).expect("timestamp in range"),
            Duration::seconds(600),
        );
        let now = |secs| DateTime::from_timestamp(secs, 0).expect("timestamp in range");
        assert!(!session.is_expired(now(1_600)));
        assert!(session.is_expired(now(1_601)));
        assert_eq!(session.age_secs(now(1_601)), 601);
    }

    #[test]
    fn verify_response_json_shape() {
        let ok = serde_json::to_value(VerifyResponse::from(&user(0))).expect("serializes");
        assert_eq!(
            ok,
            serde_json::json!({"ok": true, "user_id": 7, "username": "knight"})
        );

        let rejected = serde_json::to_value(VerifyResponse::rejected()).expect("serializes");
        assert_eq!(
            rejected,
            serde_json::json!({"ok": false, "user_id": null, "username": null})
        );
    }
}
