//! Verification of host-issued signed identity payloads (`initData`).
//!
//! The payload is an `application/x-www-form-urlencoded` string. Its `hash`
//! field is the lowercase hex HMAC-SHA256 of every other field, sorted by key
//! and joined as `key=value` lines, keyed with `HMAC-SHA256("WebAppData",
//! bot_token)`.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::auth::session::Session;
use crate::errors::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

const KEY_DERIVATION_LABEL: &[u8] = b"WebAppData";
const HASH_FIELD: &str = "hash";
const AUTH_DATE_FIELD: &str = "auth_date";
const USER_FIELD: &str = "user";

/// Identity extracted from a payload whose signature checked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedUser {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub auth_date: DateTime<Utc>,
}

#[derive(Deserialize)]
struct UserField {
    id: i64,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
}

/// Holds the derived signing key so repeated verifications skip the
/// key-derivation step.
#[derive(Clone)]
pub struct SessionVerifier {
    signing_key: [u8; 32],
    max_age: Duration,
}

impl std::fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionVerifier")
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

impl SessionVerifier {
    pub fn new(secret_token: &str, max_age: Duration) -> Self {
        Self {
            signing_key: derive_signing_key(secret_token),
            max_age,
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn verify(&self, raw_payload: &str) -> AuthResult<VerifiedUser> {
        self.verify_at(raw_payload, Utc::now())
    }

    /// Same as [`SessionVerifier::verify`] with an explicit clock.
    pub fn verify_at(&self, raw_payload: &str, now: DateTime<Utc>) -> AuthResult<VerifiedUser> {
        let result = self.check(raw_payload, now);
        match &result {
            Ok(user) => debug!(user_id = user.id, "verified session payload"),
            Err(err) => warn!(error = %err, "rejected session payload"),
        }
        result
    }

    /// Verify and wrap the identity in a [`Session`] stamped at `now`.
    pub fn establish_at(&self, raw_payload: &str, now: DateTime<Utc>) -> AuthResult<Session> {
        let user = self.verify_at(raw_payload, now)?;
        Ok(Session::new(user, now, self.max_age))
    }

    pub fn establish(&self, raw_payload: &str) -> AuthResult<Session> {
        self.establish_at(raw_payload, Utc::now())
    }

    fn check(&self, raw_payload: &str, now: DateTime<Utc>) -> AuthResult<VerifiedUser> {
        let mut fields = parse_fields(raw_payload)?;

        let received_hash = fields
            .remove(HASH_FIELD)
            .ok_or_else(|| AuthError::malformed(HASH_FIELD, "missing"))?;
        let auth_date = parse_auth_date(
            fields
                .get(AUTH_DATE_FIELD)
                .ok_or_else(|| AuthError::malformed(AUTH_DATE_FIELD, "missing"))?,
        )?;

        let expected_hash = self.sign(&data_check_string(&fields));
        if !bool::from(expected_hash.as_bytes().ct_eq(received_hash.as_bytes())) {
            return Err(AuthError::SignatureMismatch);
        }

        let age = now.signed_duration_since(auth_date);
        if age > self.max_age {
            return Err(AuthError::ExpiredSession {
                age_secs: age.num_seconds(),
                max_age_secs: self.max_age.num_seconds(),
            });
        }

        let user: UserField = serde_json::from_str(
            fields
                .get(USER_FIELD)
                .ok_or_else(|| AuthError::malformed(USER_FIELD, "missing"))?,
        )
        .map_err(|_| AuthError::malformed(USER_FIELD, "not a user object"))?;

        Ok(VerifiedUser {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            auth_date,
        })
    }

    fn sign(&self, check_string: &str) -> String {
        let mut mac = keyed_mac(&self.signing_key);
        mac.update(check_string.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Verify `raw_payload` against `secret_token` using the system clock.
pub fn verify(raw_payload: &str, secret_token: &str, max_age: Duration) -> AuthResult<VerifiedUser> {
    SessionVerifier::new(secret_token, max_age).verify(raw_payload)
}

fn keyed_mac(key: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(key).expect("HMAC can take key of any size")
}

fn derive_signing_key(secret_token: &str) -> [u8; 32] {
    let mut mac = keyed_mac(KEY_DERIVATION_LABEL);
    mac.update(secret_token.as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(&mac.finalize().into_bytes());
    key
}

/// Percent-decoded fields keyed for byte-order iteration. Repeated keys are
/// rejected since the signature only covers one value per key.
fn parse_fields(raw_payload: &str) -> AuthResult<BTreeMap<String, String>> {
    let mut fields = BTreeMap::new();
    for (key, value) in url::form_urlencoded::parse(raw_payload.trim().as_bytes()) {
        let key = key.into_owned();
        if fields.contains_key(&key) {
            return Err(AuthError::malformed(key, "duplicated"));
        }
        fields.insert(key, value.into_owned());
    }
    Ok(fields)
}

fn parse_auth_date(raw: &str) -> AuthResult<DateTime<Utc>> {
    raw.parse::<i64>()
        .ok()
        .filter(|secs| *secs >= 0)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| AuthError::malformed(AUTH_DATE_FIELD, "not unix seconds"))
}

fn data_check_string(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "5768337691:AAH5YkoiEuPk8-FZa32hStHTqXiLPtAEhx8";
    const OFFICIAL_PAYLOAD: &str = "query_id=AAHdF6IQAAAAAN0XohDhrOrc&user=%7B%22id%22%3A279058397%2C%22first_name%22%3A%22Vladislav%22%2C%22last_name%22%3A%22Kibenko%22%2C%22username%22%3A%22vdkfrost%22%2C%22language_code%22%3A%22ru%22%2C%22is_premium%22%3Atrue%7D&auth_date=1662771648&hash=c501b71e775f74ce10e377dea85a7ea24ecd640b223ea86dfe453e0eaed2e2b2";
    const MINIMAL_USER_PAYLOAD: &str = "auth_date=1700000000&user=%7B%22id%22%3A42%2C%22first_name%22%3A%22Ann%22%7D&hash=12670ddc39b6fd5fcec6491f53ac74dd0b8d26ddb65eb3a426ef17fdba49589e";
    const NO_USER_PAYLOAD: &str = "auth_date=1700000000&query_id=abc&hash=fda4aeba2532c790b4ae62467f0a6d618030549d2c8807325b7dd23e6d43fcc1";

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).expect("timestamp in range")
    }

    fn verifier() -> SessionVerifier {
        SessionVerifier::new(TOKEN, Duration::days(1))
    }

    #[test]
    fn signing_key_is_keyed_by_webappdata_label() {
        assert_eq!(
            hex::encode(derive_signing_key(TOKEN)),
            "a5c609aa52f63cb5e6d8ceb6e4138726ea82bbc36bb786d64482d445ea38ee5f"
        );
    }

    #[test]
    fn official_vector_verifies() {
        let user = verifier()
            .verify_at(OFFICIAL_PAYLOAD, at(1_662_771_648 + 60))
            .expect("official vector should verify");
        assert_eq!(user.id, 279_058_397);
        assert_eq!(user.username.as_deref(), Some("vdkfrost"));
        assert_eq!(user.first_name.as_deref(), Some("Vladislav"));
        assert_eq!(user.auth_date, at(1_662_771_648));
    }

    #[test]
    fn optional_user_fields_may_be_absent() {
        let user = verifier()
            .verify_at(MINIMAL_USER_PAYLOAD, at(1_700_000_000))
            .expect("payload should verify");
        assert_eq!(user.id, 42);
        assert_eq!(user.username, None);
        assert_eq!(user.first_name.as_deref(), Some("Ann"));
    }

    #[test]
    fn tampered_hash_is_rejected() {
        let tampered = OFFICIAL_PAYLOAD.replace("hash=c501", "hash=d501");
        assert_eq!(
            verifier().verify_at(&tampered, at(1_662_771_648)),
            Err(AuthError::SignatureMismatch)
        );

        let truncated = OFFICIAL_PAYLOAD.trim_end_matches("e2b2");
        assert_eq!(
            verifier().verify_at(truncated, at(1_662_771_648)),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn tampered_field_is_rejected() {
        let tampered = OFFICIAL_PAYLOAD.replace("279058397", "279058398");
        assert_eq!(
            verifier().verify_at(&tampered, at(1_662_771_648)),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn wrong_token_is_rejected() {
        let other = SessionVerifier::new("123:other", Duration::days(1));
        assert_eq!(
            other.verify_at(OFFICIAL_PAYLOAD, at(1_662_771_648)),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn missing_fields_are_malformed() {
        let no_auth_date = OFFICIAL_PAYLOAD.replace("&auth_date=1662771648", "");
        assert_eq!(
            verifier().verify_at(&no_auth_date, at(1_662_771_648)),
            Err(AuthError::malformed("auth_date", "missing"))
        );

        let no_hash = "auth_date=1662771648&query_id=x";
        assert_eq!(
            verifier().verify_at(no_hash, at(1_662_771_648)),
            Err(AuthError::malformed("hash", "missing"))
        );

        assert!(matches!(
            verifier().verify_at("", at(0)),
            Err(AuthError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn non_numeric_auth_date_is_malformed() {
        let payload = "auth_date=yesterday&hash=00";
        assert!(matches!(
            verifier().verify_at(payload, at(0)),
            Err(AuthError::MalformedPayload { field, .. }) if field == "auth_date"
        ));
    }

    #[test]
    fn duplicated_key_is_malformed() {
        let payload = format!("{OFFICIAL_PAYLOAD}&query_id=again");
        assert!(matches!(
            verifier().verify_at(&payload, at(1_662_771_648)),
            Err(AuthError::MalformedPayload { field, .. }) if field == "query_id"
        ));
    }

    #[test]
    fn expiry_is_strictly_after_max_age() {
        let issued = 1_662_771_648;
        let day = 86_400;
        assert!(verifier()
            .verify_at(OFFICIAL_PAYLOAD, at(issued + day))
            .is_ok());
        assert_eq!(
            verifier().verify_at(OFFICIAL_PAYLOAD, at(issued + day + 1)),
            Err(AuthError::ExpiredSession {
                age_secs: day + 1,
                max_age_secs: day,
            })
        );
        // Clock skew: a payload from the future is accepted.
        assert!(verifier()
            .verify_at(OFFICIAL_PAYLOAD, at(issued - 3_600))
            .is_ok());
    }

    #[test]
    fn signed_payload_without_user_is_malformed() {
        assert_eq!(
            verifier().verify_at(NO_USER_PAYLOAD, at(1_700_000_000)),
            Err(AuthError::malformed("user", "missing"))
        );
    }

    #[test]
    fn free_function_matches_verifier() {
        // Official vector is years old; a huge window keeps it fresh.
        let user = verify(OFFICIAL_PAYLOAD, TOKEN, Duration::days(365 * 200))
            .expect("official vector should verify");
        assert_eq!(user.id, 279_058_397);
    }

    #[test]
    fn establish_stamps_session() {
        let session = verifier()
            .establish_at(OFFICIAL_PAYLOAD, at(1_662_771_700))
            .expect("session should be established");
        assert!(session.verified());
        assert_eq!(session.user().id, 279_058_397);
        assert_eq!(session.issued_at(), at(1_662_771_700));
    }
}
