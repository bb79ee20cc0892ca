use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AccountError, Result};
use crate::time::{Expiry, ExpiryRecord};

/// Seconds of remaining lifetime below which a token is treated as expired
pub const VALIDITY_MARGIN_SECS: i64 = 60;

/// Token is the bearer credential returned by the credential exchange.
/// It is immutable once created; a new login produces a new token.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TokenPayload")]
pub struct Token {
    /// Bearer string sent in the `x-shopware-token` header
    pub token: String,

    /// Expiration instant
    pub expire: Expiry,

    /// Account the token was issued for
    pub user_account_id: i64,

    /// User the token was issued for
    pub user_id: i64,

    /// Whether the account logged in through the legacy flow
    pub legacy_login: bool,
}

/// Loosely-shaped token payload as sent by the API or stored in the cache
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPayload {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    expire: Option<ExpiryRecord>,
    #[serde(default)]
    user_account_id: Option<i64>,
    #[serde(default)]
    user_id: Option<i64>,
    #[serde(default)]
    legacy_login: Option<bool>,
}

impl TryFrom<TokenPayload> for Token {
    type Error = AccountError;

    fn try_from(payload: TokenPayload) -> Result<Self> {
        let token = payload
            .token
            .ok_or_else(|| AccountError::Parse("token payload has no token".to_string()))?;

        let expire = match payload.expire {
            Some(record) if record.date.is_some() => Expiry::from_record(record)?,
            _ => Expiry::one_hour_after(Utc::now()),
        };

        Ok(Token {
            token,
            expire,
            user_account_id: payload.user_account_id.unwrap_or(0),
            user_id: payload.user_id.unwrap_or(0),
            legacy_login: payload.legacy_login.unwrap_or(false),
        })
    }
}

impl Token {
    /// Create a new Token
    pub fn new(token: String, expire: Expiry, user_account_id: i64, user_id: i64) -> Self {
        Token {
            token,
            expire,
            user_account_id,
            user_id,
            legacy_login: false,
        }
    }

    /// Build a token from the credential exchange response body.
    ///
    /// Only `token` is mandatory: a missing expiry defaults to one hour from
    /// now, missing ids to 0 and a missing legacy flag to false.
    pub fn from_response(payload: Value) -> Result<Self> {
        let payload: TokenPayload = serde_json::from_value(payload)
            .map_err(|e| AccountError::Parse(format!("malformed token payload: {}", e)))?;
        Token::try_from(payload)
    }

    /// Check the token against a given instant
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expire.timestamp() - now.timestamp() > VALIDITY_MARGIN_SECS
    }

    /// Check if the token expires more than a minute from now
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

// The bearer string is a secret
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("token", &"<redacted>")
            .field("expire", &self.expire)
            .field("user_account_id", &self.user_account_id)
            .field("user_id", &self.user_id)
            .field("legacy_login", &self.legacy_login)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn token_expiring_at(expire: DateTime<Utc>) -> Token {
        Token::new("t".to_string(), Expiry::utc(expire), 1, 1)
    }

    #[test]
    fn test_from_response() {
        let token = Token::from_response(json!({
            "token": "t1",
            "expire": {"date": "2025-12-31 23:59:59"},
            "userAccountId": 42,
            "userId": 7
        }))
        .unwrap();

        assert_eq!(token.token, "t1");
        assert_eq!(token.user_account_id, 42);
        assert_eq!(token.user_id, 7);
        assert!(!token.legacy_login);
        assert_eq!(
            token.expire.timestamp(),
            Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap().timestamp()
        );
    }

    #[test]
    fn test_from_response_defaults() {
        let before = Utc::now();
        let token = Token::from_response(json!({"token": "abc"})).unwrap();

        assert_eq!(token.user_account_id, 0);
        assert_eq!(token.user_id, 0);
        let lifetime = token.expire.timestamp() - before.timestamp();
        assert!((3599..=3601).contains(&lifetime), "lifetime was {}", lifetime);
    }

    #[test]
    fn test_from_response_requires_token() {
        let result = Token::from_response(json!({"userAccountId": 1}));
        assert!(matches!(result, Err(AccountError::Parse(_))));
    }

    #[test]
    fn test_validity_margin_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();

        assert!(!token_expiring_at(now + Duration::seconds(60)).is_valid_at(now));
        assert!(token_expiring_at(now + Duration::seconds(61)).is_valid_at(now));
        assert!(!token_expiring_at(now - Duration::days(1)).is_valid_at(now));
    }

    #[test]
    fn test_validity_uses_named_zone_offset() {
        let winter_now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let stale = Token::from_response(json!({
            "token": "t",
            "expire": {"date": "2026-01-15 12:30:00.000000", "timezone_type": 3, "timezone": "Europe/Berlin"}
        }))
        .unwrap();
        assert!(!stale.is_valid_at(winter_now));

        let summer_now = Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap();
        let fresh = Token::from_response(json!({
            "token": "t",
            "expire": {"date": "2026-07-01 14:30:00.000000", "timezone_type": 3, "timezone": "Europe/Berlin"}
        }))
        .unwrap();
        assert!(fresh.is_valid_at(summer_now));
        assert!(!fresh.is_valid_at(summer_now + Duration::minutes(30)));
    }

    #[test]
    fn test_serialization_round_trip() {
        let token = Token::from_response(json!({
            "token": "t1",
            "expire": {"date": "2025-12-31 23:59:59", "timezone_type": 3, "timezone": "UTC"},
            "userAccountId": 42,
            "userId": 7,
            "legacyLogin": true
        }))
        .unwrap();

        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["userAccountId"], 42);
        assert_eq!(json["expire"]["timezone"], "UTC");

        let back: Token = serde_json::from_value(json).unwrap();
        assert_eq!(back, token);
        assert!(back.legacy_login);
    }

    #[test]
    fn test_debug_redacts_bearer() {
        let token = token_expiring_at(Utc::now());
        assert!(!format!("{:?}", token).contains("\"t\""));
    }
}
