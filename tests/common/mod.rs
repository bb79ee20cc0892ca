#![allow(dead_code)]

use chrono::{Duration, Utc};
use serde_json::{json, Value};
use shopware_account_api::{AccountClient, CachedSession, Config, Expiry, Membership, SessionCache, Token};
use tempfile::TempDir;

pub const EMAIL: &str = "dev@example.com";
pub const PASSWORD: &str = "secret";
pub const BEARER: &str = "fresh-token";
pub const ACCOUNT_ID: i64 = 42;

/// Credential exchange response with a far-future expiry
pub fn login_body() -> String {
    json!({
        "token": BEARER,
        "expire": {"date": "2099-01-01 00:00:00.000000", "timezone_type": 3, "timezone": "UTC"},
        "userAccountId": ACCOUNT_ID,
        "userId": 7,
        "legacyLogin": false
    })
    .to_string()
}

pub fn membership_json(id: i64, active: bool) -> Value {
    json!({
        "id": id,
        "creationDate": "2024-01-01 12:00:00",
        "active": active,
        "member": {"id": 700 + id},
        "company": {"id": 100 + id, "name": format!("Company {}", id)},
        "roles": [{"name": "admin"}]
    })
}

pub fn membership(id: i64, active: bool) -> Membership {
    serde_json::from_value(membership_json(id, active)).unwrap()
}

/// Session whose token expires `lifetime` from now, active membership 1
pub fn session(bearer: &str, lifetime: Duration) -> CachedSession {
    let memberships = vec![membership(1, true), membership(2, false)];
    CachedSession {
        token: Token::new(bearer.to_string(), Expiry::utc(Utc::now() + lifetime), ACCOUNT_ID, 7),
        active_membership: Some(memberships[0].clone()),
        memberships,
    }
}

pub fn config(server: &mockito::Server, dir: &TempDir) -> Config {
    Config::new(server.url()).with_cache_dir(dir.path())
}

/// Client already holding a valid session for `bearer`
pub fn authenticated_client(server: &mockito::Server, dir: &TempDir, bearer: &str) -> AccountClient {
    let cache = SessionCache::in_dir(dir.path()).unwrap();
    let mut client = AccountClient::with_cache(config(server, dir), cache).unwrap();
    client.resume(session(bearer, Duration::hours(1)));
    client
}
