use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Instant;

use crate::cache::{CachedSession, SessionCache};
use crate::client::{create_http_client, create_upload_client, Config};
use crate::endpoints::{MerchantEndpoint, ProducerEndpoint};
use crate::error::{AccountError, BoxError, Result};
use crate::membership::{select_active, Membership};
use crate::models::Profile;
use crate::response::Payload;
use crate::token::Token;
use crate::validation;

/// Credential exchange endpoint
pub const LOGIN_PATH: &str = "/accesstokens";
/// Header carrying the bearer token on authenticated calls
pub const TOKEN_HEADER: &str = "x-shopware-token";

/// Which primitive a failure came from; selects the error variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Request,
    Upload,
}

impl Operation {
    pub(crate) fn error(
        self,
        message: String,
        status: Option<u16>,
        body: Option<String>,
        source: Option<BoxError>,
    ) -> AccountError {
        match self {
            Operation::Request => AccountError::Api {
                message,
                status,
                body,
                source,
            },
            Operation::Upload => AccountError::Upload {
                message,
                status,
                body,
                source,
            },
        }
    }
}

/// AccountClient owns one authenticated session: the token, the user's
/// memberships, and the active membership that scopes company calls.
///
/// It is not meant to be shared between threads; use one client per
/// concurrent context.
#[derive(Debug)]
pub struct AccountClient {
    pub(crate) http: Client,
    pub(crate) upload_http: Client,
    pub(crate) config: Config,
    cache: SessionCache,
    token: Option<Token>,
    memberships: Vec<Membership>,
    active_membership: Option<Membership>,
}

impl AccountClient {
    /// Create an unauthenticated client. The session cache lives in
    /// `config.cache_dir` or below the home directory.
    pub fn new(config: Config) -> Result<Self> {
        let cache = SessionCache::resolve(config.cache_dir.as_deref())?;
        Self::with_cache(config, cache)
    }

    /// Create an unauthenticated client using the given cache
    pub fn with_cache(config: Config, cache: SessionCache) -> Result<Self> {
        Ok(AccountClient {
            http: create_http_client(&config)?,
            upload_http: create_upload_client(&config)?,
            config,
            cache,
            token: None,
            memberships: Vec::new(),
            active_membership: None,
        })
    }

    /// Log in against the production API, reusing a cached session when
    /// one is still valid
    pub fn login(email: &str, password: &str, cache_dir: Option<&Path>) -> Result<Self> {
        let mut config = Config::from_env();
        if let Some(dir) = cache_dir {
            config.cache_dir = Some(dir.to_path_buf());
        }
        Self::login_with_config(config, email, password)
    }

    /// Log in with an explicit configuration
    pub fn login_with_config(config: Config, email: &str, password: &str) -> Result<Self> {
        validate_credentials(email, password)?;
        let mut client = Self::new(config)?;
        client.authenticate(email, password)?;
        Ok(client)
    }

    /// Authenticate this client.
    ///
    /// A valid cached session is restored without contacting the API, so
    /// membership data may be as old as the cache. Otherwise the
    /// credentials are exchanged for a token, the memberships are fetched,
    /// and the new session is written to the cache.
    pub fn authenticate(&mut self, email: &str, password: &str) -> Result<()> {
        validate_credentials(email, password)?;

        if let Some(cached) = self.cache.load() {
            log::info!(
                "reusing cached session for account {}",
                cached.token.user_account_id
            );
            self.resume(cached);
            return Ok(());
        }

        let token = self.exchange_credentials(email, password)?;
        log::info!("logged in as account {}", token.user_account_id);
        self.token = Some(token);

        if let Err(e) = self.fetch_memberships() {
            self.reset();
            return Err(e);
        }

        self.save_cache()
    }

    fn exchange_credentials(&self, email: &str, password: &str) -> Result<Token> {
        let url = self.config.endpoint(LOGIN_PATH)?;
        let response = self
            .http
            .post(url)
            .json(&json!({
                "shopwareId": email,
                "password": password,
            }))
            .send()
            .map_err(|e| AccountError::Authentication {
                message: format!("login failed: {}", e),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.bytes().map_err(|e| AccountError::Authentication {
            message: format!("login failed: {}", e),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            log::debug!("credential exchange rejected with {}", status);
            return Err(AccountError::authentication(format!(
                "login failed: server returned {}: {}",
                status,
                String::from_utf8_lossy(&body)
            )));
        }

        let payload: Value = serde_json::from_slice(&body)
            .map_err(|e| AccountError::Parse(format!("malformed login response: {}", e)))?;
        Token::from_response(payload)
    }

    fn fetch_memberships(&mut self) -> Result<()> {
        let account_id = self.ensure_authenticated()?.user_account_id;
        let memberships: Vec<Membership> = self
            .request(Method::GET, &format!("/account/{}/memberships", account_id), None)?
            .into_list()?;

        self.active_membership = select_active(&memberships).cloned();
        log::debug!(
            "fetched {} memberships, active company {}",
            memberships.len(),
            self.active_membership.as_ref().map(|m| m.company_id()).unwrap_or(0)
        );
        self.memberships = memberships;
        Ok(())
    }

    /// Adopt a saved session as is, without contacting the API or
    /// touching the cache. An expired token is kept and rejected on use.
    pub fn resume(&mut self, cached: CachedSession) {
        self.token = Some(cached.token);
        self.memberships = cached.memberships;
        self.active_membership = cached.active_membership;
    }

    fn reset(&mut self) {
        self.token = None;
        self.memberships.clear();
        self.active_membership = None;
    }

    fn save_cache(&self) -> Result<()> {
        let token = self.ensure_authenticated()?.clone();
        self.cache.save(&CachedSession {
            token,
            memberships: self.memberships.clone(),
            active_membership: self.active_membership.clone(),
        })
    }

    /// Return the current token if it is still usable
    pub(crate) fn ensure_authenticated(&self) -> Result<&Token> {
        match &self.token {
            None => Err(AccountError::authentication(
                "not authenticated, call login() first",
            )),
            Some(token) if !token.is_valid() => Err(AccountError::authentication(
                "token expired, please login again",
            )),
            Some(token) => Ok(token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.ensure_authenticated().is_ok()
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    pub fn memberships(&self) -> &[Membership] {
        &self.memberships
    }

    pub fn active_membership(&self) -> Option<&Membership> {
        self.active_membership.as_ref()
    }

    /// Company of the active membership, 0 when there is none
    pub fn active_company_id(&self) -> i64 {
        self.active_membership
            .as_ref()
            .map(Membership::company_id)
            .unwrap_or(0)
    }

    /// Account id of the logged-in user, 0 when logged out
    pub fn user_id(&self) -> i64 {
        self.token.as_ref().map(|t| t.user_account_id).unwrap_or(0)
    }

    /// Fetch the account profile of the logged-in user
    pub fn profile(&self) -> Result<Profile> {
        let account_id = self.ensure_authenticated()?.user_account_id;
        self.request(Method::GET, &format!("/account/{}", account_id), None)?
            .apply()
    }

    /// Switch the active membership.
    ///
    /// The API is told first; local state and the cache only change once it
    /// has accepted the switch.
    pub fn change_active_membership(&mut self, membership: &Membership) -> Result<()> {
        let account_id = self.ensure_authenticated()?.user_account_id;

        self.request(
            Method::POST,
            &format!("/account/{}/memberships/change", account_id),
            Some(json!({ "membershipId": membership.id })),
        )?;

        self.active_membership = Some(membership.clone());
        log::info!("active company is now {}", membership.company_id());
        self.save_cache()
    }

    /// Resolve `(company_id, producer_id)` for the active membership.
    /// Not cached: every call asks the API.
    pub fn producer_context(&self) -> Result<(i64, i64)> {
        self.ensure_authenticated()?;

        let company_id = self.active_company_id();
        let allocations = self
            .request(Method::GET, &format!("/companies/{}/allocations", company_id), None)?
            .into_value();

        match allocations {
            Value::Array(items) if !items.is_empty() => {
                let producer_id = items[0].get("id").and_then(Value::as_i64).unwrap_or(0);
                Ok((company_id, producer_id))
            }
            _ => Err(AccountError::api(format!(
                "company {} is not unlocked as producer",
                company_id
            ))),
        }
    }

    /// Producer endpoints for the active company
    pub fn producer(&self) -> Result<ProducerEndpoint<'_>> {
        let (_, producer_id) = self.producer_context()?;
        Ok(ProducerEndpoint::new(self, producer_id))
    }

    /// Merchant endpoints for the active company
    pub fn merchant(&self) -> MerchantEndpoint<'_> {
        MerchantEndpoint::new(self)
    }

    /// Make an authenticated JSON request.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - API path, may include a query string
    /// * `body` - JSON body, if any
    ///
    /// # Returns
    /// The decoded body, or [`Payload::NoContent`] for an empty one
    pub fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Payload> {
        let token = self.ensure_authenticated()?;
        let url = self.config.endpoint(path)?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(TOKEN_HEADER, token.token.as_str());
        if let Some(body) = body {
            request = request.json(&body);
        }

        self.execute(Operation::Request, method.as_str(), path, request)
    }

    /// Send a prepared request and decode the response
    pub(crate) fn execute(
        &self,
        operation: Operation,
        method: &str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Payload> {
        let start = Instant::now();
        let response = request
            .send()
            .map_err(|e| operation.error(e.to_string(), None, None, Some(Box::new(e))))?;

        let status = response.status();
        let body = response
            .bytes()
            .map_err(|e| operation.error(e.to_string(), None, None, Some(Box::new(e))))?;

        log::debug!(
            "{} {} => {} ({} bytes) in {:?}",
            method,
            path,
            status,
            body.len(),
            start.elapsed()
        );

        if !status.is_success() {
            return Err(operation.error(
                format!("{} {} returned {}", method, path, status),
                Some(status.as_u16()),
                Some(String::from_utf8_lossy(&body).into_owned()),
                None,
            ));
        }

        Payload::from_body(&body).map_err(|e| {
            operation.error(
                format!("{} {} returned invalid JSON: {}", method, path, e),
                Some(status.as_u16()),
                Some(String::from_utf8_lossy(&body).into_owned()),
                Some(Box::new(e)),
            )
        })
    }

    /// Forget the session locally and delete the cache file.
    ///
    /// The token is not revoked on the server.
    pub fn logout(&mut self) -> Result<()> {
        self.reset();
        self.cache.clear()?;
        log::info!("logged out");
        Ok(())
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    validation::email(email, "Email")?;
    validation::not_empty(password, "Password")
}
