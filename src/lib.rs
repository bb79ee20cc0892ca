//! # shopware-account-api - Shopware account API client for Rust
//!
//! A blocking client for the Shopware account API. It logs in with account
//! credentials, keeps the session in a local cache between runs, resolves
//! the active company and producer, and exposes authenticated JSON requests
//! and multipart uploads that the resource facades build on.
//!
//! ## Features
//!
//! - Credential exchange with token expiry tracking
//! - Session cache (`~/.cache/shopware-account-api/token.json`, owner-only)
//!   that skips the login call while the cached token is valid
//! - Membership and producer context resolution
//! - Typed errors separating validation, authentication, API and upload failures
//! - Merchant and producer facades with typed records
//!
//! ## Basic Usage
//!
//! ```no_run
//! use shopware_account_api::AccountClient;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AccountClient::login("dev@example.com", "secret", None)?;
//!
//!     println!("active company: {}", client.active_company_id());
//!     for shop in client.merchant().shops()? {
//!         println!("{} ({})", shop.domain, shop.id);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Producer workflow
//!
//! ```no_run
//! use shopware_account_api::{AccountClient, Config};
//! use std::path::Path;
//!
//! let config = Config::from_env().with_cache_dir("/tmp/sw-cache");
//! let client = AccountClient::login_with_config(config, "dev@example.com", "secret")?;
//!
//! let producer = client.producer()?;
//! if let Some(extension) = producer.extension_by_name("AcmeSearch")? {
//!     let binary = producer.create_extension_binary(
//!         extension.id,
//!         "1.4.0",
//!         &["6.5.0.0".to_string()],
//!         &[],
//!     )?;
//!     producer.upload_extension_binary_file(extension.id, binary.id, Path::new("AcmeSearch.zip"))?;
//! }
//! # Ok::<(), shopware_account_api::AccountError>(())
//! ```

pub mod cache;
pub mod client;
pub mod compatibility;
pub mod endpoints;
pub mod error;
pub mod membership;
pub mod models;
pub mod response;
pub mod session;
pub mod time;
pub mod token;
pub mod upload;
pub mod validation;

// Re-export main types for convenience
pub use cache::{CachedSession, SessionCache};
pub use client::Config;
pub use compatibility::{check_extension_updates, ExtensionUpdateStatus, ExtensionVersion};
pub use endpoints::{BinaryInfo, ExtensionQuery, MerchantEndpoint, ProducerEndpoint};
pub use error::{AccountError, Result};
pub use membership::{Company, Membership, Role};
pub use response::Payload;
pub use session::AccountClient;
pub use time::Expiry;
pub use token::Token;

// Re-export for building request methods and bodies
pub use reqwest::Method;
pub use serde_json::json;
