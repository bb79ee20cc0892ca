use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::form_urlencoded;

use crate::client::{create_http_client, Config};
use crate::error::{AccountError, Result};
use crate::response::Payload;
use crate::session::Operation;
use crate::validation;

/// Installed extension to check, by technical name and version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionVersion {
    pub name: String,
    pub version: String,
}

/// Compatibility verdict for one extension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionUpdateStatus {
    pub name: String,
    pub label: String,
    pub icon_path: String,
    pub status: Value,
}

/// Ask the public update service which extensions stay compatible when
/// upgrading from `current_version` to `future_version`. Needs no login.
pub fn check_extension_updates(
    config: &Config,
    current_version: &str,
    future_version: &str,
    extensions: &[ExtensionVersion],
) -> Result<Vec<ExtensionUpdateStatus>> {
    validation::version(current_version, "Current version")?;
    validation::version(future_version, "Future version")?;

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("language", "en-GB")
        .append_pair("shopwareVersion", current_version)
        .finish();
    let path = format!("/swplatform/autoupdate?{}", query);
    let url = config.endpoint(&path)?;

    let http = create_http_client(config)?;
    let response = http
        .post(url)
        .json(&json!({
            "futureShopwareVersion": future_version,
            "plugins": extensions,
        }))
        .send()
        .map_err(|e| Operation::Request.error(e.to_string(), None, None, Some(Box::new(e))))?;

    let status = response.status();
    let body = response
        .bytes()
        .map_err(|e| Operation::Request.error(e.to_string(), None, None, Some(Box::new(e))))?;
    log::debug!("POST {} => {}", path, status);

    if !status.is_success() {
        return Err(Operation::Request.error(
            format!("POST {} returned {}", path, status),
            Some(status.as_u16()),
            Some(String::from_utf8_lossy(&body).into_owned()),
            None,
        ));
    }

    Payload::from_body(&body)
        .map_err(|e| AccountError::Parse(format!("invalid update check response: {}", e)))?
        .into_list()
}
