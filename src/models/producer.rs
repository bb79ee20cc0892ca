use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Producer (extension vendor) profile of a company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Producer {
    pub id: i64,
    pub prefix: String,
    pub name: String,
    pub website: String,
    pub icon_path: String,
    pub icon_is_set: bool,
    #[serde(rename = "shopwareID")]
    pub shopware_id: String,
    pub user_id: i64,
    pub company_id: i64,
    pub company_name: String,
    pub sale_mail: String,
    pub support_mail: String,
    pub rating_mail: String,
    pub supported_languages: Vec<Value>,
    #[serde(rename = "iconURL")]
    pub icon_url: String,
    pub has_support_info_activated: bool,
    pub is_premium_extension_partner: bool,
    pub details: Vec<Value>,
}
