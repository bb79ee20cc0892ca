use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Account profile of the logged-in user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub creation_date: String,
    pub banned: bool,
    pub verified: bool,
    pub personal_data: Value,
    pub partner_marketing_opt_in: bool,
    pub selected_membership: Option<Value>,
}
