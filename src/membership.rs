use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::nullable;

/// Membership links the logged-in user to a company. At most one membership
/// is active per session and it scopes company and producer calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: i64,

    /// Creation timestamp, passed through verbatim
    #[serde(default, deserialize_with = "nullable")]
    pub creation_date: String,

    #[serde(default, deserialize_with = "nullable")]
    pub active: bool,

    /// Member reference, opaque
    #[serde(default, deserialize_with = "nullable")]
    pub member: Map<String, Value>,

    #[serde(default, deserialize_with = "nullable")]
    pub company: Company,

    #[serde(default, deserialize_with = "nullable")]
    pub roles: Vec<Role>,
}

/// Company reference of a membership
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "nullable")]
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Membership {
    /// Names of the roles held in this membership
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn company_id(&self) -> i64 {
        self.company.id
    }
}

/// Pick the active membership: the first one flagged active wins, any
/// later active flags are ignored.
pub fn select_active(memberships: &[Membership]) -> Option<&Membership> {
    memberships.iter().find(|m| m.active)
}
