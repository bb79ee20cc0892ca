use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Review result type id of a passed automatic review
const TYPE_SUCCEEDED: i64 = 3;
/// Review result type id of a review still running
const TYPE_PENDING: i64 = 4;

/// Outcome of the automatic code review of an extension binary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BinaryReviewResult {
    pub id: i64,
    pub binary_id: i64,
    #[serde(rename = "type")]
    pub result_type: Value,
    pub message: String,
    pub creation_date: String,
    pub sub_check_results: Vec<Value>,
}

impl BinaryReviewResult {
    fn type_id(&self) -> Option<i64> {
        self.result_type.get("id").and_then(Value::as_i64)
    }

    pub fn has_passed(&self) -> bool {
        self.type_id() == Some(TYPE_SUCCEEDED)
            || self
                .result_type
                .get("name")
                .and_then(Value::as_str)
                .map(|name| name.eq_ignore_ascii_case("automaticcodereviewsucceeded"))
                .unwrap_or(false)
    }

    pub fn is_pending(&self) -> bool {
        self.type_id() == Some(TYPE_PENDING)
    }

    /// Any sub-check reported warnings
    pub fn has_warnings(&self) -> bool {
        self.sub_check_results
            .iter()
            .any(|r| r.get("hasWarnings").and_then(Value::as_bool).unwrap_or(false))
    }

    /// One `subCheck: message` line per failed sub-check, markup removed
    pub fn summary(&self) -> String {
        self.sub_check_results
            .iter()
            .filter(|r| !r.get("passed").and_then(Value::as_bool).unwrap_or(false))
            .map(|r| {
                let check = r.get("subCheck").and_then(Value::as_str).unwrap_or("Unknown");
                let message = r.get("message").and_then(Value::as_str).unwrap_or("No message");
                format!("{}: {}", check, strip_tags(message))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn strip_tags(text: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("static tag pattern"))
        .replace_all(text, "")
        .into_owned()
}
