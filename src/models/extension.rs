use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Store extension (plugin) as returned by `/plugins`. Sent back whole on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Extension {
    pub id: i64,
    pub producer: Value,
    #[serde(rename = "type")]
    pub extension_type: Value,
    pub name: String,
    pub code: String,
    pub module_key: String,
    pub lifecycle_status: Value,
    pub generation: Value,
    pub activation_status: Value,
    pub approval_status: Value,
    pub standard_locale: Value,
    pub license: Value,
    pub infos: Vec<Value>,
    pub price_models: Vec<Value>,
    pub variants: Vec<Value>,
    pub store_availabilities: Vec<Value>,
    pub categories: Vec<Value>,
    pub category: Option<Value>,
    pub addons: Vec<Value>,
    pub last_change: String,
    pub creation_date: String,
    pub support: bool,
    pub support_only_commercial: bool,
    pub icon_path: String,
    pub icon_is_set: bool,
    pub example_page_url: String,
    pub migration_support: bool,
    pub automatic_bugfix_version_compatibility: bool,
    pub hidden_in_store: bool,
    pub is_premium_plugin: bool,
    pub is_advanced_feature: bool,
}

/// Uploaded release archive of an extension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionBinary {
    pub id: i64,
    pub name: String,
    pub version: String,
    pub status: Value,
    pub compatible_software_versions: Vec<Value>,
    pub changelogs: Vec<Value>,
    pub creation_date: String,
    pub last_change_date: String,
    pub ion_cube_encrypted: bool,
    pub license_check_required: bool,
    pub has_active_code_review_warnings: bool,
}

/// Store picture of an extension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionImage {
    pub id: i64,
    pub remote_link: String,
    pub details: Vec<Value>,
    pub priority: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extension_round_trip_field_names() {
        let extension: Extension = serde_json::from_value(json!({
            "id": 10,
            "name": "AcmeSearch",
            "type": {"id": 2, "name": "plugin"},
            "moduleKey": "acme",
            "category": null,
            "isPremiumPlugin": true
        }))
        .unwrap();

        assert_eq!(extension.name, "AcmeSearch");
        assert!(extension.is_premium_plugin);
        assert!(extension.category.is_none());

        let json = serde_json::to_value(&extension).unwrap();
        assert_eq!(json["type"]["name"], "plugin");
        assert_eq!(json["moduleKey"], "acme");
        assert_eq!(json["automaticBugfixVersionCompatibility"], false);
    }

    #[test]
    fn test_binary_and_image_defaults() {
        let binary: ExtensionBinary =
            serde_json::from_value(json!({"id": 5, "version": "1.2.0"})).unwrap();
        assert_eq!(binary.version, "1.2.0");
        assert!(!binary.ion_cube_encrypted);

        let image: ExtensionImage =
            serde_json::from_value(json!({"id": 8, "remoteLink": "https://img"})).unwrap();
        assert_eq!(image.priority, 0);
        assert_eq!(serde_json::to_value(&image).unwrap()["remoteLink"], "https://img");
    }
}
