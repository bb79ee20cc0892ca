use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shop registered by a merchant company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MerchantShop {
    pub id: i64,
    pub domain: String,
    #[serde(rename = "type")]
    pub shop_type: String,
    pub company_id: i64,
    pub company_name: String,
    pub dispo: i64,
    pub balance: f64,
    pub is_partner_shop: bool,
    pub subaccount: Option<i64>,
    pub is_commercial: bool,
    pub document_comment: String,
    pub activated: bool,
    pub account_id: String,
    pub shop_number: String,
    pub creation_date: String,
    pub subscription_modules: Vec<Value>,
    pub environment: Value,
    pub staging: bool,
    pub instance: bool,
    pub mandant: bool,
    pub shopware_version: Value,
    pub shopware_edition: String,
    pub domain_idn: String,
}

impl MerchantShop {
    /// Match against the shop domain or its IDN form
    pub fn matches_domain(&self, domain: &str) -> bool {
        self.domain == domain || self.domain_idn == domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matches_domain() {
        let shop: MerchantShop = serde_json::from_value(json!({
            "id": 1,
            "domain": "xn--mller-kva.example",
            "domainIdn": "müller.example",
            "type": "partner",
            "balance": 12.5
        }))
        .unwrap();

        assert!(shop.matches_domain("müller.example"));
        assert!(shop.matches_domain("xn--mller-kva.example"));
        assert!(!shop.matches_domain("example.com"));
        assert_eq!(shop.shop_type, "partner");
        assert_eq!(shop.subaccount, None);
    }
}
