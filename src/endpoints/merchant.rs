use reqwest::Method;

use crate::error::Result;
use crate::models::MerchantShop;
use crate::session::AccountClient;
use crate::validation;

/// Shops and composer tokens of the active company
pub struct MerchantEndpoint<'a> {
    client: &'a AccountClient,
}

impl<'a> MerchantEndpoint<'a> {
    pub fn new(client: &'a AccountClient) -> Self {
        MerchantEndpoint { client }
    }

    /// List the shops of the active company (first 100)
    pub fn shops(&self) -> Result<Vec<MerchantShop>> {
        let company_id = self.client.active_company_id();
        self.client
            .request(
                Method::GET,
                &format!("/shops?limit=100&userId={}", company_id),
                None,
            )?
            .into_list()
    }

    /// Find a shop by domain or IDN domain
    pub fn shop_by_domain(&self, domain: &str) -> Result<Option<MerchantShop>> {
        Ok(self
            .shops()?
            .into_iter()
            .find(|shop| shop.matches_domain(domain)))
    }

    pub fn composer_token(&self, shop_id: i64) -> Result<String> {
        let payload = self
            .client
            .request(Method::GET, &self.packages_token_path(shop_id), None)?;
        Ok(payload.get_str("token").unwrap_or_default().to_string())
    }

    /// Ask the API to generate a new composer token
    pub fn generate_composer_token(&self, shop_id: i64) -> Result<String> {
        let payload = self
            .client
            .request(Method::POST, &self.packages_token_path(shop_id), None)?;
        Ok(payload.get_str("token").unwrap_or_default().to_string())
    }

    pub fn save_composer_token(&self, shop_id: i64, token: &str) -> Result<()> {
        validation::path_segment(token, "Composer token")?;
        self.client.request(
            Method::POST,
            &format!("{}/{}", self.packages_token_path(shop_id), token),
            None,
        )?;
        Ok(())
    }

    fn packages_token_path(&self, shop_id: i64) -> String {
        format!(
            "/companies/{}/shops/{}/packagestoken",
            self.client.active_company_id(),
            shop_id
        )
    }
}
