use reqwest::Method;
use serde_json::{json, Value};
use std::path::Path;
use url::form_urlencoded;

use crate::error::Result;
use crate::models::{BinaryReviewResult, Extension, ExtensionBinary, ExtensionImage, Producer};
use crate::response::Payload;
use crate::session::AccountClient;
use crate::validation;

/// Filters for listing extensions
#[derive(Debug, Clone)]
pub struct ExtensionQuery {
    pub limit: u32,
    pub offset: u32,
    pub order_by: Option<String>,
    pub order_sequence: Option<String>,
    pub search: Option<String>,
}

impl Default for ExtensionQuery {
    fn default() -> Self {
        ExtensionQuery {
            limit: 50,
            offset: 0,
            order_by: None,
            order_sequence: None,
            search: None,
        }
    }
}

/// Binary metadata sent when updating an uploaded release
#[derive(Debug, Clone, Default)]
pub struct BinaryInfo {
    pub software_versions: Vec<String>,
    pub ion_cube_encrypted: bool,
    pub license_check_required: bool,
    pub changelogs: Vec<Value>,
}

/// Extension management for the producer of the active company
pub struct ProducerEndpoint<'a> {
    client: &'a AccountClient,
    producer_id: i64,
}

impl<'a> ProducerEndpoint<'a> {
    pub fn new(client: &'a AccountClient, producer_id: i64) -> Self {
        ProducerEndpoint {
            client,
            producer_id,
        }
    }

    pub fn producer_id(&self) -> i64 {
        self.producer_id
    }

    fn get(&self, path: &str) -> Result<Payload> {
        self.client.request(Method::GET, path, None)
    }

    pub fn profile(&self) -> Result<Producer> {
        let producers: Vec<Producer> = self
            .get(&format!(
                "/producers?companyId={}",
                self.client.active_company_id()
            ))?
            .into_list()?;
        Ok(producers.into_iter().next().unwrap_or_default())
    }

    pub fn extensions(&self, query: &ExtensionQuery) -> Result<Vec<Extension>> {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params
            .append_pair("producerId", &self.producer_id.to_string())
            .append_pair("limit", &query.limit.to_string())
            .append_pair("offset", &query.offset.to_string());
        for (key, value) in [
            ("orderBy", &query.order_by),
            ("orderSequence", &query.order_sequence),
            ("search", &query.search),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                params.append_pair(key, value);
            }
        }

        self.get(&format!("/plugins?{}", params.finish()))?
            .into_list()
    }

    /// Find an extension by its exact technical name
    pub fn extension_by_name(&self, name: &str) -> Result<Option<Extension>> {
        validation::not_empty(name, "Extension name")?;

        let query = ExtensionQuery {
            limit: 1,
            search: Some(name.to_string()),
            ..ExtensionQuery::default()
        };
        Ok(self
            .extensions(&query)?
            .into_iter()
            .find(|extension| extension.name == name))
    }

    pub fn extension_by_id(&self, id: i64) -> Result<Extension> {
        self.get(&format!("/plugins/{}", id))?.apply()
    }

    pub fn update_extension(&self, extension: &Extension) -> Result<()> {
        self.client.request(
            Method::PUT,
            &format!("/plugins/{}", extension.id),
            Some(serde_json::to_value(extension)?),
        )?;
        Ok(())
    }

    /// Selectable platform versions of a generation (`classic`, ...)
    pub fn software_versions(&self, generation: &str) -> Result<Value> {
        let filter = json!([
            {"property": "parent", "value": null},
            {"property": "selectable", "value": true},
            {"property": "name", "value": generation, "operator": "LIKE"},
        ]);
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("filter", &filter.to_string())
            .finish();

        Ok(self
            .get(&format!("/pluginstatics/softwareVersions?{}", query))?
            .into_value())
    }

    /// Static lookup data: categories, statuses, locales and so on
    pub fn extension_general_info(&self) -> Result<Value> {
        Ok(self.get("/pluginstatics/all")?.into_value())
    }

    pub fn extension_binaries(&self, extension_id: i64) -> Result<Vec<ExtensionBinary>> {
        self.get(&self.binaries_path(extension_id))?.into_list()
    }

    pub fn create_extension_binary(
        &self,
        extension_id: i64,
        version: &str,
        software_versions: &[String],
        changelogs: &[Value],
    ) -> Result<ExtensionBinary> {
        validation::positive(extension_id, "Extension ID")?;
        validation::version(version, "Version")?;
        validation::not_empty_list(software_versions, "Software versions")?;

        self.client
            .request(
                Method::POST,
                &self.binaries_path(extension_id),
                Some(json!({
                    "version": version,
                    "softwareVersions": software_versions,
                    "changelogs": changelogs,
                })),
            )?
            .apply()
    }

    pub fn update_extension_binary_info(
        &self,
        extension_id: i64,
        binary_id: i64,
        info: &BinaryInfo,
    ) -> Result<()> {
        validation::positive(extension_id, "Extension ID")?;
        validation::positive(binary_id, "Binary ID")?;

        self.client.request(
            Method::PUT,
            &format!("{}/{}", self.binaries_path(extension_id), binary_id),
            Some(json!({
                "id": binary_id,
                "softwareVersions": info.software_versions,
                "ionCubeEncrypted": info.ion_cube_encrypted,
                "licenseCheckRequired": info.license_check_required,
                "changelogs": info.changelogs,
            })),
        )?;
        Ok(())
    }

    /// Upload the ZIP archive of a binary
    pub fn upload_extension_binary_file(
        &self,
        extension_id: i64,
        binary_id: i64,
        zip_path: &Path,
    ) -> Result<()> {
        validation::positive(extension_id, "Extension ID")?;
        validation::positive(binary_id, "Binary ID")?;
        validation::file_readable(zip_path, "ZIP file")?;

        self.client.upload_file(
            &format!("{}/{}/file", self.binaries_path(extension_id), binary_id),
            zip_path,
        )?;
        Ok(())
    }

    /// Upload the store icon as is; the API expects 256x256
    pub fn update_extension_icon(&self, extension_id: i64, icon_path: &Path) -> Result<()> {
        validation::positive(extension_id, "Extension ID")?;
        self.client
            .upload_file(&format!("/plugins/{}/icon", extension_id), icon_path)?;
        Ok(())
    }

    pub fn extension_images(&self, extension_id: i64) -> Result<Vec<ExtensionImage>> {
        self.get(&format!("/plugins/{}/pictures", extension_id))?
            .into_list()
    }

    pub fn add_extension_image(&self, extension_id: i64, image_path: &Path) -> Result<ExtensionImage> {
        validation::positive(extension_id, "Extension ID")?;
        self.client
            .upload_file(&format!("/plugins/{}/pictures", extension_id), image_path)?
            .apply()
    }

    pub fn update_extension_image(&self, extension_id: i64, image: &ExtensionImage) -> Result<()> {
        self.client.request(
            Method::PUT,
            &format!("/plugins/{}/pictures/{}", extension_id, image.id),
            Some(serde_json::to_value(image)?),
        )?;
        Ok(())
    }

    pub fn delete_extension_image(&self, extension_id: i64, image_id: i64) -> Result<()> {
        self.client.request(
            Method::DELETE,
            &format!("/plugins/{}/pictures/{}", extension_id, image_id),
            None,
        )?;
        Ok(())
    }

    /// Start the automatic code review of the latest binary
    pub fn trigger_code_review(&self, extension_id: i64) -> Result<()> {
        self.client.request(
            Method::POST,
            &format!("/plugins/{}/reviews", extension_id),
            None,
        )?;
        Ok(())
    }

    pub fn binary_review_results(
        &self,
        extension_id: i64,
        binary_id: i64,
    ) -> Result<Vec<BinaryReviewResult>> {
        self.get(&format!(
            "/plugins/{}/binaries/{}/checkresults",
            extension_id, binary_id
        ))?
        .into_list()
    }

    fn binaries_path(&self, extension_id: i64) -> String {
        format!(
            "/producers/{}/plugins/{}/binaries",
            self.producer_id, extension_id
        )
    }
}
