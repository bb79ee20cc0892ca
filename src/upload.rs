use reqwest::blocking::multipart::Form;
use std::path::Path;

use crate::error::Result;
use crate::response::Payload;
use crate::session::{AccountClient, Operation, TOKEN_HEADER};
use crate::validation;

/// Default multipart field name of the uploaded file
pub const DEFAULT_FILE_FIELD: &str = "file";

impl AccountClient {
    /// Upload a local file as multipart form data under the `file` field
    pub fn upload_file(&self, path: &str, file_path: &Path) -> Result<Payload> {
        self.upload_file_with(path, file_path, DEFAULT_FILE_FIELD, &[])
    }

    /// Upload a local file as multipart form data.
    ///
    /// # Arguments
    /// * `path` - API path to POST to
    /// * `file_path` - local file, streamed as the file part
    /// * `field_name` - name of the file part
    /// * `extra_fields` - additional string parts
    ///
    /// The file is checked before anything is sent: an unreadable path is a
    /// validation error and no request is made.
    pub fn upload_file_with(
        &self,
        path: &str,
        file_path: &Path,
        field_name: &str,
        extra_fields: &[(&str, &str)],
    ) -> Result<Payload> {
        validation::file_readable(file_path, "Upload file")?;

        let token = self.ensure_authenticated()?;
        let url = self.config.endpoint(path)?;

        let mut form = Form::new().file(field_name.to_string(), file_path).map_err(|e| {
            Operation::Upload.error(
                format!("cannot open {}: {}", file_path.display(), e),
                None,
                None,
                Some(Box::new(e)),
            )
        })?;
        for (name, value) in extra_fields {
            form = form.text(name.to_string(), value.to_string());
        }

        log::debug!("uploading {} to {}", file_path.display(), path);

        let request = self
            .upload_http
            .post(url)
            .header(TOKEN_HEADER, token.token.as_str())
            .multipart(form);

        self.execute(Operation::Upload, "POST", path, request)
    }
}
