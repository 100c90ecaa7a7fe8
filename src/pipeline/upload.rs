use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capture::Photo;
use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// Unsigned-upload request body the storage service expects
#[derive(Debug, Serialize)]
pub(crate) struct UploadRequest<'a> {
    pub file: &'a str,
    pub upload_preset: &'a str,
    pub folder: &'a str,
}

/// Success response from the storage service
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Client for the image storage service
///
/// Posts the photo as a base64 data URI and returns the publicly fetchable
/// URL the service assigns. Any non-2xx response or transport error maps to
/// [`PipelineError::UploadFailed`].
pub struct UploadClient {
    http: Client,
    config: PipelineConfig,
}

impl UploadClient {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::UploadFailed { reason: e.to_string() })?;

        Ok(Self { http, config })
    }

    /// Upload a photo, returning its remote URL
    pub async fn upload(&self, photo: &Photo) -> Result<String, PipelineError> {
        let data_uri = photo
            .to_data_uri()
            .map_err(|e| PipelineError::UploadFailed { reason: e.to_string() })?;

        let body = UploadRequest {
            file: &data_uri,
            upload_preset: &self.config.upload_preset,
            folder: &self.config.upload_folder,
        };

        let response = self
            .http
            .post(&self.config.upload_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::UploadFailed { reason: e.to_string() })?;

        if !response.status().is_success() {
            return Err(PipelineError::UploadFailed {
                reason: format!("upload service returned {}", response.status()),
            });
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::UploadFailed { reason: e.to_string() })?;

        debug!("Uploaded photo: {}", body.secure_url);
        Ok(body.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_request_shape() {
        let body = UploadRequest {
            file: "data:image/png;base64,AAAA",
            upload_preset: "snapify",
            folder: "snapify",
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["file"], "data:image/png;base64,AAAA");
        assert_eq!(value["upload_preset"], "snapify");
        assert_eq!(value["folder"], "snapify");
    }
}
