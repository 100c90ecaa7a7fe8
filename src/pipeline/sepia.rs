use std::time::Duration;

use reqwest::{Client, Url};
use tracing::warn;

use crate::capture::Photo;
use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// Environment variable consulted when no API key is configured
const API_KEY_ENV: &str = "PIXELIXE_API_KEY";

/// Client for the sepia transform service
///
/// Sends the uploaded photo's URL and desired output format as query
/// parameters; the response body is the transformed image's raw bytes.
/// Any non-2xx response, transport error, or undecodable body maps to
/// [`PipelineError::TransformFailed`].
pub struct SepiaClient {
    http: Client,
    config: PipelineConfig,
    api_key: Option<String>,
}

impl SepiaClient {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::TransformFailed { reason: e.to_string() })?;

        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok());

        if api_key.is_none() {
            warn!("No sepia API key configured ({} unset), transform requests will be unauthenticated", API_KEY_ENV);
        }

        Ok(Self { http, config, api_key })
    }

    /// Build the transform endpoint for a given image URL
    pub(crate) fn endpoint(&self, image_url: &str) -> Result<Url, PipelineError> {
        let mut url = Url::parse(&self.config.sepia_url)
            .map_err(|e| PipelineError::TransformFailed { reason: e.to_string() })?;

        url.query_pairs_mut()
            .append_pair("imageUrl", image_url)
            .append_pair("imageType", &self.config.image_type);

        Ok(url)
    }

    /// Request the sepia-transformed version of an uploaded photo
    pub async fn transform(&self, image_url: &str) -> Result<Photo, PipelineError> {
        let mut request = self.http.get(self.endpoint(image_url)?);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PipelineError::TransformFailed { reason: e.to_string() })?;

        if !response.status().is_success() {
            return Err(PipelineError::TransformFailed {
                reason: format!("transform service returned {}", response.status()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PipelineError::TransformFailed { reason: e.to_string() })?;

        Photo::from_bytes(&bytes)
            .map_err(|e| PipelineError::TransformFailed { reason: e.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SepiaClient {
        SepiaClient::new(PipelineConfig {
            api_key: Some("test-key".to_string()),
            ..PipelineConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_encodes_image_url() {
        let client = client();
        let url = client
            .endpoint("https://res.example.com/snapify/photo 1.png")
            .unwrap();

        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(query[0].0, "imageUrl");
        assert_eq!(query[0].1, "https://res.example.com/snapify/photo 1.png");
        assert_eq!(query[1], ("imageType".to_string(), "jpg".to_string()));
        // The raw query string must not leak unencoded spaces
        assert!(!url.query().unwrap().contains(' '));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let client = SepiaClient::new(PipelineConfig {
            sepia_url: "not a url".to_string(),
            api_key: Some("k".to_string()),
            ..PipelineConfig::default()
        })
        .unwrap();

        assert!(client.endpoint("https://example.com/a.png").is_err());
    }
}
