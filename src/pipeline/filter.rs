use async_trait::async_trait;

use crate::capture::Photo;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::{SepiaClient, UploadClient};

/// The two-stage remote filter seam
///
/// The booth spawns one filter call per captured photo, fire-and-forget
/// relative to the scheduler. Implementations must be safe to share across
/// those tasks.
#[async_trait]
pub trait FilterPipeline: Send + Sync {
    /// Produce the sepia version of a raw photo
    async fn filter(&self, photo: &Photo) -> Result<Photo, PipelineError>;
}

/// Production pipeline: upload to the storage service, then request the
/// sepia transform of the stored URL
pub struct RemoteFilterPipeline {
    upload: UploadClient,
    sepia: SepiaClient,
}

impl RemoteFilterPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        Ok(Self {
            upload: UploadClient::new(config.clone())?,
            sepia: SepiaClient::new(config)?,
        })
    }
}

#[async_trait]
impl FilterPipeline for RemoteFilterPipeline {
    async fn filter(&self, photo: &Photo) -> Result<Photo, PipelineError> {
        let url = self.upload.upload(photo).await?;
        self.sepia.transform(&url).await
    }
}
