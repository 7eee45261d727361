use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    domain::ImageHandle,
    protocol::{ClassifyOutcome, ClassifyResponse, IMAGE_CONTENT_TYPE, IMAGE_FIELD, IMAGE_FILENAME},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    config::Settings,
    error::UploadError,
    image::{FileImageSource, ImageSource},
    ImageClassifier,
};

/// Sends one photo per call to the classification endpoint.
///
/// There is no retry and no timeout: a request runs until the server answers
/// or the connection fails.
pub struct UploadClient {
    http: Client,
    endpoint: Url,
    images: Arc<dyn ImageSource>,
}

impl UploadClient {
    pub fn new(endpoint: Url, images: Arc<dyn ImageSource>) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            images,
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self::new(
            settings.endpoint()?,
            Arc::new(FileImageSource::new(settings.payload_encoding)),
        ))
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post_image(&self, payload: Vec<u8>) -> Result<ClassifyResponse, UploadError> {
        let size_bytes = payload.len();
        let part = Part::bytes(payload)
            .file_name(IMAGE_FILENAME)
            .mime_str(IMAGE_CONTENT_TYPE)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        debug!(endpoint = %self.endpoint, size_bytes, "upload: posting image");
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn classify_image(&self, image: &ImageHandle) -> Result<ClassifyOutcome, UploadError> {
        let payload = self.images.load(image).await?;
        let reply = self.post_image(payload).await?;
        info!(
            image = %image,
            food = %reply.food,
            price = %reply.price,
            "upload: classification received"
        );
        Ok(reply.into_outcome()?)
    }
}

#[async_trait]
impl ImageClassifier for UploadClient {
    async fn classify(&self, image: &ImageHandle) -> Result<ClassifyOutcome, UploadError> {
        let result = self.classify_image(image).await;
        if let Err(err) = &result {
            warn!(image = %image, error = %err, "upload: classification failed");
        }
        result
    }
}
