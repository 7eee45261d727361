//! Turning a captured image handle into upload bytes.

use std::{path::Path, str::FromStr};

use anyhow::bail;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use shared::{domain::ImageHandle, protocol::IMAGE_CONTENT_TYPE};

use crate::error::UploadError;

/// How image bytes are placed in the multipart body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadEncoding {
    /// The file bytes as they are.
    #[default]
    Raw,
    /// `data:image/jpg;base64,...` text.
    #[serde(alias = "base64", alias = "data_uri")]
    Base64DataUri,
}

impl FromStr for PayloadEncoding {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "base64" | "base64_data_uri" | "data_uri" => Ok(Self::Base64DataUri),
            other => bail!("unknown payload encoding '{other}'"),
        }
    }
}

pub fn encode_payload(encoding: PayloadEncoding, bytes: Vec<u8>) -> Vec<u8> {
    match encoding {
        PayloadEncoding::Raw => bytes,
        PayloadEncoding::Base64DataUri => {
            format!("data:{IMAGE_CONTENT_TYPE};base64,{}", STANDARD.encode(bytes)).into_bytes()
        }
    }
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn load(&self, image: &ImageHandle) -> Result<Vec<u8>, UploadError>;
}

/// Reads images from the local filesystem; `file://` URIs are accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageSource {
    encoding: PayloadEncoding,
}

impl FileImageSource {
    pub fn new(encoding: PayloadEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> PayloadEncoding {
        self.encoding
    }
}

fn local_path(uri: &str) -> &Path {
    Path::new(uri.strip_prefix("file://").unwrap_or(uri))
}

#[async_trait]
impl ImageSource for FileImageSource {
    async fn load(&self, image: &ImageHandle) -> Result<Vec<u8>, UploadError> {
        let bytes = tokio::fs::read(local_path(image.uri()))
            .await
            .map_err(|source| UploadError::ReadImage {
                uri: image.uri().to_string(),
                source,
            })?;
        Ok(encode_payload(self.encoding, bytes))
    }
}
