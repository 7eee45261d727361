//! Client side of the shopping cart: photo classification and the capture flow.

use async_trait::async_trait;
use shared::{domain::ImageHandle, protocol::ClassifyOutcome};

pub mod config;
pub mod error;
pub mod image;
pub mod session;
mod upload;

pub use config::{load_settings, load_settings_from, Settings};
pub use error::UploadError;
pub use image::{FileImageSource, ImageSource, PayloadEncoding};
pub use session::{CaptureOutcome, CaptureRejected, CaptureState, CaptureTicket, CartSession};
pub use upload::UploadClient;

/// Anything that can name the food in a photo and quote its price.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: &ImageHandle) -> Result<ClassifyOutcome, UploadError>;
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod upload_tests;

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod session_tests;

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
