use serde::{Deserialize, Serialize};

use crate::{domain::Price, error::PriceError};

/// Multipart field carrying the photo.
pub const IMAGE_FIELD: &str = "image";
pub const IMAGE_FILENAME: &str = "upload.jpg";
pub const IMAGE_CONTENT_TYPE: &str = "image/jpg";
/// Value the classifier reports when it cannot name the food or its price.
pub const UNKNOWN: &str = "unknown";

/// Raw JSON reply of the classification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub food: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub food: String,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClassifyOutcome {
    Match(Classification),
    NonMatch,
}

impl ClassifyResponse {
    pub fn is_non_match(&self) -> bool {
        self.food == UNKNOWN || self.price == UNKNOWN
    }

    pub fn into_outcome(self) -> Result<ClassifyOutcome, PriceError> {
        if self.is_non_match() {
            return Ok(ClassifyOutcome::NonMatch);
        }

        let price = self.price.parse()?;
        Ok(ClassifyOutcome::Match(Classification {
            food: self.food,
            price,
        }))
    }
}
