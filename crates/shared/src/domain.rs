use std::{fmt, str::FromStr};

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::error::PriceError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ProposalId);

/// Digits allowed on either side of the decimal point.
pub const MAX_PRICE_DIGITS: usize = 18;

/// A non-negative decimal price that keeps the text form it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price {
    amount: BigDecimal,
    text: String,
}

impl Price {
    pub fn amount(&self) -> &BigDecimal {
        &self.amount
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(PriceError::Empty);
        }

        // Plain `digits[.digits]` only, no exponent forms.
        let unsigned = text.strip_prefix('-').unwrap_or(text);
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(PriceError::NotANumber(text.to_string()));
        }
        if whole.len() > MAX_PRICE_DIGITS || fraction.len() > MAX_PRICE_DIGITS {
            return Err(PriceError::OutOfRange(text.to_string()));
        }

        let amount = BigDecimal::from_str(text)
            .map_err(|_| PriceError::NotANumber(text.to_string()))?;
        if amount < BigDecimal::from(0) {
            return Err(PriceError::Negative(text.to_string()));
        }

        Ok(Self {
            amount,
            text: text.to_string(),
        })
    }
}

impl TryFrom<String> for Price {
    type Error = PriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Price> for String {
    fn from(value: Price) -> Self {
        value.text
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Exact sum of prices, displayed with two decimal places.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Total(BigDecimal);

impl Total {
    pub fn zero() -> Self {
        Self(BigDecimal::from(0))
    }

    pub fn of<'a>(prices: impl IntoIterator<Item = &'a Price>) -> Self {
        Self(
            prices
                .into_iter()
                .fold(BigDecimal::from(0), |acc, price| acc + price.amount()),
        )
    }

    pub fn amount(&self) -> &BigDecimal {
        &self.0
    }

    pub fn add(&mut self, price: &Price) {
        self.0 = &self.0 + price.amount();
    }

    pub fn subtract(&mut self, price: &Price) {
        self.0 = &self.0 - price.amount();
    }
}

impl Default for Total {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Total {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Totals are non-negative: adding half a cent then truncating rounds half-up.
        let half_cent = BigDecimal::new(5.into(), 3);
        write!(f, "{}", (&self.0 + &half_cent).with_scale(2))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub food: String,
    pub price: Price,
    #[serde(rename = "imageUri", default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
}

impl Item {
    pub fn new(food: impl Into<String>, price: Price) -> Self {
        Self {
            food: food.into(),
            price,
            image_uri: None,
        }
    }

    pub fn with_image(mut self, uri: impl Into<String>) -> Self {
        self.image_uri = Some(uri.into());
        self
    }
}

/// Opaque reference to a captured image, usually a file path or URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub String);

impl ImageHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn uri(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    Granted,
    Denied,
    #[default]
    Undetermined,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    #[default]
    Back,
    Front,
}

impl CameraFacing {
    pub fn toggled(self) -> Self {
        match self {
            Self::Back => Self::Front,
            Self::Front => Self::Back,
        }
    }
}
