use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price is empty")]
    Empty,
    #[error("price '{0}' is not a decimal number")]
    NotANumber(String),
    #[error("price '{0}' has too many digits")]
    OutOfRange(String),
    #[error("price '{0}' is negative")]
    Negative(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("item index {index} is out of range for a list of {len} items")]
    IndexOutOfRange { index: usize, len: usize },
}
