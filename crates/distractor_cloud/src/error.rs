//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid parameters, grid misconfiguration, undersized sample assets, and empty inputs.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    #[error("sample asset too small: band height {required} exceeds asset height {available}")]
    AssetTooSmall { required: f32, available: f32 },

    #[error("empty input set: {0}")]
    EmptyInputSet(String),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
