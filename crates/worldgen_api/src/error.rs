//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! incomplete builders, negative-producing amounts, invalid configuration,
//! catalog registration failures, and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("illegal state: required settings left unset: {}", .missing.join(", "))]
    IllegalState { missing: Vec<&'static str> },

    #[error("'{field}' cannot be negative (distribution lower bound is {min})")]
    NegativeAmount { field: &'static str, min: f64 },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown catalog type '{id}'")]
    UnknownCatalogType { id: String },

    #[error("catalog type '{id}' is already registered")]
    DuplicateCatalogType { id: String },

    #[error("registry is frozen; cannot register '{id}'")]
    RegistryFrozen { id: String },

    #[error("{0} has not been initialized")]
    NotInitialized(&'static str),

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
