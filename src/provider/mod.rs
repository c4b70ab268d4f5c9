//! External movie catalog.
//!
//! The core only sees [`MovieProvider`] and the loosely typed
//! [`ProviderRecord`] it returns; mapping into [`crate::models::Movie`] happens
//! in the movie service.

pub mod omdb;
#[cfg(test)]
pub mod stub;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::AppError;

pub use omdb::OmdbProvider;

/// A record as reported by the provider. Only `id` is guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub id: String,
    pub kind: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub cover_url: Option<String>,
    pub rating: Option<f64>,
    pub genres: Option<Vec<String>>,
    pub directors: Option<Vec<Person>>,
    pub synopsis: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
}

#[derive(Debug)]
pub enum ProviderError {
    /// Network failure, timeout or non-success HTTP status.
    Transport(String),
    /// The provider answered with something we could not interpret.
    Malformed(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Transport(msg) => write!(f, "Provider transport error: {}", msg),
            ProviderError::Malformed(msg) => write!(f, "Malformed provider response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::OperationFailed(e.to_string())
    }
}

#[async_trait]
pub trait MovieProvider: Send + Sync {
    /// Free-text title search. Results carry no detail fields.
    async fn search(&self, title: &str) -> Result<Vec<ProviderRecord>, ProviderError>;

    /// Full record for an external id, `None` if the provider does not know it.
    async fn fetch_by_id(&self, external_id: &str) -> Result<Option<ProviderRecord>, ProviderError>;
}
