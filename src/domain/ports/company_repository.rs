//! Company Repository Port
//!
//! Defines the interface for storing and retrieving companies.
//! Implementations may use SQLite or in-memory storage.

use crate::domain::entities::{Company, CompanyFilter, CompanyPayload};
use async_trait::async_trait;

/// Repository failure.
///
/// Only `NotFound` is meaningful to callers; everything else is opaque.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("company not found")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }
}

/// Repository for company records.
///
/// This is an outbound port that abstracts the relational store.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert a company and return it with its assigned identifier.
    async fn create(&self, payload: CompanyPayload) -> Result<Company, RepositoryError>;

    /// Get a single company by identifier.
    async fn get(&self, id: u64) -> Result<Company, RepositoryError>;

    /// List companies matching the filter, ordered by identifier.
    async fn get_all(&self, filter: &CompanyFilter) -> Result<Vec<Company>, RepositoryError>;

    /// Overwrite the business fields of an existing company.
    async fn update(&self, company: &Company) -> Result<(), RepositoryError>;

    /// Remove a company.
    async fn delete(&self, id: u64) -> Result<(), RepositoryError>;
}
