//! Company Service - Main application use case
//!
//! Orchestrates company CRUD over the repository and payload validation.
//! This is the primary interface for the HTTP inbound adapter.

use crate::domain::entities::{Company, CompanyFilter, CompanyPayload};
use crate::domain::ports::{CompanyRepository, FieldError, PayloadValidator, RepositoryError};
use std::sync::Arc;

/// Company service - main application use case.
pub struct CompanyService {
    repo: Arc<dyn CompanyRepository>,
    validator: Arc<dyn PayloadValidator>,
}

impl CompanyService {
    pub fn new(repo: Arc<dyn CompanyRepository>, validator: Arc<dyn PayloadValidator>) -> Self {
        Self { repo, validator }
    }

    /// Run the payload rules. An empty result means the payload is valid.
    pub fn validate(&self, payload: &CompanyPayload) -> Vec<FieldError> {
        self.validator.validate(payload)
    }

    pub async fn create(&self, payload: CompanyPayload) -> Result<Company, RepositoryError> {
        let company = self.repo.create(payload).await?;
        tracing::info!(id = company.id, name = %company.name, "company created");
        Ok(company)
    }

    pub async fn get(&self, id: u64) -> Result<Company, RepositoryError> {
        self.repo.get(id).await
    }

    pub async fn list(&self, filter: &CompanyFilter) -> Result<Vec<Company>, RepositoryError> {
        self.repo.get_all(filter).await
    }

    /// Replace the business fields of `existing` with the payload.
    ///
    /// The identifier of `existing` is kept.
    pub async fn update(
        &self,
        existing: &Company,
        payload: CompanyPayload,
    ) -> Result<Company, RepositoryError> {
        let updated = payload.into_company(existing.id);
        self.repo.update(&updated).await?;
        tracing::info!(id = updated.id, "company updated");
        Ok(updated)
    }

    pub async fn delete(&self, company: &Company) -> Result<(), RepositoryError> {
        self.repo.delete(company.id).await?;
        tracing::info!(id = company.id, "company removed");
        Ok(())
    }
}
