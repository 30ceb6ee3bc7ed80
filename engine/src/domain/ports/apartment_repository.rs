//! Port for apartment persistence.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::apartment::{Apartment, ApartmentId};

/// Errors surfaced by apartment repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApartmentRepositoryError {
    /// Repository connection could not be established.
    #[error("apartment repository connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("apartment repository query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl ApartmentRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for reading and writing apartment aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApartmentRepository: Send + Sync {
    /// Fetch an apartment by id.
    async fn find_by_id(
        &self,
        id: &ApartmentId,
    ) -> Result<Option<Apartment>, ApartmentRepositoryError>;

    /// List apartments open for new bookings.
    async fn list_active(&self) -> Result<Vec<Apartment>, ApartmentRepositoryError>;

    /// Persist a new apartment.
    async fn insert(&self, apartment: &Apartment) -> Result<(), ApartmentRepositoryError>;

    /// Replace an existing apartment record.
    async fn update(&self, apartment: &Apartment) -> Result<(), ApartmentRepositoryError>;

    /// Delete an apartment, cascading to its bookings and pricing rules
    /// (a booking cannot outlive its apartment).
    async fn delete(&self, id: &ApartmentId) -> Result<(), ApartmentRepositoryError>;
}

/// Fixture implementation for tests that do not exercise apartments.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureApartmentRepository;

#[async_trait]
impl ApartmentRepository for FixtureApartmentRepository {
    async fn find_by_id(
        &self,
        _id: &ApartmentId,
    ) -> Result<Option<Apartment>, ApartmentRepositoryError> {
        Ok(None)
    }

    async fn list_active(&self) -> Result<Vec<Apartment>, ApartmentRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _apartment: &Apartment) -> Result<(), ApartmentRepositoryError> {
        Ok(())
    }

    async fn update(&self, _apartment: &Apartment) -> Result<(), ApartmentRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &ApartmentId) -> Result<(), ApartmentRepositoryError> {
        Ok(())
    }
}
