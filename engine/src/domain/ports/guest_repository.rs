//! Port for guest persistence. Email uniqueness is enforced here.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::guest::{EmailAddress, Guest, GuestId};

/// Errors surfaced by guest repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuestRepositoryError {
    /// Repository connection could not be established.
    #[error("guest repository connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("guest repository query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Another guest already owns this email address.
    #[error("guest email {email} is already registered")]
    DuplicateEmail {
        /// The contested address.
        email: String,
    },
}

impl GuestRepositoryError {
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

    /// Helper for uniqueness violations.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Port for reading and writing guest aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuestRepository: Send + Sync {
    /// Fetch a guest by id.
    async fn find_by_id(&self, id: &GuestId) -> Result<Option<Guest>, GuestRepositoryError>;

    /// Fetch a guest by normalised email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Guest>, GuestRepositoryError>;

    /// Persist a new guest; fails with
    /// [`GuestRepositoryError::DuplicateEmail`] when the address is taken.
    async fn insert(&self, guest: &Guest) -> Result<(), GuestRepositoryError>;

    /// Replace an existing guest record.
    async fn update(&self, guest: &Guest) -> Result<(), GuestRepositoryError>;
}

/// Fixture implementation for tests that do not exercise guests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGuestRepository;

#[async_trait]
impl GuestRepository for FixtureGuestRepository {
    async fn find_by_id(&self, _id: &GuestId) -> Result<Option<Guest>, GuestRepositoryError> {
        Ok(None)
    }

    async fn find_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<Guest>, GuestRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _guest: &Guest) -> Result<(), GuestRepositoryError> {
        Ok(())
    }

    async fn update(&self, _guest: &Guest) -> Result<(), GuestRepositoryError> {
        Ok(())
    }
}
