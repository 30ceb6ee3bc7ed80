//! Port for generating guest-facing confirmation codes.
//!
//! Generators only need to be collision-resistant, not collision-free:
//! the booking repository's uniqueness backstop catches the rare clash
//! and the workflow retries with a fresh code.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::booking::ConfirmationCode;

/// Errors surfaced by confirmation-code generators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfirmationCodesError {
    /// The generator could not produce a valid code.
    #[error("confirmation code generation failed: {message}")]
    Generation {
        /// Generator-supplied failure description.
        message: String,
    },
}

impl ConfirmationCodesError {
    /// Helper for generation failures.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }
}

/// Port for minting short, collision-resistant booking references.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationCodes: Send + Sync {
    /// Produce a fresh confirmation code.
    async fn generate(&self) -> Result<ConfirmationCode, ConfirmationCodesError>;
}

/// Fixture implementation returning a constant code.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureConfirmationCodes;

#[async_trait]
impl ConfirmationCodes for FixtureConfirmationCodes {
    async fn generate(&self) -> Result<ConfirmationCode, ConfirmationCodesError> {
        ConfirmationCode::new("FIXTURE1")
            .map_err(|err| ConfirmationCodesError::generation(err.to_string()))
    }
}
