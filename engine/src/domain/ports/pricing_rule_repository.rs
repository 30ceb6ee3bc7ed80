//! Port for pricing-rule persistence.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::apartment::ApartmentId;
use crate::domain::pricing_rule::{PricingRule, PricingRuleId};

/// Errors surfaced by pricing-rule repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingRuleRepositoryError {
    /// Repository connection could not be established.
    #[error("pricing rule repository connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("pricing rule repository query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl PricingRuleRepositoryError {
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

/// Port for reading and writing pricing rules.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PricingRuleRepository: Send + Sync {
    /// List the active rules for an apartment (resolution input).
    async fn list_active_for_apartment(
        &self,
        apartment_id: &ApartmentId,
    ) -> Result<Vec<PricingRule>, PricingRuleRepositoryError>;

    /// List every rule for an apartment, active or not.
    async fn list_for_apartment(
        &self,
        apartment_id: &ApartmentId,
    ) -> Result<Vec<PricingRule>, PricingRuleRepositoryError>;

    /// Persist a new rule.
    async fn insert(&self, rule: &PricingRule) -> Result<(), PricingRuleRepositoryError>;

    /// Replace an existing rule.
    async fn update(&self, rule: &PricingRule) -> Result<(), PricingRuleRepositoryError>;

    /// Delete a rule.
    async fn delete(&self, id: &PricingRuleId) -> Result<(), PricingRuleRepositoryError>;
}

/// Fixture implementation for tests that do not exercise pricing rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePricingRuleRepository;

#[async_trait]
impl PricingRuleRepository for FixturePricingRuleRepository {
    async fn list_active_for_apartment(
        &self,
        _apartment_id: &ApartmentId,
    ) -> Result<Vec<PricingRule>, PricingRuleRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_apartment(
        &self,
        _apartment_id: &ApartmentId,
    ) -> Result<Vec<PricingRule>, PricingRuleRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _rule: &PricingRule) -> Result<(), PricingRuleRepositoryError> {
        Ok(())
    }

    async fn update(&self, _rule: &PricingRule) -> Result<(), PricingRuleRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &PricingRuleId) -> Result<(), PricingRuleRepositoryError> {
        Ok(())
    }
}
