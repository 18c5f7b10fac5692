//! Domain Error Types
//!
//! Validation and lookup failures that don't depend on the web layer.

use thiserror::Error;
use uuid::Uuid;

use super::AmountError;

/// Domain-specific errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Amount string could not be converted to cents
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),

    /// Date string could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Required field missing or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Company not found: {0}")]
    CompanyNotFound(Uuid),

    #[error("Cost center {cost_center_id} not found in company {company_id}")]
    CostCenterNotFound { company_id: Uuid, cost_center_id: Uuid },

    #[error("{kind} {account_id} not found in company {company_id}")]
    AccountNotFound {
        kind: &'static str,
        company_id: Uuid,
        account_id: Uuid,
    },

    #[error("User not found: {0}")]
    UserNotFound(Uuid),
}

impl DomainError {
    /// Check if this is a lookup failure
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CompanyNotFound(_)
                | Self::CostCenterNotFound { .. }
                | Self::AccountNotFound { .. }
                | Self::UserNotFound(_)
        )
    }
}
