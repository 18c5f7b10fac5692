//! Receivable / Payable Handlers
//!
//! Adding, re-statusing and deleting accounts of an existing company. The
//! handlers are generic over the row type so receivables and payables share
//! one code path.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{format_amount, resolve_settled_date, DomainError};
use crate::error::AppError;
use crate::store::{AccountRepository, AccountRow, CompanyRepository};

use super::{AddAccountCommand, UpdateAccountStatusCommand};

// =========================================================================
// AddAccountHandler
// =========================================================================

/// Handler for adding an account to an existing company
pub struct AddAccountHandler {
    companies: CompanyRepository,
    accounts: AccountRepository,
}

impl AddAccountHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            companies: CompanyRepository::new(pool.clone()),
            accounts: AccountRepository::new(pool),
        }
    }

    /// Execute the add account command.
    ///
    /// The company lookup and the insert are separate statements; a company
    /// deleted in between surfaces as a foreign-key failure on insert.
    pub async fn execute<A: AccountRow>(
        &self,
        company_id: Uuid,
        command: AddAccountCommand,
    ) -> Result<A, AppError> {
        if !self.companies.exists(company_id).await? {
            return Err(DomainError::CompanyNotFound(company_id).into());
        }

        let cost_center_id = match command.cost_center_id {
            Some(cost_center_id) => {
                if !self
                    .companies
                    .cost_center_belongs_to(company_id, cost_center_id)
                    .await?
                {
                    return Err(DomainError::CostCenterNotFound {
                        company_id,
                        cost_center_id,
                    }
                    .into());
                }
                Some(cost_center_id)
            }
            None => self.companies.first_cost_center_id(company_id).await?,
        };

        let account: A = self
            .accounts
            .insert(company_id, cost_center_id, &command.account)
            .await?;

        tracing::info!(
            kind = A::KIND.label(),
            company_id = %company_id,
            account_id = %account.id(),
            amount = %format_amount(command.account.amount),
            "Account added"
        );

        Ok(account)
    }
}

// =========================================================================
// UpdateAccountStatusHandler
// =========================================================================

/// Handler for status / settlement-date updates
pub struct UpdateAccountStatusHandler {
    accounts: AccountRepository,
}

impl UpdateAccountStatusHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    pub async fn execute<A: AccountRow>(
        &self,
        company_id: Uuid,
        account_id: Uuid,
        command: UpdateAccountStatusCommand,
    ) -> Result<A, AppError> {
        let not_found = || DomainError::AccountNotFound {
            kind: A::KIND.label(),
            company_id,
            account_id,
        };

        let current: A = self
            .accounts
            .find_in_company(company_id, account_id)
            .await?
            .ok_or_else(not_found)?;

        let settled_date = resolve_settled_date(
            current.status(),
            current.settled_date(),
            command.status,
            command.settled_date,
            Utc::now(),
        );

        let updated: A = self
            .accounts
            .update_status(company_id, account_id, command.status, settled_date)
            .await?
            .ok_or_else(not_found)?;

        tracing::info!(
            kind = A::KIND.label(),
            company_id = %company_id,
            account_id = %account_id,
            from = %current.status(),
            to = %updated.status(),
            "Account status updated"
        );

        Ok(updated)
    }
}

// =========================================================================
// DeleteAccountHandler
// =========================================================================

/// Handler for account deletion
pub struct DeleteAccountHandler {
    accounts: AccountRepository,
}

impl DeleteAccountHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    pub async fn execute<A: AccountRow>(&self, company_id: Uuid, account_id: Uuid) -> Result<(), AppError> {
        if !self.accounts.delete::<A>(company_id, account_id).await? {
            return Err(DomainError::AccountNotFound {
                kind: A::KIND.label(),
                company_id,
                account_id,
            }
            .into());
        }

        tracing::info!(
            kind = A::KIND.label(),
            company_id = %company_id,
            account_id = %account_id,
            "Account deleted"
        );
        Ok(())
    }
}
