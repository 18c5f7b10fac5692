//! Company Handlers
//!
//! Company creation (company + cost centers + accounts in one transaction)
//! and company deletion.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::DomainError;
use crate::error::AppError;
use crate::store::{
    in_transaction, AccountPayable, AccountReceivable, AccountRepository, CompanyDetails,
    CompanyRepository,
};

use super::CreateCompanyCommand;

// =========================================================================
// CreateCompanyHandler
// =========================================================================

/// Handler for company creation
pub struct CreateCompanyHandler {
    pool: PgPool,
    companies: CompanyRepository,
}

impl CreateCompanyHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            companies: CompanyRepository::new(pool.clone()),
            pool,
        }
    }

    /// Execute the create company command.
    ///
    /// Every account is attached to the first cost center of the command
    /// (or to none when no cost center is given).
    pub async fn execute(&self, command: CreateCompanyCommand) -> Result<CompanyDetails, AppError> {
        let CreateCompanyCommand {
            name,
            cost_centers,
            receivables,
            payables,
        } = command;
        let counts = (cost_centers.len(), receivables.len(), payables.len());

        let company_id = in_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let company = CompanyRepository::insert_in_tx(tx, &name).await?;

                let mut cost_center_ids = Vec::with_capacity(cost_centers.len());
                for cost_center in &cost_centers {
                    let created = CompanyRepository::insert_cost_center_in_tx(
                        tx,
                        company.id,
                        &cost_center.name,
                        cost_center.description.as_deref(),
                    )
                    .await?;
                    cost_center_ids.push(created.id);
                }

                let default_cost_center = cost_center_ids.first().copied();

                for account in &receivables {
                    AccountRepository::insert_in_tx::<AccountReceivable>(
                        tx,
                        company.id,
                        default_cost_center,
                        account,
                    )
                    .await?;
                }

                for account in &payables {
                    AccountRepository::insert_in_tx::<AccountPayable>(
                        tx,
                        company.id,
                        default_cost_center,
                        account,
                    )
                    .await?;
                }

                Ok::<_, AppError>(company.id)
            })
        })
        .await?;

        tracing::info!(
            company_id = %company_id,
            cost_centers = counts.0,
            receivables = counts.1,
            payables = counts.2,
            "Company created"
        );

        self.companies
            .find_details(company_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Company {} vanished after creation", company_id)))
    }
}

// =========================================================================
// DeleteCompanyHandler
// =========================================================================

/// Handler for company deletion (children cascade in the store)
pub struct DeleteCompanyHandler {
    companies: CompanyRepository,
}

impl DeleteCompanyHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            companies: CompanyRepository::new(pool),
        }
    }

    pub async fn execute(&self, company_id: Uuid) -> Result<(), AppError> {
        if !self.companies.delete(company_id).await? {
            return Err(DomainError::CompanyNotFound(company_id).into());
        }

        tracing::info!(company_id = %company_id, "Company deleted");
        Ok(())
    }
}
