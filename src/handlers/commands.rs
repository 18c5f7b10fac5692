//! Command definitions
//!
//! Commands represent intentions to change the system state. Raw client
//! strings are validated into store-ready values here, before any
//! transaction is opened.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    initial_settled_date, parse_amount, parse_date, parse_optional_date, AccountStatus, DomainError,
    Patch,
};
use crate::store::NewAccount;

// =========================================================================
// Account drafts
// =========================================================================

/// Unvalidated receivable/payable fields as the client sent them
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDraft {
    pub description: String,
    /// Display amount, e.g. `R$ 1.234,56`
    pub amount: String,
    pub due_date: String,
    pub status: Option<AccountStatus>,
    /// Received date for receivables, paid date for payables
    pub settled_date: Option<String>,
    pub created_at: Option<String>,
}

impl AccountDraft {
    pub fn new(description: String, amount: String, due_date: String) -> Self {
        Self {
            description,
            amount,
            due_date,
            status: None,
            settled_date: None,
            created_at: None,
        }
    }

    pub fn with_status(mut self, status: AccountStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_settled_date(mut self, settled_date: String) -> Self {
        self.settled_date = Some(settled_date);
        self
    }

    pub fn with_created_at(mut self, created_at: String) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Convert amount and dates, apply the default status and make sure a
    /// PAID account carries a settlement date.
    pub fn validate(self, now: DateTime<Utc>) -> Result<NewAccount, DomainError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(DomainError::MissingField("description"));
        }

        let amount = parse_amount(&self.amount)?;
        let due_date = parse_date(&self.due_date)?;
        let settled_date = parse_optional_date(self.settled_date.as_deref())?;
        let created_at = parse_optional_date(self.created_at.as_deref())?.unwrap_or(now);
        let status = self.status.unwrap_or_default();

        Ok(NewAccount {
            description: description.to_string(),
            amount,
            due_date,
            status,
            settled_date: initial_settled_date(status, settled_date, now),
            created_at,
        })
    }
}

// =========================================================================
// CreateCompanyCommand
// =========================================================================

/// Cost center to create together with its company
#[derive(Debug, Clone, PartialEq)]
pub struct NewCostCenter {
    pub name: String,
    pub description: Option<String>,
}

/// Command to create a company with its cost centers and accounts in one go
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCompanyCommand {
    pub name: String,
    pub cost_centers: Vec<NewCostCenter>,
    pub receivables: Vec<NewAccount>,
    pub payables: Vec<NewAccount>,
}

impl CreateCompanyCommand {
    pub fn new(name: String) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::MissingField("name"));
        }

        Ok(Self {
            name: name.to_string(),
            cost_centers: Vec::new(),
            receivables: Vec::new(),
            payables: Vec::new(),
        })
    }

    pub fn with_cost_center(
        mut self,
        name: String,
        description: Option<String>,
    ) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::MissingField("costCenters.name"));
        }

        self.cost_centers.push(NewCostCenter {
            name: name.to_string(),
            description,
        });
        Ok(self)
    }

    pub fn with_receivable(mut self, account: NewAccount) -> Self {
        self.receivables.push(account);
        self
    }

    pub fn with_payable(mut self, account: NewAccount) -> Self {
        self.payables.push(account);
        self
    }
}

// =========================================================================
// Account commands
// =========================================================================

/// Command to add a receivable or payable to an existing company
#[derive(Debug, Clone, PartialEq)]
pub struct AddAccountCommand {
    pub account: NewAccount,
    /// Target cost center; the company's first cost center when absent
    pub cost_center_id: Option<Uuid>,
}

impl AddAccountCommand {
    pub fn new(account: NewAccount) -> Self {
        Self {
            account,
            cost_center_id: None,
        }
    }

    pub fn with_cost_center(mut self, cost_center_id: Uuid) -> Self {
        self.cost_center_id = Some(cost_center_id);
        self
    }
}

/// Command to change an account's status and/or settlement date
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAccountStatusCommand {
    pub status: Option<AccountStatus>,
    pub settled_date: Patch<DateTime<Utc>>,
}

impl UpdateAccountStatusCommand {
    /// Build from raw payload values, parsing the date if one was sent
    pub fn parse(
        status: Option<AccountStatus>,
        settled_date: Patch<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            status,
            settled_date: settled_date.try_map(|s| parse_date(&s))?,
        })
    }
}
