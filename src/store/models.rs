//! Row models
//!
//! Database rows and the nested read shapes returned by the API. All JSON
//! field names are camelCase.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::AccountStatus;

// =========================================================================
// Users
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// User with its posts, as returned by the user read endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithPosts {
    #[serde(flatten)]
    pub user: User,
    pub posts: Vec<Post>,
}

// =========================================================================
// Companies and cost centers
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Minimal company entry used by the paginated select listing
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CompanySummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CostCenter {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub company_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// =========================================================================
// Receivables and payables
// =========================================================================

/// Which of the two account tables a row lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Receivable,
    Payable,
}

impl AccountKind {
    pub fn table(self) -> &'static str {
        match self {
            AccountKind::Receivable => "accounts_receivable",
            AccountKind::Payable => "accounts_payable",
        }
    }

    /// Column holding the settlement date
    pub fn date_column(self) -> &'static str {
        match self {
            AccountKind::Receivable => "received_date",
            AccountKind::Payable => "paid_date",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AccountKind::Receivable => "Receivable",
            AccountKind::Payable => "Payable",
        }
    }

    /// Column list shared by every SELECT/RETURNING on the table
    pub fn columns(self) -> String {
        format!(
            "id, description, amount, due_date, status, {}, company_id, cost_center_id, created_at",
            self.date_column()
        )
    }
}

/// Common access to receivable and payable rows
pub trait AccountRow: for<'r> FromRow<'r, PgRow> + Serialize + Clone + Send + Unpin + 'static {
    const KIND: AccountKind;

    fn id(&self) -> Uuid;
    fn company_id(&self) -> Uuid;
    fn cost_center_id(&self) -> Option<Uuid>;
    fn status(&self) -> AccountStatus;
    fn settled_date(&self) -> Option<DateTime<Utc>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AccountReceivable {
    pub id: Uuid,
    pub description: String,
    /// Integer cents
    pub amount: i64,
    pub due_date: DateTime<Utc>,
    pub status: AccountStatus,
    pub received_date: Option<DateTime<Utc>>,
    pub company_id: Uuid,
    pub cost_center_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AccountPayable {
    pub id: Uuid,
    pub description: String,
    /// Integer cents
    pub amount: i64,
    pub due_date: DateTime<Utc>,
    pub status: AccountStatus,
    pub paid_date: Option<DateTime<Utc>>,
    pub company_id: Uuid,
    pub cost_center_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl AccountRow for AccountReceivable {
    const KIND: AccountKind = AccountKind::Receivable;

    fn id(&self) -> Uuid {
        self.id
    }
    fn company_id(&self) -> Uuid {
        self.company_id
    }
    fn cost_center_id(&self) -> Option<Uuid> {
        self.cost_center_id
    }
    fn status(&self) -> AccountStatus {
        self.status
    }
    fn settled_date(&self) -> Option<DateTime<Utc>> {
        self.received_date
    }
}

impl AccountRow for AccountPayable {
    const KIND: AccountKind = AccountKind::Payable;

    fn id(&self) -> Uuid {
        self.id
    }
    fn company_id(&self) -> Uuid {
        self.company_id
    }
    fn cost_center_id(&self) -> Option<Uuid> {
        self.cost_center_id
    }
    fn status(&self) -> AccountStatus {
        self.status
    }
    fn settled_date(&self) -> Option<DateTime<Utc>> {
        self.paid_date
    }
}

/// Validated values for a new receivable or payable row
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub description: String,
    pub amount: i64,
    pub due_date: DateTime<Utc>,
    pub status: AccountStatus,
    pub settled_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// =========================================================================
// Nested read shapes
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCenterDetails {
    #[serde(flatten)]
    pub cost_center: CostCenter,
    pub accounts_receivable: Vec<AccountReceivable>,
    pub accounts_payable: Vec<AccountPayable>,
}

/// Company with every owned child
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    #[serde(flatten)]
    pub company: Company,
    pub cost_centers: Vec<CostCenterDetails>,
    pub accounts_receivable: Vec<AccountReceivable>,
    pub accounts_payable: Vec<AccountPayable>,
}

/// Group flat child rows under their companies, preserving input order.
pub fn assemble_company_details(
    companies: Vec<Company>,
    cost_centers: Vec<CostCenter>,
    receivables: Vec<AccountReceivable>,
    payables: Vec<AccountPayable>,
) -> Vec<CompanyDetails> {
    let mut centers_by_company: HashMap<Uuid, Vec<CostCenterDetails>> = HashMap::new();
    for cost_center in cost_centers {
        let details = CostCenterDetails {
            accounts_receivable: owned_by_center(&receivables, cost_center.id),
            accounts_payable: owned_by_center(&payables, cost_center.id),
            cost_center,
        };
        centers_by_company
            .entry(details.cost_center.company_id)
            .or_default()
            .push(details);
    }

    companies
        .into_iter()
        .map(|company| CompanyDetails {
            cost_centers: centers_by_company.remove(&company.id).unwrap_or_default(),
            accounts_receivable: owned_by_company(&receivables, company.id),
            accounts_payable: owned_by_company(&payables, company.id),
            company,
        })
        .collect()
}

fn owned_by_center<A: AccountRow>(accounts: &[A], cost_center_id: Uuid) -> Vec<A> {
    accounts
        .iter()
        .filter(|a| a.cost_center_id() == Some(cost_center_id))
        .cloned()
        .collect()
}

fn owned_by_company<A: AccountRow>(accounts: &[A], company_id: Uuid) -> Vec<A> {
    accounts
        .iter()
        .filter(|a| a.company_id() == company_id)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(name: &str) -> Company {
        Company {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    fn cost_center(company_id: Uuid, name: &str) -> CostCenter {
        CostCenter {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            company_id,
            created_at: Utc::now(),
        }
    }

    fn receivable(company_id: Uuid, cost_center_id: Option<Uuid>) -> AccountReceivable {
        AccountReceivable {
            id: Uuid::new_v4(),
            description: "Invoice".to_string(),
            amount: 10_000,
            due_date: Utc::now(),
            status: AccountStatus::Pending,
            received_date: None,
            company_id,
            cost_center_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_account_kind_sql_fragments() {
        assert_eq!(AccountKind::Receivable.table(), "accounts_receivable");
        assert_eq!(AccountKind::Payable.date_column(), "paid_date");
        assert!(AccountKind::Receivable.columns().contains("received_date"));
        assert!(!AccountKind::Payable.columns().contains("received_date"));
        assert_eq!(<AccountPayable as AccountRow>::KIND, AccountKind::Payable);
    }

    #[test]
    fn test_assemble_groups_children() {
        let acme = company("Acme");
        let other = company("Other");
        let ops = cost_center(acme.id, "Ops");
        let sales = cost_center(acme.id, "Sales");
        let other_center = cost_center(other.id, "Main");

        let receivables = vec![
            receivable(acme.id, Some(ops.id)),
            receivable(acme.id, Some(ops.id)),
            receivable(acme.id, None),
            receivable(other.id, Some(other_center.id)),
        ];

        let details = assemble_company_details(
            vec![acme.clone(), other.clone()],
            vec![ops.clone(), sales.clone(), other_center.clone()],
            receivables,
            Vec::new(),
        );

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].company, acme);
        assert_eq!(details[0].cost_centers.len(), 2);
        assert_eq!(details[0].cost_centers[0].accounts_receivable.len(), 2);
        assert!(details[0].cost_centers[1].accounts_receivable.is_empty());
        assert_eq!(details[0].accounts_receivable.len(), 3);
        assert_eq!(details[1].cost_centers.len(), 1);
        assert_eq!(details[1].accounts_receivable.len(), 1);
        assert!(details[1].accounts_payable.is_empty());
    }

    #[test]
    fn test_company_details_json_shape() {
        let acme = company("Acme");
        let details = assemble_company_details(vec![acme.clone()], Vec::new(), Vec::new(), Vec::new());
        let json = serde_json::to_value(&details[0]).unwrap();

        assert_eq!(json["name"], "Acme");
        assert!(json["createdAt"].is_string());
        assert!(json["costCenters"].as_array().unwrap().is_empty());
        assert!(json["accountsReceivable"].is_array());
        assert!(json["accountsPayable"].is_array());
    }

    #[test]
    fn test_receivable_json_shape() {
        let row = receivable(Uuid::new_v4(), None);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["amount"], 10_000);
        assert_eq!(json["status"], "PENDING");
        assert!(json["receivedDate"].is_null());
        assert!(json["costCenterId"].is_null());
        assert!(json.get("paidDate").is_none());
    }
}
