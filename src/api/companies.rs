//! Company endpoints
//!
//! Companies with nested cost centers, plus the receivable and payable
//! sub-resources.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{AccountStatus, DomainError, Patch};
use crate::error::AppError;
use crate::handlers::{
    AccountDraft, AddAccountCommand, AddAccountHandler, CreateCompanyCommand, CreateCompanyHandler,
    DeleteAccountHandler, DeleteCompanyHandler, UpdateAccountStatusCommand,
    UpdateAccountStatusHandler,
};
use crate::store::{
    AccountPayable, AccountReceivable, AccountRow, CompanyDetails, CompanyRepository,
    CompanySummary,
};

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::MessageResponse;

/// Upper bound for `limit` on the select listing
const MAX_PAGE_SIZE: i64 = 100;

// =========================================================================
// Request types
// =========================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct CostCenterRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableRequest {
    pub description: String,
    /// Display amount, e.g. `R$ 1.234,56`
    pub amount: String,
    pub due_date: String,
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub received_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayableRequest {
    pub description: String,
    /// Display amount, e.g. `R$ 1.234,56`
    pub amount: String,
    pub due_date: String,
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub paid_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<ReceivableRequest> for AccountDraft {
    fn from(r: ReceivableRequest) -> Self {
        AccountDraft {
            description: r.description,
            amount: r.amount,
            due_date: r.due_date,
            status: r.status,
            settled_date: r.received_date,
            created_at: r.created_at,
        }
    }
}

impl From<PayableRequest> for AccountDraft {
    fn from(p: PayableRequest) -> Self {
        AccountDraft {
            description: p.description,
            amount: p.amount,
            due_date: p.due_date,
            status: p.status,
            settled_date: p.paid_date,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub name: String,
    #[serde(default)]
    pub cost_centers: Vec<CostCenterRequest>,
    #[serde(default)]
    pub accounts_receivable: Vec<ReceivableRequest>,
    #[serde(default)]
    pub accounts_payable: Vec<PayableRequest>,
}

impl CreateCompanyRequest {
    /// Validate every nested value before anything touches the store
    pub fn into_command(self) -> Result<CreateCompanyCommand, DomainError> {
        let now = Utc::now();
        let mut command = CreateCompanyCommand::new(self.name)?;

        for cost_center in self.cost_centers {
            command = command.with_cost_center(cost_center.name, cost_center.description)?;
        }
        for receivable in self.accounts_receivable {
            command = command.with_receivable(AccountDraft::from(receivable).validate(now)?);
        }
        for payable in self.accounts_payable {
            command = command.with_payable(AccountDraft::from(payable).validate(now)?);
        }

        Ok(command)
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReceivableRequest {
    #[serde(flatten)]
    pub account: ReceivableRequest,
    #[serde(default)]
    pub cost_center_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPayableRequest {
    #[serde(flatten)]
    pub account: PayableRequest,
    #[serde(default)]
    pub cost_center_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReceivableRequest {
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub received_date: Patch<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayableRequest {
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub paid_date: Patch<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub search: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

// =========================================================================
// Response types
// =========================================================================

#[derive(Debug, Serialize)]
pub struct CompaniesResponse {
    pub companies: Vec<CompanyDetails>,
}

#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub company: CompanyDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectResponse {
    pub companies: Vec<CompanySummary>,
    pub total: i64,
    pub has_more: bool,
    pub next_page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ReceivableResponse {
    pub message: &'static str,
    pub receivable: AccountReceivable,
}

#[derive(Debug, Serialize)]
pub struct PayableResponse {
    pub message: &'static str,
    pub payable: AccountPayable,
}

// =========================================================================
// Pagination
// =========================================================================

/// Validated page window for the select listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub skip: i64,
    pub take: i64,
}

impl PageWindow {
    pub fn new(page: i64, limit: i64) -> Result<Self, AppError> {
        if page < 1 {
            return Err(AppError::InvalidInput("page must be at least 1".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(AppError::InvalidInput(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let skip = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| AppError::InvalidInput("page out of range".to_string()))?;

        Ok(Self {
            page,
            skip,
            take: limit,
        })
    }

    /// `(has_more, next_page)` after fetching `returned` rows of `total`
    pub fn continuation(&self, returned: usize, total: i64) -> (bool, Option<i64>) {
        let has_more = self.skip + (returned as i64) < total;
        (has_more, has_more.then_some(self.page + 1))
    }
}

// =========================================================================
// Company handlers
// =========================================================================

/// GET /companies
pub async fn list_companies(
    State(pool): State<PgPool>,
) -> Result<Json<CompaniesResponse>, AppError> {
    let companies = CompanyRepository::new(pool).list_details().await?;
    Ok(Json(CompaniesResponse { companies }))
}

/// GET /companies/select
pub async fn select_companies(
    State(pool): State<PgPool>,
    ApiQuery(query): ApiQuery<SelectQuery>,
) -> Result<Json<SelectResponse>, AppError> {
    let window = PageWindow::new(query.page, query.limit)?;
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let page = CompanyRepository::new(pool)
        .select_page(search, window.skip, window.take)
        .await?;

    let (has_more, next_page) = window.continuation(page.companies.len(), page.total);

    Ok(Json(SelectResponse {
        companies: page.companies,
        total: page.total,
        has_more,
        next_page,
    }))
}

/// GET /companies/:id
pub async fn get_company(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<CompanyResponse>, AppError> {
    let company = CompanyRepository::new(pool)
        .find_details(id)
        .await?
        .ok_or(DomainError::CompanyNotFound(id))?;

    Ok(Json(CompanyResponse {
        message: None,
        company,
    }))
}

/// POST /companies
pub async fn create_company(
    State(pool): State<PgPool>,
    ApiJson(request): ApiJson<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), AppError> {
    let command = request.into_command()?;

    let company = CreateCompanyHandler::new(pool)
        .execute(command)
        .await
        .map_err(AppError::write_failure("Failed to create company"))?;

    Ok((
        StatusCode::CREATED,
        Json(CompanyResponse {
            message: Some("Company created successfully"),
            company,
        }),
    ))
}

/// DELETE /companies/:id
pub async fn delete_company(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    DeleteCompanyHandler::new(pool)
        .execute(id)
        .await
        .map_err(AppError::write_failure("Failed to delete company"))?;

    Ok(Json(MessageResponse {
        message: "Company deleted successfully",
    }))
}

// =========================================================================
// Receivable handlers
// =========================================================================

/// POST /companies/:id/receivables
pub async fn add_receivable(
    State(pool): State<PgPool>,
    ApiPath(company_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<AddReceivableRequest>,
) -> Result<(StatusCode, Json<ReceivableResponse>), AppError> {
    let command = add_command(request.account.into(), request.cost_center_id)?;

    let receivable = add_account::<AccountReceivable>(pool, company_id, command)
        .await
        .map_err(AppError::write_failure("Failed to add receivable"))?;

    Ok((
        StatusCode::CREATED,
        Json(ReceivableResponse {
            message: "Receivable added successfully",
            receivable,
        }),
    ))
}

/// PATCH /companies/:id/receivables/:account_id
pub async fn update_receivable(
    State(pool): State<PgPool>,
    ApiPath((company_id, account_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(request): ApiJson<UpdateReceivableRequest>,
) -> Result<Json<ReceivableResponse>, AppError> {
    let command = UpdateAccountStatusCommand::parse(request.status, request.received_date)?;

    let receivable = UpdateAccountStatusHandler::new(pool)
        .execute::<AccountReceivable>(company_id, account_id, command)
        .await
        .map_err(AppError::write_failure("Failed to update receivable"))?;

    Ok(Json(ReceivableResponse {
        message: "Receivable updated successfully",
        receivable,
    }))
}

/// DELETE /companies/:id/receivables/:account_id
pub async fn delete_receivable(
    State(pool): State<PgPool>,
    ApiPath((company_id, account_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, AppError> {
    DeleteAccountHandler::new(pool)
        .execute::<AccountReceivable>(company_id, account_id)
        .await
        .map_err(AppError::write_failure("Failed to delete receivable"))?;

    Ok(Json(MessageResponse {
        message: "Receivable deleted successfully",
    }))
}

// =========================================================================
// Payable handlers
// =========================================================================

/// POST /companies/:id/payables
pub async fn add_payable(
    State(pool): State<PgPool>,
    ApiPath(company_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<AddPayableRequest>,
) -> Result<(StatusCode, Json<PayableResponse>), AppError> {
    let command = add_command(request.account.into(), request.cost_center_id)?;

    let payable = add_account::<AccountPayable>(pool, company_id, command)
        .await
        .map_err(AppError::write_failure("Failed to add payable"))?;

    Ok((
        StatusCode::CREATED,
        Json(PayableResponse {
            message: "Payable added successfully",
            payable,
        }),
    ))
}

/// PATCH /companies/:id/payables/:account_id
pub async fn update_payable(
    State(pool): State<PgPool>,
    ApiPath((company_id, account_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(request): ApiJson<UpdatePayableRequest>,
) -> Result<Json<PayableResponse>, AppError> {
    let command = UpdateAccountStatusCommand::parse(request.status, request.paid_date)?;

    let payable = UpdateAccountStatusHandler::new(pool)
        .execute::<AccountPayable>(company_id, account_id, command)
        .await
        .map_err(AppError::write_failure("Failed to update payable"))?;

    Ok(Json(PayableResponse {
        message: "Payable updated successfully",
        payable,
    }))
}

/// DELETE /companies/:id/payables/:account_id
pub async fn delete_payable(
    State(pool): State<PgPool>,
    ApiPath((company_id, account_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, AppError> {
    DeleteAccountHandler::new(pool)
        .execute::<AccountPayable>(company_id, account_id)
        .await
        .map_err(AppError::write_failure("Failed to delete payable"))?;

    Ok(Json(MessageResponse {
        message: "Payable deleted successfully",
    }))
}

// =========================================================================
// Helpers
// =========================================================================

fn add_command(draft: AccountDraft, cost_center_id: Option<Uuid>) -> Result<AddAccountCommand, AppError> {
    let command = AddAccountCommand::new(draft.validate(Utc::now())?);
    Ok(match cost_center_id {
        Some(id) => command.with_cost_center(id),
        None => command,
    })
}

async fn add_account<A: AccountRow>(
    pool: PgPool,
    company_id: Uuid,
    command: AddAccountCommand,
) -> Result<A, AppError> {
    AddAccountHandler::new(pool).execute::<A>(company_id, command).await
}
