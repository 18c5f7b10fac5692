//! Company Repository
//!
//! Companies, their cost centers, and the nested company read model.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::accounts::AccountRepository;
use super::models::{
    assemble_company_details, AccountPayable, AccountReceivable, Company, CompanyDetails,
    CompanySummary, CostCenter,
};

/// One page of the company select listing
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyPage {
    pub companies: Vec<CompanySummary>,
    pub total: i64,
}

/// Data access for companies and cost centers
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: PgPool,
    accounts: AccountRepository,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            pool,
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<Company, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO companies (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn insert_cost_center_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        company_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<CostCenter, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO cost_centers (id, name, description, company_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, company_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(company_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Delete a company; children cascade. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn exists(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM companies WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    /// Oldest cost center of the company, the default target for new accounts
    pub async fn first_cost_center_id(&self, company_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT id FROM cost_centers
            WHERE company_id = $1
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn cost_center_belongs_to(
        &self,
        company_id: Uuid,
        cost_center_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM cost_centers WHERE id = $1 AND company_id = $2)",
        )
        .bind(cost_center_id)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Every company with nested children
    pub async fn list_details(&self) -> Result<Vec<CompanyDetails>, sqlx::Error> {
        let companies: Vec<Company> =
            sqlx::query_as("SELECT id, name, created_at FROM companies ORDER BY created_at, id")
                .fetch_all(&self.pool)
                .await?;

        self.load_children(companies).await
    }

    /// One company with nested children
    pub async fn find_details(&self, id: Uuid) -> Result<Option<CompanyDetails>, sqlx::Error> {
        let company: Option<Company> =
            sqlx::query_as("SELECT id, name, created_at FROM companies WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(company) = company else {
            return Ok(None);
        };

        Ok(self.load_children(vec![company]).await?.pop())
    }

    /// Paginated id/name listing with an optional case-insensitive name filter
    pub async fn select_page(
        &self,
        search: Option<&str>,
        skip: i64,
        take: i64,
    ) -> Result<CompanyPage, sqlx::Error> {
        let pattern = search.map(|s| format!("%{}%", escape_like(s)));

        let companies: Vec<CompanySummary> = sqlx::query_as(
            r#"
            SELECT id, name
            FROM companies
            WHERE ($1::text IS NULL OR name ILIKE $1)
            ORDER BY name, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(take)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM companies WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(CompanyPage { companies, total })
    }

    async fn load_children(&self, companies: Vec<Company>) -> Result<Vec<CompanyDetails>, sqlx::Error> {
        if companies.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = companies.iter().map(|c| c.id).collect();

        let cost_centers: Vec<CostCenter> = sqlx::query_as(
            r#"
            SELECT id, name, description, company_id, created_at
            FROM cost_centers
            WHERE company_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let receivables = self.accounts.list_for_companies::<AccountReceivable>(&ids).await?;
        let payables = self.accounts.list_for_companies::<AccountPayable>(&ids).await?;

        Ok(assemble_company_details(companies, cost_centers, receivables, payables))
    }
}

/// Escape LIKE wildcards so user input matches literally
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("acme"), "acme");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\dir"), "c:\\\\dir");
    }
}
