//! Receivable / Payable Repository
//!
//! One implementation serves both account tables; the row type picks the
//! table and the settlement-date column through `AccountRow::KIND`.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::AccountStatus;

use super::models::{AccountRow, NewAccount};

/// Data access for receivables and payables
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an account row inside an open transaction
    pub async fn insert_in_tx<A: AccountRow>(
        tx: &mut Transaction<'_, Postgres>,
        company_id: Uuid,
        cost_center_id: Option<Uuid>,
        account: &NewAccount,
    ) -> Result<A, sqlx::Error> {
        sqlx::query_as::<_, A>(&insert_sql(A::KIND))
            .bind(Uuid::new_v4())
            .bind(&account.description)
            .bind(account.amount)
            .bind(account.due_date)
            .bind(account.status)
            .bind(account.settled_date)
            .bind(company_id)
            .bind(cost_center_id)
            .bind(account.created_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert an account row as a standalone statement
    pub async fn insert<A: AccountRow>(
        &self,
        company_id: Uuid,
        cost_center_id: Option<Uuid>,
        account: &NewAccount,
    ) -> Result<A, sqlx::Error> {
        sqlx::query_as::<_, A>(&insert_sql(A::KIND))
            .bind(Uuid::new_v4())
            .bind(&account.description)
            .bind(account.amount)
            .bind(account.due_date)
            .bind(account.status)
            .bind(account.settled_date)
            .bind(company_id)
            .bind(cost_center_id)
            .bind(account.created_at)
            .fetch_one(&self.pool)
            .await
    }

    /// Find an account that belongs to the given company
    pub async fn find_in_company<A: AccountRow>(
        &self,
        company_id: Uuid,
        account_id: Uuid,
    ) -> Result<Option<A>, sqlx::Error> {
        let kind = A::KIND;
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1 AND company_id = $2",
            kind.columns(),
            kind.table()
        );

        sqlx::query_as::<_, A>(&sql)
            .bind(account_id)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// All accounts of the given companies, ordered by due date
    pub async fn list_for_companies<A: AccountRow>(
        &self,
        company_ids: &[Uuid],
    ) -> Result<Vec<A>, sqlx::Error> {
        if company_ids.is_empty() {
            return Ok(Vec::new());
        }

        let kind = A::KIND;
        let sql = format!(
            "SELECT {} FROM {} WHERE company_id = ANY($1) ORDER BY due_date, created_at, id",
            kind.columns(),
            kind.table()
        );

        sqlx::query_as::<_, A>(&sql)
            .bind(company_ids)
            .fetch_all(&self.pool)
            .await
    }

    /// Write status and settlement date. `status = None` keeps the stored status.
    pub async fn update_status<A: AccountRow>(
        &self,
        company_id: Uuid,
        account_id: Uuid,
        status: Option<AccountStatus>,
        settled_date: Option<DateTime<Utc>>,
    ) -> Result<Option<A>, sqlx::Error> {
        let kind = A::KIND;
        let sql = format!(
            r#"
            UPDATE {table}
            SET status = COALESCE($3, status),
                {date} = $4
            WHERE id = $1 AND company_id = $2
            RETURNING {columns}
            "#,
            table = kind.table(),
            date = kind.date_column(),
            columns = kind.columns()
        );

        sqlx::query_as::<_, A>(&sql)
            .bind(account_id)
            .bind(company_id)
            .bind(status)
            .bind(settled_date)
            .fetch_optional(&self.pool)
            .await
    }

    /// Delete an account under the given company. Returns whether a row was removed.
    pub async fn delete<A: AccountRow>(
        &self,
        company_id: Uuid,
        account_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let kind = A::KIND;
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 AND company_id = $2",
            kind.table()
        );

        let result = sqlx::query(&sql)
            .bind(account_id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn insert_sql(kind: super::models::AccountKind) -> String {
    format!(
        r#"
        INSERT INTO {table}
            (id, description, amount, due_date, status, {date}, company_id, cost_center_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {columns}
        "#,
        table = kind.table(),
        date = kind.date_column(),
        columns = kind.columns()
    )
}
