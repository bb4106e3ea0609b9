use async_trait::async_trait;
use shared::error::ErrorCode;
use shared::models::{Customer, CustomerCreate, CustomerUpdate};

use super::PgStore;
use crate::db::repository::{CustomerRepository, RepoError, RepoResult};

const COLUMNS: &str = "id, first_name, last_name, address, email, phone, total_spent";

#[async_trait]
impl CustomerRepository for PgStore {
    async fn list_customers(&self) -> RepoResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {COLUMNS} FROM customers ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_customer(&self, id: i64) -> RepoResult<Option<Customer>> {
        let row = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_customer(&self, data: &CustomerCreate) -> RepoResult<Customer> {
        let row = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (first_name, last_name, address, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.address)
        .bind(&data.email)
        .bind(&data.phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_customer(&self, id: i64, data: &CustomerUpdate) -> RepoResult<Customer> {
        let row = sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                address = COALESCE($4, address),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone)
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.address)
        .bind(&data.email)
        .bind(&data.phone)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| RepoError::not_found(ErrorCode::CustomerNotFound, "Customer", id))
    }

    async fn delete_customer(&self, id: i64) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM customers WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(RepoError::not_found(ErrorCode::CustomerNotFound, "Customer", id));
        }

        let (sales,): (i64,) = sqlx::query_as(
            r#"
            SELECT (SELECT COUNT(*) FROM sales WHERE customer_id = $1)
                 + (SELECT COUNT(*) FROM product_sales WHERE customer_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if sales > 0 {
            return Err(RepoError::Conflict(
                ErrorCode::CustomerHasSales,
                format!("Customer {id} has associated sales"),
            ));
        }

        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
