use async_trait::async_trait;
use shared::error::ErrorCode;
use shared::models::Sale;

use super::PgStore;
use crate::db::repository::{NewSale, RepoError, RepoResult, SaleRepository};

#[async_trait]
impl SaleRepository for PgStore {
    async fn list_sales(&self) -> RepoResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, Sale>(
            "SELECT id, customer_id, watch_id, sale_date, sale_price FROM sales ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn record_sale(&self, new: &NewSale) -> RepoResult<Sale> {
        let mut tx = self.pool.begin().await?;

        // Row lock: a concurrent sale of the same watch waits here and then sees is_sold
        let watch: Option<(bool,)> =
            sqlx::query_as("SELECT is_sold FROM watches WHERE id = $1 FOR UPDATE")
                .bind(new.watch_id)
                .fetch_optional(&mut *tx)
                .await?;
        match watch {
            None => {
                return Err(RepoError::not_found(
                    ErrorCode::WatchNotFound,
                    "Watch",
                    new.watch_id,
                ));
            }
            Some((true,)) => {
                return Err(RepoError::Conflict(
                    ErrorCode::WatchAlreadySold,
                    format!("Watch {} has already been sold", new.watch_id),
                ));
            }
            Some((false,)) => {}
        }

        let updated =
            sqlx::query("UPDATE customers SET total_spent = total_spent + $2 WHERE id = $1")
                .bind(new.customer_id)
                .bind(new.sale_price)
                .execute(&mut *tx)
                .await?;
        if updated.rows_affected() == 0 {
            return Err(RepoError::not_found(
                ErrorCode::CustomerNotFound,
                "Customer",
                new.customer_id,
            ));
        }

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (customer_id, watch_id, sale_date, sale_price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, customer_id, watch_id, sale_date, sale_price
            "#,
        )
        .bind(new.customer_id)
        .bind(new.watch_id)
        .bind(new.sale_date)
        .bind(new.sale_price)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE watches SET is_sold = TRUE WHERE id = $1")
            .bind(new.watch_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(sale)
    }
}
