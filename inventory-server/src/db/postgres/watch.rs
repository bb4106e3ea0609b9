use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::models::{PriceHistory, Watch, WatchUpdate};
use sqlx::{Postgres, Transaction};

use super::PgStore;
use crate::db::repository::{NewWatch, RepoError, RepoResult, WatchRepository};

const COLUMNS: &str = "id, brand, model, reference, serial_number, year, condition, \
    case_material, bracelet_material, case_size, dial_color, movement, purchase_date, \
    purchase_price, selling_price, accessories, product_code, supplier_id, is_sold, added_at";

async fn log_price(
    tx: &mut Transaction<'_, Postgres>,
    watch_id: i64,
    price: Decimal,
    at: DateTime<Utc>,
) -> RepoResult<()> {
    sqlx::query("INSERT INTO price_history (watch_id, price, change_date) VALUES ($1, $2, $3)")
        .bind(watch_id)
        .bind(price)
        .bind(at)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[async_trait]
impl WatchRepository for PgStore {
    async fn list_watches(&self) -> RepoResult<Vec<Watch>> {
        let rows = sqlx::query_as::<_, Watch>(&format!("SELECT {COLUMNS} FROM watches ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_watch(&self, id: i64) -> RepoResult<Option<Watch>> {
        let sql = format!("SELECT {COLUMNS} FROM watches WHERE id = $1");
        let row = sqlx::query_as::<_, Watch>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_watch(&self, new: &NewWatch) -> RepoResult<Watch> {
        let d = &new.data;
        let mut tx = self.pool.begin().await?;

        let watch = sqlx::query_as::<_, Watch>(&format!(
            r#"
            INSERT INTO watches (
                brand, model, reference, serial_number, year, condition,
                case_material, bracelet_material, case_size, dial_color, movement,
                purchase_date, purchase_price, selling_price, accessories,
                product_code, supplier_id, is_sold, added_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, FALSE, $18)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&d.brand)
        .bind(&d.model)
        .bind(&d.reference)
        .bind(&d.serial_number)
        .bind(d.year)
        .bind(&d.condition)
        .bind(&d.case_material)
        .bind(&d.bracelet_material)
        .bind(d.case_size)
        .bind(&d.dial_color)
        .bind(&d.movement)
        .bind(d.purchase_date)
        .bind(d.purchase_price)
        .bind(d.selling_price)
        .bind(&d.accessories)
        .bind(&new.product_code)
        .bind(d.supplier_id)
        .bind(new.added_at)
        .fetch_one(&mut *tx)
        .await?;

        log_price(&mut tx, watch.id, watch.selling_price, new.added_at).await?;
        tx.commit().await?;
        Ok(watch)
    }

    async fn update_watch(
        &self,
        id: i64,
        data: &WatchUpdate,
        now: DateTime<Utc>,
    ) -> RepoResult<Watch> {
        let mut tx = self.pool.begin().await?;

        let mut watch = sqlx::query_as::<_, Watch>(&format!(
            "SELECT {COLUMNS} FROM watches WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::not_found(ErrorCode::WatchNotFound, "Watch", id))?;

        let old_price = watch.selling_price;
        data.clone().apply_to(&mut watch);

        let watch = sqlx::query_as::<_, Watch>(&format!(
            r#"
            UPDATE watches SET
                brand = $2, model = $3, reference = $4, serial_number = $5, year = $6,
                condition = $7, case_material = $8, bracelet_material = $9, case_size = $10,
                dial_color = $11, movement = $12, purchase_date = $13, purchase_price = $14,
                selling_price = $15, accessories = $16, supplier_id = $17
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&watch.brand)
        .bind(&watch.model)
        .bind(&watch.reference)
        .bind(&watch.serial_number)
        .bind(watch.year)
        .bind(&watch.condition)
        .bind(&watch.case_material)
        .bind(&watch.bracelet_material)
        .bind(watch.case_size)
        .bind(&watch.dial_color)
        .bind(&watch.movement)
        .bind(watch.purchase_date)
        .bind(watch.purchase_price)
        .bind(watch.selling_price)
        .bind(&watch.accessories)
        .bind(watch.supplier_id)
        .fetch_one(&mut *tx)
        .await?;

        if watch.selling_price != old_price {
            log_price(&mut tx, id, watch.selling_price, now).await?;
        }
        tx.commit().await?;
        Ok(watch)
    }

    async fn delete_watch(&self, id: i64) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM watches WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(RepoError::not_found(ErrorCode::WatchNotFound, "Watch", id));
        }

        let (sales,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sales WHERE watch_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if sales > 0 {
            return Err(RepoError::Conflict(
                ErrorCode::WatchHasSales,
                format!("Watch {id} has associated sales"),
            ));
        }

        sqlx::query("DELETE FROM price_history WHERE watch_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM watches WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn price_history(&self, watch_id: i64) -> RepoResult<Vec<PriceHistory>> {
        let rows = sqlx::query_as::<_, PriceHistory>(
            r#"
            SELECT id, watch_id, price, change_date
            FROM price_history
            WHERE watch_id = $1
            ORDER BY change_date, id
            "#,
        )
        .bind(watch_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
