use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::ErrorCode;
use shared::models::{Product, ProductCore, ProductFieldValue, ProductFilter, ProductSale};
use sqlx::{Postgres, Transaction};

use super::PgStore;
use crate::db::repository::{
    FieldValueWrite, NewProduct, NewProductSale, ProductRepository, RepoError, RepoResult,
};

const COLUMNS: &str = "id, category_id, product_code, name, description, purchase_price, \
    selling_price, purchase_date, condition, is_sold, supplier_id, added_at, updated_at";

async fn upsert_values(
    tx: &mut Transaction<'_, Postgres>,
    product_id: i64,
    values: &[FieldValueWrite],
) -> RepoResult<()> {
    for (field_id, value) in values {
        sqlx::query(
            r#"
            INSERT INTO product_field_values (product_id, field_id, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_id, field_id) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(product_id)
        .bind(field_id)
        .bind(value)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl ProductRepository for PgStore {
    async fn list_products(&self, filter: ProductFilter) -> RepoResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {COLUMNS} FROM products
            WHERE ($1::BIGINT IS NULL OR category_id = $1)
              AND ($2::BOOLEAN IS NULL OR is_sold = $2)
            ORDER BY id
            "#
        ))
        .bind(filter.category_id)
        .bind(filter.sold)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_product(&self, id: i64) -> RepoResult<Option<Product>> {
        let sql = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn field_values(&self, product_id: i64) -> RepoResult<Vec<ProductFieldValue>> {
        let rows = sqlx::query_as::<_, ProductFieldValue>(
            "SELECT id, product_id, field_id, value FROM product_field_values WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn sold_field_values(
        &self,
        category_id: i64,
        field_id: i64,
        since: Option<DateTime<Utc>>,
    ) -> RepoResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT v.value
            FROM product_field_values v
            JOIN products p ON p.id = v.product_id
            WHERE p.category_id = $1
              AND v.field_id = $2
              AND p.is_sold
              AND (
                $3::TIMESTAMPTZ IS NULL
                OR EXISTS (
                    SELECT 1 FROM product_sales s
                    WHERE s.product_id = p.id AND s.sale_date >= $3
                )
              )
            "#,
        )
        .bind(category_id)
        .bind(field_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(value,)| value).collect())
    }

    async fn create_product(
        &self,
        new: &NewProduct,
        values: &[FieldValueWrite],
    ) -> RepoResult<Product> {
        let core = &new.core;
        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (
                category_id, product_code, name, description, purchase_price,
                selling_price, purchase_date, condition, is_sold, supplier_id,
                added_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, $9, $10, $11)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new.category_id)
        .bind(&new.product_code)
        .bind(&core.name)
        .bind(&core.description)
        .bind(core.purchase_price)
        .bind(core.selling_price)
        .bind(core.purchase_date)
        .bind(&core.condition)
        .bind(core.supplier_id)
        .bind(new.added_at)
        .bind(new.now)
        .fetch_one(&mut *tx)
        .await?;

        upsert_values(&mut tx, product.id, values).await?;
        tx.commit().await?;
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i64,
        core: &ProductCore,
        values: &[FieldValueWrite],
        now: i64,
    ) -> RepoResult<Product> {
        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products SET
                name = $2, description = $3, purchase_price = $4, selling_price = $5,
                purchase_date = $6, condition = $7, supplier_id = $8, updated_at = $9
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&core.name)
        .bind(&core.description)
        .bind(core.purchase_price)
        .bind(core.selling_price)
        .bind(core.purchase_date)
        .bind(&core.condition)
        .bind(core.supplier_id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::not_found(ErrorCode::ProductNotFound, "Product", id))?;

        upsert_values(&mut tx, id, values).await?;
        tx.commit().await?;
        Ok(product)
    }

    async fn delete_product(&self, id: i64) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM products WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(RepoError::not_found(ErrorCode::ProductNotFound, "Product", id));
        }

        let (sales,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM product_sales WHERE product_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if sales > 0 {
            return Err(RepoError::Conflict(
                ErrorCode::ProductHasSales,
                format!("Product {id} has associated sales"),
            ));
        }

        sqlx::query("DELETE FROM product_field_values WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn sell_product(&self, id: i64, sale: &NewProductSale) -> RepoResult<Product> {
        let mut tx = self.pool.begin().await?;

        let sold: Option<(bool,)> =
            sqlx::query_as("SELECT is_sold FROM products WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        match sold {
            None => return Err(RepoError::not_found(ErrorCode::ProductNotFound, "Product", id)),
            Some((true,)) => {
                return Err(RepoError::Conflict(
                    ErrorCode::ProductAlreadySold,
                    format!("Product {id} has already been sold"),
                ));
            }
            Some((false,)) => {}
        }

        let updated =
            sqlx::query("UPDATE customers SET total_spent = total_spent + $2 WHERE id = $1")
                .bind(sale.customer_id)
                .bind(sale.sale_price)
                .execute(&mut *tx)
                .await?;
        if updated.rows_affected() == 0 {
            return Err(RepoError::not_found(
                ErrorCode::CustomerNotFound,
                "Customer",
                sale.customer_id,
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO product_sales (product_id, customer_id, sale_price, sale_date, notes)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(sale.customer_id)
        .bind(sale.sale_price)
        .bind(sale.sale_date)
        .bind(&sale.notes)
        .execute(&mut *tx)
        .await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET is_sold = TRUE, updated_at = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(sale.now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(product)
    }

    async fn product_sales(&self, product_id: i64) -> RepoResult<Vec<ProductSale>> {
        let rows = sqlx::query_as::<_, ProductSale>(
            r#"
            SELECT id, product_id, customer_id, sale_price, sale_date, notes
            FROM product_sales
            WHERE product_id = $1
            ORDER BY sale_date, id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
