use std::collections::BTreeSet;

use async_trait::async_trait;
use shared::error::ErrorCode;
use shared::models::{Category, CategoryField};

use super::PgStore;
use crate::db::repository::{CatalogRepository, NewCategory, NewField, RepoError, RepoResult};

const CATEGORY_COLUMNS: &str = "id, name, slug, icon, created_at, updated_at";

const FIELD_COLUMNS: &str = "id, category_id, name, slug, label, field_type, is_required, \
    options, display_order, show_in_table, show_in_graph";

#[async_trait]
impl CatalogRepository for PgStore {
    async fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM product_categories ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_category(&self, id: i64) -> RepoResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM product_categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_category(&self, data: &NewCategory) -> RepoResult<Category> {
        let row = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO product_categories (name, slug, icon, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(&data.name)
        .bind(&data.slug)
        .bind(&data.icon)
        .bind(data.now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_category(&self, id: i64, data: &NewCategory) -> RepoResult<Category> {
        let row = sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE product_categories
            SET name = $2, slug = $3, icon = $4, updated_at = $5
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.slug)
        .bind(&data.icon)
        .bind(data.now)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| RepoError::not_found(ErrorCode::CategoryNotFound, "Category", id))
    }

    async fn delete_category(&self, id: i64) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM product_categories WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(RepoError::not_found(ErrorCode::CategoryNotFound, "Category", id));
        }

        let (products,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM products WHERE category_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if products > 0 {
            return Err(RepoError::Conflict(
                ErrorCode::CategoryHasProducts,
                format!("Category {id} has associated products"),
            ));
        }

        sqlx::query("DELETE FROM category_fields WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM product_categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn list_fields(&self, category_id: i64) -> RepoResult<Vec<CategoryField>> {
        let rows = sqlx::query_as::<_, CategoryField>(&format!(
            "SELECT {FIELD_COLUMNS} FROM category_fields WHERE category_id = $1 ORDER BY display_order, id"
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_field(&self, id: i64) -> RepoResult<Option<CategoryField>> {
        let row = sqlx::query_as::<_, CategoryField>(&format!(
            "SELECT {FIELD_COLUMNS} FROM category_fields WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_field(&self, data: &NewField) -> RepoResult<CategoryField> {
        let mut tx = self.pool.begin().await?;

        // Lock the category so concurrent appends compute distinct orders
        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM product_categories WHERE id = $1 FOR UPDATE")
                .bind(data.category_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(RepoError::not_found(
                ErrorCode::CategoryNotFound,
                "Category",
                data.category_id,
            ));
        }

        let display_order = match data.display_order {
            Some(order) => order,
            None => {
                let (next,): (i32,) = sqlx::query_as(
                    "SELECT COALESCE(MAX(display_order) + 1, 0) FROM category_fields WHERE category_id = $1",
                )
                .bind(data.category_id)
                .fetch_one(&mut *tx)
                .await?;
                next
            }
        };

        let field = sqlx::query_as::<_, CategoryField>(&format!(
            r#"
            INSERT INTO category_fields (
                category_id, name, slug, label, field_type, is_required,
                options, display_order, show_in_table, show_in_graph
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {FIELD_COLUMNS}
            "#
        ))
        .bind(data.category_id)
        .bind(&data.name)
        .bind(&data.slug)
        .bind(&data.label)
        .bind(data.field_type.as_str())
        .bind(data.is_required)
        .bind(&data.options)
        .bind(display_order)
        .bind(data.show_in_table)
        .bind(data.show_in_graph)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(field)
    }

    async fn update_field(&self, field: &CategoryField) -> RepoResult<CategoryField> {
        let row = sqlx::query_as::<_, CategoryField>(&format!(
            r#"
            UPDATE category_fields SET
                name = $2, slug = $3, label = $4, field_type = $5, is_required = $6,
                options = $7, display_order = $8, show_in_table = $9, show_in_graph = $10
            WHERE id = $1
            RETURNING {FIELD_COLUMNS}
            "#
        ))
        .bind(field.id)
        .bind(&field.name)
        .bind(&field.slug)
        .bind(&field.label)
        .bind(field.field_type.as_str())
        .bind(field.is_required)
        .bind(&field.options)
        .bind(field.display_order)
        .bind(field.show_in_table)
        .bind(field.show_in_graph)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| RepoError::not_found(ErrorCode::FieldNotFound, "Field", field.id))
    }

    async fn delete_field(&self, id: i64) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM product_field_values WHERE field_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM category_fields WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(RepoError::not_found(ErrorCode::FieldNotFound, "Field", id));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn reorder_fields(
        &self,
        category_id: i64,
        field_ids: &[i64],
    ) -> RepoResult<Vec<CategoryField>> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM product_categories WHERE id = $1 FOR UPDATE")
                .bind(category_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(RepoError::not_found(
                ErrorCode::CategoryNotFound,
                "Category",
                category_id,
            ));
        }

        let current: Vec<(i64,)> =
            sqlx::query_as("SELECT id FROM category_fields WHERE category_id = $1 FOR UPDATE")
                .bind(category_id)
                .fetch_all(&mut *tx)
                .await?;
        let current: BTreeSet<i64> = current.into_iter().map(|(id,)| id).collect();
        let requested: BTreeSet<i64> = field_ids.iter().copied().collect();
        if requested.len() != field_ids.len() || requested != current {
            return Err(RepoError::Conflict(
                ErrorCode::FieldOrderMismatch,
                ErrorCode::FieldOrderMismatch.message().to_string(),
            ));
        }

        for (index, id) in field_ids.iter().enumerate() {
            sqlx::query("UPDATE category_fields SET display_order = $2 WHERE id = $1")
                .bind(id)
                .bind(index as i32)
                .execute(&mut *tx)
                .await?;
        }

        let fields = sqlx::query_as::<_, CategoryField>(&format!(
            "SELECT {FIELD_COLUMNS} FROM category_fields WHERE category_id = $1 ORDER BY display_order, id"
        ))
        .bind(category_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(fields)
    }
}
