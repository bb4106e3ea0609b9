use async_trait::async_trait;
use shared::models::{Supplier, SupplierCreate};

use super::PgStore;
use crate::db::repository::{RepoResult, SupplierRepository};

const COLUMNS: &str = "id, name, surname, document, phone, email, notes";

#[async_trait]
impl SupplierRepository for PgStore {
    async fn list_suppliers(&self) -> RepoResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {COLUMNS} FROM suppliers ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_supplier(&self, id: i64) -> RepoResult<Option<Supplier>> {
        let row = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {COLUMNS} FROM suppliers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_supplier(&self, data: &SupplierCreate) -> RepoResult<Supplier> {
        let row = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            INSERT INTO suppliers (name, surname, document, phone, email, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&data.name)
        .bind(&data.surname)
        .bind(&data.document)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
