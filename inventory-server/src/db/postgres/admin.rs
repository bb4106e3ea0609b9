use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::{DatabaseView, Overview};

use super::PgStore;
use crate::db::repository::{
    AdminRepository, CatalogRepository, CustomerRepository, ProductRepository, RepoResult,
    SaleRepository, SupplierRepository, WatchRepository,
};

/// Children before parents so foreign keys never block the wipe
const RESET_ORDER: [&str; 10] = [
    "product_sales",
    "product_field_values",
    "products",
    "category_fields",
    "product_categories",
    "sales",
    "price_history",
    "watches",
    "customers",
    "suppliers",
];

#[async_trait]
impl AdminRepository for PgStore {
    async fn database_view(&self) -> RepoResult<DatabaseView> {
        Ok(DatabaseView {
            watches: self.list_watches().await?,
            customers: self.list_customers().await?,
            suppliers: self.list_suppliers().await?,
            sales: self.list_sales().await?,
            categories: self.list_categories().await?,
            products: self.list_products(Default::default()).await?,
        })
    }

    async fn reset(&self) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        for table in RESET_ORDER {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn fix_sold_watches(&self) -> RepoResult<(u64, u64)> {
        let mut tx = self.pool.begin().await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(DISTINCT watch_id) FROM sales")
            .fetch_one(&mut *tx)
            .await?;
        let updated = sqlx::query(
            "UPDATE watches SET is_sold = TRUE WHERE NOT is_sold AND id IN (SELECT watch_id FROM sales)",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((updated.rows_affected(), total as u64))
    }

    async fn overview(&self) -> RepoResult<Overview> {
        let (watch_revenue, watch_cost): (Decimal, Decimal) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(s.sale_price), 0), COALESCE(SUM(w.purchase_price), 0)
            FROM sales s JOIN watches w ON w.id = s.watch_id
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        let (product_revenue, product_cost): (Decimal, Decimal) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(s.sale_price), 0), COALESCE(SUM(p.purchase_price), 0)
            FROM product_sales s JOIN products p ON p.id = s.product_id
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        let (customers, watches, sold_watches, products, sold_products): (i64, i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM customers),
                    (SELECT COUNT(*) FROM watches),
                    (SELECT COUNT(*) FROM watches WHERE is_sold),
                    (SELECT COUNT(*) FROM products),
                    (SELECT COUNT(*) FROM products WHERE is_sold)
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        let revenue = watch_revenue + product_revenue;
        Ok(Overview {
            total_revenue: revenue,
            total_profit: revenue - watch_cost - product_cost,
            total_customers: customers as u64,
            total_watches: watches as u64,
            sold_watches: sold_watches as u64,
            total_products: products as u64,
            sold_products: sold_products as u64,
        })
    }
}
