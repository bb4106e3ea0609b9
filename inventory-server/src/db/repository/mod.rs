//! Repository Module
//!
//! One trait per entity family. Every method is one logical unit of work:
//! implementations make it atomic (a transaction for PostgreSQL, a single
//! lock for the in-memory store), so multi-step writes such as "record a
//! sale, bump the customer total, flag the watch" cannot be observed half
//! done.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::models::{
    Category, CategoryField, Customer, CustomerCreate, CustomerUpdate, DatabaseView, FieldType,
    Overview, PriceHistory, Product, ProductCore, ProductFieldValue, ProductFilter, ProductSale,
    Sale, Supplier, SupplierCreate, Watch, WatchCreate, WatchUpdate,
};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {1}")]
    NotFound(ErrorCode, String),

    /// Unique constraint violated (slug, product code)
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Business rule violated inside the unit of work
    #[error("Conflict: {1}")]
    Conflict(ErrorCode, String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl RepoError {
    pub fn not_found(code: ErrorCode, what: &str, id: i64) -> Self {
        RepoError::NotFound(code, format!("{what} {id} not found"))
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.constraint().unwrap_or("unique").to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// ── Unit-of-work inputs ──

/// Watch row to insert; the product code is already generated
#[derive(Debug, Clone)]
pub struct NewWatch {
    pub data: WatchCreate,
    pub product_code: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub customer_id: i64,
    pub watch_id: i64,
    pub sale_date: DateTime<Utc>,
    pub sale_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub icon: String,
    pub now: i64,
}

#[derive(Debug, Clone)]
pub struct NewField {
    pub category_id: i64,
    pub name: String,
    pub slug: String,
    pub label: String,
    pub field_type: FieldType,
    pub is_required: bool,
    pub options: Option<String>,
    /// Appended after the current last field when `None`
    pub display_order: Option<i32>,
    pub show_in_table: bool,
    pub show_in_graph: bool,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: i64,
    pub product_code: String,
    pub core: ProductCore,
    pub added_at: DateTime<Utc>,
    pub now: i64,
}

#[derive(Debug, Clone)]
pub struct NewProductSale {
    pub customer_id: i64,
    pub sale_price: Decimal,
    pub sale_date: DateTime<Utc>,
    pub notes: String,
    pub now: i64,
}

/// Custom field value to write: (field id, canonical text)
pub type FieldValueWrite = (i64, String);

// ── Traits ──

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn list_customers(&self) -> RepoResult<Vec<Customer>>;
    async fn find_customer(&self, id: i64) -> RepoResult<Option<Customer>>;
    async fn create_customer(&self, data: &CustomerCreate) -> RepoResult<Customer>;
    async fn update_customer(&self, id: i64, data: &CustomerUpdate) -> RepoResult<Customer>;
    /// Fails with `CustomerHasSales` when any watch or product sale references it
    async fn delete_customer(&self, id: i64) -> RepoResult<()>;
}

#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn list_suppliers(&self) -> RepoResult<Vec<Supplier>>;
    async fn find_supplier(&self, id: i64) -> RepoResult<Option<Supplier>>;
    async fn create_supplier(&self, data: &SupplierCreate) -> RepoResult<Supplier>;
}

#[async_trait]
pub trait WatchRepository: Send + Sync {
    async fn list_watches(&self) -> RepoResult<Vec<Watch>>;
    async fn find_watch(&self, id: i64) -> RepoResult<Option<Watch>>;
    /// Insert the watch and its initial price-history entry
    async fn create_watch(&self, watch: &NewWatch) -> RepoResult<Watch>;
    /// Apply a partial update; appends price history when the selling price changes
    async fn update_watch(&self, id: i64, data: &WatchUpdate, now: DateTime<Utc>)
    -> RepoResult<Watch>;
    /// Fails with `WatchHasSales` when sales reference the watch
    async fn delete_watch(&self, id: i64) -> RepoResult<()>;
    async fn price_history(&self, watch_id: i64) -> RepoResult<Vec<PriceHistory>>;
}

#[async_trait]
pub trait SaleRepository: Send + Sync {
    async fn list_sales(&self) -> RepoResult<Vec<Sale>>;
    /// Insert the sale, add the price to the customer's total and flag the
    /// watch sold. The watch row is locked for the duration.
    async fn record_sale(&self, sale: &NewSale) -> RepoResult<Sale>;
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_categories(&self) -> RepoResult<Vec<Category>>;
    async fn find_category(&self, id: i64) -> RepoResult<Option<Category>>;
    async fn create_category(&self, data: &NewCategory) -> RepoResult<Category>;
    async fn update_category(&self, id: i64, data: &NewCategory) -> RepoResult<Category>;
    /// Fails with `CategoryHasProducts`; otherwise drops the field definitions too
    async fn delete_category(&self, id: i64) -> RepoResult<()>;

    /// Fields ordered by display order, then id
    async fn list_fields(&self, category_id: i64) -> RepoResult<Vec<CategoryField>>;
    async fn find_field(&self, id: i64) -> RepoResult<Option<CategoryField>>;
    async fn create_field(&self, data: &NewField) -> RepoResult<CategoryField>;
    /// Replace every mutable attribute of the stored field
    async fn update_field(&self, field: &CategoryField) -> RepoResult<CategoryField>;
    /// Deletes the field and every value stored for it
    async fn delete_field(&self, id: i64) -> RepoResult<()>;
    /// Set `display_order = index` for each id; the ids must be exactly the
    /// category's field set
    async fn reorder_fields(&self, category_id: i64, field_ids: &[i64])
    -> RepoResult<Vec<CategoryField>>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list_products(&self, filter: ProductFilter) -> RepoResult<Vec<Product>>;
    async fn find_product(&self, id: i64) -> RepoResult<Option<Product>>;
    async fn field_values(&self, product_id: i64) -> RepoResult<Vec<ProductFieldValue>>;
    /// Stored values of one field over sold products of a category,
    /// optionally limited to products sold at or after `since`
    async fn sold_field_values(
        &self,
        category_id: i64,
        field_id: i64,
        since: Option<DateTime<Utc>>,
    ) -> RepoResult<Vec<String>>;
    /// Insert the product row and its values; `Duplicate` on a code collision
    async fn create_product(
        &self,
        product: &NewProduct,
        values: &[FieldValueWrite],
    ) -> RepoResult<Product>;
    /// Overwrite core attributes and upsert the given values
    async fn update_product(
        &self,
        id: i64,
        core: &ProductCore,
        values: &[FieldValueWrite],
        now: i64,
    ) -> RepoResult<Product>;
    /// Fails with `ProductHasSales`; otherwise removes values then the row
    async fn delete_product(&self, id: i64) -> RepoResult<()>;
    /// Insert a product sale, flag the product sold and bump the customer total
    async fn sell_product(&self, id: i64, sale: &NewProductSale) -> RepoResult<Product>;
    async fn product_sales(&self, product_id: i64) -> RepoResult<Vec<ProductSale>>;
}

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn database_view(&self) -> RepoResult<DatabaseView>;
    /// Empty every table in one unit of work
    async fn reset(&self) -> RepoResult<()>;
    /// Flag every watch referenced by a sale as sold; returns (updated, total)
    async fn fix_sold_watches(&self) -> RepoResult<(u64, u64)>;
    async fn overview(&self) -> RepoResult<Overview>;
}

/// Every repository the server needs, behind one object
pub trait Store:
    CustomerRepository
    + SupplierRepository
    + WatchRepository
    + SaleRepository
    + CatalogRepository
    + ProductRepository
    + AdminRepository
{
}

impl<T> Store for T where
    T: CustomerRepository
        + SupplierRepository
        + WatchRepository
        + SaleRepository
        + CatalogRepository
        + ProductRepository
        + AdminRepository
{
}
