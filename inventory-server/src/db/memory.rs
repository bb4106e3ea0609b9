//! In-memory store
//!
//! All tables sit behind one mutex, so every trait method is atomic. It
//! mirrors the unique constraints of the PostgreSQL schema and is used by
//! the test suites.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::models::{
    Category, CategoryField, Customer, CustomerCreate, CustomerUpdate, DatabaseView, Overview,
    PriceHistory, Product, ProductCore, ProductFieldValue, ProductFilter, ProductSale, Sale,
    Supplier, SupplierCreate, Watch, WatchUpdate,
};

use super::repository::*;

#[derive(Default)]
struct Tables {
    next_id: i64,
    customers: BTreeMap<i64, Customer>,
    suppliers: BTreeMap<i64, Supplier>,
    watches: BTreeMap<i64, Watch>,
    price_history: BTreeMap<i64, PriceHistory>,
    sales: BTreeMap<i64, Sale>,
    categories: BTreeMap<i64, Category>,
    fields: BTreeMap<i64, CategoryField>,
    products: BTreeMap<i64, Product>,
    values: BTreeMap<i64, ProductFieldValue>,
    product_sales: BTreeMap<i64, ProductSale>,
}

impl Tables {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn customer_mut(&mut self, id: i64) -> RepoResult<&mut Customer> {
        self.customers
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found(ErrorCode::CustomerNotFound, "Customer", id))
    }

    fn category_slug_taken(&self, slug: &str, except: Option<i64>) -> bool {
        self.categories
            .values()
            .any(|c| c.slug == slug && Some(c.id) != except)
    }

    fn field_slug_taken(&self, category_id: i64, slug: &str, except: Option<i64>) -> bool {
        self.fields
            .values()
            .any(|f| f.category_id == category_id && f.slug == slug && Some(f.id) != except)
    }

    fn product_code_taken(&self, code: &str) -> bool {
        self.products.values().any(|p| p.product_code == code)
    }

    fn sorted_fields(&self, category_id: i64) -> Vec<CategoryField> {
        let mut fields: Vec<CategoryField> = self
            .fields
            .values()
            .filter(|f| f.category_id == category_id)
            .cloned()
            .collect();
        fields.sort_by_key(|f| (f.display_order, f.id));
        fields
    }

    fn upsert_values(&mut self, product_id: i64, values: &[FieldValueWrite]) {
        for (field_id, value) in values {
            let existing = self
                .values
                .values_mut()
                .find(|v| v.product_id == product_id && v.field_id == *field_id);
            match existing {
                Some(row) => row.value = value.clone(),
                None => {
                    let id = self.id();
                    self.values.insert(
                        id,
                        ProductFieldValue {
                            id,
                            product_id,
                            field_id: *field_id,
                            value: value.clone(),
                        },
                    );
                }
            }
        }
    }

    fn push_price(&mut self, watch_id: i64, price: Decimal, change_date: DateTime<Utc>) {
        let id = self.id();
        self.price_history.insert(
            id,
            PriceHistory {
                id,
                watch_id,
                price,
                change_date,
            },
        );
    }
}

/// Store backed by process memory
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn list_customers(&self) -> RepoResult<Vec<Customer>> {
        Ok(self.tables.lock().customers.values().cloned().collect())
    }

    async fn find_customer(&self, id: i64) -> RepoResult<Option<Customer>> {
        Ok(self.tables.lock().customers.get(&id).cloned())
    }

    async fn create_customer(&self, data: &CustomerCreate) -> RepoResult<Customer> {
        let mut t = self.tables.lock();
        let id = t.id();
        let customer = Customer {
            id,
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            address: data.address.clone(),
            email: data.email.clone(),
            phone: data.phone.clone(),
            total_spent: Decimal::ZERO,
        };
        t.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn update_customer(&self, id: i64, data: &CustomerUpdate) -> RepoResult<Customer> {
        let mut t = self.tables.lock();
        let customer = t.customer_mut(id)?;
        if let Some(v) = &data.first_name {
            customer.first_name = v.clone();
        }
        if let Some(v) = &data.last_name {
            customer.last_name = v.clone();
        }
        if let Some(v) = &data.address {
            customer.address = v.clone();
        }
        if let Some(v) = &data.email {
            customer.email = Some(v.clone());
        }
        if let Some(v) = &data.phone {
            customer.phone = Some(v.clone());
        }
        Ok(customer.clone())
    }

    async fn delete_customer(&self, id: i64) -> RepoResult<()> {
        let mut t = self.tables.lock();
        t.customer_mut(id)?;
        let has_sales = t.sales.values().any(|s| s.customer_id == id)
            || t.product_sales.values().any(|s| s.customer_id == id);
        if has_sales {
            return Err(RepoError::Conflict(
                ErrorCode::CustomerHasSales,
                format!("Customer {id} has associated sales"),
            ));
        }
        t.customers.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl SupplierRepository for MemoryStore {
    async fn list_suppliers(&self) -> RepoResult<Vec<Supplier>> {
        Ok(self.tables.lock().suppliers.values().cloned().collect())
    }

    async fn find_supplier(&self, id: i64) -> RepoResult<Option<Supplier>> {
        Ok(self.tables.lock().suppliers.get(&id).cloned())
    }

    async fn create_supplier(&self, data: &SupplierCreate) -> RepoResult<Supplier> {
        let mut t = self.tables.lock();
        let id = t.id();
        let supplier = Supplier {
            id,
            name: data.name.clone(),
            surname: data.surname.clone(),
            document: data.document.clone(),
            phone: data.phone.clone(),
            email: data.email.clone(),
            notes: data.notes.clone(),
        };
        t.suppliers.insert(id, supplier.clone());
        Ok(supplier)
    }
}

#[async_trait]
impl WatchRepository for MemoryStore {
    async fn list_watches(&self) -> RepoResult<Vec<Watch>> {
        Ok(self.tables.lock().watches.values().cloned().collect())
    }

    async fn find_watch(&self, id: i64) -> RepoResult<Option<Watch>> {
        Ok(self.tables.lock().watches.get(&id).cloned())
    }

    async fn create_watch(&self, new: &NewWatch) -> RepoResult<Watch> {
        let mut t = self.tables.lock();
        if t.watches.values().any(|w| w.product_code == new.product_code) {
            return Err(RepoError::Duplicate("watches_product_code_key".into()));
        }
        let id = t.id();
        let d = &new.data;
        let watch = Watch {
            id,
            brand: d.brand.clone(),
            model: d.model.clone(),
            reference: d.reference.clone(),
            serial_number: d.serial_number.clone(),
            year: d.year,
            condition: d.condition.clone(),
            case_material: d.case_material.clone(),
            bracelet_material: d.bracelet_material.clone(),
            case_size: d.case_size,
            dial_color: d.dial_color.clone(),
            movement: d.movement.clone(),
            purchase_date: d.purchase_date,
            purchase_price: d.purchase_price,
            selling_price: d.selling_price,
            accessories: d.accessories.clone(),
            product_code: new.product_code.clone(),
            supplier_id: d.supplier_id,
            is_sold: false,
            added_at: new.added_at,
        };
        t.watches.insert(id, watch.clone());
        t.push_price(id, watch.selling_price, new.added_at);
        Ok(watch)
    }

    async fn update_watch(
        &self,
        id: i64,
        data: &WatchUpdate,
        now: DateTime<Utc>,
    ) -> RepoResult<Watch> {
        let mut t = self.tables.lock();
        let watch = t
            .watches
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found(ErrorCode::WatchNotFound, "Watch", id))?;
        let old_price = watch.selling_price;
        data.clone().apply_to(watch);
        let updated = watch.clone();
        if updated.selling_price != old_price {
            t.push_price(id, updated.selling_price, now);
        }
        Ok(updated)
    }

    async fn delete_watch(&self, id: i64) -> RepoResult<()> {
        let mut t = self.tables.lock();
        if !t.watches.contains_key(&id) {
            return Err(RepoError::not_found(ErrorCode::WatchNotFound, "Watch", id));
        }
        if t.sales.values().any(|s| s.watch_id == id) {
            return Err(RepoError::Conflict(
                ErrorCode::WatchHasSales,
                format!("Watch {id} has associated sales"),
            ));
        }
        t.price_history.retain(|_, p| p.watch_id != id);
        t.watches.remove(&id);
        Ok(())
    }

    async fn price_history(&self, watch_id: i64) -> RepoResult<Vec<PriceHistory>> {
        let t = self.tables.lock();
        let mut entries: Vec<PriceHistory> = t
            .price_history
            .values()
            .filter(|p| p.watch_id == watch_id)
            .cloned()
            .collect();
        entries.sort_by_key(|p| (p.change_date, p.id));
        Ok(entries)
    }
}

#[async_trait]
impl SaleRepository for MemoryStore {
    async fn list_sales(&self) -> RepoResult<Vec<Sale>> {
        Ok(self.tables.lock().sales.values().cloned().collect())
    }

    async fn record_sale(&self, new: &NewSale) -> RepoResult<Sale> {
        let mut t = self.tables.lock();
        let watch = t
            .watches
            .get(&new.watch_id)
            .ok_or_else(|| RepoError::not_found(ErrorCode::WatchNotFound, "Watch", new.watch_id))?;
        if watch.is_sold {
            return Err(RepoError::Conflict(
                ErrorCode::WatchAlreadySold,
                format!("Watch {} has already been sold", new.watch_id),
            ));
        }
        t.customer_mut(new.customer_id)?.total_spent += new.sale_price;
        if let Some(watch) = t.watches.get_mut(&new.watch_id) {
            watch.is_sold = true;
        }
        let id = t.id();
        let sale = Sale {
            id,
            customer_id: new.customer_id,
            watch_id: new.watch_id,
            sale_date: new.sale_date,
            sale_price: new.sale_price,
        };
        t.sales.insert(id, sale.clone());
        Ok(sale)
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn list_categories(&self) -> RepoResult<Vec<Category>> {
        Ok(self.tables.lock().categories.values().cloned().collect())
    }

    async fn find_category(&self, id: i64) -> RepoResult<Option<Category>> {
        Ok(self.tables.lock().categories.get(&id).cloned())
    }

    async fn create_category(&self, data: &NewCategory) -> RepoResult<Category> {
        let mut t = self.tables.lock();
        if t.category_slug_taken(&data.slug, None) {
            return Err(RepoError::Duplicate("product_categories_slug_key".into()));
        }
        let id = t.id();
        let category = Category {
            id,
            name: data.name.clone(),
            slug: data.slug.clone(),
            icon: data.icon.clone(),
            created_at: data.now,
            updated_at: data.now,
        };
        t.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: i64, data: &NewCategory) -> RepoResult<Category> {
        let mut t = self.tables.lock();
        if !t.categories.contains_key(&id) {
            return Err(RepoError::not_found(ErrorCode::CategoryNotFound, "Category", id));
        }
        if t.category_slug_taken(&data.slug, Some(id)) {
            return Err(RepoError::Duplicate("product_categories_slug_key".into()));
        }
        let category = t
            .categories
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found(ErrorCode::CategoryNotFound, "Category", id))?;
        category.name = data.name.clone();
        category.slug = data.slug.clone();
        category.icon = data.icon.clone();
        category.updated_at = data.now;
        Ok(category.clone())
    }

    async fn delete_category(&self, id: i64) -> RepoResult<()> {
        let mut t = self.tables.lock();
        if !t.categories.contains_key(&id) {
            return Err(RepoError::not_found(ErrorCode::CategoryNotFound, "Category", id));
        }
        if t.products.values().any(|p| p.category_id == id) {
            return Err(RepoError::Conflict(
                ErrorCode::CategoryHasProducts,
                format!("Category {id} has associated products"),
            ));
        }
        let field_ids: HashSet<i64> = t
            .fields
            .values()
            .filter(|f| f.category_id == id)
            .map(|f| f.id)
            .collect();
        t.values.retain(|_, v| !field_ids.contains(&v.field_id));
        t.fields.retain(|_, f| f.category_id != id);
        t.categories.remove(&id);
        Ok(())
    }

    async fn list_fields(&self, category_id: i64) -> RepoResult<Vec<CategoryField>> {
        Ok(self.tables.lock().sorted_fields(category_id))
    }

    async fn find_field(&self, id: i64) -> RepoResult<Option<CategoryField>> {
        Ok(self.tables.lock().fields.get(&id).cloned())
    }

    async fn create_field(&self, data: &NewField) -> RepoResult<CategoryField> {
        let mut t = self.tables.lock();
        if !t.categories.contains_key(&data.category_id) {
            return Err(RepoError::not_found(
                ErrorCode::CategoryNotFound,
                "Category",
                data.category_id,
            ));
        }
        if t.field_slug_taken(data.category_id, &data.slug, None) {
            return Err(RepoError::Duplicate("uq_category_fields_slug".into()));
        }
        let display_order = data.display_order.unwrap_or_else(|| {
            t.fields
                .values()
                .filter(|f| f.category_id == data.category_id)
                .map(|f| f.display_order)
                .max()
                .map_or(0, |max| max + 1)
        });
        let id = t.id();
        let field = CategoryField {
            id,
            category_id: data.category_id,
            name: data.name.clone(),
            slug: data.slug.clone(),
            label: data.label.clone(),
            field_type: data.field_type,
            is_required: data.is_required,
            options: data.options.clone(),
            display_order,
            show_in_table: data.show_in_table,
            show_in_graph: data.show_in_graph,
        };
        t.fields.insert(id, field.clone());
        Ok(field)
    }

    async fn update_field(&self, field: &CategoryField) -> RepoResult<CategoryField> {
        let mut t = self.tables.lock();
        if !t.fields.contains_key(&field.id) {
            return Err(RepoError::not_found(ErrorCode::FieldNotFound, "Field", field.id));
        }
        if t.field_slug_taken(field.category_id, &field.slug, Some(field.id)) {
            return Err(RepoError::Duplicate("uq_category_fields_slug".into()));
        }
        t.fields.insert(field.id, field.clone());
        Ok(field.clone())
    }

    async fn delete_field(&self, id: i64) -> RepoResult<()> {
        let mut t = self.tables.lock();
        if t.fields.remove(&id).is_none() {
            return Err(RepoError::not_found(ErrorCode::FieldNotFound, "Field", id));
        }
        t.values.retain(|_, v| v.field_id != id);
        Ok(())
    }

    async fn reorder_fields(
        &self,
        category_id: i64,
        field_ids: &[i64],
    ) -> RepoResult<Vec<CategoryField>> {
        let mut t = self.tables.lock();
        if !t.categories.contains_key(&category_id) {
            return Err(RepoError::not_found(
                ErrorCode::CategoryNotFound,
                "Category",
                category_id,
            ));
        }
        let current: BTreeSet<i64> = t
            .fields
            .values()
            .filter(|f| f.category_id == category_id)
            .map(|f| f.id)
            .collect();
        let requested: BTreeSet<i64> = field_ids.iter().copied().collect();
        if requested.len() != field_ids.len() || requested != current {
            return Err(RepoError::Conflict(
                ErrorCode::FieldOrderMismatch,
                ErrorCode::FieldOrderMismatch.message().to_string(),
            ));
        }
        for (index, id) in field_ids.iter().enumerate() {
            if let Some(field) = t.fields.get_mut(id) {
                field.display_order = index as i32;
            }
        }
        Ok(t.sorted_fields(category_id))
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn list_products(&self, filter: ProductFilter) -> RepoResult<Vec<Product>> {
        let t = self.tables.lock();
        Ok(t.products
            .values()
            .filter(|p| filter.category_id.is_none_or(|c| p.category_id == c))
            .filter(|p| filter.sold.is_none_or(|s| p.is_sold == s))
            .cloned()
            .collect())
    }

    async fn find_product(&self, id: i64) -> RepoResult<Option<Product>> {
        Ok(self.tables.lock().products.get(&id).cloned())
    }

    async fn field_values(&self, product_id: i64) -> RepoResult<Vec<ProductFieldValue>> {
        let t = self.tables.lock();
        Ok(t.values
            .values()
            .filter(|v| v.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn sold_field_values(
        &self,
        category_id: i64,
        field_id: i64,
        since: Option<DateTime<Utc>>,
    ) -> RepoResult<Vec<String>> {
        let t = self.tables.lock();
        let sold: HashSet<i64> = t
            .products
            .values()
            .filter(|p| p.category_id == category_id && p.is_sold)
            .filter(|p| match since {
                None => true,
                Some(since) => t
                    .product_sales
                    .values()
                    .any(|s| s.product_id == p.id && s.sale_date >= since),
            })
            .map(|p| p.id)
            .collect();
        Ok(t.values
            .values()
            .filter(|v| v.field_id == field_id && sold.contains(&v.product_id))
            .map(|v| v.value.clone())
            .collect())
    }

    async fn create_product(
        &self,
        new: &NewProduct,
        values: &[FieldValueWrite],
    ) -> RepoResult<Product> {
        let mut t = self.tables.lock();
        if t.product_code_taken(&new.product_code) {
            return Err(RepoError::Duplicate("products_product_code_key".into()));
        }
        let id = t.id();
        let core = &new.core;
        let product = Product {
            id,
            category_id: new.category_id,
            product_code: new.product_code.clone(),
            name: core.name.clone(),
            description: core.description.clone(),
            purchase_price: core.purchase_price,
            selling_price: core.selling_price,
            purchase_date: core.purchase_date,
            condition: core.condition.clone(),
            is_sold: false,
            supplier_id: core.supplier_id,
            added_at: new.added_at,
            updated_at: new.now,
        };
        t.products.insert(id, product.clone());
        t.upsert_values(id, values);
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i64,
        core: &ProductCore,
        values: &[FieldValueWrite],
        now: i64,
    ) -> RepoResult<Product> {
        let mut t = self.tables.lock();
        let product = t
            .products
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found(ErrorCode::ProductNotFound, "Product", id))?;
        product.name = core.name.clone();
        product.description = core.description.clone();
        product.purchase_price = core.purchase_price;
        product.selling_price = core.selling_price;
        product.purchase_date = core.purchase_date;
        product.condition = core.condition.clone();
        product.supplier_id = core.supplier_id;
        product.updated_at = now;
        let updated = product.clone();
        t.upsert_values(id, values);
        Ok(updated)
    }

    async fn delete_product(&self, id: i64) -> RepoResult<()> {
        let mut t = self.tables.lock();
        if !t.products.contains_key(&id) {
            return Err(RepoError::not_found(ErrorCode::ProductNotFound, "Product", id));
        }
        if t.product_sales.values().any(|s| s.product_id == id) {
            return Err(RepoError::Conflict(
                ErrorCode::ProductHasSales,
                format!("Product {id} has associated sales"),
            ));
        }
        t.values.retain(|_, v| v.product_id != id);
        t.products.remove(&id);
        Ok(())
    }

    async fn sell_product(&self, id: i64, sale: &NewProductSale) -> RepoResult<Product> {
        let mut t = self.tables.lock();
        let product = t
            .products
            .get(&id)
            .ok_or_else(|| RepoError::not_found(ErrorCode::ProductNotFound, "Product", id))?;
        if product.is_sold {
            return Err(RepoError::Conflict(
                ErrorCode::ProductAlreadySold,
                format!("Product {id} has already been sold"),
            ));
        }
        t.customer_mut(sale.customer_id)?.total_spent += sale.sale_price;
        let sale_id = t.id();
        t.product_sales.insert(
            sale_id,
            ProductSale {
                id: sale_id,
                product_id: id,
                customer_id: sale.customer_id,
                sale_price: sale.sale_price,
                sale_date: sale.sale_date,
                notes: sale.notes.clone(),
            },
        );
        let product = t
            .products
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found(ErrorCode::ProductNotFound, "Product", id))?;
        product.is_sold = true;
        product.updated_at = sale.now;
        Ok(product.clone())
    }

    async fn product_sales(&self, product_id: i64) -> RepoResult<Vec<ProductSale>> {
        let t = self.tables.lock();
        Ok(t.product_sales
            .values()
            .filter(|s| s.product_id == product_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AdminRepository for MemoryStore {
    async fn database_view(&self) -> RepoResult<DatabaseView> {
        let t = self.tables.lock();
        Ok(DatabaseView {
            watches: t.watches.values().cloned().collect(),
            customers: t.customers.values().cloned().collect(),
            suppliers: t.suppliers.values().cloned().collect(),
            sales: t.sales.values().cloned().collect(),
            categories: t.categories.values().cloned().collect(),
            products: t.products.values().cloned().collect(),
        })
    }

    async fn reset(&self) -> RepoResult<()> {
        *self.tables.lock() = Tables::default();
        Ok(())
    }

    async fn fix_sold_watches(&self) -> RepoResult<(u64, u64)> {
        let mut t = self.tables.lock();
        let referenced: BTreeSet<i64> = t.sales.values().map(|s| s.watch_id).collect();
        let mut updated = 0;
        for id in &referenced {
            if let Some(watch) = t.watches.get_mut(id)
                && !watch.is_sold
            {
                watch.is_sold = true;
                updated += 1;
            }
        }
        Ok((updated, referenced.len() as u64))
    }

    async fn overview(&self) -> RepoResult<Overview> {
        let t = self.tables.lock();
        let mut revenue = Decimal::ZERO;
        let mut cost = Decimal::ZERO;
        for sale in t.sales.values() {
            revenue += sale.sale_price;
            if let Some(w) = t.watches.get(&sale.watch_id) {
                cost += w.purchase_price;
            }
        }
        for sale in t.product_sales.values() {
            revenue += sale.sale_price;
            if let Some(p) = t.products.get(&sale.product_id) {
                cost += p.purchase_price;
            }
        }
        Ok(Overview {
            total_revenue: revenue,
            total_profit: revenue - cost,
            total_customers: t.customers.len() as u64,
            total_watches: t.watches.len() as u64,
            sold_watches: t.watches.values().filter(|w| w.is_sold).count() as u64,
            total_products: t.products.len() as u64,
            sold_products: t.products.values().filter(|p| p.is_sold).count() as u64,
        })
    }
}
