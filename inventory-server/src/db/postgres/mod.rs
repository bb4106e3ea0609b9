//! PostgreSQL store
//!
//! Each trait method that writes more than one row runs inside a single
//! transaction. Sale paths lock the sold row with `SELECT ... FOR UPDATE`.

mod admin;
mod catalog;
mod customer;
mod product;
mod sale;
mod supplier;
mod watch;

use sqlx::PgPool;

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
