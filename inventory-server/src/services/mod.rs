//! Service layer
//!
//! Business rules on top of the repository traits. Every function takes the
//! shared [`AppState`](crate::core::AppState) and returns a
//! [`ServiceResult`](crate::error::ServiceResult).

pub mod admin;
pub mod catalog;
pub mod customers;
pub mod import;
pub mod products;
pub mod sales;
pub mod stats;
pub mod suppliers;
pub mod watches;

use std::future::Future;

use shared::error::{AppError, ErrorCode};

use crate::db::{RepoError, RepoResult};
use crate::error::{ServiceError, ServiceResult};

pub(crate) fn not_found(code: ErrorCode, what: &str, id: i64) -> ServiceError {
    RepoError::not_found(code, what, id).into()
}

/// Run `insert` with freshly generated product codes until one is not taken.
///
/// Only a unique violation on the product code is retried; every other
/// error is returned as is.
pub(crate) async fn with_fresh_code<T, G, F, Fut>(
    attempts: u32,
    mut generate: G,
    mut insert: F,
) -> ServiceResult<T>
where
    G: FnMut() -> String,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = RepoResult<T>>,
{
    for attempt in 1..=attempts.max(1) {
        let code = generate();
        match insert(code.clone()).await {
            Err(RepoError::Duplicate(constraint)) if constraint.contains("product_code") => {
                tracing::warn!(code = %code, attempt, "Product code collision, regenerating");
            }
            other => return other.map_err(Into::into),
        }
    }
    Err(AppError::new(ErrorCode::ProductCodeExhausted).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_fresh_code_retries_collisions() {
        let mut n = 0;
        let result = with_fresh_code(
            5,
            || {
                n += 1;
                format!("ORO-{n}")
            },
            |code| async move {
                if code == "ORO-3" {
                    Ok(code)
                } else {
                    Err(RepoError::Duplicate("products_product_code_key".into()))
                }
            },
        )
        .await
        .unwrap();
        assert_eq!(result, "ORO-3");
    }

    #[tokio::test]
    async fn test_with_fresh_code_gives_up() {
        let err = with_fresh_code(
            2,
            || "ORO-1".to_string(),
            |_| async { Err::<(), _>(RepoError::Duplicate("products_product_code_key".into())) },
        )
        .await
        .unwrap_err();
        let err: AppError = err.into();
        assert_eq!(err.code, ErrorCode::ProductCodeExhausted);
    }

    #[tokio::test]
    async fn test_with_fresh_code_passes_other_errors() {
        let err = with_fresh_code(
            5,
            || "ORO-1".to_string(),
            |_| async {
                Err::<(), _>(RepoError::Conflict(ErrorCode::WatchAlreadySold, "sold".into()))
            },
        )
        .await
        .unwrap_err();
        let err: AppError = err.into();
        assert_eq!(err.code, ErrorCode::WatchAlreadySold);
    }
}
