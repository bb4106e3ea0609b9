//! Maintenance utilities

use shared::models::{DatabaseView, FixSoldResult, OperationResult};

use crate::core::AppState;
use crate::error::ServiceResult;

pub async fn database_view(state: &AppState) -> ServiceResult<DatabaseView> {
    Ok(state.store().database_view().await?)
}

/// Empty every table in one go
pub async fn reset(state: &AppState) -> ServiceResult<OperationResult> {
    state.store().reset().await?;
    tracing::warn!("Database reset");
    Ok(OperationResult::with_message("Database reset completed"))
}

/// Mark every watch referenced by a sale as sold
pub async fn fix_sold_watches(state: &AppState) -> ServiceResult<FixSoldResult> {
    let (updated, total) = state.store().fix_sold_watches().await?;
    tracing::info!(updated, total, "Sold flags reconciled");
    Ok(FixSoldResult {
        success: true,
        message: format!("Updated {updated} of {total} sold watches"),
        updated,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{customers, watches};
    use shared::models::CustomerCreate;

    #[tokio::test]
    async fn test_reset_empties_everything() {
        let state = AppState::in_memory();
        customers::create(
            &state,
            CustomerCreate {
                first_name: "Elena".into(),
                last_name: "Russo".into(),
                address: "Piazza Duomo 1".into(),
                email: None,
                phone: None,
            },
        )
        .await
        .unwrap();
        watches::create(&state, watches::tests::submariner()).await.unwrap();

        let view = database_view(&state).await.unwrap();
        assert_eq!(view.customers.len(), 1);
        assert_eq!(view.watches.len(), 1);

        let result = reset(&state).await.unwrap();
        assert!(result.success);

        let view = database_view(&state).await.unwrap();
        assert!(view.customers.is_empty());
        assert!(view.watches.is_empty());
    }

    #[tokio::test]
    async fn test_fix_sold_without_sales() {
        let state = AppState::in_memory();
        watches::create(&state, watches::tests::submariner()).await.unwrap();

        let result = fix_sold_watches(&state).await.unwrap();
        assert_eq!((result.updated, result.total), (0, 0));
    }
}
