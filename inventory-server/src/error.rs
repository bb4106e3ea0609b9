//! Service-layer error type
//!
//! `ServiceError` bridges repository errors and the API-layer `AppError` so
//! services can use `?` on both.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::RepoError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: storage/infrastructure errors (logged, mapped to InternalError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<RepoError> for ServiceError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(code, msg) => AppError::with_message(code, msg).into(),
            RepoError::Conflict(code, msg) => AppError::with_message(code, msg).into(),
            RepoError::Duplicate(msg) => {
                AppError::with_message(ErrorCode::AlreadyExists, msg).into()
            }
            RepoError::Validation(msg) => AppError::validation(msg).into(),
            RepoError::Database(msg) => ServiceError::Db(msg.into()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_errors_keep_their_code() {
        let err: AppError =
            ServiceError::from(RepoError::Conflict(ErrorCode::WatchAlreadySold, "sold".into()))
                .into();
        assert_eq!(err.code, ErrorCode::WatchAlreadySold);

        let err: AppError =
            ServiceError::from(RepoError::NotFound(ErrorCode::CustomerNotFound, "gone".into()))
                .into();
        assert_eq!(err.code, ErrorCode::CustomerNotFound);
    }

    #[test]
    fn test_database_errors_are_masked() {
        let err: AppError =
            ServiceError::from(RepoError::Database("relation does not exist".into())).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "Internal server error");
    }
}
