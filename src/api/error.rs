use crate::application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、`{success: false}` の封筒へのマッピングを提供する。
/// 業務エラーもシステム障害もHTTPステータスは常に200とし、`error` コードで区別する。
#[derive(Debug)]
pub struct ApiError(ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    /// エラーコード
    pub fn code(&self) -> &'static str {
        match &self.0 {
            ApplicationError::Unauthenticated => "UNAUTHENTICATED",
            ApplicationError::InvalidInput(_) => "INVALID_INPUT",
            ApplicationError::MemberNotFound
            | ApplicationError::ArticleNotFound
            | ApplicationError::TransactionNotFound
            | ApplicationError::UserNotFound => "NOT_FOUND",
            ApplicationError::NotEligible => "NOT_ELIGIBLE",
            ApplicationError::LimitExceeded { .. } => "LIMIT_EXCEEDED",
            ApplicationError::NotAvailable => "NOT_AVAILABLE",
            ApplicationError::InvalidTransactionType => "INVALID_TRANSACTION_TYPE",
            ApplicationError::AlreadyActive => "ALREADY_ACTIVE",
            ApplicationError::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            ApplicationError::AccountDisabled => "ACCOUNT_DISABLED",
            ApplicationError::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            ApplicationError::StoreError(_)
            | ApplicationError::PasswordHashError(_)
            | ApplicationError::TokenError(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();

        let body = match self.0 {
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ApplicationError::StoreError(ref e) => {
                tracing::error!("Store error: {}", e);
                ErrorResponse::new(code, "An unexpected error occurred")
            }
            ApplicationError::PasswordHashError(ref msg) => {
                tracing::error!("Password hash error: {}", msg);
                ErrorResponse::new(code, "An unexpected error occurred")
            }
            ApplicationError::TokenError(ref e) => {
                tracing::error!("Token error: {}", e);
                ErrorResponse::new(code, "An unexpected error occurred")
            }
            ApplicationError::EmailAlreadyRegistered => ErrorResponse {
                user_exists: Some(true),
                ..ErrorResponse::new(code, self.0.to_string())
            },
            ApplicationError::AccountDisabled => ErrorResponse {
                user_disabled: Some(true),
                ..ErrorResponse::new(code, self.0.to_string())
            },
            ref other => ErrorResponse::new(code, other.to_string()),
        };

        (StatusCode::OK, Json(body)).into_response()
    }
}
