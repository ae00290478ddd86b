use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::Caller;

use super::{error::ApiError, handlers::AppState};

/// リクエストの呼び出し元
///
/// Authorizationヘッダがなければゲスト、Bearerトークンが有効なら認証済みとする。
/// ヘッダがあるのにトークンが不正な場合は未認証エラーで拒否する。
pub struct CurrentCaller(pub Caller);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(CurrentCaller(Caller::Guest));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApplicationError::Unauthenticated)?;

        let identity = state.service_deps.tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            ApplicationError::Unauthenticated
        })?;

        Ok(CurrentCaller(Caller::Authenticated(identity)))
    }
}
