use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::{self, Caller, Identity, LibrarySettings, Member};
use crate::ports::*;

use super::account::TokenIssuer;
use super::errors::{ApplicationError, Result};

/// サービスの依存関係
///
/// 振る舞いは持たず、各ユースケース関数に明示的に渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub members: Arc<dyn MemberRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub articles: Arc<dyn ArticleRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub accounts: Arc<dyn UserAccountRepository>,
    pub settings: Arc<dyn SettingsStore>,
    /// 設定ストアが読めないときに使う値（設定ファイルの `library` セクション）
    pub fallback_settings: LibrarySettings,
    pub unit_of_work: Arc<dyn UnitOfWorkFactory>,
    pub tokens: TokenIssuer,
}

/// 認証済みの呼び出し元を要求する
pub(crate) fn require_identity(caller: &Caller) -> Result<&Identity> {
    caller.identity().ok_or(ApplicationError::Unauthenticated)
}

/// 図書館設定を読み込む
///
/// ストアが失敗した場合は `fallback_settings` を使う。
pub(crate) async fn load_settings(deps: &ServiceDependencies) -> LibrarySettings {
    match deps.settings.load().await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load library settings, using fallback values");
            deps.fallback_settings
        }
    }
}

/// 呼び出し元の会員を検索する
pub(crate) async fn find_member(
    deps: &ServiceDependencies,
    identity: &Identity,
) -> Result<Option<Member>> {
    deps.members
        .find_by_email(&identity.email)
        .await
        .map_err(ApplicationError::StoreError)
}

/// 呼び出し元の会員を取得し、なければ登録する
pub(crate) async fn find_or_register_member(
    deps: &ServiceDependencies,
    identity: &Identity,
    now: DateTime<Utc>,
) -> Result<Member> {
    if let Some(member) = find_member(deps, identity).await? {
        return Ok(member);
    }

    let candidate =
        domain::member::register_member(&identity.full_name, identity.email.clone(), now);
    let member = deps
        .members
        .insert_if_absent(candidate)
        .await
        .map_err(ApplicationError::StoreError)?;

    tracing::info!(member_id = %member.member_id, email = %member.email, "Library member created");
    Ok(member)
}
