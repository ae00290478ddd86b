use crate::domain::{Email, UserAccount};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ユーザーアカウントの読み取りポート
///
/// 登録は会員レコードと同時に確定させるため、作業単位（`UnitOfWork::insert_account`）で行う。
#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserAccount>>;
}
