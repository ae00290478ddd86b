use crate::domain::{MemberId, Membership};
use async_trait::async_trait;
use chrono::NaiveDate;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 会員資格リポジトリポート（読み取り専用）
///
/// 作成は会員単位のロックが必要なため `UnitOfWork` 経由で行う。
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// 会員の全会員資格を開始日の新しい順に返す
    async fn find_by_member(&self, member_id: MemberId) -> Result<Vec<Membership>>;

    /// `from_date <= today <= to_date` の会員資格を作成日の新しい順に返す
    async fn find_active(&self, member_id: MemberId, today: NaiveDate) -> Result<Vec<Membership>>;
}
