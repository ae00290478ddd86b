use crate::domain::{Email, Member};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 会員リポジトリポート
///
/// 会員はメールアドレスで一意に識別される。
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// メールアドレスで会員を検索する
    async fn find_by_email(&self, email: &Email) -> Result<Option<Member>>;

    /// 同じメールアドレスの会員がいなければ登録する
    ///
    /// 既存の会員がいる場合はそちらを返し、引数の会員は破棄される。
    async fn insert_if_absent(&self, member: Member) -> Result<Member>;
}
