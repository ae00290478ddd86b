use crate::domain::{Article, ArticleId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 資料リポジトリポート
///
/// 状態の変更は `UnitOfWork` 経由でのみ行う。
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// IDで資料を取得する
    async fn get_by_id(&self, article_id: ArticleId) -> Result<Option<Article>>;

    /// 全資料を登録日の新しい順に返す
    async fn list_all(&self) -> Result<Vec<Article>>;

    /// 指定したIDの資料をまとめて取得する（存在しないIDは無視）
    async fn find_by_ids(&self, article_ids: &[ArticleId]) -> Result<Vec<Article>>;

    /// 資料を目録に登録する
    async fn insert(&self, article: Article) -> Result<()>;
}
