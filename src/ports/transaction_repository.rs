use crate::domain::{MemberId, Transaction, TransactionId};
use async_trait::async_trait;
use futures::stream::BoxStream;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 取引台帳ポート（読み取り専用）
///
/// 台帳は追記専用。追記は `UnitOfWork::append_transaction` のみが行う。
/// 複数件を返すメソッドはすべて挿入順で返す。
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// IDで取引を取得する
    async fn get_by_id(&self, transaction_id: TransactionId) -> Result<Option<Transaction>>;

    /// 会員の全取引を挿入順で返す
    async fn find_by_member(&self, member_id: MemberId) -> Result<Vec<Transaction>>;

    /// 台帳全体を挿入順にストリーム配信する
    ///
    /// 資料状態の監査に使用される。
    fn stream_all(&self) -> BoxStream<'_, Result<Transaction>>;
}
