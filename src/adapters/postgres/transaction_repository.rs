use crate::domain::{MemberId, Transaction, TransactionId};
use crate::ports::transaction_repository::{
    Result, TransactionRepository as TransactionRepositoryTrait,
};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use sqlx::PgPool;

use super::rows::map_row_to_transaction;

/// TransactionRepositoryのPostgreSQL実装
///
/// 台帳の順序は `seq`（BIGSERIAL）で表す。
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    async fn get_by_id(&self, transaction_id: TransactionId) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT transaction_id, article_id, member_id, transaction_type,
                   date, submitted, created_at
            FROM transactions
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_transaction).transpose()
    }

    async fn find_by_member(&self, member_id: MemberId) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT transaction_id, article_id, member_id, transaction_type,
                   date, submitted, created_at
            FROM transactions
            WHERE member_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(member_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_transaction).collect()
    }

    /// 台帳全体を挿入順にストリーム配信する
    fn stream_all(&self) -> BoxStream<'_, Result<Transaction>> {
        let stream = sqlx::query(
            r#"
            SELECT transaction_id, article_id, member_id, transaction_type,
                   date, submitted, created_at
            FROM transactions
            ORDER BY seq ASC
            "#,
        )
        .fetch(&self.pool)
        .map(|row_result| {
            let row = row_result?;
            map_row_to_transaction(&row)
        });

        Box::pin(stream)
    }
}
