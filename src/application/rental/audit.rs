use futures::TryStreamExt;

use crate::application::dependencies::ServiceDependencies;
use crate::application::errors::{ApplicationError, Result};
use crate::domain::{self, ArticleId, ArticleStatus, Transaction};

/// 資料状態と台帳の不一致
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMismatch {
    pub article_id: ArticleId,
    pub stored: ArticleStatus,
    pub expected: ArticleStatus,
}

/// 資料状態の監査
///
/// 台帳全体をストリームで読み込み、資料ごとの最新取引から導かれる状態と
/// 保存されている状態を比較する。不一致は警告ログに出力して返す。
///
/// 不変条件：`status == Issued` ⇔ 最新の確定済み取引がIssue
pub async fn audit_article_statuses(deps: &ServiceDependencies) -> Result<Vec<StatusMismatch>> {
    let ledger: Vec<Transaction> = deps
        .transactions
        .stream_all()
        .try_collect()
        .await
        .map_err(ApplicationError::StoreError)?;

    let latest = domain::ledger::latest_per_article(&ledger);

    let articles = deps
        .articles
        .list_all()
        .await
        .map_err(ApplicationError::StoreError)?;

    let mismatches: Vec<StatusMismatch> = articles
        .into_iter()
        .filter_map(|article| {
            let expected =
                domain::ledger::derived_status(latest.get(&article.article_id).copied());
            (expected != article.status).then_some(StatusMismatch {
                article_id: article.article_id,
                stored: article.status,
                expected,
            })
        })
        .collect();

    for mismatch in &mismatches {
        tracing::warn!(
            article_id = %mismatch.article_id,
            stored = mismatch.stored.as_str(),
            expected = mismatch.expected.as_str(),
            "Article status disagrees with ledger"
        );
    }

    Ok(mismatches)
}
