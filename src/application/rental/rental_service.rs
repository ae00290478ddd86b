use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

use crate::application::dependencies::{
    ServiceDependencies, find_or_register_member, load_settings, require_identity,
};
use crate::application::errors::{ApplicationError, Result};
use crate::domain::{self, Article, ArticleId, Caller, TransactionId, commands::*};

/// 貸出の受領情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalReceipt {
    pub transaction_id: TransactionId,
    pub article_id: ArticleId,
    pub due_date: NaiveDate,
}

/// 貸出中の資料
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentedArticle {
    pub article: Article,
    pub transaction_id: TransactionId,
    pub rental_date: NaiveDate,
}

/// 資料を借りる
///
/// ビジネスルール：
/// - 呼び出し元の会員が存在すること
/// - 今日を含む会員資格があること
/// - 貸出中の冊数が上限未満であること
/// - 資料がAvailableであること
///
/// # 一貫性保証
///
/// 会員と資料の行をロックした作業単位の中で、上限チェック・取引の追記・
/// 資料状態の更新を行う。途中で失敗した場合は作業単位を破棄し、何も書き込まない。
pub async fn rent_article(deps: &ServiceDependencies, cmd: RentArticle) -> Result<RentalReceipt> {
    let identity = require_identity(&cmd.caller)?;
    let article_id = cmd
        .article_id
        .ok_or_else(|| ApplicationError::InvalidInput("Article name is required.".to_string()))?;

    let settings = load_settings(deps).await;

    let mut uow = deps
        .unit_of_work
        .begin()
        .await
        .map_err(ApplicationError::StoreError)?;

    // 1. 会員をロック（上限チェックを直列化）
    let member = uow
        .lock_member(&identity.email)
        .await
        .map_err(ApplicationError::StoreError)?
        .ok_or(ApplicationError::MemberNotFound)?;

    // 2. 会員資格と貸出上限の確認
    let memberships = uow
        .memberships(member.member_id)
        .await
        .map_err(ApplicationError::StoreError)?;
    let ledger = uow
        .member_ledger(member.member_id)
        .await
        .map_err(ApplicationError::StoreError)?;

    domain::rental::ensure_can_rent(&memberships, &ledger, &settings, cmd.today)?;

    // 3. 資料をロックして貸出
    let article = uow
        .lock_article(article_id)
        .await
        .map_err(ApplicationError::StoreError)?
        .ok_or(ApplicationError::ArticleNotFound)?;

    let rental = domain::rental::issue_article(
        member.member_id,
        &article,
        &settings,
        cmd.today,
        cmd.now,
    )?;

    // 4. 取引の追記と状態更新を確定
    uow.append_transaction(&rental.transaction)
        .await
        .map_err(ApplicationError::StoreError)?;
    uow.save_article_status(article_id, rental.article.status)
        .await
        .map_err(ApplicationError::StoreError)?;
    uow.commit().await.map_err(ApplicationError::StoreError)?;

    tracing::info!(
        member_id = %member.member_id,
        article_id = %article_id,
        transaction_id = %rental.transaction.transaction_id,
        due_date = %rental.due_date,
        "Article rented"
    );

    Ok(RentalReceipt {
        transaction_id: rental.transaction.transaction_id,
        article_id,
        due_date: rental.due_date,
    })
}

/// 資料を返却する
///
/// ビジネスルール：
/// - 取引が存在し、貸出（Issue）であること
/// - 同じ貸出取引に対する返却済みの記録は確認しない（再貸出後の返却を妨げないため）
///
/// 返却取引は貸出取引と同じ会員・資料で作成される。
pub async fn return_article(
    deps: &ServiceDependencies,
    cmd: ReturnArticle,
) -> Result<domain::Transaction> {
    require_identity(&cmd.caller)?;
    let transaction_id = cmd
        .transaction_id
        .ok_or_else(|| ApplicationError::InvalidInput("Transaction ID is required.".to_string()))?;

    let mut uow = deps
        .unit_of_work
        .begin()
        .await
        .map_err(ApplicationError::StoreError)?;

    let issue = uow
        .transaction(transaction_id)
        .await
        .map_err(ApplicationError::StoreError)?
        .ok_or(ApplicationError::TransactionNotFound)?;

    if !issue.is_issue() {
        return Err(ApplicationError::InvalidTransactionType);
    }

    let article = uow
        .lock_article(issue.article_id)
        .await
        .map_err(ApplicationError::StoreError)?
        .ok_or(ApplicationError::ArticleNotFound)?;

    let returned = domain::rental::return_article(&issue, &article, cmd.today, cmd.now)?;

    uow.append_transaction(&returned.transaction)
        .await
        .map_err(ApplicationError::StoreError)?;
    uow.save_article_status(issue.article_id, returned.article.status)
        .await
        .map_err(ApplicationError::StoreError)?;
    uow.commit().await.map_err(ApplicationError::StoreError)?;

    tracing::info!(
        member_id = %issue.member_id,
        article_id = %issue.article_id,
        issue_transaction_id = %issue.transaction_id,
        transaction_id = %returned.transaction.transaction_id,
        "Article returned"
    );

    Ok(returned.transaction)
}

/// 呼び出し元が貸出中の資料一覧
///
/// 資料ごとに会員の最新取引を求め、貸出（Issue）のものだけを
/// 貸出日の新しい順に返す。会員が未登録なら登録してから検索する。
pub async fn list_rented_articles(
    deps: &ServiceDependencies,
    caller: &Caller,
    now: DateTime<Utc>,
) -> Result<Vec<RentedArticle>> {
    let identity = require_identity(caller)?;
    let member = find_or_register_member(deps, identity, now).await?;

    let ledger = deps
        .transactions
        .find_by_member(member.member_id)
        .await
        .map_err(ApplicationError::StoreError)?;

    let issued = domain::ledger::currently_issued(&ledger);
    let article_ids: Vec<ArticleId> = issued.iter().map(|t| t.article_id).collect();

    let mut articles: HashMap<ArticleId, Article> = deps
        .articles
        .find_by_ids(&article_ids)
        .await
        .map_err(ApplicationError::StoreError)?
        .into_iter()
        .map(|a| (a.article_id, a))
        .collect();

    // 目録から消えた資料は一覧に含めない
    let rented = issued
        .into_iter()
        .filter_map(|txn| {
            articles.remove(&txn.article_id).map(|article| RentedArticle {
                article,
                transaction_id: txn.transaction_id,
                rental_date: txn.date,
            })
        })
        .collect::<Vec<_>>();

    tracing::debug!(member_id = %member.member_id, count = rented.len(), "Rented articles listed");
    Ok(rented)
}
