use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::{
    Article, ArticleStatus, LibrarySettings, MemberId, Membership, RentArticleError,
    ReturnArticleError, Transaction, TransactionId, TransactionType, ledger,
};

/// 貸出の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rental {
    pub transaction: Transaction,
    pub article: Article,
    pub due_date: NaiveDate,
}

/// 返却の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleReturn {
    pub transaction: Transaction,
    pub article: Article,
}

/// 純粋関数：会員が新たに借りられるか確認する
///
/// ビジネスルール：
/// - 今日を含む会員資格があること
/// - 貸出中の冊数が上限未満であること
///
/// 資料の状態は見ない。資料の確認は `issue_article` で行う。
pub fn ensure_can_rent(
    memberships: &[Membership],
    member_ledger: &[Transaction],
    settings: &LibrarySettings,
    today: NaiveDate,
) -> Result<(), RentArticleError> {
    if !memberships.iter().any(|m| m.is_active_on(today)) {
        return Err(RentArticleError::NoActiveMembership);
    }

    let max = settings.max_articles_per_user;
    if ledger::issued_count(member_ledger) >= max as usize {
        return Err(RentArticleError::LimitExceeded { max });
    }

    Ok(())
}

/// 純粋関数：資料を貸し出す
///
/// ビジネスルール：
/// - 資料がAvailableであること
/// - 返却期限は今日 + 貸出期間
///
/// 副作用なし。貸出取引と更新後の資料を返す。
pub fn issue_article(
    member_id: MemberId,
    article: &Article,
    settings: &LibrarySettings,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Rental, RentArticleError> {
    if !article.is_available() {
        return Err(RentArticleError::NotAvailable);
    }

    let transaction = Transaction {
        transaction_id: TransactionId::new(),
        article_id: article.article_id,
        member_id,
        transaction_type: TransactionType::Issue,
        date: today,
        submitted: true,
        created_at: now,
    };

    let article = Article {
        status: ArticleStatus::Issued,
        ..article.clone()
    };

    Ok(Rental {
        transaction,
        article,
        due_date: today + Duration::days(i64::from(settings.loan_period)),
    })
}

/// 純粋関数：資料を返却する
///
/// ビジネスルール：
/// - 参照する取引は貸出（Issue）であること
/// - 貸出と返却の1対1対応は強制しない（再貸出後の古い貸出取引による返却も受け付ける）
///
/// 副作用なし。返却取引と更新後の資料を返す。
pub fn return_article(
    issue: &Transaction,
    article: &Article,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<ArticleReturn, ReturnArticleError> {
    if issue.transaction_type != TransactionType::Issue {
        return Err(ReturnArticleError::NotAnIssueTransaction);
    }

    let transaction = Transaction {
        transaction_id: TransactionId::new(),
        article_id: issue.article_id,
        member_id: issue.member_id,
        transaction_type: TransactionType::Return,
        date: today,
        submitted: true,
        created_at: now,
    };

    let article = Article {
        status: ArticleStatus::Available,
        ..article.clone()
    };

    Ok(ArticleReturn {
        transaction,
        article,
    })
}
