use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{ArticleId, ArticleStatus, MemberId, TransactionId};

/// 取引種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// 貸出
    Issue,
    /// 返却
    Return,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Issue => "Issue",
            TransactionType::Return => "Return",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Issue" => Ok(TransactionType::Issue),
            "Return" => Ok(TransactionType::Return),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

/// 取引 - 追記専用台帳のエントリ
///
/// 作成後は変更・削除されない。
/// 同日の取引は `created_at`、さらに同時刻なら台帳上の挿入順で前後を決める。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub article_id: ArticleId,
    pub member_id: MemberId,
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    pub submitted: bool,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_issue(&self) -> bool {
        self.transaction_type == TransactionType::Issue
    }
}

/// 資料ごとの最新の確定済み取引を求める
///
/// `(date, created_at)` が最大の取引を選ぶ。キーが等しい場合は
/// 後に現れた取引を優先するため、台帳は挿入順で渡すこと。
pub fn latest_per_article<'a, I>(ledger: I) -> HashMap<ArticleId, &'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut latest: HashMap<ArticleId, &'a Transaction> = HashMap::new();
    for txn in ledger.into_iter().filter(|t| t.submitted) {
        latest
            .entry(txn.article_id)
            .and_modify(|current| {
                if (txn.date, txn.created_at) >= (current.date, current.created_at) {
                    *current = txn;
                }
            })
            .or_insert(txn);
    }
    latest
}

/// 未返却の貸出取引
///
/// 最新取引が貸出である資料のみを、貸出日の新しい順に返す。
pub fn currently_issued(ledger: &[Transaction]) -> Vec<&Transaction> {
    let mut issued: Vec<&Transaction> = latest_per_article(ledger)
        .into_values()
        .filter(|t| t.is_issue())
        .collect();
    issued.sort_by(|a, b| (b.date, b.created_at).cmp(&(a.date, a.created_at)));
    issued
}

/// 貸出中の冊数
pub fn issued_count(ledger: &[Transaction]) -> usize {
    latest_per_article(ledger)
        .values()
        .filter(|t| t.is_issue())
        .count()
}

/// 最新取引から導かれる資料の状態
pub fn derived_status(latest: Option<&Transaction>) -> ArticleStatus {
    match latest {
        Some(txn) if txn.is_issue() => ArticleStatus::Issued,
        _ => ArticleStatus::Available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    fn txn(
        article_id: ArticleId,
        member_id: MemberId,
        transaction_type: TransactionType,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Transaction {
        Transaction {
            transaction_id: TransactionId::new(),
            article_id,
            member_id,
            transaction_type,
            date,
            submitted: true,
            created_at,
        }
    }

    #[test]
    fn test_latest_per_article_orders_by_date_then_creation() {
        let article = ArticleId::new();
        let member = MemberId::new();
        let t0 = Utc::now();

        let ledger = vec![
            txn(article, member, TransactionType::Issue, date(1), t0),
            txn(article, member, TransactionType::Return, date(3), t0),
            // 作成は後だが日付が古い
            txn(article, member, TransactionType::Issue, date(2), t0 + Duration::hours(1)),
        ];

        let latest = latest_per_article(&ledger);
        assert_eq!(latest[&article].transaction_type, TransactionType::Return);
    }

    #[test]
    fn test_same_day_uses_creation_order() {
        let article = ArticleId::new();
        let member = MemberId::new();
        let t0 = Utc::now();

        let ledger = vec![
            txn(article, member, TransactionType::Issue, date(1), t0),
            txn(article, member, TransactionType::Return, date(1), t0 + Duration::seconds(1)),
            txn(article, member, TransactionType::Issue, date(1), t0 + Duration::seconds(2)),
        ];

        assert_eq!(issued_count(&ledger), 1);
        assert_eq!(
            derived_status(latest_per_article(&ledger).get(&article).copied()),
            ArticleStatus::Issued
        );
    }

    #[test]
    fn test_identical_keys_prefer_later_entry() {
        let article = ArticleId::new();
        let member = MemberId::new();
        let t0 = Utc::now();

        let ledger = vec![
            txn(article, member, TransactionType::Issue, date(1), t0),
            txn(article, member, TransactionType::Return, date(1), t0),
        ];

        assert_eq!(issued_count(&ledger), 0);
    }

    #[test]
    fn test_unsubmitted_transactions_are_ignored() {
        let article = ArticleId::new();
        let member = MemberId::new();
        let t0 = Utc::now();

        let mut draft = txn(article, member, TransactionType::Issue, date(2), t0);
        draft.submitted = false;
        let ledger = vec![draft];

        assert_eq!(issued_count(&ledger), 0);
        assert!(currently_issued(&ledger).is_empty());
    }

    #[test]
    fn test_currently_issued_sorted_newest_first() {
        let member = MemberId::new();
        let (a1, a2, a3) = (ArticleId::new(), ArticleId::new(), ArticleId::new());
        let t0 = Utc::now();

        let ledger = vec![
            txn(a1, member, TransactionType::Issue, date(1), t0),
            txn(a2, member, TransactionType::Issue, date(4), t0),
            txn(a3, member, TransactionType::Issue, date(2), t0),
            txn(a3, member, TransactionType::Return, date(3), t0),
        ];

        let issued = currently_issued(&ledger);
        let ids: Vec<ArticleId> = issued.iter().map(|t| t.article_id).collect();
        assert_eq!(ids, vec![a2, a1]);
    }

    #[test]
    fn test_derived_status_without_history_is_available() {
        assert_eq!(derived_status(None), ArticleStatus::Available);
    }
}
