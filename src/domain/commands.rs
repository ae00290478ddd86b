use chrono::{DateTime, NaiveDate, Utc};

use super::{ArticleId, Caller, TransactionId};

/// コマンド：資料を借りる
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentArticle {
    pub caller: Caller,
    pub article_id: Option<ArticleId>,
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

/// コマンド：資料を返却する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnArticle {
    pub caller: Caller,
    pub transaction_id: Option<TransactionId>,
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

/// コマンド：会員資格に加入する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinMembership {
    pub caller: Caller,
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

/// コマンド：アカウントを登録する
///
/// パスワードを含むため `Debug` は実装しない。
#[derive(Clone)]
pub struct Signup {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub redirect_to: Option<String>,
    pub now: DateTime<Utc>,
}

/// コマンド：ログインする
#[derive(Clone)]
pub struct Login {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
    pub now: DateTime<Utc>,
}
