use thiserror::Error;

use crate::domain::{JoinMembershipError, RentArticleError, ReturnArticleError};
use crate::ports::PortError;

/// アプリケーション層のエラー
///
/// `Display` の文字列はそのまま利用者向けメッセージとして返される。
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 呼び出し元が未認証
    #[error("Please log in to continue.")]
    Unauthenticated,

    /// 入力値が不足・不正
    #[error("{0}")]
    InvalidInput(String),

    /// 会員が存在しない
    #[error("No library member found for your account.")]
    MemberNotFound,

    /// 資料が存在しない
    #[error("Article not found")]
    ArticleNotFound,

    /// 取引が存在しない
    #[error("Transaction not found")]
    TransactionNotFound,

    /// ユーザーアカウントが存在しない
    #[error("User not found.")]
    UserNotFound,

    /// 有効な会員資格がない
    #[error("You need an active library membership to rent articles.")]
    NotEligible,

    /// 貸出上限に達している
    #[error(
        "You have reached the maximum limit of {max} articles. Please return some articles before renting new ones."
    )]
    LimitExceeded { max: u32 },

    /// 資料が貸出中
    #[error("This article is not available for rent.")]
    NotAvailable,

    /// 貸出取引以外を返却しようとした
    #[error("This is not a rental transaction.")]
    InvalidTransactionType,

    /// 既に有効な会員資格がある
    #[error("You already have an active membership.")]
    AlreadyActive,

    /// 登録済みのメールアドレス
    #[error("This email is already registered. Please login instead.")]
    EmailAlreadyRegistered,

    /// 無効化されたアカウント
    #[error("This account exists but is disabled. Please contact support.")]
    AccountDisabled,

    /// 認証情報が誤っている
    #[error("{0}")]
    InvalidCredentials(String),

    /// ストアのエラー
    #[error("Store error")]
    StoreError(#[source] PortError),

    /// パスワードハッシュのエラー
    #[error("Password hashing failed: {0}")]
    PasswordHashError(String),

    /// トークンのエラー
    #[error("Token error")]
    TokenError(#[source] jsonwebtoken::errors::Error),
}

impl From<RentArticleError> for ApplicationError {
    fn from(err: RentArticleError) -> Self {
        match err {
            RentArticleError::NoActiveMembership => ApplicationError::NotEligible,
            RentArticleError::LimitExceeded { max } => ApplicationError::LimitExceeded { max },
            RentArticleError::NotAvailable => ApplicationError::NotAvailable,
        }
    }
}

impl From<ReturnArticleError> for ApplicationError {
    fn from(err: ReturnArticleError) -> Self {
        match err {
            ReturnArticleError::NotAnIssueTransaction => ApplicationError::InvalidTransactionType,
        }
    }
}

impl From<JoinMembershipError> for ApplicationError {
    fn from(err: JoinMembershipError) -> Self {
        match err {
            JoinMembershipError::AlreadyActive => ApplicationError::AlreadyActive,
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, ApplicationError>;
