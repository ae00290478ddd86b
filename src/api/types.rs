use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::membership::{Eligibility, MemberActivity};
use crate::application::rental::RentedArticle;
use crate::domain::{Article, Membership, Transaction, UserAccount};

// ============================================================================
// Envelope
// ============================================================================

/// 全操作共通のレスポンス形式
///
/// `{ "success": bool, "message": string, ...操作ごとのフィールド }`
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_disabled: Option<bool>,
}

impl ErrorResponse {
    pub fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error,
            user_exists: None,
            user_disabled: None,
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub redirect_to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub next: Option<String>,
}

/// 貸出リクエスト（`article` は資料ID）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RentArticleRequest {
    pub article: Option<String>,
}

// ============================================================================
// Account responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub name: String,
    pub full_name: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<&UserAccount> for UserInfo {
    fn from(account: &UserAccount) -> Self {
        Self {
            name: account.email.to_string(),
            full_name: account.full_name.clone(),
            email: account.email.to_string(),
            roles: account.roles.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: UserInfo,
    pub library_member: Uuid,
    pub token: String,
    pub redirect_url: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserInfo,
    pub token: String,
    pub redirect_url: String,
}

// ============================================================================
// Catalog responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub loan_period: u32,
    pub max_articles_per_user: u32,
}

/// 資料一覧の1件
#[derive(Debug, Serialize)]
pub struct ArticleSummary {
    pub article_id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub creation: DateTime<Utc>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub route: Option<String>,
    pub formatted_date: String,
    pub description_preview: Option<String>,
}

impl From<Article> for ArticleSummary {
    fn from(article: Article) -> Self {
        Self {
            article_id: article.article_id.value(),
            title: article.display_title(),
            description_preview: article.description_preview(),
            formatted_date: article.created_at.format("%d-%m-%Y").to_string(),
            status: article.status.as_str().to_string(),
            creation: article.created_at,
            author: article.author,
            description: article.description,
            publisher: article.publisher,
            isbn: article.isbn,
            route: article.route,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleListResponse {
    pub articles: Vec<ArticleSummary>,
    pub count: usize,
}

/// 資料詳細
#[derive(Debug, Serialize)]
pub struct ArticleDetails {
    pub article_id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub image: Option<String>,
    pub creation: DateTime<Utc>,
    pub route: Option<String>,
}

impl From<Article> for ArticleDetails {
    fn from(article: Article) -> Self {
        Self {
            article_id: article.article_id.value(),
            title: article.display_title(),
            status: article.status.as_str().to_string(),
            creation: article.created_at,
            author: article.author,
            description: article.description,
            publisher: article.publisher,
            isbn: article.isbn,
            image: article.image,
            route: article.route,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleDetailsResponse {
    pub data: ArticleDetails,
}

// ============================================================================
// Rental responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RentalCreatedResponse {
    pub transaction_id: Uuid,
    pub due_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ArticleReturnedResponse {
    pub transaction_id: Uuid,
}

/// 貸出中の資料（一覧の1件）
#[derive(Debug, Serialize)]
pub struct RentedArticleItem {
    pub article: Uuid,
    pub rental_date: NaiveDate,
    pub transaction_id: Uuid,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub description: Option<String>,
}

impl From<RentedArticle> for RentedArticleItem {
    fn from(rented: RentedArticle) -> Self {
        Self {
            article: rented.article.article_id.value(),
            rental_date: rented.rental_date,
            transaction_id: rented.transaction_id.value(),
            title: rented.article.title,
            author: rented.article.author,
            publisher: rented.article.publisher,
            isbn: rented.article.isbn,
            description: rented.article.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RentedArticlesResponse {
    pub data: Vec<RentedArticleItem>,
    pub count: usize,
}

// ============================================================================
// Membership responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MembershipItem {
    pub membership_id: Uuid,
    pub member_id: Uuid,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl From<Membership> for MembershipItem {
    fn from(membership: Membership) -> Self {
        Self {
            membership_id: membership.membership_id.value(),
            member_id: membership.member_id.value(),
            from_date: membership.from_date,
            to_date: membership.to_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MembershipCreatedResponse {
    pub membership: MembershipItem,
}

#[derive(Debug, Serialize)]
pub struct EligibilityResponse {
    pub eligible: bool,
    pub needs_member_creation: bool,
}

impl From<Eligibility> for EligibilityResponse {
    fn from(eligibility: Eligibility) -> Self {
        Self {
            eligible: eligibility.eligible,
            needs_member_creation: eligibility.needs_member_creation,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MembershipStatusResponse {
    pub has_membership: bool,
    pub memberships: Vec<MembershipItem>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct TransactionItem {
    pub transaction_id: Uuid,
    pub article: Uuid,
    pub transaction_type: String,
    pub date: NaiveDate,
    pub submitted: bool,
}

impl From<Transaction> for TransactionItem {
    fn from(txn: Transaction) -> Self {
        Self {
            transaction_id: txn.transaction_id.value(),
            article: txn.article_id.value(),
            transaction_type: txn.transaction_type.as_str().to_string(),
            date: txn.date,
            submitted: txn.submitted,
        }
    }
}

/// 会員の全履歴
#[derive(Debug, Serialize)]
pub struct MemberActivityResponse {
    pub email: String,
    pub library_member: Uuid,
    pub all_transactions: Vec<TransactionItem>,
    pub all_memberships: Vec<MembershipItem>,
    pub transaction_count: usize,
    pub membership_count: usize,
}

impl From<MemberActivity> for MemberActivityResponse {
    fn from(activity: MemberActivity) -> Self {
        Self {
            email: activity.member.email.to_string(),
            library_member: activity.member.member_id.value(),
            transaction_count: activity.transactions.len(),
            membership_count: activity.memberships.len(),
            all_transactions: activity
                .transactions
                .into_iter()
                .map(TransactionItem::from)
                .collect(),
            all_memberships: activity
                .memberships
                .into_iter()
                .map(MembershipItem::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
