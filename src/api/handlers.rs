use crate::application::{
    ApplicationError, ServiceDependencies,
    account::{login as execute_login, signup as execute_signup},
    catalog::{
        get_article_details as execute_get_article_details, get_library_settings,
        list_articles as execute_list_articles,
    },
    membership::{
        check_membership_eligibility, get_member_activity as execute_get_member_activity,
        get_membership_status as execute_get_membership_status,
        join_membership as execute_join_membership,
    },
    rental::{
        list_rented_articles as execute_list_rented_articles, rent_article as execute_rent_article,
        return_article as execute_return_article,
    },
};
use crate::domain::{
    ArticleId, TransactionId,
    commands::{JoinMembership, Login, RentArticle, ReturnArticle, Signup},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    extractor::CurrentCaller,
    types::{
        ArticleDetails, ArticleDetailsResponse, ArticleListResponse, ArticleReturnedResponse,
        ArticleSummary, EligibilityResponse, Envelope, ErrorResponse, HealthResponse, LoginRequest,
        LoginResponse, MemberActivityResponse, MembershipCreatedResponse, MembershipItem,
        MembershipStatusResponse, RentArticleRequest, RentalCreatedResponse,
        RentedArticleItem, RentedArticlesResponse, SettingsResponse, SignupRequest,
        SignupResponse, UserInfo,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// JSONボディの拒否を入力エラーとして扱う
fn body_or_invalid<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::from(ApplicationError::InvalidInput(rejection.body_text())))
}

// ============================================================================
// Health
// ============================================================================

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ============================================================================
// Account handlers
// ============================================================================

/// POST /api/auth/signup - アカウント登録
///
/// 登録後そのままログインし、トークンを返す。
pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<SignupResponse> {
    let req = body_or_invalid(payload)?;
    let cmd = Signup {
        full_name: req.full_name.unwrap_or_default(),
        email: req.email.unwrap_or_default(),
        password: req.password.unwrap_or_default(),
        redirect_to: req.redirect_to,
        now: Utc::now(),
    };

    let outcome = execute_signup(&state.service_deps, cmd).await?;

    Ok(Json(Envelope::ok(
        "Account created successfully! You are now logged in.",
        SignupResponse {
            user: UserInfo::from(&outcome.account),
            library_member: outcome.member.member_id.value(),
            token: outcome.token,
            redirect_url: outcome.redirect_url,
        },
    )))
}

/// POST /api/auth/login - ログイン
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let req = body_or_invalid(payload)?;
    let cmd = Login {
        email: req.email.unwrap_or_default(),
        password: req.password.unwrap_or_default(),
        next: req.next,
        now: Utc::now(),
    };

    let outcome = execute_login(&state.service_deps, cmd).await?;

    Ok(Json(Envelope::ok(
        "Logged in successfully.",
        LoginResponse {
            user: UserInfo::from(&outcome.account),
            token: outcome.token,
            redirect_url: outcome.redirect_url,
        },
    )))
}

// ============================================================================
// Catalog handlers
// ============================================================================

/// GET /api/settings - 図書館設定
///
/// ストアが読めない場合も設定ファイルの値を返すが、`success` はfalseになる。
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<Envelope<SettingsResponse>> {
    let lookup = get_library_settings(&state.service_deps).await;
    let data = SettingsResponse {
        loan_period: lookup.settings.loan_period,
        max_articles_per_user: lookup.settings.max_articles_per_user,
    };

    if lookup.fell_back {
        Json(Envelope {
            success: false,
            message: "Error retrieving library settings, using defaults".to_string(),
            data,
        })
    } else {
        Json(Envelope::ok("Library settings retrieved successfully", data))
    }
}

/// GET /api/articles - 資料一覧（登録日の新しい順）
pub async fn list_articles(State(state): State<Arc<AppState>>) -> ApiResult<ArticleListResponse> {
    let articles: Vec<ArticleSummary> = execute_list_articles(&state.service_deps)
        .await?
        .into_iter()
        .map(ArticleSummary::from)
        .collect();
    let count = articles.len();

    Ok(Json(Envelope::ok(
        format!("Found {} articles", count),
        ArticleListResponse { articles, count },
    )))
}

/// GET /api/articles/:article_id - 資料詳細
pub async fn get_article_details(
    State(state): State<Arc<AppState>>,
    Path(article_id): Path<String>,
) -> ApiResult<ArticleDetailsResponse> {
    // 形式が不正なIDの資料は存在しない
    let article_id = Uuid::parse_str(&article_id)
        .map(ArticleId::from_uuid)
        .map_err(|_| ApplicationError::ArticleNotFound)?;

    let article = execute_get_article_details(&state.service_deps, article_id).await?;

    Ok(Json(Envelope::ok(
        "Article details retrieved successfully",
        ArticleDetailsResponse {
            data: ArticleDetails::from(article),
        },
    )))
}

// ============================================================================
// Rental handlers
// ============================================================================

/// POST /api/rentals - 資料を借りる
///
/// 強制されるビジネスルール:
/// - 会員が存在すること
/// - 今日を含む会員資格があること
/// - 貸出中の冊数が上限未満であること
/// - 資料が貸出可能であること
pub async fn rent_article(
    State(state): State<Arc<AppState>>,
    CurrentCaller(caller): CurrentCaller,
    payload: Result<Json<RentArticleRequest>, JsonRejection>,
) -> ApiResult<RentalCreatedResponse> {
    let req = body_or_invalid(payload)?;
    // 形式が不正なIDは存在しない資料として扱い、確認順序を崩さない
    let article_id = req
        .article
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(|raw| ArticleId::from_uuid(Uuid::parse_str(&raw).unwrap_or(Uuid::nil())));

    let now = Utc::now();
    let cmd = RentArticle {
        caller,
        article_id,
        today: now.date_naive(),
        now,
    };

    let receipt = execute_rent_article(&state.service_deps, cmd).await?;

    Ok(Json(Envelope::ok(
        format!(
            "You have successfully rented the article! Due date: {}",
            receipt.due_date
        ),
        RentalCreatedResponse {
            transaction_id: receipt.transaction_id.value(),
            due_date: receipt.due_date,
        },
    )))
}

/// POST /api/rentals/:transaction_id/return - 資料を返却
///
/// 貸出（Issue）取引に対して返却取引を作成し、資料を貸出可能に戻す。
pub async fn return_article(
    State(state): State<Arc<AppState>>,
    CurrentCaller(caller): CurrentCaller,
    Path(transaction_id): Path<String>,
) -> ApiResult<ArticleReturnedResponse> {
    let transaction_id =
        TransactionId::from_uuid(Uuid::parse_str(transaction_id.trim()).unwrap_or(Uuid::nil()));

    let now = Utc::now();
    let cmd = ReturnArticle {
        caller,
        transaction_id: Some(transaction_id),
        today: now.date_naive(),
        now,
    };

    let returned = execute_return_article(&state.service_deps, cmd).await?;

    Ok(Json(Envelope::ok(
        "Article returned successfully!",
        ArticleReturnedResponse {
            transaction_id: returned.transaction_id.value(),
        },
    )))
}

/// GET /api/rentals - 貸出中の資料一覧（貸出日の新しい順）
pub async fn list_rented_articles(
    State(state): State<Arc<AppState>>,
    CurrentCaller(caller): CurrentCaller,
) -> ApiResult<RentedArticlesResponse> {
    let data: Vec<RentedArticleItem> =
        execute_list_rented_articles(&state.service_deps, &caller, Utc::now())
            .await?
            .into_iter()
            .map(RentedArticleItem::from)
            .collect();
    let count = data.len();

    Ok(Json(Envelope::ok(
        format!("Found {} rented articles", count),
        RentedArticlesResponse { data, count },
    )))
}

// ============================================================================
// Membership handlers
// ============================================================================

/// POST /api/membership/join - 会員資格に加入
pub async fn join_membership(
    State(state): State<Arc<AppState>>,
    CurrentCaller(caller): CurrentCaller,
) -> ApiResult<MembershipCreatedResponse> {
    let now = Utc::now();
    let cmd = JoinMembership {
        caller,
        today: now.date_naive(),
        now,
    };

    let membership = execute_join_membership(&state.service_deps, cmd).await?;

    Ok(Json(Envelope::ok(
        format!(
            "Membership created successfully! Valid until {}",
            membership.to_date
        ),
        MembershipCreatedResponse {
            membership: MembershipItem::from(membership),
        },
    )))
}

/// GET /api/membership/eligibility - 加入可否の確認
pub async fn check_eligibility(
    State(state): State<Arc<AppState>>,
    CurrentCaller(caller): CurrentCaller,
) -> ApiResult<EligibilityResponse> {
    let eligibility =
        check_membership_eligibility(&state.service_deps, &caller, Utc::now().date_naive()).await?;

    let message = if eligibility.eligible {
        "You are eligible to join membership."
    } else {
        "You already have an active membership."
    };

    Ok(Json(Envelope::ok(
        message,
        EligibilityResponse::from(eligibility),
    )))
}

/// GET /api/membership/status - 有効な会員資格
pub async fn get_membership_status(
    State(state): State<Arc<AppState>>,
    CurrentCaller(caller): CurrentCaller,
) -> ApiResult<MembershipStatusResponse> {
    let status =
        execute_get_membership_status(&state.service_deps, &caller, Utc::now().date_naive())
            .await?;

    let message = if status.member.is_none() {
        "No library member found for your account.".to_string()
    } else {
        format!("Found {} active memberships", status.active.len())
    };
    let has_membership = status.has_membership();
    let memberships: Vec<MembershipItem> =
        status.active.into_iter().map(MembershipItem::from).collect();

    Ok(Json(Envelope::ok(
        message,
        MembershipStatusResponse {
            has_membership,
            count: memberships.len(),
            memberships,
        },
    )))
}

/// GET /api/members/me/activity - 会員の全取引と全会員資格
pub async fn get_member_activity(
    State(state): State<Arc<AppState>>,
    CurrentCaller(caller): CurrentCaller,
) -> ApiResult<MemberActivityResponse> {
    let activity = execute_get_member_activity(&state.service_deps, &caller).await?;

    Ok(Json(Envelope::ok(
        "Member activity retrieved",
        MemberActivityResponse::from(activity),
    )))
}

/// 未定義のルート
pub async fn not_found() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("NOT_FOUND", "Route not found"))
}
