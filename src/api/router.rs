use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, check_eligibility, get_article_details, get_member_activity,
    get_membership_status, get_settings, health_check, join_membership, list_articles,
    list_rented_articles, login, not_found, rent_article, return_article, signup,
};

/// Creates the API router with all library endpoints
///
/// Every `/api` route answers HTTP 200 with a `{ success, message, ... }` envelope.
/// Routes that act for a member read the caller from an optional bearer token.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/settings", get(get_settings))
        .route("/articles", get(list_articles))
        .route("/articles/:article_id", get(get_article_details))
        .route("/rentals", post(rent_article).get(list_rented_articles))
        .route("/rentals/:transaction_id/return", post(return_article))
        .route("/membership/join", post(join_membership))
        .route("/membership/eligibility", get(check_eligibility))
        .route("/membership/status", get(get_membership_status))
        .route("/members/me/activity", get(get_member_activity));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .fallback(not_found)
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
