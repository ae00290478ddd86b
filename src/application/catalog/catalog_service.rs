use crate::application::dependencies::ServiceDependencies;
use crate::application::errors::{ApplicationError, Result};
use crate::domain::{Article, ArticleId, LibrarySettings};

/// 設定の取得結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsLookup {
    pub settings: LibrarySettings,
    /// ストアから読めずにフォールバック値を返した
    pub fell_back: bool,
}

/// 図書館設定を取得する
///
/// 表示用。ストアが失敗してもフォールバック値を返し、エラーにはしない。
pub async fn get_library_settings(deps: &ServiceDependencies) -> SettingsLookup {
    match deps.settings.load().await {
        Ok(settings) => SettingsLookup {
            settings,
            fell_back: false,
        },
        Err(e) => {
            tracing::error!(error = %e, "Error retrieving library settings");
            SettingsLookup {
                settings: deps.fallback_settings,
                fell_back: true,
            }
        }
    }
}

/// 全資料を登録日の新しい順に取得する
pub async fn list_articles(deps: &ServiceDependencies) -> Result<Vec<Article>> {
    deps.articles
        .list_all()
        .await
        .map_err(ApplicationError::StoreError)
}

/// 資料の詳細を取得する
pub async fn get_article_details(
    deps: &ServiceDependencies,
    article_id: ArticleId,
) -> Result<Article> {
    deps.articles
        .get_by_id(article_id)
        .await
        .map_err(ApplicationError::StoreError)?
        .ok_or(ApplicationError::ArticleNotFound)
}
