use crate::domain::LibrarySettings;
use crate::ports::settings_store::{Result, SettingsStore as SettingsStoreTrait};
use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::rows::positive_setting;

/// 単一行の `library_settings` テーブルから設定を読む
///
/// 行がない、またはNULL・0以下の項目は `fallback` の値を使う。
pub struct SettingsStore {
    pool: PgPool,
    fallback: LibrarySettings,
}

impl SettingsStore {
    pub fn new(pool: PgPool, fallback: LibrarySettings) -> Self {
        Self { pool, fallback }
    }
}

#[async_trait]
impl SettingsStoreTrait for SettingsStore {
    async fn load(&self) -> Result<LibrarySettings> {
        let row = sqlx::query(
            r#"
            SELECT loan_period, max_articles_per_user
            FROM library_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(self.fallback);
        };

        Ok(self.fallback.overlay(
            positive_setting(row.get("loan_period")),
            positive_setting(row.get("max_articles_per_user")),
        ))
    }
}
