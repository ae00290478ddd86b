use crate::domain::LibrarySettings;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 図書館設定ストアポート
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// 現在の設定を読み込む
    ///
    /// 未設定の項目は既定値で補って返す。
    async fn load(&self) -> Result<LibrarySettings>;
}
