use serde::{Deserialize, Serialize};

/// 貸出期間の既定値（日数）
pub const DEFAULT_LOAN_PERIOD_DAYS: u32 = 14;

/// 会員1人あたりの最大貸出冊数の既定値
pub const DEFAULT_MAX_ARTICLES_PER_USER: u32 = 3;

/// 図書館設定
///
/// 呼び出しごとに設定ストアから読み込み、失敗時は既定値を使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySettings {
    pub loan_period: u32,
    pub max_articles_per_user: u32,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            loan_period: DEFAULT_LOAN_PERIOD_DAYS,
            max_articles_per_user: DEFAULT_MAX_ARTICLES_PER_USER,
        }
    }
}

impl LibrarySettings {
    /// 未設定（0）の項目を既定値で補う
    pub fn with_fallbacks(loan_period: Option<u32>, max_articles_per_user: Option<u32>) -> Self {
        Self::default().overlay(loan_period, max_articles_per_user)
    }

    /// 設定済み（1以上）の項目だけを上書きした設定を返す
    pub fn overlay(&self, loan_period: Option<u32>, max_articles_per_user: Option<u32>) -> Self {
        Self {
            loan_period: loan_period
                .filter(|v| *v > 0)
                .unwrap_or(self.loan_period),
            max_articles_per_user: max_articles_per_user
                .filter(|v| *v > 0)
                .unwrap_or(self.max_articles_per_user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = LibrarySettings::default();
        assert_eq!(settings.loan_period, 14);
        assert_eq!(settings.max_articles_per_user, 3);
    }

    #[test]
    fn test_with_fallbacks_fills_missing_and_zero() {
        let settings = LibrarySettings::with_fallbacks(None, Some(0));
        assert_eq!(settings, LibrarySettings::default());

        let settings = LibrarySettings::with_fallbacks(Some(21), Some(5));
        assert_eq!(settings.loan_period, 21);
        assert_eq!(settings.max_articles_per_user, 5);
    }

    #[test]
    fn test_overlay_keeps_base_for_unset_keys() {
        let base = LibrarySettings {
            loan_period: 7,
            max_articles_per_user: 2,
        };
        let settings = base.overlay(Some(30), None);
        assert_eq!(settings.loan_period, 30);
        assert_eq!(settings.max_articles_per_user, 2);
    }
}
