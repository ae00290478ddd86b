use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ArticleId;

/// 一覧表示用の説明文プレビューの最大文字数
pub const DESCRIPTION_PREVIEW_CHARS: usize = 150;

/// 資料の貸出状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticleStatus {
    /// 貸出可能
    Available,
    /// 貸出中
    Issued,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Available => "Available",
            ArticleStatus::Issued => "Issued",
        }
    }
}

impl std::str::FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(ArticleStatus::Available),
            "Issued" => Ok(ArticleStatus::Issued),
            _ => Err(format!("Invalid article status: {}", s)),
        }
    }
}

/// 資料
///
/// `status` は取引の作成に伴ってのみ変化する唯一の可変フィールド。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub article_id: ArticleId,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub route: Option<String>,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
}

impl Article {
    pub fn is_available(&self) -> bool {
        self.status == ArticleStatus::Available
    }

    /// タイトル未設定ならIDを表示名にする
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| self.article_id.to_string())
    }

    /// 説明文の先頭150文字（超える場合は `...` を付与）
    pub fn description_preview(&self) -> Option<String> {
        self.description.as_deref().map(|text| {
            if text.chars().count() > DESCRIPTION_PREVIEW_CHARS {
                let head: String = text.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
                format!("{}...", head)
            } else {
                text.to_string()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(description: Option<&str>) -> Article {
        Article {
            article_id: ArticleId::new(),
            title: None,
            author: None,
            publisher: None,
            isbn: None,
            description: description.map(str::to_string),
            image: None,
            route: None,
            status: ArticleStatus::Available,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [ArticleStatus::Available, ArticleStatus::Issued] {
            assert_eq!(status.as_str().parse::<ArticleStatus>().unwrap(), status);
        }
        assert!("Lost".parse::<ArticleStatus>().is_err());
    }

    #[test]
    fn test_display_title_falls_back_to_id() {
        let a = article(None);
        assert_eq!(a.display_title(), a.article_id.to_string());
    }

    #[test]
    fn test_description_preview_short_text_unchanged() {
        let a = article(Some("short"));
        assert_eq!(a.description_preview().as_deref(), Some("short"));
    }

    #[test]
    fn test_description_preview_truncates_long_text() {
        let long = "x".repeat(200);
        let a = article(Some(&long));
        let preview = a.description_preview().unwrap();
        assert_eq!(preview.len(), 153);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_description_preview_exactly_at_limit() {
        let exact = "y".repeat(DESCRIPTION_PREVIEW_CHARS);
        let a = article(Some(&exact));
        assert_eq!(a.description_preview().unwrap(), exact);
    }
}
