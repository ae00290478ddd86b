use crate::domain::{Article, ArticleId};
use crate::ports::article_repository::{ArticleRepository as ArticleRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::rows::map_row_to_article;

/// ArticleRepositoryのPostgreSQL実装
pub struct ArticleRepository {
    pool: PgPool,
}

impl ArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepositoryTrait for ArticleRepository {
    async fn get_by_id(&self, article_id: ArticleId) -> Result<Option<Article>> {
        let row = sqlx::query(
            r#"
            SELECT article_id, title, author, publisher, isbn, description,
                   image, route, status, created_at
            FROM articles
            WHERE article_id = $1
            "#,
        )
        .bind(article_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_article).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT article_id, title, author, publisher, isbn, description,
                   image, route, status, created_at
            FROM articles
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_article).collect()
    }

    async fn find_by_ids(&self, article_ids: &[ArticleId]) -> Result<Vec<Article>> {
        if article_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = article_ids.iter().map(|id| id.value()).collect();
        let rows = sqlx::query(
            r#"
            SELECT article_id, title, author, publisher, isbn, description,
                   image, route, status, created_at
            FROM articles
            WHERE article_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_article).collect()
    }

    async fn insert(&self, article: Article) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO articles (
                article_id, title, author, publisher, isbn, description,
                image, route, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(article.article_id.value())
        .bind(&article.title)
        .bind(&article.author)
        .bind(&article.publisher)
        .bind(&article.isbn)
        .bind(&article.description)
        .bind(&article.image)
        .bind(&article.route)
        .bind(article.status.as_str())
        .bind(article.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
