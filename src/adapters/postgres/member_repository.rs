use crate::domain::{Email, Member};
use crate::ports::member_repository::{MemberRepository as MemberRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::map_row_to_member;

/// MemberRepositoryのPostgreSQL実装
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepositoryTrait for MemberRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Member>> {
        let row = sqlx::query(
            r#"
            SELECT member_id, first_name, last_name, email, created_at
            FROM members
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_member).transpose()
    }

    /// ON CONFLICT DO NOTHINGで同時登録を吸収し、保存済みの会員を読み直す
    async fn insert_if_absent(&self, member: Member) -> Result<Member> {
        sqlx::query(
            r#"
            INSERT INTO members (member_id, first_name, last_name, email, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(member.member_id.value())
        .bind(&member.first_name)
        .bind(&member.last_name)
        .bind(member.email.as_str())
        .bind(member.created_at)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query(
            r#"
            SELECT member_id, first_name, last_name, email, created_at
            FROM members
            WHERE email = $1
            "#,
        )
        .bind(member.email.as_str())
        .fetch_one(&self.pool)
        .await?;

        map_row_to_member(&row)
    }
}
