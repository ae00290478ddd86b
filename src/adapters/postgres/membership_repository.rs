use crate::domain::{MemberId, Membership};
use crate::ports::membership_repository::{
    MembershipRepository as MembershipRepositoryTrait, Result,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use super::rows::map_row_to_membership;

/// MembershipRepositoryのPostgreSQL実装
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepositoryTrait for MembershipRepository {
    async fn find_by_member(&self, member_id: MemberId) -> Result<Vec<Membership>> {
        let rows = sqlx::query(
            r#"
            SELECT membership_id, member_id, from_date, to_date, created_at
            FROM memberships
            WHERE member_id = $1
            ORDER BY from_date DESC
            "#,
        )
        .bind(member_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_membership).collect()
    }

    async fn find_active(&self, member_id: MemberId, today: NaiveDate) -> Result<Vec<Membership>> {
        let rows = sqlx::query(
            r#"
            SELECT membership_id, member_id, from_date, to_date, created_at
            FROM memberships
            WHERE member_id = $1
              AND from_date <= $2
              AND to_date >= $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(member_id.value())
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_membership).collect()
    }
}
