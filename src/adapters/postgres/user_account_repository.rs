use crate::domain::{Email, UserAccount};
use crate::ports::user_account_repository::{
    Result, UserAccountRepository as UserAccountRepositoryTrait,
};
use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::map_row_to_account;

/// UserAccountRepositoryのPostgreSQL実装
pub struct UserAccountRepository {
    pool: PgPool,
}

impl UserAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserAccountRepositoryTrait for UserAccountRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserAccount>> {
        let row = sqlx::query(
            r#"
            SELECT email, full_name, password_hash, enabled, roles, created_at
            FROM user_accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_account).transpose()
    }
}
