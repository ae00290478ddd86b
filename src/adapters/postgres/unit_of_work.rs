use crate::domain::{
    Article, ArticleId, ArticleStatus, Email, Member, MemberId, Membership, Transaction,
    TransactionId, UserAccount,
};
use crate::ports::unit_of_work::{
    Result, UnitOfWork as UnitOfWorkTrait, UnitOfWorkFactory as UnitOfWorkFactoryTrait,
};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres};

use super::rows::{
    map_row_to_account, map_row_to_article, map_row_to_member, map_row_to_membership,
    map_row_to_transaction,
};

/// UnitOfWorkFactoryのPostgreSQL実装
pub struct UnitOfWorkFactory {
    pool: PgPool,
}

impl UnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactoryTrait for UnitOfWorkFactory {
    async fn begin(&self) -> Result<Box<dyn UnitOfWorkTrait>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(UnitOfWork { tx }))
    }
}

/// 1つのデータベーストランザクションに対応する作業単位
///
/// ロックは `SELECT ... FOR UPDATE` で取得し、コミットまたはロールバックで解放される。
/// `commit` せずに破棄した場合、sqlxがトランザクションをロールバックする。
pub struct UnitOfWork {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWorkTrait for UnitOfWork {
    async fn lock_member(&mut self, email: &Email) -> Result<Option<Member>> {
        let row = sqlx::query(
            r#"
            SELECT member_id, first_name, last_name, email, created_at
            FROM members
            WHERE email = $1
            FOR UPDATE
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(map_row_to_member).transpose()
    }

    async fn lock_article(&mut self, article_id: ArticleId) -> Result<Option<Article>> {
        let row = sqlx::query(
            r#"
            SELECT article_id, title, author, publisher, isbn, description,
                   image, route, status, created_at
            FROM articles
            WHERE article_id = $1
            FOR UPDATE
            "#,
        )
        .bind(article_id.value())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(map_row_to_article).transpose()
    }

    async fn memberships(&mut self, member_id: MemberId) -> Result<Vec<Membership>> {
        let rows = sqlx::query(
            r#"
            SELECT membership_id, member_id, from_date, to_date, created_at
            FROM memberships
            WHERE member_id = $1
            ORDER BY from_date DESC
            "#,
        )
        .bind(member_id.value())
        .fetch_all(&mut *self.tx)
        .await?;

        rows.iter().map(map_row_to_membership).collect()
    }

    async fn member_ledger(&mut self, member_id: MemberId) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT transaction_id, article_id, member_id, transaction_type,
                   date, submitted, created_at
            FROM transactions
            WHERE member_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(member_id.value())
        .fetch_all(&mut *self.tx)
        .await?;

        rows.iter().map(map_row_to_transaction).collect()
    }

    async fn transaction(&mut self, transaction_id: TransactionId) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT transaction_id, article_id, member_id, transaction_type,
                   date, submitted, created_at
            FROM transactions
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id.value())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(map_row_to_transaction).transpose()
    }

    async fn append_transaction(&mut self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                transaction_id, article_id, member_id, transaction_type,
                date, submitted, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(transaction.transaction_id.value())
        .bind(transaction.article_id.value())
        .bind(transaction.member_id.value())
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.date)
        .bind(transaction.submitted)
        .bind(transaction.created_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn save_article_status(
        &mut self,
        article_id: ArticleId,
        status: ArticleStatus,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE articles
            SET status = $2
            WHERE article_id = $1
            "#,
        )
        .bind(article_id.value())
        .bind(status.as_str())
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() != 1 {
            return Err(format!("article {} does not exist", article_id).into());
        }
        Ok(())
    }

    async fn insert_membership(&mut self, membership: &Membership) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO memberships (membership_id, member_id, from_date, to_date, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(membership.membership_id.value())
        .bind(membership.member_id.value())
        .bind(membership.from_date)
        .bind(membership.to_date)
        .bind(membership.created_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn account(&mut self, email: &Email) -> Result<Option<UserAccount>> {
        let row = sqlx::query(
            r#"
            SELECT email, full_name, password_hash, enabled, roles, created_at
            FROM user_accounts
            WHERE email = $1
            FOR UPDATE
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(map_row_to_account).transpose()
    }

    /// 同時登録は一意制約で待たされ、先行側のコミット後に0行となる
    async fn insert_account(&mut self, account: &UserAccount) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_accounts (email, full_name, password_hash, enabled, roles, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(account.email.as_str())
        .bind(&account.full_name)
        .bind(&account.password_hash)
        .bind(account.enabled)
        .bind(&account.roles)
        .bind(account.created_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn insert_member_if_absent(&mut self, member: &Member) -> Result<Member> {
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
        .execute(&mut *self.tx)
        .await?;

        let row = sqlx::query(
            r#"
            SELECT member_id, first_name, last_name, email, created_at
            FROM members
            WHERE email = $1
            "#,
        )
        .bind(member.email.as_str())
        .fetch_one(&mut *self.tx)
        .await?;

        map_row_to_member(&row)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let this = *self;
        this.tx.commit().await?;
        Ok(())
    }
}
