use crate::domain::{
    Article, ArticleId, ArticleStatus, Email, Member, MemberId, Membership, Transaction,
    TransactionId, UserAccount,
};
use crate::ports::{PortError, UnitOfWork, UnitOfWorkFactory};
use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::store::{MemoryStore, StoreState};

type Result<T> = std::result::Result<T, PortError>;

/// [`MemoryStore`] 上の作業単位
///
/// 生存中はストアのMutexを保持し、書き込みは複製に対して行う。
/// `commit` で複製を書き戻し、破棄した場合はストアに何も残らない。
/// ガードが排他的なので、会員と資料のロックはこれで兼ねる。
pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<StoreState>,
    staged: StoreState,
}

#[async_trait]
impl UnitOfWorkFactory for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, staged }))
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn lock_member(&mut self, email: &Email) -> Result<Option<Member>> {
        Ok(self.staged.member_by_email(email).cloned())
    }

    async fn lock_article(&mut self, article_id: ArticleId) -> Result<Option<Article>> {
        Ok(self.staged.article(article_id).cloned())
    }

    async fn memberships(&mut self, member_id: MemberId) -> Result<Vec<Membership>> {
        Ok(self.staged.memberships_of(member_id))
    }

    async fn member_ledger(&mut self, member_id: MemberId) -> Result<Vec<Transaction>> {
        Ok(self.staged.ledger_of(member_id))
    }

    async fn transaction(&mut self, transaction_id: TransactionId) -> Result<Option<Transaction>> {
        Ok(self.staged.transaction(transaction_id).cloned())
    }

    async fn append_transaction(&mut self, transaction: &Transaction) -> Result<()> {
        self.staged.transactions.push(transaction.clone());
        Ok(())
    }

    async fn save_article_status(
        &mut self,
        article_id: ArticleId,
        status: ArticleStatus,
    ) -> Result<()> {
        self.staged.set_article_status(article_id, status)
    }

    async fn insert_membership(&mut self, membership: &Membership) -> Result<()> {
        self.staged.memberships.push(membership.clone());
        Ok(())
    }

    async fn account(&mut self, email: &Email) -> Result<Option<UserAccount>> {
        Ok(self.staged.account(email).cloned())
    }

    async fn insert_account(&mut self, account: &UserAccount) -> Result<bool> {
        if self.staged.account(&account.email).is_some() {
            return Ok(false);
        }
        self.staged.accounts.push(account.clone());
        Ok(true)
    }

    async fn insert_member_if_absent(&mut self, member: &Member) -> Result<Member> {
        if let Some(existing) = self.staged.member_by_email(&member.email) {
            return Ok(existing.clone());
        }
        self.staged.members.push(member.clone());
        Ok(member.clone())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryUnitOfWork { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
