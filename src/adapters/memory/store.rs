use crate::domain::{
    Article, ArticleId, ArticleStatus, Email, LibrarySettings, Member, MemberId, Membership,
    Transaction, TransactionId, UserAccount,
};
use crate::ports::{
    ArticleRepository, MemberRepository, MembershipRepository, PortError, SettingsStore,
    TransactionRepository, UserAccountRepository,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tokio::sync::Mutex;

type Result<T> = std::result::Result<T, PortError>;

/// インメモリストアのエラー
#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("article {0} already exists")]
    DuplicateArticle(ArticleId),
    #[error("article {0} does not exist")]
    UnknownArticle(ArticleId),
}

/// ストア全体のスナップショット
///
/// 作業単位はこれを複製して変更し、コミット時に書き戻す。
#[derive(Debug, Clone, Default)]
pub(super) struct StoreState {
    pub(super) members: Vec<Member>,
    pub(super) memberships: Vec<Membership>,
    pub(super) articles: Vec<Article>,
    /// 挿入順が台帳の順序
    pub(super) transactions: Vec<Transaction>,
    pub(super) accounts: Vec<UserAccount>,
    pub(super) loan_period: Option<u32>,
    pub(super) max_articles_per_user: Option<u32>,
}

impl StoreState {
    pub(super) fn member_by_email(&self, email: &Email) -> Option<&Member> {
        self.members.iter().find(|m| &m.email == email)
    }

    pub(super) fn article(&self, article_id: ArticleId) -> Option<&Article> {
        self.articles.iter().find(|a| a.article_id == article_id)
    }

    pub(super) fn memberships_of(&self, member_id: MemberId) -> Vec<Membership> {
        let mut memberships: Vec<Membership> = self
            .memberships
            .iter()
            .filter(|m| m.member_id == member_id)
            .cloned()
            .collect();
        memberships.sort_by(|a, b| b.from_date.cmp(&a.from_date));
        memberships
    }

    pub(super) fn ledger_of(&self, member_id: MemberId) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.member_id == member_id)
            .cloned()
            .collect()
    }

    pub(super) fn account(&self, email: &Email) -> Option<&UserAccount> {
        self.accounts.iter().find(|a| &a.email == email)
    }

    pub(super) fn transaction(&self, transaction_id: TransactionId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|t| t.transaction_id == transaction_id)
    }

    pub(super) fn set_article_status(
        &mut self,
        article_id: ArticleId,
        status: ArticleStatus,
    ) -> Result<()> {
        let article = self
            .articles
            .iter_mut()
            .find(|a| a.article_id == article_id)
            .ok_or(MemoryStoreError::UnknownArticle(article_id))?;
        article.status = status;
        Ok(())
    }
}

/// 全リポジトリポートのインメモリ実装
///
/// 状態は1つの非同期Mutexの内側にある。読み取りは短時間だけロックし、
/// 作業単位はコミットか破棄までロックを保持するため、書き込みは1つずつ実行される。
/// テストと `memory` ストレージバックエンドで使う。
#[derive(Clone)]
pub struct MemoryStore {
    pub(super) state: Arc<Mutex<StoreState>>,
    fallback: LibrarySettings,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_fallback(LibrarySettings::default())
    }

    /// 未設定の項目を `fallback` で補うストアを作成する
    pub fn with_fallback(fallback: LibrarySettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            fallback,
        }
    }

    /// 保存済みの図書館設定を書き換える（`None` と0は未設定扱い）
    pub async fn set_settings(&self, loan_period: Option<u32>, max_articles_per_user: Option<u32>) {
        let mut state = self.state.lock().await;
        state.loan_period = loan_period;
        state.max_articles_per_user = max_articles_per_user;
    }

    /// ユーザーアカウントを直接登録する（重複は確認しない）
    pub async fn add_account(&self, account: UserAccount) {
        self.state.lock().await.accounts.push(account);
    }

    /// 加入ルールを通さずに会員資格を追加する
    pub async fn add_membership(&self, membership: Membership) {
        self.state.lock().await.memberships.push(membership);
    }

    /// 資料の状態を変えずに台帳へ直接追記する
    pub async fn add_transaction(&self, transaction: Transaction) {
        self.state.lock().await.transactions.push(transaction);
    }

    /// 取引を記録せずに資料の状態を上書きする
    pub async fn force_article_status(
        &self,
        article_id: ArticleId,
        status: ArticleStatus,
    ) -> Result<()> {
        self.state.lock().await.set_article_status(article_id, status)
    }

    /// 台帳順の全取引
    pub async fn all_transactions(&self) -> Vec<Transaction> {
        self.state.lock().await.transactions.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Member>> {
        Ok(self.state.lock().await.member_by_email(email).cloned())
    }

    async fn insert_if_absent(&self, member: Member) -> Result<Member> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state.member_by_email(&member.email) {
            return Ok(existing.clone());
        }
        state.members.push(member.clone());
        Ok(member)
    }
}

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn find_by_member(&self, member_id: MemberId) -> Result<Vec<Membership>> {
        Ok(self.state.lock().await.memberships_of(member_id))
    }

    async fn find_active(&self, member_id: MemberId, today: NaiveDate) -> Result<Vec<Membership>> {
        let mut active: Vec<Membership> = self
            .state
            .lock()
            .await
            .memberships_of(member_id)
            .into_iter()
            .filter(|m| m.is_active_on(today))
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }
}

#[async_trait]
impl ArticleRepository for MemoryStore {
    async fn get_by_id(&self, article_id: ArticleId) -> Result<Option<Article>> {
        Ok(self.state.lock().await.article(article_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Article>> {
        let mut articles = self.state.lock().await.articles.clone();
        // 安定ソートなので同時刻なら後の登録が先に来る
        articles.reverse();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(articles)
    }

    async fn find_by_ids(&self, article_ids: &[ArticleId]) -> Result<Vec<Article>> {
        let state = self.state.lock().await;
        Ok(article_ids
            .iter()
            .filter_map(|id| state.article(*id).cloned())
            .collect())
    }

    async fn insert(&self, article: Article) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.article(article.article_id).is_some() {
            return Err(MemoryStoreError::DuplicateArticle(article.article_id).into());
        }
        state.articles.push(article);
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for MemoryStore {
    async fn get_by_id(&self, transaction_id: TransactionId) -> Result<Option<Transaction>> {
        Ok(self.state.lock().await.transaction(transaction_id).cloned())
    }

    async fn find_by_member(&self, member_id: MemberId) -> Result<Vec<Transaction>> {
        Ok(self.state.lock().await.ledger_of(member_id))
    }

    fn stream_all(&self) -> BoxStream<'_, Result<Transaction>> {
        let state = Arc::clone(&self.state);
        // スナップショットは最初のpoll時に取る
        let snapshot = stream::once(async move {
            let ledger = state.lock().await.transactions.clone();
            ledger
        })
        .flat_map(|ledger| stream::iter(ledger.into_iter().map(Ok::<Transaction, PortError>)));
        Box::pin(snapshot)
    }
}

#[async_trait]
impl UserAccountRepository for MemoryStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserAccount>> {
        Ok(self.state.lock().await.account(email).cloned())
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load(&self) -> Result<LibrarySettings> {
        let state = self.state.lock().await;
        Ok(self
            .fallback
            .overlay(state.loan_period, state.max_articles_per_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TransactionType, member::register_member};
    use chrono::{Duration, Utc};
    use futures::TryStreamExt;

    fn article(title: &str) -> Article {
        Article {
            article_id: ArticleId::new(),
            title: Some(title.to_string()),
            author: None,
            publisher: None,
            isbn: None,
            description: None,
            image: None,
            route: None,
            status: ArticleStatus::Available,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_if_absent_returns_existing_member() {
        let store = MemoryStore::new();
        let email = Email::parse("ada@example.com").unwrap();

        let first = store
            .insert_if_absent(register_member("Ada Lovelace", email.clone(), Utc::now()))
            .await
            .unwrap();
        let second = store
            .insert_if_absent(register_member("Someone Else", email.clone(), Utc::now()))
            .await
            .unwrap();

        assert_eq!(first.member_id, second.member_id);
        assert_eq!(second.first_name, "Ada");
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let store = MemoryStore::new();
        let mut older = article("Older");
        older.created_at = Utc::now() - Duration::days(1);
        let newer = article("Newer");
        ArticleRepository::insert(&store, older).await.unwrap();
        ArticleRepository::insert(&store, newer).await.unwrap();

        let titles: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.display_title())
            .collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_find_account_by_normalized_email() {
        let store = MemoryStore::new();
        store
            .add_account(UserAccount {
                email: Email::parse("Ada@Example.com").unwrap(),
                full_name: "Ada".to_string(),
                password_hash: String::new(),
                enabled: true,
                roles: Vec::new(),
                created_at: Utc::now(),
            })
            .await;

        let email = Email::parse("ada@example.com").unwrap();
        let found = UserAccountRepository::find_by_email(&store, &email)
            .await
            .unwrap();
        assert_eq!(found.map(|a| a.full_name), Some("Ada".to_string()));
    }

    #[tokio::test]
    async fn test_settings_overlay_fallback() {
        let store = MemoryStore::with_fallback(LibrarySettings {
            loan_period: 7,
            max_articles_per_user: 2,
        });
        store.set_settings(None, Some(4)).await;

        let settings = store.load().await.unwrap();
        assert_eq!(settings.loan_period, 7);
        assert_eq!(settings.max_articles_per_user, 4);
    }

    #[tokio::test]
    async fn test_stream_all_in_insertion_order() {
        let store = MemoryStore::new();
        let member_id = MemberId::new();
        let article_id = ArticleId::new();
        let today = Utc::now().date_naive();
        for transaction_type in [TransactionType::Issue, TransactionType::Return] {
            store
                .add_transaction(Transaction {
                    transaction_id: TransactionId::new(),
                    article_id,
                    member_id,
                    transaction_type,
                    date: today,
                    submitted: true,
                    created_at: Utc::now(),
                })
                .await;
        }

        let ledger: Vec<Transaction> = store.stream_all().try_collect().await.unwrap();
        let types: Vec<_> = ledger.iter().map(|t| t.transaction_type).collect();
        assert_eq!(types, vec![TransactionType::Issue, TransactionType::Return]);
    }
}
