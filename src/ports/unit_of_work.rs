use crate::domain::{
    Article, ArticleId, ArticleStatus, Email, Member, MemberId, Membership, Transaction,
    TransactionId, UserAccount,
};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 作業単位（Unit of Work）ポート
///
/// 1回の操作で行う読み書きを1つのストアトランザクションにまとめる。
/// `commit` を呼ばずに破棄した場合、すべての書き込みは取り消される。
///
/// ロック規約：
/// - `lock_member` は会員の貸出上限チェックと会員資格の作成を直列化する
/// - `lock_article` は資料の状態確認から更新までを直列化する
/// - デッドロックを避けるため、必ず会員 → 資料の順でロックする
#[async_trait]
pub trait UnitOfWork: Send {
    /// メールアドレスで会員を検索し、作業単位の終了までロックする
    async fn lock_member(&mut self, email: &Email) -> Result<Option<Member>>;

    /// 資料を取得し、作業単位の終了までロックする
    async fn lock_article(&mut self, article_id: ArticleId) -> Result<Option<Article>>;

    /// 会員の全会員資格
    async fn memberships(&mut self, member_id: MemberId) -> Result<Vec<Membership>>;

    /// 会員の全取引（挿入順）
    async fn member_ledger(&mut self, member_id: MemberId) -> Result<Vec<Transaction>>;

    /// IDで取引を取得する
    async fn transaction(&mut self, transaction_id: TransactionId) -> Result<Option<Transaction>>;

    /// 台帳に取引を追記する
    async fn append_transaction(&mut self, transaction: &Transaction) -> Result<()>;

    /// 資料の状態を更新する
    async fn save_article_status(&mut self, article_id: ArticleId, status: ArticleStatus)
    -> Result<()>;

    /// 会員資格を登録する
    async fn insert_membership(&mut self, membership: &Membership) -> Result<()>;

    /// メールアドレスでユーザーアカウントを取得する
    async fn account(&mut self, email: &Email) -> Result<Option<UserAccount>>;

    /// ユーザーアカウントを登録する
    ///
    /// 同じメールアドレスのアカウントが既にあれば何もせず `false` を返す。
    async fn insert_account(&mut self, account: &UserAccount) -> Result<bool>;

    /// 会員を登録する。同じメールアドレスの会員が既にあればそれを返す
    async fn insert_member_if_absent(&mut self, member: &Member) -> Result<Member>;

    /// すべての書き込みを確定する
    async fn commit(self: Box<Self>) -> Result<()>;
}

/// 作業単位を開始するファクトリ
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>>;
}
