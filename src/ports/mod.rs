pub mod article_repository;
pub mod member_repository;
pub mod membership_repository;
pub mod settings_store;
pub mod transaction_repository;
pub mod unit_of_work;
pub mod user_account_repository;

pub use article_repository::ArticleRepository;
pub use member_repository::MemberRepository;
pub use membership_repository::MembershipRepository;
pub use settings_store::SettingsStore;
pub use transaction_repository::TransactionRepository;
pub use unit_of_work::{UnitOfWork, UnitOfWorkFactory};
pub use user_account_repository::UserAccountRepository;

/// ポート共通のエラー型
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
