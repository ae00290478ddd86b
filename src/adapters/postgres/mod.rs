mod article_repository;
mod member_repository;
mod membership_repository;
mod rows;
mod settings_store;
mod transaction_repository;
mod unit_of_work;
mod user_account_repository;

// パブリックに型を再エクスポート
pub use article_repository::ArticleRepository as PostgresArticleRepository;
pub use member_repository::MemberRepository as PostgresMemberRepository;
pub use membership_repository::MembershipRepository as PostgresMembershipRepository;
pub use settings_store::SettingsStore as PostgresSettingsStore;
pub use transaction_repository::TransactionRepository as PostgresTransactionRepository;
pub use unit_of_work::{
    UnitOfWork as PostgresUnitOfWork, UnitOfWorkFactory as PostgresUnitOfWorkFactory,
};
pub use user_account_repository::UserAccountRepository as PostgresUserAccountRepository;
