pub mod account;
pub mod article;
pub mod commands;
pub mod errors;
pub mod identity;
pub mod ledger;
pub mod member;
pub mod rental;
pub mod settings;
pub mod value_objects;

pub use account::UserAccount;
pub use article::{Article, ArticleStatus};
pub use errors::*;
pub use identity::{Caller, Identity};
pub use ledger::{Transaction, TransactionType};
pub use member::{Member, Membership};
pub use settings::LibrarySettings;
pub use value_objects::*;
