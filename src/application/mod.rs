pub mod account;
pub mod catalog;
pub mod dependencies;
pub mod errors;
pub mod membership;
pub mod rental;

pub use dependencies::ServiceDependencies;
pub use errors::{ApplicationError, Result};
