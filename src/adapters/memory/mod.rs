mod store;
mod unit_of_work;

pub use store::{MemoryStore, MemoryStoreError};
pub use unit_of_work::MemoryUnitOfWork;
