//! Cache-aside layer

mod counter;
mod executor;
pub mod keys;
mod store;
mod value;

pub use counter::OperationCounter;
pub use executor::CacheExecutor;
pub use store::CacheStore;
pub use value::{CacheEntity, CacheValue};
