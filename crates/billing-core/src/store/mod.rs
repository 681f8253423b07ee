//! Primary key-value storage.
//!
//! This is the synchronous, always-available store that holds the
//! application state (cart, products, bills, ledger, shop settings).

mod file;
mod memory;
mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{KeyValueStore, KeyValueStoreExt};
