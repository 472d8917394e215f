//! Record storage.

pub mod interface;
pub mod mem_storage;

pub use interface::Storage;
pub use mem_storage::MemStorage;
