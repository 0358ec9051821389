pub mod json_file;
pub mod repository;

pub use json_file::JsonFileStore;
pub use repository::{HistoryStore, InMemoryHistory, StorageError};
