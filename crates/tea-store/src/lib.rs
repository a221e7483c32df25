pub mod config_file;
pub mod error;
pub mod library;
pub mod schema;
pub mod store;
pub mod tables_file;

pub use error::{Result, StoreError};
pub use library::{TeaLibrary, default_base_dir};
pub use store::{Store, StoredTea};
