pub mod database;
pub mod entries;
pub mod error;
pub mod schema;

pub use database::Database;
pub use entries::{Entry, EntryRepo, DEFAULT_LIMIT, MAX_TEXT_LEN};
pub use error::StoreError;
