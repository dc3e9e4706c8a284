mod config;
mod connection;
mod error;
mod models;
/// MongoDB store implementation.
pub mod store;

pub use config::MongoConfig;
pub use error::MongoDaoError;
pub use store::MongoStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::DuplicateKey { message } => StorageError::duplicate(message),
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
