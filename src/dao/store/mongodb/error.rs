use mongodb::error::{CommandError, Error, ErrorKind, WriteError, WriteFailure};
use thiserror::Error;
use uuid::Uuid;

/// Result alias for MongoDB DAO operations.
pub type MongoResult<T> = Result<T, MongoDaoError>;

/// Errors produced by the MongoDB backend.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// The connection string could not be parsed.
    #[error("invalid MongoDB URI `{uri}`")]
    InvalidUri {
        /// The offending URI.
        uri: String,
        /// Parser failure.
        #[source]
        source: Error,
    },
    /// The client could not be constructed from parsed options.
    #[error("failed to build MongoDB client")]
    ClientConstruction {
        /// Driver failure.
        #[source]
        source: Error,
    },
    /// The initial ping never succeeded within the retry limit.
    #[error("initial MongoDB ping failed after {attempts} attempts")]
    InitialPing {
        /// Number of attempts made.
        attempts: u32,
        /// Last ping failure.
        #[source]
        source: Error,
    },
    /// Creating a collection index failed.
    #[error("failed to ensure index `{index}` on `{collection}`")]
    EnsureIndex {
        /// Collection the index belongs to.
        collection: &'static str,
        /// Index key description.
        index: &'static str,
        /// Driver failure.
        #[source]
        source: Error,
    },
    /// A health-check ping failed.
    #[error("MongoDB health ping failed")]
    HealthPing {
        /// Driver failure.
        #[source]
        source: Error,
    },
    /// A read or write against the games collection failed.
    #[error("game operation `{operation}` failed for `{id}`")]
    Game {
        /// Name of the failed operation.
        operation: &'static str,
        /// Game identifier involved.
        id: Uuid,
        /// Driver failure.
        #[source]
        source: Error,
    },
    /// A games query not scoped to a single id failed.
    #[error("game query `{operation}` failed")]
    GameQuery {
        /// Name of the failed query.
        operation: &'static str,
        /// Driver failure.
        #[source]
        source: Error,
    },
    /// A read or write against the applications collection failed.
    #[error("application operation `{operation}` failed")]
    Application {
        /// Name of the failed operation.
        operation: &'static str,
        /// Driver failure.
        #[source]
        source: Error,
    },
    /// A read or write against the stats collections failed.
    #[error("stats operation `{operation}` failed")]
    Stats {
        /// Name of the failed operation.
        operation: &'static str,
        /// Driver failure.
        #[source]
        source: Error,
    },
    /// A read or write against the badges collection failed.
    #[error("badge operation `{operation}` failed")]
    Badge {
        /// Name of the failed operation.
        operation: &'static str,
        /// Driver failure.
        #[source]
        source: Error,
    },
    /// A unique index rejected the write.
    #[error("duplicate key: {message}")]
    DuplicateKey {
        /// Description of the violated constraint.
        message: String,
    },
}

/// Whether a driver error is an E11000 duplicate-key violation, regardless of
/// whether it surfaced as a write error or a command error.
pub fn is_duplicate_key(err: &Error) -> bool {
    const DUPLICATE_KEY: i32 = 11000;
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(WriteError { code, .. })) => {
            *code == DUPLICATE_KEY
        }
        ErrorKind::Command(CommandError { code, .. }) => *code == DUPLICATE_KEY,
        ErrorKind::InsertMany(failure) => failure
            .write_errors
            .as_ref()
            .is_some_and(|errors| errors.iter().all(|write| write.code == DUPLICATE_KEY)),
        _ => false,
    }
}
