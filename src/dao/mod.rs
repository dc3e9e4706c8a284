/// Database model definitions.
pub mod models;
/// Storage backends and the repository trait surface.
pub mod store;
/// Storage abstraction layer for database operations.
pub mod storage;
