pub mod database;

pub use database::{Database, DatabaseSpec, DatabaseStatus, SecretRef};
