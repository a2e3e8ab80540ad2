//! Postgres repositories for the reunion platform.

pub mod catalog;

pub use catalog::PgCatalogStore;
