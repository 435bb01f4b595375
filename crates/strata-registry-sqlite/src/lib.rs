//! SQLite-backed partition store
//!
//! Persistent registry of tenants and domain bindings on SQLite. Uniqueness
//! of slugs, owners, and hostnames is enforced with UNIQUE constraints;
//! every composite mutation runs in a single transaction.

mod sqlite_partition_store;

pub use sqlite_partition_store::SqlitePartitionStore;
