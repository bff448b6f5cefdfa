//! # ormkit memory
//!
//! An in-process adapter for ormkit.
//!
//! Tables are created on first insert and grow new columns as writes
//! mention them. Reads are evaluated against compiled [`Plan`]s, and
//! transactions work on snapshots that are published on commit.
//!
//! Intended for tests, prototyping and as a reference for adapter authors.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ormkit_core::{eq, get, Db};
//! use ormkit_memory::{MemoryAdapter, MemoryConfig};
//!
//! let db = Db::new(MemoryAdapter::with_config(
//!     MemoryConfig::new().case_insensitive_like(true),
//! ));
//! db.create(&user)?;
//! let found: User = get(&db, db.query(&User::default()).filter([eq("id", 1)]))?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod adapter;
mod config;
mod cursor;
mod error;
mod plan;
mod table;

pub use adapter::{MemoryAdapter, MemoryTx};
pub use config::MemoryConfig;
pub use cursor::{MemoryRow, MemoryRows};
pub use error::{MemoryError, MemoryResult};
pub use plan::{like_match, Direction, Plan, Predicate};
pub use table::Table;
