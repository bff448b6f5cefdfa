//! # ormkit core
//!
//! Intent-based data access for ormkit.
//!
//! Application code describes persistence operations as structured intent
//! ([`Query`]) and hands them to a pluggable [`Adapter`]. The core never
//! generates query text, caches, retries or pools connections.
//!
//! This crate provides:
//! - The intent model: [`Action`], [`Condition`], [`Order`], [`Query`]
//! - The [`Model`] capability that record types implement
//! - [`Db`], the orchestrator for create/update/delete and query building
//! - Typed reads with [`get`] and [`find_all`]
//! - Transactions with [`transaction`]
//! - The [`OrmError`] taxonomy
//!
//! ## Example
//!
//! ```rust,ignore
//! use ormkit_core::{eq, find_all, get, gt, Db};
//!
//! let db = Db::new(adapter);
//! db.create(&User { id: 1, name: "Alice".into(), age: 30 })?;
//!
//! let probe = User::default();
//! let alice: User = get(&db, db.query(&probe).filter([eq("name", "Alice")]))?;
//! let seniors: Vec<User> = find_all(&db, db.query(&probe).filter([gt("age", 65)]))?;
//!
//! db.transaction(|tx| {
//!     tx.update(&alice, [eq("id", 1)])?;
//!     tx.delete(&probe, [gt("age", 120)])
//! })?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod adapter;
mod builder;
mod compiler;
mod db;
mod error;
mod fetch;
mod model;
mod query;
mod tx;
mod validate;
mod value;

pub use adapter::{Adapter, Rows, Scanner, TxAdapter, TxCapable};
pub use builder::QueryBuilder;
pub use compiler::Compiler;
pub use db::Db;
pub use error::{OrmError, OrmResult};
pub use fetch::{find_all, find_all_with, get, get_with};
pub use model::{assign_slots, Model, Slot};
pub use query::{
    eq, gt, gte, like, lt, lte, neq, or, Action, Condition, Logic, Operator, Order, Query,
};
pub use tx::transaction;
pub use validate::validate;
pub use value::Value;
