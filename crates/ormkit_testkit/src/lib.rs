//! # ormkit Testkit
//!
//! Test utilities for ormkit.
//!
//! This crate provides:
//! - [`RecordingAdapter`], a scripted adapter that records every call
//! - Fixture models covering the common field kinds
//! - Property-based test generators using proptest
//! - Tracing initialisation for tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ormkit_testkit::prelude::*;
//!
//! #[test]
//! fn create_dispatches_once() {
//!     let adapter = RecordingAdapter::new();
//!     let db = Db::new(adapter.clone());
//!     db.create(&User::new(1, "Alice", 30)).unwrap();
//!     assert_eq!(adapter.call_count(), 1);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod logging;
pub mod recording;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::logging::*;
    pub use crate::recording::*;
    pub use ormkit_core::*;
}

pub use fixtures::*;
pub use generators::*;
pub use logging::*;
pub use recording::*;
