//! Shared setup for the ormkit benchmarks.

#![warn(missing_docs)]

pub mod utils;
