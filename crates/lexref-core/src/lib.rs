//! Core types and trait definitions for the Lexref statute store.
//!
//! This crate is deliberately free of XML, HTTP, and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod citation;
pub mod document;
pub mod error;
pub mod provision;
pub mod search;
pub mod store;

pub use error::{Error, Result};
