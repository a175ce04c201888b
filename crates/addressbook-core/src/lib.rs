//! Core types and trait definitions for the address book.
//!
//! This crate is deliberately free of HTTP and search-engine dependencies.
//! The API and store crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod contact;
pub mod error;
pub mod memory;
pub mod page;
pub mod phone;
pub mod settings;
pub mod store;

pub use error::{Error, Result};
