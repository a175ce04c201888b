//! Elasticsearch backend for the address book.
//!
//! Wraps the official [`elasticsearch`] client. Every engine call goes over
//! HTTP through a single shared transport, so [`EsStore`] is cheap to clone
//! and safe to share across request handlers.

mod query;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{EsConfig, EsStore};
