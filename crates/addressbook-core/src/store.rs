//! The `ContactStore` trait and supporting query types.
//!
//! The trait is implemented by search backends (`addressbook-store-es`, and
//! [`crate::memory::MemoryStore`]). The API layer depends on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::contact::Contact;

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ContactStore::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactQuery {
  /// Free-text query over every field. `None` matches everything.
  pub text:   Option<String>,
  pub offset: usize,
  pub limit:  usize,
}

impl ContactQuery {
  /// A free-text lookup returning up to `limit` matches from the top.
  pub fn lookup(text: impl Into<String>, limit: usize) -> Self {
    Self {
      text: Some(text.into()),
      offset: 0,
      limit,
    }
  }
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of [`ContactStore::ensure_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
  /// The index was already there.
  Existing,
  /// The index was missing and has just been created.
  Created,
}

// ─── Failures ────────────────────────────────────────────────────────────────

/// Coarse classification of a backend failure, used to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// The engine rejected the query string as malformed.
  InvalidQuery,
  /// A concurrent writer changed a matching document mid-operation.
  Conflict,
  /// The engine could not be reached or did not answer in time.
  Unavailable,
  /// Anything else.
  Internal,
}

/// Implemented by every backend error type.
pub trait StoreFailure: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> FailureKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the search engine holding contact documents.
///
/// Mutations select their targets by name and act on *every* match. None of
/// the operations are transactional with respect to each other; a caller that
/// counts and then mutates can observe a different set of documents.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: StoreFailure;

  /// Create the contacts index with its fixed schema unless it exists.
  fn ensure_index(
    &self,
  ) -> impl Future<Output = Result<IndexStatus, Self::Error>> + Send + '_;

  /// Free-text search over all fields with offset pagination.
  ///
  /// A missing index yields an empty result rather than an error.
  fn search<'a>(
    &'a self,
    query: &'a ContactQuery,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;

  /// Insert a new document. No existence check; duplicates are allowed.
  fn insert(
    &self,
    contact: Contact,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Count documents whose `name` field matches `name`.
  fn count_named<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Rewrite the `name` field of every document matching `name`. Returns the
  /// number of documents updated.
  fn rename_all<'a>(
    &'a self,
    name: &'a str,
    new_name: &'a str,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Delete every document matching `name`. Returns the number deleted.
  fn delete_all<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;
}
