//! [`MemoryStore`], an in-process implementation of [`ContactStore`].
//!
//! It imitates the parts of the search engine the API relies on: an index
//! that must be bootstrapped, free-text matching over analysed terms, name
//! matching with every term required, and bulk rename/delete by name. Results
//! come back in insertion order; there is no relevance ranking.
//!
//! Used by the API tests and by the server's `memory` backend.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
  contact::Contact,
  store::{ContactQuery, ContactStore, FailureKind, IndexStatus, StoreFailure},
};

// ─── Error ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to parse query {0:?}: unbalanced {1:?}")]
  InvalidQuery(String, char),
}

impl StoreFailure for Error {
  fn kind(&self) -> FailureKind {
    match self {
      Error::InvalidQuery(..) => FailureKind::InvalidQuery,
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct State {
  index_exists: bool,
  documents:    Vec<(Uuid, Contact)>,
}

/// An in-memory contact index.
///
/// Cloning is cheap; clones share the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  state: Arc<RwLock<State>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Number of stored documents, regardless of any query.
  pub async fn len(&self) -> usize { self.state.read().await.documents.len() }

  pub async fn is_empty(&self) -> bool { self.len().await == 0 }

  pub async fn index_exists(&self) -> bool { self.state.read().await.index_exists }
}

impl ContactStore for MemoryStore {
  type Error = Error;

  async fn ensure_index(&self) -> Result<IndexStatus, Error> {
    let mut state = self.state.write().await;
    if state.index_exists {
      return Ok(IndexStatus::Existing);
    }
    state.index_exists = true;
    tracing::debug!("created in-memory contacts index");
    Ok(IndexStatus::Created)
  }

  async fn search(&self, query: &ContactQuery) -> Result<Vec<Contact>, Error> {
    let matcher = query
      .text
      .as_deref()
      .map(TextMatcher::parse)
      .transpose()?;

    let state = self.state.read().await;
    if !state.index_exists {
      return Ok(Vec::new());
    }

    Ok(
      state
        .documents
        .iter()
        .map(|(_, c)| c)
        .filter(|c| matcher.as_ref().is_none_or(|m| m.matches_any_field(c)))
        .skip(query.offset)
        .take(query.limit)
        .cloned()
        .collect(),
    )
  }

  async fn insert(&self, contact: Contact) -> Result<(), Error> {
    let mut state = self.state.write().await;
    // Writing into a missing index creates it, as the search engine does.
    state.index_exists = true;
    state.documents.push((Uuid::new_v4(), contact));
    Ok(())
  }

  async fn count_named(&self, name: &str) -> Result<u64, Error> {
    let wanted = terms(name);
    let state = self.state.read().await;
    Ok(
      state
        .documents
        .iter()
        .filter(|(_, c)| name_matches(&wanted, c))
        .count() as u64,
    )
  }

  async fn rename_all(&self, name: &str, new_name: &str) -> Result<u64, Error> {
    let wanted = terms(name);
    let mut state = self.state.write().await;
    let mut updated = 0;
    for (_, contact) in state.documents.iter_mut() {
      if name_matches(&wanted, contact) {
        contact.name = new_name.to_owned();
        updated += 1;
      }
    }
    Ok(updated)
  }

  async fn delete_all(&self, name: &str) -> Result<u64, Error> {
    let wanted = terms(name);
    let mut state = self.state.write().await;
    let before = state.documents.len();
    state.documents.retain(|(_, c)| !name_matches(&wanted, c));
    Ok((before - state.documents.len()) as u64)
  }
}

// ─── Matching ────────────────────────────────────────────────────────────────

/// Lowercased alphanumeric terms, roughly what a standard analyser produces.
fn terms(text: &str) -> Vec<String> {
  text
    .split(|c: char| !c.is_alphanumeric())
    .filter(|t| !t.is_empty())
    .map(str::to_lowercase)
    .collect()
}

/// Every term of the requested name must occur in the stored name.
fn name_matches(wanted: &[String], contact: &Contact) -> bool {
  if wanted.is_empty() {
    return false;
  }
  let have = terms(&contact.name);
  wanted.iter().all(|w| have.contains(w))
}

/// A parsed free-text query: any term in any field is a hit.
#[derive(Debug)]
enum TextMatcher {
  All,
  AnyTerm(Vec<String>),
}

impl TextMatcher {
  fn parse(query: &str) -> Result<Self, Error> {
    for (open, close) in [('(', ')'), ('[', ']'), ('{', '}')] {
      let opens = query.chars().filter(|c| *c == open).count();
      let closes = query.chars().filter(|c| *c == close).count();
      if opens != closes {
        return Err(Error::InvalidQuery(query.to_owned(), open));
      }
    }
    if query.chars().filter(|c| *c == '"').count() % 2 != 0 {
      return Err(Error::InvalidQuery(query.to_owned(), '"'));
    }

    if query.trim() == "*" {
      return Ok(Self::All);
    }

    let words = query
      .split_whitespace()
      .filter(|w| !matches!(*w, "AND" | "OR" | "NOT"))
      .flat_map(terms)
      .collect();
    Ok(Self::AnyTerm(words))
  }

  fn matches_any_field(&self, contact: &Contact) -> bool {
    match self {
      Self::All => true,
      Self::AnyTerm(words) => {
        let fields = [
          &contact.name,
          &contact.lastname,
          &contact.phone,
          &contact.address,
          &contact.email,
        ];
        fields
          .iter()
          .flat_map(|f| terms(f))
          .any(|t| words.contains(&t))
      }
    }
  }
}
