//! Error type for `addressbook-store-es`.

use addressbook_core::store::{FailureKind, StoreFailure};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid elasticsearch url {url:?}: {message}")]
  InvalidUrl { url: String, message: String },

  #[error("failed to build transport: {0}")]
  Transport(#[from] elasticsearch::http::transport::BuildError),

  /// No HTTP response at all: connection refused, timeout, TLS failure.
  #[error("elasticsearch request failed: {0}")]
  Request(#[from] elasticsearch::Error),

  #[error("query rejected by elasticsearch: {0}")]
  InvalidQuery(String),

  #[error("version conflict: {0}")]
  Conflict(String),

  #[error("elasticsearch unavailable ({status}): {body}")]
  Unavailable { status: u16, body: String },

  #[error("elasticsearch returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("unexpected response: {0}")]
  Response(String),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

impl Error {
  /// Map a non-success HTTP answer onto a variant.
  ///
  /// A 400 here is the engine refusing a write or an admin call (closed
  /// index, mapping or script failure), never a caller mistake.
  pub(crate) fn from_status(status: u16, body: String) -> Self {
    match status {
      409 => Error::Conflict(body),
      429 | 502 | 503 | 504 => Error::Unavailable { status, body },
      _ => Error::Status { status, body },
    }
  }

  /// Like [`Error::from_status`], for the answer to a search request. A 400
  /// caused by an unparsable query string is the caller's fault.
  pub(crate) fn from_search_status(status: u16, body: String) -> Self {
    if status == 400 && crate::query::is_query_parse_error(&body) {
      return Error::InvalidQuery(body);
    }
    Self::from_status(status, body)
  }
}

impl StoreFailure for Error {
  fn kind(&self) -> FailureKind {
    match self {
      Error::InvalidQuery(_) => FailureKind::InvalidQuery,
      Error::Conflict(_) => FailureKind::Conflict,
      Error::Request(_) | Error::Unavailable { .. } => FailureKind::Unavailable,
      Error::InvalidUrl { .. }
      | Error::Transport(_)
      | Error::Status { .. }
      | Error::Response(_)
      | Error::Json(_) => FailureKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
