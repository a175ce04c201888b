//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Store failures are logged in full and answered with a generic message;
//! engine internals never reach the caller.

use addressbook_core::store::{FailureKind, StoreFailure};
use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::envelope::Envelope;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Validation(#[from] addressbook_core::Error),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  /// `context` is the caller-facing description of what failed.
  #[error("{context}: {source}")]
  Store {
    kind:    FailureKind,
    context: String,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Wrap a backend error; use as `.map_err(ApiError::store("..."))`.
  pub fn store<E: StoreFailure>(
    context: impl Into<String>,
  ) -> impl FnOnce(E) -> ApiError {
    let context = context.into();
    move |e| ApiError::Store {
      kind: e.kind(),
      context,
      source: Box::new(e),
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Store { kind, .. } => match kind {
        FailureKind::InvalidQuery => StatusCode::BAD_REQUEST,
        FailureKind::Conflict => StatusCode::CONFLICT,
        FailureKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }

  fn public_message(&self) -> String {
    match self {
      ApiError::Validation(e) => e.to_string(),
      ApiError::BadRequest(m) | ApiError::NotFound(m) => m.clone(),
      ApiError::Store { kind, context, .. } => match kind {
        FailureKind::InvalidQuery => format!("{context}: invalid search query"),
        FailureKind::Conflict => {
          format!("{context}: modified concurrently. Please try again.")
        }
        FailureKind::Unavailable => {
          "search engine unavailable. Please try again later!".to_owned()
        }
        FailureKind::Internal => format!("{context}. Please try again later!"),
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    match &self {
      ApiError::Store { .. } if status.is_server_error() => {
        tracing::error!(error = %self, "store failure");
      }
      _ => tracing::warn!(%status, error = %self, "request rejected"),
    }
    (status, Json(Envelope::<()>::error(self.public_message()))).into_response()
  }
}
