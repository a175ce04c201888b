//! The response envelope shared by every endpoint.
//!
//! ```json
//! { "status": "success", "message": "...", "data": [...] }
//! ```
//!
//! `data` is omitted when there is nothing to return.

use axum::{
  Json,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  Success,
  Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T = serde_json::Value> {
  pub status:  Status,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
}

impl<T> Envelope<T> {
  pub fn success(message: impl Into<String>) -> Self {
    Self {
      status:  Status::Success,
      message: message.into(),
      data:    None,
    }
  }

  pub fn with_data(message: impl Into<String>, data: T) -> Self {
    Self {
      status:  Status::Success,
      message: message.into(),
      data:    Some(data),
    }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self {
      status:  Status::Error,
      message: message.into(),
      data:    None,
    }
  }
}

/// Success envelopes are always `200 OK`; errors go through
/// [`crate::ApiError`], which picks its own status.
impl<T: Serialize> IntoResponse for Envelope<T> {
  fn into_response(self) -> Response { Json(self).into_response() }
}
