//! Request-body extractor accepting JSON or URL-encoded forms.

use axum::{
  Form, Json,
  extract::{FromRequest, Request},
  http::header,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Deserialises the body as a form when the content type says so, and as
/// JSON otherwise. Rejections become [`ApiError::BadRequest`] so they share
/// the response envelope.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let is_form = req
      .headers()
      .get(header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
      let Form(value) = Form::<T>::from_request(req, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
      Ok(Self(value))
    } else {
      let Json(value) = Json::<T>::from_request(req, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
      Ok(Self(value))
    }
  }
}
