//! Handler for `GET /`: make sure the contacts index exists.

use addressbook_core::store::{ContactStore, IndexStatus};
use axum::extract::State;

use crate::{AppState, envelope::Envelope, error::ApiError};

/// `GET /`
///
/// Creates the index with its fixed schema on first use, then reports it as
/// loaded on every later call.
pub async fn ensure_ready<S>(
  State(state): State<AppState<S>>,
) -> Result<Envelope<()>, ApiError>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let index = &state.config.index;
  let status = state
    .store
    .ensure_index()
    .await
    .map_err(ApiError::store(format!(
      "Failed to create index {index} for Address Book API"
    )))?;

  let message = match status {
    IndexStatus::Existing => {
      tracing::info!(index = %index, "index already exists");
      format!("Successfully loaded index {index} for Address Book API")
    }
    IndexStatus::Created => {
      tracing::info!(index = %index, "index created");
      format!("Successfully created index {index} for Address Book API")
    }
  };
  Ok(Envelope::success(message))
}
