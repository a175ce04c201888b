//! JSON REST API for the address book.
//!
//! Exposes an axum [`Router`] backed by any
//! [`addressbook_core::store::ContactStore`]. Transport concerns (binding,
//! tracing layers, shutdown) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = addressbook_api::api_router(AppState::new(store, config));
//! ```

pub mod contacts;
pub mod envelope;
pub mod error;
pub mod index;
pub mod payload;

use std::sync::Arc;

use addressbook_core::{settings::Limits, store::ContactStore};
use axum::{Router, routing::get};

pub use envelope::{Envelope, Status};
pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Handler-facing configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Name of the contacts index, reported by `GET /`.
  pub index:  String,
  pub limits: Limits,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ContactStore> {
  pub store:  Arc<S>,
  pub config: Arc<ApiConfig>,
}

impl<S: ContactStore> AppState<S> {
  pub fn new(store: S, config: ApiConfig) -> Self {
    Self {
      store:  Arc::new(store),
      config: Arc::new(config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(index::ensure_ready::<S>))
    .route("/contact", get(contacts::list::<S>).post(contacts::create::<S>))
    .route("/contact/", get(contacts::list::<S>).post(contacts::create::<S>))
    .route(
      "/contact/{name}",
      get(contacts::get_one::<S>)
        .put(contacts::update::<S>)
        .delete(contacts::delete_one::<S>),
    )
    .with_state(state)
}

#[cfg(test)]
mod tests;
